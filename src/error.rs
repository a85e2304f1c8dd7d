/// Errors raised by the index and the tour.
/// Everything here is a caller error: nothing is retried and no state is changed
/// by an operation that fails.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum Error {
    /// A coordinate was NaN or infinite, so the point can't be ordered along an axis
    #[error("invalid point ({x}, {y}): coordinates must be finite")]
    InvalidPoint { x: f64, y: f64 },

    /// A rectangle was given a min bound above its max bound (or a NaN bound)
    #[error("invalid rectangle [{xmin}, {xmax}] x [{ymin}, {ymax}]: min bound exceeds max bound")]
    InvertedBounds { xmin: f64, ymin: f64, xmax: f64, ymax: f64 },

    /// A point fell outside the domain a bounded KD tree was built for.
    /// Accepting it would make the region bounds used for pruning wrong.
    #[error("point lies outside the bounds of the tree")]
    OutOfBounds
}

pub type Result<T> = std::result::Result<T, Error>;

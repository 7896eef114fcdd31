use thiserror::Error;

/// Errors returned by grid clustering in this crate.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Point cloud has no points.
    #[error("empty input")]
    EmptyInput,

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: &'static str,
    },

    /// Position, size, batch or bound lengths disagree.
    #[error("shape mismatch for {what}: expected {expected}, found {found}")]
    ShapeMismatch {
        /// Which input has the wrong shape.
        what: &'static str,
        /// Expected length.
        expected: usize,
        /// Found length.
        found: usize,
    },

    /// A supplied origin lies above some position.
    #[error("origin exceeds point {point} on axis {axis}")]
    InvalidOrigin {
        /// Index of the offending point.
        point: usize,
        /// Axis on which the point lies below the origin.
        axis: usize,
    },

    /// A supplied end leaves no cells on some axis.
    #[error("end yields no cells on axis {axis}")]
    InvalidExtent {
        /// Spatial axis (batch axis excluded) with a non-positive cell count.
        axis: usize,
    },

    /// Total cell count does not fit the id width.
    #[error("total cell count overflows u64")]
    Overflow,

    /// A point falls outside the resolved grid.
    #[error("point {point} lands in cell {cell} on axis {axis}, grid has {cells} cells")]
    OutOfGrid {
        /// Index of the offending point.
        point: usize,
        /// Axis (batch axis included) on which it overflows.
        axis: usize,
        /// Computed cell coordinate.
        cell: u64,
        /// Cell count along that axis.
        cells: u64,
    },
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;

//! Error taxonomy for the evaluation engine.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("polygon needs at least 3 vertices, got {count}")]
    DegeneratePolygon { count: usize },

    #[error("polygon vertex {index} has a non-finite coordinate")]
    NonFiniteVertex { index: usize },

    #[error("separating axis test requires convex polygons, got a concave polygon with {vertices} vertices")]
    NonConvexPolygon { vertices: usize },

    #[error("arc discretization needs at least one segment")]
    InvalidArcSegments,

    #[error("office boundary has no finite extent")]
    InvalidBoundary,

    #[error("invalid plan or configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("only {found} of {requested} collision-free placements found after {attempts} attempts")]
    BaselineExhausted {
        found: usize,
        requested: usize,
        attempts: usize,
    },
}

pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(feature = "python")]
impl From<EngineError> for pyo3::PyErr {
    fn from(err: EngineError) -> Self {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}

use thiserror::Error;

/// Top-level error type for the line chain kernel.
#[derive(Debug, Error, PartialEq)]
pub enum ChainError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Invariant(#[from] InvariantError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Errors raised while constructing geometric primitives.
#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),
}

/// Contract violations on point or arc indices.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IndexError {
    #[error("index {index} is out of range for length {len}")]
    OutOfRange { index: isize, len: usize },

    #[error("invalid index range {start}..={end}")]
    InvalidRange { start: usize, end: usize },
}

/// Internal consistency failures of a chain's point, shape and arc lists.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvariantError {
    #[error("invariant violated: {0}")]
    Violation(String),
}

/// Errors produced when reading the textual chain form.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unexpected token {found:?} at byte {offset}, expected {expected}")]
    UnexpectedToken {
        expected: &'static str,
        found: String,
        offset: usize,
    },

    #[error("unexpected end of input, expected {0}")]
    UnexpectedEnd(&'static str),

    #[error("invalid number {0:?}")]
    InvalidNumber(String),
}

/// Convenience type alias for results using [`ChainError`].
pub type Result<T> = std::result::Result<T, ChainError>;

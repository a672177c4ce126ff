use thiserror::Error;

/// Errors returned by loading, clustering, and scoring in this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Input slice or corpus is empty.
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

    /// Vectors in a dataset have inconsistent dimensionality.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Expected dimensionality.
        expected: usize,
        /// Found dimensionality.
        found: usize,
    },

    /// A dataset line could not be parsed.
    #[error("line {line}: {message}")]
    Parse {
        /// 1-based line number in the source file.
        line: usize,
        /// Human-readable explanation.
        message: String,
    },

    /// A sparse index does not fit the vocabulary.
    #[error("line {line}: index {index} out of range for vocabulary of size {vocab_size}")]
    IndexOutOfRange {
        /// 1-based line number in the source file.
        line: usize,
        /// Offending term index.
        index: usize,
        /// Vocabulary size the vector is expanded to.
        vocab_size: usize,
    },

    /// Stopping criterion name is not one of the supported policies.
    #[error("unknown stopping criterion {0:?} (expected max_iters, centroid or similarity)")]
    UnknownCriterion(String),

    /// Scoring was requested on a dataset without documents.
    #[error("insufficient data: cannot score a clustering of zero documents")]
    InsufficientData,

    /// I/O failure while reading a dataset or vocabulary file.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;

use thiserror::Error;

/// Errors raised by the partitioning operations.
///
/// Every check runs before any output is produced, so a failed call never
/// yields a partial split.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SplitError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl SplitError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        SplitError::InvalidArgument(message.into())
    }
}

/// Result alias for partitioning operations.
pub type Result<T> = std::result::Result<T, SplitError>;

//! Pipeline-level error taxonomy.
//!
//! Every failure of a compression invocation is one of these variants. Only
//! [`CompressError::FormatRejected`] is recoverable (reported as a warning);
//! everything else is a hard error.

use thiserror::Error;

use crate::config::ConfigError;
use crate::decode::DecodeError;
use crate::encode::EncodeError;

/// Errors produced by a compression invocation.
#[derive(Debug, Error)]
pub enum CompressError {
    /// The declared MIME type is not PNG or JPEG.
    #[error("Only PNG and JPEG image are supported (got \"{0}\")")]
    FormatRejected(String),

    /// The image bytes could not be decoded as the declared format.
    #[error("Failed to decode image: {0}")]
    DecodeFailed(#[from] DecodeError),

    /// No encoding within the search bounds fits the budget.
    #[error("budget unreachable: smallest encoding was {smallest} bytes, budget is {budget} bytes")]
    BudgetUnreachable { budget: usize, smallest: usize },

    /// Reading the source byte stream failed.
    #[error("Failed to read image file: {0}")]
    ReadFailed(String),

    /// The budget was zero or negative.
    #[error("Invalid budget: {0} (must be a positive byte count)")]
    InvalidBudget(i64),

    /// The compression options failed validation.
    #[error("Invalid compression options: {0}")]
    InvalidOptions(#[from] ConfigError),

    /// The encoder rejected its parameters.
    #[error("Failed to encode image: {0}")]
    EncodeFailed(#[from] EncodeError),

    /// The background worker exited without reporting an outcome.
    #[error("Compression worker stopped before reporting a result")]
    WorkerStopped,
}

impl CompressError {
    /// Whether the user can fix this by choosing a different file.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CompressError::FormatRejected(_))
    }
}

impl From<std::io::Error> for CompressError {
    fn from(error: std::io::Error) -> Self {
        CompressError::ReadFailed(error.to_string())
    }
}

//! Error types shared by FiatBridge crates.

use thiserror::Error;

/// Errors raised while building common domain values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommonError {
    /// A currency or asset code was empty or contained invalid characters.
    #[error("Invalid code: {0:?}")]
    InvalidCode(String),

    /// A venue market identifier did not have the `base-quote` shape.
    #[error("Invalid market id: {0:?}")]
    InvalidMarketId(String),

    /// The supported fiat set must contain at least one code.
    #[error("Supported fiat set cannot be empty")]
    EmptyFiatSet,
}

impl CommonError {
    /// Get error code for logs and API payloads.
    pub fn error_code(&self) -> &'static str {
        match self {
            CommonError::InvalidCode(_) => "INVALID_CODE",
            CommonError::InvalidMarketId(_) => "INVALID_MARKET_ID",
            CommonError::EmptyFiatSet => "EMPTY_FIAT_SET",
        }
    }
}

/// Result type alias for common operations.
pub type Result<T> = std::result::Result<T, CommonError>;

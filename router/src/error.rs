//! Routing error types.

use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// Why the price source could not provide a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Unavailable {
    /// Request could not be sent or the response could not be read.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Venue answered with a non-success status.
    #[error("Upstream returned status {0}")]
    Status(u16),

    /// Body was not valid JSON or lacked an expected field.
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// Price field was present but not a number.
    #[error("Non-numeric price: {0:?}")]
    NonNumeric(String),

    /// Catalog listed no asset paired with two supported fiats.
    #[error("No intermediary candidates")]
    NoCandidates,
}

impl Unavailable {
    /// Get error code for logs and reports.
    pub fn error_code(&self) -> &'static str {
        match self {
            Unavailable::Transport(_) => "TRANSPORT",
            Unavailable::Status(_) => "UPSTREAM_STATUS",
            Unavailable::Malformed(_) => "MALFORMED",
            Unavailable::NonNumeric(_) => "NON_NUMERIC",
            Unavailable::NoCandidates => "NO_CANDIDATES",
        }
    }
}

impl Serialize for Unavailable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One of the two trades of a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Leg {
    /// Buying the asset with the source fiat.
    Buy,
    /// Selling the asset for the target fiat.
    Sell,
}

impl fmt::Display for Leg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Leg::Buy => write!(f, "buy"),
            Leg::Sell => write!(f, "sell"),
        }
    }
}

/// Why a candidate intermediary was left out of selection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("{leg} leg unavailable: {reason}")]
    LegUnavailable { leg: Leg, reason: Unavailable },

    #[error("{leg} leg price is not positive: {price}")]
    NonPositivePrice { leg: Leg, price: Decimal },

    #[error("Converted amount out of range")]
    Overflow,
}

impl Serialize for SkipReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

//! FiatBridge Common Types
//!
//! This crate contains shared types used across FiatBridge,
//! including fiat and asset codes, the supported fiat set and market identifiers.

pub mod codes;
pub mod market;
pub mod error;

pub use codes::*;
pub use market::*;
pub use error::*;

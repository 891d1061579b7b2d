//! FiatBridge Router
//!
//! Converts an amount between two fiat currencies by routing it through the
//! crypto asset that yields the best outcome on a live trading venue.
//!
//! # Features
//!
//! - Market catalog discovery of intermediary assets
//! - Last-trade price fetching with explicit unavailability reasons
//! - Concurrent per-candidate pricing with order-preserving selection
//! - Diagnostic route reports
//!
//! # Example
//!
//! ```rust,ignore
//! use fiatbridge_router::{BudaClient, BudaConfig, ConversionRouter, RouterConfig};
//! use fiatbridge_common::FiatCode;
//!
//! let source = Arc::new(BudaClient::new(BudaConfig::default())?);
//! let router = ConversionRouter::new(source, RouterConfig::default());
//!
//! let best = router
//!     .get_best_conversion(&FiatCode::clp(), &FiatCode::pen(), dec!(10000))
//!     .await;
//! ```

pub mod buda;
pub mod conversion;
pub mod engine;
pub mod error;
pub mod lookup;
pub mod resolver;
pub mod source;

pub use buda::{BudaClient, BudaConfig};
pub use conversion::{CandidateOutcome, CandidateStatus, ConversionResult, RouteReport};
pub use engine::{ConversionRouter, RouterConfig};
pub use error::{Leg, SkipReason, Unavailable};
pub use lookup::Lookup;
pub use resolver::MarketCatalogResolver;
pub use source::MarketSource;

#[cfg(any(test, feature = "test-utils"))]
pub use source::MockMarketSource;

//! Market data source trait and a mock implementation.

use async_trait::async_trait;
use fiatbridge_common::MarketId;
use rust_decimal::Decimal;

use crate::lookup::Lookup;

/// Read-only access to a trading venue's public market data.
#[async_trait]
pub trait MarketSource: Send + Sync {
    /// Get the source name.
    fn name(&self) -> &str;

    /// List the ids (`base-quote`) of every market the venue publishes.
    async fn list_markets(&self) -> Lookup<Vec<String>>;

    /// Get the most recent trade price for a market.
    async fn last_price(&self, market: &MarketId) -> Lookup<Decimal>;
}

#[cfg(any(test, feature = "test-utils"))]
pub use mock::MockMarketSource;

#[cfg(any(test, feature = "test-utils"))]
mod mock {
    use super::*;
    use crate::error::Unavailable;
    use dashmap::DashMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// In-memory market source for tests.
    ///
    /// Unknown markets answer like the venue does, with a 404 status.
    pub struct MockMarketSource {
        name: String,
        markets: DashMap<String, ()>,
        prices: DashMap<String, Lookup<Decimal>>,
        catalog_down: AtomicBool,
        catalog_calls: AtomicUsize,
        price_calls: AtomicUsize,
    }

    impl MockMarketSource {
        /// Create a new mock source with an empty catalog.
        pub fn new(name: impl Into<String>) -> Self {
            Self {
                name: name.into(),
                markets: DashMap::new(),
                prices: DashMap::new(),
                catalog_down: AtomicBool::new(false),
                catalog_calls: AtomicUsize::new(0),
                price_calls: AtomicUsize::new(0),
            }
        }

        /// List a market in the catalog without pricing it.
        pub fn add_market(&self, id: &str) {
            self.markets.insert(id.to_string(), ());
        }

        /// List a market and set its last price.
        pub fn set_price(&self, id: &str, price: Decimal) {
            self.add_market(id);
            self.prices.insert(id.to_lowercase(), Lookup::Found(price));
        }

        /// Make a market's ticker fail with the given reason.
        pub fn fail_price(&self, id: &str, reason: Unavailable) {
            self.prices.insert(id.to_lowercase(), Lookup::NotAvailable(reason));
        }

        /// Make the market listing unreachable.
        pub fn set_catalog_down(&self, down: bool) {
            self.catalog_down.store(down, Ordering::SeqCst);
        }

        pub fn catalog_calls(&self) -> usize {
            self.catalog_calls.load(Ordering::SeqCst)
        }

        pub fn price_calls(&self) -> usize {
            self.price_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl MarketSource for MockMarketSource {
        fn name(&self) -> &str {
            &self.name
        }

        async fn list_markets(&self) -> Lookup<Vec<String>> {
            self.catalog_calls.fetch_add(1, Ordering::SeqCst);
            if self.catalog_down.load(Ordering::SeqCst) {
                return Lookup::NotAvailable(Unavailable::Transport("connection refused".into()));
            }
            Lookup::Found(self.markets.iter().map(|m| m.key().clone()).collect())
        }

        async fn last_price(&self, market: &MarketId) -> Lookup<Decimal> {
            self.price_calls.fetch_add(1, Ordering::SeqCst);
            self.prices
                .get(market.as_str())
                .map(|p| p.clone())
                .unwrap_or(Lookup::NotAvailable(Unavailable::Status(404)))
        }
    }
}

//! Shared application state.

use std::sync::Arc;

use fiatbridge_router::{ConversionRouter, MarketSource, RouterConfig};

use crate::metrics::Metrics;

/// State shared by every request handler.
pub struct AppState {
    pub router: ConversionRouter,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(source: Arc<dyn MarketSource>, config: RouterConfig) -> Self {
        Self {
            router: ConversionRouter::new(source, config),
            metrics: Metrics::new(),
        }
    }
}

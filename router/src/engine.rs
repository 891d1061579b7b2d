//! Main conversion routing engine.

use std::sync::Arc;

use fiatbridge_common::{AssetCode, FiatCode, FiatSet, MarketId};
use futures::stream::{self, StreamExt};
use rust_decimal::Decimal;
use tracing::{debug, info, instrument};

use crate::conversion::{
    price_legs, round_amount, select_best, CandidateOutcome, CandidateStatus, ConversionResult,
    RouteReport,
};
use crate::lookup::Lookup;
use crate::resolver::MarketCatalogResolver;
use crate::source::MarketSource;

/// Configuration for the conversion router.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Fiat currencies considered when discovering intermediaries.
    pub fiats: FiatSet,
    /// Number of candidates priced at the same time. `1` prices them one by one.
    pub price_concurrency: usize,
    /// Answer `from == to` with the unchanged amount instead of routing it.
    pub same_currency_passthrough: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            fiats: FiatSet::default(),
            price_concurrency: 8,
            same_currency_passthrough: false,
        }
    }
}

/// Finds the intermediary asset giving the best fiat-to-fiat conversion.
///
/// Every call fetches the catalog and all prices fresh; nothing is cached
/// between calls.
pub struct ConversionRouter {
    source: Arc<dyn MarketSource>,
    resolver: MarketCatalogResolver,
    config: RouterConfig,
}

impl ConversionRouter {
    /// Create a new router over the given market source.
    pub fn new(source: Arc<dyn MarketSource>, config: RouterConfig) -> Self {
        Self {
            resolver: MarketCatalogResolver::new(source.clone(), config.fiats.clone()),
            source,
            config,
        }
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Name of the underlying market source.
    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// Most recent trade price for a market, or why it is missing.
    pub async fn fetch_last_price(&self, market: &MarketId) -> Lookup<Decimal> {
        self.source.last_price(market).await
    }

    /// Best conversion of `amount` from one fiat to another, if any path is priced.
    pub async fn get_best_conversion(
        &self,
        from: &FiatCode,
        to: &FiatCode,
        amount: Decimal,
    ) -> Option<ConversionResult> {
        self.evaluate(from, to, amount).await.best
    }

    /// Evaluate every candidate and report each outcome alongside the best one.
    #[instrument(skip_all, fields(from = %from, to = %to, amount = %amount))]
    pub async fn evaluate(&self, from: &FiatCode, to: &FiatCode, amount: Decimal) -> RouteReport {
        let mut report = RouteReport::new(from.clone(), to.clone(), amount);

        if self.config.same_currency_passthrough && from == to {
            report.best = Some(ConversionResult {
                converted_amount: round_amount(amount),
                intermediate_asset: AssetCode::new(from.code()),
            });
            debug!(report_id = %report.id, "Same currency passthrough");
            return report;
        }

        let candidates = match self.resolver.try_resolve().await {
            Lookup::Found(candidates) => candidates,
            Lookup::NotAvailable(reason) => {
                info!(report_id = %report.id, reason = %reason, "No conversion path found");
                report.catalog_error = Some(reason);
                return report;
            }
        };

        report.candidates = stream::iter(candidates)
            .map(|asset| self.price_candidate(asset, from, to, amount))
            .buffered(self.config.price_concurrency.max(1))
            .collect()
            .await;

        report.best = select_best(&report.candidates);

        match &report.best {
            Some(best) => info!(
                report_id = %report.id,
                intermediate = %best.intermediate_asset,
                converted_amount = %best.converted_amount,
                candidates = report.candidates.len(),
                priced = report.priced_count(),
                "Conversion path selected"
            ),
            None => info!(
                report_id = %report.id,
                candidates = report.candidates.len(),
                "No conversion path found"
            ),
        }

        report
    }

    async fn price_candidate(
        &self,
        asset: AssetCode,
        from: &FiatCode,
        to: &FiatCode,
        amount: Decimal,
    ) -> CandidateOutcome {
        let buy_market = MarketId::new(&asset, from);
        let sell_market = MarketId::new(&asset, to);

        let (buy, sell) = futures::join!(
            self.fetch_last_price(&buy_market),
            self.fetch_last_price(&sell_market)
        );

        let status = match price_legs(amount, buy, sell) {
            Ok(status) => status,
            Err(reason) => {
                debug!(asset = %asset, reason = %reason, "Skipping candidate");
                CandidateStatus::Skipped { reason }
            }
        };

        CandidateOutcome {
            asset,
            buy_market,
            sell_market,
            status,
        }
    }
}

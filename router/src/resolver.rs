//! Discovery of intermediary assets from the venue's market catalog.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use fiatbridge_common::{AssetCode, FiatCode, FiatSet, MarketPair};
use tracing::{debug, instrument, warn};

use crate::error::Unavailable;
use crate::lookup::Lookup;
use crate::source::MarketSource;

/// Minimum number of distinct fiat pairings an asset needs to be a candidate.
pub const MIN_FIAT_PAIRINGS: usize = 2;

/// Resolves which assets can bridge two supported fiat currencies.
pub struct MarketCatalogResolver {
    source: Arc<dyn MarketSource>,
    fiats: FiatSet,
}

impl MarketCatalogResolver {
    pub fn new(source: Arc<dyn MarketSource>, fiats: FiatSet) -> Self {
        Self { source, fiats }
    }

    /// Fetch the catalog once and return the candidates, or why there are none.
    #[instrument(skip(self), fields(source = self.source.name()))]
    pub async fn try_resolve(&self) -> Lookup<Vec<AssetCode>> {
        let ids = match self.source.list_markets().await {
            Lookup::Found(ids) => ids,
            Lookup::NotAvailable(reason) => return Lookup::NotAvailable(reason),
        };

        let candidates = intermediaries(&ids, &self.fiats);
        debug!(
            markets = ids.len(),
            candidates = candidates.len(),
            "Resolved intermediary candidates"
        );

        if candidates.is_empty() {
            Lookup::NotAvailable(Unavailable::NoCandidates)
        } else {
            Lookup::Found(candidates)
        }
    }

    /// Candidate assets in code order; empty when the catalog is unavailable.
    pub async fn resolve_intermediaries(&self) -> Vec<AssetCode> {
        match self.try_resolve().await {
            Lookup::Found(candidates) => candidates,
            Lookup::NotAvailable(reason) => {
                warn!(error = %reason, "No intermediary candidates available");
                Vec::new()
            }
        }
    }
}

/// Group market ids by non-fiat asset and keep assets paired with at least
/// [`MIN_FIAT_PAIRINGS`] distinct supported fiats.
///
/// Pairs where both or neither side is a supported fiat are ignored, as are
/// ids that are not `base-quote` shaped. Output is sorted by asset code.
pub fn intermediaries<S: AsRef<str>>(market_ids: &[S], fiats: &FiatSet) -> Vec<AssetCode> {
    let mut pairings: BTreeMap<AssetCode, BTreeSet<FiatCode>> = BTreeMap::new();

    for id in market_ids {
        let pair = match MarketPair::parse(id.as_ref()) {
            Ok(pair) => pair,
            Err(e) => {
                debug!(error = %e, "Skipping market");
                continue;
            }
        };

        if let Some((asset, fiat)) = pair.fiat_leg(fiats) {
            pairings.entry(asset).or_default().insert(fiat);
        }
    }

    pairings
        .into_iter()
        .filter(|(_, fiats)| fiats.len() >= MIN_FIAT_PAIRINGS)
        .map(|(asset, _)| asset)
        .collect()
}

//! Market pair and market identifier types.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::codes::{AssetCode, FiatCode, FiatSet};
use crate::error::{CommonError, Result};

/// A tradable pairing published by the venue, e.g. `BTC-CLP`.
///
/// Both sides are stored uppercase; whether either side is fiat depends
/// on the deployment's [`FiatSet`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarketPair {
    /// Base instrument.
    pub base: String,
    /// Quote instrument.
    pub quote: String,
}

impl MarketPair {
    /// Create a new pair.
    pub fn new(base: impl Into<String>, quote: impl Into<String>) -> Self {
        Self {
            base: base.into().to_uppercase(),
            quote: quote.into().to_uppercase(),
        }
    }

    /// Parse the venue's composite `base-quote` id (case-insensitive).
    pub fn parse(id: &str) -> Result<Self> {
        let mut parts = id.trim().split('-');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(base), Some(quote), None) if !base.is_empty() && !quote.is_empty() => {
                Ok(Self::new(base, quote))
            }
            _ => Err(CommonError::InvalidMarketId(id.to_string())),
        }
    }

    /// Split the pair into its non-fiat asset and the fiat it trades against.
    ///
    /// Returns `None` when both sides or neither side are supported fiats.
    pub fn fiat_leg(&self, fiats: &FiatSet) -> Option<(AssetCode, FiatCode)> {
        let base_fiat = fiats.contains(&self.base);
        let quote_fiat = fiats.contains(&self.quote);

        match (base_fiat, quote_fiat) {
            (true, false) => Some((AssetCode::new(&*self.quote), FiatCode::new(&*self.base))),
            (false, true) => Some((AssetCode::new(&*self.base), FiatCode::new(&*self.quote))),
            _ => None,
        }
    }
}

impl fmt::Display for MarketPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.base, self.quote)
    }
}

/// Lowercase `{asset}-{fiat}` id used to address a market's ticker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarketId(String);

impl MarketId {
    /// Build the ticker address for an asset priced in a fiat.
    pub fn new(asset: &AssetCode, fiat: &FiatCode) -> Self {
        Self(format!("{}-{}", asset.to_venue(), fiat.to_venue()))
    }

    /// Use a raw id as given, lowercased.
    pub fn raw(id: impl Into<String>) -> Self {
        Self(id.into().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MarketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_market_pair() {
        let pair = MarketPair::parse("btc-clp").unwrap();
        assert_eq!(pair.base, "BTC");
        assert_eq!(pair.quote, "CLP");
        assert_eq!(pair.to_string(), "BTC-CLP");
    }

    #[test]
    fn test_parse_rejects_malformed_ids() {
        assert!(MarketPair::parse("btcclp").is_err());
        assert!(MarketPair::parse("btc-clp-usd").is_err());
        assert!(MarketPair::parse("-clp").is_err());
        assert!(MarketPair::parse("").is_err());
    }

    #[test]
    fn test_fiat_leg_classification() {
        let fiats = FiatSet::default();

        let (asset, fiat) = MarketPair::new("btc", "clp").fiat_leg(&fiats).unwrap();
        assert_eq!(asset, AssetCode::new("BTC"));
        assert_eq!(fiat, FiatCode::clp());

        // Fiat on the base side.
        let (asset, fiat) = MarketPair::new("PEN", "USDC").fiat_leg(&fiats).unwrap();
        assert_eq!(asset, AssetCode::new("USDC"));
        assert_eq!(fiat, FiatCode::pen());

        assert!(MarketPair::new("COP", "CLP").fiat_leg(&fiats).is_none());
        assert!(MarketPair::new("ETH", "BTC").fiat_leg(&fiats).is_none());
    }

    #[test]
    fn test_market_id_is_lowercase() {
        let id = MarketId::new(&AssetCode::new("BTC"), &FiatCode::cop());
        assert_eq!(id.as_str(), "btc-cop");
        assert_eq!(MarketId::raw("ETH-PEN").as_str(), "eth-pen");
    }
}

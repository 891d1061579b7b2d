//! Conversion result and route report types.

use chrono::{DateTime, Utc};
use fiatbridge_common::{AssetCode, FiatCode, MarketId};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{Leg, SkipReason, Unavailable};
use crate::lookup::Lookup;

/// Decimal places of a converted amount.
pub const AMOUNT_DECIMALS: u32 = 2;

/// Best conversion found for a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionResult {
    /// Amount in the target fiat, rounded half-to-even to two places.
    pub converted_amount: Decimal,
    /// Asset the conversion was routed through.
    #[serde(rename = "intermediate_currency")]
    pub intermediate_asset: AssetCode,
}

/// Round a converted amount to [`AMOUNT_DECIMALS`] places, ties to even.
pub fn round_amount(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(AMOUNT_DECIMALS, RoundingStrategy::MidpointNearestEven)
}

/// `round(amount / buy_price * sell_price)`, or `None` on decimal overflow or
/// a zero buy price.
pub fn convert_through(amount: Decimal, buy_price: Decimal, sell_price: Decimal) -> Option<Decimal> {
    amount
        .checked_div(buy_price)?
        .checked_mul(sell_price)
        .map(round_amount)
}

/// Parse a plain or scientific decimal literal such as `"10000.0"` or `"1.5e-3"`.
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

/// Price both legs of a candidate, or explain why it cannot be used.
pub fn price_legs(
    amount: Decimal,
    buy: Lookup<Decimal>,
    sell: Lookup<Decimal>,
) -> Result<CandidateStatus, SkipReason> {
    let buy_price = positive_price(Leg::Buy, buy)?;
    let sell_price = positive_price(Leg::Sell, sell)?;
    let converted_amount =
        convert_through(amount, buy_price, sell_price).ok_or(SkipReason::Overflow)?;

    Ok(CandidateStatus::Priced {
        buy_price,
        sell_price,
        converted_amount,
    })
}

fn positive_price(leg: Leg, price: Lookup<Decimal>) -> Result<Decimal, SkipReason> {
    match price {
        Lookup::Found(price) if price > Decimal::ZERO => Ok(price),
        Lookup::Found(price) => Err(SkipReason::NonPositivePrice { leg, price }),
        Lookup::NotAvailable(reason) => Err(SkipReason::LegUnavailable { leg, reason }),
    }
}

/// Outcome of evaluating one candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CandidateStatus {
    Priced {
        buy_price: Decimal,
        sell_price: Decimal,
        converted_amount: Decimal,
    },
    Skipped {
        reason: SkipReason,
    },
}

/// One evaluated intermediary with the markets it was priced on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateOutcome {
    pub asset: AssetCode,
    pub buy_market: MarketId,
    pub sell_market: MarketId,
    #[serde(flatten)]
    pub status: CandidateStatus,
}

impl CandidateOutcome {
    /// Converted amount if the candidate was fully priced.
    pub fn converted_amount(&self) -> Option<Decimal> {
        match &self.status {
            CandidateStatus::Priced {
                converted_amount, ..
            } => Some(*converted_amount),
            CandidateStatus::Skipped { .. } => None,
        }
    }
}

/// Pick the first candidate with the strictly greatest converted amount.
///
/// Exact ties keep the earliest candidate in `outcomes` order.
pub fn select_best(outcomes: &[CandidateOutcome]) -> Option<ConversionResult> {
    let mut best: Option<ConversionResult> = None;

    for outcome in outcomes {
        let Some(amount) = outcome.converted_amount() else {
            continue;
        };

        let improves = match &best {
            None => true,
            Some(current) => amount > current.converted_amount,
        };

        if improves {
            best = Some(ConversionResult {
                converted_amount: amount,
                intermediate_asset: outcome.asset.clone(),
            });
        }
    }

    best
}

/// Diagnostic record of a single routing run.
#[derive(Debug, Clone, Serialize)]
pub struct RouteReport {
    /// Unique report ID.
    pub id: Uuid,
    pub from: FiatCode,
    pub to: FiatCode,
    pub amount: Decimal,
    /// Why the catalog produced no candidates, if it did not.
    pub catalog_error: Option<Unavailable>,
    /// Candidates in evaluation order.
    pub candidates: Vec<CandidateOutcome>,
    pub best: Option<ConversionResult>,
    pub evaluated_at: DateTime<Utc>,
}

impl RouteReport {
    /// Create a new report for a request.
    pub fn new(from: FiatCode, to: FiatCode, amount: Decimal) -> Self {
        Self {
            id: Uuid::now_v7(),
            from,
            to,
            amount,
            catalog_error: None,
            candidates: Vec::new(),
            best: None,
            evaluated_at: Utc::now(),
        }
    }

    /// Number of candidates that were fully priced.
    pub fn priced_count(&self) -> usize {
        self.candidates
            .iter()
            .filter(|c| c.converted_amount().is_some())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn outcome(asset: &str, status: CandidateStatus) -> CandidateOutcome {
        let asset = AssetCode::new(asset);
        CandidateOutcome {
            buy_market: MarketId::new(&asset, &FiatCode::clp()),
            sell_market: MarketId::new(&asset, &FiatCode::cop()),
            asset,
            status,
        }
    }

    fn priced(asset: &str, converted_amount: Decimal) -> CandidateOutcome {
        outcome(
            asset,
            CandidateStatus::Priced {
                buy_price: dec!(1),
                sell_price: dec!(1),
                converted_amount,
            },
        )
    }

    fn skipped(asset: &str) -> CandidateOutcome {
        outcome(
            asset,
            CandidateStatus::Skipped {
                reason: SkipReason::Overflow,
            },
        )
    }

    #[test]
    fn test_round_half_to_even() {
        assert_eq!(round_amount(dec!(0.125)), dec!(0.12));
        assert_eq!(round_amount(dec!(0.135)), dec!(0.14));
        assert_eq!(round_amount(dec!(2.675)), dec!(2.68));
        assert_eq!(round_amount(dec!(1.0049)), dec!(1.00));
    }

    #[test]
    fn test_convert_through() {
        assert_eq!(
            convert_through(dec!(10000), dec!(10000000), dec!(120000000)),
            Some(dec!(120000.00))
        );
        assert_eq!(
            convert_through(dec!(10000), dec!(10000000), dec!(30000)),
            Some(dec!(30.00))
        );
        assert_eq!(convert_through(dec!(1), dec!(0), dec!(1)), None);
        assert_eq!(convert_through(Decimal::MAX, dec!(0.5), dec!(2)), None);
    }

    #[test]
    fn test_price_legs_rejects_bad_legs() {
        let buy_missing = price_legs(
            dec!(100),
            Lookup::NotAvailable(Unavailable::Status(404)),
            Lookup::Found(dec!(2)),
        );
        assert_eq!(
            buy_missing,
            Err(SkipReason::LegUnavailable {
                leg: Leg::Buy,
                reason: Unavailable::Status(404),
            })
        );

        let sell_zero = price_legs(dec!(100), Lookup::Found(dec!(2)), Lookup::Found(dec!(0)));
        assert_eq!(
            sell_zero,
            Err(SkipReason::NonPositivePrice {
                leg: Leg::Sell,
                price: dec!(0),
            })
        );

        let buy_negative = price_legs(dec!(100), Lookup::Found(dec!(-1)), Lookup::Found(dec!(2)));
        assert!(matches!(
            buy_negative,
            Err(SkipReason::NonPositivePrice { leg: Leg::Buy, .. })
        ));
    }

    #[test]
    fn test_select_best_strictly_greater() {
        let outcomes = vec![
            skipped("ADA"),
            priced("BTC", dec!(500.00)),
            priced("ETH", dec!(750.10)),
            priced("LTC", dec!(750.10)),
            skipped("XRP"),
        ];

        let best = select_best(&outcomes).unwrap();
        assert_eq!(best.intermediate_asset, AssetCode::new("ETH"));
        assert_eq!(best.converted_amount, dec!(750.10));
    }

    #[test]
    fn test_select_best_none_when_all_skipped() {
        assert_eq!(select_best(&[]), None);
        assert_eq!(select_best(&[skipped("BTC"), skipped("ETH")]), None);
    }

    #[test]
    fn test_conversion_result_wire_format() {
        let result = ConversionResult {
            converted_amount: dec!(120000.00),
            intermediate_asset: AssetCode::new("BTC"),
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "converted_amount": 120000.0, "intermediate_currency": "BTC" })
        );
    }

    fn leg_price() -> impl Strategy<Value = Option<i64>> {
        prop::option::weighted(0.8, -5i64..1_000_000)
    }

    proptest! {
        #[test]
        fn prop_best_is_max_over_valid_candidates(
            amount in 0i64..10_000_000,
            legs in prop::collection::vec((leg_price(), leg_price()), 0..12),
        ) {
            let amount = Decimal::from(amount);
            let outcomes: Vec<CandidateOutcome> = legs
                .iter()
                .enumerate()
                .map(|(i, (buy, sell))| {
                    let lookup = |p: &Option<i64>| match p {
                        Some(p) => Lookup::Found(Decimal::from(*p)),
                        None => Lookup::NotAvailable(Unavailable::Status(404)),
                    };
                    let status = match price_legs(amount, lookup(buy), lookup(sell)) {
                        Ok(status) => status,
                        Err(reason) => CandidateStatus::Skipped { reason },
                    };
                    outcome(&format!("A{}", i), status)
                })
                .collect();

            let expected = legs
                .iter()
                .filter_map(|(buy, sell)| match (buy, sell) {
                    (Some(b), Some(s)) if *b > 0 && *s > 0 => {
                        convert_through(amount, Decimal::from(*b), Decimal::from(*s))
                    }
                    _ => None,
                })
                .max();

            let best = select_best(&outcomes);
            prop_assert_eq!(best.as_ref().map(|b| b.converted_amount), expected);

            if let Some(best) = best {
                let chosen = outcomes
                    .iter()
                    .find(|o| o.asset == best.intermediate_asset)
                    .and_then(CandidateOutcome::converted_amount);
                prop_assert_eq!(chosen, Some(best.converted_amount));
            }
        }
    }
}

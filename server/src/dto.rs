//! Request validation and response shapes of the HTTP API.

use std::collections::BTreeMap;

use fiatbridge_common::FiatCode;
use fiatbridge_router::conversion::parse_decimal;
use fiatbridge_router::ConversionResult;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Field name to validation messages, returned as a 400 body.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

const REQUIRED: &str = "This field is required.";
const BLANK: &str = "This field may not be blank.";
const NOT_A_STRING: &str = "Not a valid string.";
const BAD_CODE: &str = "Not a valid currency code.";
const NOT_A_NUMBER: &str = "A valid number is required.";
const NEGATIVE: &str = "Ensure this value is greater than or equal to 0.";
const OUT_OF_RANGE: &str = "Ensure this value is within the supported range.";

/// Raw conversion request as received; every field is checked by [`ConvertRequest::validate`].
#[derive(Debug, Default, Deserialize)]
pub struct ConvertRequest {
    #[serde(default)]
    pub from_currency: Option<Value>,
    #[serde(default)]
    pub to_currency: Option<Value>,
    #[serde(default)]
    pub amount: Option<Value>,
}

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedConversion {
    pub from: FiatCode,
    pub to: FiatCode,
    pub amount: Decimal,
}

impl ConvertRequest {
    /// Check every field, collecting all failures.
    pub fn validate(self) -> Result<ValidatedConversion, FieldErrors> {
        let mut errors = FieldErrors::new();

        let from = currency_field("from_currency", self.from_currency, &mut errors);
        let to = currency_field("to_currency", self.to_currency, &mut errors);
        let amount = amount_field("amount", self.amount, &mut errors);

        match (from, to, amount) {
            (Some(from), Some(to), Some(amount)) => Ok(ValidatedConversion { from, to, amount }),
            _ => Err(errors),
        }
    }
}

fn reject<T>(errors: &mut FieldErrors, field: &str, message: &str) -> Option<T> {
    errors
        .entry(field.to_string())
        .or_default()
        .push(message.to_string());
    None
}

fn currency_field(field: &str, value: Option<Value>, errors: &mut FieldErrors) -> Option<FiatCode> {
    match value {
        None => reject(errors, field, REQUIRED),
        Some(Value::String(s)) if s.trim().is_empty() => reject(errors, field, BLANK),
        Some(Value::String(s)) => match FiatCode::parse(&s) {
            Ok(code) => Some(code),
            Err(_) => reject(errors, field, BAD_CODE),
        },
        Some(_) => reject(errors, field, NOT_A_STRING),
    }
}

fn amount_field(field: &str, value: Option<Value>, errors: &mut FieldErrors) -> Option<Decimal> {
    let raw = match value {
        None => return reject(errors, field, REQUIRED),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) => s,
        Some(_) => return reject(errors, field, NOT_A_NUMBER),
    };

    match parse_decimal(&raw) {
        // Finite but not representable as a Decimal, e.g. 1e30 or 1e-30.
        None if raw.trim().parse::<f64>().is_ok_and(f64::is_finite) => {
            reject(errors, field, OUT_OF_RANGE)
        }
        None => reject(errors, field, NOT_A_NUMBER),
        Some(amount) if amount.is_sign_negative() && !amount.is_zero() => {
            reject(errors, field, NEGATIVE)
        }
        Some(amount) => Some(amount),
    }
}

/// Example request body shown in the API document.
#[derive(Debug, Serialize, ToSchema)]
pub struct ConvertRequestDoc {
    /// Source fiat currency.
    #[schema(example = "CLP")]
    pub from_currency: String,
    /// Target fiat currency.
    #[schema(example = "PEN")]
    pub to_currency: String,
    /// Amount to convert.
    #[schema(example = 10000.0)]
    pub amount: f64,
}

/// Successful conversion response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ConvertResponse {
    /// Amount in the target currency, two decimals.
    #[schema(value_type = f64, example = 30.0)]
    pub converted_amount: Decimal,
    /// Crypto asset used as intermediary.
    #[schema(example = "BTC")]
    pub intermediate_currency: String,
}

impl From<ConversionResult> for ConvertResponse {
    fn from(result: ConversionResult) -> Self {
        Self {
            converted_amount: result.converted_amount,
            intermediate_currency: result.intermediate_asset.to_string(),
        }
    }
}

/// Liveness response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: String,
    /// Market source the service routes over.
    #[schema(example = "buda")]
    pub source: String,
    /// Configured fiat currencies.
    #[schema(example = json!(["CLP", "COP", "PEN"]))]
    pub fiats: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn request(body: Value) -> ConvertRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_valid_request() {
        let valid = request(json!({ "from_currency": "clp", "to_currency": "COP", "amount": 10000 }))
            .validate()
            .unwrap();

        assert_eq!(valid.from, FiatCode::clp());
        assert_eq!(valid.to, FiatCode::cop());
        assert_eq!(valid.amount, dec!(10000));
    }

    #[test]
    fn test_numeric_string_and_fraction_amounts() {
        let valid = request(json!({ "from_currency": "CLP", "to_currency": "PEN", "amount": "2500.75" }))
            .validate()
            .unwrap();
        assert_eq!(valid.amount, dec!(2500.75));

        let valid = request(json!({ "from_currency": "CLP", "to_currency": "PEN", "amount": 0.1 }))
            .validate()
            .unwrap();
        assert_eq!(valid.amount, dec!(0.1));
    }

    #[test]
    fn test_missing_field() {
        let errors = request(json!({ "from_currency": "CLP", "amount": 10000 }))
            .validate()
            .unwrap_err();

        assert_eq!(errors.len(), 1);
        assert_eq!(errors["to_currency"], vec![REQUIRED.to_string()]);
    }

    #[test]
    fn test_invalid_amount() {
        let errors = request(json!({ "from_currency": "CLP", "to_currency": "COP", "amount": "abc" }))
            .validate()
            .unwrap_err();
        assert_eq!(errors["amount"], vec![NOT_A_NUMBER.to_string()]);

        let errors = request(json!({ "from_currency": "CLP", "to_currency": "COP", "amount": -5 }))
            .validate()
            .unwrap_err();
        assert_eq!(errors["amount"], vec![NEGATIVE.to_string()]);

        let errors = request(json!({ "from_currency": "CLP", "to_currency": "COP", "amount": true }))
            .validate()
            .unwrap_err();
        assert_eq!(errors["amount"], vec![NOT_A_NUMBER.to_string()]);

        for amount in [json!(1e30), json!(1e-30), json!("1e30")] {
            let errors = request(json!({ "from_currency": "CLP", "to_currency": "COP", "amount": amount }))
                .validate()
                .unwrap_err();
            assert_eq!(errors["amount"], vec![OUT_OF_RANGE.to_string()]);
        }

        let errors = request(json!({ "from_currency": "CLP", "to_currency": "COP", "amount": "inf" }))
            .validate()
            .unwrap_err();
        assert_eq!(errors["amount"], vec![NOT_A_NUMBER.to_string()]);
    }

    #[test]
    fn test_collects_every_field_error() {
        let errors = request(json!({ "from_currency": " ", "to_currency": 12, "amount": null }))
            .validate()
            .unwrap_err();

        assert_eq!(errors["from_currency"], vec![BLANK.to_string()]);
        assert_eq!(errors["to_currency"], vec![NOT_A_STRING.to_string()]);
        assert_eq!(errors["amount"], vec![REQUIRED.to_string()]);
    }

    #[test]
    fn test_currency_code_must_be_alphanumeric() {
        let errors = request(json!({ "from_currency": "../clp", "to_currency": "COP", "amount": 1 }))
            .validate()
            .unwrap_err();
        assert_eq!(errors["from_currency"], vec![BAD_CODE.to_string()]);
    }

    #[test]
    fn test_response_from_result() {
        let response = ConvertResponse::from(ConversionResult {
            converted_amount: dec!(30.00),
            intermediate_asset: "btc".into(),
        });

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({ "converted_amount": 30.0, "intermediate_currency": "BTC" })
        );
    }
}

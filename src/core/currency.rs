//! Currency conversion over a rate table

use crate::core::rates::{RateTable, decimal_from_json};
use rust_decimal::Decimal;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::{error, info, instrument};

/// Separator between source and target codes in a pair key.
pub const PAIR_SEPARATOR: &str = "_TO_";

/// Builds the table key for a directed pair. Codes are used verbatim.
pub fn pair_key(source: &str, target: &str) -> String {
    format!("{source}{PAIR_SEPARATOR}{target}")
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionRequest {
    pub source_currency: String,
    pub target_currency: String,
    #[serde(
        serialize_with = "rust_decimal::serde::arbitrary_precision::serialize",
        deserialize_with = "amount_from_number"
    )]
    pub amount: Decimal,
}

// Amounts must be JSON numbers; quoted values are rejected.
fn amount_from_number<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let number = serde_json::Number::deserialize(deserializer)?;
    decimal_from_json(&number)
        .ok_or_else(|| D::Error::custom(format!("amount {number} is out of range")))
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResult {
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub exchange_rate: Decimal,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub converted_amount: Decimal,
}

#[derive(Debug, Error, PartialEq)]
pub enum ConversionError {
    #[error("Unsupported currency pair")]
    UnsupportedPair { from: String, to: String },

    #[error("Oops! something went wrong during conversion...")]
    InternalFailure(String),
}

/// Converts `request.amount` using the rate for its pair.
///
/// The product keeps full decimal precision; rounding is left to callers.
#[instrument(
    name = "Convert",
    skip(table, request),
    fields(source = %request.source_currency, target = %request.target_currency)
)]
pub fn convert(
    table: &RateTable,
    request: &ConversionRequest,
) -> Result<ConversionResult, ConversionError> {
    let key = pair_key(&request.source_currency, &request.target_currency);

    let Some(exchange_rate) = table.get(&key) else {
        error!(
            source_currency = %request.source_currency,
            target_currency = %request.target_currency,
            "Unsupported currency pair"
        );
        return Err(ConversionError::UnsupportedPair {
            from: request.source_currency.clone(),
            to: request.target_currency.clone(),
        });
    };

    let converted_amount = request.amount.checked_mul(exchange_rate).ok_or_else(|| {
        let detail = format!("{} * {exchange_rate} overflows", request.amount);
        error!(pair = %key, error = %detail, "Exception occurred during currency conversion");
        ConversionError::InternalFailure(detail)
    })?;

    info!(
        pair = %key,
        amount = %request.amount,
        %converted_amount,
        "Successfully converted the currency"
    );
    Ok(ConversionResult {
        exchange_rate,
        converted_amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rates::{BaseRates, build_rate_table};
    use rust_decimal_macros::dec;

    fn sample_table(usd_to_inr_override: Option<&str>) -> RateTable {
        let base = BaseRates::from([
            ("USD_TO_INR".to_string(), dec!(74.00)),
            ("INR_TO_USD".to_string(), dec!(0.013)),
        ]);
        let usd_to_inr_override = usd_to_inr_override.map(str::to_string);
        build_rate_table(base, move |key| {
            (key == "USD_TO_INR")
                .then(|| usd_to_inr_override.clone())
                .flatten()
        })
    }

    fn request(source: &str, target: &str, amount: Decimal) -> ConversionRequest {
        ConversionRequest {
            source_currency: source.to_string(),
            target_currency: target.to_string(),
            amount,
        }
    }

    #[test]
    fn test_pair_key() {
        assert_eq!(pair_key("USD", "INR"), "USD_TO_INR");
        assert_eq!(pair_key("usd", "INR"), "usd_TO_INR");
    }

    #[test]
    fn test_convert_with_overridden_rate() {
        let table = sample_table(Some("81.00"));
        let result = convert(&table, &request("USD", "INR", dec!(100))).unwrap();

        assert_eq!(result.exchange_rate, dec!(81.00));
        assert_eq!(result.converted_amount, dec!(8100.00));
    }

    #[test]
    fn test_convert_with_base_rate() {
        let table = sample_table(None);
        let result = convert(&table, &request("INR", "USD", dec!(1000))).unwrap();

        assert_eq!(result.exchange_rate, dec!(0.013));
        assert_eq!(result.converted_amount, dec!(13.00));
    }

    #[test]
    fn test_convert_unparsable_override_uses_base_rate() {
        let table = sample_table(Some("notanumber"));
        let result = convert(&table, &request("USD", "INR", dec!(2))).unwrap();

        assert_eq!(result.exchange_rate, dec!(74.00));
        assert_eq!(result.converted_amount, dec!(148.00));
    }

    #[test]
    fn test_convert_keeps_full_precision() {
        let table = sample_table(None);
        let result = convert(&table, &request("INR", "USD", dec!(123.4567))).unwrap();

        assert_eq!(result.converted_amount, dec!(1.6049371));
        assert_eq!(result.converted_amount.to_string(), "1.6049371");
    }

    #[test]
    fn test_convert_zero_amount() {
        let table = sample_table(None);
        let result = convert(&table, &request("USD", "INR", Decimal::ZERO)).unwrap();
        assert!(result.converted_amount.is_zero());
    }

    #[test]
    fn test_convert_unsupported_pair() {
        let table = sample_table(None);
        let result = convert(&table, &request("EUR", "GBP", dec!(100)));

        assert_eq!(
            result,
            Err(ConversionError::UnsupportedPair {
                from: "EUR".to_string(),
                to: "GBP".to_string(),
            })
        );
    }

    #[test]
    fn test_convert_does_not_derive_inverse_or_normalize_case() {
        let base = BaseRates::from([("USD_TO_INR".to_string(), dec!(74))]);
        let table = build_rate_table(base, |_| None);

        assert!(convert(&table, &request("INR", "USD", dec!(1))).is_err());
        assert!(convert(&table, &request("usd", "inr", dec!(1))).is_err());
    }

    #[test]
    fn test_convert_on_empty_table() {
        let table = RateTable::default();
        let result = convert(&table, &request("USD", "INR", dec!(1)));
        assert!(matches!(result, Err(ConversionError::UnsupportedPair { .. })));
    }

    #[test]
    fn test_convert_overflow_is_internal_failure() {
        let base = BaseRates::from([("USD_TO_INR".to_string(), dec!(1000))]);
        let table = build_rate_table(base, |_| None);
        let result = convert(&table, &request("USD", "INR", Decimal::MAX));

        let err = result.unwrap_err();
        assert!(matches!(err, ConversionError::InternalFailure(_)));
        assert_eq!(
            err.to_string(),
            "Oops! something went wrong during conversion..."
        );
    }

    #[test]
    fn test_convert_is_idempotent() {
        let table = sample_table(Some("81.00"));
        let req = request("USD", "INR", dec!(42.5));

        assert_eq!(convert(&table, &req), convert(&table, &req));
    }

    #[test]
    fn test_request_deserializes_camel_case_json() {
        let json = r#"{"sourceCurrency": "USD", "targetCurrency": "INR", "amount": 100.25}"#;
        let req: ConversionRequest = serde_json::from_str(json).unwrap();

        assert_eq!(req.source_currency, "USD");
        assert_eq!(req.target_currency, "INR");
        assert_eq!(req.amount.to_string(), "100.25");
    }

    #[test]
    fn test_request_rejects_quoted_amount() {
        let json = r#"{"sourceCurrency": "USD", "targetCurrency": "INR", "amount": "100"}"#;
        assert!(serde_json::from_str::<ConversionRequest>(json).is_err());
    }

    #[test]
    fn test_request_accepts_exponent_amount() {
        let json = r#"{"sourceCurrency": "USD", "targetCurrency": "INR", "amount": 1.5e2}"#;
        let req: ConversionRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.amount, dec!(150));
    }

    #[test]
    fn test_request_rejects_out_of_range_amount() {
        let json = r#"{"sourceCurrency": "USD", "targetCurrency": "INR", "amount": 1e40}"#;
        let err = serde_json::from_str::<ConversionRequest>(json).unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn test_request_requires_all_fields() {
        let json = r#"{"sourceCurrency": "USD", "targetCurrency": "INR"}"#;
        assert!(serde_json::from_str::<ConversionRequest>(json).is_err());
    }

    #[test]
    fn test_result_serializes_exact_numbers() {
        let result = ConversionResult {
            exchange_rate: dec!(0.013),
            converted_amount: dec!(13.000),
        };
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"exchangeRate":0.013,"convertedAmount":13.000}"#);
    }
}

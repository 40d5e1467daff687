//! Rounding applied at persistence and serialization boundaries.
//!
//! Calculations keep full precision; only these helpers cut values to
//! [`DISPLAY_DECIMAL_PRECISION`] places.

use num_traits::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

use crate::constants::DISPLAY_DECIMAL_PRECISION;

pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp(DISPLAY_DECIMAL_PRECISION)
}

/// Rounds a ledger float to two places.
pub fn round_f64(value: f64) -> f64 {
    match Decimal::from_f64(value) {
        Some(d) => round_money(d).to_f64().unwrap_or(value),
        None => value,
    }
}

pub fn round_opt_f64(value: Option<f64>) -> Option<f64> {
    value.map(round_f64)
}

/// `serialize_with` helper writing a decimal rounded to two places.
pub fn serialize_money<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    Serialize::serialize(&round_money(*value), serializer)
}

pub fn serialize_opt_money<S>(value: &Option<Decimal>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    value.map(round_money).serialize(serializer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_money_keeps_two_places() {
        assert_eq!(round_money(dec!(95.238095238)), dec!(95.24));
        assert_eq!(round_money(dec!(105)), dec!(105));
        assert_eq!(round_money(dec!(-0.047619)), dec!(-0.05));
    }

    #[test]
    fn test_round_f64() {
        assert_eq!(round_f64(101.456), 101.46);
        assert_eq!(round_f64(7.0), 7.0);
        assert!(round_f64(f64::NAN).is_nan());
    }

    #[test]
    fn test_serialize_money_rounds_on_the_wire() {
        #[derive(Serialize)]
        struct Row {
            #[serde(serialize_with = "serialize_money")]
            value: Decimal,
        }
        let json = serde_json::to_string(&Row {
            value: dec!(95.238095),
        })
        .unwrap();
        assert_eq!(json, r#"{"value":95.24}"#);
    }
}

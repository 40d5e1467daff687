use chrono::NaiveDate;
use num_traits::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::RowError;
use crate::tabular::{FieldKind, FieldSpec, FromRecord, Record};
use crate::utils::money::serialize_money;

/// One dividend disbursement as read from the dividends sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DividendRecord {
    pub ticker: String,
    pub sector: String,
    pub date_of_disbur: Option<NaiveDate>,
    #[serde(serialize_with = "serialize_money")]
    pub amount: Decimal,
}

impl FromRecord for DividendRecord {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("ticker", FieldKind::Symbol),
        FieldSpec::new("sector", FieldKind::Text),
        FieldSpec::new("date_of_disbur", FieldKind::Date),
        FieldSpec::new("amount", FieldKind::Number),
    ];

    fn from_record(record: &Record) -> Result<Self, RowError> {
        let ticker = record.text("ticker");
        if ticker.is_empty() {
            return Err(RowError::MissingText { column: "ticker" });
        }
        let amount = Decimal::from_f64(record.number("amount"))
            .ok_or(RowError::NonFiniteNumber { column: "amount" })?;
        Ok(DividendRecord {
            ticker: ticker.to_string(),
            sector: record.text("sector").to_string(),
            date_of_disbur: record.date("date_of_disbur"),
            amount,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DividendByTicker {
    pub ticker: String,
    #[serde(serialize_with = "serialize_money")]
    pub total_amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DividendByYear {
    pub year: i32,
    #[serde(serialize_with = "serialize_money")]
    pub total_amount: Decimal,
}

/// Everything the dividends page shows, in one payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DividendSummary {
    pub raw_data: Vec<DividendRecord>,
    pub chart_data: Vec<DividendByTicker>,
    pub dividends_by_year: Vec<DividendByYear>,
    #[serde(serialize_with = "serialize_money")]
    pub total_dividend_earned: Decimal,
}

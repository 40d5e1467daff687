use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Decimal precision for persisted and displayed money and index values
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Index value assigned to the first snapshot and to a rebuilt portfolio
pub const INDEX_BASE_VALUE: Decimal = dec!(100);

/// Share of today's net cash flow assumed invested over the day (midpoint convention)
pub const CASH_FLOW_WEIGHT: Decimal = dec!(0.5);

/// Trade type written for realised trades
pub const TRADE_TYPE_SELL: &str = "SELL";

/// Note stored on a realised trade when the caller supplies none
pub const DEFAULT_SELL_NOTE: &str = "Sold from Open Positions (Excel Source)";

/// Date format for stored and serialized calendar dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

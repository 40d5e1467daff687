use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use chrono_tz::Tz;

/// Default timezone for deriving the business date.
pub const DEFAULT_VALUATION_TZ: Tz = chrono_tz::UTC;

/// Converts a UTC instant to a business date in the given timezone.
///
/// This is the single source of truth for converting instants to domain dates.
pub fn valuation_date_from_utc(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// Today's business date in the given timezone.
pub fn valuation_date_today(tz: Tz) -> NaiveDate {
    valuation_date_from_utc(Utc::now(), tz)
}

/// Snapshots are only taken Monday through Friday.
pub fn is_trading_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_weekend_is_not_a_trading_day() {
        // 2024-06-08 is a Saturday
        let saturday = NaiveDate::from_ymd_opt(2024, 6, 8).unwrap();
        let sunday = NaiveDate::from_ymd_opt(2024, 6, 9).unwrap();
        let monday = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let friday = NaiveDate::from_ymd_opt(2024, 6, 7).unwrap();

        assert!(!is_trading_day(saturday));
        assert!(!is_trading_day(sunday));
        assert!(is_trading_day(monday));
        assert!(is_trading_day(friday));
    }

    #[test]
    fn test_valuation_date_respects_timezone() {
        // 20:00 UTC on a Friday is already Saturday in Kolkata
        let instant = Utc.with_ymd_and_hms(2024, 6, 7, 20, 0, 0).unwrap();
        assert_eq!(
            valuation_date_from_utc(instant, chrono_tz::UTC),
            NaiveDate::from_ymd_opt(2024, 6, 7).unwrap()
        );
        assert_eq!(
            valuation_date_from_utc(instant, chrono_tz::Asia::Kolkata),
            NaiveDate::from_ymd_opt(2024, 6, 8).unwrap()
        );
    }
}

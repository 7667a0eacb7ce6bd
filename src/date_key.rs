//! UTC calendar-day keys.
//!
//! A date key is the canonical `YYYY-MM-DD` string for a UTC calendar day.
//! It partitions all per-day state (pin, histogram, guess buckets) and must
//! stay consistent with the day-number arithmetic used by the daily
//! selector: `day_number` for a key equals `floor(epoch_ms / 86_400_000)`
//! at that day's UTC midnight.

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};

/// 1970-01-01, the day-number origin.
fn epoch() -> NaiveDate {
    NaiveDate::default()
}

/// Canonical `YYYY-MM-DD` key for the UTC day containing `now`.
pub fn utc_date_key(now: DateTime<Utc>) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        now.year(),
        now.month(),
        now.day()
    )
}

/// Key for the current UTC day.
pub fn today_key() -> String {
    utc_date_key(Utc::now())
}

/// Key for the UTC day before the one containing `now`.
pub fn utc_yesterday_key(now: DateTime<Utc>) -> String {
    let yesterday = now
        .date_naive()
        .checked_sub_days(Days::new(1))
        .unwrap_or_else(epoch);
    format!(
        "{:04}-{:02}-{:02}",
        yesterday.year(),
        yesterday.month(),
        yesterday.day()
    )
}

/// Strict `YYYY-MM-DD` parse. Rejects anything chrono round-trips
/// differently (wrong padding, out-of-range components, trailing text).
pub fn parse_date_key(key: &str) -> Option<NaiveDate> {
    let date = NaiveDate::parse_from_str(key, "%Y-%m-%d").ok()?;
    // parse_from_str accepts unpadded components; require the canonical form
    if format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day()) != key {
        return None;
    }
    Some(date)
}

/// Days since the Unix epoch for the UTC midnight of `date_key`, or `None`
/// if the key is malformed.
pub fn day_number(date_key: &str) -> Option<i64> {
    let date = parse_date_key(date_key)?;
    Some(date.signed_duration_since(epoch()).num_days())
}

/// Milliseconds until the next UTC midnight. Always non-negative; used by
/// clients for the countdown display.
pub fn ms_until_next_utc_midnight(now: DateTime<Utc>) -> i64 {
    let next = now
        .date_naive()
        .checked_add_days(Days::new(1))
        .unwrap_or_else(epoch)
        .and_hms_opt(0, 0, 0)
        .unwrap_or_default()
        .and_utc();
    (next - now).num_milliseconds().max(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_date_key_format() {
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 23, 59, 59).unwrap();
        assert_eq!(utc_date_key(t), "2024-01-01");
        let t = Utc.with_ymd_and_hms(2024, 12, 31, 0, 0, 0).unwrap();
        assert_eq!(utc_date_key(t), "2024-12-31");
    }

    #[test]
    fn test_day_number_matches_epoch_millis() {
        // floor(epoch_ms at UTC midnight / 86_400_000) for 2024-01-01
        assert_eq!(day_number("2024-01-01"), Some(19723));
        assert_eq!(day_number("1970-01-01"), Some(0));
        assert_eq!(day_number("2024-06-01"), Some(19875));
    }

    #[test]
    fn test_parse_rejects_non_canonical() {
        assert!(parse_date_key("2024-1-1").is_none());
        assert!(parse_date_key("2024-01-32").is_none());
        assert!(parse_date_key("2024-01-01x").is_none());
        assert!(parse_date_key("").is_none());
        assert!(parse_date_key("2024-06-01").is_some());
    }

    #[test]
    fn test_yesterday_crosses_month() {
        let t = Utc.with_ymd_and_hms(2024, 3, 1, 5, 0, 0).unwrap();
        assert_eq!(utc_yesterday_key(t), "2024-02-29");
    }

    #[test]
    fn test_ms_until_midnight() {
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 23, 59, 59).unwrap();
        assert_eq!(ms_until_next_utc_midnight(t), 1000);
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(ms_until_next_utc_midnight(t), 86_400_000);
    }
}

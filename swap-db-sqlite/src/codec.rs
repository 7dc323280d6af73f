//! Text encodings for columns SQLite has no native type for.
//!
//! Money and sizes are stored as decimal strings so nothing is lost to
//! floating point. Dates are ISO `YYYY-MM-DD`, timestamps are UTC with
//! microseconds, and string lists are JSON arrays.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use swap_core::RepositoryError;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

pub fn parse_decimal(s: &str) -> Result<Decimal, RepositoryError> {
    s.parse::<Decimal>()
        .map_err(|e| RepositoryError::Database(format!("Failed to parse decimal '{}': {}", s, e)))
}

pub fn parse_optional_decimal(s: &Option<String>) -> Result<Option<Decimal>, RepositoryError> {
    s.as_deref().map(parse_decimal).transpose()
}

pub fn encode_decimal(d: Option<Decimal>) -> Option<String> {
    d.map(|d| d.normalize().to_string())
}

pub fn parse_optional_date(s: &Option<String>) -> Result<Option<NaiveDate>, RepositoryError> {
    s.as_deref()
        .map(|s| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map_err(|e| RepositoryError::Database(format!("Failed to parse date '{}': {}", s, e)))
        })
        .transpose()
}

pub fn encode_date(d: Option<NaiveDate>) -> Option<String> {
    d.map(|d| d.format("%Y-%m-%d").to_string())
}

pub fn encode_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Accepts what [`encode_timestamp`] writes and what `CURRENT_TIMESTAMP`
/// produces in seed files.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f"))
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S"))
        .map(|naive| naive.and_utc())
        .map_err(|e| RepositoryError::Database(format!("Failed to parse datetime '{}': {}", s, e)))
}

pub fn encode_list(items: &[String]) -> Result<String, RepositoryError> {
    serde_json::to_string(items)
        .map_err(|e| RepositoryError::Database(format!("Failed to encode list: {}", e)))
}

/// A NULL or empty column reads as an empty list.
pub fn decode_list(s: &Option<String>) -> Result<Vec<String>, RepositoryError> {
    match s.as_deref().map(str::trim) {
        None | Some("") => Ok(Vec::new()),
        Some(json) => serde_json::from_str(json)
            .map_err(|e| RepositoryError::Database(format!("Failed to decode list '{}': {}", json, e))),
    }
}

pub fn to_count(
    column: &str,
    value: Option<i64>,
) -> Result<Option<u32>, RepositoryError> {
    value
        .map(|v| {
            u32::try_from(v)
                .map_err(|_| RepositoryError::Database(format!("Column '{}' out of range: {}", column, v)))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn decimals_are_stored_normalized() {
        assert_eq!(encode_decimal(Some(dec!(1200.00))), Some("1200".to_string()));
        assert_eq!(parse_optional_decimal(&Some("4.5".to_string())).unwrap(), Some(dec!(4.5)));
        assert!(parse_decimal("twelve").is_err());
    }

    #[test]
    fn timestamps_keep_sub_second_precision() {
        let at = parse_datetime("2025-06-01 10:30:00.123456").unwrap();

        assert_eq!(encode_timestamp(at), "2025-06-01 10:30:00.123456");
        assert_eq!(parse_datetime("2025-06-01 10:30:00").unwrap().timestamp(), at.timestamp());
    }

    #[test]
    fn lists_round_trip_and_tolerate_null() {
        let amenities = vec!["wifi".to_string(), "washer".to_string()];
        let json = encode_list(&amenities).unwrap();

        assert_eq!(json, r#"["wifi","washer"]"#);
        assert_eq!(decode_list(&Some(json)).unwrap(), amenities);
        assert_eq!(decode_list(&None).unwrap(), Vec::<String>::new());
    }

    #[test]
    fn negative_counts_are_rejected() {
        assert_eq!(to_count("room_count", Some(3)).unwrap(), Some(3));
        assert!(to_count("room_count", Some(-1)).is_err());
    }
}

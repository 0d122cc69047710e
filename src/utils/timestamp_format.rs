use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serializer};

use crate::utils::constants::TIMESTAMP_FORMAT;

/// Writes a timestamp as `YYYY-MM-DD HH:MM:SS`
pub fn serialize<S>(timestamp: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&timestamp.format(TIMESTAMP_FORMAT).to_string())
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}

/// Parse a timestamp, accepting either a space or a `T` between date and time
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = NaiveDate::from_ymd_opt(2016, 3, 14)
            .unwrap()
            .and_hms_opt(15, 0, 0)
            .unwrap();

        assert_eq!(parse_timestamp("2016-03-14 15:00:00").unwrap(), expected);
        assert_eq!(parse_timestamp(" 2016-03-14T15:00:00 ").unwrap(), expected);
        assert_eq!(parse_timestamp("2016-03-14 15:00:00").unwrap().hour(), 15);
        assert!(parse_timestamp("14/03/2016").is_err());
    }
}

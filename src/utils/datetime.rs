use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::PresensiError;

/// Naive layouts tried in order after RFC 3339.
const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Numbers above this magnitude are unix milliseconds, below it seconds.
const UNIX_MILLIS_THRESHOLD: f64 = 2e10;

/// A caller-supplied timestamp, kept the way it was sent: naive values stay
/// naive, offset-bearing values keep their offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Timestamp {
    Naive(NaiveDateTime),
    Offset(DateTime<FixedOffset>),
}

impl Timestamp {
    /// Wall-clock time as written, ignoring any offset.
    pub fn wall_clock(&self) -> NaiveDateTime {
        match self {
            Timestamp::Naive(dt) => *dt,
            Timestamp::Offset(dt) => dt.naive_local(),
        }
    }

    pub fn parse(value: &str) -> Result<Self, PresensiError> {
        let value = value.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
            return Ok(Timestamp::Offset(dt));
        }

        for format in NAIVE_DATETIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
                return Ok(Timestamp::Naive(dt));
            }
        }

        if let Ok(d) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
            return Ok(Timestamp::Naive(d.and_time(NaiveTime::default())));
        }

        Err(PresensiError::Validation(format!(
            "Invalid isoformat string: '{}'",
            value
        )))
    }

    /// Unix seconds, or milliseconds past `UNIX_MILLIS_THRESHOLD`, as UTC.
    pub fn from_unix(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let micros = if value.abs() > UNIX_MILLIS_THRESHOLD {
            value * 1_000.0
        } else {
            value * 1_000_000.0
        };
        DateTime::from_timestamp_micros(micros.round() as i64)
            .map(|dt| Timestamp::Offset(dt.fixed_offset()))
    }
}

/// Parses an ISO-8601 date or date-time string into its wall-clock time.
/// A bare date means midnight.
pub fn parse_datetime(value: &str) -> Result<NaiveDateTime, PresensiError> {
    Timestamp::parse(value).map(|ts| ts.wall_clock())
}

/// Calendar date of an ISO-8601 date or date-time string, as written.
pub fn parse_date(value: &str) -> Result<NaiveDate, PresensiError> {
    parse_datetime(value).map(|dt| dt.date())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Text(String),
    Unix(f64),
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match RawTimestamp::deserialize(deserializer)? {
            RawTimestamp::Text(s) => Timestamp::parse(&s).map_err(serde::de::Error::custom),
            RawTimestamp::Unix(n) => Timestamp::from_unix(n)
                .ok_or_else(|| serde::de::Error::custom(format!("timestamp out of range: {}", n))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn parses_common_iso_shapes() {
        assert_eq!(parse_datetime("2026-01-05T08:30:00").unwrap(), dt("2026-01-05 08:30:00"));
        assert_eq!(parse_datetime("2026-01-05 08:30:00").unwrap(), dt("2026-01-05 08:30:00"));
        assert_eq!(parse_datetime("2026-01-05T08:30").unwrap(), dt("2026-01-05 08:30:00"));
        assert_eq!(parse_datetime("2026-01-05").unwrap(), dt("2026-01-05 00:00:00"));
    }

    #[test]
    fn date_filter_uses_wall_clock() {
        assert_eq!(
            parse_date("2026-01-05T23:30:00+07:00").unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 5).unwrap()
        );
    }

    #[test]
    fn offset_survives_round_trip() {
        let ts = Timestamp::parse("2026-01-05T08:00:00+07:00").unwrap();
        assert!(matches!(ts, Timestamp::Offset(_)));
        assert_eq!(serde_json::to_value(ts).unwrap(), json!("2026-01-05T08:00:00+07:00"));

        let naive = Timestamp::parse("2026-01-05T08:00:00").unwrap();
        assert_eq!(serde_json::to_value(naive).unwrap(), json!("2026-01-05T08:00:00"));
    }

    #[test]
    fn rejects_garbage() {
        let err = parse_date("yesterday").unwrap_err();
        assert!(matches!(err, PresensiError::Validation(_)));
        assert!(err.to_string().contains("yesterday"));
        assert!(parse_date("").is_err());
        assert!(parse_date("2026-13-01").is_err());
    }

    #[test]
    fn unix_seconds_and_millis_are_utc() {
        let secs: Timestamp = serde_json::from_value(json!(1767600000)).unwrap();
        assert_eq!(serde_json::to_value(secs).unwrap(), json!("2026-01-05T08:00:00+00:00"));

        let millis: Timestamp = serde_json::from_value(json!(1767600000123u64)).unwrap();
        assert_eq!(serde_json::to_value(millis).unwrap(), json!("2026-01-05T08:00:00.123+00:00"));

        assert_eq!(Timestamp::from_unix(0.0).unwrap().wall_clock(), dt("1970-01-01 00:00:00"));
        assert!(Timestamp::from_unix(f64::NAN).is_none());
    }
}

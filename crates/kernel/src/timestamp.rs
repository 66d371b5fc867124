//! RFC 3339 timestamp value used for wire encoding.
//!
//! [`Rfc3339Time`] always renders in UTC with nine fractional digits, e.g.
//! `2024-03-05T14:09:02.123456789Z`. Parsing accepts the same layout with zero
//! to nine fractional digits and requires the `Z` designator.

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

const CANONICAL: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:9]Z");

const WHOLE_SECONDS: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]Z");

const FRACTIONAL_SECONDS: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:1+]Z");

const MAX_FRACTION_DIGITS: usize = 9;

/// Errors produced when text or bytes are not a valid UTC RFC 3339 timestamp.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("timestamp is not valid UTF-8")]
    NotUtf8(#[from] std::str::Utf8Error),

    #[error("timestamp is not wrapped in double quotes")]
    Unquoted,

    #[error("timestamp '{0}' does not end with the UTC designator 'Z'")]
    NotUtc(String),

    #[error("timestamp '{0}' must start with an unsigned 4-digit year")]
    Year(String),

    #[error("timestamp '{0}' must have 1 to 9 fractional second digits")]
    Fraction(String),

    #[error("invalid timestamp '{input}': {source}")]
    Invalid {
        input: String,
        #[source]
        source: time::error::Parse,
    },
}

/// An instant in time with nanosecond resolution, held in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rfc3339Time(OffsetDateTime);

impl Rfc3339Time {
    /// Capture the current wall-clock time.
    pub fn now() -> Self {
        Self(OffsetDateTime::now_utc())
    }

    /// Parse bare canonical text such as `2024-01-01T00:00:00.5Z`.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let body = input
            .strip_suffix('Z')
            .ok_or_else(|| ParseError::NotUtc(input.to_string()))?;

        // `[year]` would otherwise accept a leading sign.
        let year_ok = input
            .get(..4)
            .is_some_and(|year| year.bytes().all(|b| b.is_ascii_digit()));
        if !year_ok {
            return Err(ParseError::Year(input.to_string()));
        }

        let format = match body.split_once('.') {
            Some((_, fraction)) => {
                let digits_ok = !fraction.is_empty()
                    && fraction.len() <= MAX_FRACTION_DIGITS
                    && fraction.bytes().all(|b| b.is_ascii_digit());
                if !digits_ok {
                    return Err(ParseError::Fraction(input.to_string()));
                }
                FRACTIONAL_SECONDS
            }
            None => WHOLE_SECONDS,
        };

        let parsed =
            PrimitiveDateTime::parse(input, format).map_err(|source| ParseError::Invalid {
                input: input.to_string(),
                source,
            })?;

        Ok(Self(parsed.assume_utc()))
    }

    /// Parse `input` into this holder. The previous value is kept on failure.
    pub fn parse_from_str(&mut self, input: &str) -> Result<(), ParseError> {
        *self = Self::parse(input)?;
        Ok(())
    }

    /// Encode as a quoted JSON string value, e.g. `"2024-01-01T00:00:00.000000000Z"`.
    pub fn to_json_bytes(&self) -> Vec<u8> {
        format!("\"{self}\"").into_bytes()
    }

    /// Decode raw JSON string bytes, quotes included.
    pub fn from_json_bytes(data: &[u8]) -> Result<Self, ParseError> {
        let inner = data
            .strip_prefix(b"\"")
            .and_then(|rest| rest.strip_suffix(b"\""))
            .ok_or(ParseError::Unquoted)?;

        Self::parse(std::str::from_utf8(inner)?)
    }

    /// True if `self` is strictly earlier than `other`.
    pub fn is_before(&self, other: &Self) -> bool {
        self.0 < other.0
    }

    /// True if `self` is strictly later than `other`.
    pub fn is_after(&self, other: &Self) -> bool {
        self.0 > other.0
    }

    /// The underlying UTC `OffsetDateTime`.
    pub fn to_offset_date_time(self) -> OffsetDateTime {
        self.0
    }
}

impl From<OffsetDateTime> for Rfc3339Time {
    fn from(value: OffsetDateTime) -> Self {
        Self(value.to_offset(UtcOffset::UTC))
    }
}

impl From<Rfc3339Time> for OffsetDateTime {
    fn from(value: Rfc3339Time) -> Self {
        value.0
    }
}

impl fmt::Display for Rfc3339Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self.0.format(CANONICAL).map_err(|_| fmt::Error)?;
        f.write_str(&rendered)
    }
}

impl FromStr for Rfc3339Time {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Rfc3339Time {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rfc3339Time {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct Rfc3339Visitor;

        impl de::Visitor<'_> for Rfc3339Visitor {
            type Value = Rfc3339Time;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an RFC 3339 UTC timestamp string")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
                Rfc3339Time::parse(value).map_err(E::custom)
            }
        }

        deserializer.deserialize_str(Rfc3339Visitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use time::macros::datetime;

    fn sample() -> Rfc3339Time {
        Rfc3339Time::from(datetime!(2024-03-05 14:09:02.123456789 UTC))
    }

    #[test]
    fn encodes_with_wrapping_quotes() {
        assert_eq!(
            sample().to_json_bytes(),
            b"\"2024-03-05T14:09:02.123456789Z\"".to_vec()
        );
    }

    #[test]
    fn decodes_quoted_bytes() {
        let decoded = Rfc3339Time::from_json_bytes(b"\"2024-03-05T14:09:02.123456789Z\"").unwrap();
        assert_eq!(decoded, sample());
    }

    #[test]
    fn renders_without_quotes() {
        assert_eq!(sample().to_string(), "2024-03-05T14:09:02.123456789Z");
    }

    #[test]
    fn always_renders_nine_fraction_digits() {
        let whole = Rfc3339Time::from(datetime!(2024-01-01 00:00:00 UTC));
        assert_eq!(whole.to_string(), "2024-01-01T00:00:00.000000000Z");
    }

    #[test]
    fn round_trips_through_both_paths() {
        let now = Rfc3339Time::now();
        assert_eq!(Rfc3339Time::from_json_bytes(&now.to_json_bytes()).unwrap(), now);
        assert_eq!(now.to_string().parse::<Rfc3339Time>().unwrap(), now);
    }

    #[test]
    fn normalizes_offsets_to_utc() {
        let shifted = Rfc3339Time::from(datetime!(2024-03-05 16:09:02.123456789 +2));
        assert_eq!(shifted, sample());
        assert_eq!(shifted.to_string(), "2024-03-05T14:09:02.123456789Z");
    }

    #[test]
    fn accepts_variable_fraction_precision() {
        let millis = Rfc3339Time::parse("2024-03-05T14:09:02.123Z").unwrap();
        assert_eq!(millis.to_string(), "2024-03-05T14:09:02.123000000Z");

        let whole = Rfc3339Time::parse("2024-03-05T14:09:02Z").unwrap();
        assert_eq!(whole.to_string(), "2024-03-05T14:09:02.000000000Z");

        let quoted = Rfc3339Time::from_json_bytes(b"\"2024-03-05T14:09:02.1Z\"").unwrap();
        assert_eq!(quoted.to_string(), "2024-03-05T14:09:02.100000000Z");
    }

    #[test]
    fn rejects_out_of_range_fields() {
        let err = Rfc3339Time::parse("2024-13-40T99:99:99Z").unwrap_err();
        assert!(matches!(err, ParseError::Invalid { .. }));

        assert!(Rfc3339Time::parse("2023-02-29T00:00:00Z").is_err());
    }

    #[test]
    fn rejects_missing_utc_designator() {
        let err = Rfc3339Time::parse("2024-01-01T00:00:00").unwrap_err();
        assert!(matches!(err, ParseError::NotUtc(_)));

        assert!(Rfc3339Time::parse("2024-01-01T00:00:00+01:00").is_err());
        assert!(Rfc3339Time::parse("2024-01-01T00:00:00z").is_err());
    }

    #[test]
    fn rejects_malformed_fraction_and_separators() {
        assert!(matches!(
            Rfc3339Time::parse("2024-01-01T00:00:00.Z"),
            Err(ParseError::Fraction(_))
        ));
        assert!(matches!(
            Rfc3339Time::parse("2024-01-01T00:00:00.1234567891Z"),
            Err(ParseError::Fraction(_))
        ));
        assert!(Rfc3339Time::parse("2024-01-01 00:00:00Z").is_err());
        assert!(Rfc3339Time::parse("2024/01/01T00:00:00Z").is_err());
    }

    #[test]
    fn rejects_signed_year() {
        for input in ["+2024-03-05T14:09:02Z", "-0001-03-05T14:09:02Z", "+12024-03-05T14:09:02Z"] {
            assert!(
                matches!(Rfc3339Time::parse(input), Err(ParseError::Year(_))),
                "{input} should be rejected"
            );
        }

        assert!(matches!(
            Rfc3339Time::from_json_bytes(b"\"+2024-03-05T14:09:02.5Z\""),
            Err(ParseError::Year(_))
        ));
        assert!(Rfc3339Time::parse("24-03-05T14:09:02Z").is_err());
    }

    #[test]
    fn decode_requires_quotes() {
        let bare = b"2024-03-05T14:09:02.123456789Z";
        assert!(matches!(
            Rfc3339Time::from_json_bytes(bare),
            Err(ParseError::Unquoted)
        ));
        assert!(matches!(
            Rfc3339Time::from_json_bytes(b"\"2024-03-05T14:09:02Z"),
            Err(ParseError::Unquoted)
        ));
        assert!(matches!(
            Rfc3339Time::from_json_bytes(b"\""),
            Err(ParseError::Unquoted)
        ));
        assert!(matches!(
            Rfc3339Time::from_json_bytes(b"\"\xff\""),
            Err(ParseError::NotUtf8(_))
        ));
    }

    #[test]
    fn parse_in_place_keeps_value_on_failure() {
        let mut holder = sample();
        assert!(holder.parse_from_str("not a timestamp").is_err());
        assert_eq!(holder, sample());

        holder.parse_from_str("2025-06-01T08:00:00.5Z").unwrap();
        assert_eq!(holder.to_string(), "2025-06-01T08:00:00.500000000Z");
    }

    #[test]
    fn ordering_is_strict_and_total() {
        let earlier = Rfc3339Time::parse("2024-03-05T14:09:02.123456788Z").unwrap();
        let later = sample();

        assert!(earlier.is_before(&later));
        assert!(!earlier.is_after(&later));
        assert!(later.is_after(&earlier));
        assert!(!later.is_before(&earlier));

        assert!(!later.is_before(&later));
        assert!(!later.is_after(&later));
    }

    #[test]
    fn converts_back_to_utc_offset_date_time() {
        let shifted = Rfc3339Time::from(datetime!(2024-03-05 16:09:02.123456789 +2));
        let dt = shifted.to_offset_date_time();
        assert_eq!(dt, datetime!(2024-03-05 14:09:02.123456789 UTC));
        assert!(dt.offset().is_utc());
    }

    #[test]
    fn now_does_not_go_backwards() {
        let first = Rfc3339Time::now();
        let second = Rfc3339Time::now();
        assert!(!second.is_before(&first));
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Stamped {
        created_at: Rfc3339Time,
    }

    #[test]
    fn serde_json_matches_quoted_encoding() {
        assert_eq!(serde_json::to_vec(&sample()).unwrap(), sample().to_json_bytes());

        let doc = Stamped {
            created_at: sample(),
        };
        let json = serde_json::to_string(&doc).unwrap();
        assert_eq!(json, r#"{"created_at":"2024-03-05T14:09:02.123456789Z"}"#);
        assert_eq!(serde_json::from_str::<Stamped>(&json).unwrap(), doc);
    }

    #[test]
    fn serde_json_rejects_offset_timestamps() {
        let result = serde_json::from_str::<Stamped>(r#"{"created_at":"2024-03-05T14:09:02+01:00"}"#);
        assert!(result.is_err());
    }
}

//! Fixed-format time keys.
//!
//! An option's point in time is stored as `YYYY-MM-DDTHH:MM`: 16 characters,
//! minute precision, no timezone suffix. The same string is the storage key,
//! the cross-reference key used when recording a response, and the form field
//! name on the response page. Keys sort lexically in chronological order.

use chrono::{Datelike, NaiveDateTime};
use thiserror::Error;

/// `chrono` format string matching the key layout.
pub const TIME_KEY_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// `chrono` format string for the human-readable label, e.g. `Mon Jan 2, 15:04`.
pub const DISPLAY_FORMAT: &str = "%a %b %-d, %H:%M";

/// Length of every valid key.
pub const TIME_KEY_LEN: usize = 16;

/// Errors produced when encoding or decoding a time key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeKeyError {
    #[error("invalid time key {input:?} (expected YYYY-MM-DDTHH:MM)")]
    Parse { input: String },

    #[error("year {year} cannot be written as a four-digit time key")]
    OutOfRange { year: i32 },
}

/// Encode an instant as its time key. Seconds and below are dropped.
pub fn encode(instant: &NaiveDateTime) -> Result<String, TimeKeyError> {
    let year = instant.year();
    if !(0..=9999).contains(&year) {
        return Err(TimeKeyError::OutOfRange { year });
    }
    Ok(instant.format(TIME_KEY_FORMAT).to_string())
}

/// Decode a time key back into an instant.
///
/// The input must match the layout exactly: zero-padded fields, literal
/// separators, nothing before or after. `chrono` alone would also accept
/// unpadded fields, so the shape is checked first.
pub fn decode(input: &str) -> Result<NaiveDateTime, TimeKeyError> {
    let parse_err = || TimeKeyError::Parse {
        input: input.to_owned(),
    };

    if !has_key_shape(input) {
        return Err(parse_err());
    }

    NaiveDateTime::parse_from_str(input, TIME_KEY_FORMAT).map_err(|_| parse_err())
}

/// Human-readable label for an instant.
pub fn display(instant: &NaiveDateTime) -> String {
    instant.format(DISPLAY_FORMAT).to_string()
}

fn has_key_shape(input: &str) -> bool {
    let bytes = input.as_bytes();
    if bytes.len() != TIME_KEY_LEN {
        return false;
    }
    bytes.iter().enumerate().all(|(i, b)| match i {
        4 | 7 => *b == b'-',
        10 => *b == b'T',
        13 => *b == b':',
        _ => b.is_ascii_digit(),
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn encode_is_fixed_width() {
        assert_eq!(encode(&at(2025, 3, 7, 9, 5)).unwrap(), "2025-03-07T09:05");
        assert_eq!(encode(&at(1, 1, 1, 0, 0)).unwrap(), "0001-01-01T00:00");
    }

    #[test]
    fn encode_drops_seconds() {
        let instant = NaiveDate::from_ymd_opt(2025, 3, 7)
            .unwrap()
            .and_hms_opt(18, 30, 59)
            .unwrap();
        assert_eq!(encode(&instant).unwrap(), "2025-03-07T18:30");
    }

    #[test]
    fn encode_rejects_five_digit_year() {
        let instant = at(10_000, 1, 1, 0, 0);
        assert_eq!(
            encode(&instant),
            Err(TimeKeyError::OutOfRange { year: 10_000 })
        );
    }

    #[test]
    fn decode_accepts_exact_layout() {
        assert_eq!(decode("2025-12-31T23:59").unwrap(), at(2025, 12, 31, 23, 59));
    }

    #[test]
    fn decode_rejects_other_layouts() {
        for bad in [
            "",
            "2025-3-7T09:05",
            "2025-03-07 09:05",
            "2025-03-07T09:05:00",
            "2025-03-07T09:05Z",
            " 2025-03-07T09:05",
            "2025/03/07T09:05",
            "yesterday at 9",
        ] {
            assert!(
                matches!(decode(bad), Err(TimeKeyError::Parse { .. })),
                "expected parse error for {bad:?}"
            );
        }
    }

    #[test]
    fn decode_rejects_impossible_dates() {
        assert!(decode("2025-02-30T10:00").is_err());
        assert!(decode("2025-01-01T24:00").is_err());
        assert!(decode("2025-13-01T10:00").is_err());
    }

    #[test]
    fn keys_sort_chronologically() {
        let mut keys = vec![
            encode(&at(2025, 11, 2, 8, 0)).unwrap(),
            encode(&at(2025, 2, 11, 18, 0)).unwrap(),
            encode(&at(2024, 12, 31, 23, 59)).unwrap(),
        ];
        keys.sort();
        assert_eq!(
            keys,
            ["2024-12-31T23:59", "2025-02-11T18:00", "2025-11-02T08:00"]
        );
    }

    #[test]
    fn display_label() {
        assert_eq!(display(&at(2025, 6, 2, 15, 4)), "Mon Jun 2, 15:04");
    }
}

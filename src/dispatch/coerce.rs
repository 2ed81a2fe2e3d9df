// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! String-to-typed argument coercion for dispatched commands.
//!
//! Arguments arrive as text from a console or script. Each coercion either
//! produces the target type or a [`DispatchError::InvalidArgument`] naming
//! the offending value and what was expected. Integer narrowing beyond an
//! `i64` happens at the call site with no extra overflow check.

use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::error::DispatchError;

/// Civil layouts tried in order after the epoch and RFC 3339 forms. All are
/// read as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
];

/// Parses the canonical boolean literals.
pub(crate) fn boolean(value: &str) -> Result<bool, DispatchError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(invalid(value, "boolean")),
    }
}

/// Parses a base-10 integer.
pub(crate) fn integer(value: &str) -> Result<i64, DispatchError> {
    value.parse().map_err(|_| invalid(value, "integer"))
}

/// Parses a decimal float.
pub(crate) fn float(value: &str) -> Result<f64, DispatchError> {
    value.parse().map_err(|_| invalid(value, "number"))
}

/// Parses a decimal count of seconds into a duration. Rejects negative and
/// non-finite values.
pub(crate) fn seconds(value: &str) -> Result<Duration, DispatchError> {
    let raw = float(value).map_err(|_| invalid(value, "seconds"))?;
    Duration::try_from_secs_f64(raw).map_err(|_| invalid(value, "seconds"))
}

/// Parses an absolute instant.
///
/// A numeric value is taken as Unix epoch seconds (fraction = sub-second
/// remainder). Otherwise a fixed list of civil layouts is tried in order:
/// RFC 3339, space-separated date-time with a numeric offset, the naive
/// layouts in [`NAIVE_FORMATS`], and finally a bare US-style date. A
/// trailing zone abbreviation is accepted but not resolved; the rest of the
/// value is read as UTC.
pub(crate) fn timestamp(value: &str) -> Result<DateTime<Utc>, DispatchError> {
    if let Some(stamp) = epoch(value) {
        return Ok(stamp);
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(value) {
        return Ok(stamp.with_timezone(&Utc));
    }
    if let Ok(stamp) = DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f %:z") {
        return Ok(stamp.with_timezone(&Utc));
    }
    for candidate in [value, strip_zone_abbreviation(value)] {
        for format in NAIVE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(candidate, format) {
                return Ok(naive.and_utc());
            }
        }
        if let Ok(date) = NaiveDate::parse_from_str(candidate, "%m/%d/%Y")
            && let Some(naive) = date.and_hms_opt(0, 0, 0)
        {
            return Ok(naive.and_utc());
        }
    }
    Err(invalid(value, "timestamp"))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn epoch(value: &str) -> Option<DateTime<Utc>> {
    let raw: f64 = value.parse().ok()?;
    if !raw.is_finite() {
        return None;
    }
    let floor = raw.floor();
    let mut secs = floor as i64;
    let mut nanos = ((raw - floor) * 1e9).round() as u32;
    if nanos >= 1_000_000_000 {
        secs += 1;
        nanos = 0;
    }
    DateTime::from_timestamp(secs, nanos)
}

/// Drops a trailing `UTC`-style abbreviation so the rest can parse as a
/// naive layout. AM/PM markers are not abbreviations.
fn strip_zone_abbreviation(value: &str) -> &str {
    let Some((head, tail)) = value.rsplit_once(' ') else {
        return value;
    };
    let looks_like_zone = (2..=5).contains(&tail.len())
        && tail.bytes().all(|b| b.is_ascii_alphabetic())
        && !tail.eq_ignore_ascii_case("am")
        && !tail.eq_ignore_ascii_case("pm");
    if looks_like_zone { head } else { value }
}

fn invalid(value: &str, expected: &'static str) -> DispatchError {
    DispatchError::InvalidArgument {
        value: value.to_string(),
        expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn boolean_literals() {
        assert!(boolean("true").unwrap());
        assert!(!boolean("false").unwrap());
        assert!(boolean("yes").is_err());
        assert!(boolean("True").is_err());
    }

    #[test]
    fn integers_parse_base_ten() {
        assert_eq!(integer("42").unwrap(), 42);
        assert_eq!(integer("-7").unwrap(), -7);
        assert!(integer("0x10").is_err());
        assert!(integer("4.2").is_err());
    }

    #[test]
    fn floats_parse() {
        assert!((float("1.5").unwrap() - 1.5).abs() < f64::EPSILON);
        assert!(float("one").is_err());
    }

    #[test]
    fn seconds_parse_fractions() {
        assert_eq!(seconds("1.5").unwrap(), Duration::from_millis(1500));
        assert_eq!(seconds("0").unwrap(), Duration::ZERO);
        assert!(seconds("-2").is_err());
        assert!(seconds("soon").is_err());
    }

    #[test]
    fn timestamp_prefers_epoch() {
        assert_eq!(timestamp("0").unwrap(), utc(1970, 1, 1, 0, 0, 0));
        assert_eq!(timestamp("1622548800").unwrap(), utc(2021, 6, 1, 12, 0, 0));
        let fractional = timestamp("1622548800.25").unwrap();
        assert_eq!(fractional.timestamp(), 1_622_548_800);
        assert_eq!(fractional.timestamp_subsec_millis(), 250);
    }

    #[test]
    fn timestamp_rfc3339() {
        assert_eq!(
            timestamp("2021-06-01T12:00:00Z").unwrap(),
            utc(2021, 6, 1, 12, 0, 0)
        );
        assert_eq!(
            timestamp("2021-06-01T12:00:00.500+00:00")
                .unwrap()
                .timestamp_subsec_millis(),
            500
        );
        // offsets are resolved, not discarded
        assert_eq!(
            timestamp("2021-06-01T12:00:00+02:00").unwrap(),
            utc(2021, 6, 1, 10, 0, 0)
        );
    }

    #[test]
    fn timestamp_space_separated() {
        assert_eq!(
            timestamp("2021-06-01 12:00:00 +02:00").unwrap(),
            utc(2021, 6, 1, 10, 0, 0)
        );
        assert_eq!(
            timestamp("2021-06-01 12:00:00").unwrap(),
            utc(2021, 6, 1, 12, 0, 0)
        );
    }

    #[test]
    fn timestamp_zone_abbreviation_reads_as_utc() {
        assert_eq!(
            timestamp("2021-06-01 12:00:00 UTC").unwrap(),
            utc(2021, 6, 1, 12, 0, 0)
        );
        assert_eq!(
            timestamp("2021-06-01 12:00:00 CEST").unwrap(),
            utc(2021, 6, 1, 12, 0, 0)
        );
    }

    #[test]
    fn timestamp_us_layouts() {
        assert_eq!(timestamp("06/01/2021").unwrap(), utc(2021, 6, 1, 0, 0, 0));
        assert_eq!(
            timestamp("06/01/2021 14:30:00").unwrap(),
            utc(2021, 6, 1, 14, 30, 0)
        );
        assert_eq!(
            timestamp("06/01/2021 02:30:00 PM").unwrap(),
            utc(2021, 6, 1, 14, 30, 0)
        );
        assert_eq!(
            timestamp("06/01/2021 9:30 PM").unwrap(),
            utc(2021, 6, 1, 21, 30, 0)
        );
    }

    #[test]
    fn unparseable_time_names_the_value() {
        let err = timestamp("not-a-time").unwrap_err();
        assert_eq!(err.to_string(), "cannot parse timestamp from \"not-a-time\"");
    }
}

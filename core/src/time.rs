//! Time related utils.

use crate::Error;
use chrono::format::Fixed;
use chrono::format::Item;
use chrono::format::Numeric;
use chrono::format::Pad;
use chrono::SecondsFormat;
use chrono::TimeZone;
use chrono::Utc;

/// DateTime is the alias for `chrono::DateTime<Utc>`.
pub type DateTime = chrono::DateTime<Utc>;

/// Create datetime of now.
pub fn now() -> DateTime {
    Utc::now()
}

/// DATE is a time format like `20220301`
const DATE: &[Item<'static>] = &[
    Item::Numeric(Numeric::Year, Pad::Zero),
    Item::Numeric(Numeric::Month, Pad::Zero),
    Item::Numeric(Numeric::Day, Pad::Zero),
];

/// Format time into date: `20220301`
pub fn format_date(t: DateTime) -> String {
    t.format_with_items(DATE.iter()).to_string()
}

/// ISO8601 is a time format like `20220313T072004Z`.
const ISO8601: &[Item<'static>] = &[
    Item::Numeric(Numeric::Year, Pad::Zero),
    Item::Numeric(Numeric::Month, Pad::Zero),
    Item::Numeric(Numeric::Day, Pad::Zero),
    Item::Literal("T"),
    Item::Numeric(Numeric::Hour, Pad::Zero),
    Item::Numeric(Numeric::Minute, Pad::Zero),
    Item::Numeric(Numeric::Second, Pad::Zero),
    Item::Literal("Z"),
];

/// Format time into ISO8601: `20220313T072004Z`
pub fn format_iso8601(t: DateTime) -> String {
    t.format_with_items(ISO8601.iter()).to_string()
}

/// Format time into the wire timestamp used by query and xml bodies:
/// `2022-03-13T07:20:04Z`
pub fn format_timestamp(t: DateTime) -> String {
    t.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// HTTP_DATE is a time format like `Sun, 06 Nov 1994 08:49:37 GMT`.
const HTTP_DATE: &[Item<'static>] = &[
    Item::Fixed(Fixed::ShortWeekdayName),
    Item::Literal(", "),
    Item::Numeric(Numeric::Day, Pad::Zero),
    Item::Literal(" "),
    Item::Fixed(Fixed::ShortMonthName),
    Item::Literal(" "),
    Item::Numeric(Numeric::Year, Pad::Zero),
    Item::Literal(" "),
    Item::Numeric(Numeric::Hour, Pad::Zero),
    Item::Literal(":"),
    Item::Numeric(Numeric::Minute, Pad::Zero),
    Item::Literal(":"),
    Item::Numeric(Numeric::Second, Pad::Zero),
    Item::Literal(" GMT"),
];

/// Format time into http date: `Sun, 06 Nov 1994 08:49:37 GMT`
pub fn format_http_date(t: DateTime) -> String {
    t.format_with_items(HTTP_DATE.iter()).to_string()
}

/// Parse an RFC 3339 / ISO8601 timestamp like `2022-03-13T07:20:04Z`.
///
/// Fractional seconds and offsets are accepted.
pub fn parse_rfc3339(s: &str) -> crate::Result<DateTime> {
    Ok(chrono::DateTime::parse_from_rfc3339(s.trim())
        .map_err(|e| {
            Error::unexpected(format!("parse '{s}' into rfc3339 failed")).with_source(e)
        })?
        .with_timezone(&Utc))
}

/// Parse an RFC 2822 / http date like `Sun, 06 Nov 1994 08:49:37 GMT`.
pub fn parse_rfc2822(s: &str) -> crate::Result<DateTime> {
    Ok(chrono::DateTime::parse_from_rfc2822(s.trim())
        .map_err(|e| {
            Error::unexpected(format!("parse '{s}' into rfc2822 failed")).with_source(e)
        })?
        .with_timezone(&Utc))
}

/// Convert unix epoch seconds (with optional fraction) into datetime.
pub fn from_epoch_seconds(secs: f64) -> crate::Result<DateTime> {
    if !secs.is_finite() {
        return Err(Error::unexpected(format!("epoch seconds {secs} is not finite")));
    }
    let mut whole = secs.floor() as i64;
    let mut nanos = ((secs - secs.floor()) * 1e9).round() as u32;
    // Rounding may reach a full second.
    if nanos >= 1_000_000_000 {
        whole += 1;
        nanos = 0;
    }
    Utc.timestamp_opt(whole, nanos)
        .single()
        .ok_or_else(|| Error::unexpected(format!("epoch seconds {secs} out of range")))
}

/// Convert datetime into unix epoch seconds.
pub fn to_epoch_seconds(t: DateTime) -> f64 {
    t.timestamp() as f64 + f64::from(t.timestamp_subsec_nanos()) / 1e9
}

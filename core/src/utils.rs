//! Utility functions and types.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::fmt::Debug;

/// Redact wraps a secret so `Debug` never prints it whole.
///
/// Secrets shorter than 12 bytes print as `***`. Longer ones keep their
/// first and last three characters so different keys stay distinguishable
/// in logs.
pub struct Redact<'a>(Option<&'a str>);

impl<'a> From<&'a str> for Redact<'a> {
    fn from(value: &'a str) -> Self {
        Redact(Some(value))
    }
}

impl<'a> From<&'a String> for Redact<'a> {
    fn from(value: &'a String) -> Self {
        Redact(Some(value))
    }
}

impl<'a> From<&'a Option<String>> for Redact<'a> {
    fn from(value: &'a Option<String>) -> Self {
        Redact(value.as_deref())
    }
}

impl Debug for Redact<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Some(v) = self.0.filter(|v| !v.is_empty()) else {
            return f.write_str("EMPTY");
        };
        match (v.get(..3), v.get(v.len().saturating_sub(3)..)) {
            (Some(head), Some(tail)) if v.len() >= 12 => write!(f, "{head}***{tail}"),
            _ => f.write_str("***"),
        }
    }
}

/// Everything but `A-Z a-z 0-9 - _ . ~` is escaped.
pub static AWS_QUERY_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Same as [`AWS_QUERY_ENCODE_SET`] but keeps `/`.
pub static AWS_URI_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Escape a path the way AWS expects it.
///
/// Unlike most url libraries, characters like `*`, `!` and `'` are escaped too.
/// When `encode_sep` is false, `/` is kept as is so that greedy labels like
/// `{Key+}` keep their embedded separators.
pub fn escape_path(path: &str, encode_sep: bool) -> String {
    if encode_sep {
        utf8_percent_encode(path, &AWS_QUERY_ENCODE_SET).to_string()
    } else {
        utf8_percent_encode(path, &AWS_URI_ENCODE_SET).to_string()
    }
}

/// Escape a query key or value. Space is encoded as `%20`, never `+`.
pub fn escape_query(v: &str) -> String {
    utf8_percent_encode(v, &AWS_QUERY_ENCODE_SET).to_string()
}

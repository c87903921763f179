//! Text forms of scalar values.

use crate::shape::Shape;
use crate::value::Value;
use awswire_core::hash::{base64_decode, base64_encode};
use awswire_core::time::{format_http_date, format_timestamp, parse_rfc2822, parse_rfc3339};
use awswire_core::{Error, Result};
use bytes::Bytes;

/// Text used in bodies, uri labels and query strings.
pub(crate) fn to_text(v: &Value) -> Result<String> {
    match v {
        Value::String(s) => Ok(s.clone()),
        Value::Integer(i) => Ok(i.to_string()),
        Value::Float(f) => Ok(f.to_string()),
        Value::Boolean(b) => Ok(b.to_string()),
        Value::Blob(b) => Ok(base64_encode(b)),
        Value::Timestamp(t) => Ok(format_timestamp(*t)),
        v => Err(Error::request_invalid(format!(
            "{} value can't be serialized as text",
            v.kind()
        ))),
    }
}

/// Text used in headers, timestamps are http dates.
pub(crate) fn to_header_text(v: &Value) -> Result<String> {
    match v {
        Value::Timestamp(t) => Ok(format_http_date(*t)),
        v => to_text(v),
    }
}

/// Parse body text into a value of the given scalar shape.
pub(crate) fn from_text(s: &str, shape: Shape) -> Result<Value> {
    match shape {
        Shape::Timestamp => parse_rfc3339(s.trim()).map(Value::Timestamp),
        shape => parse_common(s, shape),
    }
}

/// Parse a header value, timestamps are http dates.
pub(crate) fn from_header_text(s: &str, shape: Shape) -> Result<Value> {
    match shape {
        Shape::Timestamp => parse_rfc2822(s)
            .or_else(|_| parse_rfc3339(s))
            .map(Value::Timestamp),
        shape => parse_common(s, shape),
    }
}

fn parse_common(s: &str, shape: Shape) -> Result<Value> {
    if let Shape::String = shape {
        return Ok(Value::String(s.to_string()));
    }

    let s = s.trim();
    match shape {
        Shape::Integer | Shape::Long => s.parse().map(Value::Integer).map_err(|e| {
            Error::unexpected(format!("failed to parse {s} as integer")).with_source(e)
        }),
        Shape::Float | Shape::Double => s.parse().map(Value::Float).map_err(|e| {
            Error::unexpected(format!("failed to parse {s} as float")).with_source(e)
        }),
        Shape::Boolean => s.parse().map(Value::Boolean).map_err(|e| {
            Error::unexpected(format!("failed to parse {s} as boolean")).with_source(e)
        }),
        Shape::Blob => Ok(Value::Blob(Bytes::from(base64_decode(s)?))),
        shape => Err(Error::unexpected(format!(
            "{shape:?} can't be parsed from text"
        ))),
    }
}

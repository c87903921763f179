//! Shape driven json codec shared by json-rpc and rest-json.

use crate::shape::{Shape, StructureShape};
use crate::value::{Structure, Value};
use awswire_core::hash::{base64_decode, base64_encode};
use awswire_core::time::{from_epoch_seconds, parse_rfc3339, to_epoch_seconds};
use awswire_core::{Error, Result};
use bytes::Bytes;
use serde_json::{Map, Number, Value as Json};
use std::collections::BTreeMap;

/// Encode the body members of a structure into a json object.
pub(crate) fn encode_structure(shape: &StructureShape, s: &Structure) -> Result<Json> {
    let mut object = Map::new();
    for m in shape.body_members() {
        if let Some(v) = s.get(m.name) {
            object.insert(m.wire_name().to_string(), encode_value(m.shape, v)?);
        }
    }
    Ok(Json::Object(object))
}

pub(crate) fn encode_value(shape: Shape, v: &Value) -> Result<Json> {
    let json = match (shape, v) {
        (Shape::Structure(st), Value::Structure(s)) => encode_structure(st, s)?,
        (Shape::List(ls), Value::List(items)) => Json::Array(
            items
                .iter()
                .map(|item| encode_value(ls.member, item))
                .collect::<Result<_>>()?,
        ),
        (Shape::Map(ms), Value::Map(entries)) => Json::Object(
            entries
                .iter()
                .map(|(k, v)| Ok((k.clone(), encode_value(ms.value, v)?)))
                .collect::<Result<_>>()?,
        ),
        (_, Value::String(s)) => Json::String(s.clone()),
        (_, Value::Integer(i)) => Json::from(*i),
        (_, Value::Float(f)) => Number::from_f64(*f).map(Json::Number).ok_or_else(|| {
            Error::request_invalid(format!("float {f} can't be serialized as json"))
        })?,
        (_, Value::Boolean(b)) => Json::Bool(*b),
        (_, Value::Blob(b)) => Json::String(base64_encode(b)),
        // Whole seconds are written as integers.
        (_, Value::Timestamp(t)) => {
            let secs = to_epoch_seconds(*t);
            if secs.fract() == 0.0 {
                Json::from(secs as i64)
            } else {
                Number::from_f64(secs).map(Json::Number).unwrap_or(Json::Null)
            }
        }
        (shape, v) => {
            return Err(Error::request_invalid(format!(
                "{} value doesn't match shape {shape:?}",
                v.kind()
            )))
        }
    };
    Ok(json)
}

/// Decode a json object into the body members of a structure.
///
/// Unknown keys are ignored and `null` is treated as absent.
pub(crate) fn decode_structure(shape: &StructureShape, json: &Json) -> Result<Structure> {
    let Json::Object(object) = json else {
        return Err(mismatch("object", json));
    };

    let mut out = Structure::new();
    for m in shape.body_members() {
        match object.get(m.wire_name()) {
            None | Some(Json::Null) => continue,
            Some(v) => {
                let v = decode_value(m.shape, v).map_err(|e| {
                    Error::unexpected(format!("failed to decode member {}", m.name)).with_source(e)
                })?;
                out.insert(m.name, v);
            }
        }
    }
    Ok(out)
}

pub(crate) fn decode_value(shape: Shape, json: &Json) -> Result<Value> {
    match (shape, json) {
        (Shape::Structure(st), json) => decode_structure(st, json).map(Value::Structure),
        (Shape::List(ls), Json::Array(items)) => items
            .iter()
            .filter(|v| !v.is_null())
            .map(|v| decode_value(ls.member, v))
            .collect::<Result<Vec<_>>>()
            .map(Value::List),
        (Shape::Map(ms), Json::Object(entries)) => {
            let mut out = BTreeMap::new();
            for (k, v) in entries.iter().filter(|(_, v)| !v.is_null()) {
                out.insert(k.clone(), decode_value(ms.value, v)?);
            }
            Ok(Value::Map(out))
        }
        (Shape::String, Json::String(s)) => Ok(Value::String(s.clone())),
        (Shape::Integer | Shape::Long, Json::Number(n)) => n
            .as_i64()
            .map(Value::Integer)
            .ok_or_else(|| mismatch("integer", json)),
        (Shape::Float | Shape::Double, Json::Number(n)) => n
            .as_f64()
            .map(Value::Float)
            .ok_or_else(|| mismatch("float", json)),
        (Shape::Boolean, Json::Bool(b)) => Ok(Value::Boolean(*b)),
        (Shape::Blob, Json::String(s)) => Ok(Value::Blob(Bytes::from(base64_decode(s)?))),
        (Shape::Timestamp, Json::Number(n)) => {
            let secs = n.as_f64().ok_or_else(|| mismatch("timestamp", json))?;
            from_epoch_seconds(secs).map(Value::Timestamp)
        }
        (Shape::Timestamp, Json::String(s)) => match s.parse::<f64>() {
            Ok(secs) => from_epoch_seconds(secs).map(Value::Timestamp),
            Err(_) => parse_rfc3339(s).map(Value::Timestamp),
        },
        (shape, json) => Err(mismatch(&format!("{shape:?}"), json)),
    }
}

fn mismatch(expected: &str, got: &Json) -> Error {
    Error::unexpected(format!("expected json {expected} but got {got}"))
}

/// Serialize a json value into bytes.
pub(crate) fn to_bytes(json: &Json) -> Result<Bytes> {
    serde_json::to_vec(json)
        .map(Bytes::from)
        .map_err(|e| Error::request_invalid("failed to serialize json body").with_source(e))
}

/// Parse a response body, an empty body yields `None`.
pub(crate) fn from_bytes(bs: &[u8]) -> Result<Option<Json>> {
    if bs.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(bs)
        .map(Some)
        .map_err(|e| Error::unexpected("failed to parse json body").with_source(e))
}

//! Rest-json protocol.

use crate::error::ApiError;
use crate::json;
use crate::jsonrpc;
use crate::operation::Operation;
use crate::rest;
use crate::shape::{Shape, StructureShape};
use crate::value::{Structure, Value};
use awswire_core::{Body, Error, Request, Result};
use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::HeaderValue;

pub(crate) fn build(
    op: &Operation,
    shape: &StructureShape,
    input: &Structure,
    req: &mut Request,
) -> Result<()> {
    rest::build(op, shape, input, req)?;

    let Some(pm) = shape.payload_member() else {
        if shape.body_members().any(|m| input.get(m.name).is_some()) {
            set_json_body(req, &json::encode_structure(shape, input)?)?;
        }
        return Ok(());
    };

    match (pm.shape, input.get(pm.name)) {
        (_, None) => {}
        (Shape::Structure(st), Some(Value::Structure(s))) => {
            set_json_body(req, &json::encode_structure(st, s)?)?
        }
        (_, Some(Value::Blob(bs))) => req.body = Body::from_bytes(bs.clone()),
        (_, Some(Value::String(s))) => req.body = Body::from_bytes(s.clone()),
        (shape, Some(v)) => {
            return Err(Error::request_invalid(format!(
                "{} value can't be used as {shape:?} payload {}",
                v.kind(),
                pm.name
            )))
        }
    }
    Ok(())
}

fn set_json_body(req: &mut Request, v: &serde_json::Value) -> Result<()> {
    req.body = Body::from_bytes(json::to_bytes(v)?);
    if !req.headers.contains_key(CONTENT_TYPE) {
        req.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }
    Ok(())
}

pub(crate) fn unmarshal(shape: &StructureShape, resp: &http::Response<Bytes>) -> Result<Structure> {
    let mut out = match shape.payload_member() {
        Some(pm) => match pm.shape {
            Shape::Structure(st) => {
                let mut out = Structure::new();
                if let Some(v) = json::from_bytes(resp.body())? {
                    out.insert(pm.name, Value::Structure(json::decode_structure(st, &v)?));
                }
                out
            }
            _ => Structure::new(),
        },
        None => jsonrpc::unmarshal(shape, resp.body())?,
    };

    rest::unmarshal(shape, resp, &mut out)?;
    Ok(out)
}

/// The error code travels in `x-amzn-errortype` like `Code:http://internal`.
pub(crate) fn decode_error(resp: &http::Response<Bytes>) -> ApiError {
    let code = resp
        .headers()
        .get("x-amzn-errortype")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(':').next())
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string());
    jsonrpc::decode_error(resp, code)
}

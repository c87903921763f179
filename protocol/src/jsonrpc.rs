//! Json-rpc protocol: json bodies routed by `X-Amz-Target`.

use crate::error::ApiError;
use crate::json;
use crate::metadata::{header_request_id, ServiceMetadata};
use crate::operation::Operation;
use crate::rest::build_path;
use crate::shape::StructureShape;
use crate::value::Structure;
use awswire_core::{Body, Request, Result};
use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::HeaderValue;
use log::debug;
use serde::Deserialize;

const X_AMZ_TARGET: &str = "x-amz-target";

pub(crate) fn build(
    meta: &ServiceMetadata,
    op: &Operation,
    shape: &StructureShape,
    input: &Structure,
    req: &mut Request,
) -> Result<()> {
    build_path(op, req, |_| None)?;

    let body = json::to_bytes(&json::encode_structure(shape, input)?)?;
    req.body = Body::from_bytes(body);

    if let Some(prefix) = &meta.target_prefix {
        req.headers.insert(
            X_AMZ_TARGET,
            HeaderValue::from_str(&format!("{prefix}.{}", op.name))?,
        );
    }
    let version = meta.json_version.as_deref().unwrap_or("1.1");
    req.headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_str(&format!("application/x-amz-json-{version}"))?,
    );
    Ok(())
}

/// Decode a json body, an empty body is an empty structure.
pub(crate) fn unmarshal(shape: &StructureShape, body: &[u8]) -> Result<Structure> {
    match json::from_bytes(body)? {
        Some(v) => json::decode_structure(shape, &v),
        None => Ok(Structure::new()),
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    #[serde(rename = "__type", default)]
    kind: Option<String>,
    #[serde(alias = "Message", default)]
    message: Option<String>,
}

/// Decode a json error body.
///
/// `code` overrides the `__type` of the body when the protocol carries the
/// error code elsewhere.
pub(crate) fn decode_error(resp: &http::Response<Bytes>, code: Option<String>) -> ApiError {
    let status = resp.status();
    let request_id = header_request_id(resp);
    if resp.body().is_empty() {
        return ApiError::from_status(status).with_request_id(request_id);
    }

    let envelope: ErrorEnvelope = match serde_json::from_slice(resp.body()) {
        Ok(v) => v,
        Err(err) => {
            debug!("failed to parse json error body: {err:?}");
            return ApiError::from_status(status).with_request_id(request_id);
        }
    };

    let code = code
        .or_else(|| {
            envelope
                .kind
                .as_deref()
                .and_then(|v| v.rsplit('#').next())
                .map(|v| v.to_string())
        })
        .unwrap_or_default();
    ApiError::new(status, code, envelope.message.unwrap_or_default()).with_request_id(request_id)
}

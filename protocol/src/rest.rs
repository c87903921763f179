//! Uri, querystring and header bindings shared by rest-json and rest-xml.

use crate::operation::Operation;
use crate::scalar::{from_header_text, to_header_text, to_text};
use crate::shape::{Location, Shape, StructureShape};
use crate::value::{Structure, Value};
use awswire_core::{Error, Request, Result};
use bytes::Bytes;
use http::header::{HeaderName, HeaderValue};
use std::collections::{BTreeMap, HashMap};

/// Append the expanded operation path to the endpoint path of `req`.
pub(crate) fn build_path(
    op: &Operation,
    req: &mut Request,
    resolve: impl FnMut(&str) -> Option<String>,
) -> Result<()> {
    let path = op.http_path.expand(resolve)?;
    req.path.push_str(&path);
    Ok(())
}

/// Bind the uri, querystring and header members of the input.
pub(crate) fn build(
    op: &Operation,
    shape: &StructureShape,
    input: &Structure,
    req: &mut Request,
) -> Result<()> {
    let mut labels = HashMap::new();
    let mut query: Vec<(String, String)> = op.http_path.query().to_vec();

    for m in shape.members {
        let Some(v) = input.get(m.name) else {
            continue;
        };
        match m.location {
            Location::Uri => {
                labels.insert(m.wire_name(), to_text(v)?);
            }
            Location::Querystring => match v {
                Value::List(items) => {
                    for item in items {
                        query.push((m.wire_name().to_string(), to_text(item)?));
                    }
                }
                Value::Map(entries) => {
                    for (k, v) in entries {
                        query.push((k.clone(), to_text(v)?));
                    }
                }
                v => query.push((m.wire_name().to_string(), to_text(v)?)),
            },
            Location::Header => {
                insert_header(req, m.wire_name(), v)?;
            }
            Location::Headers => {
                let Value::Map(entries) = v else {
                    return Err(Error::request_invalid(format!(
                        "headers member {} must be a map",
                        m.name
                    )));
                };
                for (k, v) in entries {
                    insert_header(req, &format!("{}{k}", m.wire_name()), v)?;
                }
            }
            Location::Body | Location::StatusCode => {}
        }
    }

    build_path(op, req, |name| labels.get(name).cloned())?;

    query.sort_by(|a, b| a.0.cmp(&b.0));
    req.query.extend(query);
    Ok(())
}

fn insert_header(req: &mut Request, name: &str, v: &Value) -> Result<()> {
    let name = HeaderName::from_bytes(name.as_bytes())?;
    let value = HeaderValue::from_str(&to_header_text(v)?)?;
    req.headers.insert(name, value);
    Ok(())
}

/// Fill header, status code and raw payload members from the response.
pub(crate) fn unmarshal(
    shape: &StructureShape,
    resp: &http::Response<Bytes>,
    out: &mut Structure,
) -> Result<()> {
    for m in shape.members {
        match m.location {
            Location::Header => {
                if let Some(v) = resp.headers().get(m.wire_name()) {
                    out.insert(m.name, from_header_text(v.to_str()?, m.shape)?);
                }
            }
            Location::Headers => {
                let Shape::Map(ms) = m.shape else {
                    continue;
                };
                let prefix = m.wire_name().to_ascii_lowercase();
                let mut entries = BTreeMap::new();
                for (name, v) in resp.headers() {
                    if let Some(key) = name.as_str().strip_prefix(&prefix) {
                        entries.insert(key.to_string(), from_header_text(v.to_str()?, ms.value)?);
                    }
                }
                if !entries.is_empty() {
                    out.insert(m.name, Value::Map(entries));
                }
            }
            Location::StatusCode => {
                out.insert(m.name, Value::Integer(i64::from(resp.status().as_u16())));
            }
            Location::Body | Location::Uri | Location::Querystring => {}
        }
    }

    if let Some(pm) = shape.payload_member() {
        let body = resp.body();
        match pm.shape {
            Shape::Blob => out.insert(pm.name, Value::Blob(body.clone())),
            Shape::String if !body.is_empty() => {
                out.insert(pm.name, Value::String(String::from_utf8(body.to_vec())?))
            }
            _ => {}
        }
    }
    Ok(())
}

//! Query and ec2 query protocols: form encoded requests, xml responses.

use crate::metadata::ServiceMetadata;
use crate::operation::Operation;
use crate::rest::build_path;
use crate::scalar::to_text;
use crate::shape::{ListShape, MapShape, Member, Shape, StructureShape};
use crate::value::{Structure, Value};
use crate::xml::{decode_structure, XmlNode};
use awswire_core::utils::escape_query;
use awswire_core::{Body, Error, Request, Result};
use http::header::CONTENT_TYPE;
use http::HeaderValue;
use std::collections::BTreeMap;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=utf-8";

/// Flavor of the query protocol, they differ in how names are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flavor {
    Query,
    Ec2,
}

pub(crate) fn build(
    flavor: Flavor,
    meta: &ServiceMetadata,
    op: &Operation,
    shape: &StructureShape,
    input: &Structure,
    req: &mut Request,
) -> Result<()> {
    let mut params = vec![
        ("Action".to_string(), op.name.to_string()),
        ("Version".to_string(), meta.api_version.clone()),
    ];
    encode_structure(flavor, &mut params, "", shape, input)?;
    params.sort_by(|a, b| a.0.cmp(&b.0));

    build_path(op, req, |_| None)?;
    req.headers
        .insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));
    req.body = Body::from_bytes(encode_form(&params));
    Ok(())
}

/// Encode pairs the way `url.QueryEscape` does, space becomes `+`.
fn encode_form(params: &[(String, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", form_escape(k), form_escape(v)))
        .collect::<Vec<_>>()
        .join("&")
}

fn form_escape(v: &str) -> String {
    escape_query(v).replace("%20", "+")
}

fn member_name(flavor: Flavor, m: &Member) -> String {
    match flavor {
        Flavor::Query => m.wire_name().to_string(),
        Flavor::Ec2 => {
            if let Some(name) = m.query_name {
                return name.to_string();
            }
            match m.location_name {
                Some(name) => capitalize(name),
                None => m.name.to_string(),
            }
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn encode_structure(
    flavor: Flavor,
    params: &mut Vec<(String, String)>,
    prefix: &str,
    shape: &StructureShape,
    s: &Structure,
) -> Result<()> {
    for m in shape.body_members() {
        let Some(v) = s.get(m.name) else {
            continue;
        };
        let name = member_name(flavor, m);
        let name = if prefix.is_empty() {
            name
        } else {
            format!("{prefix}.{name}")
        };

        let flattened = m.flattened || flavor == Flavor::Ec2;
        match (m.shape, v) {
            (Shape::List(ls), Value::List(items)) => {
                encode_list(flavor, params, &name, ls, items, flattened)?
            }
            (Shape::Map(ms), Value::Map(entries)) => {
                encode_map(flavor, params, &name, ms, entries, flattened)?
            }
            (shape, v) => encode_value(flavor, params, &name, shape, v)?,
        }
    }
    Ok(())
}

fn encode_list(
    flavor: Flavor,
    params: &mut Vec<(String, String)>,
    name: &str,
    ls: &ListShape,
    items: &[Value],
    flattened: bool,
) -> Result<()> {
    if items.is_empty() {
        if flavor == Flavor::Query {
            params.push((name.to_string(), String::new()));
        }
        return Ok(());
    }

    for (i, item) in items.iter().enumerate() {
        let key = if flattened {
            format!("{name}.{}", i + 1)
        } else {
            format!("{name}.{}.{}", ls.element_name(), i + 1)
        };
        encode_value(flavor, params, &key, ls.member, item)?;
    }
    Ok(())
}

fn encode_map(
    flavor: Flavor,
    params: &mut Vec<(String, String)>,
    name: &str,
    ms: &MapShape,
    entries: &BTreeMap<String, Value>,
    flattened: bool,
) -> Result<()> {
    for (i, (k, v)) in entries.iter().enumerate() {
        let base = if flattened {
            format!("{name}.{}", i + 1)
        } else {
            format!("{name}.entry.{}", i + 1)
        };
        params.push((format!("{base}.{}", ms.key_element()), k.clone()));
        encode_value(
            flavor,
            params,
            &format!("{base}.{}", ms.value_element()),
            ms.value,
            v,
        )?;
    }
    Ok(())
}

fn encode_value(
    flavor: Flavor,
    params: &mut Vec<(String, String)>,
    name: &str,
    shape: Shape,
    v: &Value,
) -> Result<()> {
    let flattened = flavor == Flavor::Ec2;
    match (shape, v) {
        (Shape::Structure(st), Value::Structure(s)) => encode_structure(flavor, params, name, st, s),
        (Shape::List(ls), Value::List(items)) => encode_list(flavor, params, name, ls, items, flattened),
        (Shape::Map(ms), Value::Map(entries)) => encode_map(flavor, params, name, ms, entries, flattened),
        (shape, v) if shape.is_scalar() => {
            params.push((name.to_string(), to_text(v)?));
            Ok(())
        }
        (shape, v) => Err(Error::request_invalid(format!(
            "{} value doesn't match shape {shape:?} of {name}",
            v.kind()
        ))),
    }
}

/// Decode the xml response body.
///
/// Query responses wrap the output in `<{Operation}Result>`, ec2 responses
/// carry the members right under the root.
pub(crate) fn unmarshal(
    flavor: Flavor,
    op: &Operation,
    shape: &StructureShape,
    body: &[u8],
) -> Result<Structure> {
    let Some(root) = XmlNode::parse(body)? else {
        return Ok(Structure::new());
    };

    match flavor {
        Flavor::Ec2 => decode_structure(&root, shape),
        Flavor::Query => match root.child(&format!("{}Result", op.name)) {
            Some(node) => decode_structure(node, shape),
            None => Ok(Structure::new()),
        },
    }
}

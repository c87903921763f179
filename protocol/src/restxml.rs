//! Rest-xml protocol.

use crate::operation::Operation;
use crate::rest;
use crate::shape::{Shape, StructureShape};
use crate::value::{Structure, Value};
use crate::xml::{decode_structure, encode_document, XmlNode};
use awswire_core::{Body, Error, Request, Result};
use bytes::Bytes;

pub(crate) fn build(
    op: &Operation,
    shape: &StructureShape,
    input: &Structure,
    req: &mut Request,
) -> Result<()> {
    rest::build(op, shape, input, req)?;

    let Some(pm) = shape.payload_member() else {
        if shape.body_members().any(|m| input.get(m.name).is_some()) {
            let root = shape.location_name.unwrap_or(shape.name);
            req.body = Body::from_bytes(encode_document(root, shape.xml_namespace, shape, input)?);
        }
        return Ok(());
    };

    match (pm.shape, input.get(pm.name)) {
        (_, None) => {}
        (Shape::Structure(st), Some(Value::Structure(s))) => {
            let root = pm.location_name.or(st.location_name).unwrap_or(pm.name);
            let ns = pm.xml_namespace.or(st.xml_namespace);
            req.body = Body::from_bytes(encode_document(root, ns, st, s)?);
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

pub(crate) fn unmarshal(shape: &StructureShape, resp: &http::Response<Bytes>) -> Result<Structure> {
    let mut out = Structure::new();
    match shape.payload_member() {
        Some(pm) => {
            if let Shape::Structure(st) = pm.shape {
                if let Some(root) = XmlNode::parse(resp.body())? {
                    out.insert(pm.name, Value::Structure(decode_structure(&root, st)?));
                }
            }
        }
        None => {
            if let Some(root) = XmlNode::parse(resp.body())? {
                out = decode_structure(&root, shape)?;
            }
        }
    }

    rest::unmarshal(shape, resp, &mut out)?;
    Ok(out)
}

//! Xml document tree and the shape driven xml codec.

use crate::error::ApiError;
use crate::metadata::header_request_id;
use crate::scalar::{from_text, to_text};
use crate::shape::{MapShape, Member, Shape, StructureShape, XmlNamespace};
use crate::value::{Structure, Value};
use awswire_core::{Error, Result};
use bytes::Bytes;
use log::debug;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::collections::BTreeMap;

/// An element of a parsed xml document.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct XmlNode {
    /// Local name, the namespace prefix is dropped.
    pub name: String,
    /// Attributes with their qualified names.
    pub attributes: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<XmlNode>,
}

impl XmlNode {
    /// Parse a document, returns `None` for an empty body.
    pub fn parse(bs: &[u8]) -> Result<Option<XmlNode>> {
        // Text is kept verbatim, leading and trailing spaces of a value matter.
        let mut reader = Reader::from_reader(bs);

        let mut stack: Vec<XmlNode> = Vec::new();
        let mut root = None;
        loop {
            let event = reader
                .read_event()
                .map_err(|e| Error::unexpected("failed to parse xml").with_source(e))?;
            match event {
                Event::Start(e) => stack.push(XmlNode::from_start(&e)?),
                Event::Empty(e) => {
                    let node = XmlNode::from_start(&e)?;
                    attach(&mut stack, &mut root, node);
                }
                Event::Text(e) => {
                    let text = e
                        .unescape()
                        .map_err(|e| Error::unexpected("failed to unescape xml text").with_source(e))?;
                    if let Some(top) = stack.last_mut() {
                        top.text.push_str(&text);
                    }
                }
                Event::CData(e) => {
                    if let Some(top) = stack.last_mut() {
                        top.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                    }
                }
                Event::End(_) => {
                    let mut node = stack
                        .pop()
                        .ok_or_else(|| Error::unexpected("unexpected xml end element"))?;
                    // Indentation between children.
                    if !node.children.is_empty() && node.text.trim().is_empty() {
                        node.text.clear();
                    }
                    attach(&mut stack, &mut root, node);
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(Error::unexpected("xml document ended with unclosed elements"));
        }
        Ok(root)
    }

    fn from_start(e: &BytesStart) -> Result<Self> {
        let mut node = XmlNode {
            name: String::from_utf8_lossy(e.local_name().as_ref()).to_string(),
            ..Default::default()
        };
        for attr in e.attributes() {
            let attr =
                attr.map_err(|e| Error::unexpected("invalid xml attribute").with_source(e))?;
            let value = attr
                .unescape_value()
                .map_err(|e| Error::unexpected("invalid xml attribute").with_source(e))?;
            node.attributes.push((
                String::from_utf8_lossy(attr.key.as_ref()).to_string(),
                value.to_string(),
            ));
        }
        Ok(node)
    }

    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Lookup an attribute by qualified name, then by local name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        let local = name.rsplit(':').next().unwrap_or(name);
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .or_else(|| {
                self.attributes
                    .iter()
                    .find(|(k, _)| k.rsplit(':').next() == Some(local))
            })
            .map(|(_, v)| v.as_str())
    }

    /// Depth first search, including self.
    pub fn find(&self, name: &str) -> Option<&XmlNode> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(name))
    }
}

fn attach(stack: &mut [XmlNode], root: &mut Option<XmlNode>, node: XmlNode) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => {
            if root.is_none() {
                *root = Some(node);
            }
        }
    }
}

/// Decode the members of `shape` from the children of `node`.
pub(crate) fn decode_structure(node: &XmlNode, shape: &StructureShape) -> Result<Structure> {
    let mut out = Structure::new();
    for m in shape.body_members() {
        if let Some(v) = decode_member(node, m)? {
            out.insert(m.name, v);
        }
    }
    Ok(out)
}

fn decode_member(node: &XmlNode, m: &Member) -> Result<Option<Value>> {
    let name = m.wire_name();
    if m.xml_attribute {
        return node
            .attribute(name)
            .map(|v| from_text(v, m.shape))
            .transpose();
    }

    match m.shape {
        Shape::List(ls) if m.flattened => {
            let items = node
                .children_named(name)
                .map(|c| decode_value(c, ls.member))
                .collect::<Result<Vec<_>>>()?;
            Ok((!items.is_empty()).then_some(Value::List(items)))
        }
        Shape::Map(ms) if m.flattened => {
            let entries = decode_entries(node.children_named(name), ms)?;
            Ok((!entries.is_empty()).then_some(Value::Map(entries)))
        }
        shape => match node.child(name) {
            Some(child) => decode_value(child, shape).map(Some),
            None if shape.is_scalar() => node
                .attribute(name)
                .map(|v| from_text(v, shape))
                .transpose(),
            None => Ok(None),
        },
    }
}

fn decode_value(node: &XmlNode, shape: Shape) -> Result<Value> {
    match shape {
        Shape::Structure(st) => decode_structure(node, st).map(Value::Structure),
        Shape::List(ls) => node
            .children_named(ls.element_name())
            .map(|c| decode_value(c, ls.member))
            .collect::<Result<Vec<_>>>()
            .map(Value::List),
        Shape::Map(ms) => decode_entries(node.children_named("entry"), ms).map(Value::Map),
        shape => from_text(&node.text, shape),
    }
}

fn decode_entries<'a>(
    entries: impl Iterator<Item = &'a XmlNode>,
    ms: &MapShape,
) -> Result<BTreeMap<String, Value>> {
    let mut out = BTreeMap::new();
    for entry in entries {
        let Some(key) = entry.child(ms.key_element()) else {
            continue;
        };
        let Some(value) = entry.child(ms.value_element()) else {
            continue;
        };
        out.insert(key.text.clone(), decode_value(value, ms.value)?);
    }
    Ok(out)
}

type XmlWriter = Writer<Vec<u8>>;

/// Encode a structure as an xml document rooted at `root`.
pub(crate) fn encode_document(
    root: &str,
    ns: Option<XmlNamespace>,
    shape: &StructureShape,
    s: &Structure,
) -> Result<Bytes> {
    let mut w = Writer::new(Vec::new());
    write_structure(&mut w, root, ns, shape, s)?;
    Ok(Bytes::from(w.into_inner()))
}

fn write(w: &mut XmlWriter, event: Event<'_>) -> Result<()> {
    w.write_event(event)
        .map_err(|e| Error::unexpected("failed to write xml").with_source(e))
}

fn start_element(name: &str, ns: Option<XmlNamespace>) -> BytesStart<'_> {
    let mut start = BytesStart::new(name);
    if let Some(ns) = ns {
        match ns.prefix {
            Some(prefix) => start.push_attribute((format!("xmlns:{prefix}").as_str(), ns.uri)),
            None => start.push_attribute(("xmlns", ns.uri)),
        }
    }
    start
}

fn write_structure(
    w: &mut XmlWriter,
    name: &str,
    ns: Option<XmlNamespace>,
    shape: &StructureShape,
    s: &Structure,
) -> Result<()> {
    let mut start = start_element(name, ns);
    for m in shape.body_members().filter(|m| m.xml_attribute) {
        if let Some(v) = s.get(m.name) {
            start.push_attribute((m.wire_name(), to_text(v)?.as_str()));
        }
    }
    write(w, Event::Start(start))?;

    for m in shape.body_members().filter(|m| !m.xml_attribute) {
        if let Some(v) = s.get(m.name) {
            write_member(w, m, v)?;
        }
    }
    write(w, Event::End(BytesEnd::new(name)))
}

fn write_member(w: &mut XmlWriter, m: &Member, v: &Value) -> Result<()> {
    let name = m.wire_name();
    match (m.shape, v) {
        (Shape::List(ls), Value::List(items)) if m.flattened => {
            for item in items {
                write_value(w, name, m.xml_namespace, ls.member, item)?;
            }
            Ok(())
        }
        (Shape::Map(ms), Value::Map(entries)) if m.flattened => {
            for (key, value) in entries {
                write(w, Event::Start(start_element(name, m.xml_namespace)))?;
                write_entry(w, ms, key, value)?;
                write(w, Event::End(BytesEnd::new(name)))?;
            }
            Ok(())
        }
        (shape, v) => write_value(w, name, m.xml_namespace, shape, v),
    }
}

fn write_value(
    w: &mut XmlWriter,
    name: &str,
    ns: Option<XmlNamespace>,
    shape: Shape,
    v: &Value,
) -> Result<()> {
    match (shape, v) {
        (Shape::Structure(st), Value::Structure(s)) => write_structure(w, name, ns, st, s),
        (Shape::List(ls), Value::List(items)) => {
            write(w, Event::Start(start_element(name, ns)))?;
            for item in items {
                write_value(w, ls.element_name(), None, ls.member, item)?;
            }
            write(w, Event::End(BytesEnd::new(name)))
        }
        (Shape::Map(ms), Value::Map(entries)) => {
            write(w, Event::Start(start_element(name, ns)))?;
            for (key, value) in entries {
                write(w, Event::Start(BytesStart::new("entry")))?;
                write_entry(w, ms, key, value)?;
                write(w, Event::End(BytesEnd::new("entry")))?;
            }
            write(w, Event::End(BytesEnd::new(name)))
        }
        (shape, v) if shape.is_scalar() => {
            let text = to_text(v)?;
            write(w, Event::Start(start_element(name, ns)))?;
            write(w, Event::Text(BytesText::new(&text)))?;
            write(w, Event::End(BytesEnd::new(name)))
        }
        (shape, v) => Err(Error::request_invalid(format!(
            "{} value doesn't match shape {shape:?} of {name}",
            v.kind()
        ))),
    }
}

fn write_entry(w: &mut XmlWriter, ms: &MapShape, key: &str, value: &Value) -> Result<()> {
    write_value(
        w,
        ms.key_element(),
        None,
        Shape::String,
        &Value::String(key.to_string()),
    )?;
    write_value(w, ms.value_element(), None, ms.value, value)
}

/// Decode an xml error envelope.
///
/// Both `<ErrorResponse><Error>..</Error></ErrorResponse>` and the bare
/// `<Error>..</Error>` are accepted, the request id is searched in the whole
/// document.
pub(crate) fn decode_error(resp: &http::Response<Bytes>) -> ApiError {
    let status = resp.status();
    let root = match XmlNode::parse(resp.body()) {
        Ok(Some(root)) => root,
        Ok(None) => return ApiError::from_status(status).with_request_id(header_request_id(resp)),
        Err(err) => {
            debug!("failed to parse xml error body: {err:?}");
            return ApiError::from_status(status).with_request_id(header_request_id(resp));
        }
    };

    let request_id = header_request_id(resp).or_else(|| body_request_id(&root));
    let Some(code) = root
        .find("Error")
        .and_then(|e| e.child("Code"))
        .map(|c| c.text.clone())
    else {
        return ApiError::from_status(status).with_request_id(request_id);
    };
    let message = root
        .find("Error")
        .and_then(|e| e.child("Message"))
        .map(|c| c.text.clone())
        .unwrap_or_default();

    ApiError::new(status, code, message).with_request_id(request_id)
}

/// Request id carried by the xml body.
pub(crate) fn body_request_id(root: &XmlNode) -> Option<String> {
    root.find("RequestId")
        .or_else(|| root.find("RequestID"))
        .map(|v| v.text.clone())
        .filter(|v| !v.is_empty())
}

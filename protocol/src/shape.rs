//! Static descriptors of the wire layout of API shapes.
//!
//! Shapes are declared once as `static` items and shared by every request:
//!
//! ```
//! use awswire_protocol::{ListShape, Member, Shape, StructureShape};
//!
//! static LIST_ARG: ListShape = ListShape::new(Shape::String);
//! static INPUT_MEMBERS: [Member; 1] = [Member::new("ListArg", Shape::List(&LIST_ARG))];
//! static INPUT: StructureShape = StructureShape::new("InputShape", &INPUT_MEMBERS);
//!
//! assert!(INPUT.member("ListArg").is_some());
//! ```

use std::fmt;

/// The type of a member as it travels on the wire.
#[derive(Clone, Copy)]
pub enum Shape {
    /// UTF-8 text.
    String,
    /// 32 bit integer.
    Integer,
    /// 64 bit integer.
    Long,
    /// 32 bit float.
    Float,
    /// 64 bit float.
    Double,
    /// Boolean.
    Boolean,
    /// Binary data.
    Blob,
    /// Point in time.
    Timestamp,
    /// Ordered collection.
    List(&'static ListShape),
    /// String keyed collection.
    Map(&'static MapShape),
    /// Named members.
    Structure(&'static StructureShape),
}

impl Shape {
    /// Returns true if the shape carries a single scalar value.
    pub fn is_scalar(&self) -> bool {
        !matches!(self, Shape::List(_) | Shape::Map(_) | Shape::Structure(_))
    }
}

// Recursive shapes point back to themselves, only the structure name is printed.
impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::String => f.write_str("String"),
            Shape::Integer => f.write_str("Integer"),
            Shape::Long => f.write_str("Long"),
            Shape::Float => f.write_str("Float"),
            Shape::Double => f.write_str("Double"),
            Shape::Boolean => f.write_str("Boolean"),
            Shape::Blob => f.write_str("Blob"),
            Shape::Timestamp => f.write_str("Timestamp"),
            Shape::List(v) => f.debug_tuple("List").field(&v.member).finish(),
            Shape::Map(v) => f.debug_tuple("Map").field(&v.value).finish(),
            Shape::Structure(v) => write!(f, "Structure({})", v.name),
        }
    }
}

/// List shape.
#[derive(Debug)]
pub struct ListShape {
    /// Shape of every element.
    pub member: Shape,
    /// Element name used by non flattened lists, `member` by default.
    pub member_name: Option<&'static str>,
}

impl ListShape {
    /// Create a list of the given member shape.
    pub const fn new(member: Shape) -> Self {
        Self {
            member,
            member_name: None,
        }
    }

    /// Set the element name.
    pub const fn member_name(self, name: &'static str) -> Self {
        Self {
            member_name: Some(name),
            ..self
        }
    }

    pub(crate) fn element_name(&self) -> &'static str {
        self.member_name.unwrap_or("member")
    }
}

/// Map shape, keys are always strings.
#[derive(Debug)]
pub struct MapShape {
    /// Shape of every value.
    pub value: Shape,
    /// Name of the key element, `key` by default.
    pub key_name: Option<&'static str>,
    /// Name of the value element, `value` by default.
    pub value_name: Option<&'static str>,
}

impl MapShape {
    /// Create a map of the given value shape.
    pub const fn new(value: Shape) -> Self {
        Self {
            value,
            key_name: None,
            value_name: None,
        }
    }

    /// Set the key element name.
    pub const fn key_name(self, name: &'static str) -> Self {
        Self {
            key_name: Some(name),
            ..self
        }
    }

    /// Set the value element name.
    pub const fn value_name(self, name: &'static str) -> Self {
        Self {
            value_name: Some(name),
            ..self
        }
    }

    pub(crate) fn key_element(&self) -> &'static str {
        self.key_name.unwrap_or("key")
    }

    pub(crate) fn value_element(&self) -> &'static str {
        self.value_name.unwrap_or("value")
    }
}

/// Structure shape.
#[derive(Debug)]
pub struct StructureShape {
    /// Shape name.
    pub name: &'static str,
    /// Members in declared order.
    pub members: &'static [Member],
    /// Name of the member that forms the whole body.
    pub payload: Option<&'static str>,
    /// Element name of the xml root.
    pub location_name: Option<&'static str>,
    /// Namespace of the xml root.
    pub xml_namespace: Option<XmlNamespace>,
}

impl StructureShape {
    /// Create a structure with the given members.
    pub const fn new(name: &'static str, members: &'static [Member]) -> Self {
        Self {
            name,
            members,
            payload: None,
            location_name: None,
            xml_namespace: None,
        }
    }

    /// Mark a member as the payload.
    pub const fn payload(self, member: &'static str) -> Self {
        Self {
            payload: Some(member),
            ..self
        }
    }

    /// Set the xml root element name.
    pub const fn location_name(self, name: &'static str) -> Self {
        Self {
            location_name: Some(name),
            ..self
        }
    }

    /// Set the xml root namespace.
    pub const fn xml_namespace(self, ns: XmlNamespace) -> Self {
        Self {
            xml_namespace: Some(ns),
            ..self
        }
    }

    /// Find a member by name.
    pub fn member(&self, name: &str) -> Option<&'static Member> {
        self.members.iter().find(|m| m.name == name)
    }

    /// The payload member, if any.
    pub fn payload_member(&self) -> Option<&'static Member> {
        self.payload.and_then(|name| self.member(name))
    }

    /// Members carried in the body.
    pub(crate) fn body_members(&self) -> impl Iterator<Item = &'static Member> {
        self.members
            .iter()
            .filter(|m| m.location == Location::Body)
    }
}

/// Where a member lives in the http message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Location {
    /// Serialized into the body by the protocol.
    #[default]
    Body,
    /// A `{label}` of the uri path.
    Uri,
    /// A query string parameter.
    Querystring,
    /// A single header.
    Header,
    /// A map of headers sharing a prefix.
    Headers,
    /// The http status code, output only.
    StatusCode,
}

/// An xml namespace declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XmlNamespace {
    /// Namespace prefix, `None` declares the default namespace.
    pub prefix: Option<&'static str>,
    /// Namespace uri.
    pub uri: &'static str,
}

impl XmlNamespace {
    /// Declare the default namespace.
    pub const fn new(uri: &'static str) -> Self {
        Self { prefix: None, uri }
    }

    /// Declare a prefixed namespace.
    pub const fn with_prefix(prefix: &'static str, uri: &'static str) -> Self {
        Self {
            prefix: Some(prefix),
            uri,
        }
    }
}

/// A member of a structure.
#[derive(Debug, Clone, Copy)]
pub struct Member {
    /// Member name.
    pub name: &'static str,
    /// Member shape.
    pub shape: Shape,
    /// Where the member lives.
    pub location: Location,
    /// Wire name, defaults to the member name.
    pub location_name: Option<&'static str>,
    /// Name used by ec2 query.
    pub query_name: Option<&'static str>,
    /// Lists and maps repeat the member instead of wrapping it.
    pub flattened: bool,
    /// Serialized as an attribute of the parent xml element.
    pub xml_attribute: bool,
    /// Namespace declared on the member element.
    pub xml_namespace: Option<XmlNamespace>,
    /// The member must be set.
    pub required: bool,
}

impl Member {
    /// Create a body member.
    pub const fn new(name: &'static str, shape: Shape) -> Self {
        Self {
            name,
            shape,
            location: Location::Body,
            location_name: None,
            query_name: None,
            flattened: false,
            xml_attribute: false,
            xml_namespace: None,
            required: false,
        }
    }

    /// Set the location.
    pub const fn location(self, location: Location) -> Self {
        Self { location, ..self }
    }

    /// Set the wire name.
    pub const fn location_name(self, name: &'static str) -> Self {
        Self {
            location_name: Some(name),
            ..self
        }
    }

    /// Set the ec2 query name.
    pub const fn query_name(self, name: &'static str) -> Self {
        Self {
            query_name: Some(name),
            ..self
        }
    }

    /// Mark the member as flattened.
    pub const fn flattened(self) -> Self {
        Self {
            flattened: true,
            ..self
        }
    }

    /// Mark the member as an xml attribute.
    pub const fn xml_attribute(self) -> Self {
        Self {
            xml_attribute: true,
            ..self
        }
    }

    /// Declare a namespace on the member element.
    pub const fn xml_namespace(self, ns: XmlNamespace) -> Self {
        Self {
            xml_namespace: Some(ns),
            ..self
        }
    }

    /// Mark the member as required.
    pub const fn required(self) -> Self {
        Self {
            required: true,
            ..self
        }
    }

    /// The name on the wire.
    pub fn wire_name(&self) -> &'static str {
        self.location_name.unwrap_or(self.name)
    }
}

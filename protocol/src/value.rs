//! Typed value tree walked by the protocol codecs.

use crate::shape::StructureShape;
use awswire_core::time::DateTime;
use awswire_core::{Error, Result};
use bytes::Bytes;
use std::collections::{BTreeMap, HashMap};

/// A value of any shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// String value.
    String(String),
    /// Integer or long value.
    Integer(i64),
    /// Float or double value.
    Float(f64),
    /// Boolean value.
    Boolean(bool),
    /// Blob value.
    Blob(Bytes),
    /// Timestamp value.
    Timestamp(DateTime),
    /// List value.
    List(Vec<Value>),
    /// Map value, sorted by key.
    Map(BTreeMap<String, Value>),
    /// Structure value.
    Structure(Structure),
}

impl Value {
    /// Name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Boolean(_) => "boolean",
            Value::Blob(_) => "blob",
            Value::Timestamp(_) => "timestamp",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Structure(_) => "structure",
        }
    }

    /// Unwrap a structure value.
    pub fn into_structure(self) -> Result<Structure> {
        match self {
            Value::Structure(s) => Ok(s),
            v => Err(mismatch("structure", &v)),
        }
    }
}

fn mismatch(expected: &str, got: &Value) -> Error {
    Error::unexpected(format!("expected {expected} value but got {}", got.kind()))
}

/// Member values of a structure, keyed by member name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Structure {
    fields: BTreeMap<String, Value>,
}

impl Structure {
    /// Create an empty structure.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a member if the value is present.
    pub fn with<T: ToValue + ?Sized>(mut self, name: &str, value: &T) -> Self {
        if let Some(v) = value.to_value() {
            self.fields.insert(name.to_string(), v);
        }
        self
    }

    /// Insert a member value.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.fields.insert(name.into(), value);
    }

    /// Get a member value.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Remove a member value.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.fields.remove(name)
    }

    /// Remove a member and convert it.
    ///
    /// Missing members go through [`FromValue::absent`].
    pub fn take<T: FromValue>(&mut self, name: &str) -> Result<T> {
        match self.fields.remove(name) {
            Some(v) => T::from_value(v).map_err(|e| {
                Error::unexpected(format!("failed to decode member {name}")).with_source(e)
            }),
            None => T::absent()
                .map_err(|_| Error::unexpected(format!("required member {name} is missing"))),
        }
    }

    /// Returns true if no member is set.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over the members, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Types that can be turned into a [`Value`].
pub trait ToValue {
    /// Convert into a value, `None` means absent.
    fn to_value(&self) -> Option<Value>;
}

/// Types that can be built from a [`Value`].
pub trait FromValue: Sized {
    /// Convert from a value.
    fn from_value(v: Value) -> Result<Self>;

    /// Value used when the member is missing.
    fn absent() -> Result<Self> {
        Err(Error::unexpected("value is missing"))
    }
}

/// Input types of an operation.
pub trait SerializeShape {
    /// Shape of the input.
    fn shape() -> &'static StructureShape;

    /// Collect the member values.
    fn to_structure(&self) -> Structure;
}

/// Output types of an operation.
pub trait DeserializeShape: Sized {
    /// Shape of the output.
    fn shape() -> &'static StructureShape;

    /// Build from the decoded member values.
    fn from_structure(s: Structure) -> Result<Self>;
}

static UNIT: StructureShape = StructureShape::new("Unit", &[]);

impl SerializeShape for () {
    fn shape() -> &'static StructureShape {
        &UNIT
    }

    fn to_structure(&self) -> Structure {
        Structure::new()
    }
}

impl DeserializeShape for () {
    fn shape() -> &'static StructureShape {
        &UNIT
    }

    fn from_structure(_: Structure) -> Result<Self> {
        Ok(())
    }
}

impl ToValue for Value {
    fn to_value(&self) -> Option<Value> {
        Some(self.clone())
    }
}

impl FromValue for Value {
    fn from_value(v: Value) -> Result<Self> {
        Ok(v)
    }
}

impl ToValue for Structure {
    fn to_value(&self) -> Option<Value> {
        Some(Value::Structure(self.clone()))
    }
}

impl FromValue for Structure {
    fn from_value(v: Value) -> Result<Self> {
        v.into_structure()
    }
}

impl ToValue for str {
    fn to_value(&self) -> Option<Value> {
        Some(Value::String(self.to_string()))
    }
}

impl ToValue for &str {
    fn to_value(&self) -> Option<Value> {
        Some(Value::String(self.to_string()))
    }
}

impl ToValue for String {
    fn to_value(&self) -> Option<Value> {
        Some(Value::String(self.clone()))
    }
}

impl FromValue for String {
    fn from_value(v: Value) -> Result<Self> {
        match v {
            Value::String(s) => Ok(s),
            v => Err(mismatch("string", &v)),
        }
    }
}

impl ToValue for i64 {
    fn to_value(&self) -> Option<Value> {
        Some(Value::Integer(*self))
    }
}

impl FromValue for i64 {
    fn from_value(v: Value) -> Result<Self> {
        match v {
            Value::Integer(i) => Ok(i),
            Value::String(s) => s.parse().map_err(|e| {
                Error::unexpected(format!("failed to parse {s} as integer")).with_source(e)
            }),
            v => Err(mismatch("integer", &v)),
        }
    }
}

impl ToValue for i32 {
    fn to_value(&self) -> Option<Value> {
        Some(Value::Integer(i64::from(*self)))
    }
}

impl FromValue for i32 {
    fn from_value(v: Value) -> Result<Self> {
        let i = i64::from_value(v)?;
        i32::try_from(i)
            .map_err(|e| Error::unexpected(format!("integer {i} out of range")).with_source(e))
    }
}

impl ToValue for f64 {
    fn to_value(&self) -> Option<Value> {
        Some(Value::Float(*self))
    }
}

impl FromValue for f64 {
    fn from_value(v: Value) -> Result<Self> {
        match v {
            Value::Float(f) => Ok(f),
            Value::Integer(i) => Ok(i as f64),
            Value::String(s) => s.parse().map_err(|e| {
                Error::unexpected(format!("failed to parse {s} as float")).with_source(e)
            }),
            v => Err(mismatch("float", &v)),
        }
    }
}

impl ToValue for f32 {
    fn to_value(&self) -> Option<Value> {
        Some(Value::Float(f64::from(*self)))
    }
}

impl FromValue for f32 {
    fn from_value(v: Value) -> Result<Self> {
        f64::from_value(v).map(|f| f as f32)
    }
}

impl ToValue for bool {
    fn to_value(&self) -> Option<Value> {
        Some(Value::Boolean(*self))
    }
}

impl FromValue for bool {
    fn from_value(v: Value) -> Result<Self> {
        match v {
            Value::Boolean(b) => Ok(b),
            v => Err(mismatch("boolean", &v)),
        }
    }
}

impl ToValue for Bytes {
    fn to_value(&self) -> Option<Value> {
        Some(Value::Blob(self.clone()))
    }
}

impl FromValue for Bytes {
    fn from_value(v: Value) -> Result<Self> {
        match v {
            Value::Blob(b) => Ok(b),
            Value::String(s) => Ok(Bytes::from(s)),
            v => Err(mismatch("blob", &v)),
        }
    }
}

impl ToValue for Vec<u8> {
    fn to_value(&self) -> Option<Value> {
        Some(Value::Blob(Bytes::copy_from_slice(self)))
    }
}

impl FromValue for Vec<u8> {
    fn from_value(v: Value) -> Result<Self> {
        Bytes::from_value(v).map(|b| b.to_vec())
    }
}

impl ToValue for DateTime {
    fn to_value(&self) -> Option<Value> {
        Some(Value::Timestamp(*self))
    }
}

impl FromValue for DateTime {
    fn from_value(v: Value) -> Result<Self> {
        match v {
            Value::Timestamp(t) => Ok(t),
            v => Err(mismatch("timestamp", &v)),
        }
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Option<Value> {
        self.as_ref().and_then(|v| v.to_value())
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(v: Value) -> Result<Self> {
        T::from_value(v).map(Some)
    }

    fn absent() -> Result<Self> {
        Ok(None)
    }
}

impl<T: ToValue> ToValue for Vec<T> {
    fn to_value(&self) -> Option<Value> {
        Some(Value::List(self.iter().filter_map(|v| v.to_value()).collect()))
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(v: Value) -> Result<Self> {
        match v {
            Value::List(items) => items.into_iter().map(T::from_value).collect(),
            v => Err(mismatch("list", &v)),
        }
    }

    fn absent() -> Result<Self> {
        Ok(Vec::new())
    }
}

impl<T: ToValue> ToValue for BTreeMap<String, T> {
    fn to_value(&self) -> Option<Value> {
        Some(Value::Map(
            self.iter()
                .filter_map(|(k, v)| v.to_value().map(|v| (k.clone(), v)))
                .collect(),
        ))
    }
}

impl<T: FromValue> FromValue for BTreeMap<String, T> {
    fn from_value(v: Value) -> Result<Self> {
        match v {
            Value::Map(entries) => entries
                .into_iter()
                .map(|(k, v)| T::from_value(v).map(|v| (k, v)))
                .collect(),
            v => Err(mismatch("map", &v)),
        }
    }

    fn absent() -> Result<Self> {
        Ok(BTreeMap::new())
    }
}

impl<T: ToValue> ToValue for HashMap<String, T> {
    fn to_value(&self) -> Option<Value> {
        Some(Value::Map(
            self.iter()
                .filter_map(|(k, v)| v.to_value().map(|v| (k.clone(), v)))
                .collect(),
        ))
    }
}

impl<T: FromValue> FromValue for HashMap<String, T> {
    fn from_value(v: Value) -> Result<Self> {
        BTreeMap::<String, T>::from_value(v).map(|m| m.into_iter().collect())
    }

    fn absent() -> Result<Self> {
        Ok(HashMap::new())
    }
}

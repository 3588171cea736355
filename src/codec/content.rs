//! Format-agnostic document tree.
//!
//! [`Content`] is what every encoding decodes into and what every entity
//! serializes into. Objects are ordered member lists rather than maps: the
//! order written is the order read back, and duplicate member names survive
//! decoding so that the parser can reject them.

use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::ser::{self, SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A node in a structured document.
#[derive(Debug, Clone)]
pub enum Content {
    /// Explicit null.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Floating-point value.
    Float(f64),
    /// String value.
    String(String),
    /// Ordered array of values.
    Array(Vec<Content>),
    /// Object members in document order.
    Object(Vec<(String, Content)>),
}

impl Content {
    /// Human-readable name of this node's kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Content::Null => "null",
            Content::Bool(_) => "boolean",
            Content::Int(_) => "integer",
            Content::Float(_) => "float",
            Content::String(_) => "string",
            Content::Array(_) => "array",
            Content::Object(_) => "object",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Content::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Content::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Content::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Content::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric view; integers widen to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Content::Int(i) => Some(*i as f64),
            Content::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Content]> {
        match self {
            Content::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&[(String, Content)]> {
        match self {
            Content::Object(members) => Some(members),
            _ => None,
        }
    }

    /// First member with the given name, if this is an object.
    pub fn get(&self, name: &str) -> Option<&Content> {
        self.as_object()?
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Start building an object node.
    pub fn object() -> ObjectBuilder {
        ObjectBuilder::new()
    }

    /// Copy of this tree with the members of every object sorted by name.
    ///
    /// The sort is stable, so duplicate names keep their relative order.
    pub fn sorted(&self) -> Content {
        match self {
            Content::Array(items) => Content::Array(items.iter().map(Content::sorted).collect()),
            Content::Object(members) => {
                let mut members: Vec<(String, Content)> = members
                    .iter()
                    .map(|(name, value)| (name.clone(), value.sorted()))
                    .collect();
                members.sort_by(|a, b| a.0.cmp(&b.0));
                Content::Object(members)
            }
            other => other.clone(),
        }
    }

    /// A member name used twice within one object anywhere in the tree.
    pub fn find_duplicate_member(&self) -> Option<&str> {
        match self {
            Content::Array(items) => items.iter().find_map(Content::find_duplicate_member),
            Content::Object(members) => {
                let mut seen = HashSet::with_capacity(members.len());
                for (name, _) in members {
                    if !seen.insert(name.as_str()) {
                        return Some(name);
                    }
                }
                members
                    .iter()
                    .find_map(|(_, value)| value.find_duplicate_member())
            }
            _ => None,
        }
    }

    /// A NaN or infinite float anywhere in the tree.
    pub fn find_non_finite(&self) -> Option<f64> {
        match self {
            Content::Float(f) if !f.is_finite() => Some(*f),
            Content::Array(items) => items.iter().find_map(Content::find_non_finite),
            Content::Object(members) => members
                .iter()
                .find_map(|(_, value)| value.find_non_finite()),
            _ => None,
        }
    }
}

// Floats compare by value, except that NaN equals NaN so that Eq holds.
fn float_eq(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

// Hash agreeing with `float_eq`: both zeros and all NaNs collapse.
fn float_bits(value: f64) -> u64 {
    if value == 0.0 {
        0
    } else if value.is_nan() {
        f64::NAN.to_bits()
    } else {
        value.to_bits()
    }
}

impl PartialEq for Content {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Content::Null, Content::Null) => true,
            (Content::Bool(a), Content::Bool(b)) => a == b,
            (Content::Int(a), Content::Int(b)) => a == b,
            (Content::Float(a), Content::Float(b)) => float_eq(*a, *b),
            (Content::String(a), Content::String(b)) => a == b,
            (Content::Array(a), Content::Array(b)) => a == b,
            (Content::Object(a), Content::Object(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Content {}

impl Hash for Content {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Content::Null => {}
            Content::Bool(b) => b.hash(state),
            Content::Int(i) => i.hash(state),
            Content::Float(f) => float_bits(*f).hash(state),
            Content::String(s) => s.hash(state),
            Content::Array(items) => items.hash(state),
            Content::Object(members) => members.hash(state),
        }
    }
}

impl From<bool> for Content {
    fn from(value: bool) -> Self {
        Content::Bool(value)
    }
}

impl From<i64> for Content {
    fn from(value: i64) -> Self {
        Content::Int(value)
    }
}

impl From<u32> for Content {
    fn from(value: u32) -> Self {
        Content::Int(i64::from(value))
    }
}

impl From<f32> for Content {
    fn from(value: f32) -> Self {
        Content::Float(f64::from(value))
    }
}

impl From<f64> for Content {
    fn from(value: f64) -> Self {
        Content::Float(value)
    }
}

impl From<&str> for Content {
    fn from(value: &str) -> Self {
        Content::String(value.to_string())
    }
}

impl From<String> for Content {
    fn from(value: String) -> Self {
        Content::String(value)
    }
}

impl From<&String> for Content {
    fn from(value: &String) -> Self {
        Content::String(value.clone())
    }
}

impl<T: Into<Content>> From<Vec<T>> for Content {
    fn from(values: Vec<T>) -> Self {
        Content::Array(values.into_iter().map(Into::into).collect())
    }
}

/// Fluent builder for object nodes.
///
/// ```
/// use rankeval::codec::Content;
///
/// let key = Content::object()
///     .field("index", "test")
///     .field("doc_id", "1")
///     .build();
/// assert_eq!(key.get("index").and_then(Content::as_str), Some("test"));
/// ```
#[derive(Debug, Default, Clone)]
pub struct ObjectBuilder {
    members: Vec<(String, Content)>,
}

impl ObjectBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a member.
    pub fn field<N: Into<String>, V: Into<Content>>(mut self, name: N, value: V) -> Self {
        self.members.push((name.into(), value.into()));
        self
    }

    /// Append a member only when `value` is present.
    pub fn field_opt<N: Into<String>, V: Into<Content>>(self, name: N, value: Option<V>) -> Self {
        match value {
            Some(value) => self.field(name, value),
            None => self,
        }
    }

    pub fn build(self) -> Content {
        Content::Object(self.members)
    }
}

impl Serialize for Content {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Content::Null => serializer.serialize_unit(),
            Content::Bool(b) => serializer.serialize_bool(*b),
            Content::Int(i) => serializer.serialize_i64(*i),
            Content::Float(f) => {
                // JSON has no spelling for these and would silently write null.
                if !f.is_finite() {
                    return Err(ser::Error::custom(format!(
                        "cannot serialize non-finite number {f}"
                    )));
                }
                serializer.serialize_f64(*f)
            }
            Content::String(s) => serializer.serialize_str(s),
            Content::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Content::Object(members) => {
                let mut map = serializer.serialize_map(Some(members.len()))?;
                for (key, value) in members {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

struct ContentVisitor;

impl<'de> Visitor<'de> for ContentVisitor {
    type Value = Content;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("any structured document value")
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<Content, E> {
        Ok(Content::Bool(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Content, E> {
        Ok(Content::Int(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Content, E> {
        Ok(match i64::try_from(value) {
            Ok(i) => Content::Int(i),
            Err(_) => Content::Float(value as f64),
        })
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Content, E> {
        Ok(Content::Float(value))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Content, E> {
        Ok(Content::String(value.to_string()))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<Content, E> {
        Ok(Content::String(value))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Content, E> {
        Ok(Content::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Content, E> {
        Ok(Content::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Content, D::Error> {
        Deserialize::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Content, A::Error> {
        let mut items = Vec::new();
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Content::Array(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Content, A::Error> {
        let mut members = Vec::new();
        while let Some((key, value)) = map.next_entry::<String, Content>()? {
            members.push((key, value));
        }
        Ok(Content::Object(members))
    }
}

impl<'de> Deserialize<'de> for Content {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ContentVisitor)
    }
}

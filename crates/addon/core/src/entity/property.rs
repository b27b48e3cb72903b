//! Entity properties and the values events assign to them.

use serde_json::{Value, json};

/// Namespace under which entity properties are declared and assigned.
pub const PROPERTY_NAMESPACE: &str = "property";

/// Full key of a property, e.g. `property:phase`.
pub fn property_key(id: &str) -> String {
    format!("{PROPERTY_NAMESPACE}:{id}")
}

/// A value assigned to an entity property by an event.
///
/// String literals are emitted single-quoted, as Molang expects; use
/// [`PropertyValue::Molang`] to emit an expression verbatim.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Molang(String),
}

impl PropertyValue {
    pub fn to_json(&self) -> Value {
        match self {
            Self::Bool(b) => json!(b),
            Self::Int(i) => json!(i),
            Self::Float(f) => json!(f),
            Self::Str(s) => json!(format!("'{s}'")),
            Self::Molang(expr) => json!(expr),
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

/// Ordered `property:<id> -> value` assignments.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PropertyAssignments(Vec<(String, PropertyValue)>);

impl PropertyAssignments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `id` to `value`, replacing an earlier assignment of the same id.
    pub fn set(&mut self, id: impl Into<String>, value: impl Into<PropertyValue>) {
        let id = id.into();
        let value = value.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == id) {
            Some(slot) => slot.1 = value,
            None => self.0.push((id, value)),
        }
    }

    /// Merges `other` into `self`, later values winning.
    pub fn extend(&mut self, other: &PropertyAssignments) {
        for (id, value) in &other.0 {
            self.set(id.clone(), value.clone());
        }
    }

    pub fn get(&self, id: &str) -> Option<&PropertyValue> {
        self.0.iter().find(|(k, _)| k == id).map(|(_, v)| v)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The `set_property` object body.
    pub fn to_json(&self) -> Value {
        let mut obj = serde_json::Map::new();
        for (id, value) in &self.0 {
            obj.insert(property_key(id), value.to_json());
        }
        Value::Object(obj)
    }
}

impl<K: Into<String>, V: Into<PropertyValue>> FromIterator<(K, V)> for PropertyAssignments {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut out = Self::new();
        for (k, v) in iter {
            out.set(k, v);
        }
        out
    }
}

/// Possible values of a declared entity property.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PropertyKind {
    /// Integer in `[min, max]`.
    Range { min: i64, max: i64 },
    Bool,
    /// One of an explicit list of values.
    Enum { values: Vec<Value> },
}

/// A property declared in the entity description.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityProperty {
    pub identifier: String,
    pub kind: PropertyKind,
    pub default: Value,
    /// Whether the value is synced to clients (and usable in resource packs).
    pub client_sync: bool,
}

impl EntityProperty {
    pub fn range(identifier: impl Into<String>, min: i64, max: i64, default: i64) -> Self {
        Self {
            identifier: identifier.into(),
            kind: PropertyKind::Range { min, max },
            default: json!(default),
            client_sync: false,
        }
    }

    pub fn boolean(identifier: impl Into<String>, default: bool) -> Self {
        Self {
            identifier: identifier.into(),
            kind: PropertyKind::Bool,
            default: json!(default),
            client_sync: false,
        }
    }

    pub fn enumeration(
        identifier: impl Into<String>,
        values: Vec<Value>,
        default: impl Into<Value>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            kind: PropertyKind::Enum { values },
            default: default.into(),
            client_sync: false,
        }
    }

    #[must_use]
    pub fn synced(mut self) -> Self {
        self.client_sync = true;
        self
    }

    pub fn key(&self) -> String {
        property_key(&self.identifier)
    }

    pub fn to_json(&self) -> Value {
        let mut obj = serde_json::Map::new();
        match &self.kind {
            PropertyKind::Range { min, max } => {
                obj.insert("range".into(), json!([min, max]));
            }
            PropertyKind::Bool => {
                obj.insert("values".into(), json!([false, true]));
            }
            PropertyKind::Enum { values } => {
                obj.insert("values".into(), Value::Array(values.clone()));
            }
        }
        obj.insert("default".into(), self.default.clone());
        obj.insert("type".into(), json!(self.type_name()));
        if self.client_sync {
            obj.insert("client_sync".into(), json!(true));
        }
        Value::Object(obj)
    }

    fn type_name(&self) -> &'static str {
        match self.kind {
            PropertyKind::Range { .. } => "int",
            PropertyKind::Bool => "bool",
            PropertyKind::Enum { .. } => "enum",
        }
    }
}

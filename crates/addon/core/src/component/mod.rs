//! Atomic named payloads.
//!
//! A [`Component`] is one `minecraft:<kind>` entry of an entity or component
//! group. Components are opaque to the loop-state builder: it only attaches
//! them to groups and, during branch resolution, rewrites any body string
//! that names a branch.
//!
//! The [`factory`] module holds the constructor functions for the component
//! kinds the builders themselves emit.

pub mod factory;

use serde_json::{Map, Value};

/// Namespace prepended to every component kind.
pub const COMPONENT_NAMESPACE: &str = "minecraft";

/// Anything that serializes as one `"<id>": { ... }` entry of a document.
///
/// Components and events share this shape but are distinct types, so a
/// component can never be filed under `events` by accident.
pub trait NamedPayload {
    /// Key under which the payload is written.
    fn payload_id(&self) -> String;

    /// JSON body written under [`NamedPayload::payload_id`].
    fn payload(&self) -> Value;
}

/// A single entity component.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Component {
    kind: String,
    #[cfg_attr(feature = "serde", serde(default))]
    body: Map<String, Value>,
}

impl Component {
    /// Creates an empty component of the given kind (without namespace),
    /// e.g. `"physics"`.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            body: Map::new(),
        }
    }

    /// Creates a component with a `priority` field. Lower numbers win.
    pub fn with_priority(kind: impl Into<String>, priority: u32) -> Self {
        Self::new(kind).with("priority", priority)
    }

    /// Sets a body field (builder pattern).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.body.insert(key.into(), value.into());
        self
    }

    /// Sets a body field in place.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.body.insert(key.into(), value.into());
    }

    /// Component kind without namespace.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Namespaced component id, e.g. `minecraft:timer`.
    pub fn id(&self) -> String {
        format!("{COMPONENT_NAMESPACE}:{}", self.kind)
    }

    pub fn body(&self) -> &Map<String, Value> {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.body
    }
}

impl NamedPayload for Component {
    fn payload_id(&self) -> String {
        self.id()
    }

    fn payload(&self) -> Value {
        Value::Object(self.body.clone())
    }
}

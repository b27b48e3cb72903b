//! Component groups: named bundles of components toggled by events.

use serde_json::{Map, Value};

use crate::component::{Component, NamedPayload, factory};

#[derive(Clone, Debug, PartialEq)]
pub struct ComponentGroup {
    pub identifier: String,
    pub namespace: Option<String>,
    components: Vec<Component>,
}

impl ComponentGroup {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            namespace: None,
            components: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Adds a timer firing `event` after `length` seconds (builder pattern).
    #[must_use]
    pub fn with_timer(mut self, length: f64, event: impl Into<String>) -> Self {
        self.add_component(factory::timer(length, event));
        self
    }

    #[must_use]
    pub fn with_component(mut self, component: Component) -> Self {
        self.add_component(component);
        self
    }

    pub fn add_component(&mut self, component: Component) {
        self.components.push(component);
    }

    pub fn add_component_list(&mut self, components: impl IntoIterator<Item = Component>) {
        self.components.extend(components);
    }

    /// Group id with `namespace:` prefix if one is set.
    pub fn get_id(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{ns}:{}", self.identifier),
            None => self.identifier.clone(),
        }
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn components_mut(&mut self) -> &mut [Component] {
        &mut self.components
    }

    pub fn get_component(&self, kind: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.kind() == kind)
    }

    pub fn to_json(&self) -> Value {
        let mut obj = Map::new();
        for comp in &self.components {
            obj.insert(comp.payload_id(), comp.payload());
        }
        Value::Object(obj)
    }
}

impl NamedPayload for ComponentGroup {
    fn payload_id(&self) -> String {
        self.get_id()
    }

    fn payload(&self) -> Value {
        self.to_json()
    }
}

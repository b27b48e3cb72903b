//! The behavior-pack entity document.

use serde_json::{Map, Value, json};

use super::animation::Animation;
use super::event::{Event, EventRandomizer};
use super::group::ComponentGroup;
use super::property::{EntityProperty, PropertyAssignments};
use crate::component::{COMPONENT_NAMESPACE, Component, NamedPayload};

/// Name of the event the game fires when the entity spawns.
pub const SPAWN_EVENT: &str = "entity_spawned";

/// Everything written to an entity's behavior file.
///
/// Lists keep insertion order, which is also the order of the emitted JSON.
#[derive(Clone, Debug, PartialEq)]
pub struct Behaviors {
    /// Entity id, including namespace.
    pub identifier: String,
    /// Vanilla entity to inherit hard-coded behavior from.
    pub runtime_identifier: Option<String>,
    pub is_spawnable: bool,
    pub is_summonable: bool,
    pub is_experimental: bool,
    /// Behavior controller ids, exposed to the entity as `banco_<n>`.
    pub bancos: Vec<String>,
    pub animations: Vec<Animation>,
    pub components: Vec<Component>,
    pub component_groups: Vec<ComponentGroup>,
    pub events: Vec<Event>,
    /// Groups added by the spawn event.
    pub spawn_groups: Vec<String>,
    pub spawn_randomizers: Vec<EventRandomizer>,
    pub spawn_sequential_events: Vec<Event>,
    /// Property values assigned by the spawn event.
    pub spawn_properties: PropertyAssignments,
    pub properties: Vec<EntityProperty>,
}

impl Behaviors {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            runtime_identifier: None,
            is_spawnable: true,
            is_summonable: true,
            is_experimental: false,
            bancos: Vec::new(),
            animations: Vec::new(),
            components: Vec::new(),
            component_groups: Vec::new(),
            events: Vec::new(),
            spawn_groups: Vec::new(),
            spawn_randomizers: Vec::new(),
            spawn_sequential_events: Vec::new(),
            spawn_properties: PropertyAssignments::new(),
            properties: Vec::new(),
        }
    }

    pub fn add_banco(&mut self, banco: impl Into<String>) {
        self.bancos.push(banco.into());
    }

    pub fn add_animation(&mut self, animation: Animation) {
        self.animations.push(animation);
    }

    pub fn add_property(&mut self, prop: EntityProperty) {
        self.properties.push(prop);
    }

    pub fn add_component(&mut self, component: Component) {
        self.components.push(component);
    }

    pub fn add_component_group(&mut self, group: ComponentGroup) {
        self.component_groups.push(group);
    }

    pub fn add_event(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Looks up an event by its full id (`namespace:name` if namespaced).
    pub fn get_event(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.get_id() == id)
    }

    pub fn get_event_mut(&mut self, id: &str) -> Option<&mut Event> {
        self.events.iter_mut().find(|e| e.get_id() == id)
    }

    /// Looks up a groupless component by kind.
    pub fn get_component(&self, kind: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.kind() == kind)
    }

    pub fn get_component_group(&self, id: &str) -> Option<&ComponentGroup> {
        self.component_groups.iter().find(|g| g.get_id() == id)
    }

    fn has_spawn_actions(&self) -> bool {
        !self.spawn_groups.is_empty()
            || !self.spawn_randomizers.is_empty()
            || !self.spawn_sequential_events.is_empty()
            || !self.spawn_properties.is_empty()
    }

    /// The spawn event with every spawn action merged in, or `None` if there
    /// is nothing to do on spawn.
    ///
    /// An explicitly added `minecraft:entity_spawned` event is extended
    /// rather than replaced.
    pub fn spawn_event(&self) -> Option<Event> {
        if !self.has_spawn_actions() {
            return None;
        }
        let id = format!("{COMPONENT_NAMESPACE}:{SPAWN_EVENT}");
        let mut event = self
            .get_event(&id)
            .cloned()
            .unwrap_or_else(|| Event::new(SPAWN_EVENT).with_namespace(COMPONENT_NAMESPACE));
        event.add_add_groups(self.spawn_groups.iter().cloned());
        event.add_randomizers(self.spawn_randomizers.iter().cloned());
        event.add_sequential_events(self.spawn_sequential_events.iter().cloned());
        event.set_properties(&self.spawn_properties);
        Some(event)
    }

    fn description(&self) -> Value {
        let mut desc = Map::new();
        desc.insert("identifier".into(), json!(self.identifier));
        if let Some(runtime) = &self.runtime_identifier {
            desc.insert("runtime_identifier".into(), json!(runtime));
        }
        desc.insert("is_spawnable".into(), json!(self.is_spawnable));
        desc.insert("is_summonable".into(), json!(self.is_summonable));
        desc.insert("is_experimental".into(), json!(self.is_experimental));

        let mut animations = Map::new();
        if !self.bancos.is_empty() {
            let animate: Vec<Value> = (0..self.bancos.len())
                .map(|n| json!({ format!("banco_{n}"): "1" }))
                .collect();
            desc.insert("scripts".into(), json!({ "animate": animate }));
            for (n, banco) in self.bancos.iter().enumerate() {
                animations.insert(format!("banco_{n}"), json!(banco));
            }
        }
        for anim in &self.animations {
            animations.insert(anim.identifier.clone(), json!(anim.identifier));
        }
        if !animations.is_empty() {
            desc.insert("animations".into(), Value::Object(animations));
        }

        if !self.properties.is_empty() {
            let props: Map<String, Value> = self
                .properties
                .iter()
                .map(|p| (p.key(), p.to_json()))
                .collect();
            desc.insert("properties".into(), Value::Object(props));
        }
        Value::Object(desc)
    }

    /// Complete behavior file.
    ///
    /// `components` is always present; `component_groups` and `events` only
    /// when non-empty.
    pub fn to_json(&self, format_version: &str) -> Value {
        let mut entity = Map::new();
        entity.insert("description".into(), self.description());
        entity.insert("components".into(), payload_map(&self.components));

        if !self.component_groups.is_empty() {
            entity.insert(
                "component_groups".into(),
                payload_map(&self.component_groups),
            );
        }

        let spawn = self.spawn_event();
        let spawn_id = spawn.as_ref().map(Event::get_id);
        let mut events = Map::new();
        for event in &self.events {
            match &spawn {
                Some(merged) if spawn_id.as_deref() == Some(event.get_id().as_str()) => {
                    events.insert(merged.payload_id(), merged.payload());
                }
                _ => {
                    events.insert(event.payload_id(), event.payload());
                }
            }
        }
        if let (Some(merged), Some(id)) = (&spawn, &spawn_id) {
            if !events.contains_key(id) {
                events.insert(id.clone(), merged.payload());
            }
        }
        if !events.is_empty() {
            entity.insert("events".into(), Value::Object(events));
        }

        json!({
            "format_version": format_version,
            "minecraft:entity": entity,
        })
    }
}

fn payload_map<P: NamedPayload>(items: &[P]) -> Value {
    let map: Map<String, Value> = items
        .iter()
        .map(|item| (item.payload_id(), item.payload()))
        .collect();
    Value::Object(map)
}

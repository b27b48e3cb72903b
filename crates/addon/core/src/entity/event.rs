//! Entity events: group toggles, property assignments, randomization and
//! chaining.
//!
//! # Serialization shapes
//!
//! An [`Event`] serializes in up to three layers, decided in this order:
//!
//! 1. With randomizers, the primary action is split into a `sequence` of
//!    `add`, `remove`, `set_property` steps followed by one `randomize` step.
//!    Without randomizers it is a plain `{add, remove, set_property}` object.
//! 2. With sequential sub-events, the result of (1) becomes the first element
//!    of an outer `sequence`, followed by each sub-event.
//! 3. With a next event, a `trigger` object is appended last, whatever shape
//!    (2) produced.

use serde_json::{Map, Value, json};

use super::property::{PropertyAssignments, PropertyValue};
use crate::component::NamedPayload;

fn groups_json(groups: &[String]) -> Value {
    json!({ "component_groups": groups })
}

/// One weighted option of a randomized event.
#[derive(Clone, Debug, PartialEq)]
pub struct EventRandomizer {
    pub weight: u32,
    pub add_groups: Option<Vec<String>>,
    pub remove_groups: Option<Vec<String>>,
    pub set_properties: Option<PropertyAssignments>,
}

impl Default for EventRandomizer {
    fn default() -> Self {
        Self::new(1)
    }
}

impl EventRandomizer {
    pub fn new(weight: u32) -> Self {
        Self {
            weight,
            add_groups: None,
            remove_groups: None,
            set_properties: None,
        }
    }

    #[must_use]
    pub fn adding<S: Into<String>>(mut self, groups: impl IntoIterator<Item = S>) -> Self {
        self.add_groups = Some(groups.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn removing<S: Into<String>>(mut self, groups: impl IntoIterator<Item = S>) -> Self {
        self.remove_groups = Some(groups.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn setting(mut self, props: PropertyAssignments) -> Self {
        self.set_properties = Some(props);
        self
    }

    pub fn to_json(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("weight".into(), json!(self.weight));
        if let Some(groups) = &self.add_groups {
            obj.insert("add".into(), groups_json(groups));
        }
        if let Some(groups) = &self.remove_groups {
            obj.insert("remove".into(), groups_json(groups));
        }
        if let Some(props) = &self.set_properties {
            obj.insert("set_property".into(), props.to_json());
        }
        Value::Object(obj)
    }

    pub(crate) fn group_lists_mut(&mut self) -> impl Iterator<Item = &mut Vec<String>> {
        self.add_groups
            .iter_mut()
            .chain(self.remove_groups.iter_mut())
    }
}

/// A named entity event.
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    pub identifier: String,
    pub namespace: Option<String>,
    add_groups: Vec<String>,
    remove_groups: Vec<String>,
    randomizers: Vec<EventRandomizer>,
    sequential_events: Vec<Event>,
    set_properties: PropertyAssignments,
    next_event: Option<String>,
}

impl Event {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            namespace: None,
            add_groups: Vec::new(),
            remove_groups: Vec::new(),
            randomizers: Vec::new(),
            sequential_events: Vec::new(),
            set_properties: PropertyAssignments::new(),
            next_event: None,
        }
    }

    /// Attaches a namespace (builder pattern).
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Event id with `namespace:` prefix if one is set.
    pub fn get_id(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{ns}:{}", self.identifier),
            None => self.identifier.clone(),
        }
    }

    pub fn add_add_group(&mut self, group: impl Into<String>) {
        self.add_groups.push(group.into());
    }

    pub fn add_add_groups<S: Into<String>>(&mut self, groups: impl IntoIterator<Item = S>) {
        self.add_groups.extend(groups.into_iter().map(Into::into));
    }

    pub fn add_remove_group(&mut self, group: impl Into<String>) {
        self.remove_groups.push(group.into());
    }

    pub fn add_remove_groups<S: Into<String>>(&mut self, groups: impl IntoIterator<Item = S>) {
        self.remove_groups.extend(groups.into_iter().map(Into::into));
    }

    /// Adds `group` to the remove-list unless it is already there.
    ///
    /// Returns `true` if the list changed.
    pub fn ensure_removes(&mut self, group: &str) -> bool {
        if self.removes(group) {
            return false;
        }
        self.remove_groups.push(group.to_owned());
        true
    }

    pub fn removes(&self, group: &str) -> bool {
        self.remove_groups.iter().any(|g| g == group)
    }

    pub fn add_randomizer(&mut self, randomizer: EventRandomizer) {
        self.randomizers.push(randomizer);
    }

    pub fn add_randomizers(&mut self, randomizers: impl IntoIterator<Item = EventRandomizer>) {
        self.randomizers.extend(randomizers);
    }

    /// Appends a sub-event run after this event's own action.
    pub fn add_sequential_event(&mut self, event: Event) {
        self.sequential_events.push(event);
    }

    pub fn add_sequential_events(&mut self, events: impl IntoIterator<Item = Event>) {
        self.sequential_events.extend(events);
    }

    pub fn add_set_property(&mut self, id: impl Into<String>, value: impl Into<PropertyValue>) {
        self.set_properties.set(id, value);
    }

    pub fn set_properties(&mut self, props: &PropertyAssignments) {
        self.set_properties.extend(props);
    }

    /// Calls `event` on the entity after this one.
    pub fn set_next_event(&mut self, event: impl Into<String>) {
        self.next_event = Some(event.into());
    }

    pub fn add_groups(&self) -> &[String] {
        &self.add_groups
    }

    pub fn remove_groups(&self) -> &[String] {
        &self.remove_groups
    }

    pub fn randomizers(&self) -> &[EventRandomizer] {
        &self.randomizers
    }

    pub fn sequential_events(&self) -> &[Event] {
        &self.sequential_events
    }

    pub fn properties(&self) -> &PropertyAssignments {
        &self.set_properties
    }

    pub fn next_event(&self) -> Option<&str> {
        self.next_event.as_deref()
    }

    /// Visits every group id and event id this event refers to, including
    /// those of randomizers and nested sub-events.
    pub(crate) fn for_each_reference_mut(&mut self, f: &mut impl FnMut(&mut String)) {
        self.add_groups.iter_mut().for_each(&mut *f);
        self.remove_groups.iter_mut().for_each(&mut *f);
        for randomizer in &mut self.randomizers {
            for list in randomizer.group_lists_mut() {
                list.iter_mut().for_each(&mut *f);
            }
        }
        if let Some(next) = &mut self.next_event {
            f(next);
        }
        for sub in &mut self.sequential_events {
            sub.for_each_reference_mut(f);
        }
    }

    pub fn to_json(&self) -> Value {
        let mut obj = if self.randomizers.is_empty() {
            self.primary_action()
        } else {
            self.randomized_action()
        };

        if !self.sequential_events.is_empty() {
            let mut sequence = vec![Value::Object(obj)];
            sequence.extend(self.sequential_events.iter().map(Event::to_json));
            obj = Map::new();
            obj.insert("sequence".into(), Value::Array(sequence));
        }

        if let Some(next) = &self.next_event {
            obj.insert("trigger".into(), json!({ "event": next, "target": "self" }));
        }
        Value::Object(obj)
    }

    fn primary_action(&self) -> Map<String, Value> {
        let mut obj = Map::new();
        if !self.add_groups.is_empty() {
            obj.insert("add".into(), groups_json(&self.add_groups));
        }
        if !self.remove_groups.is_empty() {
            obj.insert("remove".into(), groups_json(&self.remove_groups));
        }
        if !self.set_properties.is_empty() {
            obj.insert("set_property".into(), self.set_properties.to_json());
        }
        obj
    }

    fn randomized_action(&self) -> Map<String, Value> {
        // Each primary action becomes its own step so the randomize step runs last
        let mut sequence: Vec<Value> = self
            .primary_action()
            .into_iter()
            .map(|(key, value)| {
                let mut step = Map::new();
                step.insert(key, value);
                Value::Object(step)
            })
            .collect();
        let options: Vec<Value> = self.randomizers.iter().map(EventRandomizer::to_json).collect();
        sequence.push(json!({ "randomize": options }));

        let mut obj = Map::new();
        obj.insert("sequence".into(), Value::Array(sequence));
        obj
    }
}

impl NamedPayload for Event {
    fn payload_id(&self) -> String {
        self.get_id()
    }

    fn payload(&self) -> Value {
        self.to_json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_with_and_without_namespace() {
        assert_eq!(Event::new("test_event").get_id(), "test_event");
        assert_eq!(
            Event::new("entity_spawned")
                .with_namespace("minecraft")
                .get_id(),
            "minecraft:entity_spawned"
        );
    }

    #[test]
    fn plain_event_json() {
        let mut event = Event::new("state_1");
        event.add_add_group("state_1");
        event.add_remove_group("state_0");
        event.add_set_property("phase", 2i64);
        assert_eq!(
            event.to_json(),
            json!({
                "add": { "component_groups": ["state_1"] },
                "remove": { "component_groups": ["state_0"] },
                "set_property": { "property:phase": 2 }
            })
        );
    }

    #[test]
    fn randomizer_wraps_in_sequence() {
        let mut event = Event::new("roll");
        event.add_add_group("base");
        event.add_randomizer(EventRandomizer::default().adding(["a"]));

        let json = event.to_json();
        let sequence = json["sequence"].as_array().expect("sequence");
        assert_eq!(sequence.len(), 2);
        assert_eq!(
            sequence.first(),
            Some(&json!({ "add": { "component_groups": ["base"] } }))
        );
        assert_eq!(
            sequence.last(),
            Some(&json!({
                "randomize": [{ "weight": 1, "add": { "component_groups": ["a"] } }]
            }))
        );
    }

    #[test]
    fn randomizer_only_event() {
        let mut event = Event::new("roll");
        event.add_randomizer(EventRandomizer::new(9001));
        assert_eq!(
            event.to_json(),
            json!({ "sequence": [{ "randomize": [{ "weight": 9001 }] }] })
        );
    }

    #[test]
    fn sequential_events_follow_primary() {
        let mut sub = Event::new("seq");
        sub.add_add_group("tag_1");
        let mut event = Event::new("test_event");
        event.add_add_group("tag_2");
        event.add_sequential_event(sub);

        let json = event.to_json();
        assert_eq!(json["sequence"][0]["add"]["component_groups"], json!(["tag_2"]));
        assert_eq!(json["sequence"][1]["add"]["component_groups"], json!(["tag_1"]));
    }

    #[test]
    fn randomized_then_sequential_nests() {
        let mut event = Event::new("e");
        event.add_add_group("g");
        event.add_randomizer(EventRandomizer::new(2));
        event.add_sequential_event(Event::new("sub"));

        let json = event.to_json();
        assert_eq!(
            json["sequence"][0],
            json!({
                "sequence": [
                    { "add": { "component_groups": ["g"] } },
                    { "randomize": [{ "weight": 2 }] }
                ]
            })
        );
        assert_eq!(json["sequence"][1], json!({}));
    }

    #[test]
    fn trigger_is_appended_last() {
        let mut event = Event::new("e");
        event.add_sequential_event(Event::new("sub"));
        event.set_next_event("next_event");

        let json = event.to_json();
        assert!(json.get("sequence").is_some());
        assert_eq!(
            json["trigger"],
            json!({ "event": "next_event", "target": "self" })
        );
        let keys: Vec<&String> = json.as_object().expect("object").keys().collect();
        assert_eq!(keys.last().map(|k| k.as_str()), Some("trigger"));
    }

    #[test]
    fn ensure_removes_is_idempotent() {
        let mut event = Event::new("state_3");
        assert!(event.ensure_removes("state_1"));
        assert!(!event.ensure_removes("state_1"));
        assert_eq!(event.remove_groups(), ["state_1".to_string()]);
    }

    #[test]
    fn reference_walk_reaches_nested_lists() {
        let mut sub = Event::new("sub");
        sub.add_remove_group("hurt");
        let mut event = Event::new("e");
        event.add_randomizer(EventRandomizer::default().adding(["hurt"]));
        event.add_sequential_event(sub);
        event.set_next_event("hurt");

        let mut seen = 0;
        event.for_each_reference_mut(&mut |id| {
            if id == "hurt" {
                seen += 1;
                *id = "state_3".into();
            }
        });
        assert_eq!(seen, 3);
        assert_eq!(event.next_event(), Some("state_3"));
        assert_eq!(event.sequential_events()[0].remove_groups(), ["state_3".to_string()]);
    }
}

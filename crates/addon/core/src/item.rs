//! Custom item types.
//!
//! An [`Item`] renders to a behavior-pack `minecraft:item` document. Its
//! display name and icon are always emitted first, followed by any extra
//! components and, once a use command is registered, the `on_use`
//! component with its matching event.

use serde_json::{Map, Value, json};

use crate::component::{Component, NamedPayload};

/// Event fired when the item is used (right click on desktop).
pub const ON_USE_EVENT: &str = "on_use";

/// A custom item type under construction.
#[derive(Clone, Debug, PartialEq)]
pub struct Item {
    pub namespace: String,
    /// Id without namespace.
    pub identifier: String,
    pub category: String,
    name: String,
    texture_name: String,
    components: Vec<Component>,
    on_use_commands: Vec<String>,
}

impl Item {
    pub const DEFAULT_CATEGORY: &'static str = "Items";

    /// Derives the identifier from `name` (lowercase, spaces to `_`); the
    /// icon texture defaults to the identifier.
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        let name = name.into();
        let identifier = name.to_lowercase().replace(' ', "_");
        Self {
            namespace: namespace.into(),
            texture_name: identifier.clone(),
            identifier,
            category: Self::DEFAULT_CATEGORY.to_owned(),
            name,
            components: Vec::new(),
            on_use_commands: Vec::new(),
        }
    }

    /// Overrides the derived identifier. The texture is left as is.
    #[must_use]
    pub fn with_id(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = identifier.into();
        self
    }

    #[must_use]
    pub fn with_texture(mut self, texture_name: impl Into<String>) -> Self {
        self.texture_name = texture_name.into();
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// `namespace:identifier`.
    pub fn get_id(&self) -> String {
        format!("{}:{}", self.namespace, self.identifier)
    }

    /// In-game display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// File name of the inventory icon.
    pub fn texture_name(&self) -> &str {
        &self.texture_name
    }

    pub fn set_texture_name(&mut self, texture_name: impl Into<String>) {
        self.texture_name = texture_name.into();
    }

    pub fn add_component(&mut self, component: Component) {
        self.components.push(component);
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Adds a command run by the holder when the item is used.
    ///
    /// Commands accumulate in one `on_use` event, in call order.
    pub fn add_on_use_command(&mut self, command: impl Into<String>) {
        self.on_use_commands.push(command.into());
    }

    pub fn on_use_commands(&self) -> &[String] {
        &self.on_use_commands
    }

    fn on_use_component(&self) -> Option<Component> {
        (!self.on_use_commands.is_empty()).then(|| {
            Component::new("on_use")
                .with("on_use", json!({ "event": ON_USE_EVENT, "target": "self" }))
        })
    }

    pub fn to_document(&self, format_version: &str) -> Value {
        let name = Component::new("display_name").with("value", self.name.as_str());
        let icon = Component::new("icon").with("texture", self.texture_name.as_str());
        let on_use = self.on_use_component();

        let mut components = Map::new();
        for comp in [&name, &icon]
            .into_iter()
            .chain(&self.components)
            .chain(on_use.as_ref())
        {
            components.insert(comp.payload_id(), comp.payload());
        }

        let mut events = Map::new();
        if !self.on_use_commands.is_empty() {
            events.insert(
                ON_USE_EVENT.into(),
                json!({
                    "run_command": {
                        "command": self.on_use_commands,
                        "target": "holder"
                    }
                }),
            );
        }

        json!({
            "format_version": format_version,
            "minecraft:item": {
                "description": {
                    "identifier": self.get_id(),
                    "category": self.category,
                },
                "components": components,
                "events": events,
            }
        })
    }
}

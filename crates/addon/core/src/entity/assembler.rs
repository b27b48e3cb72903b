//! The [`Entity`] facade: one object owning every document of an entity.
//!
//! An entity is assembled in two phases. First its components, groups,
//! events, controllers and loop states are declared, in any mix. Then
//! [`Entity::build`] resolves branch connections, renders each document and
//! substitutes string variables.

use serde_json::{Value, json};
use tracing::{debug, warn};

use super::anco::{AncoState, AnimationController};
use super::animation::AnimationFile;
use super::behaviors::Behaviors;
use super::event::Event;
use super::graphics::EntityGraphics;
use super::group::ComponentGroup;
use super::loop_state::{LoopState, LoopStateBuilder, LoopTargets, StateId};
use crate::AddonConfig;
use crate::component::{Component, factory};
use crate::error::{BuildError, ControllerKind, Result};
use crate::variables::StringVariables;

/// Group and event added by [`EntityOptions::despawnable`].
pub const DESPAWN: &str = "despawn";

/// Sound events of the entity, as written to the resource pack sound
/// definitions.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EntitySounds {
    pub ambient: Option<String>,
    pub hurt: Option<String>,
    pub death: Option<String>,
    pub step: Option<String>,
    /// Random pitch range.
    pub pitch: (f64, f64),
    pub volume: f64,
}

impl Default for EntitySounds {
    fn default() -> Self {
        Self {
            ambient: None,
            hurt: None,
            death: None,
            step: None,
            pitch: (0.8, 1.2),
            volume: 1.0,
        }
    }
}

impl EntitySounds {
    pub fn to_json(&self) -> Value {
        let mut obj = serde_json::Map::new();
        let events: serde_json::Map<String, Value> = [
            ("ambient", &self.ambient),
            ("step", &self.step),
            ("hurt", &self.hurt),
            ("death", &self.death),
        ]
        .into_iter()
        .filter_map(|(key, sound)| sound.as_ref().map(|s| (key.to_owned(), json!(s))))
        .collect();
        if !events.is_empty() {
            obj.insert("events".into(), Value::Object(events));
        }
        obj.insert("pitch".into(), json!([self.pitch.0, self.pitch.1]));
        obj.insert("volume".into(), json!(self.volume));
        Value::Object(obj)
    }
}

/// Construction options of an [`Entity`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EntityOptions {
    /// Id without namespace. Defaults to the lowercased name with spaces
    /// replaced by underscores.
    pub identifier: Option<String>,
    /// Spawn egg display name. Defaults to `Spawn <name>`.
    pub egg_name: Option<String>,
    /// Collision box `(width, height)`.
    pub collision: (f64, f64),
    pub hp: Option<u32>,
    pub attack: Option<factory::Damage>,
    pub move_speed: Option<f64>,
    pub has_physics: bool,
    pub no_damage: bool,
    pub spawn_groups: Vec<String>,
    /// Creates default [`EntityGraphics`].
    pub has_graphics: bool,
    pub invisible: bool,
    pub runtime_identifier: Option<String>,
    /// Adds a `despawn` group and event.
    pub despawnable: bool,
    pub sounds: EntitySounds,
    pub variables: StringVariables,
    pub config: AddonConfig,
}

impl Default for EntityOptions {
    fn default() -> Self {
        Self {
            identifier: None,
            egg_name: None,
            collision: (0.0, 0.0),
            hp: None,
            attack: None,
            move_speed: None,
            has_physics: true,
            no_damage: false,
            spawn_groups: Vec::new(),
            has_graphics: false,
            invisible: false,
            runtime_identifier: None,
            despawnable: false,
            sounds: EntitySounds::default(),
            variables: StringVariables::default(),
            config: AddonConfig::default(),
        }
    }
}

/// Every document [`Entity::build`] produces.
#[derive(Clone, Debug, PartialEq)]
pub struct EntityDocuments {
    pub behavior: Value,
    /// Client entity file, if the entity has graphics.
    pub resource: Option<Value>,
    pub behavior_controllers: Vec<Value>,
    pub render_controllers: Vec<Value>,
    /// Behavior-pack animation file, if any animations were added.
    pub animations: Option<Value>,
    pub sounds: Value,
}

/// An entity under construction.
#[derive(Clone, Debug)]
pub struct Entity {
    pub namespace: String,
    pub name: String,
    identifier: String,
    pub egg_name: String,
    pub config: AddonConfig,
    pub behaviors: Behaviors,
    pub graphics: Option<EntityGraphics>,
    bancos: Vec<AnimationController>,
    rancos: Vec<AnimationController>,
    states: LoopStateBuilder,
    pub sounds: EntitySounds,
    pub variables: StringVariables,
}

impl Entity {
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        options: EntityOptions,
    ) -> Result<Self> {
        let namespace = namespace.into();
        let name = name.into();
        let identifier = options
            .identifier
            .unwrap_or_else(|| name.to_lowercase().replace(' ', "_"));
        let egg_name = options.egg_name.unwrap_or_else(|| format!("Spawn {name}"));
        let full_id = format!("{namespace}:{identifier}");

        let graphics = options.has_graphics.then(|| {
            let gfx = EntityGraphics::new(&full_id);
            if options.invisible { gfx.invisible() } else { gfx }
        });

        let mut behaviors = Behaviors::new(&full_id);
        behaviors.runtime_identifier = options.runtime_identifier;
        behaviors.spawn_groups = options.spawn_groups;

        let (width, height) = options.collision;
        behaviors.add_component(factory::collision_box(width, height));
        if let Some(hp) = options.hp {
            behaviors.add_component(factory::health(hp));
        }
        if let Some(damage) = options.attack {
            behaviors.add_component(factory::attack(damage, None, None)?);
        }
        if let Some(speed) = options.move_speed {
            behaviors.add_component(factory::movement(speed));
        }
        if options.has_physics {
            behaviors.add_component(factory::physics());
        }
        if options.no_damage {
            behaviors.add_component(factory::no_damage());
        }
        if options.despawnable {
            behaviors.add_component_group(
                ComponentGroup::new(DESPAWN).with_component(factory::instant_despawn()),
            );
            let mut event = Event::new(DESPAWN);
            event.add_add_group(DESPAWN);
            behaviors.add_event(event);
        }

        debug!(entity = %full_id, graphics = graphics.is_some(), "created entity");
        Ok(Self {
            namespace,
            name,
            identifier,
            egg_name,
            config: options.config,
            behaviors,
            graphics,
            bancos: Vec::new(),
            rancos: Vec::new(),
            states: LoopStateBuilder::new(),
            sounds: options.sounds,
            variables: options.variables,
        })
    }

    /// `namespace:identifier`.
    pub fn get_id(&self) -> String {
        format!("{}:{}", self.namespace, self.identifier)
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Renames the entity in every document that carries its id.
    ///
    /// Controllers named after the old identifier, as [`Entity::create_banco`]
    /// and [`Entity::create_ranco`] name them, are renamed along with every
    /// reference to them.
    pub fn set_identifier(&mut self, identifier: impl Into<String>) {
        let old_prefix = self.controller_id("");
        self.identifier = identifier.into();
        let new_prefix = self.controller_id("");

        let id = self.get_id();
        self.behaviors.identifier = id.clone();
        if let Some(gfx) = &mut self.graphics {
            gfx.identifier = id;
        }
        if old_prefix == new_prefix {
            return;
        }

        let renamed = |old: &str| {
            old.strip_prefix(old_prefix.as_str())
                .map(|suffix| format!("{new_prefix}{suffix}"))
        };
        for banco in self.bancos.iter_mut() {
            if let Some(new_id) = renamed(&banco.identifier) {
                banco.identifier = new_id;
            }
        }
        for id in self.behaviors.bancos.iter_mut() {
            if let Some(new_id) = renamed(id) {
                *id = new_id;
            }
        }
        for ranco in self.rancos.iter_mut() {
            if let Some(new_id) = renamed(&ranco.identifier) {
                if let Some(gfx) = &mut self.graphics {
                    gfx.rename_animation(&ranco.identifier, &new_id);
                }
                ranco.identifier = new_id;
            }
        }
    }

    pub fn add_component(&mut self, component: Component) {
        self.behaviors.add_component(component);
    }

    pub fn add_components(&mut self, components: impl IntoIterator<Item = Component>) {
        self.behaviors.components.extend(components);
    }

    pub fn add_component_group(&mut self, group: ComponentGroup) {
        self.behaviors.add_component_group(group);
    }

    pub fn add_event(&mut self, event: Event) {
        self.behaviors.add_event(event);
    }

    pub fn add_spawn_group(&mut self, group: impl Into<String>) {
        self.behaviors.spawn_groups.push(group.into());
    }

    pub fn add_spawn_groups<S: Into<String>>(&mut self, groups: impl IntoIterator<Item = S>) {
        self.behaviors
            .spawn_groups
            .extend(groups.into_iter().map(Into::into));
    }

    fn controller_id(&self, suffix: &str) -> String {
        format!("{}{}_{suffix}", AddonConfig::CONTROLLER_PREFIX, self.identifier)
    }

    /// Creates a behavior controller `controller.animation.<id>_<suffix>`
    /// and returns its index.
    pub fn create_banco(&mut self, suffix: &str, initial_state: Option<&str>) -> usize {
        let id = self.controller_id(suffix);
        let initial = initial_state.unwrap_or(AddonConfig::HUB_STATE);
        self.add_banco(AnimationController::new(id, initial))
    }

    pub fn add_banco(&mut self, banco: AnimationController) -> usize {
        self.behaviors.add_banco(banco.identifier.clone());
        self.bancos.push(banco);
        self.bancos.len() - 1
    }

    /// Creates a render controller `controller.animation.<id>_<suffix>`
    /// and returns its index.
    pub fn create_ranco(&mut self, suffix: &str, initial_state: Option<&str>) -> usize {
        let id = self.controller_id(suffix);
        let initial = initial_state.unwrap_or(AddonConfig::HUB_STATE);
        self.add_ranco(AnimationController::new(id, initial))
    }

    /// Render controllers only play if the entity has graphics.
    pub fn add_ranco(&mut self, ranco: AnimationController) -> usize {
        if let Some(gfx) = &mut self.graphics {
            gfx.add_ranco(&ranco);
        } else {
            warn!(
                entity = %self.get_id(),
                controller = %ranco.identifier,
                "render controller added to entity without graphics"
            );
        }
        self.rancos.push(ranco);
        self.rancos.len() - 1
    }

    pub fn add_banco_state(&mut self, index: usize, state: AncoState) -> Result<()> {
        controller_at(&mut self.bancos, ControllerKind::Behavior, index)?.add_state(state)
    }

    pub fn add_ranco_state(&mut self, index: usize, state: AncoState) -> Result<()> {
        controller_at(&mut self.rancos, ControllerKind::Render, index)?.add_state(state)
    }

    pub fn bancos(&self) -> &[AnimationController] {
        &self.bancos
    }

    pub fn rancos(&self) -> &[AnimationController] {
        &self.rancos
    }

    /// Id the next loop state will get.
    pub fn current_state(&self) -> StateId {
        self.states.current()
    }

    pub fn next_state(&self) -> StateId {
        self.states.current().next()
    }

    pub fn prev_state(&self) -> Option<StateId> {
        self.states.current().prev()
    }

    pub fn loop_states(&self) -> &LoopStateBuilder {
        &self.states
    }

    /// Adds the next loop state. See [`LoopState`] for what it wires up.
    pub fn add_loop_state(&mut self, spec: LoopState) -> Result<StateId> {
        self.states.add(
            spec,
            LoopTargets {
                behaviors: &mut self.behaviors,
                bancos: &mut self.bancos,
                rancos: &mut self.rancos,
            },
        )
    }

    /// Resolves named branch connections in every document.
    ///
    /// Fails if a branch was connected to but never named. Safe to call more
    /// than once.
    pub fn resolve_branches(&mut self) -> Result<()> {
        self.states.resolve(
            &mut self.behaviors,
            self.bancos.iter_mut().chain(self.rancos.iter_mut()),
        )
    }

    pub fn sounds_json(&self) -> Value {
        self.sounds.to_json()
    }

    /// Resolves branches and renders every document of the entity.
    pub fn build(&mut self) -> Result<EntityDocuments> {
        self.resolve_branches()?;

        for banco in self.bancos.iter().filter(|b| b.states().is_empty()) {
            warn!(controller = %banco.identifier, "behavior controller has no states");
        }

        let config = &self.config;
        let mut behavior = self.behaviors.to_json(&config.behavior_format_version);
        let mut resource = self
            .graphics
            .as_ref()
            .map(|gfx| gfx.to_document(&config.resource_format_version));
        let mut behavior_controllers: Vec<Value> = self
            .bancos
            .iter()
            .map(|c| c.to_document(&config.controller_format_version))
            .collect();
        let mut render_controllers: Vec<Value> = self
            .rancos
            .iter()
            .map(|c| c.to_document(&config.controller_format_version))
            .collect();
        let mut animations = (!self.behaviors.animations.is_empty()).then(|| {
            let mut file = AnimationFile::new();
            file.add_anims(self.behaviors.animations.iter().cloned());
            file.to_document(&config.animation_format_version)
        });

        let vars = &self.variables;
        vars.apply(&mut behavior)?;
        if let Some(doc) = &mut resource {
            vars.apply(doc)?;
        }
        if let Some(doc) = &mut animations {
            vars.apply(doc)?;
        }
        for doc in behavior_controllers.iter_mut().chain(render_controllers.iter_mut()) {
            vars.apply(doc)?;
        }

        debug!(
            entity = %self.get_id(),
            states = self.states.len(),
            branches = self.states.branches().len(),
            "built entity documents"
        );
        Ok(EntityDocuments {
            behavior,
            resource,
            behavior_controllers,
            render_controllers,
            animations,
            sounds: self.sounds_json(),
        })
    }
}

fn controller_at(
    controllers: &mut [AnimationController],
    kind: ControllerKind,
    index: usize,
) -> Result<&mut AnimationController> {
    let len = controllers.len();
    controllers
        .get_mut(index)
        .ok_or(BuildError::ControllerIndex { kind, index, len })
}

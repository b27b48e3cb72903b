//! Entity script loader.
//!
//! An entity script describes one entity in RON:
//!
//! ```ron
//! EntityScript(
//!     namespace: "dev",
//!     name: "Boss",
//!     options: (hp: Some(200), has_graphics: true),
//!     bancos: [(name: "timing")],
//!     rancos: [(name: "anim")],
//!     states: [
//!         (timer: Some(3.0), animation: Some("animation.boss.idle")),
//!         (timer: Some(1.0), entry_commands: Some(["/say Roar"]), last_state: true),
//!     ],
//! )
//! ```

use addon_core::{Entity, EntityOptions, EntityProperty, LoopState};
use tracing::debug;

use crate::loaders::LoadResult;

/// A controller to create, named `controller.animation.<id>_<name>`.
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct ControllerSpec {
    pub name: String,
    #[serde(default)]
    pub initial_state: Option<String>,
}

/// Everything needed to assemble one entity.
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct EntityScript {
    pub namespace: String,
    pub name: String,
    #[serde(default)]
    pub options: EntityOptions,
    /// Behavior controllers, created in order; loop states refer to them
    /// by index.
    #[serde(default)]
    pub bancos: Vec<ControllerSpec>,
    /// Render controllers, created in order.
    #[serde(default)]
    pub rancos: Vec<ControllerSpec>,
    #[serde(default)]
    pub properties: Vec<EntityProperty>,
    /// Loop states, added in order as `state_0`, `state_1`, ...
    #[serde(default)]
    pub states: Vec<LoopState>,
}

impl EntityScript {
    /// Creates the entity, its controllers and its loop states.
    ///
    /// Branches are left unresolved until the entity is built.
    pub fn into_entity(self) -> LoadResult<Entity> {
        let mut entity = Entity::new(&self.namespace, &self.name, self.options)
            .map_err(|e| anyhow::anyhow!("Failed to create entity '{}': {}", self.name, e))?;

        for spec in &self.bancos {
            entity.create_banco(&spec.name, spec.initial_state.as_deref());
        }
        for spec in &self.rancos {
            entity.create_ranco(&spec.name, spec.initial_state.as_deref());
        }
        for prop in self.properties {
            entity.behaviors.add_property(prop);
        }

        for (index, state) in self.states.into_iter().enumerate() {
            entity.add_loop_state(state).map_err(|e| {
                anyhow::anyhow!(
                    "Failed to add loop state {} of entity '{}': {}",
                    index,
                    entity.get_id(),
                    e
                )
            })?;
        }

        debug!(
            entity = %entity.get_id(),
            states = entity.loop_states().len(),
            "loaded entity script"
        );
        Ok(entity)
    }
}

/// Loader for entity scripts from RON text.
pub struct ScriptLoader;

impl ScriptLoader {
    /// Parse an entity script without building it.
    pub fn parse_script(content: &str) -> LoadResult<EntityScript> {
        ron::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse entity script RON: {}", e))
    }

    /// Parse an entity script and assemble the entity it describes.
    ///
    /// The returned entity is ready for [`Entity::build`].
    pub fn parse(content: &str) -> LoadResult<Entity> {
        Self::parse_script(content)?.into_entity()
    }
}

//! The resource-pack client entity document.

use serde_json::{Map, Value, json};

use super::anco::AnimationController;

pub const TEXTURE_PREFIX: &str = "textures/entity/";
pub const GEOMETRY_PREFIX: &str = "geometry.";
/// Geometry used when the entity is not rendered; it only has to exist.
pub const INVISIBLE_GEOMETRY: &str = "geometry.humanoid";

/// Client-side look of an entity: model, textures, spawn egg and the
/// render controllers driving its animations.
#[derive(Clone, Debug, PartialEq)]
pub struct EntityGraphics {
    pub identifier: String,
    pub material: String,
    pub render_controller: String,
    /// Spawn egg base colour.
    pub egg_base: String,
    /// Spawn egg overlay colour.
    pub egg_overlay: String,
    /// Skips materials, textures and render controllers.
    pub invisible: bool,
    pub scale: f64,
    geometry: Vec<(String, String)>,
    textures: Vec<(String, String)>,
    animations: Vec<(String, String)>,
    animate: Vec<(String, Option<String>)>,
    particle_effects: Vec<(String, String)>,
    initialize: Vec<String>,
    pre_animation: Vec<String>,
}

impl EntityGraphics {
    pub const DEFAULT_MATERIAL: &'static str = "basic";
    pub const DEFAULT_RENDER_CONTROLLER: &'static str = "controller.render.default_controller";
    pub const DEFAULT_EGG_BASE: &'static str = "#550077";
    pub const DEFAULT_EGG_OVERLAY: &'static str = "#88cc88";

    /// Graphics for `identifier` (`namespace:name`). Geometry and texture
    /// default to `geometry.<name>` and `textures/entity/<name>`.
    pub fn new(identifier: impl Into<String>) -> Self {
        let identifier = identifier.into();
        let name = identifier
            .rsplit_once(':')
            .map_or(identifier.as_str(), |(_, name)| name)
            .to_owned();
        Self {
            material: Self::DEFAULT_MATERIAL.to_owned(),
            render_controller: Self::DEFAULT_RENDER_CONTROLLER.to_owned(),
            egg_base: Self::DEFAULT_EGG_BASE.to_owned(),
            egg_overlay: Self::DEFAULT_EGG_OVERLAY.to_owned(),
            invisible: false,
            scale: 1.0,
            geometry: vec![("default".into(), format!("{GEOMETRY_PREFIX}{name}"))],
            textures: vec![("default".into(), format!("{TEXTURE_PREFIX}{name}"))],
            animations: Vec::new(),
            animate: Vec::new(),
            particle_effects: Vec::new(),
            initialize: Vec::new(),
            pre_animation: Vec::new(),
            identifier,
        }
    }

    #[must_use]
    pub fn invisible(mut self) -> Self {
        self.invisible = true;
        self
    }

    #[must_use]
    pub fn with_egg_colors(mut self, base: impl Into<String>, overlay: impl Into<String>) -> Self {
        self.egg_base = base.into();
        self.egg_overlay = overlay.into();
        self
    }

    /// Replaces all geometry slots with a single `default` one. `name` gets
    /// the `geometry.` prefix.
    pub fn set_geometry(&mut self, name: &str) {
        self.geometry = vec![("default".into(), format!("{GEOMETRY_PREFIX}{name}"))];
    }

    pub fn add_geometry(&mut self, key: impl Into<String>, name: &str) {
        upsert(&mut self.geometry, key.into(), format!("{GEOMETRY_PREFIX}{name}"));
    }

    /// Replaces all texture slots with a single `default` one. `path` is
    /// relative to `textures/entity/`.
    pub fn set_texture(&mut self, path: &str) {
        self.textures = vec![("default".into(), format!("{TEXTURE_PREFIX}{path}"))];
    }

    pub fn add_texture(&mut self, key: impl Into<String>, path: &str) {
        upsert(&mut self.textures, key.into(), format!("{TEXTURE_PREFIX}{path}"));
    }

    /// Maps a short name to an animation or controller id.
    pub fn add_animation(&mut self, name: impl Into<String>, id: impl Into<String>) {
        upsert(&mut self.animations, name.into(), id.into());
    }

    /// Plays `name` unconditionally.
    pub fn add_animate(&mut self, name: impl Into<String>) {
        self.animate.push((name.into(), None));
    }

    /// Plays `name` while the Molang `condition` holds.
    pub fn add_animate_when(&mut self, name: impl Into<String>, condition: impl Into<String>) {
        self.animate.push((name.into(), Some(condition.into())));
    }

    pub fn add_particle(&mut self, name: impl Into<String>, effect: impl Into<String>) {
        upsert(&mut self.particle_effects, name.into(), effect.into());
    }

    pub fn add_script_initialize<S: Into<String>>(&mut self, exprs: impl IntoIterator<Item = S>) {
        self.initialize.extend(exprs.into_iter().map(Into::into));
    }

    pub fn add_script_pre_animation<S: Into<String>>(&mut self, exprs: impl IntoIterator<Item = S>) {
        self.pre_animation.extend(exprs.into_iter().map(Into::into));
    }

    /// Registers a render controller and plays it unconditionally.
    pub fn add_ranco(&mut self, ranco: &AnimationController) {
        self.add_animation(ranco.identifier.clone(), ranco.identifier.clone());
        self.add_animate(ranco.identifier.clone());
    }

    /// Renames every animation slot and `animate` entry called `from`, and
    /// every slot pointing at `from`.
    pub(crate) fn rename_animation(&mut self, from: &str, to: &str) {
        for (name, id) in self.animations.iter_mut() {
            if name == from {
                *name = to.to_owned();
            }
            if id == from {
                *id = to.to_owned();
            }
        }
        for (name, _) in self.animate.iter_mut() {
            if name == from {
                *name = to.to_owned();
            }
        }
    }

    fn scripts(&self) -> Value {
        let mut scripts = Map::new();
        // The game reads scale as a Molang string
        scripts.insert("scale".into(), json!(format!("{:?}", self.scale)));
        if !self.animate.is_empty() {
            let animate: Vec<Value> = self
                .animate
                .iter()
                .map(|(name, condition)| match condition {
                    Some(cond) => json!({ name.clone(): cond }),
                    None => json!(name),
                })
                .collect();
            scripts.insert("animate".into(), Value::Array(animate));
        }
        if !self.initialize.is_empty() {
            scripts.insert("initialize".into(), json!(self.initialize));
        }
        if !self.pre_animation.is_empty() {
            scripts.insert("pre_animation".into(), json!(self.pre_animation));
        }
        Value::Object(scripts)
    }

    pub fn to_document(&self, format_version: &str) -> Value {
        let mut desc = Map::new();
        desc.insert("identifier".into(), json!(self.identifier));
        if self.invisible {
            desc.insert("geometry".into(), json!({ "default": INVISIBLE_GEOMETRY }));
        } else {
            desc.insert("materials".into(), json!({ "default": self.material }));
            desc.insert("render_controllers".into(), json!([self.render_controller]));
            desc.insert("geometry".into(), slots(&self.geometry));
            desc.insert("textures".into(), slots(&self.textures));
        }
        desc.insert(
            "spawn_egg".into(),
            json!({ "base_color": self.egg_base, "overlay_color": self.egg_overlay }),
        );
        if !self.animations.is_empty() {
            desc.insert("animations".into(), slots(&self.animations));
        }
        if !self.particle_effects.is_empty() {
            desc.insert("particle_effects".into(), slots(&self.particle_effects));
        }
        desc.insert("scripts".into(), self.scripts());

        json!({
            "format_version": format_version,
            "minecraft:client_entity": { "description": desc },
        })
    }
}

fn upsert(slots: &mut Vec<(String, String)>, key: String, value: String) {
    match slots.iter_mut().find(|(k, _)| *k == key) {
        Some(slot) => slot.1 = value,
        None => slots.push((key, value)),
    }
}

fn slots(pairs: &[(String, String)]) -> Value {
    let map: Map<String, Value> = pairs
        .iter()
        .map(|(k, v)| (k.clone(), json!(v)))
        .collect();
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_derive_from_name() {
        let gfx = EntityGraphics::new("dev:golem");
        let desc = gfx.to_document("1.10.0")["minecraft:client_entity"]["description"].clone();
        assert_eq!(desc["geometry"], json!({ "default": "geometry.golem" }));
        assert_eq!(desc["textures"], json!({ "default": "textures/entity/golem" }));
        assert_eq!(desc["materials"], json!({ "default": "basic" }));
        assert_eq!(
            desc["render_controllers"],
            json!(["controller.render.default_controller"])
        );
        assert_eq!(desc["scripts"], json!({ "scale": "1.0" }));
    }

    #[test]
    fn invisible_entity_keeps_placeholder_geometry() {
        let gfx = EntityGraphics::new("dev:marker").invisible();
        let desc = gfx.to_document("1.10.0")["minecraft:client_entity"]["description"].clone();
        assert_eq!(desc["geometry"], json!({ "default": "geometry.humanoid" }));
        assert!(desc.get("textures").is_none());
        assert!(desc.get("render_controllers").is_none());
        assert_eq!(
            desc["spawn_egg"],
            json!({ "base_color": "#550077", "overlay_color": "#88cc88" })
        );
    }

    #[test]
    fn ranco_is_mapped_and_animated() {
        let mut gfx = EntityGraphics::new("dev:golem");
        gfx.add_ranco(&AnimationController::new("controller.animation.golem_anim", "init"));
        gfx.add_animate_when("walk", "query.modified_move_speed > 0.1");
        gfx.add_script_initialize(["variable.phase = 0;"]);
        let desc = gfx.to_document("1.10.0")["minecraft:client_entity"]["description"].clone();
        assert_eq!(
            desc["animations"],
            json!({ "controller.animation.golem_anim": "controller.animation.golem_anim" })
        );
        assert_eq!(
            desc["scripts"]["animate"],
            json!([
                "controller.animation.golem_anim",
                { "walk": "query.modified_move_speed > 0.1" }
            ])
        );
        assert_eq!(desc["scripts"]["initialize"], json!(["variable.phase = 0;"]));
    }

    #[test]
    fn geometry_slots() {
        let mut gfx = EntityGraphics::new("dev:golem");
        gfx.add_geometry("cracked", "golem_cracked");
        gfx.set_texture("golem/base");
        let desc = gfx.to_document("1.10.0")["minecraft:client_entity"]["description"].clone();
        assert_eq!(
            desc["geometry"],
            json!({ "default": "geometry.golem", "cracked": "geometry.golem_cracked" })
        );
        assert_eq!(desc["textures"], json!({ "default": "textures/entity/golem/base" }));
    }
}

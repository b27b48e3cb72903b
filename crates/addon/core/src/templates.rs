//! Barebones entity documents for hand-edited content.

use serde_json::{Value, json};

use crate::AddonConfig;

/// Format version of [`basic_rp_entity`].
pub const BASIC_RP_FORMAT_VERSION: &str = "1.8.0";

/// Behavior file for a spawnable, summonable entity with empty
/// `components`, `component_groups` and `events`.
pub fn basic_bp_entity(namespace: &str, id: &str) -> Value {
    json!({
        "format_version": AddonConfig::DEFAULT_BEHAVIOR_FORMAT_VERSION,
        "minecraft:entity": {
            "description": {
                "identifier": format!("{namespace}:{id}"),
                "is_spawnable": true,
                "is_summonable": true,
                "is_experimental": false
            },
            "components": {},
            "component_groups": {},
            "events": {}
        }
    })
}

/// Client entity file that renders nothing and uses the missing-texture
/// spawn egg colours.
pub fn basic_rp_entity(namespace: &str, id: &str) -> Value {
    json!({
        "format_version": BASIC_RP_FORMAT_VERSION,
        "minecraft:client_entity": {
            "description": {
                "identifier": format!("{namespace}:{id}"),
                "geometry": { "default": "geometry.humanoid.customSlim" },
                "spawn_egg": { "base_color": "#000000", "overlay_color": "#ff00ff" }
            }
        }
    })
}

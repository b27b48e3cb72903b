/// Builder configuration: schema format versions stamped into each document.
///
/// Every field falls back to the matching `DEFAULT_*` constant when it is
/// omitted from a data file.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AddonConfig {
    /// `format_version` of behavior-pack entity files.
    pub behavior_format_version: String,
    /// `format_version` of resource-pack client entity files.
    pub resource_format_version: String,
    /// `format_version` of animation controller files.
    pub controller_format_version: String,
    /// `format_version` of behavior-pack animation files.
    pub animation_format_version: String,
    /// `format_version` of behavior-pack item files.
    pub item_format_version: String,
}

impl AddonConfig {
    // ===== naming constants =====
    /// Id of the hub state every loop-state controller dispatches through.
    pub const HUB_STATE: &'static str = "init";
    /// Prefix of generated loop-state ids (`state_0`, `state_1`, ...).
    pub const STATE_PREFIX: &'static str = "state_";
    /// Prefix of generated controller ids.
    pub const CONTROLLER_PREFIX: &'static str = "controller.animation.";

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_BEHAVIOR_FORMAT_VERSION: &'static str = "1.16.0";
    pub const DEFAULT_RESOURCE_FORMAT_VERSION: &'static str = "1.10.0";
    pub const DEFAULT_CONTROLLER_FORMAT_VERSION: &'static str = "1.10.0";
    pub const DEFAULT_ANIMATION_FORMAT_VERSION: &'static str = "1.8.0";
    pub const DEFAULT_ITEM_FORMAT_VERSION: &'static str = "1.16.100";

    pub fn new() -> Self {
        Self {
            behavior_format_version: Self::DEFAULT_BEHAVIOR_FORMAT_VERSION.to_owned(),
            resource_format_version: Self::DEFAULT_RESOURCE_FORMAT_VERSION.to_owned(),
            controller_format_version: Self::DEFAULT_CONTROLLER_FORMAT_VERSION.to_owned(),
            animation_format_version: Self::DEFAULT_ANIMATION_FORMAT_VERSION.to_owned(),
            item_format_version: Self::DEFAULT_ITEM_FORMAT_VERSION.to_owned(),
        }
    }
}

impl Default for AddonConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_schema_versions() {
        let config = AddonConfig::default();
        assert_eq!(config.behavior_format_version, "1.16.0");
        assert_eq!(config.resource_format_version, "1.10.0");
        assert_eq!(config.controller_format_version, "1.10.0");
        assert_eq!(config.animation_format_version, "1.8.0");
        assert_eq!(config.item_format_version, "1.16.100");
    }

    #[test]
    fn generated_names() {
        assert_eq!(AddonConfig::HUB_STATE, "init");
        assert!(AddonConfig::CONTROLLER_PREFIX.ends_with('.'));
    }
}

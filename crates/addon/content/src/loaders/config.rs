//! Builder configuration loader.

use addon_core::AddonConfig;

use crate::loaders::LoadResult;

/// Loader for builder configuration from TOML text.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Parse an [`AddonConfig`] from TOML.
    ///
    /// Omitted keys keep their default format versions, so an empty string
    /// yields [`AddonConfig::default`].
    pub fn parse(content: &str) -> LoadResult<AddonConfig> {
        let config: AddonConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        Ok(config)
    }
}

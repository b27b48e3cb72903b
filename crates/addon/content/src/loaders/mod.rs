//! Content loaders for turning RON/TOML text into builders.

pub mod config;
pub mod script;

pub use config::ConfigLoader;
pub use script::{ControllerSpec, EntityScript, ScriptLoader};

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

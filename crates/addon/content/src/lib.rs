//! Data-driven entity content.
//!
//! This crate turns text data into `addon-core` builders:
//! - Entity scripts (RON): options, controllers and loop states of one entity
//! - Builder configuration (TOML): format versions stamped into documents
//!
//! Loaders only parse text handed to them; reading files is the caller's job.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, ControllerSpec, EntityScript, LoadResult, ScriptLoader};

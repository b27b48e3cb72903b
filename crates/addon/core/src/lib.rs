//! Builders for Bedrock add-on entity documents.
//!
//! `addon-core` assembles the JSON documents that describe a custom entity:
//! its behavior file, client entity file, animation controllers and
//! animations. Custom items get their own small builder in [`item`]. At the
//! heart of the crate is the loop-state builder, which sequences an
//! entity through numbered states and wires every state into the component
//! groups, events and controllers at once, with named branch connections
//! resolved after all states are declared.
//!
//! Output is always an in-memory [`serde_json::Value`]; writing files is up
//! to the caller.
pub mod component;
pub mod config;
pub mod entity;
pub mod error;
pub mod item;
pub mod templates;
pub mod variables;

pub use component::{Component, NamedPayload, factory};
pub use config::AddonConfig;
pub use entity::{
    AncoState, AnimTimelineItem, Animation, AnimationController, AnimationFile, Behaviors,
    BranchEntry, BranchRegistry, ComponentGroup, Entity, EntityDocuments, EntityGraphics,
    EntityOptions, EntityProperty, EntitySounds, Event, EventRandomizer, LoopState,
    LoopStateBuilder, PropertyAssignments, PropertyKind, PropertyValue, StateId,
};
pub use error::{AddonError, BuildError, ControllerKind, ErrorSeverity};
pub use item::Item;
pub use variables::StringVariables;

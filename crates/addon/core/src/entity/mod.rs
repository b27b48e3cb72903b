//! Entity documents and the builders that assemble them.
//!
//! [`Entity`] is the entry point. The remaining types model the individual
//! pieces of the behavior and resource documents and can be used on their
//! own.
pub mod anco;
pub mod animation;
pub mod assembler;
pub mod behaviors;
pub mod branch;
pub mod event;
pub mod graphics;
pub mod group;
pub mod loop_state;
pub mod property;

pub use anco::{AncoState, AnimationController};
pub use animation::{AnimTimelineItem, Animation, AnimationFile};
pub use assembler::{Entity, EntityDocuments, EntityOptions, EntitySounds};
pub use behaviors::Behaviors;
pub use branch::{BranchEntry, BranchRegistry};
pub use event::{Event, EventRandomizer};
pub use graphics::EntityGraphics;
pub use group::ComponentGroup;
pub use loop_state::{LoopState, LoopStateBuilder, StateId};
pub use property::{EntityProperty, PropertyAssignments, PropertyKind, PropertyValue};

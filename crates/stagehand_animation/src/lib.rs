//! Stagehand Animation
//!
//! Building blocks for keyed per-node animation caches:
//!
//! - [`AnimationDescriptor`]: one property animation (target value + timing)
//! - [`AnimationGroup`]: ordered descriptors bound to a target node
//! - [`AnimationInput`]: a single descriptor or a prebuilt group
//! - [`NodeAnimationRegistry`]: per-node map from key to group
//! - [`DisplayLink`]: per-frame update loop subscriptions
//! - [`EventQueue`]: ordered lifecycle events
//!
//! Supersession (stop the old group, then install the new one) lives in the
//! scene crate's coordinator, which owns both the scene and the display link.

pub mod descriptor;
pub mod events;
pub mod group;
pub mod registry;
pub mod update_loop;

pub use descriptor::{AnimatableProperty, AnimatableValue, AnimationDescriptor};
pub use events::{AnimationEvent, EventQueue};
pub use group::{AnimationGroup, AnimationInput, GroupId};
pub use registry::{AnimationMap, NodeAnimationRegistry};
pub use update_loop::{DisplayLink, LoopKey, LoopPhase, UpdateLoopToken};

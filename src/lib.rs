//! Stagehand
//!
//! Keyed animation caches for scene nodes. Each node owns a lazily created
//! map from key to [`AnimationGroup`]; attaching under a key that is already
//! taken stops the previous group before the new one is installed.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use stagehand::prelude::*;
//!
//! let mut scene = Scene::new();
//! let mut coordinator = AnimationCoordinator::new();
//! let button = scene.create_node_with_name("button");
//!
//! coordinator.attach_animation(&mut scene, button, AnimationDescriptor::opacity(0.5, 0.2)?, "dim");
//! coordinator.apply_animation(&mut scene, button, "dim", true);
//!
//! coordinator.tick(&mut scene, 1.0 / 60.0);
//! ```

pub use stagehand_animation as animation;
pub use stagehand_scene as scene;

pub use stagehand_animation::{
    AnimatableProperty, AnimatableValue, AnimationDescriptor, AnimationEvent, AnimationGroup,
    AnimationInput, AnimationMap, GroupId, NodeAnimationRegistry,
};
pub use stagehand_core::{AnimationSettings, NodeHandle, Result, StagehandError};
pub use stagehand_scene::{AnimationCoordinator, Node, Scene, Transform};

pub mod prelude {
    pub use crate::{
        AnimatableProperty, AnimatableValue, AnimationCoordinator, AnimationDescriptor,
        AnimationEvent, AnimationGroup, AnimationInput, AnimationSettings, Node, NodeHandle, Scene,
    };
    pub use glam::{Quat, Vec3};
}

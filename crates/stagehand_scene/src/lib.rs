//! Scene graph and animation coordination.
//!
//! - [`Scene`]: node arena with per-node side-tables (names, animation registries)
//! - [`Node`]: hierarchy plus the properties animations can drive
//! - [`Transform`]: local position, rotation and scale
//! - [`AnimationCoordinator`]: attach/append/apply operations with
//!   stop-before-replace semantics per `(node, key)`

pub mod coordinator;
pub mod node;
pub mod scene;
pub mod transform;

pub use coordinator::AnimationCoordinator;
pub use node::Node;
pub use scene::Scene;
pub use transform::Transform;

//! Stagehand Core
//!
//! Foundational types shared by every Stagehand crate:
//!
//! - [`NodeHandle`]: versioned key identifying a scene node
//! - [`StagehandError`]: the error type for construction-time failures
//! - [`AnimationSettings`]: tunables for the animation coordinator

pub mod errors;
pub mod handle;
pub mod settings;

pub use errors::{Result, StagehandError};
pub use handle::NodeHandle;
pub use settings::AnimationSettings;

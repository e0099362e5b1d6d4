//! Animation Coordinator Settings
//!
//! ```rust,ignore
//! use stagehand_core::AnimationSettings;
//!
//! let settings = AnimationSettings {
//!     max_frame_delta: 0.1,
//!     ..Default::default()
//! };
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{Result, StagehandError};

/// Tunables for the animation coordinator.
///
/// Missing fields fall back to their defaults when deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationSettings {
    /// Upper bound (seconds) for a single `tick` step.
    pub max_frame_delta: f32,
    /// Write a group's target values to its node when its update loop completes.
    pub commit_on_finish: bool,
    /// Maximum number of buffered events. The oldest are dropped first.
    pub event_capacity: usize,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            max_frame_delta: 0.25,
            commit_on_finish: true,
            event_capacity: 256,
        }
    }
}

impl AnimationSettings {
    /// Parses settings from a JSON document and validates them.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Checks that every field holds a usable value.
    pub fn validate(&self) -> Result<()> {
        if !self.max_frame_delta.is_finite() || self.max_frame_delta <= 0.0 {
            return Err(StagehandError::InvalidSettings(format!(
                "max_frame_delta must be a positive number, got {}",
                self.max_frame_delta
            )));
        }
        if self.event_capacity == 0 {
            return Err(StagehandError::InvalidSettings(
                "event_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Clamps a frame delta into `[0, max_frame_delta]`.
    #[inline]
    #[must_use]
    pub fn clamp_delta(&self, dt: f32) -> f32 {
        if dt.is_finite() {
            dt.clamp(0.0, self.max_frame_delta)
        } else {
            0.0
        }
    }
}

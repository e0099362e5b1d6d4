//! Error Types
//!
//! Stagehand only fails at construction boundaries: building an animation
//! descriptor and loading settings. Registry and coordinator operations
//! treat missing state as a no-op and never return errors.
//!
//! ```rust,ignore
//! use stagehand_core::errors::Result;
//!
//! fn build() -> Result<()> {
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// The main error type for Stagehand.
#[derive(Error, Debug)]
pub enum StagehandError {
    // ========================================================================
    // Animation Errors
    // ========================================================================
    /// An animation descriptor failed validation.
    #[error("Invalid animation descriptor for {property}: {reason}")]
    InvalidDescriptor {
        /// The animated property name
        property: &'static str,
        /// What was wrong with it
        reason: String,
    },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Settings parsed but hold unusable values.
    #[error("Invalid animation settings: {0}")]
    InvalidSettings(String),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Alias for `Result<T, StagehandError>`.
pub type Result<T> = std::result::Result<T, StagehandError>;

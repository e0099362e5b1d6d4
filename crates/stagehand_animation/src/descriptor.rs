use glam::{Quat, Vec3};

use stagehand_core::errors::{Result, StagehandError};

/// Node property an animation drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimatableProperty {
    Position, // Maps to transform.position
    Rotation, // Maps to transform.rotation
    Scale,    // Maps to transform.scale
    Opacity,  // Maps to node.opacity
}

impl AnimatableProperty {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Position => "position",
            Self::Rotation => "rotation",
            Self::Scale => "scale",
            Self::Opacity => "opacity",
        }
    }

    /// Returns true if `value` has the shape this property stores.
    #[must_use]
    pub fn accepts(self, value: &AnimatableValue) -> bool {
        matches!(
            (self, value),
            (Self::Position | Self::Scale, AnimatableValue::Vector3(_))
                | (Self::Rotation, AnimatableValue::Quaternion(_))
                | (Self::Opacity, AnimatableValue::Scalar(_))
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimatableValue {
    Vector3(Vec3),
    Quaternion(Quat),
    Scalar(f32),
}

impl AnimatableValue {
    fn is_finite(&self) -> bool {
        match self {
            Self::Vector3(v) => v.is_finite(),
            Self::Quaternion(q) => q.is_finite(),
            Self::Scalar(s) => s.is_finite(),
        }
    }
}

/// A single property animation: drive `property` to `to` over `duration`
/// seconds, starting after `delay` seconds.
///
/// Descriptors carry no easing; how intermediate values are produced is up
/// to the renderer. Only the final value is ever written by this crate.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationDescriptor {
    property: AnimatableProperty,
    to: AnimatableValue,
    duration: f32,
    delay: f32,
}

impl AnimationDescriptor {
    /// Creates a validated descriptor with no delay.
    pub fn new(property: AnimatableProperty, to: AnimatableValue, duration: f32) -> Result<Self> {
        if !property.accepts(&to) {
            return Err(StagehandError::InvalidDescriptor {
                property: property.name(),
                reason: format!("value {to:?} does not match the property type"),
            });
        }
        if !to.is_finite() {
            return Err(StagehandError::InvalidDescriptor {
                property: property.name(),
                reason: "target value is not finite".to_string(),
            });
        }
        check_seconds(property, "duration", duration)?;

        Ok(Self {
            property,
            to,
            duration,
            delay: 0.0,
        })
    }

    pub fn position(to: Vec3, duration: f32) -> Result<Self> {
        Self::new(AnimatableProperty::Position, AnimatableValue::Vector3(to), duration)
    }

    pub fn rotation(to: Quat, duration: f32) -> Result<Self> {
        Self::new(AnimatableProperty::Rotation, AnimatableValue::Quaternion(to), duration)
    }

    pub fn scale(to: Vec3, duration: f32) -> Result<Self> {
        Self::new(AnimatableProperty::Scale, AnimatableValue::Vector3(to), duration)
    }

    pub fn opacity(to: f32, duration: f32) -> Result<Self> {
        Self::new(AnimatableProperty::Opacity, AnimatableValue::Scalar(to), duration)
    }

    /// Returns a copy that starts `delay` seconds after its group.
    pub fn with_delay(mut self, delay: f32) -> Result<Self> {
        check_seconds(self.property, "delay", delay)?;
        self.delay = delay;
        Ok(self)
    }

    #[inline]
    #[must_use]
    pub fn property(&self) -> AnimatableProperty {
        self.property
    }

    #[inline]
    #[must_use]
    pub fn to(&self) -> AnimatableValue {
        self.to
    }

    #[inline]
    #[must_use]
    pub fn duration(&self) -> f32 {
        self.duration
    }

    #[inline]
    #[must_use]
    pub fn delay(&self) -> f32 {
        self.delay
    }

    /// Time from group start until this animation settles.
    #[inline]
    #[must_use]
    pub fn end_time(&self) -> f32 {
        self.delay + self.duration
    }
}

fn check_seconds(property: AnimatableProperty, field: &str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(StagehandError::InvalidDescriptor {
            property: property.name(),
            reason: format!("{field} must be finite and non-negative, got {value}"),
        })
    }
}

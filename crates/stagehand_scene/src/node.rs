use stagehand_animation::{AnimatableProperty, AnimatableValue};
use stagehand_core::NodeHandle;

use crate::transform::Transform;

/// A minimal scene node.
///
/// # Design Principles
///
/// - Only keeps hierarchy and the properties animations can drive
/// - Names and animation registries live in the [`Scene`](crate::Scene)'s
///   side-tables, keyed by [`NodeHandle`]
#[derive(Debug, Clone)]
pub struct Node {
    // === Core Hierarchy ===
    /// Parent node handle (None for root and detached nodes)
    pub(crate) parent: Option<NodeHandle>,
    /// Child node handles
    pub(crate) children: Vec<NodeHandle>,

    // === Animatable State ===
    pub transform: Transform,
    /// Opacity in `[0, 1]`
    pub opacity: f32,
}

impl Node {
    #[must_use]
    pub fn new() -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            transform: Transform::new(),
            opacity: 1.0,
        }
    }

    /// Returns the parent node handle, if any.
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    /// Returns a read-only slice of child node handles.
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    /// Writes a settled animation value into the matching property.
    ///
    /// Returns false, leaving the node untouched, if the value's shape does
    /// not match the property.
    pub fn apply_value(&mut self, property: AnimatableProperty, value: AnimatableValue) -> bool {
        match (property, value) {
            (AnimatableProperty::Position, AnimatableValue::Vector3(v)) => {
                self.transform.position = v;
            }
            (AnimatableProperty::Scale, AnimatableValue::Vector3(v)) => {
                self.transform.scale = v;
            }
            (AnimatableProperty::Rotation, AnimatableValue::Quaternion(q)) => {
                self.transform.rotation = q;
            }
            (AnimatableProperty::Opacity, AnimatableValue::Scalar(s)) => {
                self.opacity = s.clamp(0.0, 1.0);
            }
            _ => {
                log::warn!("Value {value:?} cannot drive property {}", property.name());
                return false;
            }
        }
        true
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}

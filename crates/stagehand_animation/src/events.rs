//! Animation lifecycle events.
//!
//! The coordinator records one event per lifecycle step, in the order the
//! steps happen. Hosts poll them after each operation or frame:
//!
//! ```rust,ignore
//! coordinator.tick(&mut scene, dt);
//! for event in coordinator.drain_events() {
//!     if let AnimationEvent::Finished { node, key, .. } = event {
//!         log::info!("{key} finished on {node:?}");
//!     }
//! }
//! ```

use std::collections::VecDeque;

use stagehand_core::NodeHandle;

use crate::group::GroupId;

#[derive(Debug, Clone, PartialEq)]
pub enum AnimationEvent {
    /// A group was placed into a node's registry under `key`.
    Installed {
        node: NodeHandle,
        key: String,
        group: GroupId,
    },
    /// A group was told to stop because another one is taking its key.
    Stopped {
        node: NodeHandle,
        key: String,
        group: GroupId,
    },
    /// A group was removed without replacement.
    Removed {
        node: NodeHandle,
        key: String,
        group: GroupId,
    },
    /// A node was asked to apply its entry for `key`. `group` is `None`
    /// when the node has no such entry.
    Applied {
        node: NodeHandle,
        key: String,
        animated: bool,
        group: Option<GroupId>,
    },
    /// A group's update loop started.
    Started {
        node: NodeHandle,
        key: String,
        group: GroupId,
    },
    /// A group reached its end and its final values were settled.
    Finished {
        node: NodeHandle,
        key: String,
        group: GroupId,
    },
}

impl AnimationEvent {
    #[must_use]
    pub fn node(&self) -> NodeHandle {
        match self {
            Self::Installed { node, .. }
            | Self::Stopped { node, .. }
            | Self::Removed { node, .. }
            | Self::Applied { node, .. }
            | Self::Started { node, .. }
            | Self::Finished { node, .. } => *node,
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Installed { key, .. }
            | Self::Stopped { key, .. }
            | Self::Removed { key, .. }
            | Self::Applied { key, .. }
            | Self::Started { key, .. }
            | Self::Finished { key, .. } => key,
        }
    }

    #[must_use]
    pub fn group(&self) -> Option<GroupId> {
        match self {
            Self::Installed { group, .. }
            | Self::Stopped { group, .. }
            | Self::Removed { group, .. }
            | Self::Started { group, .. }
            | Self::Finished { group, .. } => Some(*group),
            Self::Applied { group, .. } => *group,
        }
    }
}

/// Bounded FIFO of animation events.
#[derive(Debug)]
pub struct EventQueue {
    events: VecDeque<AnimationEvent>,
    capacity: usize,
    dropped: u64,
}

impl EventQueue {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: VecDeque::with_capacity(capacity.min(64)),
            capacity,
            dropped: 0,
        }
    }

    /// Appends an event, evicting the oldest one when full.
    pub fn push(&mut self, event: AnimationEvent) {
        if self.events.len() == self.capacity {
            self.events.pop_front();
            self.dropped += 1;
            if self.dropped.is_power_of_two() {
                log::warn!(
                    "Animation event queue full (capacity {}), {} event(s) dropped so far",
                    self.capacity,
                    self.dropped
                );
            }
        }
        self.events.push_back(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = AnimationEvent> + '_ {
        self.events.drain(..)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnimationEvent> {
        self.events.iter()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Total number of events evicted because the queue was full.
    #[inline]
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::with_capacity(256)
    }
}

use rustc_hash::FxHashMap;
use stagehand_core::NodeHandle;

use crate::group::AnimationGroup;

/// Whole-mapping view of a node's cached animations.
pub type AnimationMap = FxHashMap<String, AnimationGroup>;

/// Per-node table of animation groups keyed by name.
///
/// Every group that enters the registry is bound to its owner node, so no
/// entry ever claims another node.
///
/// The registry is storage only: inserting over an existing key or removing
/// a key never stops the displaced group's update loop. Supersession is the
/// coordinator's job.
#[derive(Debug, Clone)]
pub struct NodeAnimationRegistry {
    owner: NodeHandle,
    entries: AnimationMap,
}

impl NodeAnimationRegistry {
    #[must_use]
    pub fn new(owner: NodeHandle) -> Self {
        Self {
            owner,
            entries: AnimationMap::default(),
        }
    }

    /// Builds a registry from a full mapping, binding every group to `owner`.
    #[must_use]
    pub fn from_map(owner: NodeHandle, mut entries: AnimationMap) -> Self {
        for group in entries.values_mut() {
            group.bind_target(owner);
        }
        Self { owner, entries }
    }

    #[inline]
    #[must_use]
    pub fn owner(&self) -> NodeHandle {
        self.owner
    }

    /// The current mapping.
    #[inline]
    #[must_use]
    pub fn entries(&self) -> &AnimationMap {
        &self.entries
    }

    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&AnimationGroup> {
        self.entries.get(key)
    }

    #[inline]
    pub fn get_mut(&mut self, key: &str) -> Option<&mut AnimationGroup> {
        self.entries.get_mut(key)
    }

    #[inline]
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Binds `group` to the owner and inserts or overwrites `key`, returning
    /// the displaced group.
    pub fn insert(&mut self, key: impl Into<String>, mut group: AnimationGroup) -> Option<AnimationGroup> {
        group.bind_target(self.owner);
        self.entries.insert(key.into(), group)
    }

    pub fn remove(&mut self, key: &str) -> Option<AnimationGroup> {
        self.entries.remove(key)
    }

    /// Empties the registry, yielding every `(key, group)` pair.
    pub fn drain(&mut self) -> impl Iterator<Item = (String, AnimationGroup)> + '_ {
        self.entries.drain()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AnimationGroup)> {
        self.entries.iter().map(|(key, group)| (key.as_str(), group))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True if `owner` owns the registry and every group targets it.
    #[must_use]
    pub fn is_bound_to(&self, owner: NodeHandle) -> bool {
        self.owner == owner
            && self
                .entries
                .values()
                .all(|group| group.target() == Some(owner))
    }
}

use std::sync::atomic::{AtomicU64, Ordering};

use smallvec::SmallVec;
use stagehand_core::NodeHandle;

use crate::descriptor::AnimationDescriptor;
use crate::update_loop::{DisplayLink, LoopKey, UpdateLoopToken};

static NEXT_GROUP_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of an animation group. Clones of a group share it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(u64);

impl GroupId {
    fn next() -> Self {
        Self(NEXT_GROUP_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// An ordered bundle of animations played together on one node.
///
/// # Target
///
/// `target` is a non-owning back-reference. It is a [`NodeHandle`], so once
/// the node is removed from its scene the handle no longer resolves; the
/// group never keeps the node alive.
///
/// # Update loop
///
/// While the group plays it holds an [`UpdateLoopToken`]. The token is shared
/// between clones, so stopping any clone stops the loop they all observe.
#[derive(Debug, Clone)]
pub struct AnimationGroup {
    id: GroupId,
    animations: SmallVec<[AnimationDescriptor; 2]>,
    target: Option<NodeHandle>,
    update_loop: Option<UpdateLoopToken>,
}

impl AnimationGroup {
    #[must_use]
    pub fn new(animations: impl IntoIterator<Item = AnimationDescriptor>) -> Self {
        Self {
            id: GroupId::next(),
            animations: animations.into_iter().collect(),
            target: None,
            update_loop: None,
        }
    }

    /// Wraps a single descriptor into a one-element group.
    #[must_use]
    pub fn from_descriptor(animation: AnimationDescriptor) -> Self {
        Self::new([animation])
    }

    /// A group with no animations. Installing it under a key parks the key
    /// without driving any property.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(std::iter::empty::<AnimationDescriptor>())
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> GroupId {
        self.id
    }

    /// Animations in playback/stacking order.
    #[inline]
    #[must_use]
    pub fn animations(&self) -> &[AnimationDescriptor] {
        &self.animations
    }

    #[inline]
    #[must_use]
    pub fn target(&self) -> Option<NodeHandle> {
        self.target
    }

    /// Binds the group to `node`. Only the registry that stores the group
    /// binds it.
    ///
    /// Moving to a different node detaches this copy from any update loop it
    /// inherited; the loop keeps driving the node it was started for.
    pub(crate) fn bind_target(&mut self, node: NodeHandle) {
        if self.target != Some(node) {
            self.update_loop = None;
            self.target = Some(node);
        }
    }

    /// Seconds until the last animation of the group settles.
    #[must_use]
    pub fn duration(&self) -> f32 {
        self.animations
            .iter()
            .map(AnimationDescriptor::end_time)
            .fold(0.0_f32, f32::max)
    }

    #[must_use]
    pub fn update_loop(&self) -> Option<&UpdateLoopToken> {
        self.update_loop.as_ref()
    }

    #[must_use]
    pub fn loop_key(&self) -> Option<LoopKey> {
        self.update_loop.as_ref().map(UpdateLoopToken::key)
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.update_loop
            .as_ref()
            .is_some_and(UpdateLoopToken::is_running)
    }

    /// Subscribes the group to `link`. A group that is already running keeps
    /// its current loop. Returns true if a new loop was started.
    pub fn start_update_loop(&mut self, link: &mut DisplayLink) -> bool {
        if self.is_running() {
            return false;
        }
        self.update_loop = Some(link.subscribe(self.duration()));
        true
    }

    /// Halts the group's update loop, if any.
    ///
    /// Fire-and-forget: the link drops the subscription on its next tick.
    /// Safe to call on a group that never ran, already finished, or whose
    /// target node no longer exists. Returns true if a running loop was halted.
    pub fn stop_update_loop(&self) -> bool {
        let stopped = self
            .update_loop
            .as_ref()
            .is_some_and(UpdateLoopToken::cancel);
        if stopped {
            log::trace!("Stopped update loop of group {:?}", self.id);
        }
        stopped
    }
}

/// What a caller may attach under a key.
#[derive(Debug, Clone)]
pub enum AnimationInput {
    /// A lone descriptor; wrapped into a fresh one-element group.
    Single(AnimationDescriptor),
    /// A prebuilt group, installed as is.
    Group(AnimationGroup),
}

impl AnimationInput {
    /// Resolves the input into the group that will be installed.
    #[must_use]
    pub fn into_group(self) -> AnimationGroup {
        match self {
            Self::Single(animation) => AnimationGroup::from_descriptor(animation),
            Self::Group(group) => group,
        }
    }
}

impl From<AnimationDescriptor> for AnimationInput {
    fn from(animation: AnimationDescriptor) -> Self {
        Self::Single(animation)
    }
}

impl From<AnimationGroup> for AnimationInput {
    fn from(group: AnimationGroup) -> Self {
        Self::Group(group)
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;
    use slotmap::SlotMap;

    use super::*;

    fn fade(to: f32, duration: f32) -> AnimationDescriptor {
        AnimationDescriptor::opacity(to, duration).unwrap()
    }

    #[test]
    fn test_group_ids_unique_and_shared_by_clones() {
        let a = AnimationGroup::empty();
        let b = AnimationGroup::empty();
        assert_ne!(a.id(), b.id());
        assert_eq!(a.clone().id(), a.id());
    }

    #[test]
    fn test_duration_is_latest_end_time() {
        let group = AnimationGroup::new([
            fade(0.0, 0.3),
            AnimationDescriptor::position(Vec3::X, 0.2)
                .unwrap()
                .with_delay(0.4)
                .unwrap(),
        ]);
        assert!((group.duration() - 0.6).abs() < 1e-6);
        assert!(AnimationGroup::empty().duration().abs() < 1e-6);
    }

    #[test]
    fn test_stop_without_loop_is_noop() {
        let group = AnimationGroup::from_descriptor(fade(1.0, 1.0));
        assert!(!group.stop_update_loop());
        assert!(!group.is_running());
    }

    #[test]
    fn test_clone_shares_update_loop() {
        let mut link = DisplayLink::new();
        let mut group = AnimationGroup::from_descriptor(fade(1.0, 1.0));
        assert!(group.start_update_loop(&mut link));
        assert!(!group.start_update_loop(&mut link));

        let clone = group.clone();
        assert!(clone.stop_update_loop());
        assert!(!group.is_running());
        assert!(!group.stop_update_loop());
    }

    #[test]
    fn test_rebind_drops_inherited_loop() {
        let mut nodes: SlotMap<NodeHandle, ()> = SlotMap::with_key();
        let a = nodes.insert(());
        let b = nodes.insert(());
        let mut link = DisplayLink::new();

        let mut group = AnimationGroup::from_descriptor(fade(0.0, 1.0));
        group.bind_target(a);
        assert!(group.start_update_loop(&mut link));

        let mut same = group.clone();
        same.bind_target(a);
        assert!(same.is_running());

        let mut moved = group.clone();
        moved.bind_target(b);
        assert!(!moved.is_running());
        assert!(moved.loop_key().is_none());
        assert!(group.is_running());
    }

    #[test]
    fn test_input_into_group() {
        let desc = fade(0.5, 0.1);
        let single = AnimationInput::from(desc.clone()).into_group();
        assert_eq!(single.animations(), &[desc]);

        let group = AnimationGroup::empty();
        let id = group.id();
        assert_eq!(AnimationInput::from(group).into_group().id(), id);
    }
}

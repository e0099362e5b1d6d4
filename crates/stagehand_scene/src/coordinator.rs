//! Animation Coordinator
//!
//! The operation surface over per-node animation registries. It enforces one
//! live group per `(node, key)`: attaching under an occupied key first stops
//! the group already there, then installs the new one.
//!
//! ```rust,ignore
//! let mut scene = Scene::new();
//! let mut coordinator = AnimationCoordinator::new();
//! let node = scene.create_node();
//!
//! coordinator.attach_animation(&mut scene, node, AnimationDescriptor::opacity(0.0, 0.3)?, "fade");
//! coordinator.apply_animation(&mut scene, node, "fade", true);
//!
//! // Each frame
//! coordinator.tick(&mut scene, dt);
//! ```
//!
//! All operations absorb missing state: an absent node, an uninitialized
//! registry or an unknown key turns the call into a no-op.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use stagehand_animation::{
    AnimationDescriptor, AnimationEvent, AnimationGroup, AnimationInput, DisplayLink, EventQueue,
    GroupId, LoopKey,
};
use stagehand_core::{AnimationSettings, NodeHandle};

use crate::scene::Scene;

/// A group whose update loop completed during a tick.
struct Settled {
    node: NodeHandle,
    key: String,
    group: GroupId,
    animations: SmallVec<[AnimationDescriptor; 2]>,
}

#[derive(Debug)]
pub struct AnimationCoordinator {
    display_link: DisplayLink,
    /// Which `(node, key)` started each live loop.
    active_loops: FxHashMap<LoopKey, (NodeHandle, String)>,
    events: EventQueue,
    settings: AnimationSettings,
}

impl AnimationCoordinator {
    #[must_use]
    pub fn new() -> Self {
        Self::with_settings(AnimationSettings::default())
    }

    #[must_use]
    pub fn with_settings(settings: AnimationSettings) -> Self {
        Self {
            display_link: DisplayLink::new(),
            active_loops: FxHashMap::default(),
            events: EventQueue::with_capacity(settings.event_capacity),
            settings,
        }
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &AnimationSettings {
        &self.settings
    }

    #[inline]
    #[must_use]
    pub fn display_link(&self) -> &DisplayLink {
        &self.display_link
    }

    /// Number of loops started by this coordinator that have not yet
    /// finished or been stopped.
    #[inline]
    #[must_use]
    pub fn running_count(&self) -> usize {
        self.active_loops.len()
    }

    fn forget_loop(&mut self, group: &AnimationGroup) {
        if let Some(loop_key) = group.loop_key() {
            self.active_loops.remove(&loop_key);
        }
    }

    // ========================================================================
    // Registry Mutation
    // ========================================================================

    /// Installs `animation` under `key` on `node`.
    ///
    /// A single descriptor is wrapped into a new one-element group; a group
    /// is used as is. Either way the group is bound to `node` and replaces
    /// whatever `key` held. The displaced group is not stopped. A group moved
    /// in from another node arrives without that node's update loop.
    pub fn append_animation(
        &mut self,
        scene: &mut Scene,
        node: NodeHandle,
        animation: impl Into<AnimationInput>,
        key: &str,
    ) {
        let Some(registry) = scene.ensure_animation_registry(node) else {
            log::warn!("append_animation('{key}'): node {node:?} does not exist");
            return;
        };

        let group = animation.into().into_group();
        let id = group.id();
        registry.insert(key, group);

        log::trace!("Installed group {id:?} as '{key}' on {node:?}");
        self.events.push(AnimationEvent::Installed {
            node,
            key: key.to_string(),
            group: id,
        });
    }

    /// Stops the group currently under `key` (if any), then installs
    /// `animation` in its place.
    pub fn attach_animation(
        &mut self,
        scene: &mut Scene,
        node: NodeHandle,
        animation: impl Into<AnimationInput>,
        key: &str,
    ) {
        if let Some(previous) = scene.animation_registry(node).and_then(|r| r.get(key)) {
            let was_running = previous.stop_update_loop();
            log::debug!(
                "Superseding '{key}' on {node:?}: stopped group {:?} (running: {was_running})",
                previous.id()
            );
            self.forget_loop(previous);
            self.events.push(AnimationEvent::Stopped {
                node,
                key: key.to_string(),
                group: previous.id(),
            });
        }

        self.append_animation(scene, node, animation, key);
    }

    /// Stops and removes the group under `key`, leaving the key empty.
    pub fn detach_animation(
        &mut self,
        scene: &mut Scene,
        node: NodeHandle,
        key: &str,
    ) -> Option<AnimationGroup> {
        let group = scene.animation_registry_mut(node)?.remove(key)?;
        group.stop_update_loop();
        self.forget_loop(&group);

        log::debug!("Detached '{key}' (group {:?}) from {node:?}", group.id());
        self.events.push(AnimationEvent::Removed {
            node,
            key: key.to_string(),
            group: group.id(),
        });
        Some(group)
    }

    /// Stops every group on `node` and returns its registry to the
    /// uninitialized state. Returns how many groups were removed.
    pub fn detach_all(&mut self, scene: &mut Scene, node: NodeHandle) -> usize {
        let Some(mut registry) = scene.clear_cached_animations(node) else {
            return 0;
        };

        let mut count = 0;
        for (key, group) in registry.drain() {
            group.stop_update_loop();
            self.forget_loop(&group);
            self.events.push(AnimationEvent::Removed {
                node,
                key,
                group: group.id(),
            });
            count += 1;
        }
        log::debug!("Detached {count} animation(s) from {node:?}");
        count
    }

    // ========================================================================
    // Application
    // ========================================================================

    /// Applies the group cached under `key` on `node`.
    ///
    /// With `animated`, the group's update loop is started and its values
    /// settle when the loop completes. Without it, any running loop is
    /// stopped and the final values are written right away.
    pub fn apply_animation(&mut self, scene: &mut Scene, node: NodeHandle, key: &str, animated: bool) {
        let Some(group) = scene
            .animation_registry_mut(node)
            .and_then(|registry| registry.get_mut(key))
        else {
            log::trace!("No '{key}' animation on {node:?}");
            self.events.push(AnimationEvent::Applied {
                node,
                key: key.to_string(),
                animated,
                group: None,
            });
            return;
        };

        let id = group.id();
        self.events.push(AnimationEvent::Applied {
            node,
            key: key.to_string(),
            animated,
            group: Some(id),
        });

        if animated {
            if group.start_update_loop(&mut self.display_link)
                && let Some(loop_key) = group.loop_key()
            {
                self.active_loops.insert(loop_key, (node, key.to_string()));
                log::trace!("Started '{key}' on {node:?} for {}s", group.duration());
                self.events.push(AnimationEvent::Started {
                    node,
                    key: key.to_string(),
                    group: id,
                });
            }
            return;
        }

        group.stop_update_loop();
        self.forget_loop(group);
        let animations: SmallVec<[AnimationDescriptor; 2]> =
            group.animations().iter().cloned().collect();
        commit_final_values(scene, node, &animations);
        self.events.push(AnimationEvent::Finished {
            node,
            key: key.to_string(),
            group: id,
        });
    }

    /// Asks every direct child of `root` to apply its `key` entry.
    ///
    /// Not recursive. Children without the entry only record an `Applied`
    /// event with no group.
    pub fn apply_animations_to_children(
        &mut self,
        scene: &mut Scene,
        root: NodeHandle,
        key: &str,
        animated: bool,
    ) {
        let children: SmallVec<[NodeHandle; 8]> = scene.children(root).iter().copied().collect();
        for child in children {
            self.apply_animation(scene, child, key, animated);
        }
    }

    // ========================================================================
    // Frame Update
    // ========================================================================

    /// Advances all running groups by `dt` seconds (clamped by
    /// `settings.max_frame_delta`). Returns how many groups finished.
    pub fn tick(&mut self, scene: &mut Scene, dt: f32) -> usize {
        let dt = self.settings.clamp_delta(dt);
        let finished = self.display_link.tick(dt);

        let mut settled: SmallVec<[Settled; 4]> = SmallVec::new();
        for loop_key in finished {
            let Some((node, key)) = self.active_loops.remove(&loop_key) else {
                continue;
            };
            let group = scene
                .animation_registry(node)
                .and_then(|registry| registry.get(&key))
                .filter(|group| group.loop_key() == Some(loop_key));

            match group {
                Some(group) => settled.push(Settled {
                    node,
                    group: group.id(),
                    animations: group.animations().iter().cloned().collect(),
                    key,
                }),
                None => log::trace!("Loop {loop_key:?} finished for a group no longer cached"),
            }
        }

        // Loops cancelled outside the coordinator (node removal) leave stale entries.
        if self.active_loops.len() > self.display_link.subscription_count() {
            let link = &self.display_link;
            self.active_loops.retain(|loop_key, _| link.contains(*loop_key));
        }

        let count = settled.len();
        for entry in settled {
            if self.settings.commit_on_finish {
                commit_final_values(scene, entry.node, &entry.animations);
            }
            self.events.push(AnimationEvent::Finished {
                node: entry.node,
                key: entry.key,
                group: entry.group,
            });
        }
        count
    }

    // ========================================================================
    // Events
    // ========================================================================

    pub fn events(&self) -> impl Iterator<Item = &AnimationEvent> {
        self.events.iter()
    }

    pub fn drain_events(&mut self) -> impl Iterator<Item = AnimationEvent> + '_ {
        self.events.drain()
    }
}

impl Default for AnimationCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

/// Writes each animation's target value to `node`, in stacking order.
fn commit_final_values(scene: &mut Scene, node: NodeHandle, animations: &[AnimationDescriptor]) {
    let Some(target) = scene.get_node_mut(node) else {
        return;
    };
    for animation in animations {
        target.apply_value(animation.property(), animation.to());
    }
}

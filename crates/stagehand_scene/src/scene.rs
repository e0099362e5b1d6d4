use slotmap::{SecondaryMap, SlotMap};
use stagehand_animation::{AnimationMap, NodeAnimationRegistry};
use stagehand_core::NodeHandle;

use crate::node::Node;

/// Scene graph: node arena plus per-node side-tables.
///
/// Animation registries are not fields of [`Node`]. They live in a
/// `SecondaryMap` keyed by the node's handle, created on first write and
/// dropped together with the node.
#[derive(Debug, Default)]
pub struct Scene {
    nodes: SlotMap<NodeHandle, Node>,
    root_nodes: Vec<NodeHandle>,

    // ==== Side-tables ====
    names: SecondaryMap<NodeHandle, String>,
    animation_registries: SecondaryMap<NodeHandle, NodeAnimationRegistry>,
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Node Lifecycle
    // ========================================================================

    /// Creates a detached node (neither root nor child).
    pub fn create_node(&mut self) -> NodeHandle {
        self.nodes.insert(Node::new())
    }

    pub fn create_node_with_name(&mut self, name: &str) -> NodeHandle {
        let handle = self.create_node();
        self.names.insert(handle, name.to_string());
        handle
    }

    /// Inserts a node at the root level.
    pub fn add_node(&mut self, node: Node) -> NodeHandle {
        let handle = self.nodes.insert(node);
        self.root_nodes.push(handle);
        handle
    }

    /// Inserts a node as the last child of `parent`. Falls back to the root
    /// level if `parent` does not exist.
    pub fn add_to_parent(&mut self, node: Node, parent: NodeHandle) -> NodeHandle {
        let handle = self.nodes.insert(node);
        if self.nodes.contains_key(parent) {
            self.attach(handle, parent);
        } else {
            log::warn!("Parent {parent:?} not found, adding {handle:?} as root");
            self.root_nodes.push(handle);
        }
        handle
    }

    /// Removes a node and its whole subtree.
    ///
    /// Each removed node's animation registry is dropped and the update loops
    /// of its groups are stopped. Handles held elsewhere (including group
    /// targets) stop resolving.
    pub fn remove_node(&mut self, handle: NodeHandle) {
        if !self.nodes.contains_key(handle) {
            return;
        }
        self.unlink(handle);

        let mut stack = vec![handle];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.remove(current) else {
                continue;
            };
            stack.extend(node.children);

            self.names.remove(current);
            if let Some(mut registry) = self.animation_registries.remove(current) {
                for (key, group) in registry.drain() {
                    if group.stop_update_loop() {
                        log::debug!("Stopped '{key}' on removed node {current:?}");
                    }
                }
            }
        }
    }

    // ========================================================================
    // Hierarchy
    // ========================================================================

    /// Makes `child` the last child of `parent`, detaching it from its old parent.
    pub fn attach(&mut self, child: NodeHandle, parent: NodeHandle) {
        if child == parent {
            log::warn!("Cannot attach node to itself!");
            return;
        }
        if !self.nodes.contains_key(child) || !self.nodes.contains_key(parent) {
            log::error!("Attach failed: {child:?} or {parent:?} not found");
            return;
        }
        if self.is_ancestor(child, parent) {
            log::warn!("Cannot attach {child:?} below its own descendant {parent:?}");
            return;
        }

        self.unlink(child);

        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = Some(parent);
        }
    }

    /// Detaches `handle` from its parent and moves it to the root level.
    pub fn detach(&mut self, handle: NodeHandle) {
        if !self.nodes.contains_key(handle) {
            return;
        }
        self.unlink(handle);
        self.root_nodes.push(handle);
    }

    /// Removes `handle` from its parent's child list (or from the roots) and
    /// clears its parent link.
    fn unlink(&mut self, handle: NodeHandle) {
        let old_parent = self.nodes.get_mut(handle).and_then(|n| n.parent.take());
        if let Some(p) = old_parent {
            if let Some(parent) = self.nodes.get_mut(p)
                && let Some(i) = parent.children.iter().position(|&x| x == handle)
            {
                parent.children.remove(i);
            }
        } else if let Some(i) = self.root_nodes.iter().position(|&x| x == handle) {
            self.root_nodes.remove(i);
        }
    }

    fn is_ancestor(&self, ancestor: NodeHandle, mut node: NodeHandle) -> bool {
        while let Some(parent) = self.nodes.get(node).and_then(Node::parent) {
            if parent == ancestor {
                return true;
            }
            node = parent;
        }
        false
    }

    // ========================================================================
    // Queries
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    #[inline]
    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, handle: NodeHandle) -> bool {
        self.nodes.contains_key(handle)
    }

    /// Direct children of `handle`; empty if the node does not exist.
    #[must_use]
    pub fn children(&self, handle: NodeHandle) -> &[NodeHandle] {
        self.nodes.get(handle).map(Node::children).unwrap_or(&[])
    }

    #[inline]
    #[must_use]
    pub fn root_nodes(&self) -> &[NodeHandle] {
        &self.root_nodes
    }

    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn get_name(&self, handle: NodeHandle) -> Option<&str> {
        self.names.get(handle).map(String::as_str)
    }

    pub fn set_name(&mut self, handle: NodeHandle, name: &str) {
        if self.nodes.contains_key(handle) {
            self.names.insert(handle, name.to_string());
        }
    }

    // ========================================================================
    // Animation Registry Side-table
    // ========================================================================

    /// The node's registry, or `None` if it was never initialized.
    #[inline]
    #[must_use]
    pub fn animation_registry(&self, handle: NodeHandle) -> Option<&NodeAnimationRegistry> {
        self.animation_registries.get(handle)
    }

    /// Mutable access to the node's registry. Groups inserted through it are
    /// bound to the node.
    #[inline]
    pub fn animation_registry_mut(&mut self, handle: NodeHandle) -> Option<&mut NodeAnimationRegistry> {
        self.animation_registries.get_mut(handle)
    }

    /// The node's registry, created empty on first use. `None` only if the
    /// node does not exist.
    pub fn ensure_animation_registry(&mut self, handle: NodeHandle) -> Option<&mut NodeAnimationRegistry> {
        if !self.nodes.contains_key(handle) {
            return None;
        }
        Some(
            self.animation_registries
                .entry(handle)?
                .or_insert_with(|| NodeAnimationRegistry::new(handle)),
        )
    }

    /// Read side of the cached-animations contract.
    #[must_use]
    pub fn cached_animations(&self, handle: NodeHandle) -> Option<&AnimationMap> {
        self.animation_registry(handle).map(NodeAnimationRegistry::entries)
    }

    /// Write side of the cached-animations contract: replaces the whole
    /// mapping. Every group in `entries` is bound to `handle`.
    ///
    /// Displaced groups are dropped without being stopped. No-op if the node
    /// does not exist.
    pub fn set_cached_animations(&mut self, handle: NodeHandle, entries: AnimationMap) {
        if !self.nodes.contains_key(handle) {
            log::warn!("Ignoring cached animations for missing node {handle:?}");
            return;
        }
        self.animation_registries
            .insert(handle, NodeAnimationRegistry::from_map(handle, entries));
    }

    /// Returns the node's registry to the uninitialized state, handing back
    /// what it held.
    pub fn clear_cached_animations(&mut self, handle: NodeHandle) -> Option<NodeAnimationRegistry> {
        self.animation_registries.remove(handle)
    }
}

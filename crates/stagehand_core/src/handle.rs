use slotmap::new_key_type;

new_key_type! {
    /// Identifies a node inside a `Scene`.
    ///
    /// Handles are versioned: once the node is removed, the handle never
    /// resolves again, even if the slot is reused. This makes a handle a
    /// safe non-owning back-reference.
    pub struct NodeHandle;
}

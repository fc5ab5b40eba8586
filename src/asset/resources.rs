//! GPU resource accounting
//!
//! Every geometry buffer, material and texture a character owns is
//! registered here when the character is instantiated. Handles are not
//! `Clone`, so a resource can be released at most once; the renderer drops
//! its GPU copies of anything no longer live.

use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    Geometry,
    Material,
    Texture,
}

/// Ownership token for one registered resource
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct ResourceHandle {
    id: u64,
    kind: ResourceKind,
}

impl ResourceHandle {
    pub fn id(&self) -> u64 {
        self.id
    }
}

#[derive(Debug, Default)]
pub struct ResourcePool {
    next_id: u64,
    live: BTreeMap<u64, ResourceKind>,
}

impl ResourcePool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self, kind: ResourceKind) -> ResourceHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.live.insert(id, kind);
        ResourceHandle { id, kind }
    }

    /// Free a resource. Returns false if the pool did not know it.
    pub fn release(&mut self, handle: ResourceHandle) -> bool {
        if self.live.get(&handle.id) != Some(&handle.kind) {
            return false;
        }
        self.live.remove(&handle.id);
        true
    }

    pub fn is_live(&self, id: u64) -> bool {
        self.live.contains_key(&id)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn live_count_of(&self, kind: ResourceKind) -> usize {
        self.live.values().filter(|&&k| k == kind).count()
    }
}

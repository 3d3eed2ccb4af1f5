//! Moved-methods side table
//!
//! DEPRECATED. Records methods relocated to another class so later tooling can
//! emit a move map. Kept apart from the read-only configuration; new code
//! should not add state here.

use crate::shared::models::{DexType, MethodMap, MethodTuple};

#[derive(Debug, Clone, Default)]
pub struct MoveRegistry {
    moved: bool,
    methods: MethodMap,
}

impl MoveRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `method` now lives in `owner`; last write wins
    pub fn add(&mut self, method: MethodTuple, owner: DexType) {
        self.moved = true;
        self.methods.insert(method, owner);
    }

    /// True once any move has been recorded
    pub fn has_moves(&self) -> bool {
        self.moved
    }

    pub fn methods(&self) -> &MethodMap {
        &self.methods
    }
}

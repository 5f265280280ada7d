//! Pending-registration queue
//!
//! Declarations may reference parents that have not been registered yet.
//! Such declarations are parked here, keyed by the awaited parent name,
//! and handed back in arrival order once that parent is stored.

use std::collections::VecDeque;

use indexmap::IndexMap;

use crate::declaration::StateDeclaration;
use trellis_foundation::StateName;

/// Raw declarations waiting for their parent, keyed by parent name.
#[derive(Debug, Default)]
pub struct PendingQueue {
    waiting: IndexMap<StateName, VecDeque<StateDeclaration>>,
}

impl PendingQueue {
    /// Park a declaration until `parent` is registered.
    pub fn park(&mut self, parent: StateName, decl: StateDeclaration) {
        self.waiting.entry(parent).or_default().push_back(decl);
    }

    /// Remove and return the oldest declaration waiting on `parent`.
    ///
    /// Declarations come back one at a time so a failure while resolving
    /// one leaves its siblings parked instead of dropping them.
    pub fn pop_child(&mut self, parent: &StateName) -> Option<StateDeclaration> {
        let children = self.waiting.get_mut(parent)?;
        let decl = children.pop_front();
        if children.is_empty() {
            self.waiting.shift_remove(parent);
        }
        decl
    }

    /// Parent names that still have parked declarations.
    pub fn awaited_parents(&self) -> impl Iterator<Item = &StateName> {
        self.waiting.keys()
    }

    /// Whether any declaration is still parked.
    pub fn is_empty(&self) -> bool {
        self.waiting.is_empty()
    }
}

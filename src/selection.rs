//! Ordered, duplicate-free selection of actor ids.
//!
//! Order is meaningful: the last entry is the anchor every group manipulation
//! pivots around. Membership must always mirror the registry; the session
//! removes ids here in the same operation that deletes the actor.

use crate::actor::ActorId;

#[derive(Default)]
pub struct SelectionSet {
    ids: Vec<ActorId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> &[ActorId] {
        &self.ids
    }

    /// The most recently selected actor, pivot for group manipulation.
    pub fn anchor(&self) -> Option<ActorId> {
        self.ids.last().copied()
    }

    pub fn primary(&self) -> Option<ActorId> {
        self.ids.first().copied()
    }

    pub fn contains(&self, id: ActorId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) -> bool {
        if self.ids.is_empty() {
            return false;
        }
        self.ids.clear();
        true
    }

    /// Drop one id, preserving the order of the rest. Used when the actor is
    /// deleted from the registry.
    pub fn remove(&mut self, id: ActorId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|existing| *existing != id);
        self.ids.len() != before
    }

    /// Apply the click-selection rules for a resolved pick. Returns whether
    /// the set changed.
    ///
    /// - miss: clear everything
    /// - unselected hit: replace the set unless additive, then append
    /// - selected hit, additive: remove it
    /// - selected hit, not additive: collapse to just that id
    pub fn resolve_click(&mut self, hit: Option<ActorId>, additive: bool) -> bool {
        let Some(id) = hit else {
            return self.clear();
        };

        if !self.contains(id) {
            if !additive {
                self.ids.clear();
            }
            self.ids.push(id);
            return true;
        }

        if additive {
            self.remove(id)
        } else {
            if self.ids.as_slice() == [id] {
                return false;
            }
            self.ids.clear();
            self.ids.push(id);
            true
        }
    }
}

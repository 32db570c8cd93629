// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The set of currently selected identities.

use alloc::vec::Vec;

use hashbrown::HashMap;
use thicket_index::{Identity, IndexedItem};

/// Selected identities plus a revision counter.
///
/// The revision bumps only when the contents change, so observers can cheaply
/// tell whether a brushing step did anything.
#[derive(Clone, Debug, Default)]
pub struct SelectionSet {
    items: HashMap<Identity, IndexedItem>,
    revision: u64,
}

impl SelectionSet {
    /// Number of selected identities.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns `true` if `identity` is selected.
    pub fn contains(&self, identity: &Identity) -> bool {
        self.items.contains_key(identity)
    }

    /// The stored item of a selected identity.
    pub fn get(&self, identity: &Identity) -> Option<&IndexedItem> {
        self.items.get(identity)
    }

    /// Selected identities in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &Identity> + '_ {
        self.items.keys()
    }

    /// Selected identities, sorted.
    pub fn sorted(&self) -> Vec<&Identity> {
        let mut ids: Vec<_> = self.items.keys().collect();
        ids.sort_unstable();
        ids
    }

    /// Monotonic change counter.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub(crate) fn insert(&mut self, item: IndexedItem) -> bool {
        if self.items.contains_key(&item.identity) {
            return false;
        }
        self.items.insert(item.identity.clone(), item);
        self.bump_revision();
        true
    }

    pub(crate) fn remove(&mut self, identity: &Identity) -> Option<IndexedItem> {
        let removed = self.items.remove(identity);
        if removed.is_some() {
            self.bump_revision();
        }
        removed
    }

    /// Remove everything, returning the items sorted by identity.
    pub(crate) fn take_all(&mut self) -> Vec<IndexedItem> {
        if self.items.is_empty() {
            return Vec::new();
        }
        let mut all: Vec<_> = self.items.drain().map(|(_, item)| item).collect();
        all.sort_unstable_by(|a, b| a.identity.cmp(&b.identity));
        self.bump_revision();
        all
    }

    /// After `owner` was re-indexed: keep its identities that still exist,
    /// with their fresh items, and drop the rest without reporting them.
    pub(crate) fn refresh_owner(
        &mut self,
        owner: &str,
        fresh: impl IntoIterator<Item = IndexedItem>,
    ) {
        if !self.items.keys().any(|identity| identity.owner() == owner) {
            return;
        }
        let mut fresh: HashMap<Identity, IndexedItem> = fresh
            .into_iter()
            .map(|item| (item.identity.clone(), item))
            .collect();
        let before = self.items.len();
        self.items.retain(|identity, item| {
            if identity.owner() != owner {
                return true;
            }
            match fresh.remove(identity) {
                Some(new) => {
                    *item = new;
                    true
                }
                None => false,
            }
        });
        if self.items.len() != before {
            self.bump_revision();
        }
    }

    /// Drop every identity owned by `owner` without reporting them.
    pub(crate) fn forget_owner(&mut self, owner: &str) {
        let before = self.items.len();
        self.items.retain(|identity, _| identity.owner() != owner);
        if self.items.len() != before {
            self.bump_revision();
        }
    }

    fn bump_revision(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

//! Sorts and the subsort partial order.
//!
//! A sort is a name plus an optional parent; parents must exist before their
//! children are registered, so the subsort relation is acyclic by
//! construction. Compatibility checks walk the parent chain, giving the
//! reflexive-transitive closure of the declared relation. Every store carries
//! a distinguished `top` sort that undeclared positions default to.

use lasso::Spur;
use rustc_hash::FxHashMap;

/// Index of a sort in a [`SortStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SortId(pub(crate) u32);

/// A registered sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    /// Interned sort name.
    pub name: Spur,
    /// Direct supersort, if any. `None` for roots of the hierarchy.
    pub parent: Option<SortId>,
}

/// The sort table owned by a term manager.
#[derive(Debug, Clone)]
pub struct SortStore {
    sorts: Vec<Sort>,
    by_name: FxHashMap<Spur, SortId>,
    /// The default sort every other root implicitly specializes.
    pub top: SortId,
}

impl SortStore {
    /// Create a store containing only the given pre-interned top sort name.
    pub(crate) fn new(top_name: Spur) -> Self {
        let top = SortId(0);
        let mut by_name = FxHashMap::default();
        by_name.insert(top_name, top);
        SortStore {
            sorts: vec![Sort {
                name: top_name,
                parent: None,
            }],
            by_name,
            top,
        }
    }

    /// Register a sort under `parent` (or under no parent). Re-registering an
    /// existing name returns its original id unchanged.
    pub(crate) fn add(&mut self, name: Spur, parent: Option<SortId>) -> SortId {
        if let Some(&id) = self.by_name.get(&name) {
            return id;
        }
        let id = SortId(self.sorts.len() as u32);
        self.sorts.push(Sort { name, parent });
        self.by_name.insert(name, id);
        id
    }

    /// Look up a sort by interned name.
    pub fn lookup(&self, name: Spur) -> Option<SortId> {
        self.by_name.get(&name).copied()
    }

    /// Access a sort's record.
    pub fn get(&self, id: SortId) -> &Sort {
        &self.sorts[id.0 as usize]
    }

    /// Number of registered sorts, including `top`.
    pub fn len(&self) -> usize {
        self.sorts.len()
    }

    /// True when only the top sort is registered.
    pub fn is_empty(&self) -> bool {
        self.sorts.len() <= 1
    }

    /// Reflexive-transitive subsort check: walks `sub`'s parent chain looking
    /// for `sup`. Everything is a subsort of `top`.
    pub fn is_subsort(&self, sub: SortId, sup: SortId) -> bool {
        if sup == self.top {
            return true;
        }
        let mut cur = Some(sub);
        while let Some(id) = cur {
            if id == sup {
                return true;
            }
            cur = self.get(id).parent;
        }
        false
    }
}

//! Function signatures and algebraic property tags.
//!
//! Each function symbol carries a fixed arity, optional per-argument domain
//! sorts, a range sort, and a closed [`Algebra`] tag. Equality, flattening
//! and unification dispatch on the tag; there is no inheritance hierarchy of
//! "AC functions" anywhere in the engine.

use crate::sort::SortId;
use lasso::Spur;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Index of a function declaration in a [`Signature`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FuncId(pub(crate) u32);

/// Algebraic properties a function symbol may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Algebra {
    /// No equational properties; equality and unification are structural.
    #[default]
    Free,
    /// Associative only: nested applications flatten to an ordered list.
    Associative,
    /// Commutative only: argument order is irrelevant, nesting is not.
    Commutative,
    /// Associative and commutative: nested applications flatten to a
    /// multiset.
    AssocComm,
}

impl Algebra {
    /// Whether nested same-symbol applications may be flattened.
    pub fn is_associative(self) -> bool {
        matches!(self, Algebra::Associative | Algebra::AssocComm)
    }

    /// Whether argument order is irrelevant.
    pub fn is_commutative(self) -> bool {
        matches!(self, Algebra::Commutative | Algebra::AssocComm)
    }
}

/// A declared function symbol.
#[derive(Debug, Clone)]
pub struct FuncDecl {
    /// Interned symbol name.
    pub name: Spur,
    /// Fixed argument count.
    pub arity: usize,
    /// Per-argument domain sorts; `None` leaves every position at `top`.
    pub domain: Option<SmallVec<[SortId; 4]>>,
    /// Range sort of applications of this symbol.
    pub range: SortId,
    /// Algebraic property tag.
    pub algebra: Algebra,
}

/// The function symbol table owned by a term manager.
#[derive(Debug, Clone, Default)]
pub struct Signature {
    funcs: Vec<FuncDecl>,
    by_name: FxHashMap<Spur, FuncId>,
}

impl Signature {
    pub(crate) fn declare(&mut self, decl: FuncDecl) -> FuncId {
        if let Some(&id) = self.by_name.get(&decl.name) {
            return id;
        }
        let id = FuncId(self.funcs.len() as u32);
        self.by_name.insert(decl.name, id);
        self.funcs.push(decl);
        id
    }

    /// Access a declaration.
    pub fn get(&self, id: FuncId) -> &FuncDecl {
        &self.funcs[id.0 as usize]
    }

    /// Look up a function by interned name.
    pub fn lookup(&self, name: Spur) -> Option<FuncId> {
        self.by_name.get(&name).copied()
    }

    /// Number of declared functions.
    pub fn len(&self) -> usize {
        self.funcs.len()
    }

    /// True when no functions are declared.
    pub fn is_empty(&self) -> bool {
        self.funcs.is_empty()
    }
}

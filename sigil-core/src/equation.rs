//! Equations and equation sets.

use crate::term::{TermId, TermManager};
use rustc_hash::FxHashSet;

/// An unordered-intent pair of terms to be made equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Equation {
    /// Left side.
    pub lhs: TermId,
    /// Right side.
    pub rhs: TermId,
}

impl Equation {
    /// Pair two terms.
    pub fn new(lhs: TermId, rhs: TermId) -> Self {
        Equation { lhs, rhs }
    }
}

/// A duplicate-collapsing set of equations with deterministic iteration
/// order.
#[derive(Debug, Clone, Default)]
pub struct EquationSet {
    eqs: Vec<Equation>,
}

impl EquationSet {
    /// Empty set.
    pub fn new() -> Self {
        EquationSet::default()
    }

    /// Insert an equation; duplicates in either orientation collapse.
    /// Returns whether the set grew.
    pub fn insert(&mut self, eq: Equation) -> bool {
        let dup = self
            .eqs
            .iter()
            .any(|e| (e.lhs, e.rhs) == (eq.lhs, eq.rhs) || (e.lhs, e.rhs) == (eq.rhs, eq.lhs));
        if dup {
            return false;
        }
        self.eqs.push(eq);
        true
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Equation> {
        self.eqs.iter()
    }

    /// Number of distinct equations.
    pub fn len(&self) -> usize {
        self.eqs.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.eqs.is_empty()
    }

    /// Variables occurring on either side of any equation.
    pub fn vars(&self, tm: &TermManager) -> FxHashSet<TermId> {
        let mut out = FxHashSet::default();
        for eq in &self.eqs {
            out.extend(tm.vars(eq.lhs));
            out.extend(tm.vars(eq.rhs));
        }
        out
    }
}

impl FromIterator<Equation> for EquationSet {
    fn from_iter<I: IntoIterator<Item = Equation>>(iter: I) -> Self {
        let mut set = EquationSet::new();
        for eq in iter {
            set.insert(eq);
        }
        set
    }
}

impl FromIterator<(TermId, TermId)> for EquationSet {
    fn from_iter<I: IntoIterator<Item = (TermId, TermId)>>(iter: I) -> Self {
        iter.into_iter()
            .map(|(l, r)| Equation::new(l, r))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicates_collapse() {
        let mut tm = TermManager::new();
        let top = tm.sorts.top;
        let a = tm.mk_const("a", top);
        let b = tm.mk_const("b", top);
        let mut set = EquationSet::new();
        assert!(set.insert(Equation::new(a, b)));
        assert!(!set.insert(Equation::new(a, b)));
        assert!(!set.insert(Equation::new(b, a)), "orientation collapses");
        assert_eq!(set.len(), 1);
    }
}

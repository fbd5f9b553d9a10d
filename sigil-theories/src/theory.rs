//! Theory selection and the shared solver surface.
//!
//! Callers pick a [`Theory`], a result [`Bound`], and a step [`Budget`]
//! explicitly at every call; there is no global registry of algorithms.
//! [`unify`] dispatches to the matching solver and normalizes every outcome
//! into a [`UnifyResult`], keeping "no unifier exists" strictly apart from
//! "the search was cut short".

use crate::ac;
use crate::xor::{ConstraintMap, XorTheory};
use sigil_core::{EquationSet, Substitution, TermId, TermManager, UnifyFailure};

/// Which equational theory interprets the equations.
#[derive(Debug, Clone)]
pub enum Theory {
    /// Plain syntactic equality.
    Syntactic,
    /// Associative-commutative equality for tagged symbols.
    Ac,
    /// XOR (abelian group of exponent 2) equality.
    Xor(XorTheory),
    /// XOR equality with per-variable constraint menus.
    XorConstrained(XorTheory, ConstraintMap),
}

/// How many unifiers the caller wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// The complete minimal set.
    All,
    /// Stop at the first unifier.
    First,
    /// Stop after at most this many unifiers.
    Limit(usize),
}

impl Bound {
    /// Is enumeration finished once `found` unifiers have been produced?
    pub fn reached(&self, found: usize) -> bool {
        match self {
            Bound::All => false,
            Bound::First => found >= 1,
            Bound::Limit(n) => found >= *n,
        }
    }
}

/// Whether a solver ran to completion or was cut short.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// Every branch of the search was explored.
    Complete,
    /// The result bound or the step budget stopped the search early.
    Truncated,
}

/// Raw solver output, before completeness interpretation.
#[derive(Debug, Clone)]
pub struct UnifyOutcome {
    /// The unifiers found, deduplicated modulo renaming.
    pub unifiers: Vec<Substitution>,
    /// Whether the search was exhaustive.
    pub status: SolveStatus,
}

/// Why no unifier exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsatReason {
    /// Incompatible head symbols.
    SymbolClash {
        /// Left term at the clash.
        left: TermId,
        /// Right term at the clash.
        right: TermId,
    },
    /// A variable would have to contain itself.
    OccursCheck {
        /// The variable.
        var: TermId,
        /// The term it occurs in.
        term: TermId,
    },
    /// The exhaustive search produced no unifier.
    NoUnifier,
}

/// Outcome of a theory unification call.
///
/// `BoundExceeded` is deliberately distinct from `Unsatisfiable`: a caller
/// concluding that *no* unifier exists may do so only from `Unsatisfiable`.
#[derive(Debug, Clone)]
pub enum UnifyResult {
    /// The complete minimal set of unifiers.
    Unifiers(Vec<Substitution>),
    /// No unifier exists under the theory.
    Unsatisfiable(UnsatReason),
    /// The search stopped early; `found` holds the unifiers seen so far.
    BoundExceeded {
        /// Unifiers produced before the cutoff.
        found: Vec<Substitution>,
    },
}

impl UnifyResult {
    /// Convenience: the unifiers regardless of status.
    pub fn found(&self) -> &[Substitution] {
        match self {
            UnifyResult::Unifiers(u) | UnifyResult::BoundExceeded { found: u } => u,
            UnifyResult::Unsatisfiable(_) => &[],
        }
    }

    /// Whether no unifier exists (proved, not merely not found).
    pub fn is_unsatisfiable(&self) -> bool {
        matches!(self, UnifyResult::Unsatisfiable(_))
    }
}

/// Cooperative step budget checked at the head of every search loop.
///
/// Each AC subset candidate, XOR search state, and saturation pair costs one
/// step. An exhausted budget makes the solver stop and report truncation.
#[derive(Debug, Clone, Copy)]
pub struct Budget {
    remaining: u64,
}

impl Budget {
    /// A budget of `steps` loop iterations.
    pub fn new(steps: u64) -> Self {
        Self { remaining: steps }
    }

    /// Effectively no limit.
    pub fn unlimited() -> Self {
        Self {
            remaining: u64::MAX,
        }
    }

    /// Consume one step. Returns `false` once the budget is spent.
    pub fn step(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }

    /// Whether any budget is left.
    pub fn exhausted(&self) -> bool {
        self.remaining == 0
    }
}

impl Default for Budget {
    fn default() -> Self {
        Self::unlimited()
    }
}

/// Unify an equation set under the chosen theory.
///
/// An empty unifier set from an exhaustive search maps to
/// [`UnifyResult::Unsatisfiable`]; a truncated search maps to
/// [`UnifyResult::BoundExceeded`] no matter how many unifiers it produced.
pub fn unify(
    tm: &mut TermManager,
    eqs: &EquationSet,
    theory: &Theory,
    bound: Bound,
    budget: &mut Budget,
) -> UnifyResult {
    let outcome = match theory {
        Theory::Syntactic => {
            return match sigil_core::unify(tm, eqs) {
                Ok(mgu) => UnifyResult::Unifiers(vec![mgu]),
                Err(UnifyFailure::SymbolClash { left, right }) => {
                    UnifyResult::Unsatisfiable(UnsatReason::SymbolClash { left, right })
                }
                Err(UnifyFailure::OccursCheck { var, term }) => {
                    UnifyResult::Unsatisfiable(UnsatReason::OccursCheck { var, term })
                }
            };
        }
        Theory::Ac => ac::unify_ac(tm, eqs, bound, budget),
        Theory::Xor(xor) => xor.unify(tm, eqs, bound, budget),
        Theory::XorConstrained(xor, constraints) => {
            xor.constrained_unify(tm, eqs, constraints, bound, budget)
        }
    };

    match outcome.status {
        SolveStatus::Truncated => UnifyResult::BoundExceeded {
            found: outcome.unifiers,
        },
        SolveStatus::Complete if outcome.unifiers.is_empty() => {
            UnifyResult::Unsatisfiable(UnsatReason::NoUnifier)
        }
        SolveStatus::Complete => UnifyResult::Unifiers(outcome.unifiers),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigil_core::Algebra;

    #[test]
    fn test_bound_reached() {
        assert!(!Bound::All.reached(1_000_000));
        assert!(Bound::First.reached(1));
        assert!(!Bound::First.reached(0));
        assert!(Bound::Limit(3).reached(3));
        assert!(!Bound::Limit(3).reached(2));
    }

    #[test]
    fn test_budget_runs_out() {
        let mut b = Budget::new(2);
        assert!(b.step());
        assert!(b.step());
        assert!(!b.step());
        assert!(b.exhausted());
    }

    #[test]
    fn test_syntactic_dispatch() {
        let mut tm = TermManager::new();
        let top = tm.sorts.top;
        let f = tm.declare_func("f", 2, Algebra::Free);
        let x = tm.mk_var("x", top);
        let y = tm.mk_var("y", top);
        let a = tm.mk_const("a", top);
        let b = tm.mk_const("b", top);
        let l = tm.mk_app(f, &[x, y]).unwrap();
        let r = tm.mk_app(f, &[a, b]).unwrap();
        let eqs: EquationSet = [(l, r)].into_iter().collect();

        let result = unify(
            &mut tm,
            &eqs,
            &Theory::Syntactic,
            Bound::All,
            &mut Budget::unlimited(),
        );
        match result {
            UnifyResult::Unifiers(us) => {
                assert_eq!(us.len(), 1);
                assert_eq!(us[0].get(x), Some(a));
            }
            other => panic!("expected unifiers, got {other:?}"),
        }
    }

    #[test]
    fn test_syntactic_unsat_keeps_reason() {
        let mut tm = TermManager::new();
        let top = tm.sorts.top;
        let f = tm.declare_func("f", 2, Algebra::Free);
        let g = tm.declare_func("g", 1, Algebra::Free);
        let x = tm.mk_var("x", top);
        let y = tm.mk_var("y", top);
        let z = tm.mk_var("z", top);
        let l = tm.mk_app(f, &[x, y]).unwrap();
        let r = tm.mk_app(g, &[z]).unwrap();
        let eqs: EquationSet = [(l, r)].into_iter().collect();

        let result = unify(
            &mut tm,
            &eqs,
            &Theory::Syntactic,
            Bound::All,
            &mut Budget::unlimited(),
        );
        assert!(matches!(
            result,
            UnifyResult::Unsatisfiable(UnsatReason::SymbolClash { .. })
        ));
    }
}

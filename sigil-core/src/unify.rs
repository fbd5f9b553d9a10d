//! Syntactic unification, matching, and renaming equivalence.
//!
//! The unifier is a worklist transformation in the Martelli-Montanari style:
//! trivial equations are dropped, clashing applications fail, variable
//! equations are oriented, occurs-check violations fail, free applications
//! decompose argument-wise, and variable eliminations are propagated through
//! the remaining worklist and the solved set. Each step strictly decreases
//! the (term size, equation count) measure, so the loop terminates.
//!
//! Equations rooted at associative/commutative-tagged symbols are *not*
//! decomposed here; they belong to the theory unifiers. Within this module
//! such a pair either is already equal modulo its algebra (and is dropped) or
//! fails as a clash: the syntactic theory has no unifier for it.
//! [`unify_structural`] ignores algebra tags entirely and decomposes every
//! same-symbol pair positionally; the renaming-equivalence test and the
//! XOR resolution machinery are built on it.

use crate::equation::{Equation, EquationSet};
use crate::signature::Algebra;
use crate::subst::Substitution;
use crate::term::{TermId, TermKind, TermManager};
use rustc_hash::FxHashSet;
use std::collections::VecDeque;

/// Why a unification attempt failed. Returned as a value, never a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnifyFailure {
    /// Two applications (or leaves) with incompatible head symbols.
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
}

/// Unify an equation set syntactically, returning the most general unifier.
pub fn unify(tm: &mut TermManager, eqs: &EquationSet) -> Result<Substitution, UnifyFailure> {
    solve(tm, eqs, false)
}

/// Unify while decomposing *all* same-symbol applications positionally,
/// ignoring algebra tags. Used for the renaming-equivalence test and for
/// summand-level subgoals where the theory layer has already fixed the
/// argument arrangement.
pub fn unify_structural(
    tm: &mut TermManager,
    eqs: &EquationSet,
) -> Result<Substitution, UnifyFailure> {
    solve(tm, eqs, true)
}

fn solve(
    tm: &mut TermManager,
    eqs: &EquationSet,
    structural: bool,
) -> Result<Substitution, UnifyFailure> {
    let mut work: VecDeque<(TermId, TermId)> = eqs.iter().map(|e| (e.lhs, e.rhs)).collect();
    let mut solved = Substitution::new();
    tracing::trace!(equations = work.len(), structural, "unify start");

    while let Some((l, r)) = work.pop_front() {
        // Trivial: interning makes structural equality an id comparison.
        if l == r {
            continue;
        }
        let l_is_var = tm.is_var(l);
        let r_is_var = tm.is_var(r);

        // Orient.
        if !l_is_var && r_is_var {
            work.push_front((r, l));
            continue;
        }

        if l_is_var {
            // Occurs check, then eliminate.
            if tm.occurs(l, r) {
                return Err(UnifyFailure::OccursCheck { var: l, term: r });
            }
            let mut single = Substitution::new();
            single.bind(l, r);
            for pair in work.iter_mut() {
                pair.0 = single.apply(tm, pair.0);
                pair.1 = single.apply(tm, pair.1);
            }
            solved.map_images(tm, &single);
            solved.bind(l, r);
            continue;
        }

        // Both sides are non-variables.
        let (lk, rk) = (tm.get(l).kind.clone(), tm.get(r).kind.clone());
        match (lk, rk) {
            (TermKind::App { func: f, args: la }, TermKind::App { func: g, args: ra }) => {
                if f != g {
                    return Err(UnifyFailure::SymbolClash { left: l, right: r });
                }
                let algebra = tm.func(f).algebra;
                if structural || algebra == Algebra::Free {
                    // Arity is fixed per symbol, so the lists line up.
                    for pair in la.iter().copied().zip(ra.iter().copied()) {
                        work.push_back(pair);
                    }
                } else if tm.equal_modulo(l, r) {
                    continue;
                } else {
                    // Tagged roots are theory territory; syntactically this
                    // is a clash.
                    return Err(UnifyFailure::SymbolClash { left: l, right: r });
                }
            }
            _ => return Err(UnifyFailure::SymbolClash { left: l, right: r }),
        }
    }

    Ok(solved)
}

/// One-directional matching: variables of `pattern` bind to subterms of
/// `subject`; subject-side variables never bind. Returns the matcher or
/// `None` (no match).
pub fn matches(tm: &TermManager, pattern: TermId, subject: TermId) -> Option<Substitution> {
    let mut work = vec![(pattern, subject)];
    let mut binding = Substitution::new();
    while let Some((p, s)) = work.pop() {
        match &tm.get(p).kind {
            TermKind::Var { .. } => match binding.get(p) {
                Some(prev) => {
                    if prev != s {
                        return None;
                    }
                }
                None => binding.bind(p, s),
            },
            TermKind::Const { .. } => {
                if p != s {
                    return None;
                }
            }
            TermKind::App { func, args } => {
                let TermKind::App {
                    func: sf,
                    args: sargs,
                } = &tm.get(s).kind
                else {
                    return None;
                };
                if sf != func {
                    return None;
                }
                for pair in args.iter().copied().zip(sargs.iter().copied()) {
                    work.push(pair);
                }
            }
        }
    }
    Some(binding)
}

/// Are two substitutions equal up to variable renaming? Unifies
/// `{σ₁(v) = σ₂(v)}` over the union of the domains structurally and requires
/// the solved form to bind variables only to variables.
pub fn renaming_equivalent(tm: &mut TermManager, a: &Substitution, b: &Substitution) -> bool {
    let dom: FxHashSet<TermId> = a.domain().chain(b.domain()).collect();
    let mut eqs = EquationSet::new();
    for v in dom {
        let l = a.get(v).unwrap_or(v);
        let r = b.get(v).unwrap_or(v);
        eqs.insert(Equation::new(l, r));
    }
    match unify_structural(tm, &eqs) {
        Ok(s) => s.is_renaming(tm),
        Err(_) => false,
    }
}

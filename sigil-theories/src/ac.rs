//! Unification modulo associativity-commutativity.
//!
//! Stickel/Fages reduction: every AC-rooted equation becomes one row of a
//! homogeneous linear Diophantine system with a column per distinct atom
//! (variables and non-AC subterms of the flattened sides). The minimal basis
//! of the system comes from [`sigil_math::basis`]; each admissible selection
//! of basis vectors yields one candidate unifier, which is checked against
//! the original equations and deduplicated modulo variable renaming. AC
//! unification is not unitary, so the result is a *set*, produced under an
//! explicit [`Bound`] and [`Budget`].
//!
//! The syntactic part of each problem runs through a worklist that defers
//! AC-rooted pairs to the Diophantine stage as they appear, including pairs
//! only created by variable elimination. Commutative-only symbols fork the
//! branch over the two argument orders; associative-only symbols decompose
//! equal-length flattened sides positionally. Unequal-length associative
//! equations are reported as truncation rather than unsatisfiability, since
//! positional splitting is incomplete there.

use crate::theory::{Bound, Budget, SolveStatus, UnifyOutcome};
use num_bigint::BigInt;
use num_traits::{One, ToPrimitive, Zero};
use rustc_hash::FxHashSet;
use sigil_core::{
    renaming_equivalent, unify_structural, Algebra, Equation, EquationSet, FuncId, Substitution,
    TermId, TermKind, TermManager,
};
use sigil_math::{basis, subsets};
use std::collections::VecDeque;

/// Unify `eqs` modulo the AC tags carried by the signature.
pub fn unify_ac(
    tm: &mut TermManager,
    eqs: &EquationSet,
    bound: Bound,
    budget: &mut Budget,
) -> UnifyOutcome {
    let orig_vars = eqs.vars(tm);
    let mut solver = AcSolver {
        tm,
        bound,
        budget,
        orig: eqs,
        orig_vars,
        unifiers: Vec::new(),
        truncated: false,
    };
    solver.run();
    UnifyOutcome {
        unifiers: solver.unifiers,
        status: if solver.truncated {
            SolveStatus::Truncated
        } else {
            SolveStatus::Complete
        },
    }
}

/// One branch of the syntactic search: the remaining worklist, the solved
/// substitution so far, and the AC-rooted pairs deferred to the Diophantine
/// stage.
#[derive(Debug, Clone, Default)]
struct BranchState {
    work: VecDeque<(TermId, TermId)>,
    solved: Substitution,
    ac: Vec<(FuncId, TermId, TermId)>,
}

struct AcSolver<'a> {
    tm: &'a mut TermManager,
    bound: Bound,
    budget: &'a mut Budget,
    orig: &'a EquationSet,
    orig_vars: FxHashSet<TermId>,
    unifiers: Vec<Substitution>,
    truncated: bool,
}

impl AcSolver<'_> {
    fn run(&mut self) {
        let mut stack = vec![BranchState {
            work: self.orig.iter().map(|e| (e.lhs, e.rhs)).collect(),
            ..BranchState::default()
        }];
        while let Some(state) = stack.pop() {
            if !self.budget.step() {
                self.truncated = true;
                return;
            }
            let Some(ready) = self.presolve(state, &mut stack) else {
                continue;
            };
            // Group the deferred pairs by root symbol, first-seen order.
            let mut groups: Vec<(FuncId, Vec<(TermId, TermId)>)> = Vec::new();
            for (f, l, r) in &ready.ac {
                match groups.iter_mut().find(|(g, _)| g == f) {
                    Some((_, eqs)) => eqs.push((*l, *r)),
                    None => groups.push((*f, vec![(*l, *r)])),
                }
            }
            if !self.solve_groups(&groups, 0, ready.solved) {
                return;
            }
        }
    }

    /// Run the syntactic worklist of one branch to exhaustion. Returns the
    /// finished state, or `None` when the branch died (clash, occurs check)
    /// or was forked onto the stack (commutative argument orders).
    fn presolve(
        &mut self,
        mut state: BranchState,
        stack: &mut Vec<BranchState>,
    ) -> Option<BranchState> {
        while let Some((l, r)) = state.work.pop_front() {
            if l == r {
                continue;
            }
            let l_is_var = self.tm.is_var(l);
            let r_is_var = self.tm.is_var(r);
            if !l_is_var && r_is_var {
                state.work.push_front((r, l));
                continue;
            }
            if l_is_var {
                if self.tm.occurs(l, r) {
                    return None;
                }
                let mut single = Substitution::new();
                single.bind(l, r);
                for pair in state.work.iter_mut() {
                    pair.0 = single.apply(self.tm, pair.0);
                    pair.1 = single.apply(self.tm, pair.1);
                }
                for (_, al, ar) in state.ac.iter_mut() {
                    *al = single.apply(self.tm, *al);
                    *ar = single.apply(self.tm, *ar);
                }
                state.solved.map_images(self.tm, &single);
                state.solved.bind(l, r);
                continue;
            }

            let (lk, rk) = (self.tm.get(l).kind.clone(), self.tm.get(r).kind.clone());
            let (TermKind::App { func: f, args: la }, TermKind::App { func: g, args: ra }) =
                (lk, rk)
            else {
                return None;
            };
            if f != g {
                return None;
            }
            match self.tm.func(f).algebra {
                Algebra::Free => {
                    for pair in la.iter().copied().zip(ra.iter().copied()) {
                        state.work.push_back(pair);
                    }
                }
                Algebra::AssocComm => state.ac.push((f, l, r)),
                Algebra::Commutative if la.len() == 2 => {
                    let mut swapped = state.clone();
                    swapped.work.push_back((la[0], ra[1]));
                    swapped.work.push_back((la[1], ra[0]));
                    stack.push(swapped);
                    state.work.push_back((la[0], ra[0]));
                    state.work.push_back((la[1], ra[1]));
                    stack.push(state);
                    return None;
                }
                Algebra::Associative => {
                    let fl = self.tm.flatten(f, l);
                    let fr = self.tm.flatten(f, r);
                    if fl.len() == fr.len() {
                        state.work.extend(fl.into_iter().zip(fr));
                    } else {
                        // Positional splitting cannot cover unequal lengths;
                        // dropping the branch is incomplete, not a disproof.
                        self.truncated = true;
                        return None;
                    }
                }
                Algebra::Commutative => {
                    for pair in la.iter().copied().zip(ra.iter().copied()) {
                        state.work.push_back(pair);
                    }
                }
            }
        }
        Some(state)
    }

    fn solve_groups(
        &mut self,
        groups: &[(FuncId, Vec<(TermId, TermId)>)],
        idx: usize,
        sigma: Substitution,
    ) -> bool {
        if idx == groups.len() {
            return self.finalize(sigma);
        }
        let (f, eqs) = &groups[idx];
        let f = *f;

        // Translate the group into a homogeneous system: one row per
        // equation, one column per atom, coefficient = net occurrence count
        // (left minus right) in the flattened sides.
        let mut atoms: Vec<TermId> = Vec::new();
        let mut raw_rows: Vec<Vec<(usize, i64)>> = Vec::new();
        for &(l, r) in eqs {
            let l = sigma.apply(self.tm, l);
            let r = sigma.apply(self.tm, r);
            if self.tm.equal_modulo(l, r) {
                continue;
            }
            let mut row: Vec<(usize, i64)> = Vec::new();
            for (side, sign) in [(l, 1i64), (r, -1i64)] {
                for atom in self.tm.flatten(f, side) {
                    let col = match atoms.iter().position(|&a| a == atom) {
                        Some(c) => c,
                        None => {
                            atoms.push(atom);
                            atoms.len() - 1
                        }
                    };
                    match row.iter_mut().find(|(c, _)| *c == col) {
                        Some((_, n)) => *n += sign,
                        None => row.push((col, sign)),
                    }
                }
            }
            row.retain(|&(_, n)| n != 0);
            if !row.is_empty() {
                raw_rows.push(row);
            }
        }
        if raw_rows.is_empty() {
            return self.solve_groups(groups, idx + 1, sigma);
        }

        let rows: Vec<Vec<BigInt>> = raw_rows
            .iter()
            .map(|row| {
                let mut dense = vec![BigInt::zero(); atoms.len()];
                for &(col, n) in row {
                    dense[col] = BigInt::from(n);
                }
                dense
            })
            .collect();
        let vectors = basis(&rows);
        if vectors.is_empty() {
            // Nonzero rows with no positive solution: this branch is dead.
            return true;
        }
        let Some(masks) = subsets(vectors.len() as u32) else {
            self.truncated = true;
            return true;
        };

        let range = self.tm.func(f).range;
        for mask in masks {
            if !self.budget.step() {
                self.truncated = true;
                return false;
            }
            if !self.admissible(&vectors, &atoms, mask) {
                continue;
            }
            let Some(candidate) = self.candidate_equations(f, range, &vectors, &atoms, mask)
            else {
                continue;
            };
            let Ok(partial) = unify_structural(self.tm, &candidate) else {
                continue;
            };
            let combined = sigma.compose(self.tm, &partial);
            if !self.solve_groups(groups, idx + 1, combined) {
                return false;
            }
        }
        true
    }

    /// A selection is admissible when every variable column receives at
    /// least one basis contribution and every non-variable atom column
    /// receives exactly one (the atom must equal a single fresh variable,
    /// never an AC sum).
    fn admissible(&self, vectors: &[Vec<BigInt>], atoms: &[TermId], mask: u64) -> bool {
        for (col, &atom) in atoms.iter().enumerate() {
            let mut total = BigInt::zero();
            for (i, v) in vectors.iter().enumerate() {
                if mask & (1 << i) != 0 {
                    total += &v[col];
                }
            }
            if self.tm.is_var(atom) {
                if total.is_zero() {
                    return false;
                }
            } else if !total.is_one() {
                return false;
            }
        }
        true
    }

    /// Build the equation set realizing one basis selection: a fresh
    /// variable per selected vector, each variable atom equated with the
    /// AC sum of its column, each non-variable atom equated with its unique
    /// covering fresh variable.
    fn candidate_equations(
        &mut self,
        f: FuncId,
        range: sigil_core::SortId,
        vectors: &[Vec<BigInt>],
        atoms: &[TermId],
        mask: u64,
    ) -> Option<EquationSet> {
        let mut fresh: Vec<Option<TermId>> = vec![None; vectors.len()];
        for i in 0..vectors.len() {
            if mask & (1 << i) != 0 {
                fresh[i] = Some(self.tm.fresh_var(range));
            }
        }

        let mut out = EquationSet::new();
        for (col, &atom) in atoms.iter().enumerate() {
            if self.tm.is_var(atom) {
                let mut summands = Vec::new();
                for (i, v) in vectors.iter().enumerate() {
                    let Some(z) = fresh[i] else { continue };
                    let reps = v[col].to_usize()?;
                    summands.extend(std::iter::repeat(z).take(reps));
                }
                let sum = self.fold_sum(f, &summands)?;
                out.insert(Equation::new(atom, sum));
            } else {
                let i = (0..vectors.len())
                    .find(|&i| fresh[i].is_some() && !vectors[i][col].is_zero())?;
                let z = fresh[i]?;
                out.insert(Equation::new(z, atom));
            }
        }
        Some(out)
    }

    /// Left-fold a non-empty summand list into nested binary applications.
    fn fold_sum(&mut self, f: FuncId, summands: &[TermId]) -> Option<TermId> {
        let (&first, rest) = summands.split_first()?;
        let mut acc = first;
        for &next in rest {
            acc = self.tm.mk_app(f, &[acc, next]).ok()?;
        }
        Some(acc)
    }

    /// Restrict to the original variables, verify against the original
    /// equations under AC equality, deduplicate modulo renaming, and record.
    /// Returns `false` once the result bound is reached.
    fn finalize(&mut self, sigma: Substitution) -> bool {
        let restricted = sigma.restrict(&self.orig_vars);
        let originals: Vec<(TermId, TermId)> = self.orig.iter().map(|e| (e.lhs, e.rhs)).collect();
        for (l, r) in originals {
            let l = restricted.apply(self.tm, l);
            let r = restricted.apply(self.tm, r);
            if !self.tm.equal_modulo(l, r) {
                return true;
            }
        }
        for i in 0..self.unifiers.len() {
            let known = self.unifiers[i].clone();
            if renaming_equivalent(self.tm, &restricted, &known) {
                return true;
            }
        }
        tracing::trace!(unifier = %restricted.display(self.tm), "ac unifier found");
        self.unifiers.push(restricted);
        if self.bound.reached(self.unifiers.len()) {
            if matches!(self.bound, Bound::Limit(_)) {
                self.truncated = true;
            }
            return false;
        }
        true
    }
}

//! The XOR theory: an abelian group of exponent 2 over one AC symbol.
//!
//! Beyond plain AC, XOR cancels: `a ⊕ a = 0` for every term `a`. Two terms
//! are XOR-equal iff their normal forms coincide, where the normal form
//! flattens nested applications, drops the zero constant, cancels summands
//! occurring an even number of times, and orders the survivors canonically.
//!
//! On top of the normal form the module provides resolution ([`resolve`]
//! reduces an XOR goal to syntactic subgoals, [`saturate`] closes a set of
//! terms under resolution to hunt for zero-collisions), XOR unification, and
//! constrained unification where each variable carries a menu of terms it
//! may be assembled from.
//!
//! [`resolve`]: XorTheory::resolve
//! [`saturate`]: XorTheory::saturate

use crate::theory::{Bound, Budget, SolveStatus, UnifyOutcome};
use rustc_hash::{FxHashMap, FxHashSet};
use sigil_core::{
    renaming_equivalent, unify, EquationSet, FuncId, Result, Substitution, TermId, TermKind,
    TermManager,
};
use smallvec::SmallVec;
use std::collections::VecDeque;

/// The two interpreted symbols of the theory: the binary AC sum and its
/// neutral element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XorTheory {
    xor: FuncId,
    zero: TermId,
}

/// Outcome of a bounded saturation run.
#[derive(Debug, Clone)]
pub struct SaturationResult {
    /// Every normal-form term produced, inputs included.
    pub done: Vec<TermId>,
    /// Whether some combination collapsed to the zero term.
    pub zero_found: bool,
    /// Whether the pair budget ran out before closure.
    pub truncated: bool,
}

impl XorTheory {
    /// Wrap existing symbols. `xor` must be a binary AC symbol and `zero`
    /// a constant of a compatible sort.
    pub fn new(xor: FuncId, zero: TermId) -> Self {
        Self { xor, zero }
    }

    /// Declare fresh `xor`/`zero` symbols on the manager's top sort.
    pub fn install(tm: &mut TermManager) -> Self {
        let top = tm.sorts.top;
        let xor = tm.declare_func("xor", 2, sigil_core::Algebra::AssocComm);
        let zero = tm.mk_const("zero", top);
        Self { xor, zero }
    }

    /// The sum symbol.
    pub fn func(&self) -> FuncId {
        self.xor
    }

    /// The neutral element.
    pub fn zero(&self) -> TermId {
        self.zero
    }

    /// XOR normal form: children first, then flatten, drop zeros, cancel
    /// even multiplicities, sort the survivors, and rebuild as a left-nested
    /// binary sum. The empty sum is the zero term.
    pub fn normal_form(&self, tm: &mut TermManager, t: TermId) -> Result<TermId> {
        match tm.get(t).kind.clone() {
            TermKind::Var { .. } | TermKind::Const { .. } => Ok(t),
            TermKind::App { func, args } if func == self.xor => {
                let mut summands = Vec::new();
                for arg in args {
                    let n = self.normal_form(tm, arg)?;
                    // The child is normal, so one flatten level suffices.
                    for s in tm.flatten(self.xor, n) {
                        summands.push(s);
                    }
                }
                self.rebuild(tm, summands)
            }
            TermKind::App { func, args } => {
                let mut normal: SmallVec<[TermId; 4]> = SmallVec::new();
                let mut changed = false;
                for arg in args {
                    let n = self.normal_form(tm, arg)?;
                    changed |= n != arg;
                    normal.push(n);
                }
                if changed {
                    tm.mk_app(func, &normal)
                } else {
                    Ok(t)
                }
            }
        }
    }

    fn rebuild(&self, tm: &mut TermManager, summands: Vec<TermId>) -> Result<TermId> {
        let mut counts: FxHashMap<TermId, usize> = FxHashMap::default();
        for s in summands {
            if s != self.zero {
                *counts.entry(s).or_insert(0) += 1;
            }
        }
        let mut survivors: Vec<TermId> =
            counts.into_iter().filter(|(_, c)| c % 2 == 1).map(|(t, _)| t).collect();
        survivors.sort_unstable();
        match survivors.split_first() {
            None => Ok(self.zero),
            Some((&first, rest)) => {
                let mut acc = first;
                for &next in rest {
                    acc = tm.mk_app(self.xor, &[acc, next])?;
                }
                Ok(acc)
            }
        }
    }

    /// The summands of `t`'s normal form; the zero term has none.
    pub fn summands(&self, tm: &mut TermManager, t: TermId) -> Result<Vec<TermId>> {
        let n = self.normal_form(tm, t)?;
        if n == self.zero {
            return Ok(Vec::new());
        }
        Ok(tm.flatten(self.xor, n))
    }

    /// XOR equality: identical normal forms.
    pub fn equal(&self, tm: &mut TermManager, a: TermId, b: TermId) -> Result<bool> {
        Ok(self.normal_form(tm, a)? == self.normal_form(tm, b)?)
    }

    /// Sum a list of terms and normalize; the empty list sums to zero.
    pub fn sum(&self, tm: &mut TermManager, terms: &[TermId]) -> Result<TermId> {
        self.rebuild(tm, terms.to_vec())
    }

    /// Resolve two XOR sums: for every summand pair (one from each side)
    /// that unifies syntactically, combine the substituted remainders into
    /// one normalized sum. Each result is a consequence of `t1 = t2 = 0`.
    pub fn resolve(&self, tm: &mut TermManager, t1: TermId, t2: TermId) -> Result<Vec<TermId>> {
        let left = self.summands(tm, t1)?;
        let right = self.summands(tm, t2)?;
        let mut out = Vec::new();
        let mut seen = FxHashSet::default();
        for (i, &a) in left.iter().enumerate() {
            for (j, &b) in right.iter().enumerate() {
                let eqs: EquationSet = [(a, b)].into_iter().collect();
                let Ok(sigma) = unify(tm, &eqs) else { continue };
                let mut rest: Vec<TermId> = Vec::new();
                rest.extend(left.iter().enumerate().filter(|&(k, _)| k != i).map(|(_, &t)| t));
                rest.extend(right.iter().enumerate().filter(|&(k, _)| k != j).map(|(_, &t)| t));
                let combined = self.rebuild(tm, rest)?;
                let substituted = sigma.apply(tm, combined);
                let normal = self.normal_form(tm, substituted)?;
                if seen.insert(normal) {
                    out.push(normal);
                }
            }
        }
        Ok(out)
    }

    /// Close `inputs` under resolution: each input is resolved against every
    /// term already retained, new normal forms join the set, then the input
    /// itself does. A zero in the set means some XOR combination of the
    /// inputs collapses, the collision the saturation is hunting for.
    pub fn saturate(
        &self,
        tm: &mut TermManager,
        inputs: &[TermId],
        budget: &mut Budget,
    ) -> Result<SaturationResult> {
        let mut done: Vec<TermId> = Vec::new();
        let mut member: FxHashSet<TermId> = FxHashSet::default();
        let mut zero_found = false;
        let mut truncated = false;

        let mut queue: VecDeque<TermId> = VecDeque::new();
        for &t in inputs {
            queue.push_back(self.normal_form(tm, t)?);
        }

        'outer: while let Some(input) = queue.pop_front() {
            let snapshot = done.clone();
            for d in snapshot {
                if !budget.step() {
                    truncated = true;
                    break 'outer;
                }
                for produced in self.resolve(tm, input, d)? {
                    if member.insert(produced) {
                        if produced == self.zero {
                            zero_found = true;
                        }
                        done.push(produced);
                    }
                }
            }
            if member.insert(input) {
                if input == self.zero {
                    zero_found = true;
                }
                done.push(input);
            }
        }

        tracing::debug!(
            terms = done.len(),
            zero_found,
            truncated,
            "xor saturation finished"
        );
        Ok(SaturationResult {
            done,
            zero_found,
            truncated,
        })
    }

    /// Unify modulo XOR. Each equation `l = r` becomes the goal
    /// `nf(l ⊕ r) = 0`, attacked by either binding a variable summand to the
    /// sum of the rest or cancelling a unifiable pair of summands.
    pub fn unify(
        &self,
        tm: &mut TermManager,
        eqs: &EquationSet,
        bound: Bound,
        budget: &mut Budget,
    ) -> UnifyOutcome {
        match self.search(tm, eqs, bound, budget, None) {
            Ok(outcome) => outcome,
            // Construction failures inside the search mean a branch was not
            // representable; the search cannot claim completeness then.
            Err(_) => UnifyOutcome {
                unifiers: Vec::new(),
                status: SolveStatus::Truncated,
            },
        }
    }

    /// XOR unification filtered by per-variable constraint menus.
    pub fn constrained_unify(
        &self,
        tm: &mut TermManager,
        eqs: &EquationSet,
        constraints: &ConstraintMap,
        bound: Bound,
        budget: &mut Budget,
    ) -> UnifyOutcome {
        match self.search(tm, eqs, bound, budget, Some(constraints)) {
            Ok(outcome) => outcome,
            Err(_) => UnifyOutcome {
                unifiers: Vec::new(),
                status: SolveStatus::Truncated,
            },
        }
    }

    fn search(
        &self,
        tm: &mut TermManager,
        eqs: &EquationSet,
        bound: Bound,
        budget: &mut Budget,
        constraints: Option<&ConstraintMap>,
    ) -> Result<UnifyOutcome> {
        let orig_vars = eqs.vars(tm);
        let originals: Vec<(TermId, TermId)> = eqs.iter().map(|e| (e.lhs, e.rhs)).collect();

        let mut goals: Vec<TermId> = Vec::new();
        for &(l, r) in &originals {
            let s = tm.mk_app(self.xor, &[l, r])?;
            goals.push(self.normal_form(tm, s)?);
        }

        let mut unifiers: Vec<Substitution> = Vec::new();
        let mut truncated = false;
        let mut queue: VecDeque<(Vec<TermId>, Substitution)> = VecDeque::new();
        queue.push_back((goals, Substitution::new()));

        'search: while let Some((goals, sigma)) = queue.pop_front() {
            if !budget.step() {
                truncated = true;
                break;
            }
            // Find the first unsolved goal.
            let Some(pos) = goals.iter().position(|&g| g != self.zero) else {
                // Solved state: verify, filter, dedup, record.
                let restricted = sigma.restrict(&orig_vars);
                let mut sound = true;
                for &(l, r) in &originals {
                    let ls = restricted.apply(tm, l);
                    let rs = restricted.apply(tm, r);
                    if !self.equal(tm, ls, rs)? {
                        sound = false;
                        break;
                    }
                }
                if !sound {
                    continue;
                }
                if let Some(map) = constraints {
                    if !map.permits(tm, self, &restricted)? {
                        continue;
                    }
                }
                let mut duplicate = false;
                for known in unifiers.clone() {
                    if renaming_equivalent(tm, &restricted, &known) {
                        duplicate = true;
                        break;
                    }
                }
                if duplicate {
                    continue;
                }
                unifiers.push(restricted);
                if bound.reached(unifiers.len()) {
                    if matches!(bound, Bound::Limit(_)) {
                        truncated = true;
                    }
                    break 'search;
                }
                continue;
            };

            let goal = goals[pos];
            let summands = self.summands(tm, goal)?;

            // Branch 1: bind a variable summand to the sum of the others.
            for (i, &s) in summands.iter().enumerate() {
                if !tm.is_var(s) {
                    continue;
                }
                let rest: Vec<TermId> = summands
                    .iter()
                    .enumerate()
                    .filter(|&(k, _)| k != i)
                    .map(|(_, &t)| t)
                    .collect();
                let image = self.rebuild(tm, rest)?;
                if tm.occurs(s, image) {
                    continue;
                }
                let mut step = Substitution::new();
                step.bind(s, image);
                self.push_state(tm, &mut queue, &goals, &sigma, &step)?;
            }

            // Branch 2: cancel a unifiable pair of distinct summands.
            for i in 0..summands.len() {
                for j in (i + 1)..summands.len() {
                    let (a, b) = (summands[i], summands[j]);
                    if tm.is_var(a) || tm.is_var(b) {
                        continue;
                    }
                    let pair: EquationSet = [(a, b)].into_iter().collect();
                    let Ok(step) = unify(tm, &pair) else { continue };
                    self.push_state(tm, &mut queue, &goals, &sigma, &step)?;
                }
            }
        }

        Ok(UnifyOutcome {
            unifiers,
            status: if truncated {
                SolveStatus::Truncated
            } else {
                SolveStatus::Complete
            },
        })
    }

    fn push_state(
        &self,
        tm: &mut TermManager,
        queue: &mut VecDeque<(Vec<TermId>, Substitution)>,
        goals: &[TermId],
        sigma: &Substitution,
        step: &Substitution,
    ) -> Result<()> {
        let mut next_goals = Vec::with_capacity(goals.len());
        for &g in goals {
            let applied = step.apply(tm, g);
            next_goals.push(self.normal_form(tm, applied)?);
        }
        let combined = sigma.compose(tm, step);
        queue.push_back((next_goals, combined));
        Ok(())
    }
}

/// Per-variable instantiation menus for constrained unification.
///
/// A constrained variable may only take values expressible as an XOR
/// combination of its menu terms, closed one level under the registered
/// auxiliary unary symbols. Unconstrained variables are unrestricted.
#[derive(Debug, Clone, Default)]
pub struct ConstraintMap {
    menus: FxHashMap<TermId, Vec<TermId>>,
    aux: Vec<FuncId>,
}

impl ConstraintMap {
    /// An empty map: every variable unrestricted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict `var` to XOR combinations over `menu`.
    pub fn constrain(&mut self, var: TermId, menu: Vec<TermId>) {
        self.menus.insert(var, menu);
    }

    /// Allow a unary symbol to be applied to menu entries.
    pub fn allow_aux(&mut self, func: FuncId) {
        self.aux.push(func);
    }

    /// Whether `var` carries a menu.
    pub fn is_constrained(&self, var: TermId) -> bool {
        self.menus.contains_key(&var)
    }

    /// Does the substitution respect every menu? A binding passes when its
    /// image lies in the GF(2) span of the variable's closed menu.
    pub fn permits(
        &self,
        tm: &mut TermManager,
        xor: &XorTheory,
        sigma: &Substitution,
    ) -> Result<bool> {
        for (var, menu) in &self.menus {
            let Some(image) = sigma.get(*var) else { continue };
            let closure = self.closure(tm, xor, menu)?;
            if !expressible(tm, xor, &closure, image)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// The menu plus one application of each auxiliary symbol to each entry,
    /// all in normal form.
    fn closure(
        &self,
        tm: &mut TermManager,
        xor: &XorTheory,
        menu: &[TermId],
    ) -> Result<Vec<TermId>> {
        let mut out = Vec::with_capacity(menu.len() * (1 + self.aux.len()));
        for &m in menu {
            out.push(xor.normal_form(tm, m)?);
        }
        for &f in &self.aux {
            for &m in menu {
                let wrapped = tm.mk_app(f, &[m])?;
                out.push(xor.normal_form(tm, wrapped)?);
            }
        }
        Ok(out)
    }
}

/// Is `image` an XOR combination of `generators`? Decided by Gaussian
/// elimination over GF(2), with one dimension per distinct summand.
fn expressible(
    tm: &mut TermManager,
    xor: &XorTheory,
    generators: &[TermId],
    image: TermId,
) -> Result<bool> {
    let mut dims: Vec<TermId> = Vec::new();
    let dim_of = |atom: TermId, dims: &mut Vec<TermId>| -> usize {
        match dims.iter().position(|&d| d == atom) {
            Some(i) => i,
            None => {
                dims.push(atom);
                dims.len() - 1
            }
        }
    };

    let mut rows: Vec<Gf2Vec> = Vec::new();
    for &g in generators {
        let mut v = Gf2Vec::default();
        for atom in xor.summands(tm, g)? {
            v.flip(dim_of(atom, &mut dims));
        }
        rows.push(v);
    }
    let mut target = Gf2Vec::default();
    for atom in xor.summands(tm, image)? {
        target.flip(dim_of(atom, &mut dims));
    }

    // Row-reduce the generators, then reduce the target against them.
    let mut echelon: Vec<Gf2Vec> = Vec::new();
    for mut row in rows {
        for e in &echelon {
            if let Some(lead) = e.leading_bit() {
                if row.bit(lead) {
                    row.xor_with(e);
                }
            }
        }
        if !row.is_zero() {
            echelon.push(row);
        }
    }
    for e in &echelon {
        if let Some(lead) = e.leading_bit() {
            if target.bit(lead) {
                target.xor_with(e);
            }
        }
    }
    Ok(target.is_zero())
}

/// A growable bit vector over GF(2).
#[derive(Debug, Clone, Default)]
struct Gf2Vec {
    words: Vec<u64>,
}

impl Gf2Vec {
    fn flip(&mut self, bit: usize) {
        let word = bit / 64;
        if self.words.len() <= word {
            self.words.resize(word + 1, 0);
        }
        self.words[word] ^= 1 << (bit % 64);
    }

    fn bit(&self, bit: usize) -> bool {
        self.words
            .get(bit / 64)
            .is_some_and(|w| w & (1 << (bit % 64)) != 0)
    }

    fn xor_with(&mut self, other: &Gf2Vec) {
        if self.words.len() < other.words.len() {
            self.words.resize(other.words.len(), 0);
        }
        for (w, o) in self.words.iter_mut().zip(&other.words) {
            *w ^= o;
        }
    }

    fn leading_bit(&self) -> Option<usize> {
        for (i, w) in self.words.iter().enumerate() {
            if *w != 0 {
                return Some(i * 64 + w.trailing_zeros() as usize);
            }
        }
        None
    }

    fn is_zero(&self) -> bool {
        self.words.iter().all(|w| *w == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigil_core::Algebra;

    fn setup() -> (TermManager, XorTheory) {
        let mut tm = TermManager::new();
        let theory = XorTheory::install(&mut tm);
        (tm, theory)
    }

    #[test]
    fn test_normal_form_cancels_pairs() {
        let (mut tm, xor) = setup();
        let top = tm.sorts.top;
        let a = tm.mk_const("a", top);
        let b = tm.mk_const("b", top);
        let aa = tm.mk_app(xor.func(), &[a, a]).unwrap();
        assert_eq!(xor.normal_form(&mut tm, aa).unwrap(), xor.zero());

        let aab = tm.mk_app(xor.func(), &[aa, b]).unwrap();
        assert_eq!(xor.normal_form(&mut tm, aab).unwrap(), b);
    }

    #[test]
    fn test_normal_form_drops_zero_and_orders() {
        let (mut tm, xor) = setup();
        let top = tm.sorts.top;
        let a = tm.mk_const("a", top);
        let b = tm.mk_const("b", top);
        let za = tm.mk_app(xor.func(), &[xor.zero(), a]).unwrap();
        let l = tm.mk_app(xor.func(), &[za, b]).unwrap();
        let r = tm.mk_app(xor.func(), &[b, a]).unwrap();
        let ln = xor.normal_form(&mut tm, l).unwrap();
        let rn = xor.normal_form(&mut tm, r).unwrap();
        assert_eq!(ln, rn);
    }

    #[test]
    fn test_normal_form_reaches_under_free_symbols() {
        let (mut tm, xor) = setup();
        let top = tm.sorts.top;
        let h = tm.declare_func("h", 1, Algebra::Free);
        let a = tm.mk_const("a", top);
        let aa = tm.mk_app(xor.func(), &[a, a]).unwrap();
        let haa = tm.mk_app(h, &[aa]).unwrap();
        let hz = tm.mk_app(h, &[xor.zero()]).unwrap();
        assert_eq!(xor.normal_form(&mut tm, haa).unwrap(), hz);
    }

    #[test]
    fn test_resolve_combines_remainders() {
        // t1 = a ⊕ b, t2 = a ⊕ c: resolving a against a leaves b ⊕ c.
        let (mut tm, xor) = setup();
        let top = tm.sorts.top;
        let a = tm.mk_const("a", top);
        let b = tm.mk_const("b", top);
        let c = tm.mk_const("c", top);
        let t1 = tm.mk_app(xor.func(), &[a, b]).unwrap();
        let t2 = tm.mk_app(xor.func(), &[a, c]).unwrap();
        let results = xor.resolve(&mut tm, t1, t2).unwrap();
        let bc = xor.sum(&mut tm, &[b, c]).unwrap();
        assert!(results.contains(&bc));
    }

    #[test]
    fn test_saturate_finds_collision() {
        // {a ⊕ b, a ⊕ c, b ⊕ c} XORs to zero.
        let (mut tm, xor) = setup();
        let top = tm.sorts.top;
        let a = tm.mk_const("a", top);
        let b = tm.mk_const("b", top);
        let c = tm.mk_const("c", top);
        let ab = tm.mk_app(xor.func(), &[a, b]).unwrap();
        let ac = tm.mk_app(xor.func(), &[a, c]).unwrap();
        let bc = tm.mk_app(xor.func(), &[b, c]).unwrap();
        let result = xor
            .saturate(&mut tm, &[ab, ac, bc], &mut Budget::unlimited())
            .unwrap();
        assert!(result.zero_found);
        assert!(!result.truncated);
    }

    #[test]
    fn test_saturate_no_collision() {
        let (mut tm, xor) = setup();
        let top = tm.sorts.top;
        let a = tm.mk_const("a", top);
        let b = tm.mk_const("b", top);
        let c = tm.mk_const("c", top);
        let ab = tm.mk_app(xor.func(), &[a, b]).unwrap();
        let result = xor
            .saturate(&mut tm, &[ab, c], &mut Budget::unlimited())
            .unwrap();
        assert!(!result.zero_found);
    }

    #[test]
    fn test_unify_variable_against_sum() {
        // x = a ⊕ b has the single solution x -> a ⊕ b.
        let (mut tm, xor) = setup();
        let top = tm.sorts.top;
        let x = tm.mk_var("x", top);
        let a = tm.mk_const("a", top);
        let b = tm.mk_const("b", top);
        let ab = tm.mk_app(xor.func(), &[a, b]).unwrap();
        let eqs: EquationSet = [(x, ab)].into_iter().collect();

        let out = xor.unify(&mut tm, &eqs, Bound::All, &mut Budget::new(10_000));
        assert!(!out.unifiers.is_empty());
        let expected = xor.normal_form(&mut tm, ab).unwrap();
        assert!(out
            .unifiers
            .iter()
            .any(|u| u.get(x) == Some(expected)));
    }

    #[test]
    fn test_unify_cancellation() {
        // x ⊕ a = a: x must be zero... x ⊕ a ⊕ a normalizes to x, so the
        // goal is x alone and x binds to the empty sum.
        let (mut tm, xor) = setup();
        let top = tm.sorts.top;
        let x = tm.mk_var("x", top);
        let a = tm.mk_const("a", top);
        let xa = tm.mk_app(xor.func(), &[x, a]).unwrap();
        let eqs: EquationSet = [(xa, a)].into_iter().collect();

        let out = xor.unify(&mut tm, &eqs, Bound::All, &mut Budget::new(10_000));
        assert!(out.unifiers.iter().any(|u| u.get(x) == Some(xor.zero())));
    }

    #[test]
    fn test_unify_ground_inequality() {
        let (mut tm, xor) = setup();
        let top = tm.sorts.top;
        let a = tm.mk_const("a", top);
        let b = tm.mk_const("b", top);
        let eqs: EquationSet = [(a, b)].into_iter().collect();

        let out = xor.unify(&mut tm, &eqs, Bound::All, &mut Budget::new(10_000));
        assert!(out.unifiers.is_empty());
        assert_eq!(out.status, SolveStatus::Complete);
    }

    #[test]
    fn test_constraint_menu_filters() {
        // x = a ⊕ b is fine when the menu spans {a, b}, rejected when the
        // menu only holds c.
        let (mut tm, xor) = setup();
        let top = tm.sorts.top;
        let x = tm.mk_var("x", top);
        let a = tm.mk_const("a", top);
        let b = tm.mk_const("b", top);
        let c = tm.mk_const("c", top);
        let ab = tm.mk_app(xor.func(), &[a, b]).unwrap();
        let eqs: EquationSet = [(x, ab)].into_iter().collect();

        let mut permissive = ConstraintMap::new();
        permissive.constrain(x, vec![a, b]);
        let out = xor.constrained_unify(
            &mut tm,
            &eqs,
            &permissive,
            Bound::All,
            &mut Budget::new(10_000),
        );
        assert!(!out.unifiers.is_empty());

        let mut restrictive = ConstraintMap::new();
        restrictive.constrain(x, vec![c]);
        let out = xor.constrained_unify(
            &mut tm,
            &eqs,
            &restrictive,
            Bound::All,
            &mut Budget::new(10_000),
        );
        assert!(out.unifiers.is_empty());
    }

    #[test]
    fn test_constraint_aux_closure() {
        // x = h(a): only expressible once h is registered as an auxiliary.
        let (mut tm, xor) = setup();
        let top = tm.sorts.top;
        let h = tm.declare_func("h", 1, Algebra::Free);
        let x = tm.mk_var("x", top);
        let a = tm.mk_const("a", top);
        let ha = tm.mk_app(h, &[a]).unwrap();
        let eqs: EquationSet = [(x, ha)].into_iter().collect();

        let mut bare = ConstraintMap::new();
        bare.constrain(x, vec![a]);
        let out = xor.constrained_unify(&mut tm, &eqs, &bare, Bound::All, &mut Budget::new(10_000));
        assert!(out.unifiers.is_empty());

        let mut closed = ConstraintMap::new();
        closed.constrain(x, vec![a]);
        closed.allow_aux(h);
        let out =
            xor.constrained_unify(&mut tm, &eqs, &closed, Bound::All, &mut Budget::new(10_000));
        assert!(!out.unifiers.is_empty());
    }

    #[test]
    fn test_gf2_span() {
        let (mut tm, xor) = setup();
        let top = tm.sorts.top;
        let a = tm.mk_const("a", top);
        let b = tm.mk_const("b", top);
        let c = tm.mk_const("c", top);
        let ab = xor.sum(&mut tm, &[a, b]).unwrap();
        let bc = xor.sum(&mut tm, &[b, c]).unwrap();
        let ac = xor.sum(&mut tm, &[a, c]).unwrap();
        // a⊕c = (a⊕b) ⊕ (b⊕c).
        assert!(expressible(&mut tm, &xor, &[ab, bc], ac).unwrap());
        // a alone is not in the span of {a⊕b, b⊕c}.
        assert!(!expressible(&mut tm, &xor, &[ab, bc], a).unwrap());
        // zero always is.
        assert!(expressible(&mut tm, &xor, &[], xor.zero()).unwrap());
    }
}

//! Rewriting, narrowing, and variant enumeration.
//!
//! A [`RewriteSystem`] is an ordered list of oriented rules. Rewriting uses
//! one-directional matching ([`crate::unify::matches`]); narrowing uses full
//! unification against freshly renamed rule variables and is the engine
//! behind [`Variants`], [`is_finite`], and [`narrow_path`].
//!
//! # Examples
//!
//! ```
//! use sigil_core::{Algebra, RewriteRule, RewriteSystem, TermManager};
//!
//! let mut tm = TermManager::new();
//! let top = tm.sorts.top;
//! let f = tm.declare_func("f", 1, Algebra::Free);
//! let x = tm.mk_var("x", top);
//! let fx = tm.mk_app(f, &[x]).unwrap();
//!
//! // f(x) -> x collapses nested applications.
//! let mut sys = RewriteSystem::new();
//! sys.add(RewriteRule::new(&tm, fx, x).unwrap());
//!
//! let a = tm.mk_const("a", top);
//! let fa = tm.mk_app(f, &[a]).unwrap();
//! let ffa = tm.mk_app(f, &[fa]).unwrap();
//! let normal = sys.normalize(&mut tm, ffa, 100).unwrap();
//! assert_eq!(normal, a);
//! ```

use crate::error::{Result, SigilError};
use crate::subst::Substitution;
use crate::term::{Position, TermId, TermManager};
use crate::unify::{matches, unify};
use rustc_hash::FxHashMap;
use rustc_hash::FxHashSet;
use std::collections::VecDeque;

/// An oriented rewrite rule `lhs -> rhs`.
///
/// Every variable of the right-hand side must occur on the left; the
/// constructor rejects rules that would invent bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewriteRule {
    lhs: TermId,
    rhs: TermId,
}

impl RewriteRule {
    /// Build a rule, checking that `vars(rhs) ⊆ vars(lhs)`.
    pub fn new(tm: &TermManager, lhs: TermId, rhs: TermId) -> Result<Self> {
        let lvars = tm.vars(lhs);
        for v in tm.vars(rhs) {
            if !lvars.contains(&v) {
                let var = tm.name_of(v).unwrap_or("?").to_string();
                return Err(SigilError::IllFormedRule { var });
            }
        }
        Ok(Self { lhs, rhs })
    }

    /// Left-hand side.
    pub fn lhs(&self) -> TermId {
        self.lhs
    }

    /// Right-hand side.
    pub fn rhs(&self) -> TermId {
        self.rhs
    }

    /// Apply this rule at one explicit position: match the left-hand side
    /// against the subterm there and splice in the bound right-hand side.
    /// `None` when the rule does not match at that position.
    pub fn apply_at(&self, tm: &mut TermManager, term: TermId, pos: &Position) -> Option<TermId> {
        let sub = tm.subterm_at(term, pos)?;
        let m = matches(tm, self.lhs, sub)?;
        let contracted = m.apply(tm, self.rhs);
        tm.replace_at(term, pos, contracted)
    }

    /// Every position at which this rule fires, paired with the rewritten
    /// term. Empty when the rule matches nowhere.
    pub fn apply_all(&self, tm: &mut TermManager, term: TermId) -> Vec<(Position, TermId)> {
        let mut out = Vec::new();
        for pos in tm.positions(term) {
            if let Some(next) = self.apply_at(tm, term, &pos) {
                out.push((pos, next));
            }
        }
        out
    }
}

/// An ordered collection of rewrite rules.
#[derive(Debug, Clone, Default)]
pub struct RewriteSystem {
    rules: Vec<RewriteRule>,
}

/// One narrowing step out of a term.
#[derive(Debug, Clone)]
pub struct NarrowStep {
    /// Position at which the rule fired.
    pub position: Position,
    /// Unifier restricted to the variables of the narrowed term.
    pub subst: Substitution,
    /// The narrowed term.
    pub result: TermId,
}

/// One edge of a reachability path found by [`narrow_path`].
#[derive(Debug, Clone)]
pub struct PathStep {
    /// Position at which the rule fired.
    pub position: Position,
    /// Index of the rule in its [`RewriteSystem`].
    pub rule: usize,
    /// The term after the step.
    pub term: TermId,
}

/// Outcome of a bounded reachability search.
#[derive(Debug, Clone)]
pub enum PathSearch {
    /// A narrowing sequence from source to target, in order. Empty when the
    /// source already equals the target.
    Found(Vec<PathStep>),
    /// The search space was exhausted without reaching the target.
    NotFound,
    /// The state budget ran out first.
    BoundExceeded,
}

/// Verdict of a bounded variant-finiteness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finiteness {
    /// Variant enumeration reached a fixed point.
    Finite,
    /// The bound was hit while variants were still being produced.
    Indeterminate,
}

impl RewriteSystem {
    /// Empty system.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule. Rule order is application order.
    pub fn add(&mut self, rule: RewriteRule) {
        self.rules.push(rule);
    }

    /// The rules, in application order.
    pub fn rules(&self) -> &[RewriteRule] {
        &self.rules
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the system has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Perform one rewrite step: the first rule (in rule order) that matches
    /// at the leftmost-outermost position fires. Returns `None` when no rule
    /// matches anywhere.
    pub fn apply_at(&self, tm: &mut TermManager, term: TermId) -> Option<TermId> {
        // positions() is preorder, so the first hit is leftmost-outermost.
        for pos in tm.positions(term) {
            for rule in &self.rules {
                if let Some(next) = rule.apply_at(tm, term, &pos) {
                    return Some(next);
                }
            }
        }
        None
    }

    /// Every distinct one-step successor of `term`, over all positions and
    /// rules.
    pub fn apply_all(&self, tm: &mut TermManager, term: TermId) -> Vec<TermId> {
        let mut out = Vec::new();
        let mut seen = FxHashSet::default();
        for rule in &self.rules {
            for (_, next) in rule.apply_all(tm, term) {
                if seen.insert(next) {
                    out.push(next);
                }
            }
        }
        out
    }

    /// Rewrite to normal form with a step budget. Detects the fixed point
    /// either when no rule fires or when a step reproduces the current term.
    pub fn normalize(&self, tm: &mut TermManager, term: TermId, max_steps: u64) -> Result<TermId> {
        let mut current = term;
        for _ in 0..max_steps {
            match self.apply_at(tm, current) {
                Some(next) if next != current => current = next,
                _ => return Ok(current),
            }
        }
        // One more probe: budget spent but maybe already normal.
        match self.apply_at(tm, current) {
            Some(next) if next != current => Err(SigilError::BoundExceeded { limit: max_steps }),
            _ => Ok(current),
        }
    }

    /// All one-step narrowings of `term`: for each non-variable position and
    /// each rule, unify the subterm with a freshly renamed copy of the rule's
    /// left-hand side. The reported substitution is restricted to the
    /// variables of `term`.
    pub fn narrow(&self, tm: &mut TermManager, term: TermId) -> Vec<NarrowStep> {
        let term_vars = tm.vars(term);
        let mut out = Vec::new();
        for pos in tm.positions(term) {
            let sub = match tm.subterm_at(term, &pos) {
                Some(s) => s,
                None => continue,
            };
            if tm.is_var(sub) {
                continue;
            }
            for rule in &self.rules {
                let renaming = fresh_renaming(tm, rule.lhs);
                let lhs = renaming.apply(tm, rule.lhs);
                let rhs = renaming.apply(tm, rule.rhs);
                let eqs = [(sub, lhs)].into_iter().collect();
                if let Ok(sigma) = unify(tm, &eqs) {
                    if let Some(replaced) = tm.replace_at(term, &pos, rhs) {
                        let result = sigma.apply(tm, replaced);
                        out.push(NarrowStep {
                            position: pos.clone(),
                            subst: sigma.restrict(&term_vars),
                            result,
                        });
                    }
                }
            }
        }
        out
    }

    /// Lazily enumerate the variants of `term`: every term reachable by one
    /// or more narrowing steps, deduplicated modulo variable renaming. The
    /// term itself is never emitted.
    pub fn variants<'a>(&'a self, tm: &'a mut TermManager, term: TermId) -> Variants<'a> {
        let mut seen = FxHashSet::default();
        let canon = tm.canonicalize(term);
        seen.insert(canon);
        let mut frontier = VecDeque::new();
        frontier.push_back(term);
        Variants {
            tm,
            system: self,
            frontier,
            ready: VecDeque::new(),
            seen,
        }
    }

    /// Does `term` have finitely many variants? `bound` caps how many
    /// variants are enumerated before giving up; a negative bound removes
    /// the cap (the check then terminates only if the variant set is
    /// actually finite).
    pub fn is_finite(&self, tm: &mut TermManager, term: TermId, bound: i64) -> Finiteness {
        let mut produced: i64 = 0;
        for _ in self.variants(tm, term) {
            produced += 1;
            if bound >= 0 && produced > bound {
                return Finiteness::Indeterminate;
            }
        }
        Finiteness::Finite
    }

    /// Breadth-first reachability: is there a narrowing sequence from
    /// `source` to `target`? States are deduplicated modulo renaming; the
    /// target is recognized by term identity. `bound` caps the number of
    /// states explored.
    pub fn narrow_path(
        &self,
        tm: &mut TermManager,
        source: TermId,
        target: TermId,
        bound: u64,
    ) -> PathSearch {
        if source == target {
            return PathSearch::Found(Vec::new());
        }
        // canonical id -> (parent canonical id, edge taken)
        let mut parent: FxHashMap<TermId, (TermId, PathStep)> = FxHashMap::default();
        let source_canon = tm.canonicalize(source);
        let mut queue = VecDeque::new();
        queue.push_back((source, source_canon));
        let mut explored: u64 = 0;

        while let Some((state, state_canon)) = queue.pop_front() {
            if explored >= bound {
                tracing::debug!(explored, "reachability search hit its state budget");
                return PathSearch::BoundExceeded;
            }
            explored += 1;

            let term_positions = tm.positions(state);
            for pos in term_positions {
                let sub = match tm.subterm_at(state, &pos) {
                    Some(s) => s,
                    None => continue,
                };
                if tm.is_var(sub) {
                    continue;
                }
                for (idx, rule) in self.rules.iter().enumerate() {
                    let renaming = fresh_renaming(tm, rule.lhs);
                    let lhs = renaming.apply(tm, rule.lhs);
                    let rhs = renaming.apply(tm, rule.rhs);
                    let eqs = [(sub, lhs)].into_iter().collect();
                    let sigma = match unify(tm, &eqs) {
                        Ok(s) => s,
                        Err(_) => continue,
                    };
                    let replaced = match tm.replace_at(state, &pos, rhs) {
                        Some(t) => t,
                        None => continue,
                    };
                    let next = sigma.apply(tm, replaced);
                    let next_canon = tm.canonicalize(next);
                    if next_canon == source_canon || parent.contains_key(&next_canon) {
                        continue;
                    }
                    let step = PathStep {
                        position: pos.clone(),
                        rule: idx,
                        term: next,
                    };
                    parent.insert(next_canon, (state_canon, step));
                    if next == target {
                        return PathSearch::Found(rebuild_path(
                            &parent,
                            source_canon,
                            next_canon,
                        ));
                    }
                    queue.push_back((next, next_canon));
                }
            }
        }
        PathSearch::NotFound
    }
}

/// Map every variable of `t` to a fresh variable of the same sort.
fn fresh_renaming(tm: &mut TermManager, t: TermId) -> Substitution {
    let mut renaming = Substitution::new();
    for v in tm.vars(t) {
        let sort = tm.get(v).sort;
        let fresh = tm.fresh_var(sort);
        renaming.bind(v, fresh);
    }
    renaming
}

fn rebuild_path(
    parent: &FxHashMap<TermId, (TermId, PathStep)>,
    source_canon: TermId,
    mut at: TermId,
) -> Vec<PathStep> {
    let mut steps = Vec::new();
    while at != source_canon {
        let (prev, step) = &parent[&at];
        steps.push(step.clone());
        at = *prev;
    }
    steps.reverse();
    steps
}

/// Lazy breadth-first variant enumeration, deduplicated modulo renaming.
/// Produced by [`RewriteSystem::variants`].
pub struct Variants<'a> {
    tm: &'a mut TermManager,
    system: &'a RewriteSystem,
    frontier: VecDeque<TermId>,
    ready: VecDeque<TermId>,
    seen: FxHashSet<TermId>,
}

impl Iterator for Variants<'_> {
    type Item = TermId;

    fn next(&mut self) -> Option<TermId> {
        loop {
            if let Some(v) = self.ready.pop_front() {
                return Some(v);
            }
            let state = self.frontier.pop_front()?;
            for step in self.system.narrow(self.tm, state) {
                let canon = self.tm.canonicalize(step.result);
                if self.seen.insert(canon) {
                    self.ready.push_back(step.result);
                    self.frontier.push_back(step.result);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::Algebra;
    use crate::term::TermKind;

    // dec(enc(x, y), y) -> x with a pairing constructor around it.
    fn crypto_system(tm: &mut TermManager) -> RewriteSystem {
        let top = tm.sorts.top;
        let enc = tm.declare_func("enc", 2, Algebra::Free);
        let dec = tm.declare_func("dec", 2, Algebra::Free);
        let x = tm.mk_var("x", top);
        let y = tm.mk_var("y", top);
        let e = tm.mk_app(enc, &[x, y]).unwrap();
        let d = tm.mk_app(dec, &[e, y]).unwrap();
        let mut sys = RewriteSystem::new();
        sys.add(RewriteRule::new(tm, d, x).unwrap());
        sys
    }

    #[test]
    fn test_rule_rejects_invented_variables() {
        let mut tm = TermManager::new();
        let top = tm.sorts.top;
        let x = tm.mk_var("x", top);
        let y = tm.mk_var("y", top);
        assert!(matches!(
            RewriteRule::new(&tm, x, y),
            Err(SigilError::IllFormedRule { .. })
        ));
        assert!(RewriteRule::new(&tm, y, y).is_ok());
    }

    #[test]
    fn test_apply_at_leftmost_outermost() {
        let mut tm = TermManager::new();
        let sys = crypto_system(&mut tm);
        let top = tm.sorts.top;
        let enc = tm.lookup_func("enc").unwrap();
        let dec = tm.lookup_func("dec").unwrap();
        let m = tm.mk_const("m", top);
        let k = tm.mk_const("k", top);
        let em = tm.mk_app(enc, &[m, k]).unwrap();
        let dm = tm.mk_app(dec, &[em, k]).unwrap();
        assert_eq!(sys.apply_at(&mut tm, dm), Some(m));
        // Already a redex at the root: inner redexes untouched this step.
        let outer = tm.mk_app(enc, &[dm, k]).unwrap();
        let douter = tm.mk_app(dec, &[outer, k]).unwrap();
        assert_eq!(sys.apply_at(&mut tm, douter), Some(dm));
    }

    #[test]
    fn test_rule_apply_at_explicit_position() {
        let mut tm = TermManager::new();
        let sys = crypto_system(&mut tm);
        let rule = sys.rules()[0];
        let top = tm.sorts.top;
        let enc = tm.lookup_func("enc").unwrap();
        let dec = tm.lookup_func("dec").unwrap();
        let m = tm.mk_const("m", top);
        let k = tm.mk_const("k", top);
        let em = tm.mk_app(enc, &[m, k]).unwrap();
        let dm = tm.mk_app(dec, &[em, k]).unwrap();
        // enc(dec(enc(m,k),k), k): the redex sits at argument 0, and only
        // that subterm changes.
        let outer = tm.mk_app(enc, &[dm, k]).unwrap();
        let at_root: Position = Position::new();
        assert_eq!(rule.apply_at(&mut tm, outer, &at_root), None);
        let at_first: Position = [0u32].into_iter().collect();
        let expected = tm.mk_app(enc, &[m, k]).unwrap();
        assert_eq!(rule.apply_at(&mut tm, outer, &at_first), Some(expected));

        let fired = rule.apply_all(&mut tm, outer);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].0, at_first);
    }

    #[test]
    fn test_apply_at_no_redex() {
        let mut tm = TermManager::new();
        let sys = crypto_system(&mut tm);
        let top = tm.sorts.top;
        let enc = tm.lookup_func("enc").unwrap();
        let m = tm.mk_const("m", top);
        let k = tm.mk_const("k", top);
        let em = tm.mk_app(enc, &[m, k]).unwrap();
        assert_eq!(sys.apply_at(&mut tm, em), None);
    }

    #[test]
    fn test_apply_all_collects_every_redex() {
        let mut tm = TermManager::new();
        let sys = crypto_system(&mut tm);
        let top = tm.sorts.top;
        let enc = tm.lookup_func("enc").unwrap();
        let dec = tm.lookup_func("dec").unwrap();
        let m = tm.mk_const("m", top);
        let k = tm.mk_const("k", top);
        let em = tm.mk_app(enc, &[m, k]).unwrap();
        let dm = tm.mk_app(dec, &[em, k]).unwrap();
        // enc(dec(enc(m,k),k), dec(enc(m,k),k)): two distinct positions,
        // both contracting to m, but via different intermediate terms.
        let pair = tm.mk_app(enc, &[dm, dm]).unwrap();
        let succs = sys.apply_all(&mut tm, pair);
        let left = tm.mk_app(enc, &[m, dm]).unwrap();
        let right = tm.mk_app(enc, &[dm, m]).unwrap();
        assert_eq!(succs.len(), 2);
        assert!(succs.contains(&left));
        assert!(succs.contains(&right));
    }

    #[test]
    fn test_normalize_reaches_fixed_point() {
        let mut tm = TermManager::new();
        let sys = crypto_system(&mut tm);
        let top = tm.sorts.top;
        let enc = tm.lookup_func("enc").unwrap();
        let dec = tm.lookup_func("dec").unwrap();
        let m = tm.mk_const("m", top);
        let k = tm.mk_const("k", top);
        let mut t = m;
        for _ in 0..4 {
            let e = tm.mk_app(enc, &[t, k]).unwrap();
            t = tm.mk_app(dec, &[e, k]).unwrap();
        }
        assert_eq!(sys.normalize(&mut tm, t, 100).unwrap(), m);
    }

    #[test]
    fn test_normalize_bound_exceeded() {
        let mut tm = TermManager::new();
        let top = tm.sorts.top;
        let f = tm.declare_func("f", 1, Algebra::Free);
        let g = tm.declare_func("g", 1, Algebra::Free);
        let x = tm.mk_var("x", top);
        let fx = tm.mk_app(f, &[x]).unwrap();
        let gx = tm.mk_app(g, &[x]).unwrap();
        let mut sys = RewriteSystem::new();
        // f(x) -> g(x), g(x) -> f(x): a two-cycle that never terminates.
        sys.add(RewriteRule::new(&tm, fx, gx).unwrap());
        sys.add(RewriteRule::new(&tm, gx, fx).unwrap());
        let a = tm.mk_const("a", top);
        let fa = tm.mk_app(f, &[a]).unwrap();
        assert!(matches!(
            sys.normalize(&mut tm, fa, 10),
            Err(SigilError::BoundExceeded { limit: 10 })
        ));
    }

    #[test]
    fn test_narrow_instantiates_variables() {
        let mut tm = TermManager::new();
        let sys = crypto_system(&mut tm);
        let top = tm.sorts.top;
        let dec = tm.lookup_func("dec").unwrap();
        let w = tm.mk_var("w", top);
        let k = tm.mk_const("k", top);
        // dec(w, k) narrows at the root: w must become enc(z, k).
        let t = tm.mk_app(dec, &[w, k]).unwrap();
        let steps = sys.narrow(&mut tm, t);
        assert_eq!(steps.len(), 1);
        let step = &steps[0];
        assert!(step.position.is_empty());
        let bound = step.subst.get(w).expect("w must be instantiated");
        let enc = tm.lookup_func("enc").unwrap();
        match &tm.get(bound).kind {
            TermKind::App { func, args } => {
                assert_eq!(*func, enc);
                assert_eq!(args[1], k);
                assert_eq!(args[0], step.result);
            }
            other => panic!("expected enc application, got {other:?}"),
        }
    }

    #[test]
    fn test_narrow_skips_variable_positions() {
        let mut tm = TermManager::new();
        let sys = crypto_system(&mut tm);
        let top = tm.sorts.top;
        let w = tm.mk_var("w", top);
        assert!(sys.narrow(&mut tm, w).is_empty());
    }

    #[test]
    fn test_variants_dedup_and_exclude_start() {
        let mut tm = TermManager::new();
        let sys = crypto_system(&mut tm);
        let top = tm.sorts.top;
        let enc = tm.lookup_func("enc").unwrap();
        let dec = tm.lookup_func("dec").unwrap();
        let m = tm.mk_const("m", top);
        let k = tm.mk_const("k", top);
        let em = tm.mk_app(enc, &[m, k]).unwrap();
        let dm = tm.mk_app(dec, &[em, k]).unwrap();
        // dec(enc(m,k),k) has exactly one variant: m.
        let vs: Vec<TermId> = sys.variants(&mut tm, dm).collect();
        assert_eq!(vs, vec![m]);
    }

    #[test]
    fn test_is_finite() {
        let mut tm = TermManager::new();
        let sys = crypto_system(&mut tm);
        let top = tm.sorts.top;
        let enc = tm.lookup_func("enc").unwrap();
        let dec = tm.lookup_func("dec").unwrap();
        let m = tm.mk_const("m", top);
        let k = tm.mk_const("k", top);
        let em = tm.mk_app(enc, &[m, k]).unwrap();
        let dm = tm.mk_app(dec, &[em, k]).unwrap();
        assert_eq!(sys.is_finite(&mut tm, dm, 100), Finiteness::Finite);

        // f(x) -> f(f(x)) grows forever.
        let f = tm.declare_func("f", 1, Algebra::Free);
        let x = tm.mk_var("x", top);
        let fx = tm.mk_app(f, &[x]).unwrap();
        let ffx = tm.mk_app(f, &[fx]).unwrap();
        let mut grower = RewriteSystem::new();
        grower.add(RewriteRule::new(&tm, fx, ffx).unwrap());
        let a = tm.mk_const("a", top);
        let fa = tm.mk_app(f, &[a]).unwrap();
        assert_eq!(
            grower.is_finite(&mut tm, fa, 20),
            Finiteness::Indeterminate
        );
    }

    #[test]
    fn test_narrow_path_found() {
        let mut tm = TermManager::new();
        let sys = crypto_system(&mut tm);
        let top = tm.sorts.top;
        let enc = tm.lookup_func("enc").unwrap();
        let dec = tm.lookup_func("dec").unwrap();
        let m = tm.mk_const("m", top);
        let k = tm.mk_const("k", top);
        let em = tm.mk_app(enc, &[m, k]).unwrap();
        let dm = tm.mk_app(dec, &[em, k]).unwrap();
        let e2 = tm.mk_app(enc, &[dm, k]).unwrap();
        let d2 = tm.mk_app(dec, &[e2, k]).unwrap();
        match sys.narrow_path(&mut tm, d2, m, 1000) {
            PathSearch::Found(steps) => {
                assert!(!steps.is_empty());
                assert_eq!(steps.last().unwrap().term, m);
                for step in &steps {
                    assert_eq!(step.rule, 0);
                }
            }
            other => panic!("expected Found, got {other:?}"),
        }
    }

    #[test]
    fn test_narrow_path_trivial_and_not_found() {
        let mut tm = TermManager::new();
        let sys = crypto_system(&mut tm);
        let top = tm.sorts.top;
        let m = tm.mk_const("m", top);
        let n = tm.mk_const("n", top);
        match sys.narrow_path(&mut tm, m, m, 10) {
            PathSearch::Found(steps) => assert!(steps.is_empty()),
            other => panic!("expected empty path, got {other:?}"),
        }
        assert!(matches!(
            sys.narrow_path(&mut tm, m, n, 10),
            PathSearch::NotFound
        ));
    }
}

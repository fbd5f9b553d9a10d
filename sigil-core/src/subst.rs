//! Substitutions: finite variable-to-term mappings.
//!
//! Application rebuilds terms with structural sharing: subterms untouched by
//! the substitution keep their interned id (the same strategy as a
//! hash-consed rewriter's substitution pass). Composition follows the
//! apply-left-then-right convention: `compose(σ, τ)` applied to a term equals
//! applying σ and then τ to the result.

use crate::equation::Equation;
use crate::term::{TermId, TermKind, TermManager};
use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use std::collections::BTreeMap;
use std::fmt;

/// A finite mapping from variables to terms; each variable bound at most
/// once. Built incrementally during unification, pure value afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitution {
    bindings: BTreeMap<TermId, TermId>,
}

impl Substitution {
    /// The empty (identity) substitution.
    pub fn new() -> Self {
        Substitution::default()
    }

    /// Number of bound variables.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether this is the identity substitution.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// The image of `var`, if bound.
    pub fn get(&self, var: TermId) -> Option<TermId> {
        self.bindings.get(&var).copied()
    }

    /// Whether `var` is in the domain.
    pub fn contains(&self, var: TermId) -> bool {
        self.bindings.contains_key(&var)
    }

    /// Bind `var` to `term`, replacing any previous binding of `var`.
    pub fn bind(&mut self, var: TermId, term: TermId) {
        self.bindings.insert(var, term);
    }

    /// Iterate over `(variable, image)` pairs in variable order.
    pub fn iter(&self) -> impl Iterator<Item = (TermId, TermId)> + '_ {
        self.bindings.iter().map(|(&v, &t)| (v, t))
    }

    /// Iterate over the domain in variable order.
    pub fn domain(&self) -> impl Iterator<Item = TermId> + '_ {
        self.bindings.keys().copied()
    }

    /// Apply to a term, producing a new term; unmapped variables, constants
    /// and function symbols are preserved, untouched subterms are shared.
    pub fn apply(&self, tm: &mut TermManager, t: TermId) -> TermId {
        if self.bindings.is_empty() {
            return t;
        }
        self.apply_rec(tm, t)
    }

    fn apply_rec(&self, tm: &mut TermManager, t: TermId) -> TermId {
        let kind = tm.get(t).kind.clone();
        match kind {
            TermKind::Var { .. } => self.bindings.get(&t).copied().unwrap_or(t),
            TermKind::Const { .. } => t,
            TermKind::App { func, args } => {
                let mut changed = false;
                let mut new_args: SmallVec<[TermId; 4]> = SmallVec::with_capacity(args.len());
                for &a in &args {
                    let na = self.apply_rec(tm, a);
                    changed |= na != a;
                    new_args.push(na);
                }
                if changed {
                    tm.mk_app_unchecked(func, new_args)
                } else {
                    t
                }
            }
        }
    }

    /// Apply to both sides of an equation.
    pub fn apply_equation(&self, tm: &mut TermManager, eq: Equation) -> Equation {
        Equation::new(self.apply(tm, eq.lhs), self.apply(tm, eq.rhs))
    }

    /// Composition `σ∘τ` (this = σ): maps every `v` of σ to `τ(σ(v))`, then
    /// adds τ's bindings for variables not already covered.
    pub fn compose(&self, tm: &mut TermManager, other: &Substitution) -> Substitution {
        let mut out = Substitution::new();
        for (v, t) in self.iter() {
            out.bind(v, other.apply(tm, t));
        }
        for (v, t) in other.iter() {
            if !out.contains(v) {
                out.bind(v, t);
            }
        }
        out
    }

    /// Rewrite every image through `other`, in place, leaving the domain
    /// untouched. Worklist unifiers use this when an elimination step must
    /// propagate a new binding into an already-solved set.
    pub fn map_images(&mut self, tm: &mut TermManager, other: &Substitution) {
        let keys: Vec<TermId> = self.bindings.keys().copied().collect();
        for v in keys {
            let t = self.bindings[&v];
            let nt = other.apply(tm, t);
            self.bindings.insert(v, nt);
        }
    }

    /// Keep only bindings of the given variables.
    pub fn restrict(&self, vars: &FxHashSet<TermId>) -> Substitution {
        Substitution {
            bindings: self
                .bindings
                .iter()
                .filter(|(v, _)| vars.contains(v))
                .map(|(&v, &t)| (v, t))
                .collect(),
        }
    }

    /// Whether the substitution is a variable renaming: every image is a
    /// variable and no two images coincide. The injectivity half matters as
    /// much as the variable half, since a map that identifies two variables
    /// is a proper instantiation rather than a renaming.
    pub fn is_renaming(&self, tm: &TermManager) -> bool {
        let mut images = FxHashSet::default();
        self.bindings.values().all(|&t| tm.is_var(t) && images.insert(t))
    }

    /// Displayable `{x -> t, ...}` view.
    pub fn display<'a>(&'a self, tm: &'a TermManager) -> SubstDisplay<'a> {
        SubstDisplay { subst: self, tm }
    }
}

/// `Display` adapter returned by [`Substitution::display`].
pub struct SubstDisplay<'a> {
    subst: &'a Substitution,
    tm: &'a TermManager,
}

impl fmt::Display for SubstDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (v, t)) in self.subst.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} -> {}", self.tm.display(v), self.tm.display(t))?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::Algebra;

    #[test]
    fn test_apply_preserves_unmapped() {
        let mut tm = TermManager::new();
        let top = tm.sorts.top;
        let f = tm.declare_func("f", 2, Algebra::Free);
        let x = tm.mk_var("x", top);
        let y = tm.mk_var("y", top);
        let a = tm.mk_const("a", top);
        let t = tm.mk_app(f, &[x, y]).unwrap();

        let mut s = Substitution::new();
        s.bind(x, a);
        let out = s.apply(&mut tm, t);
        let expected = tm.mk_app(f, &[a, y]).unwrap();
        assert_eq!(out, expected);
    }

    #[test]
    fn test_apply_shares_untouched_subterms() {
        let mut tm = TermManager::new();
        let top = tm.sorts.top;
        let f = tm.declare_func("f", 2, Algebra::Free);
        let g = tm.declare_func("g", 1, Algebra::Free);
        let x = tm.mk_var("x", top);
        let y = tm.mk_var("y", top);
        let gy = tm.mk_app(g, &[y]).unwrap();
        let t = tm.mk_app(f, &[x, gy]).unwrap();

        let a = tm.mk_const("a", top);
        let mut s = Substitution::new();
        s.bind(x, a);
        let out = s.apply(&mut tm, t);
        match &tm.get(out).kind {
            TermKind::App { args, .. } => assert!(args.contains(&gy)),
            _ => panic!("expected application"),
        }
    }

    #[test]
    fn test_compose_apply_order() {
        // compose(σ, τ) applied = apply σ, then τ.
        let mut tm = TermManager::new();
        let top = tm.sorts.top;
        let g = tm.declare_func("g", 1, Algebra::Free);
        let x = tm.mk_var("x", top);
        let y = tm.mk_var("y", top);
        let a = tm.mk_const("a", top);

        let gy = tm.mk_app(g, &[y]).unwrap();
        let mut sigma = Substitution::new();
        sigma.bind(x, gy);
        let mut tau = Substitution::new();
        tau.bind(y, a);

        let composed = sigma.compose(&mut tm, &tau);
        let ga = tm.mk_app(g, &[a]).unwrap();
        assert_eq!(composed.get(x), Some(ga));
        assert_eq!(composed.get(y), Some(a));

        let direct = {
            let after_sigma = sigma.apply(&mut tm, x);
            tau.apply(&mut tm, after_sigma)
        };
        assert_eq!(composed.apply(&mut tm, x), direct);
    }

    #[test]
    fn test_idempotent_composition() {
        // With domain and range variables disjoint, compose(σ, σ) acts as σ.
        let mut tm = TermManager::new();
        let top = tm.sorts.top;
        let g = tm.declare_func("g", 1, Algebra::Free);
        let x = tm.mk_var("x", top);
        let y = tm.mk_var("y", top);
        let gy = tm.mk_app(g, &[y]).unwrap();
        let mut s = Substitution::new();
        s.bind(x, gy);

        let twice = s.compose(&mut tm, &s);
        assert_eq!(twice, s);
    }

    #[test]
    fn test_renaming_requires_distinct_variable_images() {
        let mut tm = TermManager::new();
        let top = tm.sorts.top;
        let x = tm.mk_var("x", top);
        let y = tm.mk_var("y", top);
        let w = tm.mk_var("w", top);
        let z = tm.mk_var("z", top);

        let mut bijective = Substitution::new();
        bijective.bind(x, w);
        bijective.bind(y, z);
        assert!(bijective.is_renaming(&tm));

        // Sending two variables to the same image instantiates, so this
        // is not a renaming.
        let mut collapse = Substitution::new();
        collapse.bind(x, w);
        collapse.bind(y, w);
        assert!(!collapse.is_renaming(&tm));

        let a = tm.mk_const("a", top);
        let mut ground = Substitution::new();
        ground.bind(x, a);
        assert!(!ground.is_renaming(&tm));
    }
}

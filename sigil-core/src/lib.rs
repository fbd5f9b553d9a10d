//! Core term algebra for the Sigil symbolic reasoning engine.
//!
//! This crate provides the hash-consed term representation shared by every
//! other Sigil crate: sorted variables, constants, and function applications
//! with equational algebra tags (free, associative, commutative, AC), plus
//! substitutions, syntactic unification, one-directional matching, and a
//! rewrite/narrowing engine with variant enumeration.
//!
//! Terms live in a [`TermManager`]; structurally equal terms always share a
//! [`TermId`], so equality is an integer comparison and sets of terms are
//! cheap.
//!
//! # Examples
//!
//! Build terms and unify them:
//!
//! ```
//! use sigil_core::{Algebra, EquationSet, TermManager, unify};
//!
//! let mut tm = TermManager::new();
//! let top = tm.sorts.top;
//! let f = tm.declare_func("f", 2, Algebra::Free);
//! let x = tm.mk_var("x", top);
//! let y = tm.mk_var("y", top);
//! let a = tm.mk_const("a", top);
//! let b = tm.mk_const("b", top);
//!
//! let lhs = tm.mk_app(f, &[x, y]).unwrap();
//! let rhs = tm.mk_app(f, &[a, b]).unwrap();
//! let eqs: EquationSet = [(lhs, rhs)].into_iter().collect();
//!
//! let mgu = unify(&mut tm, &eqs).unwrap();
//! assert_eq!(mgu.get(x), Some(a));
//! assert_eq!(mgu.get(y), Some(b));
//! ```
//!
//! Rewrite with an oriented rule:
//!
//! ```
//! use sigil_core::{Algebra, RewriteRule, RewriteSystem, TermManager};
//!
//! let mut tm = TermManager::new();
//! let top = tm.sorts.top;
//! let dec = tm.declare_func("dec", 2, Algebra::Free);
//! let enc = tm.declare_func("enc", 2, Algebra::Free);
//! let x = tm.mk_var("x", top);
//! let k = tm.mk_var("k", top);
//! let e = tm.mk_app(enc, &[x, k]).unwrap();
//! let d = tm.mk_app(dec, &[e, k]).unwrap();
//!
//! let mut sys = RewriteSystem::new();
//! sys.add(RewriteRule::new(&tm, d, x).unwrap());
//!
//! let m = tm.mk_const("m", top);
//! let key = tm.mk_const("key", top);
//! let ct = tm.mk_app(enc, &[m, key]).unwrap();
//! let pt = tm.mk_app(dec, &[ct, key]).unwrap();
//! assert_eq!(sys.normalize(&mut tm, pt, 10).unwrap(), m);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod equation;
pub mod error;
pub mod rewrite;
pub mod signature;
pub mod sort;
pub mod subst;
pub mod term;
pub mod unify;

pub use equation::{Equation, EquationSet};
pub use error::{Result, SigilError};
pub use rewrite::{
    Finiteness, NarrowStep, PathSearch, PathStep, RewriteRule, RewriteSystem, Variants,
};
pub use signature::{Algebra, FuncDecl, FuncId, Signature};
pub use sort::{Sort, SortId, SortStore};
pub use subst::Substitution;
pub use term::{Position, Term, TermId, TermKind, TermManager};
pub use unify::{matches, renaming_equivalent, unify, unify_structural, UnifyFailure};

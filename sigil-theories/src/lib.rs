//! Equational unification theories for the Sigil engine.
//!
//! [`sigil_core`] decides syntactic unification; this crate layers the
//! combinatorial theories on top: associative-commutative unification via
//! Diophantine basis enumeration, and XOR (abelian group of exponent 2)
//! unification with resolution, saturation, and per-variable constraint
//! menus. The theory is always an explicit argument — callers pass a
//! [`Theory`] value into [`unify`] rather than registering algorithms
//! globally.
//!
//! Both theory solvers return *sets* of unifiers under an explicit result
//! [`Bound`] and step [`Budget`], and keep `Unsatisfiable` strictly distinct
//! from `BoundExceeded`.
//!
//! # Examples
//!
//! ```
//! use sigil_core::{Algebra, EquationSet, TermManager};
//! use sigil_theories::{unify, Bound, Budget, Theory, UnifyResult};
//!
//! let mut tm = TermManager::new();
//! let top = tm.sorts.top;
//! let f = tm.declare_func("f", 2, Algebra::AssocComm);
//! let x = tm.mk_var("x", top);
//! let y = tm.mk_var("y", top);
//! let a = tm.mk_const("a", top);
//! let b = tm.mk_const("b", top);
//! let lhs = tm.mk_app(f, &[x, y]).unwrap();
//! let rhs = tm.mk_app(f, &[a, b]).unwrap();
//! let eqs: EquationSet = [(lhs, rhs)].into_iter().collect();
//!
//! // Modulo AC, f(x, y) = f(a, b) has exactly two unifiers.
//! let result = unify(&mut tm, &eqs, &Theory::Ac, Bound::All, &mut Budget::unlimited());
//! match result {
//!     UnifyResult::Unifiers(unifiers) => assert_eq!(unifiers.len(), 2),
//!     other => panic!("unexpected {other:?}"),
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod ac;
pub mod theory;
pub mod xor;

pub use ac::unify_ac;
pub use theory::{
    unify, Bound, Budget, SolveStatus, Theory, UnifyOutcome, UnifyResult, UnsatReason,
};
pub use xor::{ConstraintMap, SaturationResult, XorTheory};

//! Sigil Math - Integer Combinatorics for Equational Unification
//!
//! This crate provides the numeric subroutines consumed by the Sigil theory
//! unifiers:
//! - Minimal non-negative integer solution bases of homogeneous linear
//!   Diophantine systems ([`diophantine::basis`]), the backbone of
//!   AC unification
//! - Lazy enumeration of subsets and set partitions
//!   ([`combinatorics::Subsets`], [`combinatorics::SetPartitions`]), used to
//!   distribute basis vectors among unification variables
//!
//! The solvers are deliberately independent of any term representation: the
//! unification layer translates flattened term multisets into coefficient
//! matrices and interprets the returned vectors on its own.
//!
//! # Examples
//!
//! ```
//! use num_bigint::BigInt;
//! use sigil_math::diophantine::basis;
//!
//! // x + y - 2z = 0
//! let rows = vec![vec![BigInt::from(1), BigInt::from(1), BigInt::from(-2)]];
//! let b = basis(&rows);
//! // Minimal solutions: (2,0,1), (0,2,1), (1,1,1)
//! assert_eq!(b.len(), 3);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod combinatorics;
pub mod diophantine;

pub use combinatorics::{subsets, SetPartitions, Subsets};
pub use diophantine::basis;

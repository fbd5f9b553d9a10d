//! Minimal bases of homogeneous linear Diophantine systems.
//!
//! Computes the minimal generating set of non-negative integer solutions of
//! `A·x = 0` with the Contejean-Devie completion procedure: candidates grow
//! from the unit vectors, a candidate is extended along coordinate `j` only
//! when doing so moves its defect `A·t` towards zero (negative scalar
//! product), and candidates dominated by an already-found solution are pruned.
//! The procedure terminates and returns exactly the minimal solutions.
//!
//! ## References
//!
//! - Contejean, Devie: "An efficient incremental algorithm for solving
//!   systems of linear Diophantine equations" (1994)
//! - Stickel: "A unification algorithm for associative-commutative
//!   functions" (1981), which consumes such bases

use num_bigint::BigInt;
use num_traits::Zero;
use rustc_hash::FxHashSet;
use std::collections::VecDeque;

/// A single solution vector, indexed like the columns of the input matrix.
pub type Solution = Vec<BigInt>;

/// Compute the minimal non-negative, non-zero solutions of `rows · x = 0`.
///
/// Each inner vector of `rows` is one equation's coefficient row; all rows
/// must have the same length. Returns an empty basis for an empty system or
/// for a system with no non-trivial solutions.
pub fn basis(rows: &[Vec<BigInt>]) -> Vec<Solution> {
    let Some(first) = rows.first() else {
        return Vec::new();
    };
    let n = first.len();
    if n == 0 || rows.iter().any(|r| r.len() != n) {
        return Vec::new();
    }

    let mut minimal: Vec<Solution> = Vec::new();
    let mut seen: FxHashSet<Solution> = FxHashSet::default();
    let mut frontier: VecDeque<(Solution, Vec<BigInt>)> = VecDeque::new();

    for j in 0..n {
        let mut t = vec![BigInt::zero(); n];
        t[j] = BigInt::from(1);
        let d = defect(rows, &t);
        seen.insert(t.clone());
        frontier.push_back((t, d));
    }

    while let Some((t, d)) = frontier.pop_front() {
        if d.iter().all(Zero::is_zero) {
            if !minimal.iter().any(|m| dominates(&t, m)) {
                minimal.retain(|m| !dominates(m, &t));
                minimal.push(t);
            }
            continue;
        }
        for j in 0..n {
            // Extend along j only when it reduces the defect.
            let step: BigInt = d
                .iter()
                .zip(rows.iter())
                .map(|(di, row)| di * &row[j])
                .sum();
            if step >= BigInt::zero() {
                continue;
            }
            let mut next = t.clone();
            next[j] += BigInt::from(1);
            if seen.contains(&next) || minimal.iter().any(|m| dominates(&next, m)) {
                continue;
            }
            let mut nd = d.clone();
            for (di, row) in nd.iter_mut().zip(rows.iter()) {
                *di += &row[j];
            }
            seen.insert(next.clone());
            frontier.push_back((next, nd));
        }
    }

    minimal
}

/// Componentwise `a >= b` with `a != b`.
fn dominates(a: &[BigInt], b: &[BigInt]) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| x >= y) && a != b
}

fn defect(rows: &[Vec<BigInt>], t: &[BigInt]) -> Vec<BigInt> {
    rows.iter()
        .map(|row| row.iter().zip(t.iter()).map(|(c, x)| c * x).sum())
        .collect()
}

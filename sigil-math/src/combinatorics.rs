//! Lazy subset and set-partition enumeration.
//!
//! The AC unifier distributes Diophantine basis vectors among unification
//! variables; the admissible distributions are enumerated as subsets of the
//! basis index set. [`SetPartitions`] enumerates assignments of `{0..n}` to
//! blocks via restricted growth strings and is exposed for callers that need
//! the full partition lattice rather than subset selection.

/// Lazy enumeration of the non-empty subsets of `{0..n}` as bitmasks.
///
/// Subsets are produced in increasing mask order, so callers that stop early
/// see the smallest-index combinations first. `n` must be at most 63.
#[derive(Debug, Clone)]
pub struct Subsets {
    n: u32,
    next: u64,
}

/// Build a [`Subsets`] iterator over `{0..n}`, or `None` when `n` exceeds
/// the 63-element bitmask capacity.
pub fn subsets(n: u32) -> Option<Subsets> {
    if n > 63 {
        return None;
    }
    Some(Subsets { n, next: 1 })
}

impl Iterator for Subsets {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.n == 0 || self.next >= (1u64 << self.n) {
            return None;
        }
        let mask = self.next;
        self.next += 1;
        Some(mask)
    }
}

/// Lazy enumeration of the set partitions of `{0..n}`.
///
/// Each item is a list of blocks; block order follows the least element of
/// each block. Uses restricted growth strings, so successive partitions share
/// no allocation with each other.
///
/// The unifiers in this workspace select basis subsets via [`subsets`];
/// this type is exposed for callers that need the full partition lattice,
/// such as argument-grouping enumerations over flattened terms.
#[derive(Debug, Clone)]
pub struct SetPartitions {
    /// Restricted growth string; `code[i]` is the block index of element `i`.
    code: Vec<usize>,
    started: bool,
    done: bool,
}

impl SetPartitions {
    /// Partitions of `{0..n}`. For `n == 0` the single empty partition is
    /// produced.
    pub fn new(n: usize) -> Self {
        SetPartitions {
            code: vec![0; n],
            started: false,
            done: false,
        }
    }

    fn blocks(&self) -> Vec<Vec<usize>> {
        let nblocks = self.code.iter().copied().max().map_or(0, |m| m + 1);
        let mut out = vec![Vec::new(); nblocks];
        for (elem, &b) in self.code.iter().enumerate() {
            out[b].push(elem);
        }
        out
    }

    fn advance(&mut self) -> bool {
        // Rightmost position that may still grow: code[i] can rise to
        // max(code[..i]) + 1 at most.
        let n = self.code.len();
        for i in (1..n).rev() {
            let cap = self.code[..i].iter().copied().max().unwrap_or(0) + 1;
            if self.code[i] < cap {
                self.code[i] += 1;
                for j in i + 1..n {
                    self.code[j] = 0;
                }
                return true;
            }
        }
        false
    }
}

impl Iterator for SetPartitions {
    type Item = Vec<Vec<usize>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(self.blocks());
        }
        if self.advance() {
            Some(self.blocks())
        } else {
            self.done = true;
            None
        }
    }
}

//! Hash-consed sorted first-order terms.
//!
//! The [`TermManager`] owns the string interner, the sort store, the function
//! signature and the term arena. Terms are interned: structurally identical
//! terms share a [`TermId`], so plain structural equality is id equality and
//! every transformation allocates new terms instead of mutating shared
//! substructure. Equality modulo a function's algebra tag flattens nested
//! same-symbol applications and compares list or multiset normal forms.
//!
//! Construction is validated: `mk_app` rejects arity mismatches and arguments
//! whose sort is not a subsort of the declared domain sort.

use crate::error::{Result, SigilError};
use crate::signature::{Algebra, FuncDecl, FuncId, Signature};
use crate::sort::{SortId, SortStore};
use lasso::{Rodeo, Spur};
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use std::fmt;

/// Index of an interned term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TermId(pub(crate) u32);

/// The shape of a term.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TermKind {
    /// A sorted variable.
    Var {
        /// Interned variable name.
        name: Spur,
        /// Sort of the variable.
        sort: SortId,
    },
    /// A sorted constant (leaf symbol).
    Const {
        /// Interned constant name.
        name: Spur,
        /// Sort of the constant.
        sort: SortId,
    },
    /// A function application with exactly `arity` ordered arguments.
    App {
        /// Applied function symbol.
        func: FuncId,
        /// Ordered argument list.
        args: SmallVec<[TermId; 4]>,
    },
}

/// An interned term: its shape plus its sort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    /// Shape of the term.
    pub kind: TermKind,
    /// Sort: declared for variables and constants, the range sort for
    /// applications.
    pub sort: SortId,
}

/// A path from the root of a term to a subterm; each entry is an argument
/// index.
pub type Position = SmallVec<[u32; 8]>;

/// Owner of sorts, signature and interned terms.
#[derive(Debug)]
pub struct TermManager {
    rodeo: Rodeo,
    /// The sort table.
    pub sorts: SortStore,
    sig: Signature,
    terms: Vec<Term>,
    cons: FxHashMap<TermKind, TermId>,
    fresh_counter: u32,
}

impl TermManager {
    /// Create an empty manager with only the top sort registered.
    pub fn new() -> Self {
        let mut rodeo = Rodeo::default();
        let top = rodeo.get_or_intern("Top");
        TermManager {
            rodeo,
            sorts: SortStore::new(top),
            sig: Signature::default(),
            terms: Vec::new(),
            cons: FxHashMap::default(),
            fresh_counter: 0,
        }
    }

    /// Intern a string.
    pub fn intern_str(&mut self, s: &str) -> Spur {
        self.rodeo.get_or_intern(s)
    }

    /// Resolve an interned string.
    pub fn resolve_str(&self, s: Spur) -> &str {
        self.rodeo.resolve(&s)
    }

    // --- sorts ---

    /// Register a sort. Re-registering a name returns its existing id.
    pub fn add_sort(&mut self, name: &str, parent: Option<SortId>) -> SortId {
        let name = self.rodeo.get_or_intern(name);
        self.sorts.add(name, parent)
    }

    /// Look up a registered sort by name.
    pub fn lookup_sort(&self, name: &str) -> Option<SortId> {
        self.rodeo.get(name).and_then(|s| self.sorts.lookup(s))
    }

    /// Look up a registered sort by name, failing with
    /// [`SigilError::UnknownSort`] if it was never registered.
    pub fn sort_id(&self, name: &str) -> Result<SortId> {
        self.lookup_sort(name)
            .ok_or_else(|| SigilError::UnknownSort(name.to_string()))
    }

    /// Printable name of a sort.
    pub fn sort_name(&self, id: SortId) -> &str {
        self.rodeo.resolve(&self.sorts.get(id).name)
    }

    // --- signature ---

    /// Declare an unsorted function: every argument and the range default to
    /// the top sort.
    pub fn declare_func(&mut self, name: &str, arity: usize, algebra: Algebra) -> FuncId {
        let name = self.rodeo.get_or_intern(name);
        let range = self.sorts.top;
        self.sig.declare(FuncDecl {
            name,
            arity,
            domain: None,
            range,
            algebra,
        })
    }

    /// Declare a function with explicit domain and range sorts; the arity is
    /// the domain length.
    pub fn declare_func_sorted(
        &mut self,
        name: &str,
        domain: &[SortId],
        range: SortId,
        algebra: Algebra,
    ) -> FuncId {
        let name = self.rodeo.get_or_intern(name);
        self.sig.declare(FuncDecl {
            name,
            arity: domain.len(),
            domain: Some(SmallVec::from_slice(domain)),
            range,
            algebra,
        })
    }

    /// Access a function declaration.
    pub fn func(&self, id: FuncId) -> &FuncDecl {
        self.sig.get(id)
    }

    /// Look up a declared function by name.
    pub fn lookup_func(&self, name: &str) -> Option<FuncId> {
        self.rodeo.get(name).and_then(|s| self.sig.lookup(s))
    }

    /// Look up a declared function by name, failing with
    /// [`SigilError::UnknownFunction`] if it was never declared.
    pub fn func_id(&self, name: &str) -> Result<FuncId> {
        self.lookup_func(name)
            .ok_or_else(|| SigilError::UnknownFunction(name.to_string()))
    }

    /// Printable name of a function symbol.
    pub fn func_name(&self, id: FuncId) -> &str {
        self.rodeo.resolve(&self.sig.get(id).name)
    }

    // --- term construction ---

    fn intern(&mut self, kind: TermKind, sort: SortId) -> TermId {
        if let Some(&id) = self.cons.get(&kind) {
            return id;
        }
        let id = TermId(self.terms.len() as u32);
        self.cons.insert(kind.clone(), id);
        self.terms.push(Term { kind, sort });
        id
    }

    /// Build (or fetch) a variable.
    pub fn mk_var(&mut self, name: &str, sort: SortId) -> TermId {
        let name = self.rodeo.get_or_intern(name);
        self.intern(TermKind::Var { name, sort }, sort)
    }

    /// Build (or fetch) a constant.
    pub fn mk_const(&mut self, name: &str, sort: SortId) -> TermId {
        let name = self.rodeo.get_or_intern(name);
        self.intern(TermKind::Const { name, sort }, sort)
    }

    /// Mint a variable with a name unused anywhere in this manager.
    pub fn fresh_var(&mut self, sort: SortId) -> TermId {
        loop {
            let name = format!("_v{}", self.fresh_counter);
            self.fresh_counter += 1;
            if self.rodeo.get(&name).is_none() {
                return self.mk_var(&name, sort);
            }
        }
    }

    /// Build (or fetch) an application, validating arity and argument sorts.
    pub fn mk_app(&mut self, func: FuncId, args: &[TermId]) -> Result<TermId> {
        let (arity, range) = {
            let d = self.sig.get(func);
            (d.arity, d.range)
        };
        if args.len() != arity {
            return Err(SigilError::Arity {
                func: self.func_name(func).to_string(),
                expected: arity,
                found: args.len(),
            });
        }
        if let Some(domain) = self.sig.get(func).domain.clone() {
            for (index, (&arg, &dom)) in args.iter().zip(domain.iter()).enumerate() {
                let found = self.terms[arg.0 as usize].sort;
                if !self.sorts.is_subsort(found, dom) {
                    return Err(SigilError::Sort {
                        func: self.func_name(func).to_string(),
                        index,
                        expected: self.sort_name(dom).to_string(),
                        found: self.sort_name(found).to_string(),
                    });
                }
            }
        }
        Ok(self.intern(
            TermKind::App {
                func,
                args: SmallVec::from_slice(args),
            },
            range,
        ))
    }

    /// Rebuild an application whose arguments are known to be sort-correct
    /// (substitution and rewriting preserve sort compatibility).
    pub(crate) fn mk_app_unchecked(&mut self, func: FuncId, args: SmallVec<[TermId; 4]>) -> TermId {
        let range = self.sig.get(func).range;
        self.intern(TermKind::App { func, args }, range)
    }

    // --- term inspection ---

    /// Access an interned term.
    pub fn get(&self, id: TermId) -> &Term {
        &self.terms[id.0 as usize]
    }

    /// Whether `id` is a variable.
    pub fn is_var(&self, id: TermId) -> bool {
        matches!(self.get(id).kind, TermKind::Var { .. })
    }

    /// Name of a variable or constant, `None` for applications.
    pub fn name_of(&self, id: TermId) -> Option<&str> {
        match &self.get(id).kind {
            TermKind::Var { name, .. } | TermKind::Const { name, .. } => {
                Some(self.rodeo.resolve(name))
            }
            TermKind::App { .. } => None,
        }
    }

    /// All variables occurring in `t`, collected iteratively.
    pub fn vars(&self, t: TermId) -> FxHashSet<TermId> {
        let mut out = FxHashSet::default();
        let mut visited = FxHashSet::default();
        let mut stack = vec![t];
        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            match &self.get(id).kind {
                TermKind::Var { .. } => {
                    out.insert(id);
                }
                TermKind::Const { .. } => {}
                TermKind::App { args, .. } => stack.extend(args.iter().copied()),
            }
        }
        out
    }

    /// Occurs check: does variable `var` appear anywhere inside `t`?
    /// Worklist-based, never recursive.
    pub fn occurs(&self, var: TermId, t: TermId) -> bool {
        let mut visited = FxHashSet::default();
        let mut stack = vec![t];
        while let Some(id) = stack.pop() {
            if id == var {
                return true;
            }
            if !visited.insert(id) {
                continue;
            }
            if let TermKind::App { args, .. } = &self.get(id).kind {
                stack.extend(args.iter().copied());
            }
        }
        false
    }

    /// Flatten nested applications of `func` into the ordered list of leaves
    /// (subterms not rooted at `func`). A term not rooted at `func` flattens
    /// to the singleton list of itself. Worklist-based.
    pub fn flatten(&self, func: FuncId, t: TermId) -> Vec<TermId> {
        let mut out = Vec::new();
        let mut stack = vec![t];
        while let Some(id) = stack.pop() {
            match &self.get(id).kind {
                TermKind::App { func: f, args } if *f == func => {
                    for &a in args.iter().rev() {
                        stack.push(a);
                    }
                }
                _ => out.push(id),
            }
        }
        out
    }

    /// Equality modulo the algebra tags of the functions involved:
    /// associative applications compare as flattened lists, commutative
    /// applications as argument multisets, AC applications as flattened
    /// multisets.
    pub fn equal_modulo(&self, a: TermId, b: TermId) -> bool {
        if a == b {
            return true;
        }
        match (&self.get(a).kind, &self.get(b).kind) {
            (TermKind::App { func: f, args: fa }, TermKind::App { func: g, args: ga })
                if f == g =>
            {
                match self.sig.get(*f).algebra {
                    Algebra::Free => {
                        fa.len() == ga.len()
                            && fa
                                .iter()
                                .zip(ga.iter())
                                .all(|(&x, &y)| self.equal_modulo(x, y))
                    }
                    Algebra::Associative => {
                        let l = self.flatten(*f, a);
                        let r = self.flatten(*f, b);
                        l.len() == r.len()
                            && l.iter().zip(r.iter()).all(|(&x, &y)| self.equal_modulo(x, y))
                    }
                    Algebra::Commutative => self.multiset_equal(fa, ga),
                    Algebra::AssocComm => {
                        let l = self.flatten(*f, a);
                        let r = self.flatten(*f, b);
                        self.multiset_equal(&l, &r)
                    }
                }
            }
            _ => false,
        }
    }

    fn multiset_equal(&self, l: &[TermId], r: &[TermId]) -> bool {
        if l.len() != r.len() {
            return false;
        }
        let mut used = vec![false; r.len()];
        'outer: for &x in l {
            for (i, &y) in r.iter().enumerate() {
                if !used[i] && self.equal_modulo(x, y) {
                    used[i] = true;
                    continue 'outer;
                }
            }
            return false;
        }
        true
    }

    /// Rename the variables of `t` to `#0`, `#1`, ... in first-occurrence
    /// order. Two terms are equal modulo variable renaming iff their
    /// canonical forms share a `TermId`. The `#` prefix is reserved.
    pub fn canonicalize(&mut self, t: TermId) -> TermId {
        let mut map = FxHashMap::default();
        self.canon_rec(t, &mut map)
    }

    fn canon_rec(&mut self, t: TermId, map: &mut FxHashMap<TermId, TermId>) -> TermId {
        let kind = self.get(t).kind.clone();
        match kind {
            TermKind::Var { sort, .. } => {
                if let Some(&c) = map.get(&t) {
                    c
                } else {
                    let name = format!("#{}", map.len());
                    let c = self.mk_var(&name, sort);
                    map.insert(t, c);
                    c
                }
            }
            TermKind::Const { .. } => t,
            TermKind::App { func, args } => {
                let mut new_args = SmallVec::with_capacity(args.len());
                for &a in &args {
                    let c = self.canon_rec(a, map);
                    new_args.push(c);
                }
                self.mk_app_unchecked(func, new_args)
            }
        }
    }

    // --- positions ---

    /// All positions of `t` in preorder, leftmost first.
    pub fn positions(&self, t: TermId) -> Vec<Position> {
        let mut out = Vec::new();
        let mut stack: Vec<(TermId, Position)> = vec![(t, Position::new())];
        while let Some((id, pos)) = stack.pop() {
            if let TermKind::App { args, .. } = &self.get(id).kind {
                for (i, &a) in args.iter().enumerate().rev() {
                    let mut p = pos.clone();
                    p.push(i as u32);
                    stack.push((a, p));
                }
            }
            out.push(pos);
        }
        out
    }

    /// The subterm of `t` at `pos`, or `None` when the path leaves the term.
    pub fn subterm_at(&self, t: TermId, pos: &[u32]) -> Option<TermId> {
        let mut cur = t;
        for &i in pos {
            match &self.get(cur).kind {
                TermKind::App { args, .. } => cur = *args.get(i as usize)?,
                _ => return None,
            }
        }
        Some(cur)
    }

    /// Rebuild `t` with the subterm at `pos` replaced by `repl`; the rest of
    /// the term is shared, never mutated.
    pub fn replace_at(&mut self, t: TermId, pos: &[u32], repl: TermId) -> Option<TermId> {
        if pos.is_empty() {
            return Some(repl);
        }
        let kind = self.get(t).kind.clone();
        if let TermKind::App { func, args } = kind {
            let i = pos[0] as usize;
            let child = *args.get(i)?;
            let new_child = self.replace_at(child, &pos[1..], repl)?;
            let mut new_args = args.clone();
            new_args[i] = new_child;
            Some(self.mk_app_unchecked(func, new_args))
        } else {
            None
        }
    }

    // --- printing ---

    /// Displayable view of a term: `f(t1, ..., tn)` applications, bare
    /// identifiers for variables and constants.
    pub fn display(&self, id: TermId) -> TermDisplay<'_> {
        TermDisplay { tm: self, id }
    }
}

impl Default for TermManager {
    fn default() -> Self {
        Self::new()
    }
}

/// `Display` adapter returned by [`TermManager::display`].
pub struct TermDisplay<'a> {
    tm: &'a TermManager,
    id: TermId,
}

impl TermDisplay<'_> {
    fn rec(&self, id: TermId, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.tm.get(id).kind {
            TermKind::Var { name, .. } | TermKind::Const { name, .. } => {
                write!(f, "{}", self.tm.rodeo.resolve(name))
            }
            TermKind::App { func, args } => {
                write!(f, "{}(", self.tm.func_name(*func))?;
                for (i, &a) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    self.rec(a, f)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl fmt::Display for TermDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.rec(self.id, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_consing() {
        let mut tm = TermManager::new();
        let top = tm.sorts.top;
        let f = tm.declare_func("f", 2, Algebra::Free);
        let x = tm.mk_var("x", top);
        let a = tm.mk_const("a", top);
        let t1 = tm.mk_app(f, &[x, a]).unwrap();
        let t2 = tm.mk_app(f, &[x, a]).unwrap();
        assert_eq!(t1, t2);
        assert_ne!(x, a);
    }

    #[test]
    fn test_arity_mismatch() {
        let mut tm = TermManager::new();
        let top = tm.sorts.top;
        let f = tm.declare_func("f", 2, Algebra::Free);
        let a = tm.mk_const("a", top);
        let err = tm.mk_app(f, &[a]).unwrap_err();
        assert!(matches!(err, SigilError::Arity { expected: 2, found: 1, .. }));
    }

    #[test]
    fn test_sort_mismatch() {
        let mut tm = TermManager::new();
        let reals = tm.add_sort("reals", None);
        let msgs = tm.add_sort("msgs", None);
        let f = tm.declare_func_sorted("f", &[reals], reals, Algebra::Free);
        let m = tm.mk_const("m", msgs);
        assert!(matches!(tm.mk_app(f, &[m]), Err(SigilError::Sort { .. })));

        let nz = tm.add_sort("non_zeros", Some(reals));
        let n = tm.mk_const("n", nz);
        assert!(tm.mk_app(f, &[n]).is_ok(), "subsort argument accepted");
    }

    #[test]
    fn test_ac_equality_flattens() {
        let mut tm = TermManager::new();
        let top = tm.sorts.top;
        let f = tm.declare_func("f", 2, Algebra::AssocComm);
        let a = tm.mk_const("a", top);
        let b = tm.mk_const("b", top);
        let c = tm.mk_const("c", top);
        let ab = tm.mk_app(f, &[a, b]).unwrap();
        let left = tm.mk_app(f, &[ab, c]).unwrap();
        let cb = tm.mk_app(f, &[c, b]).unwrap();
        let right = tm.mk_app(f, &[a, cb]).unwrap();
        assert_ne!(left, right);
        assert!(tm.equal_modulo(left, right));
    }

    #[test]
    fn test_commutative_equality_does_not_flatten() {
        let mut tm = TermManager::new();
        let top = tm.sorts.top;
        let g = tm.declare_func("g", 2, Algebra::Commutative);
        let a = tm.mk_const("a", top);
        let b = tm.mk_const("b", top);
        let c = tm.mk_const("c", top);
        let ab = tm.mk_app(g, &[a, b]).unwrap();
        let ba = tm.mk_app(g, &[b, a]).unwrap();
        assert!(tm.equal_modulo(ab, ba));

        // g(g(a,b),c) != g(a,g(b,c)) without associativity
        let l = tm.mk_app(g, &[ab, c]).unwrap();
        let bc = tm.mk_app(g, &[b, c]).unwrap();
        let r = tm.mk_app(g, &[a, bc]).unwrap();
        assert!(!tm.equal_modulo(l, r));
    }

    #[test]
    fn test_positions_and_replace() {
        let mut tm = TermManager::new();
        let top = tm.sorts.top;
        let f = tm.declare_func("f", 2, Algebra::Free);
        let g = tm.declare_func("g", 1, Algebra::Free);
        let a = tm.mk_const("a", top);
        let b = tm.mk_const("b", top);
        let ga = tm.mk_app(g, &[a]).unwrap();
        let t = tm.mk_app(f, &[ga, b]).unwrap();

        let positions = tm.positions(t);
        assert_eq!(positions.len(), 4); // root, g(a), a, b

        let pos: Position = [0u32, 0u32].into_iter().collect();
        assert_eq!(tm.subterm_at(t, &pos), Some(a));
        let replaced = tm.replace_at(t, &pos, b).unwrap();
        let gb = tm.mk_app(g, &[b]).unwrap();
        let expected = tm.mk_app(f, &[gb, b]).unwrap();
        assert_eq!(replaced, expected);
    }

    #[test]
    fn test_canonicalize_modulo_renaming() {
        let mut tm = TermManager::new();
        let top = tm.sorts.top;
        let f = tm.declare_func("f", 2, Algebra::Free);
        let x = tm.mk_var("x", top);
        let y = tm.mk_var("y", top);
        let u = tm.mk_var("u", top);
        let v = tm.mk_var("v", top);
        let t1 = tm.mk_app(f, &[x, y]).unwrap();
        let t2 = tm.mk_app(f, &[u, v]).unwrap();
        let t3 = tm.mk_app(f, &[u, u]).unwrap();
        let c1 = tm.canonicalize(t1);
        let c2 = tm.canonicalize(t2);
        let c3 = tm.canonicalize(t3);
        assert_eq!(c1, c2);
        assert_ne!(c1, c3);
    }

    #[test]
    fn test_display_round_trip_shape() {
        let mut tm = TermManager::new();
        let top = tm.sorts.top;
        let f = tm.declare_func("f", 2, Algebra::Free);
        let x = tm.mk_var("x", top);
        let a = tm.mk_const("a", top);
        let t = tm.mk_app(f, &[x, a]).unwrap();
        assert_eq!(tm.display(t).to_string(), "f(x, a)");
    }

    #[test]
    fn test_fallible_lookups_report_unknown_names() {
        let mut tm = TermManager::new();
        let msg = tm.add_sort("Msg", None);
        let f = tm.declare_func("f", 2, Algebra::Free);

        assert_eq!(tm.sort_id("Msg"), Ok(msg));
        assert_eq!(tm.func_id("f"), Ok(f));
        assert_eq!(
            tm.sort_id("Key"),
            Err(SigilError::UnknownSort("Key".into()))
        );
        assert_eq!(
            tm.func_id("enc"),
            Err(SigilError::UnknownFunction("enc".into()))
        );
    }
}

//! # Syntactic Unification Example
//!
//! Demonstrates the worklist unifier: most general unifiers, symbol clashes,
//! the occurs check, and one-directional matching.

use sigil_core::{matches, unify, Algebra, EquationSet, TermManager, UnifyFailure};

fn main() -> sigil_core::Result<()> {
    println!("=== Sigil Core: Syntactic Unification ===\n");

    let mut tm = TermManager::new();
    let top = tm.sorts.top;
    let f = tm.declare_func("f", 2, Algebra::Free);
    let g = tm.declare_func("g", 1, Algebra::Free);
    let x = tm.mk_var("x", top);
    let y = tm.mk_var("y", top);
    let a = tm.mk_const("a", top);
    let b = tm.mk_const("b", top);

    // ===== A solvable system =====
    println!("--- Most General Unifier ---");
    let l = tm.mk_app(f, &[x, y])?;
    let r = tm.mk_app(f, &[a, b])?;
    let eqs: EquationSet = [(l, r)].into_iter().collect();
    match unify(&mut tm, &eqs) {
        Ok(mgu) => println!("unify(f(x,y) = f(a,b)) = {}\n", mgu.display(&tm)),
        Err(e) => println!("unexpected failure: {:?}\n", e),
    }

    // ===== Occurs check =====
    println!("--- Occurs Check ---");
    let gx = tm.mk_app(g, &[x])?;
    let l = tm.mk_app(f, &[x, y])?;
    let r = tm.mk_app(f, &[gx, a])?;
    let eqs: EquationSet = [(l, r)].into_iter().collect();
    match unify(&mut tm, &eqs) {
        Err(UnifyFailure::OccursCheck { var, term }) => println!(
            "f(x,y) = f(g(x),a) rejected: {} occurs in {}\n",
            tm.display(var),
            tm.display(term)
        ),
        other => println!("unexpected: {:?}\n", other),
    }

    // ===== Matching =====
    println!("--- One-Directional Matching ---");
    let pattern = tm.mk_app(f, &[x, a])?;
    let subject = tm.mk_app(f, &[b, a])?;
    match matches(&tm, pattern, subject) {
        Some(m) => println!("match(f(x,a), f(b,a)) = {}", m.display(&tm)),
        None => println!("no match"),
    }
    // Subject variables never bind, so the reverse direction fails.
    println!(
        "match(f(b,a), f(x,a)) = {:?}",
        matches(&tm, subject, pattern).map(|m| m.display(&tm).to_string())
    );

    Ok(())
}

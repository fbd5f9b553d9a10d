//! # AC Unification Example
//!
//! Demonstrates unification modulo associativity-commutativity: complete
//! unifier sets, bounded enumeration, and the distinction between a proved
//! `Unsatisfiable` and a truncated search.

use sigil_core::{Algebra, EquationSet, TermManager};
use sigil_theories::{unify, Bound, Budget, Theory, UnifyResult};

fn main() {
    println!("=== Sigil Theories: AC Unification ===\n");

    let mut tm = TermManager::new();
    let top = tm.sorts.top;
    let f = tm.declare_func("f", 2, Algebra::AssocComm);
    let x = tm.mk_var("x", top);
    let y = tm.mk_var("y", top);
    let a = tm.mk_const("a", top);
    let b = tm.mk_const("b", top);

    // ===== A complete set =====
    println!("--- Complete Set ---");
    let lhs = tm.mk_app(f, &[x, y]).unwrap();
    let rhs = tm.mk_app(f, &[a, b]).unwrap();
    let eqs: EquationSet = [(lhs, rhs)].into_iter().collect();
    let result = unify(
        &mut tm,
        &eqs,
        &Theory::Ac,
        Bound::All,
        &mut Budget::unlimited(),
    );
    println!(
        "unify(f(x,y) = f(a,b)) modulo AC, all unifiers ({}):",
        result.found().len()
    );
    for u in result.found() {
        println!("  {}", u.display(&tm));
    }

    // ===== Bounded enumeration =====
    println!("\n--- Bounded Enumeration ---");
    let z = tm.mk_var("z", top);
    let x1 = tm.mk_var("x1", top);
    let y1 = tm.mk_var("y1", top);
    let z1 = tm.mk_var("z1", top);
    let yz = tm.mk_app(f, &[y, z]).unwrap();
    let big_l = tm.mk_app(f, &[x, yz]).unwrap();
    let y1z1 = tm.mk_app(f, &[y1, z1]).unwrap();
    let big_r = tm.mk_app(f, &[x1, y1z1]).unwrap();
    let eqs: EquationSet = [(big_l, big_r)].into_iter().collect();
    // The complete set for this equation has 265 members; ask for 5.
    let result = unify(
        &mut tm,
        &eqs,
        &Theory::Ac,
        Bound::Limit(5),
        &mut Budget::unlimited(),
    );
    match result {
        UnifyResult::BoundExceeded { found } => {
            println!("stopped after {} of 265 unifiers, e.g.:", found.len());
            if let Some(u) = found.first() {
                println!("  {}", u.display(&tm));
            }
        }
        other => println!("unexpected: {other:?}"),
    }

    // ===== Proved unsatisfiability =====
    println!("\n--- Proved Unsatisfiability ---");
    let c = tm.mk_const("c", top);
    let ab = tm.mk_app(f, &[a, b]).unwrap();
    let ac = tm.mk_app(f, &[a, c]).unwrap();
    let eqs: EquationSet = [(ab, ac)].into_iter().collect();
    let result = unify(
        &mut tm,
        &eqs,
        &Theory::Ac,
        Bound::All,
        &mut Budget::unlimited(),
    );
    println!(
        "unify(f(a,b) = f(a,c)) unsatisfiable: {}",
        result.is_unsatisfiable()
    );
}

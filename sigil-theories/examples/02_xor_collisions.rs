//! # XOR Saturation Example
//!
//! Demonstrates the XOR theory: normal forms with cancellation, resolution
//! of sums, and saturation hunting for a zero-collision among observed
//! terms, with constraint menus limiting what a variable may stand for.

use sigil_core::{EquationSet, TermManager};
use sigil_theories::{Bound, Budget, ConstraintMap, XorTheory};

fn main() -> sigil_core::Result<()> {
    println!("=== Sigil Theories: XOR ===\n");

    let mut tm = TermManager::new();
    let xor = XorTheory::install(&mut tm);
    let top = tm.sorts.top;
    let a = tm.mk_const("a", top);
    let b = tm.mk_const("b", top);
    let c = tm.mk_const("c", top);

    // ===== Normal forms =====
    println!("--- Normal Forms ---");
    let aa = tm.mk_app(xor.func(), &[a, a])?;
    let aab = tm.mk_app(xor.func(), &[aa, b])?;
    let n = xor.normal_form(&mut tm, aab)?;
    println!("nf(xor(xor(a,a), b)) = {}", tm.display(n));

    // ===== Saturation =====
    println!("\n--- Saturation ---");
    let ab = tm.mk_app(xor.func(), &[a, b])?;
    let ac = tm.mk_app(xor.func(), &[a, c])?;
    let bc = tm.mk_app(xor.func(), &[b, c])?;
    let result = xor.saturate(&mut tm, &[ab, ac, bc], &mut Budget::new(10_000))?;
    println!(
        "saturate({{a+b, a+c, b+c}}): {} terms, collision found: {}",
        result.done.len(),
        result.zero_found
    );

    // ===== Constrained unification =====
    println!("\n--- Constrained Unification ---");
    let x = tm.mk_var("x", top);
    let eqs: EquationSet = [(x, ab)].into_iter().collect();
    let mut menus = ConstraintMap::new();
    menus.constrain(x, vec![a, b]);
    let out = xor.constrained_unify(&mut tm, &eqs, &menus, Bound::All, &mut Budget::new(10_000));
    println!("x = a+b with menu {{a, b}}: {} unifier(s)", out.unifiers.len());

    let mut menus = ConstraintMap::new();
    menus.constrain(x, vec![c]);
    let out = xor.constrained_unify(&mut tm, &eqs, &menus, Bound::All, &mut Budget::new(10_000));
    println!("x = a+b with menu {{c}}:    {} unifier(s)", out.unifiers.len());

    Ok(())
}

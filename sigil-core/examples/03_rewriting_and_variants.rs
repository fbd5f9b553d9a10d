//! # Rewriting and Narrowing Example
//!
//! Demonstrates the rewrite engine: normalization with oriented rules,
//! narrowing of open terms, variant enumeration, and bounded reachability.

use sigil_core::{Algebra, PathSearch, RewriteRule, RewriteSystem, TermManager};

fn main() -> sigil_core::Result<()> {
    println!("=== Sigil Core: Rewriting and Variants ===\n");

    let mut tm = TermManager::new();
    let top = tm.sorts.top;
    let enc = tm.declare_func("enc", 2, Algebra::Free);
    let dec = tm.declare_func("dec", 2, Algebra::Free);
    let x = tm.mk_var("x", top);
    let k = tm.mk_var("k", top);

    // dec(enc(x, k), k) -> x
    let e = tm.mk_app(enc, &[x, k])?;
    let d = tm.mk_app(dec, &[e, k])?;
    let mut sys = RewriteSystem::new();
    sys.add(RewriteRule::new(&tm, d, x)?);
    println!("Rule: {} -> {}\n", tm.display(d), tm.display(x));

    // ===== Normalization =====
    println!("--- Normalization ---");
    let m = tm.mk_const("m", top);
    let key = tm.mk_const("key", top);
    let ct = tm.mk_app(enc, &[m, key])?;
    let pt = tm.mk_app(dec, &[ct, key])?;
    let wrapped = tm.mk_app(enc, &[pt, key])?;
    let goal = tm.mk_app(dec, &[wrapped, key])?;
    let normal = sys.normalize(&mut tm, goal, 100)?;
    println!("{}  ~~>  {}\n", tm.display(goal), tm.display(normal));

    // ===== Narrowing =====
    println!("--- Narrowing ---");
    let w = tm.mk_var("w", top);
    let open_goal = tm.mk_app(dec, &[w, key])?;
    for step in sys.narrow(&mut tm, open_goal) {
        println!(
            "narrow {} at {:?} with {} gives {}",
            tm.display(open_goal),
            step.position,
            step.subst.display(&tm),
            tm.display(step.result)
        );
    }

    // ===== Variants =====
    println!("\n--- Variants ---");
    let variants: Vec<_> = sys.variants(&mut tm, goal).collect();
    for v in &variants {
        println!("variant: {}", tm.display(*v));
    }

    // ===== Reachability =====
    println!("\n--- Reachability ---");
    match sys.narrow_path(&mut tm, goal, m, 1000) {
        PathSearch::Found(steps) => {
            println!("reached {} in {} steps:", tm.display(m), steps.len());
            for step in steps {
                println!("  rule {} at {:?} -> {}", step.rule, step.position, tm.display(step.term));
            }
        }
        PathSearch::NotFound => println!("target unreachable"),
        PathSearch::BoundExceeded => println!("search budget exhausted"),
    }

    Ok(())
}

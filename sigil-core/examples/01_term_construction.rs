//! # Basic Term Construction Example
//!
//! This example demonstrates how to create and manipulate terms using the
//! Sigil term manager. It covers:
//! - Declaring sorts and function symbols
//! - Building variables, constants, and applications
//! - Hash consing (structural sharing)
//! - Equality modulo associativity/commutativity
//!
//! ## See Also
//! - [`TermManager`](sigil_core::TermManager) for the main API
//! - [`Algebra`](sigil_core::Algebra) for the equational tags

use sigil_core::{Algebra, TermManager};

fn main() -> sigil_core::Result<()> {
    println!("=== Sigil Core: Basic Term Construction ===\n");

    // The term manager is the central store; every term lives inside it.
    let mut tm = TermManager::new();
    let top = tm.sorts.top;

    // ===== Sorts =====
    println!("--- Sorts ---");
    let msg = tm.add_sort("Msg", None);
    let key = tm.add_sort("Key", Some(msg));
    println!("Declared sorts: Msg={:?}, Key={:?} (Key < Msg)\n", msg, key);

    // ===== Function symbols =====
    println!("--- Function Symbols ---");
    let pair = tm.declare_func("pair", 2, Algebra::Free);
    let xor = tm.declare_func("xor", 2, Algebra::AssocComm);
    let enc = tm.declare_func_sorted("enc", &[msg, key], msg, Algebra::Free);
    println!("pair  : free, arity 2");
    println!("xor   : associative-commutative, arity 2");
    println!("enc   : Msg x Key -> Msg\n");

    // ===== Terms =====
    println!("--- Terms ---");
    let x = tm.mk_var("x", msg);
    let k = tm.mk_const("k", key);
    let a = tm.mk_const("a", msg);
    let e = tm.mk_app(enc, &[x, k])?;
    let p = tm.mk_app(pair, &[e, a])?;
    println!("enc(x, k)        = {}", tm.display(e));
    println!("pair(enc(x,k),a) = {}\n", tm.display(p));

    // ===== Hash consing =====
    println!("--- Hash Consing ---");
    let e2 = tm.mk_app(enc, &[x, k])?;
    println!("Rebuilding enc(x, k) returns the same id: {}", e == e2);

    // ===== Equality modulo AC =====
    println!("\n--- Equality Modulo AC ---");
    let b = tm.mk_const("b", top);
    let c = tm.mk_const("c", top);
    let ab = tm.mk_app(xor, &[a, b])?;
    let left = tm.mk_app(xor, &[ab, c])?;
    let cb = tm.mk_app(xor, &[c, b])?;
    let right = tm.mk_app(xor, &[a, cb])?;
    println!("xor(xor(a,b),c) and xor(a,xor(c,b)):");
    println!("  distinct ids     : {}", left != right);
    println!("  equal modulo AC  : {}", tm.equal_modulo(left, right));

    Ok(())
}

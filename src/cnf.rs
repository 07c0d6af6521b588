//! Fixed-shape CNF clause helpers shared by the frame encoder and the
//! simple-path encoder, mirroring `mcaiger.c`'s `unary`/`binary`/`ternary`/
//! `and`/`eq` functions one-for-one.

use crate::litmap::SatLit as Lit;
use crate::sat::SatBackend;

pub fn unary(solver: &mut dyn SatBackend, a: Lit) {
    solver.add_clause(&[a]);
}

pub fn binary(solver: &mut dyn SatBackend, a: Lit, b: Lit) {
    solver.add_clause(&[a, b]);
}

pub fn ternary(solver: &mut dyn SatBackend, a: Lit, b: Lit, c: Lit) {
    solver.add_clause(&[a, b, c]);
}

/// Plaisted–Greenbaum-style equivalence `lhs ↔ rhs0 ∧ rhs1` for one AND
/// gate: `{¬lhs ∨ rhs0}`, `{¬lhs ∨ rhs1}`, `{lhs ∨ ¬rhs0 ∨ ¬rhs1}`.
pub fn and_gate(solver: &mut dyn SatBackend, lhs: Lit, rhs0: Lit, rhs1: Lit) {
    binary(solver, -lhs, rhs0);
    binary(solver, -lhs, rhs1);
    ternary(solver, lhs, -rhs0, -rhs1);
}

/// Equivalence `lhs ↔ rhs`, used to wire a latch's current-state literal
/// at frame k to the previous frame's next-state literal.
pub fn eq(solver: &mut dyn SatBackend, lhs: Lit, rhs: Lit) {
    binary(solver, -lhs, rhs);
    binary(solver, lhs, -rhs);
}

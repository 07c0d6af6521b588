//! Bounded model checking for AIG sequential circuits: k-induction
//! strengthened with simple-path constraints.

pub mod aig;
pub mod cli;
pub mod cnf;
pub mod engine;
pub mod litmap;
pub mod regime;
pub mod sat;
pub mod signals;
pub mod witness;

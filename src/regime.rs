//! The four (five, counting MIX) simple-path constraint regimes and their
//! CNF/observer encodings.
//!
//! The regime tag itself is a small closed set — deliberately not left
//! open for extension as a trait object or similar open-ended polymorphism.

use crate::aig::AigModel;
use crate::cnf;
use crate::litmap::LiteralMap;
use crate::sat::SatBackend;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regime {
    None,
    ClassicalDiff,
    AllDiffObserver,
    Refinement,
    Mix,
}

impl Regime {
    /// Whether this regime's indexing needs the per-pair diff-variable
    /// region reserved inside every frame's variable block. Read once at
    /// session start — MIX reserves eagerly since it may fall back to
    /// REFINEMENT mid-run and the reservation must already be in place for
    /// that to work without renumbering anything.
    pub fn reserves_diff_region(self) -> bool {
        matches!(
            self,
            Regime::ClassicalDiff | Regime::Refinement | Regime::Mix
        )
    }

    /// Whether this regime starts out driving the all-different observer.
    pub fn starts_with_observer(self) -> bool {
        matches!(self, Regime::AllDiffObserver | Regime::Mix)
    }
}

/// Emit the pairwise-different constraint between frames `k` and `l`
/// (`k != l`): for each latch, a fresh difference bit implied by
/// inequality, plus a clause saying some difference bit is set. Used both
/// eagerly by CLASSICAL-DIFF and lazily by the refinement loop.
pub fn diffs(solver: &mut dyn SatBackend, map: &LiteralMap, model: &AigModel, k: u32, l: u32) {
    debug_assert_ne!(k, l);
    if model.num_latches() == 0 {
        return;
    }
    let (hi, lo) = if l > k { (l, k) } else { (k, l) };

    let mut diff_lits = Vec::with_capacity(model.num_latches());
    for i in 0..model.num_latches() {
        let latch_lo = map.latch(model, lo, i);
        let latch_hi = map.latch(model, hi, i);
        let d = map.diff_var(hi, lo, i);
        cnf::ternary(solver, latch_lo, latch_hi, -d);
        cnf::ternary(solver, -latch_lo, -latch_hi, -d);
        diff_lits.push(d);
    }
    solver.add_clause(&diff_lits);
}

/// Emit the eager pairwise-different constraints between frame `k` and
/// every earlier frame (CLASSICAL-DIFF).
pub fn diffsk(solver: &mut dyn SatBackend, map: &LiteralMap, model: &AigModel, k: u32) {
    for l in 0..k {
        diffs(solver, map, model, k, l);
    }
}

/// Feed frame `k`'s latch tuple to the backend's all-different observer
/// (ALL-DIFF-OBSERVER).
pub fn ado(solver: &mut dyn SatBackend, map: &LiteralMap, model: &AigModel, k: u32) {
    if model.num_latches() == 0 {
        return;
    }
    let tuple: Vec<_> = (0..model.num_latches())
        .map(|i| map.latch(model, k, i))
        .collect();
    solver.add_observed_tuple(&tuple);
}

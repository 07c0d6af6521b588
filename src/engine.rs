//! Ties the frame encoder, the simple-path regimes, and the SAT backend
//! together into the bounded-model-checking search loop.
//!
//! `EngineContext` owns exactly one [`AigModel`], one [`LiteralMap`] sized
//! for it, and one boxed [`SatBackend`] for the run's whole lifetime —
//! there is no per-bound rebuild; each new bound only adds clauses on top
//! of what is already there.

use std::cmp::Ordering;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::time::Instant;

use crate::aig::AigModel;
use crate::cli::Flags;
use crate::cnf;
use crate::litmap::{LiteralMap, SatLit};
use crate::regime::{self, Regime};
use crate::sat::{SatBackend, SatResult, SeenPairs, TwoWatchSolver};

/// Past this many observer-driven conflicts, MIX gives up on the
/// all-different observer for the rest of the run.
const MIX_OBSERVER_BUDGET: u64 = 10_000;

/// Per-`step` increment to the observer's conflict budget while MIX is
/// still using it.
const MIX_STEP_INCREMENT: u64 = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// A counterexample of length `k+1` was found.
    Reachable(u32),
    /// The property was proved by k-induction at bound `k`.
    Inductive(u32),
    /// `maxk` was exhausted without a verdict.
    Unknown,
}

pub struct EngineContext {
    model: AigModel,
    map: LiteralMap,
    solver: Box<dyn SatBackend>,
    flags: Flags,

    /// Whether the observer is still in play. Starts at
    /// `flags.regime.starts_with_observer()`; MIX can flip this to `false`
    /// exactly once, permanently, for the rest of the run.
    observer_mode: bool,

    /// Append-only list of bound indices that have had a model read off
    /// them by the refinement loop.
    frames: Vec<u32>,
    seen_pairs: SeenPairs,
    refinement_count: u64,

    start: Instant,
}

impl EngineContext {
    pub fn new(model: AigModel, flags: Flags) -> Self {
        Self::with_backend(model, flags, Box::new(TwoWatchSolver::new()))
    }

    /// Same as [`Self::new`], but with the SAT backend supplied by the
    /// caller instead of always instantiating [`TwoWatchSolver`]. Exists so
    /// tests can drive the engine against an instrumented stub backend (to
    /// check that the refinement counter matches the number of `diffs`
    /// invocations the backend actually observed) without duplicating any
    /// of the search logic above.
    pub fn with_backend(model: AigModel, flags: Flags, mut solver: Box<dyn SatBackend>) -> Self {
        let map = LiteralMap::new(&model, flags.regime.reserves_diff_region());
        let observer_mode = flags.regime.starts_with_observer();
        if !observer_mode {
            solver.disable_observer();
        }
        EngineContext {
            model,
            map,
            solver,
            flags,
            observer_mode,
            frames: Vec::new(),
            seen_pairs: SeenPairs::default(),
            refinement_count: 0,
            start: Instant::now(),
        }
    }

    fn is_refinement_active(&self) -> bool {
        match self.flags.regime {
            Regime::Refinement => true,
            Regime::Mix => !self.observer_mode,
            _ => false,
        }
    }

    /// Wire frame `k`'s latch inputs to frame `k-1`'s computed next-state
    /// literals. A no-op at `k == 0`: frame 0's latches are free variables
    /// pinned only by `base`'s initial-state assumptions/clauses.
    fn connect(&mut self, k: u32) {
        if k == 0 {
            return;
        }
        for i in 0..self.model.num_latches() {
            let prev_next = self.map.next(&self.model, k - 1, i);
            let cur_latch = self.map.latch(&self.model, k, i);
            cnf::eq(&mut *self.solver, cur_latch, prev_next);
        }
        self.report(2, k, "connect");
    }

    /// Emit frame `k`'s combinational logic: every AND gate, plus (for
    /// `k > 0`) the "at least one latch is true" clause and the forbidding
    /// of an earlier bad output, mirroring `mcaiger.c`'s `encode`.
    fn encode(&mut self, k: u32) {
        if k == 0 {
            // Variable 1 is the shared constant backing literal map 0/1
            // (litmap.rs): `lit(k, 1)` is `-var1`, so this pins var1 false
            // and `lit(k, 0) == +var1` reads as the constant false output
            // AIGER literal 0 denotes.
            let true_lit = self.map.lit(k, 1);
            cnf::unary(&mut *self.solver, true_lit);
        }
        for gate in &self.model.ands {
            let lhs = self.map.lit(k, gate.lhs);
            let rhs0 = self.map.lit(k, gate.rhs0);
            let rhs1 = self.map.lit(k, gate.rhs1);
            cnf::and_gate(&mut *self.solver, lhs, rhs0, rhs1);
        }
        if k > 0 {
            let at_least_one: Vec<SatLit> = (0..self.model.num_latches())
                .map(|i| self.map.latch(&self.model, k, i))
                .collect();
            if !at_least_one.is_empty() {
                self.solver.add_clause(&at_least_one);
            }
            let prev_bad = self.map.output(&self.model, k - 1);
            cnf::unary(&mut *self.solver, -prev_bad);
        }
        self.report(2, k, "encode");
    }

    /// Dispatch to whichever simple-path encoding the active regime wants
    /// eagerly emitted at bound `k`. REFINEMENT emits nothing here; it
    /// reacts to duplicate frames found inside `sat_query` instead.
    fn simple(&mut self, k: u32) {
        match self.flags.regime {
            Regime::None => {}
            Regime::ClassicalDiff => {
                regime::diffsk(&mut *self.solver, &self.map, &self.model, k);
                self.report(2, k, "diffsk");
            }
            Regime::AllDiffObserver => {
                regime::ado(&mut *self.solver, &self.map, &self.model, k);
                self.report(2, k, "ado");
            }
            Regime::Refinement => {}
            Regime::Mix => {
                if self.observer_mode {
                    regime::ado(&mut *self.solver, &self.map, &self.model, k);
                    self.report(2, k, "ado");
                }
            }
        }
    }

    /// Check MIX's observer-conflict budget once per bound, before
    /// `connect`/`encode`/`simple` run.
    fn maybe_switch_mix(&mut self) {
        if self.flags.regime == Regime::Mix
            && self.observer_mode
            && self.solver.observer_conflicts() >= MIX_OBSERVER_BUDGET
        {
            self.switch_mix_to_refinement();
        }
    }

    fn switch_mix_to_refinement(&mut self) {
        debug_assert_eq!(self.flags.regime, Regime::Mix);
        if self.observer_mode {
            self.observer_mode = false;
            self.solver.disable_observer();
            self.report(1, 0, "mix: switching to refinement");
        }
    }

    /// Lexicographic comparison of two recorded frames' latch valuations,
    /// used to sort `frames[]` before scanning for an adjacent duplicate.
    /// Unassigned (`0`) sorts as its own bucket, never equal to either a
    /// `true` or `false` literal.
    fn cmp_frames(&self, a: u32, b: u32) -> Ordering {
        for i in 0..self.model.num_latches() {
            let va = self.solver.value(self.map.latch(&self.model, a, i));
            let vb = self.solver.value(self.map.latch(&self.model, b, i));
            if va != vb {
                return va.cmp(&vb);
            }
        }
        Ordering::Equal
    }

    fn find_duplicate_frame_pair(&self) -> Option<(u32, u32)> {
        let mut ordered = self.frames.clone();
        ordered.sort_by(|&a, &b| self.cmp_frames(a, b));
        ordered
            .windows(2)
            .find(|w| self.cmp_frames(w[0], w[1]) == Ordering::Equal)
            .map(|w| (w[0], w[1]))
    }

    /// Run `solve_assuming`, reacting to a duplicate reachable frame by
    /// emitting `diffs` and retrying, and to MIX's observer giving up by
    /// switching to REFINEMENT and retrying. Assumptions are one-shot per
    /// call and so are simply reissued unchanged on every retry — see
    /// DESIGN.md for why this departs from a literal reading of the
    /// original restart.
    fn sat_query(&mut self, k: u32, assumptions: &[SatLit]) -> SatResult {
        loop {
            let refinement_active = self.is_refinement_active();
            if refinement_active && self.frames.last() != Some(&k) {
                self.frames.push(k);
            }

            match self.solver.solve_assuming(assumptions) {
                SatResult::Unsat => return SatResult::Unsat,
                SatResult::Unknown => {
                    self.switch_mix_to_refinement();
                    continue;
                }
                SatResult::Sat if !refinement_active => return SatResult::Sat,
                SatResult::Sat => match self.find_duplicate_frame_pair() {
                    Some((a, b)) if self.seen_pairs.insert(a, b) => {
                        regime::diffs(&mut *self.solver, &self.map, &self.model, a, b);
                        self.refinement_count += 1;
                        continue;
                    }
                    _ => return SatResult::Sat,
                },
            }
        }
    }

    /// The bound's step query: is it impossible for the bad output to fire
    /// at frame `k` given only the transition relation (no initial-state
    /// pinning)? `true` means the property is proved inductive at `k`.
    fn step(&mut self, k: u32) -> bool {
        if self.flags.regime == Regime::Mix && self.observer_mode {
            let limit = self.solver.observer_conflicts() + MIX_STEP_INCREMENT;
            self.solver.set_observer_limit(limit);
        }
        let bad = self.map.output(&self.model, k);
        self.report(1, k, "step");
        self.sat_query(k, &[bad]) == SatResult::Unsat
    }

    /// The bound's base query: is the bad output reachable from the
    /// all-zero initial state within `k` steps? `true` means a
    /// counterexample was found.
    fn base(&mut self, k: u32) -> bool {
        if self.observer_mode {
            self.solver.disable_observer();
        }
        let mut assumptions = Vec::new();
        if self.flags.base_only {
            if k == 0 {
                for i in 0..self.model.num_latches() {
                    let l = -self.map.latch(&self.model, 0, i);
                    cnf::unary(&mut *self.solver, l);
                }
            }
        } else {
            for i in 0..self.model.num_latches() {
                assumptions.push(-self.map.latch(&self.model, 0, i));
            }
        }
        assumptions.push(self.map.output(&self.model, k));
        self.report(1, k, "base");
        let res = self.sat_query(k, &assumptions) == SatResult::Sat;
        if self.observer_mode {
            self.solver.enable_observer();
        }
        res
    }

    /// The main bound-by-bound search.
    pub fn run(&mut self, signal_flag: &AtomicBool) -> Verdict {
        for k in 0..=self.flags.maxk {
            if signal_flag.load(AtomicOrdering::Relaxed) {
                self.dump_stats();
                crate::signals::reraise_caught();
            }

            self.maybe_switch_mix();
            self.connect(k);
            self.encode(k);
            self.simple(k);

            if !self.flags.base_only && self.step(k) {
                self.report(0, k, "inductive");
                return Verdict::Inductive(k);
            }

            if self.flags.base_only && self.solver.inconsistent() {
                self.report(0, k, "inconsistent under the transition relation alone");
                return Verdict::Inductive(k);
            }

            if !self.flags.induction_only && self.base(k) {
                self.report(0, k, "reachable");
                return Verdict::Reachable(k);
            }
        }
        Verdict::Unknown
    }

    pub fn print_witness(&self, k: u32) {
        crate::witness::print_witness(&*self.solver, &self.map, &self.model, k);
    }

    pub fn refinement_count(&self) -> u64 {
        self.refinement_count
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }

    fn report(&self, level: u8, k: u32, phase: &str) {
        if self.flags.verbosity > level {
            eprintln!(
                "[bmc] {:>7.2}s {:>4} {}",
                self.start.elapsed().as_secs_f64(),
                k,
                phase
            );
        }
    }

    fn dump_stats(&self) {
        if self.flags.verbosity > 1 {
            eprintln!(
                "[bmc] caught signal after {:>7.2}s: {} vars, {} clauses, {} refinement round(s)",
                self.start.elapsed().as_secs_f64(),
                self.solver.num_vars(),
                self.solver.num_clauses(),
                self.refinement_count
            );
        }
    }
}

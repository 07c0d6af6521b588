//! The witness/stimulus printer: `k+1` lines of `num_inputs`
//! characters, one `0`/`1`/`x` per input, read straight off the model the
//! solver left on its trail after the winning `base` call.

use crate::aig::AigModel;
use crate::litmap::LiteralMap;
use crate::sat::SatBackend;

/// Print the stimulus for a counterexample of length `k + 1` to stdout.
/// Must be called immediately after the `solve_assuming` call that
/// produced the counterexample — nothing else may touch the solver first,
/// since `add_clause` resets the trail back to decision level 0.
pub fn print_witness(solver: &dyn SatBackend, map: &LiteralMap, model: &AigModel, k: u32) {
    for frame in 0..=k {
        let mut line = String::with_capacity(model.num_inputs());
        for i in 0..model.num_inputs() {
            let lit = map.input(model, frame, i);
            line.push(match solver.value(lit) {
                1 => '1',
                -1 => '0',
                _ => 'x',
            });
        }
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aig::{AndGate, Latch};
    use crate::sat::TwoWatchSolver;

    fn one_input_model() -> AigModel {
        AigModel {
            maxvar: 2,
            inputs: vec![2],
            latches: vec![Latch { lit: 4, next: 4 }],
            ands: Vec::<AndGate>::new(),
            output: 0,
        }
    }

    #[test]
    fn unassigned_inputs_print_as_x() {
        let model = one_input_model();
        let map = LiteralMap::new(&model, false);
        let s = TwoWatchSolver::new();
        // Nothing has been solved yet, so every input literal is unassigned.
        assert_eq!(s.value(map.input(&model, 0, 0)), 0);
    }
}

//! The literal map: the bijection between `(frame k, circuit literal ℓ)`
//! and solver variables.
//!
//! There is no graph of frame objects anywhere in this crate — cyclic
//! back-references between a frame's `next` and the following frame's
//! `latch` are expressed purely by this arithmetic offset function.

use crate::aig::AigModel;

/// A signed, DIMACS-style literal as handed to the SAT backend.
pub type SatLit = i64;

/// Whether the active simple-path regime reserves a per-pair
/// difference-variable region inside every frame's variable block.
///
/// This flag is read once at session start and frozen: MIX reserves the
/// region from the start (it may need it the moment it falls back to
/// REFINEMENT), so indexing never has to be recomputed mid-run even though
/// the *regime* tag itself changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiteralMap {
    maxvar: u32,
    num_latches: u32,
    reserve_diffs: bool,
}

impl LiteralMap {
    pub fn new(model: &AigModel, reserve_diffs: bool) -> Self {
        Self {
            maxvar: model.maxvar,
            num_latches: model.num_latches() as u32,
            reserve_diffs,
        }
    }

    /// Base solver-variable index of frame `k`.
    pub fn frame(&self, k: u32) -> i64 {
        let mut res = k as i64 * self.maxvar as i64 + 2;
        if self.reserve_diffs {
            let n = self.num_latches as i64;
            let k = k as i64;
            res += n * k * (k - 1) / 2;
        }
        res
    }

    /// The signed solver literal for AIG literal `l` at frame `k`.
    pub fn lit(&self, k: u32, l: u32) -> SatLit {
        let res = if l <= 1 {
            1
        } else {
            self.frame(k) + ((l - 2) / 2) as i64
        };
        if l & 1 == 1 { -res } else { res }
    }

    pub fn input(&self, model: &AigModel, k: u32, i: usize) -> SatLit {
        self.lit(k, model.inputs[i])
    }

    pub fn latch(&self, model: &AigModel, k: u32, i: usize) -> SatLit {
        self.lit(k, model.latches[i].lit)
    }

    pub fn next(&self, model: &AigModel, k: u32, i: usize) -> SatLit {
        self.lit(k, model.latches[i].next)
    }

    pub fn output(&self, model: &AigModel, k: u32) -> SatLit {
        self.lit(k, model.output)
    }

    /// Solver variable reserved for the `l`-th difference bit between
    /// frame `k` and earlier frame `l_frame` (the CLASSICAL-DIFF encoding).
    /// Lives just past frame `k+1`'s own block, reused by both the eager
    /// CLASSICAL-DIFF encoding and lazy REFINEMENT's `diffs` calls.
    pub fn diff_var(&self, k: u32, l_frame: u32, i: usize) -> i64 {
        debug_assert!(l_frame < k);
        self.frame(k + 1) - i as i64 - l_frame as i64 * self.num_latches as i64 - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aig::AigModel;

    fn model_with(maxvar: u32, num_latches: usize) -> AigModel {
        AigModel {
            maxvar,
            inputs: Vec::new(),
            latches: (0..num_latches)
                .map(|i| crate::aig::Latch {
                    lit: 2 * (i as u32 + 1),
                    next: 2 * (i as u32 + 1),
                })
                .collect(),
            ands: Vec::new(),
            output: 0,
        }
    }

    #[test]
    fn constants_are_shared_across_frames() {
        let model = model_with(4, 2);
        let map = LiteralMap::new(&model, false);
        assert_eq!(map.lit(0, 0), -1);
        assert_eq!(map.lit(0, 1), 1);
        assert_eq!(map.lit(7, 0), -1);
        assert_eq!(map.lit(7, 1), 1);
    }

    #[test]
    fn distinct_frames_get_distinct_variables() {
        let model = model_with(4, 2);
        let map = LiteralMap::new(&model, false);
        assert_ne!(map.lit(0, 2).abs(), map.lit(1, 2).abs());
        assert_ne!(map.lit(1, 2).abs(), map.lit(2, 2).abs());
    }

    #[test]
    fn sign_depends_only_on_polarity() {
        let model = model_with(4, 2);
        let map = LiteralMap::new(&model, false);
        assert_eq!(map.lit(3, 4), -map.lit(3, 5));
    }

    #[test]
    fn reserve_diffs_grows_frame_base() {
        let model = model_with(4, 2);
        let with = LiteralMap::new(&model, true);
        let without = LiteralMap::new(&model, false);
        assert_eq!(with.frame(0), without.frame(0));
        assert!(with.frame(2) > without.frame(2));
    }
}

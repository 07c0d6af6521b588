//! Command-line parsing and validation.
//!
//! The positional arguments are order-independent: whichever bare token
//! looks like a decimal number is the bound, whichever doesn't is the
//! input path — mirroring the original's `isdigit`-based dispatch rather
//! than clap's usual fixed positional slots. `clap`'s derive macro still
//! owns every *flag*, including `-h`/`--help`'s usual exit-0 behavior; only
//! the two bare trailing tokens get custom classification afterward.

use clap::Parser;
use thiserror::Error;

use crate::regime::Regime;

#[derive(Debug, Error)]
pub enum McError {
    #[error("usage: {0}")]
    Usage(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("{0}")]
    Structural(String),
}

#[derive(Parser, Debug)]
#[command(
    name = "aig-bmc",
    about = "Bounded model checker for AIG sequential circuits",
    disable_version_flag = true
)]
struct RawArgs {
    /// Increase verbosity; repeatable.
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,
    /// Only run base-case queries (forces the NONE simple-path regime).
    #[arg(short = 'b')]
    base_only: bool,
    /// Only run the step (induction) query, skip counterexample search.
    #[arg(short = 'i')]
    induction_only: bool,
    /// Use the ALL-DIFF-OBSERVER simple-path regime.
    #[arg(short = 'a')]
    all_diff_observer: bool,
    /// Use the CLASSICAL-DIFF simple-path regime.
    #[arg(short = 'd')]
    classical_diff: bool,
    /// Use the REFINEMENT simple-path regime.
    #[arg(short = 'r')]
    refinement: bool,
    /// Use the MIX simple-path regime.
    #[arg(short = 'm')]
    mix: bool,
    /// Disable simple-path strengthening entirely.
    #[arg(short = 'n')]
    none: bool,
    /// Print a stimulus witness alongside a counterexample verdict.
    #[arg(short = 'w')]
    witness: bool,
    /// Bound (decimal) and/or input path, in either order; stdin if no path.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    rest: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Flags {
    pub verbosity: u8,
    pub base_only: bool,
    pub induction_only: bool,
    pub witness: bool,
    pub maxk: u32,
    pub path: Option<String>,
    pub regime: Regime,
}

impl Flags {
    /// Parse and validate argv (including the program name at index 0),
    /// the way `std::env::args()` hands it over.
    pub fn parse_and_validate<I, T>(args: I) -> Result<Flags, McError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let raw = RawArgs::try_parse_from(args).unwrap_or_else(|e| e.exit());

        let mut maxk: Option<u32> = None;
        let mut path: Option<String> = None;
        for tok in raw.rest {
            let looks_numeric = tok.chars().next().is_some_and(|c| c.is_ascii_digit());
            if looks_numeric {
                let v: u32 = tok
                    .parse()
                    .map_err(|_| McError::Usage(format!("invalid bound '{tok}'")))?;
                maxk = Some(v);
            } else if let Some(existing) = &path {
                return Err(McError::Usage(format!(
                    "multiple input files '{existing}' and '{tok}'"
                )));
            } else {
                path = Some(tok);
            }
        }

        if raw.induction_only && raw.base_only {
            return Err(McError::Usage(
                "'-i' and '-b' can not be combined".to_string(),
            ));
        }

        let regime_count = [
            raw.classical_diff,
            raw.all_diff_observer,
            raw.refinement,
            raw.mix,
            raw.none,
        ]
        .iter()
        .filter(|&&b| b)
        .count();
        if regime_count > 1 {
            return Err(McError::Usage(
                "at most one of '-a', '-d', '-r', '-m', '-n' can be used".to_string(),
            ));
        }
        if raw.base_only && regime_count > 0 && !raw.none {
            return Err(McError::Usage(
                "'-b' can only be combined with '-n', not with another simple-path regime"
                    .to_string(),
            ));
        }

        let regime = if raw.base_only {
            Regime::None
        } else if raw.classical_diff {
            Regime::ClassicalDiff
        } else if raw.refinement {
            Regime::Refinement
        } else if raw.mix {
            Regime::Mix
        } else if raw.none {
            Regime::None
        } else {
            Regime::AllDiffObserver
        };

        Ok(Flags {
            verbosity: raw.verbose,
            base_only: raw.base_only,
            induction_only: raw.induction_only,
            witness: raw.witness,
            maxk: maxk.unwrap_or(u32::MAX),
            path,
            regime,
        })
    }
}

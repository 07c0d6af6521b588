use aig_bmc::aig::{AigError, AigModel};
use aig_bmc::cli::{Flags, McError};
use aig_bmc::engine::{EngineContext, Verdict};
use aig_bmc::regime::Regime;
use aig_bmc::signals;

fn main() {
    std::process::exit(run());
}

fn run() -> i32 {
    let flags = match Flags::parse_and_validate(std::env::args()) {
        Ok(f) => f,
        Err(e) => {
            die(&e);
        }
    };

    let model = match AigModel::parse_from(flags.path.as_deref()) {
        Ok(m) => m,
        Err(e) => {
            die(&match e {
                AigError::Parse(msg) => McError::Parse(msg),
                AigError::Structural(msg) => McError::Structural(msg),
            });
        }
    };

    eprintln!(
        "[bmc] {} maxvar, {} inputs, {} latches, 1 output, {} ands",
        model.maxvar,
        model.num_inputs(),
        model.num_latches(),
        model.num_ands()
    );

    let verbosity = flags.verbosity;
    let witness_requested = flags.witness;
    let regime = flags.regime;

    let signal_flag = match signals::install() {
        Ok(flag) => flag,
        Err(e) => {
            eprintln!("[bmc] warning: could not install signal handlers: {e}");
            std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false))
        }
    };

    let mut engine = EngineContext::new(model, flags);
    let verdict = engine.run(&signal_flag);

    let exit_code = match verdict {
        Verdict::Inductive(k) => {
            println!("0");
            let _ = k;
            20
        }
        Verdict::Reachable(k) => {
            println!("1");
            if witness_requested {
                engine.print_witness(k);
            }
            10
        }
        Verdict::Unknown => {
            println!("2");
            0
        }
    };

    if matches!(regime, Regime::Refinement | Regime::Mix) && verbosity >= 1 {
        eprintln!(
            "[bmc] {} refinement(s) of simple path constraints",
            engine.refinement_count()
        );
    }
    if verbosity >= 1 {
        eprintln!("[bmc] {:.1} seconds", engine.elapsed_secs());
    }

    exit_code
}

fn die(e: &McError) -> ! {
    eprintln!("[bmc] {e}");
    std::process::exit(1);
}

//! Fatal-signal handling: a background thread turns
//! SIGINT/SIGTERM/SIGHUP into a flag the main search loop polls once per
//! bound, so a dump of solver stats always happens on the same thread and
//! at the same safe point the rest of the engine already checks into —
//! never inside an actual signal handler.

use std::io;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::Arc;

use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
use signal_hook::iterator::Signals;

static CAUGHT_SIGNAL: AtomicI32 = AtomicI32::new(0);

/// Spawn the signal-watching thread and hand back the flag the engine's
/// main loop polls. Returns `Err` if the underlying `signal()` syscalls
/// fail, which the caller treats as non-fatal — a run without signal
/// handling is still a correct run, just not an orderly-interruptible one.
pub fn install() -> io::Result<Arc<AtomicBool>> {
    let flag = Arc::new(AtomicBool::new(false));
    let mut signals = Signals::new([SIGINT, SIGTERM, SIGHUP])?;
    let watcher_flag = Arc::clone(&flag);
    std::thread::spawn(move || {
        for sig in signals.forever() {
            CAUGHT_SIGNAL.store(sig, Ordering::SeqCst);
            watcher_flag.store(true, Ordering::SeqCst);
        }
    });
    Ok(flag)
}

/// Re-raise whichever of SIGINT/SIGTERM/SIGHUP was last observed, giving
/// it back its default disposition (terminating the process) instead of
/// swallowing it — the engine only ever uses the flag to get one last
/// orderly stats dump in first.
pub fn reraise_caught() -> ! {
    let sig = CAUGHT_SIGNAL.load(Ordering::SeqCst);
    if sig != 0 {
        let _ = signal_hook::low_level::emulate_default_handler(sig);
    }
    std::process::exit(128 + sig.max(0));
}

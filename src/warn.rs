//! Printing warnings to stderr. Builtins never fail a render; where
//! they degrade (an unresolved path, a number that won't parse, a
//! puzzle renderer error) they say so here instead, unless the
//! request's `Config::log_degraded` is off. `DO_WARN` switches off all
//! warnings of the process.

use std::cell::Cell;
use std::sync::atomic::{AtomicBool, Ordering};

pub static DO_WARN: AtomicBool = AtomicBool::new(true);

thread_local! {
    static ISSUED: Cell<usize> = Cell::new(0);
}

pub fn set_warnings_enabled(on: bool) {
    DO_WARN.store(on, Ordering::SeqCst);
}

pub fn warnings_enabled() -> bool {
    DO_WARN.load(Ordering::Relaxed)
}

/// Number of warnings printed by the current thread so far.
pub fn warnings_issued() -> usize {
    ISSUED.with(|n| n.get())
}

#[doc(hidden)]
pub fn count_issued() {
    ISSUED.with(|n| n.set(n.get() + 1));
}

#[macro_export]
macro_rules! warn {
    ($formatstr:expr $(,$arg:expr)*) => { {
        if $crate::warn::warnings_enabled() {
            use std::io::Write;
            $crate::warn::count_issued();
            let mut outp = std::io::BufWriter::new(std::io::stderr().lock());
            let _ = write!(&mut outp, "W: ");
            let _ = write!(&mut outp, $formatstr $(,$arg)*);
            let _ = writeln!(&mut outp, " at {:?} line {}", file!(), line!());
            let _ = outp.flush();
        }
    } }
}

/// `warn!` only if `$on` holds.
#[macro_export]
macro_rules! warn_if {
    ($on:expr, $formatstr:expr $(,$arg:expr)*) => { {
        if $on {
            $crate::warn!($formatstr $(,$arg)*);
        }
    } }
}

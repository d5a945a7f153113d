//! Panic-hook adapter.
//!
//! Routes the host runtime's uncaught-error channel (the process panic hook)
//! into the fallback trap.

use crate::trap::FallbackTrap;
use std::sync::Arc;

/// Install a process panic hook that feeds panics into the trap.
///
/// The previously installed hook is preserved and invoked afterwards, so the
/// default panic output (backtrace printing) is unchanged. The trap itself
/// never panics, which matters here: a panic raised while processing a panic
/// would abort the process.
pub fn install_panic_hook(trap: Arc<FallbackTrap>) {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        trap.handle(fault_types::FaultReport::from_panic(info));
        previous(info);
    }));
}

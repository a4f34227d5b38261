//! Cooperative cancellation shared between the signal handler and workers.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::warn;

/// Flag set once when the run must stop.
///
/// Clones share the same flag. Subprocess waits poll it and kill their child
/// when it is set.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Cancel this token on SIGINT/SIGTERM.
    ///
    /// Only one handler can be installed per process; a second call logs a
    /// warning and leaves the first handler in place.
    pub fn install_signal_handler(&self) {
        let token = self.clone();
        if let Err(e) = ctrlc::set_handler(move || token.cancel()) {
            warn!("could not install signal handler: {}", e);
        }
    }
}

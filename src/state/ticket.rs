//! Per-request cancellation flag.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Raised by the caller when it stops waiting for a request.
///
/// The controller checks the ticket before committing a detection outcome;
/// a raised ticket means the outcome is discarded.
#[derive(Debug, Clone, Default)]
pub struct CancelTicket(Arc<AtomicBool>);

impl CancelTicket {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the request as abandoned.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

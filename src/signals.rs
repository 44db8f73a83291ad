//! The coarse UI status surface: one busy flag, one error slot.
//!
//! Every remote operation's failure path funnels through [`StatusSignals`],
//! which classifies the outcome: authentication failures request a session
//! reset and never surface as text, everything else replaces the single
//! user-visible error message. The busy flag is deliberately coarse
//! (last-write-wins, no operation identity), but its release is guaranteed
//! by an RAII guard regardless of how the operation ends.

use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::api::ApiError;

/// What the error channel decided about a failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureDisposition {
    /// Authentication failure: the caller must perform the total session
    /// reset. No message was surfaced.
    SessionRevoked,
    /// The failure's message is now the current user-visible error.
    Surfaced,
}

#[derive(Default)]
struct Inner {
    busy: AtomicBool,
    error: Mutex<Option<String>>,
}

/// Shared busy/error surface, cheap to clone into background tasks.
#[derive(Clone, Default)]
pub struct StatusSignals {
    inner: Arc<Inner>,
}

impl StatusSignals {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raises the busy flag; the returned guard lowers it on drop.
    ///
    /// Concurrent guards overlap on the same flag: the first drop lowers
    /// it even if another operation is still in flight. That coarsening
    /// matches the one-global-indicator contract.
    #[must_use]
    pub fn begin_busy(&self) -> BusyGuard {
        self.inner.busy.store(true, Ordering::SeqCst);
        BusyGuard {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Whether a busy window is currently open.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.inner.busy.load(Ordering::SeqCst)
    }

    /// The current user-visible error, if one is showing.
    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.inner.error.lock().clone()
    }

    /// Clears the error slot; called on every successful operation.
    pub fn clear_error(&self) {
        *self.inner.error.lock() = None;
    }

    /// Classifies a failure and updates the error slot accordingly.
    ///
    /// This is the single chokepoint for failure policy. Authentication
    /// failures leave the slot untouched (the caller resets everything,
    /// slot included); all other failures replace whatever message was
    /// showing. Exactly one error is visible at a time.
    pub fn absorb(&self, err: &ApiError) -> FailureDisposition {
        match err.surface_message() {
            None => FailureDisposition::SessionRevoked,
            Some(message) => {
                *self.inner.error.lock() = Some(message);
                FailureDisposition::Surfaced
            }
        }
    }
}

impl std::fmt::Debug for StatusSignals {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusSignals")
            .field("busy", &self.is_busy())
            .field("error", &self.error())
            .finish()
    }
}

/// RAII handle for one busy window.
pub struct BusyGuard {
    inner: Arc<Inner>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.inner.busy.store(false, Ordering::SeqCst);
    }
}

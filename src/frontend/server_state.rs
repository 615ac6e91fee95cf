use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Manages server-wide state: shutdown flag and in-flight request backpressure
#[derive(Clone)]
pub struct ServerState {
    shutdown: Arc<AtomicBool>,
    pending_requests: Arc<AtomicUsize>,
    max_inflight_requests: usize,
}

impl ServerState {
    /// Creates a new ServerState; `max_inflight_requests == 0` disables backpressure
    pub fn new(max_inflight_requests: usize) -> Self {
        Self {
            shutdown: Arc::new(AtomicBool::new(false)),
            pending_requests: Arc::new(AtomicUsize::new(0)),
            max_inflight_requests,
        }
    }

    /// Returns true if the server is shutting down
    pub fn is_shutting_down(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }

    /// Signals that the server should start shutting down
    pub fn signal_shutdown(&self) {
        self.shutdown.store(true, Ordering::Release);
    }

    /// Call when a request starts being handled
    pub fn increment_pending(&self) {
        self.pending_requests.fetch_add(1, Ordering::Relaxed);
    }

    /// Call when a request has been answered
    pub fn decrement_pending(&self) {
        self.pending_requests.fetch_sub(1, Ordering::Relaxed);
    }

    pub fn pending_requests_count(&self) -> usize {
        self.pending_requests.load(Ordering::Relaxed)
    }

    /// True once in-flight requests reach the configured ceiling.
    pub fn is_under_pressure(&self) -> bool {
        if self.max_inflight_requests == 0 {
            return false;
        }

        let pending = self.pending_requests.load(Ordering::Relaxed);
        if pending > 0 {
            tracing::debug!(
                target: "marquee::backpressure",
                pending = pending,
                limit = self.max_inflight_requests,
                "Backpressure check"
            );
        }

        pending >= self.max_inflight_requests
    }
}

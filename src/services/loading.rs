//! Global loading/busy indicator
//!
//! Reference-counted show/hide with a watch channel for subscribers and a
//! safety timeout that force-clears the indicator if some caller never
//! hides it.

use crate::services::BusyIndicator;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

const SAFETY_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Default)]
struct GateState {
    request_count: usize,
    safety: Option<JoinHandle<()>>,
}

struct GateShared {
    tx: watch::Sender<bool>,
    state: Mutex<GateState>,
    safety_timeout: Duration,
}

impl GateShared {
    fn force_reset(&self) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.request_count = 0;
        if let Some(handle) = state.safety.take() {
            handle.abort();
        }
        let _ = self.tx.send(false);
    }
}

/// Busy-indicator holder with request counting.
///
/// `show`/`hide` pairs nest; the indicator clears when the last request
/// hides, on `reset`, or when the safety timeout fires.
#[derive(Clone)]
pub struct LoadingGate {
    shared: Arc<GateShared>,
}

impl Default for LoadingGate {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadingGate {
    pub fn new() -> Self {
        Self::with_safety_timeout(SAFETY_TIMEOUT)
    }

    pub fn with_safety_timeout(safety_timeout: Duration) -> Self {
        let (tx, _) = watch::channel(false);
        Self {
            shared: Arc::new(GateShared {
                tx,
                state: Mutex::new(GateState::default()),
                safety_timeout,
            }),
        }
    }

    /// Subscribe to busy-state changes.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.shared.tx.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        *self.shared.tx.borrow()
    }

    /// Mark one more request in flight and show the indicator.
    pub fn show(&self) {
        let mut state = self.shared.state.lock().unwrap_or_else(|e| e.into_inner());
        state.request_count += 1;
        tracing::debug!(request_count = state.request_count, "loading show");
        let _ = self.shared.tx.send(true);

        if state.safety.is_none() {
            let shared = Arc::clone(&self.shared);
            let timeout = self.shared.safety_timeout;
            state.safety = Some(tokio::spawn(async move {
                tokio::time::sleep(timeout).await;
                tracing::warn!("loading safety timeout reached, force-clearing indicator");
                shared.force_reset();
            }));
        }
    }

    /// Mark one request done; hides the indicator when none remain.
    pub fn hide(&self) {
        let mut state = self.shared.state.lock().unwrap_or_else(|e| e.into_inner());
        state.request_count = state.request_count.saturating_sub(1);
        tracing::debug!(request_count = state.request_count, "loading hide");
        if state.request_count == 0 {
            if let Some(handle) = state.safety.take() {
                handle.abort();
            }
            let _ = self.shared.tx.send(false);
        }
    }

    /// Force-clear the indicator regardless of outstanding requests.
    pub fn reset(&self) {
        self.shared.force_reset();
    }
}

impl BusyIndicator for LoadingGate {
    fn set_busy(&self, busy: bool) {
        if busy {
            self.show();
        } else {
            self.hide();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_show_hide_toggles_state() {
        let gate = LoadingGate::new();
        assert!(!gate.is_loading());
        gate.show();
        assert!(gate.is_loading());
        gate.hide();
        assert!(!gate.is_loading());
    }

    #[tokio::test]
    async fn test_nested_requests_keep_indicator_up() {
        let gate = LoadingGate::new();
        gate.show();
        gate.show();
        gate.hide();
        assert!(gate.is_loading());
        gate.hide();
        assert!(!gate.is_loading());
    }

    #[tokio::test]
    async fn test_hide_without_show_stays_clear() {
        let gate = LoadingGate::new();
        gate.hide();
        assert!(!gate.is_loading());
    }

    #[tokio::test]
    async fn test_reset_clears_outstanding_requests() {
        let gate = LoadingGate::new();
        gate.show();
        gate.show();
        gate.reset();
        assert!(!gate.is_loading());
    }

    #[tokio::test]
    async fn test_subscribers_observe_changes() {
        let gate = LoadingGate::new();
        let mut rx = gate.subscribe();
        gate.show();
        rx.changed().await.unwrap();
        assert!(*rx.borrow());
        gate.hide();
        rx.changed().await.unwrap();
        assert!(!*rx.borrow());
    }

    #[tokio::test(start_paused = true)]
    async fn test_safety_timeout_force_clears() {
        let gate = LoadingGate::with_safety_timeout(Duration::from_secs(10));
        gate.show();
        assert!(gate.is_loading());

        tokio::time::sleep(Duration::from_secs(11)).await;
        tokio::task::yield_now().await;
        assert!(!gate.is_loading());
    }
}

// ── Named single-shot timers ──
//
// At most one pending timer per kind. Arming a kind cancels the timer
// previously armed for it. A fired timer leaves the set before its
// action runs, so the action may freely re-arm or cancel timers
// (including its own kind). The lifetime token stops actions that are
// already running.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use dashmap::DashMap;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum TimerKind {
    /// Next poll cycle.
    Poll,
    /// Forced re-login at the end of the session horizon.
    Reauth,
    /// Retry after a failed login.
    LoginRetry,
    /// Login after a failed poll cycle tore the connection down.
    Reconnect,
}

struct ArmedTimer {
    id: u64,
    cancel: CancellationToken,
}

pub struct TimerSet {
    armed: Arc<DashMap<TimerKind, ArmedTimer>>,
    next_id: AtomicU64,
    lifetime: Mutex<CancellationToken>,
}

impl TimerSet {
    pub fn new() -> Self {
        Self {
            armed: Arc::new(DashMap::new()),
            next_id: AtomicU64::new(0),
            lifetime: Mutex::new(CancellationToken::new()),
        }
    }

    /// Run `action` once after `delay`, replacing any pending timer of
    /// the same kind. Must be called inside a Tokio runtime.
    pub fn arm<F>(&self, kind: TimerKind, delay: Duration, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let cancel = CancellationToken::new();
        if let Some(previous) = self.armed.insert(
            kind,
            ArmedTimer {
                id,
                cancel: cancel.clone(),
            },
        ) {
            previous.cancel.cancel();
        }
        trace!(%kind, ?delay, "timer armed");

        let armed = Arc::clone(&self.armed);
        let lifetime = self.lifetime_token();
        tokio::spawn(async move {
            tokio::select! {
                biased;
                () = cancel.cancelled() => return,
                () = tokio::time::sleep(delay) => {}
            }
            if armed.remove_if(&kind, |_, t| t.id == id).is_none() {
                return;
            }
            tokio::select! {
                biased;
                () = lifetime.cancelled() => debug!(%kind, "timer action cancelled"),
                () = action => {}
            }
        });
    }

    /// Cancel the pending timer of one kind, if any.
    pub fn cancel(&self, kind: TimerKind) {
        if let Some((_, timer)) = self.armed.remove(&kind) {
            timer.cancel.cancel();
        }
    }

    /// Cancel every pending timer. Actions already running continue.
    pub fn cancel_all(&self) {
        self.armed.retain(|_, timer| {
            timer.cancel.cancel();
            false
        });
    }

    /// Cancel every pending timer and stop actions already running.
    /// The set stays usable; later timers get a fresh lifetime.
    pub fn shutdown(&self) {
        self.cancel_all();
        let mut lifetime = self.lifetime.lock().unwrap_or_else(PoisonError::into_inner);
        lifetime.cancel();
        *lifetime = CancellationToken::new();
    }

    pub fn is_armed(&self, kind: TimerKind) -> bool {
        self.armed.contains_key(&kind)
    }

    pub fn armed_kinds(&self) -> Vec<TimerKind> {
        self.armed.iter().map(|entry| *entry.key()).collect()
    }

    fn lifetime_token(&self) -> CancellationToken {
        self.lifetime
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for TimerSet {
    fn default() -> Self {
        Self::new()
    }
}

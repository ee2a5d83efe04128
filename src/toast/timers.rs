use std::collections::HashMap;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::toast::types::ToastId;

/// Identifies one scheduled removal, so a stale task cannot complete a newer one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerToken(u64);

struct PendingRemoval {
    token: TimerToken,
    handle: JoinHandle<()>,
}

/// Delayed removal scheduler keyed by toast id
///
/// Holds at most one pending removal per id. Dismissals can arrive several
/// times for the same toast (user close, surface auto-close, dismiss-all), and
/// only the first one arms a timer.
pub struct TimerRegistry {
    pending: HashMap<ToastId, PendingRemoval>,
    runtime: Option<Handle>,
    next_token: u64,
}

impl TimerRegistry {
    /// Create a registry bound to the current tokio runtime, if any.
    ///
    /// Without one, each `schedule` call looks up the runtime it runs in.
    pub fn new() -> Self {
        Self::with_runtime(Handle::try_current().ok())
    }

    pub fn with_runtime(runtime: Option<Handle>) -> Self {
        Self {
            pending: HashMap::new(),
            runtime,
            next_token: 0,
        }
    }

    /// Arm a one-shot removal timer for `id`.
    ///
    /// Returns `false` without doing anything when a timer is already pending
    /// for `id` or when no runtime is available. `on_fire` receives the token
    /// it must pass to [`TimerRegistry::complete`].
    pub fn schedule<F>(&mut self, id: ToastId, delay: Duration, on_fire: F) -> bool
    where
        F: FnOnce(TimerToken) + Send + 'static,
    {
        if self.pending.contains_key(&id) {
            debug!("Removal already pending for toast {}", id);
            return false;
        }

        let Some(runtime) = self
            .runtime
            .clone()
            .or_else(|| Handle::try_current().ok())
        else {
            warn!("No tokio runtime available, toast {} will not be auto-removed", id);
            return false;
        };

        self.next_token = self.next_token.wrapping_add(1);
        let token = TimerToken(self.next_token);

        let handle = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            on_fire(token);
        });

        debug!("Scheduled removal of toast {} in {:?}", id, delay);
        self.pending.insert(id, PendingRemoval { token, handle });
        true
    }

    /// Drop the registry entry of a timer that has fired.
    ///
    /// Returns `true` only if `token` still identifies the pending timer for `id`.
    pub fn complete(&mut self, id: &ToastId, token: TimerToken) -> bool {
        match self.pending.get(id) {
            Some(pending) if pending.token == token => {
                self.pending.remove(id);
                true
            }
            _ => false,
        }
    }

    /// Cancel the pending removal for `id`
    pub fn cancel(&mut self, id: &ToastId) -> bool {
        match self.pending.remove(id) {
            Some(pending) => {
                pending.handle.abort();
                debug!("Cancelled removal of toast {}", id);
                true
            }
            None => false,
        }
    }

    /// Cancel every pending removal
    pub fn cancel_all(&mut self) {
        for (_, pending) in self.pending.drain() {
            pending.handle.abort();
        }
    }

    pub fn is_pending(&self, id: &ToastId) -> bool {
        self.pending.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl Default for TimerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TimerRegistry {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

impl std::fmt::Debug for TimerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerRegistry")
            .field("pending", &self.pending.keys().collect::<Vec<_>>())
            .field("has_runtime", &self.runtime.is_some())
            .finish()
    }
}

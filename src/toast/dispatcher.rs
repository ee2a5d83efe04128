//! Toast dispatcher
//!
//! The single mutation entry point: every action is reduced against the
//! current state, its effects are carried out, and the new snapshot is handed
//! to each subscriber in registration order.
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tracing::{debug, trace, warn};

use crate::config::ToasterConfig;
use crate::toast::action::{Action, Effect};
use crate::toast::reducer::{reduce, Reduction};
use crate::toast::subscribers::{Subscriber, SubscriberRegistry, SubscriptionId};
use crate::toast::timers::{TimerRegistry, TimerToken};
use crate::toast::types::{ToastId, ToastState};

struct DispatchCore {
    state: ToastState,
    subscribers: SubscriberRegistry,
    timers: TimerRegistry,
    queue: VecDeque<Action>,
    draining: bool,
    discarded: Option<Vec<ToastId>>,
    limit: usize,
    remove_delay: Duration,
}

/// Shared handle to the toast store, its timers and its subscribers
#[derive(Clone)]
pub struct Dispatcher {
    core: Arc<Mutex<DispatchCore>>,
}

impl Dispatcher {
    pub fn new(config: &ToasterConfig) -> Self {
        Self::with_timers(config, TimerRegistry::new())
    }

    /// Build a dispatcher around an existing timer registry.
    ///
    /// A `limit` of zero is raised to one so an added toast is never dropped
    /// on arrival.
    pub fn with_timers(config: &ToasterConfig, timers: TimerRegistry) -> Self {
        if config.limit == 0 {
            warn!("Toast limit of 0 is not usable, keeping 1 toast instead");
        }
        Self {
            core: Arc::new(Mutex::new(DispatchCore {
                state: ToastState::new(),
                subscribers: SubscriberRegistry::new(),
                timers,
                queue: VecDeque::new(),
                draining: false,
                discarded: None,
                limit: config.limit.max(1),
                remove_delay: config.remove_delay(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, DispatchCore> {
        self.core.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply `action` and notify every subscriber.
    ///
    /// Actions dispatched while a fan-out is running (from a subscriber, or
    /// from another thread) are queued and applied in arrival order once the
    /// current fan-out returns.
    pub fn dispatch(&self, action: Action) {
        {
            let mut core = self.lock();
            core.queue.push_back(action);
            if core.draining {
                trace!("Dispatch in progress, queued action");
                return;
            }
            core.draining = true;
        }

        let _guard = DrainGuard(self);
        while let Some((snapshot, subscribers)) = self.step() {
            for subscriber in subscribers {
                subscriber(&snapshot);
            }
        }
    }

    /// Reduce the next queued action; `None` once the queue is empty
    fn step(&self) -> Option<(ToastState, Vec<Subscriber>)> {
        let mut core = self.lock();
        let Some(action) = core.queue.pop_front() else {
            core.draining = false;
            return None;
        };

        let kind = action.kind();
        let state = std::mem::take(&mut core.state);
        let Reduction { state, effects } = reduce(state, action, core.limit);
        core.state = state;

        for effect in effects {
            self.run_effect(&mut core, effect);
        }

        debug!(
            "Dispatched {} action, {} toast(s) active, notifying {} subscriber(s)",
            kind,
            core.state.len(),
            core.subscribers.len()
        );

        Some((core.state.clone(), core.subscribers.snapshot()))
    }

    fn run_effect(&self, core: &mut DispatchCore, effect: Effect) {
        match effect {
            Effect::ScheduleRemoval(id) => {
                let weak = Arc::downgrade(&self.core);
                let fired_id = id.clone();
                let delay = core.remove_delay;
                core.timers.schedule(id, delay, move |token| {
                    Self::fire_removal(weak, fired_id, token)
                });
            }
            Effect::Discarded(id) => {
                if let Some(discarded) = core.discarded.as_mut() {
                    discarded.push(id);
                }
            }
        }
    }

    fn fire_removal(
        core: Weak<Mutex<DispatchCore>>,
        id: ToastId,
        token: TimerToken,
    ) {
        let Some(core) = core.upgrade() else {
            return;
        };
        let dispatcher = Dispatcher { core };

        if dispatcher.lock().timers.complete(&id, token) {
            debug!("Removal timer fired for toast {}", id);
            dispatcher.dispatch(Action::Remove(Some(id)));
        }
    }

    /// Current toast snapshot
    pub fn state(&self) -> ToastState {
        self.lock().state.clone()
    }

    /// Register a subscriber invoked with the new snapshot after every dispatch
    pub fn subscribe(&self, subscriber: impl Fn(&ToastState) + Send + Sync + 'static) -> SubscriptionId {
        let id = self.lock().subscribers.subscribe(Arc::new(subscriber));
        debug!("Subscriber {:?} registered", id);
        id
    }

    /// Register a subscriber built from the current snapshot.
    ///
    /// `make` runs under the same lock as the registration, so no dispatch
    /// can land between the seed it observes and the first notification.
    pub fn subscribe_seeded<S, R>(
        &self,
        make: impl FnOnce(&ToastState) -> (S, R),
    ) -> (SubscriptionId, R)
    where
        S: Fn(&ToastState) + Send + Sync + 'static,
    {
        let mut core = self.lock();
        let (subscriber, seeded) = make(&core.state);
        let id = core.subscribers.subscribe(Arc::new(subscriber));
        drop(core);

        debug!("Seeded subscriber {:?} registered", id);
        (id, seeded)
    }

    /// Remove a subscriber; returns `false` if it was not registered
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let removed = self.lock().subscribers.unsubscribe(id);
        if removed {
            debug!("Subscriber {:?} removed", id);
        }
        removed
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }

    pub fn has_pending_removal(&self, id: &ToastId) -> bool {
        self.lock().timers.is_pending(id)
    }

    pub fn pending_removals(&self) -> usize {
        self.lock().timers.len()
    }

    /// Cancel the scheduled removal of one toast
    pub fn cancel_removal(&self, id: &ToastId) -> bool {
        self.lock().timers.cancel(id)
    }

    /// Cancel every scheduled removal
    pub fn cancel_all_removals(&self) {
        self.lock().timers.cancel_all();
    }

    /// Start recording ids of toasts that leave the sequence
    pub fn track_discarded(&self) {
        let mut core = self.lock();
        if core.discarded.is_none() {
            core.discarded = Some(Vec::new());
        }
    }

    /// Take the ids recorded since the last call
    pub fn take_discarded(&self) -> Vec<ToastId> {
        self.lock()
            .discarded
            .as_mut()
            .map(std::mem::take)
            .unwrap_or_default()
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let core = self.lock();
        f.debug_struct("Dispatcher")
            .field("toasts", &core.state.len())
            .field("subscribers", &core.subscribers)
            .field("timers", &core.timers)
            .finish()
    }
}

/// Releases the draining flag if a subscriber panics mid fan-out
struct DrainGuard<'a>(&'a Dispatcher);

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            self.0.lock().draining = false;
        }
    }
}

use tokio::sync::watch;
use tracing::debug;

use crate::toast::subscribers::SubscriptionId;
use crate::toast::toaster::{ToastHandle, Toaster};
use crate::toast::types::{ToastId, ToastPayload, ToastState};

/// Read model for a display surface.
///
/// Subscribes on mount and is seeded with the current snapshot. Dropping the
/// feed unsubscribes it; other feeds and the shared state are unaffected.
pub struct ToastFeed {
    toaster: Toaster,
    subscription: SubscriptionId,
    receiver: watch::Receiver<ToastState>,
}

impl ToastFeed {
    pub(crate) fn mount(toaster: Toaster) -> Self {
        let (subscription, receiver) = toaster.dispatcher().subscribe_seeded(|state| {
            let (sender, receiver) = watch::channel(state.clone());
            let forward = move |state: &ToastState| {
                sender.send_replace(state.clone());
            };
            (forward, receiver)
        });
        debug!("Toast feed mounted as {:?}", subscription);

        Self {
            toaster,
            subscription,
            receiver,
        }
    }

    /// Latest snapshot seen by this feed
    pub fn toasts(&self) -> ToastState {
        self.receiver.borrow().clone()
    }

    /// Wait for the next state change and return the new snapshot
    pub async fn changed(&mut self) -> Option<ToastState> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }

    pub fn create(&self, payload: ToastPayload) -> ToastHandle {
        self.toaster.create(payload)
    }

    pub fn dismiss(&self, id: Option<&ToastId>) {
        self.toaster.dismiss(id);
    }

    pub fn subscription(&self) -> SubscriptionId {
        self.subscription
    }
}

impl Drop for ToastFeed {
    fn drop(&mut self) {
        self.toaster.dispatcher().unsubscribe(self.subscription);
        debug!("Toast feed {:?} unmounted", self.subscription);
    }
}

impl std::fmt::Debug for ToastFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToastFeed")
            .field("subscription", &self.subscription)
            .field("toasts", &self.receiver.borrow().len())
            .finish()
    }
}

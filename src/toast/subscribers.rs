use std::fmt;
use std::sync::Arc;

use crate::toast::types::ToastState;

/// Callback receiving the full toast snapshot after every dispatch
pub type Subscriber = Arc<dyn Fn(&ToastState) + Send + Sync>;

/// Token returned by [`SubscriberRegistry::subscribe`], used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Ordered set of state subscribers
#[derive(Default)]
pub struct SubscriberRegistry {
    entries: Vec<(SubscriptionId, Subscriber)>,
    next_id: u64,
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber; it is invoked after those registered before it
    pub fn subscribe(&mut self, subscriber: Subscriber) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.entries.push((id, subscriber));
        id
    }

    /// Remove the subscriber registered under `id`; unknown ids are ignored
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    /// Subscribers in registration order
    pub fn snapshot(&self) -> Vec<Subscriber> {
        self.entries
            .iter()
            .map(|(_, subscriber)| subscriber.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for SubscriberRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriberRegistry")
            .field("subscribers", &self.entries.len())
            .finish()
    }
}

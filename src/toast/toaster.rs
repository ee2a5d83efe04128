use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tracing::info;

use crate::config::ToasterConfig;
use crate::toast::action::Action;
use crate::toast::bridge::SurfaceBridge;
use crate::toast::dispatcher::Dispatcher;
use crate::toast::feed::ToastFeed;
use crate::toast::surface::{NullSurface, SurfaceCallback, ToastSurface};
use crate::toast::types::{Toast, ToastId, ToastPatch, ToastPayload, ToastState};

/// Largest toast id before the counter wraps back to 1 (2^53 - 1)
pub const ID_CEILING: u64 = (1 << 53) - 1;

/// Wrapping toast id counter.
///
/// Ids run from 1 to [`ID_CEILING`] and then start over at 1. A toast that is
/// still alive after 2^53 further creations would share its id with a new one;
/// that collision is accepted.
#[derive(Debug, Default)]
pub struct IdGenerator {
    count: AtomicU64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the counter at `count`; the next id is `count + 1` (or 1 at the ceiling)
    pub fn starting_at(count: u64) -> Self {
        Self {
            count: AtomicU64::new(count),
        }
    }

    fn advance(count: u64) -> u64 {
        count % ID_CEILING + 1
    }

    pub fn next_id(&self) -> ToastId {
        let previous = self
            .count
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |count| {
                Some(Self::advance(count))
            })
            .unwrap_or_else(|count| count);
        ToastId::new(Self::advance(previous).to_string())
    }
}

struct ToasterInner {
    config: ToasterConfig,
    dispatcher: Dispatcher,
    bridge: SurfaceBridge,
    ids: IdGenerator,
}

/// Toast context shared by every collaborator.
///
/// Construct one at application start and clone it wherever toasts are
/// created or displayed; clones share the same state, subscribers and surface.
#[derive(Clone)]
pub struct Toaster {
    inner: Arc<ToasterInner>,
}

impl Toaster {
    pub fn new(config: ToasterConfig, surface: Arc<dyn ToastSurface>) -> Self {
        Self::with_id_generator(config, surface, IdGenerator::new())
    }

    /// Toaster without a rendering surface
    pub fn detached(config: ToasterConfig) -> Self {
        Self::new(config, Arc::new(NullSurface::new()))
    }

    pub fn with_id_generator(
        config: ToasterConfig,
        surface: Arc<dyn ToastSurface>,
        ids: IdGenerator,
    ) -> Self {
        let dispatcher = Dispatcher::new(&config);
        dispatcher.track_discarded();
        let bridge = SurfaceBridge::new(surface, config.surface_duration());
        Self {
            inner: Arc::new(ToasterInner {
                config,
                dispatcher,
                bridge,
                ids,
            }),
        }
    }

    /// Create a toast, show it on the surface and return a handle bound to it
    pub fn create(&self, payload: ToastPayload) -> ToastHandle {
        let id = self.inner.ids.next_id();
        let toast = Toast::from_payload(id.clone(), payload);
        info!(
            "Creating toast {} ({:?}): {}",
            id,
            toast.variant,
            toast.title.as_deref().unwrap_or("")
        );

        self.inner.dispatcher.dispatch(Action::Add(toast.clone()));
        self.forget_discarded();
        self.inner.bridge.show(&toast, self.close_hook(id.clone()));

        ToastHandle {
            id,
            toaster: self.clone(),
        }
    }

    /// Merge `patch` into the toast and refresh the surface if the title changed
    pub fn update(&self, id: &ToastId, patch: ToastPatch) {
        self.inner.dispatcher.dispatch(Action::Update {
            id: id.clone(),
            patch: patch.clone(),
        });
        self.inner.bridge.update(id, &patch);
    }

    /// Dismiss one toast, or every toast when `id` is `None`
    pub fn dismiss(&self, id: Option<&ToastId>) {
        self.inner.dispatcher.dispatch(Action::Dismiss(id.cloned()));
        self.inner.bridge.dismiss(id);
    }

    /// Current toast snapshot
    pub fn toasts(&self) -> ToastState {
        self.inner.dispatcher.state()
    }

    /// Mount a display feed that follows every state change until dropped
    pub fn use_toasts(&self) -> ToastFeed {
        ToastFeed::mount(self.clone())
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.inner.dispatcher
    }

    pub fn bridge(&self) -> &SurfaceBridge {
        &self.inner.bridge
    }

    pub fn config(&self) -> &ToasterConfig {
        &self.inner.config
    }

    /// Close surface toasts whose toast was evicted or removed
    fn forget_discarded(&self) {
        let discarded = self.inner.dispatcher.take_discarded();
        if !discarded.is_empty() {
            self.inner.bridge.forget(&discarded);
        }
    }

    fn close_hook(&self, id: ToastId) -> SurfaceCallback {
        let inner: Weak<ToasterInner> = Arc::downgrade(&self.inner);
        SurfaceCallback::new(move || {
            if let Some(inner) = inner.upgrade() {
                Toaster { inner }.dismiss(Some(&id));
            }
        })
    }
}

impl std::fmt::Debug for Toaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Toaster")
            .field("config", &self.inner.config)
            .field("dispatcher", &self.inner.dispatcher)
            .field("surface_ids", &self.inner.bridge.len())
            .finish()
    }
}

/// Handle returned by [`Toaster::create`], scoped to one toast
#[derive(Debug, Clone)]
pub struct ToastHandle {
    id: ToastId,
    toaster: Toaster,
}

impl ToastHandle {
    pub fn id(&self) -> &ToastId {
        &self.id
    }

    pub fn update(&self, patch: ToastPatch) {
        self.toaster.update(&self.id, patch);
    }

    pub fn dismiss(&self) {
        self.toaster.dismiss(Some(&self.id));
    }
}

/// In-memory toast dispatcher
///
/// This module keeps a small, ordered set of transient notifications and
/// keeps every display subscriber and an external rendering surface in sync
/// with it:
///
/// - Pure reducer over a closed set of actions
/// - Delayed removal of dismissed toasts, at most one timer per toast
/// - Synchronous, ordered fan-out of full snapshots to subscribers
/// - Bidirectional id bridge to the rendering surface
/// - `Toaster` context object with scoped toast handles and display feeds
pub mod action;
pub mod bridge;
pub mod dispatcher;
pub mod feed;
pub mod reducer;
pub mod subscribers;
pub mod surface;
pub mod timers;
pub mod toaster;
pub mod types;

pub use action::{Action, Effect};
pub use bridge::SurfaceBridge;
pub use dispatcher::Dispatcher;
pub use feed::ToastFeed;
pub use reducer::{reduce, Reduction};
pub use subscribers::{Subscriber, SubscriberRegistry, SubscriptionId};
pub use surface::{ExternalId, LogSurface, NullSurface, SurfaceCallback, SurfaceRequest, ToastSurface};
pub use timers::{TimerRegistry, TimerToken};
pub use toaster::{IdGenerator, ToastHandle, Toaster, ID_CEILING};
pub use types::{
    ActionCallback, Toast, ToastAction, ToastId, ToastPatch, ToastPayload, ToastState, ToastVariant,
};

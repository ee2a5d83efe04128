//! External rendering surface
//!
//! The surface is the component that actually puts toasts on screen. It keeps
//! its own identifiers and its own timers; the toaster only forwards show and
//! dismiss intents to it.
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::toast::types::ToastAction;

/// Identifier assigned by a rendering surface
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum ExternalId {
    Text(String),
    Numeric(i64),
}

impl fmt::Display for ExternalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExternalId::Text(id) => f.write_str(id),
            ExternalId::Numeric(id) => write!(f, "{}", id),
        }
    }
}

impl From<String> for ExternalId {
    fn from(id: String) -> Self {
        ExternalId::Text(id)
    }
}

impl From<&str> for ExternalId {
    fn from(id: &str) -> Self {
        ExternalId::Text(id.to_string())
    }
}

impl From<i64> for ExternalId {
    fn from(id: i64) -> Self {
        ExternalId::Numeric(id)
    }
}

/// Hook the surface calls when its toast is closed by the user or times out
#[derive(Clone)]
pub struct SurfaceCallback(Arc<dyn Fn() + Send + Sync>);

impl SurfaceCallback {
    pub fn new(callback: impl Fn() + Send + Sync + 'static) -> Self {
        Self(Arc::new(callback))
    }

    pub fn call(&self) {
        (self.0)()
    }
}

impl fmt::Debug for SurfaceCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SurfaceCallback(..)")
    }
}

/// Content and options of a show call
#[derive(Debug, Clone, Default)]
pub struct SurfaceRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    /// Existing surface id to update in place instead of showing a new toast
    pub id: Option<ExternalId>,
    pub duration: Duration,
    pub class_name: Option<String>,
    pub action: Option<ToastAction>,
    pub on_dismiss: Option<SurfaceCallback>,
    pub on_auto_close: Option<SurfaceCallback>,
}

/// Rendering surface the toaster forwards to
pub trait ToastSurface: Send + Sync {
    /// Show a toast, or update the one named by `request.id`
    fn show(&self, request: SurfaceRequest) -> ExternalId;

    /// Show a toast flagged as an error
    fn show_error(&self, request: SurfaceRequest) -> ExternalId {
        self.show(request)
    }

    /// Dismiss one toast, or every toast when `id` is `None`
    fn dismiss(&self, id: Option<&ExternalId>);
}

/// Surface used when nothing is attached; hands out ids and renders nothing
#[derive(Debug, Default)]
pub struct NullSurface {
    next_id: AtomicI64,
}

impl NullSurface {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ToastSurface for NullSurface {
    fn show(&self, request: SurfaceRequest) -> ExternalId {
        request
            .id
            .unwrap_or_else(|| ExternalId::Numeric(self.next_id.fetch_add(1, Ordering::Relaxed) + 1))
    }

    fn dismiss(&self, _id: Option<&ExternalId>) {}
}

/// Surface that renders toasts as log lines
#[derive(Debug, Default)]
pub struct LogSurface {
    next_id: AtomicI64,
}

impl LogSurface {
    pub fn new() -> Self {
        Self::default()
    }

    fn assign(&self, id: Option<ExternalId>) -> ExternalId {
        id.unwrap_or_else(|| ExternalId::Numeric(self.next_id.fetch_add(1, Ordering::Relaxed) + 1))
    }
}

impl ToastSurface for LogSurface {
    fn show(&self, request: SurfaceRequest) -> ExternalId {
        let updating = request.id.is_some();
        let id = self.assign(request.id);
        info!(
            surface_id = %id,
            updating,
            "🔔 {} {}",
            request.title.as_deref().unwrap_or(""),
            request.description.as_deref().unwrap_or("")
        );
        id
    }

    fn show_error(&self, request: SurfaceRequest) -> ExternalId {
        let updating = request.id.is_some();
        let id = self.assign(request.id);
        info!(
            surface_id = %id,
            updating,
            "❌ {} {}",
            request.title.as_deref().unwrap_or(""),
            request.description.as_deref().unwrap_or("")
        );
        id
    }

    fn dismiss(&self, id: Option<&ExternalId>) {
        match id {
            Some(id) => info!(surface_id = %id, "Dismissed surface toast"),
            None => info!("Dismissed all surface toasts"),
        }
    }
}

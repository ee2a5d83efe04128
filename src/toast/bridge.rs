use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::debug;

use crate::toast::surface::{ExternalId, SurfaceCallback, SurfaceRequest, ToastSurface};
use crate::toast::types::{Toast, ToastId, ToastPatch};

/// Bidirectional index between toast ids and rendering surface ids
#[derive(Debug, Default)]
struct IdIndex {
    by_toast: HashMap<ToastId, ExternalId>,
    by_external: HashMap<ExternalId, ToastId>,
}

impl IdIndex {
    fn insert(&mut self, toast_id: ToastId, external_id: ExternalId) {
        if let Some(previous) = self.by_toast.insert(toast_id.clone(), external_id.clone()) {
            self.by_external.remove(&previous);
        }
        self.by_external.insert(external_id, toast_id);
    }

    fn remove(&mut self, toast_id: &ToastId) -> Option<ExternalId> {
        let external_id = self.by_toast.remove(toast_id)?;
        self.by_external.remove(&external_id);
        Some(external_id)
    }

    fn clear(&mut self) {
        self.by_toast.clear();
        self.by_external.clear();
    }
}

/// Forwards toast lifecycle intents to an external rendering surface.
///
/// The surface's identifiers never leak into [`Toast`]; they live only in the
/// bridge's own index and are dropped as soon as the surface is told to
/// dismiss the toast.
pub struct SurfaceBridge {
    surface: Arc<dyn ToastSurface>,
    ids: Mutex<IdIndex>,
    duration: Duration,
}

impl SurfaceBridge {
    pub fn new(surface: Arc<dyn ToastSurface>, duration: Duration) -> Self {
        Self {
            surface,
            ids: Mutex::new(IdIndex::default()),
            duration,
        }
    }

    fn ids(&self) -> MutexGuard<'_, IdIndex> {
        self.ids.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Show a freshly created toast; `on_close` runs when the surface closes it
    pub fn show(&self, toast: &Toast, on_close: SurfaceCallback) -> ExternalId {
        let request = SurfaceRequest {
            title: toast.title.clone(),
            description: toast.description.clone(),
            id: None,
            duration: self.duration,
            class_name: toast.class_name.clone(),
            action: toast.action.clone(),
            on_dismiss: Some(on_close.clone()),
            on_auto_close: Some(on_close),
        };

        let external_id = if toast.variant.is_destructive() {
            self.surface.show_error(request)
        } else {
            self.surface.show(request)
        };

        debug!("Toast {} shown on surface as {}", toast.id, external_id);
        self.ids().insert(toast.id.clone(), external_id.clone());
        external_id
    }

    /// Re-show a toast in place when its title changes
    pub fn update(&self, id: &ToastId, patch: &ToastPatch) -> bool {
        let Some(title) = patch.title.clone() else {
            return false;
        };
        let Some(external_id) = self.external_id(id) else {
            return false;
        };

        debug!("Updating surface toast {} for toast {}", external_id, id);
        self.surface.show(SurfaceRequest {
            title: Some(title),
            description: patch.description.clone(),
            id: Some(external_id),
            duration: self.duration,
            class_name: patch.class_name.clone(),
            ..Default::default()
        });
        true
    }

    /// Dismiss one toast, or every toast when `id` is `None`
    pub fn dismiss(&self, id: Option<&ToastId>) {
        match id {
            Some(id) => {
                // Unmap before calling out: the surface may re-enter through on_dismiss.
                let external_id = self.ids().remove(id);
                if let Some(external_id) = external_id {
                    debug!("Dismissing surface toast {} for toast {}", external_id, id);
                    self.surface.dismiss(Some(&external_id));
                }
            }
            None => {
                self.ids().clear();
                debug!("Dismissing all surface toasts");
                self.surface.dismiss(None);
            }
        }
    }

    /// Drop the mappings of toasts that left the sequence and close them on the surface
    pub fn forget(&self, ids: &[ToastId]) -> usize {
        let stale: Vec<ExternalId> = {
            let mut index = self.ids();
            ids.iter().filter_map(|id| index.remove(id)).collect()
        };

        for external_id in &stale {
            debug!("Closing surface toast {} for discarded toast", external_id);
            self.surface.dismiss(Some(external_id));
        }
        stale.len()
    }

    pub fn external_id(&self, id: &ToastId) -> Option<ExternalId> {
        self.ids().by_toast.get(id).cloned()
    }

    /// Reverse lookup from a surface id
    pub fn toast_id(&self, external_id: &ExternalId) -> Option<ToastId> {
        self.ids().by_external.get(external_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.ids().by_toast.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

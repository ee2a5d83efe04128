use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Opaque identifier of a toast, unique for the lifetime of the process
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ToastId(String);

impl ToastId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ToastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ToastId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ToastId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Visual severity of a toast
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastVariant {
    #[default]
    Default,
    Destructive,
}

impl ToastVariant {
    pub fn is_destructive(&self) -> bool {
        matches!(self, ToastVariant::Destructive)
    }
}

/// Shared callback invoked when the user activates a toast action.
///
/// Two callbacks are equal only if they point at the same closure.
#[derive(Clone)]
pub struct ActionCallback(Arc<dyn Fn() + Send + Sync>);

impl ActionCallback {
    pub fn new(callback: impl Fn() + Send + Sync + 'static) -> Self {
        Self(Arc::new(callback))
    }

    pub fn call(&self) {
        (self.0)()
    }
}

impl fmt::Debug for ActionCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ActionCallback(..)")
    }
}

impl PartialEq for ActionCallback {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Button offered to the user alongside a toast
#[derive(Debug, Clone, PartialEq)]
pub struct ToastAction {
    pub label: String,
    pub on_activate: ActionCallback,
}

impl ToastAction {
    pub fn new(label: impl Into<String>, on_activate: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            label: label.into(),
            on_activate: ActionCallback::new(on_activate),
        }
    }

    pub fn activate(&self) {
        self.on_activate.call();
    }
}

impl Serialize for ToastAction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("ToastAction", 1)?;
        state.serialize_field("label", &self.label)?;
        state.end()
    }
}

/// Toast tracked by the dispatcher
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Toast {
    pub id: ToastId,
    pub title: Option<String>,
    pub description: Option<String>,
    pub action: Option<ToastAction>,
    pub variant: ToastVariant,
    pub class_name: Option<String>,
    /// Display metadata passed through to renderers untouched
    pub metadata: Map<String, Value>,
    /// Set once the toast has been dismissed and awaits removal
    pub dismissed: bool,
    pub created_at: DateTime<Utc>,
}

impl Toast {
    /// Build a toast from a creation payload
    pub fn from_payload(id: ToastId, payload: ToastPayload) -> Self {
        Self {
            id,
            title: payload.title,
            description: payload.description,
            action: payload.action,
            variant: payload.variant,
            class_name: payload.class_name,
            metadata: payload.metadata,
            dismissed: false,
            created_at: Utc::now(),
        }
    }

    /// Merge the fields present in `patch`, leaving every other field untouched
    pub fn apply(&mut self, patch: ToastPatch) {
        if let Some(title) = patch.title {
            self.title = Some(title);
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        if let Some(action) = patch.action {
            self.action = Some(action);
        }
        if let Some(variant) = patch.variant {
            self.variant = variant;
        }
        if let Some(class_name) = patch.class_name {
            self.class_name = Some(class_name);
        }
        for (key, value) in patch.metadata {
            self.metadata.insert(key, value);
        }
    }
}

/// Fields supplied by a collaborator when creating a toast
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToastPayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub action: Option<ToastAction>,
    pub variant: ToastVariant,
    pub class_name: Option<String>,
    pub metadata: Map<String, Value>,
}

impl ToastPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn titled(title: impl Into<String>) -> Self {
        Self::default().title(title)
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn action(mut self, action: ToastAction) -> Self {
        self.action = Some(action);
        self
    }

    pub fn variant(mut self, variant: ToastVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn destructive(self) -> Self {
        self.variant(ToastVariant::Destructive)
    }

    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Partial update of a toast; `None` fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToastPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub action: Option<ToastAction>,
    pub variant: Option<ToastVariant>,
    pub class_name: Option<String>,
    pub metadata: Map<String, Value>,
}

impl ToastPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn action(mut self, action: ToastAction) -> Self {
        self.action = Some(action);
        self
    }

    pub fn variant(mut self, variant: ToastVariant) -> Self {
        self.variant = Some(variant);
        self
    }

    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Ordered toast sequence, most recent first
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ToastState {
    pub toasts: Vec<Toast>,
}

impl ToastState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    pub fn get(&self, id: &ToastId) -> Option<&Toast> {
        self.toasts.iter().find(|toast| &toast.id == id)
    }

    pub fn contains(&self, id: &ToastId) -> bool {
        self.get(id).is_some()
    }

    pub fn ids(&self) -> Vec<ToastId> {
        self.toasts.iter().map(|toast| toast.id.clone()).collect()
    }
}

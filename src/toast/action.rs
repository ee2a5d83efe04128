//! Actions accepted by the toast dispatcher
//!
//! Actions are the only way to change toast state. They are reduced by
//! [`crate::toast::reducer::reduce`], which may emit [`Effect`]s for the
//! dispatcher to carry out.
use crate::toast::types::{Toast, ToastId, ToastPatch};

/// State transitions understood by the reducer
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Insert a toast at the front of the sequence
    Add(Toast),

    /// Merge a partial update into the toast with the given id
    Update { id: ToastId, patch: ToastPatch },

    /// Flag one toast, or every toast when `None`, for removal
    Dismiss(Option<ToastId>),

    /// Delete one toast, or clear the sequence when `None`
    Remove(Option<ToastId>),
}

impl Action {
    /// Short name used in log output
    pub fn kind(&self) -> &'static str {
        match self {
            Action::Add(_) => "add",
            Action::Update { .. } => "update",
            Action::Dismiss(_) => "dismiss",
            Action::Remove(_) => "remove",
        }
    }
}

/// Side effects requested by a reduction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Purge the toast from state once the removal delay elapses
    ScheduleRemoval(ToastId),

    /// The toast left the sequence, by eviction or removal
    Discarded(ToastId),
}

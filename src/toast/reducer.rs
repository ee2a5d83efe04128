//! Reduction function for toast state
//!
//! Pure function of `(state, action)`. Everything that is not a change to the
//! sequence itself is returned as an [`Effect`] for the dispatcher to run.
use crate::toast::action::{Action, Effect};
use crate::toast::types::ToastState;

/// Result of reducing a single action
#[derive(Debug, Clone, PartialEq)]
pub struct Reduction {
    pub state: ToastState,
    pub effects: Vec<Effect>,
}

impl Reduction {
    pub fn new(state: ToastState, effects: Vec<Effect>) -> Self {
        Self { state, effects }
    }

    pub fn just_state(state: ToastState) -> Self {
        Self {
            state,
            effects: Vec::new(),
        }
    }
}

/// Apply `action` to `state`, keeping at most `limit` toasts
pub fn reduce(mut state: ToastState, action: Action, limit: usize) -> Reduction {
    match action {
        Action::Add(toast) => {
            state.toasts.insert(0, toast);
            let evicted = if state.toasts.len() > limit {
                state.toasts.split_off(limit)
            } else {
                Vec::new()
            };
            let effects = evicted
                .into_iter()
                .map(|toast| Effect::Discarded(toast.id))
                .collect();
            Reduction::new(state, effects)
        }

        Action::Update { id, patch } => {
            if let Some(toast) = state.toasts.iter_mut().find(|toast| toast.id == id) {
                toast.apply(patch);
            }
            Reduction::just_state(state)
        }

        Action::Dismiss(Some(id)) => {
            for toast in state.toasts.iter_mut().filter(|toast| toast.id == id) {
                toast.dismissed = true;
            }
            Reduction::new(state, vec![Effect::ScheduleRemoval(id)])
        }

        Action::Dismiss(None) => {
            let effects = state
                .toasts
                .iter_mut()
                .map(|toast| {
                    toast.dismissed = true;
                    Effect::ScheduleRemoval(toast.id.clone())
                })
                .collect();
            Reduction::new(state, effects)
        }

        Action::Remove(Some(id)) => {
            let before = state.len();
            state.toasts.retain(|toast| toast.id != id);
            if state.len() == before {
                return Reduction::just_state(state);
            }
            Reduction::new(state, vec![Effect::Discarded(id)])
        }

        Action::Remove(None) => {
            let effects = state
                .toasts
                .drain(..)
                .map(|toast| Effect::Discarded(toast.id))
                .collect();
            Reduction::new(state, effects)
        }
    }
}

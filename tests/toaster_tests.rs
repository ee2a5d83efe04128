use std::sync::{Arc, Mutex};
use std::time::Duration;

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;

use toaster::toast::{
    Action, ExternalId, IdGenerator, SurfaceCallback, SurfaceRequest, Toast, ToastAction,
    ToastId, ToastSurface, ID_CEILING,
};
use toaster::{ToastPatch, ToastPayload, Toaster, ToasterConfig};

#[derive(Debug, Clone, PartialEq)]
enum SurfaceCall {
    Show {
        id: Option<ExternalId>,
        title: Option<String>,
        error: bool,
    },
    Dismiss(Option<ExternalId>),
}

/// Surface that records every call and keeps the close hooks it was given
#[derive(Default)]
struct RecordingSurface {
    calls: Mutex<Vec<SurfaceCall>>,
    hooks: Mutex<Vec<(ExternalId, SurfaceCallback)>>,
    next_id: Mutex<i64>,
    close_on_dismiss: bool,
}

impl RecordingSurface {
    fn calls(&self) -> Vec<SurfaceCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record_show(&self, request: SurfaceRequest, error: bool) -> ExternalId {
        let id = match request.id.clone() {
            Some(id) => id,
            None => {
                let mut next = self.next_id.lock().unwrap();
                *next += 1;
                ExternalId::Text(format!("surface-{}", next))
            }
        };
        self.calls.lock().unwrap().push(SurfaceCall::Show {
            id: request.id,
            title: request.title,
            error,
        });
        if let Some(hook) = request.on_dismiss {
            self.hooks.lock().unwrap().push((id.clone(), hook));
        }
        id
    }

    /// Simulate the user closing the toast on screen
    fn close(&self, id: &ExternalId) {
        let hook = self
            .hooks
            .lock()
            .unwrap()
            .iter()
            .find(|(hook_id, _)| hook_id == id)
            .map(|(_, hook)| hook.clone());
        if let Some(hook) = hook {
            hook.call();
        }
    }
}

impl ToastSurface for RecordingSurface {
    fn show(&self, request: SurfaceRequest) -> ExternalId {
        self.record_show(request, false)
    }

    fn show_error(&self, request: SurfaceRequest) -> ExternalId {
        self.record_show(request, true)
    }

    fn dismiss(&self, id: Option<&ExternalId>) {
        self.calls
            .lock()
            .unwrap()
            .push(SurfaceCall::Dismiss(id.cloned()));
        if self.close_on_dismiss {
            if let Some(id) = id {
                self.close(id);
            }
        }
    }
}

fn toaster_with(config: ToasterConfig) -> (Toaster, Arc<RecordingSurface>) {
    let surface = Arc::new(RecordingSurface::default());
    (Toaster::new(config, surface.clone()), surface)
}

#[test]
fn test_create_forwards_by_variant() {
    let (toaster, surface) = toaster_with(ToasterConfig::new().with_limit(5));

    toaster.create(ToastPayload::titled("Renamed"));
    toaster.create(ToastPayload::titled("Delete failed").destructive());

    assert_eq!(
        surface.calls(),
        vec![
            SurfaceCall::Show {
                id: None,
                title: Some("Renamed".to_string()),
                error: false
            },
            SurfaceCall::Show {
                id: None,
                title: Some("Delete failed".to_string()),
                error: true
            },
        ]
    );
    assert_eq!(toaster.bridge().len(), 2);
}

#[test]
fn test_update_reshows_with_same_external_id() {
    let (toaster, surface) = toaster_with(ToasterConfig::default());
    let handle = toaster.create(ToastPayload::titled("x"));
    let external = toaster.bridge().external_id(handle.id()).unwrap();

    handle.update(ToastPatch::new().description("no title, local only"));
    handle.update(ToastPatch::new().title("y"));

    let calls = surface.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(
        calls[1],
        SurfaceCall::Show {
            id: Some(external),
            title: Some("y".to_string()),
            error: false
        }
    );

    let state = toaster.toasts();
    assert_eq!(state.toasts[0].title.as_deref(), Some("y"));
    assert_eq!(
        state.toasts[0].description.as_deref(),
        Some("no title, local only")
    );
}

#[test]
fn test_first_toast_id_is_one() {
    let (toaster, _surface) = toaster_with(ToasterConfig::default());
    let handle = toaster.create(ToastPayload::titled("x"));
    assert_eq!(handle.id(), &ToastId::from("1"));

    toaster.update(&ToastId::from("1"), ToastPatch::new().title("y"));
    let state = toaster.toasts();
    assert_eq!(state.len(), 1);
    assert_eq!(state.toasts[0].title.as_deref(), Some("y"));
}

#[test]
fn test_id_counter_wraps_to_one() {
    let surface = Arc::new(RecordingSurface::default());
    let toaster = Toaster::with_id_generator(
        ToasterConfig::default(),
        surface,
        IdGenerator::starting_at(ID_CEILING),
    );

    let handle = toaster.create(ToastPayload::titled("after wrap"));
    assert_eq!(handle.id().as_str(), "1");
}

#[test]
fn test_dismiss_forwards_and_unmaps() {
    let (toaster, surface) = toaster_with(ToasterConfig::new().with_limit(2));
    let first = toaster.create(ToastPayload::titled("A"));
    let second = toaster.create(ToastPayload::titled("B"));
    let first_external = toaster.bridge().external_id(first.id()).unwrap();

    first.dismiss();
    first.dismiss();
    assert_eq!(
        surface
            .calls()
            .iter()
            .filter(|call| matches!(call, SurfaceCall::Dismiss(_)))
            .count(),
        1
    );
    assert!(surface
        .calls()
        .contains(&SurfaceCall::Dismiss(Some(first_external))));
    assert!(toaster.bridge().external_id(second.id()).is_some());

    toaster.dismiss(None);
    assert_eq!(surface.calls().last(), Some(&SurfaceCall::Dismiss(None)));
    assert!(toaster.bridge().is_empty());
}

#[test]
fn test_surface_close_hook_dismisses_toast() {
    let (toaster, surface) = toaster_with(ToasterConfig::default());
    let handle = toaster.create(ToastPayload::titled("Shared"));
    let external = toaster.bridge().external_id(handle.id()).unwrap();

    surface.close(&external);

    assert!(toaster.toasts().toasts[0].dismissed);
    assert!(toaster.bridge().is_empty());
    assert!(surface
        .calls()
        .contains(&SurfaceCall::Dismiss(Some(external))));
}

#[test]
fn test_reentrant_surface_dismiss_terminates() {
    let surface = Arc::new(RecordingSurface {
        close_on_dismiss: true,
        ..Default::default()
    });
    let toaster = Toaster::new(ToasterConfig::default(), surface.clone());
    let handle = toaster.create(ToastPayload::titled("Signed out"));

    handle.dismiss();

    let dismiss_calls = surface
        .calls()
        .iter()
        .filter(|call| matches!(call, SurfaceCall::Dismiss(_)))
        .count();
    assert_eq!(dismiss_calls, 1);
    assert!(toaster.toasts().toasts[0].dismissed);
}

#[test]
fn test_action_callback_is_passed_through() {
    let activated = Arc::new(Mutex::new(0));
    let counter = activated.clone();
    let (toaster, _surface) = toaster_with(ToasterConfig::default());

    toaster.create(
        ToastPayload::titled("Deleted")
            .action(ToastAction::new("Undo", move || *counter.lock().unwrap() += 1)),
    );

    let state = toaster.toasts();
    let action = state.toasts[0].action.as_ref().unwrap();
    assert_eq!(action.label, "Undo");
    action.activate();
    assert_eq!(*activated.lock().unwrap(), 1);
}

#[test]
fn test_feeds_observe_calls_in_order() {
    let (toaster, _surface) = toaster_with(ToasterConfig::new().with_limit(3));
    let observed = Arc::new(Mutex::new(Vec::new()));
    let recorder = observed.clone();
    toaster.dispatcher().subscribe(move |state| {
        recorder.lock().unwrap().push(state.ids());
    });
    let feed_a = toaster.use_toasts();
    let feed_b = toaster.use_toasts();

    let handle = toaster.create(ToastPayload::titled("A"));
    handle.update(ToastPatch::new().title("A2"));
    toaster.create(ToastPayload::titled("B"));

    assert_eq!(
        *observed.lock().unwrap(),
        vec![
            vec![ToastId::from("1")],
            vec![ToastId::from("1")],
            vec![ToastId::from("2"), ToastId::from("1")],
        ]
    );
    assert_eq!(feed_a.toasts(), feed_b.toasts());
    assert_eq!(feed_a.toasts(), toaster.toasts());

    drop(feed_a);
    assert_eq!(toaster.dispatcher().subscriber_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_dismiss_all_removes_after_delay() {
    let (toaster, _surface) = toaster_with(
        ToasterConfig::new()
            .with_limit(2)
            .with_remove_delay(Duration::from_secs(60)),
    );
    toaster.create(ToastPayload::titled("A"));
    toaster.create(ToastPayload::titled("B"));

    toaster.dismiss(None);
    assert_eq!(toaster.dispatcher().pending_removals(), 2);
    assert_eq!(toaster.toasts().len(), 2);

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(toaster.toasts().len(), 2);

    tokio::time::sleep(Duration::from_secs(31)).await;
    assert!(toaster.toasts().is_empty());
    assert_eq!(toaster.dispatcher().pending_removals(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_repeated_dismiss_keeps_single_timer() {
    let (toaster, _surface) = toaster_with(ToasterConfig::default());
    let handle = toaster.create(ToastPayload::titled("x"));

    handle.dismiss();
    toaster.dismiss(Some(handle.id()));
    toaster.dismiss(None);

    assert_eq!(toaster.dispatcher().pending_removals(), 1);
    assert!(toaster.dispatcher().has_pending_removal(handle.id()));
}

#[test]
fn test_explicit_remove_is_idempotent() {
    let (toaster, _surface) = toaster_with(ToasterConfig::new().with_limit(2));
    let a = toaster.create(ToastPayload::titled("A"));
    toaster.create(ToastPayload::titled("B"));

    toaster
        .dispatcher()
        .dispatch(Action::Remove(Some(a.id().clone())));
    let once = toaster.toasts();
    toaster
        .dispatcher()
        .dispatch(Action::Remove(Some(a.id().clone())));

    assert_eq!(once, toaster.toasts());
    assert_eq!(once.len(), 1);
}

#[test]
fn test_evicted_toast_is_closed_on_surface() {
    let (toaster, surface) = toaster_with(ToasterConfig::default());
    let first = toaster.create(ToastPayload::titled("A"));
    let first_external = toaster.bridge().external_id(first.id()).unwrap();

    toaster.create(ToastPayload::titled("B"));

    assert_eq!(
        surface.calls()[1],
        SurfaceCall::Dismiss(Some(first_external))
    );
    assert_eq!(toaster.bridge().external_id(first.id()), None);
    assert_eq!(toaster.bridge().len(), 1);
}

#[test]
fn test_toaster_built_outside_runtime_removes_inside_one() {
    let toaster =
        Toaster::detached(ToasterConfig::new().with_remove_delay(Duration::from_millis(20)));

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .start_paused(true)
        .build()
        .unwrap();
    runtime.block_on(async {
        let handle = toaster.create(ToastPayload::titled("Archived"));
        handle.dismiss();
        assert_eq!(toaster.dispatcher().pending_removals(), 1);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(toaster.toasts().is_empty());
        assert_eq!(toaster.dispatcher().pending_removals(), 0);
    });
}

#[test]
fn test_dispatch_from_other_thread_during_fanout_is_queued() {
    let (toaster, _surface) = toaster_with(ToasterConfig::new().with_limit(3));
    let observed = Arc::new(Mutex::new(Vec::new()));
    let seen_during_fanout = Arc::new(Mutex::new(None));
    let spawned = Arc::new(AtomicBool::new(false));

    let dispatcher = toaster.dispatcher().clone();
    let recorder = observed.clone();
    let seen = seen_during_fanout.clone();
    toaster.dispatcher().subscribe(move |state| {
        recorder.lock().unwrap().push(state.ids());
        if spawned.swap(true, Ordering::SeqCst) {
            return;
        }

        let other = dispatcher.clone();
        let worker = thread::spawn(move || {
            other.dispatch(Action::Add(Toast::from_payload(
                ToastId::from("b"),
                ToastPayload::titled("B"),
            )));
            other.state().len()
        });
        *seen.lock().unwrap() = worker.join().ok();
    });

    toaster.create(ToastPayload::titled("A"));

    assert_eq!(*seen_during_fanout.lock().unwrap(), Some(1));
    assert_eq!(
        *observed.lock().unwrap(),
        vec![
            vec![ToastId::from("1")],
            vec![ToastId::from("b"), ToastId::from("1")],
        ]
    );
    assert_eq!(toaster.toasts().len(), 2);
}

#[test]
fn test_concurrent_creates_notify_once_each() {
    let (toaster, _surface) = toaster_with(ToasterConfig::new().with_limit(200));
    let notifications = Arc::new(AtomicUsize::new(0));
    let counter = notifications.clone();
    toaster.dispatcher().subscribe(move |state| {
        assert!(state.len() <= 200);
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let workers: Vec<_> = (0..2)
        .map(|worker| {
            let toaster = toaster.clone();
            thread::spawn(move || {
                for n in 0..50 {
                    toaster.create(ToastPayload::titled(format!("worker {} toast {}", worker, n)));
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    assert_eq!(notifications.load(Ordering::SeqCst), 100);
    let state = toaster.toasts();
    assert_eq!(state.len(), 100);
    let mut ids = state.ids();
    ids.sort_by(|a, b| a.as_str().cmp(b.as_str()));
    ids.dedup();
    assert_eq!(ids.len(), 100);
    assert_eq!(toaster.bridge().len(), 100);
}

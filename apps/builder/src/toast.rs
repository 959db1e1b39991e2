//! Toast Queue — a single-slot transient notification with timed auto-dismiss.
//!
//! At most one toast is visible. Showing a new toast replaces the current one
//! and aborts its timer. The pending timer is also aborted on `dismiss()` and
//! when the queue is dropped, so no expiry ever fires against a torn-down view.
//!
//! Timers are tokio tasks spawned on the runtime the queue was created in,
//! or the one `show` is called from. With no runtime at all the toast stays
//! up until dismissed or replaced.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};

pub const BUILDER_TOAST_TTL: Duration = Duration::from_millis(6000);
pub const PROFILE_TOAST_TTL: Duration = Duration::from_millis(5000);

const EVENT_CHANNEL_CAPACITY: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToastNotification {
    pub id: u64,
    pub message: String,
    pub severity: Severity,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissReason {
    Manual,
    Expired,
    Replaced,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ToastEvent {
    Shown(ToastNotification),
    Dismissed { id: u64, reason: DismissReason },
}

#[derive(Default)]
struct Slot {
    active: Option<ToastNotification>,
    timer: Option<JoinHandle<()>>,
    next_id: u64,
}

impl Slot {
    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

pub struct ToastQueue {
    ttl: Duration,
    runtime: Option<Handle>,
    slot: Arc<Mutex<Slot>>,
    events: broadcast::Sender<ToastEvent>,
}

impl ToastQueue {
    pub fn new(ttl: Duration) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            ttl,
            runtime: Handle::try_current().ok(),
            slot: Arc::new(Mutex::new(Slot::default())),
            events,
        }
    }

    /// Displays a toast, replacing whatever is visible, and schedules its expiry.
    pub fn show(&self, message: impl Into<String>, severity: Severity) -> ToastNotification {
        let mut slot = lock(&self.slot);

        slot.cancel_timer();
        if let Some(previous) = slot.active.take() {
            self.emit(ToastEvent::Dismissed {
                id: previous.id,
                reason: DismissReason::Replaced,
            });
        }

        slot.next_id += 1;
        let toast = ToastNotification {
            id: slot.next_id,
            message: message.into(),
            severity,
            created_at: Utc::now(),
        };
        debug!(id = toast.id, ?severity, "toast shown: {}", toast.message);

        slot.active = Some(toast.clone());
        slot.timer = self.spawn_expiry(toast.id);
        self.emit(ToastEvent::Shown(toast.clone()));

        toast
    }

    /// Closes the visible toast early. Returns `false` if nothing was visible,
    /// including when the toast already expired.
    pub fn dismiss(&self) -> bool {
        let mut slot = lock(&self.slot);
        slot.cancel_timer();

        match slot.active.take() {
            Some(toast) => {
                debug!(id = toast.id, "toast dismissed");
                self.emit(ToastEvent::Dismissed {
                    id: toast.id,
                    reason: DismissReason::Manual,
                });
                true
            }
            None => false,
        }
    }

    pub fn current(&self) -> Option<ToastNotification> {
        lock(&self.slot).active.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ToastEvent> {
        self.events.subscribe()
    }

    fn spawn_expiry(&self, id: u64) -> Option<JoinHandle<()>> {
        let Some(runtime) = self.runtime.clone().or_else(|| Handle::try_current().ok()) else {
            warn!(id, "no tokio runtime; toast will not auto-dismiss");
            return None;
        };

        let slot = Arc::clone(&self.slot);
        let events = self.events.clone();
        // Deadline is fixed now, not when the task is first polled.
        let deadline = Instant::now() + self.ttl;

        Some(runtime.spawn(async move {
            tokio::time::sleep_until(deadline).await;

            let mut slot = lock(&slot);
            // A replaced toast's timer may already be past its sleep when aborted.
            if slot.active.as_ref().map(|t| t.id) != Some(id) {
                return;
            }
            slot.active = None;
            slot.timer = None;
            debug!(id, "toast expired");
            let _ = events.send(ToastEvent::Dismissed {
                id,
                reason: DismissReason::Expired,
            });
        }))
    }

    fn emit(&self, event: ToastEvent) {
        // No receivers is fine.
        let _ = self.events.send(event);
    }
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new(BUILDER_TOAST_TTL)
    }
}

impl Drop for ToastQueue {
    fn drop(&mut self) {
        lock(&self.slot).cancel_timer();
    }
}

fn lock(slot: &Mutex<Slot>) -> MutexGuard<'_, Slot> {
    slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

use std::{sync::Arc, time::Duration};

use tokio::{
    sync::{broadcast, Mutex},
    task::JoinHandle,
};

use crate::events::ControllerEvent;

/// How long a notification stays visible before the slot resets.
pub const NOTIFICATION_TTL: Duration = Duration::from_millis(2500);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotificationKind {
    #[default]
    Idle,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Notification {
    pub kind: NotificationKind,
    pub text: String,
}

impl Notification {
    pub fn is_idle(&self) -> bool {
        self.kind == NotificationKind::Idle
    }
}

struct Slot {
    current: Notification,
    generation: u64,
    expiry: Option<JoinHandle<()>>,
}

/// Single-slot status message with auto-expiry.
///
/// Each queue owns its expiry timer, so two controllers mounted side by side
/// never cancel each other's messages.
pub struct NotificationQueue {
    slot: Arc<Mutex<Slot>>,
    events: broadcast::Sender<ControllerEvent>,
}

impl NotificationQueue {
    pub(crate) fn new(events: broadcast::Sender<ControllerEvent>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot {
                current: Notification::default(),
                generation: 0,
                expiry: None,
            })),
            events,
        }
    }

    pub async fn current(&self) -> Notification {
        self.slot.lock().await.current.clone()
    }

    pub async fn success(&self, text: impl Into<String>) {
        self.show(NotificationKind::Success, text).await;
    }

    pub async fn error(&self, text: impl Into<String>) {
        self.show(NotificationKind::Error, text).await;
    }

    /// Replaces the current message and restarts the expiry timer.
    pub async fn show(&self, kind: NotificationKind, text: impl Into<String>) {
        let notification = Notification {
            kind,
            text: text.into(),
        };

        let mut slot = self.slot.lock().await;
        if let Some(previous) = slot.expiry.take() {
            previous.abort();
        }
        slot.generation = slot.generation.wrapping_add(1);
        slot.current = notification.clone();

        let generation = slot.generation;
        let shared = Arc::clone(&self.slot);
        let events = self.events.clone();
        slot.expiry = Some(tokio::spawn(async move {
            tokio::time::sleep(NOTIFICATION_TTL).await;
            let mut slot = shared.lock().await;
            // A newer message may have landed while this task waited on the lock.
            if slot.generation != generation {
                return;
            }
            slot.current = Notification::default();
            slot.expiry = None;
            drop(slot);
            let _ = events.send(ControllerEvent::NotificationChanged(Notification::default()));
        }));
        drop(slot);

        let _ = self
            .events
            .send(ControllerEvent::NotificationChanged(notification));
    }

    /// Clears the slot immediately and cancels the pending timer.
    pub async fn dismiss(&self) {
        let mut slot = self.slot.lock().await;
        if let Some(previous) = slot.expiry.take() {
            previous.abort();
        }
        slot.generation = slot.generation.wrapping_add(1);
        slot.current = Notification::default();
        drop(slot);
        let _ = self
            .events
            .send(ControllerEvent::NotificationChanged(Notification::default()));
    }
}

impl Drop for NotificationQueue {
    fn drop(&mut self) {
        if let Ok(mut slot) = self.slot.try_lock() {
            if let Some(expiry) = slot.expiry.take() {
                expiry.abort();
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/notification_tests.rs"]
mod tests;

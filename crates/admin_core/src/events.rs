//! Change notifications published by controllers, and the scoped loading flag.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::broadcast;

use crate::notification::Notification;

pub(crate) const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Published whenever observable controller state changes. Subscribers re-read
/// the snapshot they care about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    ItemsChanged,
    DocumentChanged,
    EditSessionChanged,
    LoadingChanged(bool),
    NotificationChanged(Notification),
}

#[derive(Debug, Default)]
pub(crate) struct LoadingFlag {
    active: AtomicBool,
}

impl LoadingFlag {
    pub(crate) fn get(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Raises the flag until the returned guard is dropped.
    pub(crate) fn acquire<'a>(
        &'a self,
        events: &'a broadcast::Sender<ControllerEvent>,
    ) -> LoadingGuard<'a> {
        self.active.store(true, Ordering::SeqCst);
        let _ = events.send(ControllerEvent::LoadingChanged(true));
        LoadingGuard { flag: self, events }
    }
}

pub(crate) struct LoadingGuard<'a> {
    flag: &'a LoadingFlag,
    events: &'a broadcast::Sender<ControllerEvent>,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.flag.active.store(false, Ordering::SeqCst);
        let _ = self.events.send(ControllerEvent::LoadingChanged(false));
    }
}

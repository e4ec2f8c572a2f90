use std::sync::Arc;

use shared::{
    domain::{SettingsDocument, Weekday, MAX_HOUR},
    error::ErrorKind,
};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

use crate::{
    api::SettingsApi,
    events::{ControllerEvent, LoadingFlag, EVENT_CHANNEL_CAPACITY},
    notification::{Notification, NotificationQueue},
    Outcome,
};

const SAVED: &str = "Settings updated";
const LOAD_FAILED: &str = "Error loading settings";
const SAVE_FAILED: &str = "Error updating settings";

/// Checks a settings draft and returns the canonical payload to send.
pub fn validate_settings(document: &SettingsDocument) -> Result<SettingsDocument, ErrorKind> {
    if document.days.is_empty() {
        return Err(ErrorKind::validation("Select at least one day"));
    }
    if [
        document.start_hour,
        document.end_hour,
        document.lunch_start_hour,
    ]
    .iter()
    .any(|hour| *hour > MAX_HOUR)
    {
        return Err(ErrorKind::validation("Hours must be between 0 and 23"));
    }
    if document.start_hour >= document.end_hour {
        return Err(ErrorKind::validation(
            "Start hour should be less than end hour",
        ));
    }
    Ok(document.canonicalized())
}

struct DocumentState {
    document: SettingsDocument,
    has_existing: bool,
}

/// Controller for the singleton settings document. The whole document is the
/// draft; there is no per-row edit session.
pub struct SettingsController {
    api: Arc<dyn SettingsApi>,
    state: Mutex<DocumentState>,
    serial: Mutex<()>,
    loading: LoadingFlag,
    notifications: NotificationQueue,
    events: broadcast::Sender<ControllerEvent>,
}

impl SettingsController {
    pub fn new(api: Arc<dyn SettingsApi>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            api,
            state: Mutex::new(DocumentState {
                document: SettingsDocument::default(),
                has_existing: false,
            }),
            serial: Mutex::new(()),
            loading: LoadingFlag::default(),
            notifications: NotificationQueue::new(events.clone()),
            events,
        }
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ControllerEvent> {
        self.events.subscribe()
    }

    pub async fn document(&self) -> SettingsDocument {
        self.state.lock().await.document.clone()
    }

    /// Whether the server holds a stored document (loaded or saved).
    pub async fn has_existing(&self) -> bool {
        self.state.lock().await.has_existing
    }

    pub fn is_loading(&self) -> bool {
        self.loading.get()
    }

    pub async fn notification(&self) -> Notification {
        self.notifications.current().await
    }

    /// Overlays the stored document onto the local defaults. When the server
    /// has none, the defaults stay in place.
    pub async fn load(&self) -> Outcome {
        let _serial = self.serial.lock().await;
        let _loading = self.loading.acquire(&self.events);

        match self.api.fetch().await {
            Ok(Some(patch)) => {
                info!("settings: loaded stored document");
                {
                    let mut state = self.state.lock().await;
                    state.document.apply(patch);
                    state.has_existing = true;
                }
                self.emit(ControllerEvent::DocumentChanged);
                Outcome::Applied
            }
            Ok(None) => {
                info!("settings: no stored document, keeping defaults");
                Outcome::Applied
            }
            Err(err) => {
                warn!(error = %err, "settings: load failed");
                self.notifications
                    .error(err.user_message(LOAD_FAILED))
                    .await;
                Outcome::Failed
            }
        }
    }

    pub async fn edit(&self, change: impl FnOnce(&mut SettingsDocument)) {
        change(&mut self.state.lock().await.document);
        self.emit(ControllerEvent::DocumentChanged);
    }

    /// Selects or clears `day`. Days outside [`Weekday::SELECTABLE`] are
    /// ignored and `false` is returned.
    pub async fn toggle_day(&self, day: Weekday) -> bool {
        if !day.is_selectable() {
            return false;
        }
        self.edit(|document| {
            if document.days.contains(&day) {
                document.days.retain(|selected| *selected != day);
            } else {
                document.days.push(day);
            }
        })
        .await;
        true
    }

    pub async fn set_start_hour(&self, hour: u8) {
        self.edit(|document| document.start_hour = hour).await;
    }

    pub async fn set_end_hour(&self, hour: u8) {
        self.edit(|document| document.end_hour = hour).await;
    }

    pub async fn set_lunch_start_hour(&self, hour: u8) {
        self.edit(|document| document.lunch_start_hour = hour).await;
    }

    /// Sends the current document. On success the local copy becomes exactly
    /// what was sent; the server's echo is not read back.
    pub async fn save(&self) -> Outcome {
        let draft = self.document().await;
        let payload = match validate_settings(&draft) {
            Ok(payload) => payload,
            Err(err) => {
                debug!(error = %err, "settings: save rejected locally");
                self.notifications.error(err.user_message(SAVE_FAILED)).await;
                return Outcome::Rejected;
            }
        };

        let _serial = self.serial.lock().await;
        let _loading = self.loading.acquire(&self.events);

        match self.api.update(&payload).await {
            Ok(()) => {
                info!(days = payload.days.len(), "settings: saved");
                {
                    let mut state = self.state.lock().await;
                    state.document = payload;
                    state.has_existing = true;
                }
                self.emit(ControllerEvent::DocumentChanged);
                self.notifications.success(SAVED).await;
                Outcome::Applied
            }
            Err(err) => {
                warn!(error = %err, "settings: save failed");
                self.notifications.error(err.user_message(SAVE_FAILED)).await;
                Outcome::Failed
            }
        }
    }

    fn emit(&self, event: ControllerEvent) {
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;

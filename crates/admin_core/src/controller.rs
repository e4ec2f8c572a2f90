use std::sync::Arc;

use shared::protocol::{InsertPosition, KindMessages};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

use crate::{
    api::{ApiClient, ConfirmPrompt},
    edit::EditSession,
    events::{ControllerEvent, LoadingFlag, EVENT_CHANNEL_CAPACITY},
    notification::{Notification, NotificationQueue},
    resource::Resource,
    Outcome,
};

struct ListState<R: Resource> {
    items: Vec<R>,
    edit: EditSession<R::Id, R::Draft>,
}

/// Local mirror of one remote collection.
///
/// Network operations on one controller run one at a time in call order; the
/// edit session and snapshots stay available while a request is in flight.
pub struct ResourceController<R: Resource> {
    api: Arc<dyn ApiClient<R>>,
    state: Mutex<ListState<R>>,
    serial: Mutex<()>,
    loading: LoadingFlag,
    messages: KindMessages,
    notifications: NotificationQueue,
    events: broadcast::Sender<ControllerEvent>,
}

impl<R: Resource> ResourceController<R> {
    pub fn new(api: Arc<dyn ApiClient<R>>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            api,
            state: Mutex::new(ListState {
                items: Vec::new(),
                edit: EditSession::default(),
            }),
            serial: Mutex::new(()),
            loading: LoadingFlag::default(),
            messages: R::KIND.messages(),
            notifications: NotificationQueue::new(events.clone()),
            events,
        }
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ControllerEvent> {
        self.events.subscribe()
    }

    pub async fn items(&self) -> Vec<R> {
        self.state.lock().await.items.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.get()
    }

    pub async fn notification(&self) -> Notification {
        self.notifications.current().await
    }

    /// Replaces the local list with the server's, in server order.
    pub async fn load(&self) -> Outcome {
        let _serial = self.serial.lock().await;
        let _loading = self.loading.acquire(&self.events);

        match self.api.list().await {
            Ok(items) => {
                info!(kind = %R::KIND, count = items.len(), "resources: loaded");
                self.state.lock().await.items = items;
                self.emit(ControllerEvent::ItemsChanged);
                Outcome::Applied
            }
            Err(err) => {
                warn!(kind = %R::KIND, error = %err, "resources: load failed");
                self.notifications
                    .error(err.user_message(&self.messages.load_failed))
                    .await;
                Outcome::Failed
            }
        }
    }

    pub async fn create(&self, draft: &R::Draft) -> Outcome {
        let payload = match R::validate(draft) {
            Ok(payload) => payload,
            Err(err) => {
                debug!(kind = %R::KIND, error = %err, "resources: create rejected locally");
                self.notifications
                    .error(err.user_message(&self.messages.add_failed))
                    .await;
                return Outcome::Rejected;
            }
        };

        let _serial = self.serial.lock().await;
        let _loading = self.loading.acquire(&self.events);

        match self.api.create(&payload).await {
            Ok(record) => {
                info!(kind = %R::KIND, id = %record.id(), "resources: created");
                {
                    let mut state = self.state.lock().await;
                    match R::KIND.insert_position() {
                        InsertPosition::Front => state.items.insert(0, record),
                        InsertPosition::Back => state.items.push(record),
                    }
                }
                self.emit(ControllerEvent::ItemsChanged);
                self.notifications.success(self.messages.added.clone()).await;
                Outcome::Applied
            }
            Err(err) => {
                warn!(kind = %R::KIND, error = %err, "resources: create failed");
                self.notifications
                    .error(err.user_message(&self.messages.add_failed))
                    .await;
                Outcome::Failed
            }
        }
    }

    /// Replaces the record with `id` by the server's response.
    pub async fn update(&self, id: &R::Id, draft: &R::Draft) -> Outcome {
        let payload = match R::validate(draft) {
            Ok(payload) => payload,
            Err(err) => {
                debug!(kind = %R::KIND, %id, error = %err, "resources: update rejected locally");
                self.notifications
                    .error(err.user_message(&self.messages.update_failed))
                    .await;
                return Outcome::Rejected;
            }
        };

        let _serial = self.serial.lock().await;
        let _loading = self.loading.acquire(&self.events);

        match self.api.update(id, &payload).await {
            Ok(record) => {
                info!(kind = %R::KIND, %id, "resources: updated");
                {
                    let mut state = self.state.lock().await;
                    if let Some(slot) = state.items.iter_mut().find(|item| item.id() == id) {
                        *slot = record;
                    }
                }
                self.emit(ControllerEvent::ItemsChanged);
                self.notifications
                    .success(self.messages.updated.clone())
                    .await;
                Outcome::Applied
            }
            Err(err) => {
                warn!(kind = %R::KIND, %id, error = %err, "resources: update failed");
                self.notifications
                    .error(err.user_message(&self.messages.update_failed))
                    .await;
                Outcome::Failed
            }
        }
    }

    pub async fn remove(&self, id: &R::Id, prompt: &dyn ConfirmPrompt) -> Outcome {
        if !prompt.confirm(&self.messages.confirm_delete) {
            debug!(kind = %R::KIND, %id, "resources: delete declined");
            return Outcome::Declined;
        }

        let _serial = self.serial.lock().await;
        let _loading = self.loading.acquire(&self.events);

        match self.api.delete(id).await {
            Ok(()) => {
                info!(kind = %R::KIND, %id, "resources: deleted");
                let edit_dropped = {
                    let mut state = self.state.lock().await;
                    state.items.retain(|item| item.id() != id);
                    if state.edit.is_editing(id) {
                        state.edit.cancel();
                        true
                    } else {
                        false
                    }
                };
                self.emit(ControllerEvent::ItemsChanged);
                if edit_dropped {
                    self.emit(ControllerEvent::EditSessionChanged);
                }
                self.notifications
                    .success(self.messages.deleted.clone())
                    .await;
                Outcome::Applied
            }
            Err(err) => {
                warn!(kind = %R::KIND, %id, error = %err, "resources: delete failed");
                self.notifications
                    .error(err.user_message(&self.messages.delete_failed))
                    .await;
                Outcome::Failed
            }
        }
    }

    pub async fn edit_session(&self) -> EditSession<R::Id, R::Draft> {
        self.state.lock().await.edit.clone()
    }

    pub async fn is_editing(&self, id: &R::Id) -> bool {
        self.state.lock().await.edit.is_editing(id)
    }

    pub async fn begin_edit(&self, item: &R) {
        self.state
            .lock()
            .await
            .edit
            .begin(item.id().clone(), item.draft());
        self.emit(ControllerEvent::EditSessionChanged);
    }

    /// Applies `change` to the active draft. Returns `false` when idle.
    pub async fn edit_draft(&self, change: impl FnOnce(&mut R::Draft)) -> bool {
        let applied = match self.state.lock().await.edit.draft_mut() {
            Some(draft) => {
                change(draft);
                true
            }
            None => false,
        };
        if applied {
            self.emit(ControllerEvent::EditSessionChanged);
        }
        applied
    }

    /// Persists the active draft. On failure the session and its draft stay
    /// as they were so the user can retry.
    pub async fn save_edit(&self) -> Outcome {
        let (target, draft) = {
            let state = self.state.lock().await;
            match &state.edit {
                EditSession::Editing { target, draft } => (target.clone(), draft.clone()),
                EditSession::Idle => return Outcome::Ignored,
            }
        };

        let outcome = self.update(&target, &draft).await;
        if outcome == Outcome::Applied {
            let closed = {
                let mut state = self.state.lock().await;
                // The user may have moved on to another row while the request ran.
                if state.edit.is_editing(&target) {
                    state.edit.cancel();
                    true
                } else {
                    false
                }
            };
            if closed {
                self.emit(ControllerEvent::EditSessionChanged);
            }
        }
        outcome
    }

    pub async fn cancel_edit(&self) {
        self.state.lock().await.edit.cancel();
        self.emit(ControllerEvent::EditSessionChanged);
    }

    fn emit(&self, event: ControllerEvent) {
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;

//! Controllers behind the timetable admin screens.
//!
//! Each screen owns one controller: [`ResourceController`] for the list
//! screens (divisions, faculty, subjects, classrooms) and
//! [`SettingsController`] for the singleton settings document. Controllers
//! talk to the backend only through the traits in [`api`]; [`HttpApiClient`]
//! is the reqwest implementation used by the console.

pub mod accounts;
pub mod api;
mod controller;
pub mod edit;
pub mod events;
pub mod http;
pub mod notification;
pub mod resource;
mod settings;

pub use api::{AdminApi, ApiClient, ConfirmPrompt, SettingsApi};
pub use controller::ResourceController;
pub use edit::EditSession;
pub use events::ControllerEvent;
pub use http::{HttpApiClient, HttpClientError};
pub use notification::{Notification, NotificationKind, NotificationQueue, NOTIFICATION_TTL};
pub use resource::{
    split_subjects, ClassroomDraft, DivisionDraft, Resource, SubjectDraft, TeacherDraft,
};
pub use settings::{validate_settings, SettingsController};

/// What a controller operation did. Failures are already reported through the
/// controller's notification slot; this is for callers that reset forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The server accepted the change and local state was updated.
    Applied,
    /// Local validation failed; nothing was sent.
    Rejected,
    /// The request failed; local state is unchanged.
    Failed,
    /// The user declined the confirmation prompt.
    Declined,
    /// Not legal in the current state, e.g. saving with no edit in progress.
    Ignored,
}

impl Outcome {
    pub fn is_applied(self) -> bool {
        self == Self::Applied
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};

pub const SETTINGS_PATH: &str = "/api/settings";
pub const ADMIN_LOGIN_PATH: &str = "/admin/login";
pub const ADMIN_SIGNUP_PATH: &str = "/admin/signup";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Faculty,
    Classroom,
    Division,
    Subject,
}

/// Where a freshly created record lands in the local list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPosition {
    Front,
    Back,
}

impl ResourceKind {
    pub fn collection_path(self) -> &'static str {
        match self {
            Self::Faculty => "/teachers",
            Self::Classroom => "/api/classrooms",
            Self::Division => "/api/divisions",
            Self::Subject => "/api/subjects",
        }
    }

    // Classrooms have always been appended while every other screen prepends.
    pub fn insert_position(self) -> InsertPosition {
        match self {
            Self::Classroom => InsertPosition::Back,
            Self::Faculty | Self::Division | Self::Subject => InsertPosition::Front,
        }
    }

    pub fn singular(self) -> &'static str {
        match self {
            Self::Faculty => "faculty",
            Self::Classroom => "classroom",
            Self::Division => "division",
            Self::Subject => "subject",
        }
    }

    pub fn plural(self) -> &'static str {
        match self {
            Self::Faculty => "faculty",
            Self::Classroom => "classrooms",
            Self::Division => "divisions",
            Self::Subject => "subjects",
        }
    }

    fn title(self) -> &'static str {
        match self {
            Self::Faculty => "Faculty",
            Self::Classroom => "Classroom",
            Self::Division => "Division",
            Self::Subject => "Subject",
        }
    }

    pub fn messages(self) -> KindMessages {
        let title = self.title();
        let singular = self.singular();
        let suffix = match self {
            Self::Classroom => " successfully",
            _ => "",
        };
        KindMessages {
            added: format!("{title} added{suffix}"),
            updated: format!("{title} updated{suffix}"),
            deleted: format!("{title} deleted{suffix}"),
            load_failed: format!("Error loading {}", self.plural()),
            add_failed: format!("Error adding {singular}"),
            update_failed: format!("Error updating {singular}"),
            delete_failed: format!("Error deleting {singular}"),
            confirm_delete: match self {
                Self::Classroom => "Are you sure you want to delete this classroom?".to_string(),
                _ => format!("Delete this {singular}?"),
            },
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.singular())
    }
}

/// User-facing texts for one resource kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindMessages {
    pub added: String,
    pub updated: String,
    pub deleted: String,
    pub load_failed: String,
    pub add_failed: String,
    pub update_failed: String,
    pub delete_failed: String,
    pub confirm_delete: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminLoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminLoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminSignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error body returned by the backend on non-success statuses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// Rejected locally; no request was sent.
    #[error("{message}")]
    Validation { message: String },
    /// The request never produced a response.
    #[error("{message}")]
    Transport { message: String },
    /// The server answered with an error status.
    #[error("server responded with status {status}")]
    Server {
        status: u16,
        message: Option<String>,
    },
    /// The server answered but the body could not be understood.
    #[error("{message}")]
    Decode { message: String },
}

impl ErrorKind {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn server(status: u16, message: Option<String>) -> Self {
        Self::Server { status, message }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Text shown to the user: the server's `message` if it sent one, else the
    /// error's own message, else `default`.
    pub fn user_message(&self, default: &str) -> String {
        let text = match self {
            Self::Server {
                message: Some(message),
                ..
            } => message.as_str(),
            Self::Server { message: None, .. } => "",
            Self::Validation { message }
            | Self::Transport { message }
            | Self::Decode { message } => message.as_str(),
        };
        if text.trim().is_empty() {
            default.to_string()
        } else {
            text.to_string()
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

use thiserror::Error;

use crate::HabitId;

/// Failures talking to the habit API.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("invalid API URL: {0}")]
    InvalidUrl(String),
    #[error("failed to call {call}: {message}")]
    Transport { call: String, message: String },
    #[error("unauthorized: {call} was rejected by the server")]
    Unauthorized { call: String },
    #[error("{call} returned status {status}")]
    Status { call: String, status: u16 },
    #[error("failed to parse {call} response: {message}")]
    Parse { call: String, message: String },
    #[error("invalid {call} response: {message}")]
    InvalidResponse { call: String, message: String },
}

impl ApiError {
    pub(crate) fn transport(call: &str, message: impl ToString) -> Self {
        Self::Transport {
            call: call.to_string(),
            message: message.to_string(),
        }
    }

    pub(crate) fn parse(call: &str, message: impl ToString) -> Self {
        Self::Parse {
            call: call.to_string(),
            message: message.to_string(),
        }
    }

    pub(crate) fn invalid(call: &str, message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            call: call.to_string(),
            message: message.into(),
        }
    }
}

/// Errors surfaced by [`crate::HabitController`] operations.
#[derive(Error, Debug)]
pub enum HabitError {
    #[error("habit name must not be empty")]
    EmptyName,
    #[error("no habit is being edited")]
    NotEditing,
    #[error("unknown habit: {0}")]
    UnknownHabit(HabitId),
    #[error(transparent)]
    Api(#[from] ApiError),
}

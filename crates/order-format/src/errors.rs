use design_engine::DesignError;
use serde::{Deserialize, Serialize};

/// A validation message attached to one request field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMessage {
    /// Dotted field path, empty when the message is not tied to a field.
    #[serde(default)]
    pub path: String,
    pub message: String,
}

/// Why an order submission did not go through.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SubmissionFailure {
    #[error("order rejected: {}", describe_fields(.messages))]
    Validation { messages: Vec<FieldMessage> },

    #[error("server error {status}: {message}")]
    Server { status: u16, message: String },

    #[error("network error: {reason}")]
    Network { reason: String },

    #[error("submission timed out")]
    Timeout,

    #[error("unexpected response status {status}")]
    UnexpectedStatus { status: u16 },
}

fn describe_fields(messages: &[FieldMessage]) -> String {
    messages
        .iter()
        .map(|m| {
            if m.path.is_empty() {
                m.message.clone()
            } else {
                format!("{}: {}", m.path, m.message)
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors raised while assembling or submitting an order.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OrderError {
    #[error("the design has no applied logos")]
    EmptyOrder,

    #[error("invalid preview image: {reason}")]
    InvalidPreview { reason: String },

    #[error("an order submission is already in flight")]
    SubmissionInFlight,

    #[error("no submission in flight for ticket {ticket}")]
    StaleTicket { ticket: u64 },

    #[error("submission failed: {0}")]
    SubmissionFailed(#[from] SubmissionFailure),

    #[error("serialization error: {reason}")]
    Serialization { reason: String },

    #[error(transparent)]
    Design(#[from] DesignError),
}

impl OrderError {
    /// Stable tag for the UI layer.
    pub fn kind(&self) -> &'static str {
        match self {
            OrderError::EmptyOrder => "EmptyOrder",
            OrderError::InvalidPreview { .. } => "InvalidPreview",
            OrderError::SubmissionInFlight => "SubmissionInFlight",
            OrderError::StaleTicket { .. } => "StaleTicket",
            OrderError::SubmissionFailed(_) => "SubmissionFailed",
            OrderError::Serialization { .. } => "Serialization",
            OrderError::Design(e) => e.kind(),
        }
    }
}

/// Errors from the browser storage backend.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("storage is unavailable")]
    Unavailable,

    #[error("storage write failed: {reason}")]
    WriteFailed { reason: String },
}

/// Errors while saving or loading a persisted session.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SessionError {
    #[error("failed to parse session: {0}")]
    ParseError(String),

    #[error("unknown session format: {0}")]
    UnknownFormat(String),

    #[error("session version {file_version} is newer than supported version {supported_version}")]
    FutureVersion {
        file_version: u32,
        supported_version: u32,
    },

    #[error("migration failed from version {from} to {to}: {reason}")]
    MigrationFailed { from: u32, to: u32, reason: String },

    #[error("serialization error: {reason}")]
    Serialization { reason: String },

    #[error("stored design cannot be restored: {0}")]
    Rehydrate(#[from] DesignError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SessionError {
    pub fn kind(&self) -> &'static str {
        match self {
            SessionError::ParseError(_) => "ParseError",
            SessionError::UnknownFormat(_) => "UnknownFormat",
            SessionError::FutureVersion { .. } => "FutureVersion",
            SessionError::MigrationFailed { .. } => "MigrationFailed",
            SessionError::Serialization { .. } => "Serialization",
            SessionError::Rehydrate(e) => e.kind(),
            SessionError::Store(_) => "Store",
        }
    }
}

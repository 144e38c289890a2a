//! Error types for the user list core.
//!
//! # Design
//! Network failures of every kind collapse into `FetchFailure`; callers only
//! need to know that a round-trip did not produce the expected record(s).
//! `NotFound` keeps its own variant because a 404 on delete is the common
//! "someone else removed it" case. Validation and id errors are local and
//! never reach the network.

use thiserror::Error;

use crate::screen::Ticket;
use crate::types::DraftField;

/// A list/create/delete round-trip that did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchFailure {
    /// The host could not complete the HTTP exchange at all.
    #[error("transport failed: {0}")]
    Transport(String),

    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a status the operation does not accept.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

/// The draft is missing one or more required fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("missing required fields: {}", list_fields(.missing))]
pub struct ValidationError {
    pub missing: Vec<DraftField>,
}

fn list_fields(fields: &[DraftField]) -> String {
    fields
        .iter()
        .map(|f| f.json_name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// A string that cannot be used as a collection identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid user id {0:?}")]
pub struct InvalidUserId(pub String);

/// Misuse of the `UserListScreen` request/completion protocol.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScreenError {
    #[error("unknown request ticket {0}")]
    UnknownTicket(Ticket),
}

//! Logic core for the user list screen.
//!
//! # Overview
//! Lists, creates and deletes users in a hosted REST collection and keeps
//! the screen's state (list, loading/refreshing flags, creation form) in
//! sync with the server's answers. The core never touches the network: it
//! hands `HttpRequest` values to the host and consumes the `HttpResponse`
//! values the host reports back (host-does-IO pattern).
//!
//! # Design
//! - `UserClient` is stateless and holds only the collection URL.
//! - `state::reduce` is the pure `(state, event) -> (state, effects)`
//!   transition function.
//! - `UserListScreen` owns the state and pairs outbound requests with their
//!   completions through tickets.
//! - Logging goes through `tracing`; installing a subscriber is the host's job.

pub mod client;
pub mod error;
pub mod http;
pub mod screen;
pub mod state;
pub mod types;

pub use client::{UserClient, DEFAULT_COLLECTION_URL};
pub use error::{FetchFailure, InvalidUserId, ScreenError, ValidationError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use screen::{PendingRequest, Ticket, Transport, UserListScreen};
pub use state::{reduce, Alert, AlertKind, Effect, Event, FetchOrigin, ModalState, ScreenSnapshot, ScreenState};
pub use types::{DraftField, NewUser, UserDraft, UserId, UserRecord, DEFAULT_AVATAR_URL};

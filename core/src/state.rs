//! Screen state and its transition function.
//!
//! # Design
//! `reduce` is a pure function from `(ScreenState, Event)` to the next state
//! plus the effects the driver must perform. It never touches the network:
//! intents that need the collection emit an `Effect`, and the host reports
//! the outcome back as a completion event.
//!
//! Failures follow two tiers. A failed list fetch is logged and the previous
//! list stays on screen. A failed create or delete is logged and also raises
//! exactly one `Alert` for the user.
//!
//! List fetches are stamped with a generation. A completion older than the
//! newest list already applied is dropped. Nothing orders a list replace
//! against a create or delete, so a refresh that completes after a create
//! can still hide the new record until the next fetch.

use serde::Serialize;
use tracing::{debug, error};

use crate::error::FetchFailure;
use crate::types::{DraftField, NewUser, UserDraft, UserId, UserRecord};

/// Visibility of the creation form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ModalState {
    #[default]
    Closed,
    Open,
}

/// Which affordance a list fetch drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOrigin {
    InitialLoad,
    Refresh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Validation,
    CreateFailed,
    DeleteFailed,
}

/// A blocking notification the presentation layer must show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub kind: AlertKind,
    pub title: String,
    pub message: String,
}

impl Alert {
    pub fn new(kind: AlertKind) -> Self {
        let (title, message) = match kind {
            AlertKind::Validation => ("Attenzione", "Compila nome, cognome e data di nascita."),
            AlertKind::CreateFailed => ("Errore", "Impossibile aggiungere l'utente."),
            AlertKind::DeleteFailed => ("Errore", "Impossibile eliminare l'utente."),
        };
        Self {
            kind,
            title: title.to_string(),
            message: message.to_string(),
        }
    }
}

/// User intents and request completions.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Mounted,
    RefreshRequested,
    DeleteRequested(UserId),
    ModalOpened,
    ModalCancelled,
    DraftChanged(DraftField, String),
    SubmitRequested,
    ListFetched {
        origin: FetchOrigin,
        generation: u64,
        result: Result<Vec<UserRecord>, FetchFailure>,
    },
    UserCreated(Result<UserRecord, FetchFailure>),
    UserDeleted {
        id: UserId,
        result: Result<(), FetchFailure>,
    },
}

/// Work requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchList { origin: FetchOrigin, generation: u64 },
    CreateUser(NewUser),
    DeleteUser(UserId),
    Alert(Alert),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScreenState {
    users: Vec<UserRecord>,
    loads_in_flight: u32,
    refreshes_in_flight: u32,
    latest_generation: u64,
    applied_generation: u64,
    submitting: bool,
    modal: ModalState,
    draft: UserDraft,
}

impl ScreenState {
    pub fn users(&self) -> &[UserRecord] {
        &self.users
    }

    pub fn is_loading(&self) -> bool {
        self.loads_in_flight > 0
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshes_in_flight > 0
    }

    /// A create request is in flight; further submits are ignored.
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn modal(&self) -> ModalState {
        self.modal
    }

    pub fn draft(&self) -> &UserDraft {
        &self.draft
    }

    pub fn snapshot(&self) -> ScreenSnapshot<'_> {
        ScreenSnapshot {
            users: &self.users,
            loading: self.is_loading(),
            refreshing: self.is_refreshing(),
            submitting: self.submitting,
            modal_open: self.modal == ModalState::Open,
            draft: &self.draft,
        }
    }

    fn begin_fetch(&mut self, origin: FetchOrigin) -> Effect {
        match origin {
            FetchOrigin::InitialLoad => self.loads_in_flight += 1,
            FetchOrigin::Refresh => self.refreshes_in_flight += 1,
        }
        self.latest_generation += 1;
        Effect::FetchList {
            origin,
            generation: self.latest_generation,
        }
    }

    fn finish_fetch(&mut self, origin: FetchOrigin) {
        let counter = match origin {
            FetchOrigin::InitialLoad => &mut self.loads_in_flight,
            FetchOrigin::Refresh => &mut self.refreshes_in_flight,
        };
        *counter = counter.saturating_sub(1);
    }
}

/// Serializable view of the state handed to the presentation layer.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenSnapshot<'a> {
    pub users: &'a [UserRecord],
    pub loading: bool,
    pub refreshing: bool,
    pub submitting: bool,
    pub modal_open: bool,
    pub draft: &'a UserDraft,
}

/// Apply one event to the state.
pub fn reduce(mut state: ScreenState, event: Event) -> (ScreenState, Vec<Effect>) {
    let mut effects = Vec::new();
    match event {
        Event::Mounted => effects.push(state.begin_fetch(FetchOrigin::InitialLoad)),
        Event::RefreshRequested => effects.push(state.begin_fetch(FetchOrigin::Refresh)),
        Event::ListFetched {
            origin,
            generation,
            result,
        } => {
            state.finish_fetch(origin);
            match result {
                Ok(users) if generation > state.applied_generation => {
                    debug!(?origin, count = users.len(), "user list replaced");
                    state.users = users;
                    state.applied_generation = generation;
                }
                Ok(_) => {
                    debug!(
                        ?origin,
                        generation,
                        applied = state.applied_generation,
                        "stale user list dropped"
                    );
                }
                Err(err) => error!(?origin, error = %err, "user list fetch failed"),
            }
        }
        Event::DeleteRequested(id) => effects.push(Effect::DeleteUser(id)),
        Event::UserDeleted { id, result } => match result {
            Ok(()) => {
                debug!(%id, "user deleted");
                state.users.retain(|user| user.id != id);
            }
            Err(err) => {
                error!(%id, error = %err, "user delete failed");
                effects.push(Effect::Alert(Alert::new(AlertKind::DeleteFailed)));
            }
        },
        Event::ModalOpened => {
            if state.submitting {
                debug!("modal stays closed until the pending create completes");
            } else {
                state.modal = ModalState::Open;
            }
        }
        Event::ModalCancelled => {
            state.modal = ModalState::Closed;
            state.draft = UserDraft::default();
        }
        Event::DraftChanged(field, value) => state.draft.set(field, value),
        Event::SubmitRequested => {
            if state.submitting {
                debug!("submit ignored, create already in flight");
            } else {
                match state.draft.validate() {
                    Ok(payload) => {
                        state.submitting = true;
                        effects.push(Effect::CreateUser(payload));
                    }
                    Err(err) => {
                        debug!(error = %err, "draft rejected");
                        effects.push(Effect::Alert(Alert::new(AlertKind::Validation)));
                    }
                }
            }
        }
        Event::UserCreated(result) => {
            state.submitting = false;
            match result {
                Ok(user) => {
                    debug!(id = %user.id, "user created");
                    state.users.insert(0, user);
                    state.modal = ModalState::Closed;
                    state.draft = UserDraft::default();
                }
                Err(err) => {
                    error!(error = %err, "user create failed");
                    effects.push(Effect::Alert(Alert::new(AlertKind::CreateFailed)));
                }
            }
        }
    }
    (state, effects)
}

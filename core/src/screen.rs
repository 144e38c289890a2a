//! Driver that runs `reduce` effects through the host.
//!
//! # Design
//! `UserListScreen` turns network effects into `PendingRequest`s tagged with
//! a `Ticket`, and turns the host's completions back into events. The host
//! decides how requests are executed (async task, platform HTTP stack, a
//! blocking agent in tests); the screen only remembers which operation each
//! ticket belongs to so it can pick the matching `parse_*` method.

use std::collections::{HashMap, VecDeque};

use tracing::warn;

use crate::client::UserClient;
use crate::error::{FetchFailure, ScreenError};
use crate::http::{HttpRequest, HttpResponse};
use crate::state::{reduce, Alert, Effect, Event, FetchOrigin, ScreenState};
use crate::types::{DraftField, UserId};

/// Identifies one outbound request until its completion is reported.
pub type Ticket = u64;

/// A request the host must execute, then report with `UserListScreen::complete`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    pub ticket: Ticket,
    pub request: HttpRequest,
}

/// Executes one request synchronously. Used by `UserListScreen::run`.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, FetchFailure>;
}

#[derive(Debug, Clone)]
enum Operation {
    ListUsers { origin: FetchOrigin, generation: u64 },
    CreateUser,
    DeleteUser(UserId),
}

#[derive(Debug)]
pub struct UserListScreen {
    client: UserClient,
    state: ScreenState,
    next_ticket: Ticket,
    in_flight: HashMap<Ticket, Operation>,
    outbox: VecDeque<PendingRequest>,
    alerts: VecDeque<Alert>,
}

impl Default for UserListScreen {
    fn default() -> Self {
        Self::new(UserClient::default())
    }
}

impl UserListScreen {
    pub fn new(client: UserClient) -> Self {
        Self {
            client,
            state: ScreenState::default(),
            next_ticket: 1,
            in_flight: HashMap::new(),
            outbox: VecDeque::new(),
            alerts: VecDeque::new(),
        }
    }

    pub fn state(&self) -> &ScreenState {
        &self.state
    }

    pub fn client(&self) -> &UserClient {
        &self.client
    }

    /// Requests handed out or queued but not yet completed.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub fn mount(&mut self) {
        self.dispatch(Event::Mounted);
    }

    pub fn refresh(&mut self) {
        self.dispatch(Event::RefreshRequested);
    }

    pub fn delete(&mut self, id: UserId) {
        self.dispatch(Event::DeleteRequested(id));
    }

    pub fn open_modal(&mut self) {
        self.dispatch(Event::ModalOpened);
    }

    pub fn cancel_modal(&mut self) {
        self.dispatch(Event::ModalCancelled);
    }

    pub fn edit_draft(&mut self, field: DraftField, value: impl Into<String>) {
        self.dispatch(Event::DraftChanged(field, value.into()));
    }

    pub fn submit(&mut self) {
        self.dispatch(Event::SubmitRequested);
    }

    pub fn dispatch(&mut self, event: Event) {
        let (state, effects) = reduce(std::mem::take(&mut self.state), event);
        self.state = state;
        for effect in effects {
            self.perform(effect);
        }
    }

    /// Next request for the host to execute, in issue order.
    pub fn poll_request(&mut self) -> Option<PendingRequest> {
        self.outbox.pop_front()
    }

    pub fn take_alert(&mut self) -> Option<Alert> {
        self.alerts.pop_front()
    }

    pub fn drain_alerts(&mut self) -> Vec<Alert> {
        self.alerts.drain(..).collect()
    }

    /// Report the outcome of a request obtained from `poll_request`.
    ///
    /// `Err` carries a transport failure; HTTP error statuses arrive as `Ok`
    /// responses and are classified by the client.
    pub fn complete(
        &mut self,
        ticket: Ticket,
        outcome: Result<HttpResponse, FetchFailure>,
    ) -> Result<(), ScreenError> {
        let Some(operation) = self.in_flight.remove(&ticket) else {
            warn!(ticket, "completion for unknown request");
            return Err(ScreenError::UnknownTicket(ticket));
        };
        let event = match operation {
            Operation::ListUsers { origin, generation } => Event::ListFetched {
                origin,
                generation,
                result: outcome.and_then(|r| self.client.parse_list_users(r)),
            },
            Operation::CreateUser => {
                Event::UserCreated(outcome.and_then(|r| self.client.parse_create_user(r)))
            }
            Operation::DeleteUser(id) => Event::UserDeleted {
                result: outcome.and_then(|r| self.client.parse_delete_user(r)),
                id,
            },
        };
        self.dispatch(event);
        Ok(())
    }

    /// Execute queued requests one at a time until none remain.
    pub fn run<T: Transport + ?Sized>(&mut self, transport: &T) {
        while let Some(pending) = self.poll_request() {
            let outcome = transport.execute(&pending.request);
            if let Err(err) = self.complete(pending.ticket, outcome) {
                warn!(error = %err, "dropping completion");
            }
        }
    }

    fn perform(&mut self, effect: Effect) {
        match effect {
            Effect::FetchList { origin, generation } => {
                let request = self.client.build_list_users();
                self.enqueue(Operation::ListUsers { origin, generation }, request);
            }
            Effect::CreateUser(payload) => match self.client.build_create_user(&payload) {
                Ok(request) => self.enqueue(Operation::CreateUser, request),
                Err(err) => self.dispatch(Event::UserCreated(Err(err))),
            },
            Effect::DeleteUser(id) => {
                let request = self.client.build_delete_user(&id);
                self.enqueue(Operation::DeleteUser(id), request);
            }
            Effect::Alert(alert) => self.alerts.push_back(alert),
        }
    }

    fn enqueue(&mut self, operation: Operation, request: HttpRequest) {
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.in_flight.insert(ticket, operation);
        self.outbox.push_back(PendingRequest { ticket, request });
    }
}

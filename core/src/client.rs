//! Stateless request builder and response parser for the user collection.
//!
//! # Design
//! `UserClient` holds only the collection URL. Each operation is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method
//! that consumes the host's `HttpResponse`. The collection URL already names
//! the resource (`.../Utente`), so listing and creating hit it directly and
//! deleting appends the id as one more path segment.

use crate::error::FetchFailure;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{NewUser, UserId, UserRecord};

/// Hosted collection the screen talks to.
pub const DEFAULT_COLLECTION_URL: &str = "https://68396ab16561b8d882b04ef6.mockapi.io/Utente";

/// Builds and parses the list/create/delete round-trips of the collection.
#[derive(Debug, Clone)]
pub struct UserClient {
    collection_url: String,
}

impl Default for UserClient {
    fn default() -> Self {
        Self::new(DEFAULT_COLLECTION_URL)
    }
}

impl UserClient {
    pub fn new(collection_url: &str) -> Self {
        Self {
            collection_url: collection_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn collection_url(&self) -> &str {
        &self.collection_url
    }

    pub fn build_list_users(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: self.collection_url.clone(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_create_user(&self, input: &NewUser) -> Result<HttpRequest, FetchFailure> {
        let body = serde_json::to_string(input).map_err(|e| FetchFailure::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: self.collection_url.clone(),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    pub fn build_delete_user(&self, id: &UserId) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: format!("{}/{}", self.collection_url, id.as_str()),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn parse_list_users(&self, response: HttpResponse) -> Result<Vec<UserRecord>, FetchFailure> {
        check_status(&response, &[200])?;
        serde_json::from_str(&response.body).map_err(|e| FetchFailure::Deserialization(e.to_string()))
    }

    pub fn parse_create_user(&self, response: HttpResponse) -> Result<UserRecord, FetchFailure> {
        check_status(&response, &[200, 201])?;
        serde_json::from_str(&response.body).map_err(|e| FetchFailure::Deserialization(e.to_string()))
    }

    /// The body is ignored: the collection may answer with nothing or with
    /// the deleted record.
    pub fn parse_delete_user(&self, response: HttpResponse) -> Result<(), FetchFailure> {
        check_status(&response, &[200, 204])
    }
}

/// Map statuses outside `accepted` to the matching `FetchFailure` variant.
fn check_status(response: &HttpResponse, accepted: &[u16]) -> Result<(), FetchFailure> {
    if accepted.contains(&response.status) {
        return Ok(());
    }
    if response.status == 404 {
        return Err(FetchFailure::NotFound);
    }
    Err(FetchFailure::Status {
        status: response.status,
        body: response.body.clone(),
    })
}

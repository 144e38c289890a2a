use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub nome: String,
    pub cognome: String,
    #[serde(rename = "dataNascita")]
    pub data_nascita: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateUser {
    pub nome: String,
    pub cognome: String,
    #[serde(rename = "dataNascita")]
    pub data_nascita: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

/// Records in insertion order plus the next id to hand out.
#[derive(Debug)]
pub struct Collection {
    users: Vec<User>,
    next_id: u64,
}

impl Collection {
    pub fn with_users(users: Vec<User>) -> Self {
        let next_id = users
            .iter()
            .filter_map(|u| u.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0)
            + 1;
        Self { users, next_id }
    }
}

pub type Db = Arc<RwLock<Collection>>;

type NotFound = (StatusCode, Json<&'static str>);

fn not_found() -> NotFound {
    (StatusCode::NOT_FOUND, Json("Not found"))
}

pub fn app() -> Router {
    app_with_users(Vec::new())
}

pub fn app_with_users(users: Vec<User>) -> Router {
    let db: Db = Arc::new(RwLock::new(Collection::with_users(users)));
    Router::new()
        .route("/Utente", get(list_users).post(create_user))
        .route("/Utente/{id}", delete(delete_user))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with_users(listener: TcpListener, users: Vec<User>) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_users(users)).await
}

async fn list_users(State(db): State<Db>) -> Json<Vec<User>> {
    Json(db.read().await.users.clone())
}

async fn create_user(
    State(db): State<Db>,
    Json(input): Json<CreateUser>,
) -> (StatusCode, Json<User>) {
    let mut collection = db.write().await;
    let user = User {
        id: collection.next_id.to_string(),
        nome: input.nome,
        cognome: input.cognome,
        data_nascita: input.data_nascita,
        avatar: input.avatar,
    };
    collection.next_id += 1;
    collection.users.push(user.clone());
    info!(id = %user.id, "user created");
    (StatusCode::CREATED, Json(user))
}

/// Answers 200 with the removed record, as the hosted collection does.
async fn delete_user(State(db): State<Db>, Path(id): Path<String>) -> Result<Json<User>, NotFound> {
    let mut collection = db.write().await;
    let index = collection
        .users
        .iter()
        .position(|u| u.id == id)
        .ok_or_else(not_found)?;
    let removed = collection.users.remove(index);
    info!(id = %removed.id, "user deleted");
    Ok(Json(removed))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str) -> User {
        User {
            id: id.to_string(),
            nome: "A".to_string(),
            cognome: "B".to_string(),
            data_nascita: "2000-01-01".to_string(),
            avatar: None,
        }
    }

    #[test]
    fn user_serializes_with_collection_names() {
        let json = serde_json::to_value(user("1")).unwrap();
        assert_eq!(json["id"], "1");
        assert_eq!(json["dataNascita"], "2000-01-01");
        assert!(json.get("avatar").is_none());
    }

    #[test]
    fn create_user_avatar_is_optional() {
        let input: CreateUser =
            serde_json::from_str(r#"{"nome":"C","cognome":"D","dataNascita":"1999-05-05"}"#).unwrap();
        assert!(input.avatar.is_none());
    }

    #[test]
    fn create_user_rejects_missing_birth_date() {
        let result: Result<CreateUser, _> = serde_json::from_str(r#"{"nome":"C","cognome":"D"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn seeded_collection_continues_numbering() {
        let collection = Collection::with_users(vec![user("1"), user("7"), user("x")]);
        assert_eq!(collection.next_id, 8);
        assert_eq!(Collection::with_users(Vec::new()).next_id, 1);
    }
}

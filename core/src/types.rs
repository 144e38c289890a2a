//! Domain types for the user collection.
//!
//! # Design
//! Field names follow the remote collection's JSON schema (`nome`, `cognome`,
//! `dataNascita`, `avatar`); only `dataNascita` needs a serde rename. The
//! `id` is wrapped in `UserId` so that an empty or path-altering identifier is
//! rejected when a response is parsed, not when a delete URL is built.

use std::fmt;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{InvalidUserId, ValidationError};

/// Avatar shown for records that do not carry one.
pub const DEFAULT_AVATAR_URL: &str = "https://cdn-icons-png.flaticon.com/512/149/149071.png";

/// Identifier assigned by the remote collection.
///
/// Always non-empty and usable as a single URL path segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    pub fn parse(raw: &str) -> Result<Self, InvalidUserId> {
        Self::try_from(raw.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = InvalidUserId;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        let forbidden = |c: char| c.is_whitespace() || matches!(c, '/' | '?' | '#' | '{' | '}');
        if raw.is_empty() || raw.contains(forbidden) {
            return Err(InvalidUserId(raw));
        }
        Ok(Self(raw))
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single user as stored in the remote collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub nome: String,
    pub cognome: String,
    #[serde(rename = "dataNascita")]
    pub data_nascita: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl UserRecord {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.nome, self.cognome)
    }

    /// The record's avatar, or `DEFAULT_AVATAR_URL` when it has none.
    pub fn avatar_url(&self) -> &str {
        match self.avatar.as_deref() {
            Some(url) if !url.is_empty() => url,
            _ => DEFAULT_AVATAR_URL,
        }
    }

    /// Birth date as `dd/mm/yyyy` when it parses as a date or an RFC 3339
    /// timestamp; the raw value otherwise.
    pub fn birth_date_label(&self) -> String {
        parse_birth_date(&self.data_nascita)
            .map(|date| date.format("%d/%m/%Y").to_string())
            .unwrap_or_else(|| self.data_nascita.clone())
    }
}

fn parse_birth_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Request payload for creating a user. `avatar` is already resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub nome: String,
    pub cognome: String,
    #[serde(rename = "dataNascita")]
    pub data_nascita: String,
    pub avatar: String,
}

/// One editable field of the creation form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DraftField {
    Nome,
    Cognome,
    DataNascita,
    Avatar,
}

impl DraftField {
    pub fn json_name(self) -> &'static str {
        match self {
            DraftField::Nome => "nome",
            DraftField::Cognome => "cognome",
            DraftField::DataNascita => "dataNascita",
            DraftField::Avatar => "avatar",
        }
    }
}

/// Unsubmitted values of the creation form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserDraft {
    pub nome: String,
    pub cognome: String,
    #[serde(rename = "dataNascita")]
    pub data_nascita: String,
    pub avatar: String,
}

impl UserDraft {
    pub fn set(&mut self, field: DraftField, value: impl Into<String>) {
        let slot = match field {
            DraftField::Nome => &mut self.nome,
            DraftField::Cognome => &mut self.cognome,
            DraftField::DataNascita => &mut self.data_nascita,
            DraftField::Avatar => &mut self.avatar,
        };
        *slot = value.into();
    }

    /// Required fields that are still empty, in form order.
    pub fn missing_fields(&self) -> Vec<DraftField> {
        [
            (DraftField::Nome, &self.nome),
            (DraftField::Cognome, &self.cognome),
            (DraftField::DataNascita, &self.data_nascita),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(field, _)| field)
        .collect()
    }

    /// Check presence of the required fields and build the create payload,
    /// substituting `DEFAULT_AVATAR_URL` for an empty avatar.
    pub fn validate(&self) -> Result<NewUser, ValidationError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(ValidationError { missing });
        }
        let avatar = if self.avatar.is_empty() {
            DEFAULT_AVATAR_URL.to_string()
        } else {
            self.avatar.clone()
        };
        Ok(NewUser {
            nome: self.nome.clone(),
            cognome: self.cognome.clone(),
            data_nascita: self.data_nascita.clone(),
            avatar,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(avatar: Option<&str>, birth: &str) -> UserRecord {
        UserRecord {
            id: UserId::parse("7").unwrap(),
            nome: "Mario".to_string(),
            cognome: "Rossi".to_string(),
            data_nascita: birth.to_string(),
            avatar: avatar.map(str::to_string),
        }
    }

    #[test]
    fn user_id_rejects_empty_and_path_characters() {
        assert!(UserId::parse("").is_err());
        assert!(UserId::parse("1/2").is_err());
        assert!(UserId::parse("${id}").is_err());
        assert!(UserId::parse("a b").is_err());
        assert_eq!(UserId::parse("42").unwrap().as_str(), "42");
    }

    #[test]
    fn record_deserializes_from_collection_json() {
        let json = r#"{"createdAt":"2025-05-30T03:00:00.000Z","nome":"Mario","cognome":"Rossi","dataNascita":"1990-02-01","avatar":"https://x/a.png","id":"7"}"#;
        let user: UserRecord = serde_json::from_str(json).unwrap();
        assert_eq!(user.id.as_str(), "7");
        assert_eq!(user.data_nascita, "1990-02-01");
        assert_eq!(user.avatar.as_deref(), Some("https://x/a.png"));
    }

    #[test]
    fn record_with_empty_id_is_rejected() {
        let json = r#"{"id":"","nome":"A","cognome":"B","dataNascita":"2000-01-01"}"#;
        assert!(serde_json::from_str::<UserRecord>(json).is_err());
    }

    #[test]
    fn record_without_avatar_uses_default() {
        let json = r#"{"id":"1","nome":"A","cognome":"B","dataNascita":"2000-01-01"}"#;
        let user: UserRecord = serde_json::from_str(json).unwrap();
        assert!(user.avatar.is_none());
        assert_eq!(user.avatar_url(), DEFAULT_AVATAR_URL);
        assert_eq!(record(Some(""), "x").avatar_url(), DEFAULT_AVATAR_URL);
    }

    #[test]
    fn display_helpers() {
        let user = record(Some("https://x/a.png"), "1990-02-01");
        assert_eq!(user.display_name(), "Mario Rossi");
        assert_eq!(user.avatar_url(), "https://x/a.png");
        assert_eq!(user.birth_date_label(), "01/02/1990");
        assert_eq!(record(None, "2001-12-24T00:00:00Z").birth_date_label(), "24/12/2001");
        assert_eq!(record(None, "sometime").birth_date_label(), "sometime");
    }

    #[test]
    fn draft_validation_reports_missing_fields() {
        let mut draft = UserDraft::default();
        draft.set(DraftField::Cognome, "Rossi");
        let err = draft.validate().unwrap_err();
        assert_eq!(err.missing, vec![DraftField::Nome, DraftField::DataNascita]);
        assert_eq!(err.to_string(), "missing required fields: nome, dataNascita");
    }

    #[test]
    fn draft_validation_substitutes_default_avatar() {
        let mut draft = UserDraft::default();
        draft.set(DraftField::Nome, "C");
        draft.set(DraftField::Cognome, "D");
        draft.set(DraftField::DataNascita, "1999-05-05");
        let payload = draft.validate().unwrap();
        assert_eq!(payload.avatar, DEFAULT_AVATAR_URL);

        draft.set(DraftField::Avatar, "https://x/b.png");
        assert_eq!(draft.validate().unwrap().avatar, "https://x/b.png");
    }

    #[test]
    fn new_user_serializes_with_collection_names() {
        let payload = NewUser {
            nome: "C".to_string(),
            cognome: "D".to_string(),
            data_nascita: "1999-05-05".to_string(),
            avatar: DEFAULT_AVATAR_URL.to_string(),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["dataNascita"], "1999-05-05");
        assert!(json.get("data_nascita").is_none());
    }
}

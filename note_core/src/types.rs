//! Core data model for notes and the authenticated caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::cookies::ResponseCookie;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: String) -> Option<Self> {
        if id.is_empty() || id.len() > 100 {
            None
        } else {
            Some(Self(id))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for UserId {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string()).ok_or_else(|| anyhow::anyhow!("Invalid user ID"))
    }
}

/// Provider-assigned note identifier. Opaque to this codebase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    pub fn new(id: String) -> Option<Self> {
        if id.is_empty() || id.len() > 100 {
            None
        } else {
            Some(Self(id))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NoteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for NoteId {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string()).ok_or_else(|| anyhow::anyhow!("Invalid note ID"))
    }
}

/// A persisted note as returned by the data store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub user_id: UserId,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub summary: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>
}

/// What a caller submits when creating a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteDraft {
    pub title: String,
    pub content: String
}

/// Insert payload sent to the data store. The owner is always the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNote {
    pub user_id: UserId,
    pub title: String,
    pub content: String,
    pub summary: Option<String>
}

impl NewNote {
    pub fn from_draft(owner: &UserId, draft: NoteDraft, summary: Option<String>) -> Self {
        Self {
            user_id: owner.clone(),
            title: draft.title,
            content: draft.content,
            summary
        }
    }
}

/// Present-but-null decodes to `Some(None)`; an absent field stays `None`
/// through `#[serde(default)]`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Caller-facing edit request. Absent fields are left untouched; an explicit
/// `"summary": null` clears the summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotePatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub summary: Option<Option<String>>
}

impl NotePatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.summary.is_none()
    }
}

/// Update payload sent to the data store. Every mutation carries a fresh
/// `updated_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub summary: Option<Option<String>>,
    pub updated_at: DateTime<Utc>
}

impl NoteChanges {
    pub fn from_patch(patch: NotePatch, at: DateTime<Utc>) -> Self {
        Self {
            title: patch.title,
            content: patch.content,
            summary: patch.summary,
            updated_at: at
        }
    }

    pub fn summary_only(summary: String, at: DateTime<Utc>) -> Self {
        Self {
            title: None,
            content: None,
            summary: Some(Some(summary)),
            updated_at: at
        }
    }
}

/// The user record the auth provider vouches for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: UserId,
    #[serde(default)]
    pub email: Option<String>
}

/// Identity of the caller for one request: the verified user and the
/// access token that scopes every data-store call to that user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub user: AuthUser,
    pub access_token: String
}

impl AuthContext {
    pub fn new(user: AuthUser, access_token: impl Into<String>) -> Self {
        Self {
            user,
            access_token: access_token.into()
        }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user.id
    }
}

/// Outcome of reading the caller's session from request cookies.
///
/// `cookies` holds any `Set-Cookie` updates the provider wants written back
/// (a refreshed token, or clearing a stale one), whatever the outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub identity: Option<AuthContext>,
    pub cookies: Vec<ResponseCookie>
}

impl SessionState {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(identity: AuthContext) -> Self {
        Self {
            identity: Some(identity),
            cookies: Vec::new()
        }
    }

    #[must_use]
    pub fn with_cookie(mut self, cookie: ResponseCookie) -> Self {
        self.cookies.push(cookie);
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }
}

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use errors::{ProviderError, RelayError};
use note_core::{
    AuthContext, AuthProvider, CookieJar, NewNote, Note, NoteChanges, NoteId, NoteStore,
    ResponseCookie, SessionState, Summarizer
};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use tokio::sync::RwLock;

use crate::fixtures::{TEST_AUTH_COOKIE, TEST_SESSION_COOKIE};

/// Auth provider whose sessions are registered up front, keyed by the raw
/// value of the auth cookie.
pub struct FakeAuthProvider {
    sessions: DashMap<String, AuthContext>,
    refreshed: RwLock<Option<ResponseCookie>>,
    unavailable: AtomicBool,
    fail_sign_out: AtomicBool,
    resolve_calls: AtomicU32,
    sign_out_calls: AtomicU32
}

impl FakeAuthProvider {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
            refreshed: RwLock::new(None),
            unavailable: AtomicBool::new(false),
            fail_sign_out: AtomicBool::new(false),
            resolve_calls: AtomicU32::new(0),
            sign_out_calls: AtomicU32::new(0)
        }
    }

    /// Registers a session and returns the `Cookie` header that carries it.
    pub fn add_session(&self, token: &str, ctx: AuthContext) -> String {
        self.sessions.insert(token.to_string(), ctx);
        format!("{TEST_AUTH_COOKIE}={token}")
    }

    /// Cookie written back on every successful resolution, as a token
    /// refresh would.
    pub async fn refresh_with(&self, cookie: ResponseCookie) {
        *self.refreshed.write().await = Some(cookie);
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn set_fail_sign_out(&self, fail: bool) {
        self.fail_sign_out.store(fail, Ordering::SeqCst);
    }

    pub fn resolve_calls(&self) -> u32 {
        self.resolve_calls.load(Ordering::SeqCst)
    }

    pub fn sign_out_calls(&self) -> u32 {
        self.sign_out_calls.load(Ordering::SeqCst)
    }

    pub fn has_session(&self, token: &str) -> bool {
        self.sessions.contains_key(token)
    }
}

impl Default for FakeAuthProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuthProvider for FakeAuthProvider {
    async fn resolve_session(&self, cookies: &CookieJar) -> Result<SessionState, ProviderError> {
        self.resolve_calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ProviderError::Transport {
                reason: "connection refused".to_string()
            });
        }

        let Some(token) = cookies.get(TEST_AUTH_COOKIE) else {
            return Ok(SessionState::anonymous());
        };

        let identity = self.sessions.get(token).map(|ctx| ctx.value().clone());
        match identity {
            Some(ctx) => {
                let mut state = SessionState::authenticated(ctx);
                if let Some(cookie) = self.refreshed.read().await.clone() {
                    state = state.with_cookie(cookie);
                }
                Ok(state)
            }
            None => Ok(
                SessionState::anonymous().with_cookie(ResponseCookie::expired(TEST_AUTH_COOKIE))
            )
        }
    }

    async fn sign_out(&self, ctx: &AuthContext) -> Result<(), ProviderError> {
        self.sign_out_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_sign_out.load(Ordering::SeqCst) {
            return Err(ProviderError::Api {
                status: 500,
                message: "sign-out failed".to_string()
            });
        }
        self.sessions
            .retain(|_, session| session.access_token != ctx.access_token);
        Ok(())
    }

    fn session_cookie_names(&self, cookies: &CookieJar) -> Vec<String> {
        let mut names = vec![TEST_AUTH_COOKIE.to_string()];
        names.extend(cookies.chunk_names(TEST_AUTH_COOKIE));
        names.push(TEST_SESSION_COOKIE.to_string());
        names
    }
}

/// Note table that enforces ownership the way the provider's row policy
/// does: a caller only ever sees their own rows.
pub struct InMemoryNoteStore {
    notes: DashMap<NoteId, Note>,
    unavailable: AtomicBool
}

impl InMemoryNoteStore {
    pub fn new() -> Self {
        Self {
            notes: DashMap::new(),
            unavailable: AtomicBool::new(false)
        }
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Reads a row regardless of owner.
    pub fn raw(&self, id: &NoteId) -> Option<Note> {
        self.notes.get(id).map(|n| n.value().clone())
    }

    fn check(&self) -> Result<(), ProviderError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ProviderError::Api {
                status: 503,
                message: "store unavailable".to_string()
            });
        }
        Ok(())
    }
}

impl Default for InMemoryNoteStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NoteStore for InMemoryNoteStore {
    async fn list(&self, ctx: &AuthContext) -> Result<Vec<Note>, ProviderError> {
        self.check()?;
        let mut notes: Vec<Note> = self
            .notes
            .iter()
            .filter(|n| &n.user_id == ctx.user_id())
            .map(|n| n.value().clone())
            .collect();
        notes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(notes)
    }

    async fn get(&self, ctx: &AuthContext, id: &NoteId) -> Result<Option<Note>, ProviderError> {
        self.check()?;
        Ok(self
            .notes
            .get(id)
            .filter(|n| &n.user_id == ctx.user_id())
            .map(|n| n.value().clone()))
    }

    async fn insert(&self, ctx: &AuthContext, note: &NewNote) -> Result<Note, ProviderError> {
        self.check()?;
        if &note.user_id != ctx.user_id() {
            return Err(ProviderError::Unauthorized {
                reason: "row owner does not match caller".to_string()
            });
        }

        let now = Utc::now();
        let id = NoteId::new(uuid::Uuid::new_v4().to_string()).ok_or_else(|| {
            ProviderError::Decode {
                reason: "generated id rejected".to_string()
            }
        })?;
        let stored = Note {
            id: id.clone(),
            user_id: note.user_id.clone(),
            title: note.title.clone(),
            content: note.content.clone(),
            summary: note.summary.clone(),
            created_at: now,
            updated_at: now
        };
        self.notes.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update(
        &self,
        ctx: &AuthContext,
        id: &NoteId,
        changes: &NoteChanges
    ) -> Result<Option<Note>, ProviderError> {
        self.check()?;
        let Some(mut entry) = self.notes.get_mut(id) else {
            return Ok(None);
        };
        if &entry.user_id != ctx.user_id() {
            return Ok(None);
        }

        if let Some(title) = &changes.title {
            entry.title.clone_from(title);
        }
        if let Some(content) = &changes.content {
            entry.content.clone_from(content);
        }
        if let Some(summary) = &changes.summary {
            entry.summary.clone_from(summary);
        }
        entry.updated_at = changes.updated_at;
        Ok(Some(entry.value().clone()))
    }

    async fn delete(&self, ctx: &AuthContext, id: &NoteId) -> Result<bool, ProviderError> {
        self.check()?;
        Ok(self
            .notes
            .remove_if(id, |_, n| &n.user_id == ctx.user_id())
            .is_some())
    }
}

/// Summarizer that answers every request with the same scripted result.
pub struct StubSummarizer {
    result: RwLock<Result<String, RelayError>>,
    last_text: RwLock<Option<String>>,
    calls: AtomicU32
}

impl StubSummarizer {
    pub fn returning(summary: &str) -> Self {
        Self::with_result(Ok(summary.to_string()))
    }

    pub fn failing(err: RelayError) -> Self {
        Self::with_result(Err(err))
    }

    fn with_result(result: Result<String, RelayError>) -> Self {
        Self {
            result: RwLock::new(result),
            last_text: RwLock::new(None),
            calls: AtomicU32::new(0)
        }
    }

    pub async fn set_result(&self, result: Result<String, RelayError>) {
        *self.result.write().await = result;
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn last_text(&self) -> Option<String> {
        self.last_text.read().await.clone()
    }
}

#[async_trait]
impl Summarizer for StubSummarizer {
    async fn summarize(&self, text: &str) -> Result<String, RelayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_text.write().await = Some(text.to_string());
        self.result.read().await.clone()
    }
}

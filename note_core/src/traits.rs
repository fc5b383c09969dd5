//! Seams to the external collaborators.
//!
//! Implementations are constructed once at process start and shared behind
//! `Arc<dyn ...>`; tests substitute in-memory fakes.

use async_trait::async_trait;
use errors::{ProviderError, RelayError};

use crate::cookies::CookieJar;
use crate::types::{AuthContext, NewNote, Note, NoteChanges, NoteId, SessionState};

/// Cookie-backed session reader and sign-out for the auth provider.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Derives the caller's identity from request cookies. May refresh an
    /// expired session, in which case the returned state carries the
    /// replacement cookies.
    async fn resolve_session(&self, cookies: &CookieJar) -> Result<SessionState, ProviderError>;

    /// Revokes the session `ctx` was resolved from. Pass the identity from
    /// [`resolve_session`](Self::resolve_session) so a token refreshed on
    /// the way in is the one revoked.
    async fn sign_out(&self, ctx: &AuthContext) -> Result<(), ProviderError>;

    /// Names of the cookies holding session state, including any chunks of
    /// the auth cookie present in `cookies`.
    fn session_cookie_names(&self, cookies: &CookieJar) -> Vec<String>;
}

/// Note persistence scoped to the caller. Ownership is enforced by the
/// provider's access policy using `ctx.access_token`.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Lists the caller's notes, most recently updated first.
    async fn list(&self, ctx: &AuthContext) -> Result<Vec<Note>, ProviderError>;

    async fn get(&self, ctx: &AuthContext, id: &NoteId) -> Result<Option<Note>, ProviderError>;

    async fn insert(&self, ctx: &AuthContext, note: &NewNote) -> Result<Note, ProviderError>;

    /// Returns `None` when no note with `id` is visible to the caller.
    async fn update(
        &self,
        ctx: &AuthContext,
        id: &NoteId,
        changes: &NoteChanges
    ) -> Result<Option<Note>, ProviderError>;

    /// Returns whether a note was removed.
    async fn delete(&self, ctx: &AuthContext, id: &NoteId) -> Result<bool, ProviderError>;
}

/// Turns free text into a short summary.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, text: &str) -> Result<String, RelayError>;
}

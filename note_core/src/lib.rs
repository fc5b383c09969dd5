//! # notewise core
//!
//! Shared types and traits for the notewise system.
//!
//! This crate provides:
//! - The `Note` data model and its draft/patch shapes
//! - Identity types for the authenticated caller
//! - Cookie parsing and `Set-Cookie` rendering used by the session guard
//! - The seams to external collaborators: [`AuthProvider`], [`NoteStore`]
//!   and [`Summarizer`]
//!
//! Every collaborator is an explicit object passed to whoever needs it.
//! Nothing here reads process-wide state.

pub mod cookies;
pub mod traits;
pub mod types;

pub use cookies::{CookieJar, ResponseCookie, SameSite};
pub use traits::{AuthProvider, NoteStore, Summarizer};
pub use types::{
    AuthContext, AuthUser, NewNote, Note, NoteChanges, NoteDraft, NoteId, NotePatch,
    SessionState, UserId
};

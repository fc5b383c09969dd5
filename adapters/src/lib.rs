//! # Adapters
//!
//! Clients for the external backend-as-a-service provider.
//!
//! [`SupabaseClient`] implements both [`note_core::AuthProvider`] (cookie
//! session reader and sign-out) and [`note_core::NoteStore`] (PostgREST note
//! table). Construct it once at startup and share it.

pub mod supabase;

pub use supabase::{StoredSession, SupabaseClient};

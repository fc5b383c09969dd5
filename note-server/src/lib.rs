//! # notewise server
//!
//! HTTP surface of the note-taking backend. Identity and storage live with
//! an external auth/data provider; summaries come from an external
//! chat-completion API.
//!
//! ## Endpoints
//!
//! - `POST /api/summarize` - Summarize `{ "text" }` into `{ "summary" }`
//! - `POST /auth/signout` - Revoke the session and clear its cookies
//! - `GET|POST /api/notes` - List or create the caller's notes
//! - `GET|PATCH|DELETE /api/notes/{id}` - Read, edit or delete one note
//! - `POST /api/notes/{id}/summarize` - Re-summarize a stored note
//! - `GET /health` - Liveness
//! - `GET /metrics` - Prometheus exposition
//!
//! ## Session guard
//!
//! Every application route runs behind [`guard::session_guard`], which
//! resolves the caller from cookies and bounces anonymous callers away from
//! `/dashboard` and signed-in callers away from `/login` and `/signup`.

pub mod cookies;
pub mod error;
pub mod guard;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod state;
pub mod telemetry;

pub use error::{ApiError, ServerError};
pub use routes::create_router;
pub use server::NoteServer;
pub use state::AppState;

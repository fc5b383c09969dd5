//! Note lifecycle on top of the provider's data store.
//!
//! Creation may ask for a summary. Summarization there is best effort: the
//! note is saved either way and the caller gets a [`SummaryOutcome`] that
//! says which happened. An explicit re-summarize is not best effort; relay
//! errors reach the caller.

pub mod outcome;
pub mod service;

pub use outcome::{SkipReason, SummaryOutcome};
pub use service::NoteService;

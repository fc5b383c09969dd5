//! Shared test doubles for the notewise workspace.
//!
//! In-memory stand-ins for the three external collaborators:
//! - [`FakeAuthProvider`]: sessions keyed by auth-cookie value
//! - [`InMemoryNoteStore`]: owner-scoped note table
//! - [`StubSummarizer`]: scripted summary or relay failure
//!
//! Each fake counts the calls it receives so tests can assert on
//! short-circuits (no provider call, no upstream call).

mod fakes;
mod fixtures;

pub use fakes::*;
pub use fixtures::*;

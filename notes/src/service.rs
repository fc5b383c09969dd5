use chrono::Utc;
use errors::NoteError;
use note_core::{
    AuthContext, NewNote, Note, NoteChanges, NoteDraft, NoteId, NotePatch, NoteStore, Summarizer
};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::outcome::{SkipReason, SummaryOutcome};

/// Note operations for one authenticated caller at a time.
///
/// Every store call carries the caller's [`AuthContext`]; ownership is
/// enforced by the provider, so a note owned by someone else looks exactly
/// like a missing one.
#[derive(Clone)]
pub struct NoteService {
    store: Arc<dyn NoteStore>,
    summarizer: Arc<dyn Summarizer>
}

impl NoteService {
    pub fn new(store: Arc<dyn NoteStore>, summarizer: Arc<dyn Summarizer>) -> Self {
        Self { store, summarizer }
    }

    pub async fn list(&self, ctx: &AuthContext) -> Result<Vec<Note>, NoteError> {
        Ok(self.store.list(ctx).await?)
    }

    pub async fn get(&self, ctx: &AuthContext, id: &NoteId) -> Result<Note, NoteError> {
        self.store
            .get(ctx, id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Saves a new note. With `summarize` set the relay runs first; any relay
    /// failure is reported in the outcome and the note is saved without a
    /// summary.
    pub async fn create(
        &self,
        ctx: &AuthContext,
        draft: NoteDraft,
        summarize: bool
    ) -> Result<(Note, SummaryOutcome), NoteError> {
        check_title(&draft.title)?;
        check_content(&draft.content)?;

        let outcome = if summarize {
            self.best_effort_summary(&draft.content).await
        } else {
            SummaryOutcome::Skipped(SkipReason::NotRequested)
        };

        let new_note = NewNote::from_draft(ctx.user_id(), draft, outcome.summary().map(str::to_string));
        let note = self.store.insert(ctx, &new_note).await?;
        info!(
            user_id = %ctx.user_id(),
            note_id = %note.id,
            summarized = outcome.summary().is_some(),
            "Note created"
        );
        Ok((note, outcome))
    }

    async fn best_effort_summary(&self, content: &str) -> SummaryOutcome {
        if let Err(e) = relay::validate_text(content) {
            debug!(error = %e, "Content not eligible for summarization");
            return SummaryOutcome::Skipped(SkipReason::Ineligible);
        }

        match self.summarizer.summarize(content).await {
            Ok(summary) => SummaryOutcome::Summarized(summary),
            Err(e) => {
                warn!(error = %e, kind = %e.kind(), "Saving note without summary");
                SummaryOutcome::Skipped(SkipReason::from(&e))
            }
        }
    }

    /// Applies an edit. Fields absent from `patch` are left as they are; an
    /// empty patch changes nothing and returns the current note.
    pub async fn update(
        &self,
        ctx: &AuthContext,
        id: &NoteId,
        patch: NotePatch
    ) -> Result<Note, NoteError> {
        if let Some(title) = &patch.title {
            check_title(title)?;
        }
        if let Some(content) = &patch.content {
            check_content(content)?;
        }
        if patch.is_empty() {
            return self.get(ctx, id).await;
        }

        let changes = NoteChanges::from_patch(patch, Utc::now());
        let note = self
            .store
            .update(ctx, id, &changes)
            .await?
            .ok_or_else(|| not_found(id))?;
        debug!(note_id = %id, "Note updated");
        Ok(note)
    }

    /// Summarizes the stored content and saves the result. Unlike
    /// [`create`](Self::create), relay errors are returned.
    pub async fn resummarize(&self, ctx: &AuthContext, id: &NoteId) -> Result<Note, NoteError> {
        let note = self.get(ctx, id).await?;
        relay::validate_text(&note.content)?;

        let summary = self.summarizer.summarize(&note.content).await?;
        let changes = NoteChanges::summary_only(summary, Utc::now());
        let note = self
            .store
            .update(ctx, id, &changes)
            .await?
            .ok_or_else(|| not_found(id))?;
        info!(note_id = %id, "Note re-summarized");
        Ok(note)
    }

    pub async fn delete(&self, ctx: &AuthContext, id: &NoteId) -> Result<(), NoteError> {
        if !self.store.delete(ctx, id).await? {
            return Err(not_found(id));
        }
        info!(user_id = %ctx.user_id(), note_id = %id, "Note deleted");
        Ok(())
    }
}

fn not_found(id: &NoteId) -> NoteError {
    NoteError::NotFound { id: id.to_string() }
}

fn check_title(title: &str) -> Result<(), NoteError> {
    if title.trim().is_empty() {
        return Err(NoteError::EmptyTitle);
    }
    Ok(())
}

fn check_content(content: &str) -> Result<(), NoteError> {
    if content.trim().is_empty() {
        return Err(NoteError::EmptyContent);
    }
    Ok(())
}

//! Note API. Every handler requires a session resolved by the guard.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode
};
use errors::NoteError;
use note_core::{Note, NoteDraft, NoteId, NotePatch};
use notes::SummaryOutcome;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::ApiError;
use crate::guard::Caller;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateNoteRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub summarize: bool
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateNoteResponse {
    pub note: Note,
    pub summary_outcome: SummaryOutcome
}

/// Ids that cannot be valid are reported the same way as missing notes.
fn parse_id(raw: &str) -> Result<NoteId, ApiError> {
    NoteId::new(raw.to_string()).ok_or_else(|| {
        ApiError::Note(NoteError::NotFound {
            id: raw.to_string()
        })
    })
}

/// GET /api/notes
pub async fn list_notes(
    State(state): State<Arc<AppState>>,
    Caller(ctx): Caller
) -> Result<Json<Vec<Note>>, ApiError> {
    Ok(Json(state.notes.list(&ctx).await?))
}

/// POST /api/notes
pub async fn create_note(
    State(state): State<Arc<AppState>>,
    Caller(ctx): Caller,
    payload: Result<Json<CreateNoteRequest>, JsonRejection>
) -> Result<(StatusCode, Json<CreateNoteResponse>), ApiError> {
    let Json(request) = payload?;
    let draft = NoteDraft {
        title: request.title,
        content: request.content
    };

    let (note, summary_outcome) = state.notes.create(&ctx, draft, request.summarize).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateNoteResponse {
            note,
            summary_outcome
        })
    ))
}

/// GET /api/notes/{id}
pub async fn get_note(
    State(state): State<Arc<AppState>>,
    Caller(ctx): Caller,
    Path(id): Path<String>
) -> Result<Json<Note>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.notes.get(&ctx, &id).await?))
}

/// PATCH /api/notes/{id}
pub async fn update_note(
    State(state): State<Arc<AppState>>,
    Caller(ctx): Caller,
    Path(id): Path<String>,
    payload: Result<Json<NotePatch>, JsonRejection>
) -> Result<Json<Note>, ApiError> {
    let id = parse_id(&id)?;
    let Json(patch) = payload?;
    Ok(Json(state.notes.update(&ctx, &id, patch).await?))
}

/// DELETE /api/notes/{id}
pub async fn delete_note(
    State(state): State<Arc<AppState>>,
    Caller(ctx): Caller,
    Path(id): Path<String>
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    state.notes.delete(&ctx, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/notes/{id}/summarize
pub async fn resummarize_note(
    State(state): State<Arc<AppState>>,
    Caller(ctx): Caller,
    Path(id): Path<String>
) -> Result<Json<Note>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.notes.resummarize(&ctx, &id).await?))
}

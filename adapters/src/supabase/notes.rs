use async_trait::async_trait;
use errors::ProviderError;
use note_core::{AuthContext, NewNote, Note, NoteChanges, NoteId, NoteStore};
use tracing::debug;

use super::{SupabaseClient, check_status, decode, transport_error};

const NOTES_PATH: &str = "/notes";

fn id_filter(id: &NoteId) -> String {
    format!("id=eq.{}", urlencoding::encode(id.as_str()))
}

impl SupabaseClient {
    async fn fetch_notes(&self, ctx: &AuthContext, query: &str) -> Result<Vec<Note>, ProviderError> {
        let url = format!("{}?{}", self.rest_url(NOTES_PATH), query);
        let response = self
            .authorize(self.client.get(url), Some(&ctx.access_token))
            .send()
            .await
            .map_err(transport_error)?;

        decode(check_status(response).await?).await
    }
}

#[async_trait]
impl NoteStore for SupabaseClient {
    async fn list(&self, ctx: &AuthContext) -> Result<Vec<Note>, ProviderError> {
        let notes = self
            .fetch_notes(ctx, "select=*&order=updated_at.desc")
            .await?;
        debug!(user_id = %ctx.user_id(), count = notes.len(), "Listed notes");
        Ok(notes)
    }

    async fn get(&self, ctx: &AuthContext, id: &NoteId) -> Result<Option<Note>, ProviderError> {
        let notes = self
            .fetch_notes(ctx, &format!("select=*&{}", id_filter(id)))
            .await?;
        Ok(notes.into_iter().next())
    }

    async fn insert(&self, ctx: &AuthContext, note: &NewNote) -> Result<Note, ProviderError> {
        let response = self
            .authorize(
                self.client.post(self.rest_url(NOTES_PATH)),
                Some(&ctx.access_token)
            )
            .header("Prefer", "return=representation")
            .json(note)
            .send()
            .await
            .map_err(transport_error)?;

        let inserted: Vec<Note> = decode(check_status(response).await?).await?;
        inserted
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::Decode {
                reason: "insert returned no rows".to_string()
            })
    }

    async fn update(
        &self,
        ctx: &AuthContext,
        id: &NoteId,
        changes: &NoteChanges
    ) -> Result<Option<Note>, ProviderError> {
        let url = format!("{}?{}", self.rest_url(NOTES_PATH), id_filter(id));
        let response = self
            .authorize(self.client.patch(url), Some(&ctx.access_token))
            .header("Prefer", "return=representation")
            .json(changes)
            .send()
            .await
            .map_err(transport_error)?;

        let updated: Vec<Note> = decode(check_status(response).await?).await?;
        Ok(updated.into_iter().next())
    }

    async fn delete(&self, ctx: &AuthContext, id: &NoteId) -> Result<bool, ProviderError> {
        let url = format!("{}?{}", self.rest_url(NOTES_PATH), id_filter(id));
        let response = self
            .authorize(self.client.delete(url), Some(&ctx.access_token))
            .header("Prefer", "return=representation")
            .send()
            .await
            .map_err(transport_error)?;

        let deleted: Vec<serde_json::Value> = decode(check_status(response).await?).await?;
        Ok(!deleted.is_empty())
    }
}

//! Flashcard generation endpoint

use axum::{
    extract::{Multipart, State},
    Extension, Json,
};

use crate::error::{ApiError, Result};
use crate::models::GenerateResponse;
use crate::routes::auth::AuthenticatedUser;
use crate::services::repository::DeckCardRepository;
use crate::AppState;

/// POST /api/flashcards/generate
///
/// Multipart upload: the `file` field carries the document bytes and its
/// filename becomes the deck name. The pipeline extracts text, generates
/// flashcards chunk by chunk and persists one deck holding all of them.
pub async fn generate(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    mut multipart: Multipart,
) -> Result<Json<GenerateResponse>> {
    let mut file_bytes = None;
    let mut deck_name = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("invalid multipart payload: {}", e)))?
    {
        if field.name() == Some("file") {
            deck_name = field.file_name().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("failed to read file field: {}", e)))?;
            file_bytes = Some(bytes);
        }
    }

    let file_bytes = file_bytes.ok_or_else(|| ApiError::BadRequest("No file provided".to_string()))?;
    let deck_name = deck_name.unwrap_or_else(|| "Untitled deck".to_string());

    let chunks = state.extractor.extract(&file_bytes).await?;
    tracing::info!(
        user_id = %auth.user_id,
        deck_name = %deck_name,
        chunks = chunks.len(),
        "extracted text chunks"
    );

    let mut flashcards = Vec::new();
    for chunk in &chunks {
        flashcards.extend(state.generator.generate(chunk).await?);
    }

    let repository = DeckCardRepository::new(state.store.clone());
    let (deck, cards) = repository
        .persist(&auth.user_id, &deck_name, &flashcards)
        .await?;

    Ok(Json(GenerateResponse { deck, cards }))
}

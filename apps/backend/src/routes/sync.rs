//! Sync endpoint

use axum::{extract::State, Extension, Json};

use crate::error::Result;
use crate::models::SyncSnapshot;
use crate::routes::auth::AuthenticatedUser;
use crate::services::sync::SyncReconciler;
use crate::AppState;

/// POST /api/sync
///
/// Writes the client snapshot atomically and returns the user's resulting
/// full snapshot.
pub async fn sync(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(snapshot): Json<SyncSnapshot>,
) -> Result<Json<SyncSnapshot>> {
    let reconciler = SyncReconciler::new(state.store.clone());
    let result = reconciler.sync(&auth.user_id, &snapshot).await?;
    Ok(Json(result))
}

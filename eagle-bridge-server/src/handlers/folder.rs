use axum::{Json, extract::State};
use eagle_bridge_core::FolderSummary;

use crate::infra::{
    app_state::AppState,
    errors::{AppError, AppResult},
};

/// GET /folder/list - folders of the active library, as the host reports them.
pub async fn list_folders(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<FolderSummary>>> {
    let folders = state.session.list_folders().await.map_err(|err| {
        AppError::from_upstream(err, "Failed to fetch folder list from Eagle API")
    })?;
    Ok(Json(folders))
}

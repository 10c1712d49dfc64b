use axum::{
    Json,
    extract::{Path, State},
};
use eagle_bridge_core::{GatewayError, ItemMetadata};
use tracing::error;

use crate::infra::{
    app_state::AppState,
    errors::{AppError, AppResult},
};

/// GET /api/item/info/{id} - item metadata straight from the host.
pub async fn get_item_info(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ItemMetadata>> {
    match state.session.item_info(&id).await {
        Ok(metadata) if !metadata.is_empty() => Ok(Json(metadata)),
        Ok(_) | Err(GatewayError::NotFound(_)) => Err(AppError::not_found(
            format!("Image with ID '{id}' not found."),
        )),
        Err(err) => {
            error!(item_id = %id, error = %err, "item info lookup failed");
            Err(AppError::internal(format!(
                "An error occurred while fetching item info: {err}"
            )))
        }
    }
}

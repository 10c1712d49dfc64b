use std::{collections::BTreeMap, path::PathBuf};

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use tracing::info;

use crate::infra::{app_state::AppState, errors::AppResult};

#[derive(Debug, Serialize)]
pub struct LibraryPathResponse {
    pub path: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// GET /library_list - every discovered library, name to path.
pub async fn list_libraries(
    State(state): State<AppState>,
) -> Json<BTreeMap<String, PathBuf>> {
    Json(state.registry.list())
}

/// GET /library/get/{name}
pub async fn get_library_path(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Json<LibraryPathResponse>> {
    let library = state.registry.get(&name)?;
    Ok(Json(LibraryPathResponse {
        path: library.path.clone(),
    }))
}

/// GET /library/switch/{name} - make the named library active in the host.
pub async fn switch_library(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let library = state.registry.get(&name)?;
    state.session.switch_to(&library.path).await?;

    info!(library = %name, "switched library");
    Ok(Json(MessageResponse {
        message: format!("Switched to library: {name}"),
    }))
}

/// GET /library/current - name of the library the host has open.
pub async fn current_library(
    State(state): State<AppState>,
) -> AppResult<Json<String>> {
    Ok(Json(state.session.current_name().await?))
}

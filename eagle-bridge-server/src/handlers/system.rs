use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};

use crate::infra::app_state::AppState;

/// GET /ping
pub async fn ping_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": "eagle-bridge is running",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// GET /health - reachability of the host application plus registry size.
pub async fn health_handler(State(state): State<AppState>) -> Response {
    let mut health_status = json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "checks": {
            "libraries": {
                "count": state.registry.len(),
                "root": state.registry.root(),
            }
        }
    });

    let mut is_unhealthy = false;

    match state.session.current_name().await {
        Ok(name) => {
            health_status["checks"]["host"] = json!({
                "status": "healthy",
                "library": name,
            });
        }
        Err(err) if err.is_not_found() => {
            health_status["checks"]["host"] = json!({
                "status": "healthy",
                "library": null,
            });
        }
        Err(err) => {
            health_status["checks"]["host"] = json!({
                "status": "unhealthy",
                "error": err.to_string(),
            });
            is_unhealthy = true;
        }
    }

    if is_unhealthy {
        health_status["status"] = json!("unhealthy");
        (StatusCode::SERVICE_UNAVAILABLE, Json(health_status)).into_response()
    } else {
        Json(health_status).into_response()
    }
}

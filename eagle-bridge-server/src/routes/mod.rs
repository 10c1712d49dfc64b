use axum::{Router, http::HeaderValue, routing::get};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::{
    handlers::{folder, image, item, library, system},
    infra::{app_state::AppState, config::CorsConfig},
};

/// Build the full application router.
pub fn create_app(state: AppState) -> Router {
    let cors_layer = build_cors_layer(&state.config().cors);

    Router::new()
        .route("/ping", get(system::ping_handler))
        .route("/health", get(system::health_handler))
        .merge(library_routes())
        .route("/folder/list", get(folder::list_folders))
        .route("/api/item/info/{id}", get(item::get_item_info))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer),
        )
        .with_state(state)
}

fn library_routes() -> Router<AppState> {
    Router::new()
        .route("/library_list", get(library::list_libraries))
        .route("/library/get/{name}", get(library::get_library_path))
        .route("/library/switch/{name}", get(library::switch_library))
        .route("/library/current", get(library::current_library))
        .route("/library/image/{id}", get(image::get_image))
        .route("/library/image_list", get(image::list_images))
}

// No origins means no cross-origin access; a "*" entry means any origin,
// without credentials.
fn build_cors_layer(cors: &CorsConfig) -> CorsLayer {
    if cors.allows_any_origin() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = cors
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        return CorsLayer::new();
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

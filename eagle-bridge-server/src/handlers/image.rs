use axum::{
    Json,
    body::{Body, Bytes},
    extract::{Path, Query, State},
    http::{HeaderName, HeaderValue, StatusCode, header},
    response::Response,
};
use eagle_bridge_core::{DeliveryBody, GatewayError, ImageDelivery, ItemSummary};
use futures_util::stream;
use serde::Deserialize;
use tokio_util::io::ReaderStream;
use tracing::{debug, warn};

use crate::infra::{
    app_state::AppState,
    errors::{AppError, AppResult},
};

/// Chunk size for streamed (buffered) image bodies.
const STREAM_CHUNK_BYTES: usize = 64 * 1024;

const DEFAULT_LIST_LIMIT: u32 = 100;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageListQuery {
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub offset: usize,
    #[serde(default)]
    pub folder_id: Option<String>,
}

fn default_limit() -> u32 {
    DEFAULT_LIST_LIMIT
}

/// GET /library/image/{id} - the item's original image, or its thumbnail
/// when the original is missing.
pub async fn get_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let resolved = state.resolver.resolve(&id).await?;

    let delivery = state.delivery.deliver(&resolved).await.map_err(|err| {
        match err {
            GatewayError::NotFound(_) => AppError::not_found(format!(
                "Image file not found for ID: {id}"
            )),
            other => other.into(),
        }
    })?;

    debug!(
        item_id = %id,
        path = %resolved.path.display(),
        original = resolved.is_original,
        strategy = ?delivery.strategy,
        "serving image"
    );

    image_response(delivery)
}

/// GET /library/image_list?limit&offset&folderId
pub async fn list_images(
    State(state): State<AppState>,
    Query(query): Query<ImageListQuery>,
) -> AppResult<Json<Vec<ItemSummary>>> {
    let items = state
        .session
        .list_items(query.limit, query.offset, query.folder_id.as_deref())
        .await
        .map_err(|err| {
            AppError::from_upstream(
                err,
                "Failed to fetch image list from Eagle API",
            )
        })?;
    Ok(Json(items))
}

fn image_response(delivery: ImageDelivery) -> AppResult<Response> {
    let ImageDelivery {
        content_type,
        cache_control,
        image_data,
        size,
        body,
        ..
    } = delivery;

    let image_data = HeaderValue::from_str(&image_data).map_err(|err| {
        warn!(error = %err, "item metadata is not a valid header value");
        AppError::internal("Item metadata could not be encoded")
    })?;

    let builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CACHE_CONTROL, cache_control)
        .header(HeaderName::from_static("image-data"), image_data);

    let response = match body {
        DeliveryBody::File(file) => builder
            .header(header::CONTENT_LENGTH, size.to_string())
            .body(Body::from_stream(ReaderStream::new(file))),
        DeliveryBody::Buffered(bytes) => {
            builder.body(Body::from_stream(chunked(Bytes::from(bytes))))
        }
    };

    response.map_err(|err| {
        AppError::internal(format!("failed to build image response: {err}"))
    })
}

fn chunked(
    bytes: Bytes,
) -> impl futures_util::Stream<Item = Result<Bytes, std::io::Error>> {
    let len = bytes.len();
    stream::iter((0..len).step_by(STREAM_CHUNK_BYTES).map(move |start| {
        let end = (start + STREAM_CHUNK_BYTES).min(len);
        Ok(bytes.slice(start..end))
    }))
}

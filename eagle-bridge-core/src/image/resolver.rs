use std::{
    borrow::Cow,
    path::{Path, PathBuf},
    sync::Arc,
};

use tracing::debug;

use crate::{ActiveLibrarySession, GatewayError, ItemMetadata, Result};

/// The file chosen to represent an item, plus the metadata it was chosen
/// from.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedImage {
    pub path: PathBuf,
    pub metadata: ItemMetadata,
    /// `false` when the thumbnail stands in for a missing original.
    pub is_original: bool,
}

/// Turns an item id into the best image file available on disk.
#[derive(Debug, Clone)]
pub struct ImageResolver {
    session: Arc<ActiveLibrarySession>,
}

impl ImageResolver {
    pub fn new(session: Arc<ActiveLibrarySession>) -> Self {
        Self { session }
    }

    /// Resolve `id` to a file.
    ///
    /// The original is looked for next to the thumbnail as `{name}.{ext}`.
    /// When it is missing the thumbnail itself is served instead, so a
    /// missing original only degrades quality. `NotFound` is returned when
    /// the host cannot describe the item or neither file exists.
    pub async fn resolve(&self, id: &str) -> Result<ResolvedImage> {
        let (thumbnail, metadata) = tokio::join!(
            self.session.thumbnail_path(id),
            self.session.item_info(id)
        );
        let thumbnail = thumbnail.map_err(|err| lookup_failed(id, err))?;
        let metadata = metadata.map_err(|err| lookup_failed(id, err))?;

        let thumbnail = PathBuf::from(decode_path(&thumbnail).as_ref());

        if let Some(original) = original_candidate(&thumbnail, &metadata)
            && is_file(&original).await
        {
            return Ok(ResolvedImage {
                path: original,
                metadata,
                is_original: true,
            });
        }

        if is_file(&thumbnail).await {
            debug!(
                item_id = id,
                path = %thumbnail.display(),
                "original missing, falling back to thumbnail"
            );
            return Ok(ResolvedImage {
                path: thumbnail,
                metadata,
                is_original: false,
            });
        }

        Err(GatewayError::not_found(format!(
            "Image file not found for ID: {id}"
        )))
    }
}

fn lookup_failed(id: &str, err: GatewayError) -> GatewayError {
    debug!(item_id = id, error = %err, "item lookup failed");
    GatewayError::not_found(format!("Image not found for ID: {id}"))
}

/// Percent-decode a host path, keeping the raw text if it is not valid
/// UTF-8 once decoded.
pub fn decode_path(raw: &str) -> Cow<'_, str> {
    urlencoding::decode(raw).unwrap_or(Cow::Borrowed(raw))
}

/// `{dir of thumbnail}/{name}.{ext}`. Missing fields read as empty strings.
pub fn original_candidate(
    thumbnail: &Path,
    metadata: &ItemMetadata,
) -> Option<PathBuf> {
    let dir = thumbnail.parent()?;
    Some(dir.join(format!("{}.{}", metadata.name(), metadata.ext())))
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|meta| meta.is_file())
        .unwrap_or(false)
}

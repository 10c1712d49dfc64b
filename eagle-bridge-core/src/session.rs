use std::{fmt, path::Path, sync::Arc};

use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    FolderSummary, GatewayError, ItemMetadata, ItemSummary, Result,
    host::HostApi,
};

/// Handle on the host application's notion of the active library.
///
/// The gateway keeps no copy of "current library": every read goes to the
/// host, which stays authoritative. Switches are serialized so two requests
/// can never interleave their switch calls against the host.
pub struct ActiveLibrarySession {
    host: Arc<dyn HostApi>,
    public_base_url: String,
    switch_lock: Mutex<()>,
}

impl fmt::Debug for ActiveLibrarySession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveLibrarySession")
            .field("public_base_url", &self.public_base_url)
            .finish_non_exhaustive()
    }
}

impl ActiveLibrarySession {
    /// `public_base_url` is the externally visible address of this gateway,
    /// used to build the image URLs embedded in item listings.
    pub fn new(host: Arc<dyn HostApi>, public_base_url: impl Into<String>) -> Self {
        let public_base_url = public_base_url.into().trim_end_matches('/').to_string();
        Self {
            host,
            public_base_url,
            switch_lock: Mutex::new(()),
        }
    }

    /// Make the library at `path` the host's active library.
    ///
    /// Fails with `NotFound` when `path` no longer exists. Host errors are
    /// returned unchanged and never retried.
    pub async fn switch_to(&self, path: &Path) -> Result<()> {
        let _guard = self.switch_lock.lock().await;

        if !tokio::fs::try_exists(path).await.unwrap_or(false) {
            return Err(GatewayError::not_found("Library path does not exist"));
        }

        self.host.switch_library(path).await?;
        info!(path = %path.display(), "active library switched");
        Ok(())
    }

    /// Name of the library the host currently has open.
    pub async fn current_name(&self) -> Result<String> {
        let info = self.host.library_info().await?;
        info.get("library")
            .and_then(|library| library.get("name"))
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                GatewayError::not_found("Library information not found")
            })
    }

    pub async fn item_info(&self, id: &str) -> Result<ItemMetadata> {
        self.host.item_info(id).await
    }

    pub async fn thumbnail_path(&self, id: &str) -> Result<String> {
        self.host.item_thumbnail(id).await
    }

    /// List items with client-side paging.
    ///
    /// The host only understands `limit`, so `offset` is applied by dropping
    /// the leading rows of its answer. An offset past the end is an empty
    /// page, not an error.
    pub async fn list_items(
        &self,
        limit: u32,
        offset: usize,
        folder_id: Option<&str>,
    ) -> Result<Vec<ItemSummary>> {
        let folder_id = folder_id.filter(|id| !id.is_empty()).map(str::to_string);
        let rows = self.host.list_items(limit, folder_id).await?;

        Ok(rows
            .into_iter()
            .skip(offset)
            .filter_map(|row| match row.get("id").and_then(Value::as_str) {
                Some(id) => Some(ItemSummary {
                    id: id.to_string(),
                    thumbnail_url: self.image_url(id),
                }),
                None => {
                    debug!("skipping host item without id");
                    None
                }
            })
            .collect())
    }

    pub async fn list_folders(&self) -> Result<Vec<FolderSummary>> {
        self.host.list_folders().await.inspect_err(|err| {
            warn!(error = %err, "folder listing failed");
        })
    }

    /// Gateway URL that serves the image for `id`.
    pub fn image_url(&self, id: &str) -> String {
        format!(
            "{}/library/image/{}",
            self.public_base_url,
            urlencoding::encode(id)
        )
    }
}

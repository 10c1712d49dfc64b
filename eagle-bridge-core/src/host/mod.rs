//! Port to the host application's local HTTP API.
//!
//! The gateway never owns the host's state. Everything it knows about the
//! current library, items and folders comes through [`HostApi`].

use std::path::Path;

use async_trait::async_trait;
use serde_json::Value;

use crate::{ItemMetadata, Result};

pub mod eagle_client;

pub use eagle_client::{DEFAULT_HOST_TIMEOUT, DEFAULT_HOST_URL, EagleClient};

/// Operations the gateway needs from the host application.
///
/// Every method fails with [`GatewayError::UpstreamUnavailable`] when the
/// host does not answer with success.
///
/// [`GatewayError::UpstreamUnavailable`]: crate::GatewayError::UpstreamUnavailable
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HostApi: Send + Sync {
    /// Raw library info payload (`data` of `/api/library/info`).
    async fn library_info(&self) -> Result<Value>;

    /// Ask the host to open the library at `path`.
    async fn switch_library(&self, path: &Path) -> Result<()>;

    /// Metadata for one item. `NotFound` when the host has no such item.
    async fn item_info(&self, id: &str) -> Result<ItemMetadata>;

    /// Thumbnail path for one item, possibly percent-encoded.
    async fn item_thumbnail(&self, id: &str) -> Result<String>;

    /// Up to `limit` items, optionally restricted to one folder.
    async fn list_items(
        &self,
        limit: u32,
        folder_id: Option<String>,
    ) -> Result<Vec<Value>>;

    async fn list_folders(&self) -> Result<Vec<Value>>;
}

use std::{io, path::Path};

use tracing::debug;

use super::ResolvedImage;
use crate::{GatewayError, ItemMetadata, Result};

/// Files above this many bytes are streamed instead of sent directly.
pub const DEFAULT_STREAM_THRESHOLD_BYTES: u64 = 300 * 1024;

/// Images are named by item id and never change under that name.
pub const IMAGE_CACHE_CONTROL: &str = "public, max-age=31536000";

/// Response header carrying the item metadata as JSON.
pub const IMAGE_DATA_HEADER: &str = "Image-Data";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStrategy {
    /// Send the file as-is with a known length.
    Direct,
    /// Read the file once, then stream it in chunks.
    Streamed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryPolicy {
    pub stream_threshold_bytes: u64,
}

impl Default for DeliveryPolicy {
    fn default() -> Self {
        Self {
            stream_threshold_bytes: DEFAULT_STREAM_THRESHOLD_BYTES,
        }
    }
}

impl DeliveryPolicy {
    pub fn with_threshold(stream_threshold_bytes: u64) -> Self {
        Self {
            stream_threshold_bytes,
        }
    }

    /// The threshold itself is still delivered directly.
    pub fn strategy_for(&self, size: u64) -> DeliveryStrategy {
        if size > self.stream_threshold_bytes {
            DeliveryStrategy::Streamed
        } else {
            DeliveryStrategy::Direct
        }
    }
}

#[derive(Debug)]
pub enum DeliveryBody {
    File(tokio::fs::File),
    Buffered(Vec<u8>),
}

/// Everything the HTTP layer needs to answer an image request.
#[derive(Debug)]
pub struct ImageDelivery {
    pub content_type: String,
    pub cache_control: &'static str,
    pub image_data: String,
    pub size: u64,
    pub strategy: DeliveryStrategy,
    pub body: DeliveryBody,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ContentDelivery {
    policy: DeliveryPolicy,
}

impl ContentDelivery {
    pub fn new(policy: DeliveryPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> DeliveryPolicy {
        self.policy
    }

    /// Open the resolved file and pick a strategy for it.
    ///
    /// The file is checked again here: it may have disappeared since it was
    /// resolved, in which case this is `NotFound`.
    pub async fn deliver(&self, resolved: &ResolvedImage) -> Result<ImageDelivery> {
        let path = resolved.path.as_path();

        let meta = tokio::fs::metadata(path)
            .await
            .map_err(|err| vanished(path, err))?;
        if !meta.is_file() {
            return Err(not_found(path));
        }

        let size = meta.len();
        let strategy = self.policy.strategy_for(size);

        let body = match strategy {
            DeliveryStrategy::Direct => DeliveryBody::File(
                tokio::fs::File::open(path)
                    .await
                    .map_err(|err| vanished(path, err))?,
            ),
            DeliveryStrategy::Streamed => DeliveryBody::Buffered(
                tokio::fs::read(path)
                    .await
                    .map_err(|err| vanished(path, err))?,
            ),
        };

        debug!(
            path = %path.display(),
            size,
            ?strategy,
            original = resolved.is_original,
            "delivering image"
        );

        Ok(ImageDelivery {
            content_type: content_type_for(path),
            cache_control: IMAGE_CACHE_CONTROL,
            image_data: header_json(&resolved.metadata)?,
            size,
            strategy,
            body,
        })
    }
}

/// `image/<ext>` from the lower-cased file extension.
pub fn content_type_for(path: &Path) -> String {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if !ext.is_empty() => {
            format!("image/{}", ext.to_ascii_lowercase())
        }
        _ => "application/octet-stream".to_string(),
    }
}

/// Compact JSON with every non-ASCII character written as `\uXXXX`, so the
/// result is a valid header value.
pub fn header_json(metadata: &ItemMetadata) -> Result<String> {
    let raw = serde_json::to_string(metadata)?;
    if raw.bytes().all(|b| (0x20..0x7f).contains(&b)) {
        return Ok(raw);
    }

    let mut escaped = String::with_capacity(raw.len() + 16);
    for ch in raw.chars() {
        if (' '..'\u{7f}').contains(&ch) {
            escaped.push(ch);
            continue;
        }
        let mut units = [0u16; 2];
        for unit in ch.encode_utf16(&mut units) {
            escaped.push_str(&format!("\\u{unit:04x}"));
        }
    }
    Ok(escaped)
}

fn not_found(path: &Path) -> GatewayError {
    GatewayError::not_found(format!("Image file not found: {}", path.display()))
}

fn vanished(path: &Path, err: io::Error) -> GatewayError {
    if err.kind() == io::ErrorKind::NotFound {
        not_found(path)
    } else {
        GatewayError::Io(err)
    }
}

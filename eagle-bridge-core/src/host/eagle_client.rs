use std::{fmt, path::Path, time::Duration};

use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use super::HostApi;
use crate::{GatewayError, ItemMetadata, Result};

/// Where the host application listens unless configured otherwise.
pub const DEFAULT_HOST_URL: &str = "http://localhost:41595";

/// Per-request budget for host calls.
pub const DEFAULT_HOST_TIMEOUT: Duration = Duration::from_secs(10);

const SUCCESS: &str = "success";

/// Response wrapper used by every host endpoint.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    data: Option<Value>,
}

#[derive(Debug, Serialize)]
struct ItemQuery<'a> {
    id: &'a str,
}

#[derive(Debug, Serialize)]
struct ListQuery<'a> {
    limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    folders: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SwitchRequest<'a> {
    library_path: &'a str,
}

/// reqwest-backed [`HostApi`] talking to the host's local HTTP API.
#[derive(Clone)]
pub struct EagleClient {
    http: reqwest::Client,
    base: Url,
}

impl fmt::Debug for EagleClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EagleClient")
            .field("base", &self.base.as_str())
            .finish_non_exhaustive()
    }
}

impl EagleClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base = Url::parse(base_url).map_err(|err| {
            GatewayError::Internal(format!(
                "invalid host application URL {base_url}: {err}"
            ))
        })?;

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| {
                GatewayError::Internal(format!(
                    "failed to build HTTP client: {err}"
                ))
            })?;

        Ok(Self { http, base })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base.join(path).map_err(|err| {
            GatewayError::Internal(format!("invalid host endpoint {path}: {err}"))
        })
    }

    /// Send a request and unwrap the host's `{status, data}` envelope.
    async fn send(&self, request: RequestBuilder) -> Result<Option<Value>> {
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "host application request failed");
            return Err(GatewayError::upstream(status.as_u16(), body));
        }

        let envelope: Envelope = serde_json::from_str(&body).map_err(|err| {
            warn!(error = %err, "host application returned malformed JSON");
            GatewayError::upstream(StatusCode::BAD_GATEWAY.as_u16(), body.clone())
        })?;

        match envelope.status.as_deref() {
            Some(SUCCESS) => Ok(envelope.data.filter(|data| !data.is_null())),
            other => {
                warn!(status = ?other, "host application reported failure");
                Err(GatewayError::upstream(
                    StatusCode::BAD_GATEWAY.as_u16(),
                    body,
                ))
            }
        }
    }

    async fn get(&self, path: &str) -> Result<Option<Value>> {
        let url = self.endpoint(path)?;
        debug!(%url, "host GET");
        self.send(self.http.get(url)).await
    }

    async fn get_with<Q>(&self, path: &str, query: &Q) -> Result<Option<Value>>
    where
        Q: Serialize + ?Sized,
    {
        let url = self.endpoint(path)?;
        debug!(%url, "host GET");
        self.send(self.http.get(url).query(query)).await
    }
}

#[async_trait]
impl HostApi for EagleClient {
    async fn library_info(&self) -> Result<Value> {
        Ok(self.get("/api/library/info").await?.unwrap_or(Value::Null))
    }

    async fn switch_library(&self, path: &Path) -> Result<()> {
        let library_path = path.to_string_lossy();
        let url = self.endpoint("/api/library/switch")?;
        let request = self.http.post(url).json(&SwitchRequest {
            library_path: &library_path[..],
        });
        self.send(request).await?;
        Ok(())
    }

    async fn item_info(&self, id: &str) -> Result<ItemMetadata> {
        match self.get_with("/api/item/info", &ItemQuery { id }).await? {
            Some(Value::Object(fields)) if !fields.is_empty() => {
                Ok(ItemMetadata::new(fields))
            }
            Some(Value::Object(_)) | None => Err(GatewayError::not_found(
                format!("Image with ID '{id}' not found."),
            )),
            Some(other) => Err(GatewayError::Internal(format!(
                "unexpected item info payload for {id}: {other}"
            ))),
        }
    }

    async fn item_thumbnail(&self, id: &str) -> Result<String> {
        match self.get_with("/api/item/thumbnail", &ItemQuery { id }).await? {
            Some(Value::String(path)) if !path.is_empty() => Ok(path),
            _ => Err(GatewayError::not_found(format!(
                "Thumbnail not found for ID: {id}"
            ))),
        }
    }

    async fn list_items(
        &self,
        limit: u32,
        folder_id: Option<String>,
    ) -> Result<Vec<Value>> {
        let query = ListQuery {
            limit,
            folders: folder_id.as_deref(),
        };
        let data = self.get_with("/api/item/list", &query).await?;
        Ok(into_rows(data))
    }

    async fn list_folders(&self) -> Result<Vec<Value>> {
        let data = self.get("/api/folder/list").await?;
        Ok(into_rows(data))
    }
}

fn into_rows(data: Option<Value>) -> Vec<Value> {
    match data {
        Some(Value::Array(rows)) => rows,
        _ => Vec::new(),
    }
}

fn transport_error(err: reqwest::Error) -> GatewayError {
    let status = if err.is_timeout() {
        StatusCode::GATEWAY_TIMEOUT
    } else {
        StatusCode::BAD_GATEWAY
    };
    warn!(error = %err, "host application unreachable");
    GatewayError::upstream(status.as_u16(), err.to_string())
}

#![allow(dead_code)]

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use eagle_bridge_core::{
    ActiveLibrarySession, GatewayError, HostApi, ItemMetadata, Result,
};
use serde_json::{Value, json};

/// In-memory stand-in for the host application.
#[derive(Debug, Default)]
pub struct FakeHost {
    items: HashMap<String, (String, Value)>,
    rows: Vec<Value>,
    folders: Vec<Value>,
    failing_status: Option<u16>,
    current: Mutex<Option<PathBuf>>,
    switch_calls: AtomicUsize,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(
        mut self,
        id: &str,
        thumbnail: impl Into<String>,
        info: Value,
    ) -> Self {
        self.items.insert(id.to_string(), (thumbnail.into(), info));
        self
    }

    pub fn with_rows(mut self, count: usize) -> Self {
        self.rows = (0..count).map(|i| json!({"id": format!("item{i}")})).collect();
        self
    }

    pub fn with_folders(mut self, folders: Vec<Value>) -> Self {
        self.folders = folders;
        self
    }

    pub fn failing(mut self, status: u16) -> Self {
        self.failing_status = Some(status);
        self
    }

    pub fn switch_calls(&self) -> usize {
        self.switch_calls.load(Ordering::SeqCst)
    }

    pub fn into_session(self) -> (Arc<Self>, Arc<ActiveLibrarySession>) {
        let host = Arc::new(self);
        let session = Arc::new(ActiveLibrarySession::new(
            host.clone(),
            "http://localhost:8000",
        ));
        (host, session)
    }

    fn check(&self) -> Result<()> {
        match self.failing_status {
            Some(status) => Err(GatewayError::upstream(status, "host failure")),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl HostApi for FakeHost {
    async fn library_info(&self) -> Result<Value> {
        self.check()?;
        let current = self.current.lock().unwrap().clone();
        Ok(match current {
            Some(path) => {
                let name = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or_default()
                    .to_string();
                json!({"library": {"name": name, "path": path}})
            }
            None => json!({}),
        })
    }

    async fn switch_library(&self, path: &Path) -> Result<()> {
        self.check()?;
        self.switch_calls.fetch_add(1, Ordering::SeqCst);
        *self.current.lock().unwrap() = Some(path.to_path_buf());
        Ok(())
    }

    async fn item_info(&self, id: &str) -> Result<ItemMetadata> {
        self.check()?;
        match self.items.get(id) {
            Some((_, Value::Object(fields))) => Ok(ItemMetadata::new(fields.clone())),
            _ => Err(GatewayError::not_found(format!("Image with ID '{id}' not found."))),
        }
    }

    async fn item_thumbnail(&self, id: &str) -> Result<String> {
        self.check()?;
        self.items
            .get(id)
            .map(|(thumbnail, _)| thumbnail.clone())
            .ok_or_else(|| GatewayError::not_found("no thumbnail"))
    }

    async fn list_items(
        &self,
        limit: u32,
        _folder_id: Option<String>,
    ) -> Result<Vec<Value>> {
        self.check()?;
        Ok(self.rows.iter().take(limit as usize).cloned().collect())
    }

    async fn list_folders(&self) -> Result<Vec<Value>> {
        self.check()?;
        Ok(self.folders.clone())
    }
}

#![allow(dead_code)]

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use anyhow::Result;
use async_trait::async_trait;
use axum_test::TestServer;
use eagle_bridge_core::{GatewayError, HostApi, ItemMetadata, LibraryRegistry};
use eagle_bridge_server::{AppState, create_app, infra::config::Config};
use serde_json::{Value, json};
use tempfile::TempDir;

/// Host application double shared by the route tests.
#[derive(Debug, Default)]
pub struct FakeHost {
    items: HashMap<String, (String, Value)>,
    rows: Vec<Value>,
    folders: Vec<Value>,
    failing_status: Option<u16>,
    broken_item_info: bool,
    current: Mutex<Option<PathBuf>>,
    switch_calls: AtomicUsize,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(mut self, id: &str, thumbnail: impl Into<String>, info: Value) -> Self {
        self.items.insert(id.to_string(), (thumbnail.into(), info));
        self
    }

    pub fn with_rows(mut self, rows: Vec<Value>) -> Self {
        self.rows = rows;
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

    pub fn with_broken_item_info(mut self) -> Self {
        self.broken_item_info = true;
        self
    }

    pub fn switch_calls(&self) -> usize {
        self.switch_calls.load(Ordering::SeqCst)
    }

    fn check(&self) -> eagle_bridge_core::Result<()> {
        match self.failing_status {
            Some(status) => Err(GatewayError::upstream(status, "host is unavailable")),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl HostApi for FakeHost {
    async fn library_info(&self) -> eagle_bridge_core::Result<Value> {
        self.check()?;
        let current = self.current.lock().unwrap().clone();
        Ok(match current {
            Some(path) => {
                let name = path
                    .file_stem()
                    .and_then(|stem| stem.to_str())
                    .unwrap_or_default()
                    .to_string();
                json!({"library": {"name": name, "path": path}})
            }
            None => json!({}),
        })
    }

    async fn switch_library(&self, path: &Path) -> eagle_bridge_core::Result<()> {
        self.check()?;
        self.switch_calls.fetch_add(1, Ordering::SeqCst);
        *self.current.lock().unwrap() = Some(path.to_path_buf());
        Ok(())
    }

    async fn item_info(&self, id: &str) -> eagle_bridge_core::Result<ItemMetadata> {
        self.check()?;
        if self.broken_item_info {
            return Err(GatewayError::Internal("malformed item payload".to_string()));
        }
        match self.items.get(id) {
            Some((_, Value::Object(fields))) => Ok(ItemMetadata::new(fields.clone())),
            _ => Err(GatewayError::not_found(format!("Image with ID '{id}' not found."))),
        }
    }

    async fn item_thumbnail(&self, id: &str) -> eagle_bridge_core::Result<String> {
        self.check()?;
        self.items
            .get(id)
            .map(|(thumbnail, _)| thumbnail.clone())
            .ok_or_else(|| GatewayError::not_found("Thumbnail not found"))
    }

    async fn list_items(
        &self,
        limit: u32,
        _folder_id: Option<String>,
    ) -> eagle_bridge_core::Result<Vec<Value>> {
        self.check()?;
        Ok(self.rows.iter().take(limit as usize).cloned().collect())
    }

    async fn list_folders(&self) -> eagle_bridge_core::Result<Vec<Value>> {
        self.check()?;
        Ok(self.folders.clone())
    }
}

/// Running router plus the on-disk fixture behind it.
pub struct TestApp {
    pub server: TestServer,
    pub host: Arc<FakeHost>,
    pub root: PathBuf,
    _tempdir: TempDir,
}

/// Library tree used by every test:
///
/// ```text
/// root/
///   Work.library/
///   Travel.library/
///   archive/Old.library/
///   .cache/Hidden.library/
///   notes.txt
/// ```
pub fn library_tree() -> Result<TempDir> {
    let tempdir = TempDir::new()?;
    let root = tempdir.path();
    for dir in [
        "Work.library",
        "Travel.library",
        "archive/Old.library",
        ".cache/Hidden.library",
    ] {
        std::fs::create_dir_all(root.join(dir))?;
    }
    std::fs::write(root.join("notes.txt"), b"not a library")?;
    Ok(tempdir)
}

pub fn build_test_app(host: FakeHost) -> Result<TestApp> {
    build_test_app_with(host, |_| {})
}

pub fn build_test_app_with(
    host: FakeHost,
    configure: impl FnOnce(&mut Config),
) -> Result<TestApp> {
    let tempdir = library_tree()?;
    let root = tempdir.path().canonicalize()?;

    let mut config = Config::default();
    config.library.search_path = Some(root.clone());
    configure(&mut config);

    let host = Arc::new(host);
    let state = AppState::new(
        Arc::new(config),
        LibraryRegistry::discover(&root),
        host.clone(),
    );
    let server = TestServer::new(create_app(state))
        .map_err(|err| anyhow::anyhow!(err.to_string()))?;

    Ok(TestApp {
        server,
        host,
        root,
        _tempdir: tempdir,
    })
}

/// Percent-encode every `/`, the way the host reports thumbnail paths.
pub fn encode_slashes(path: &Path) -> String {
    path.to_string_lossy().replace('/', "%2F")
}

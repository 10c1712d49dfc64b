use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A library directory found on disk, named after its folder with the
/// `.library` suffix removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Library {
    pub name: String,
    pub path: PathBuf,
}

/// Item metadata exactly as the host application reported it.
///
/// Only `id`, `name` and `ext` are interpreted by the gateway. Every other
/// field is carried through untouched and in the host's original order, so
/// clients see the same object the host produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemMetadata(Map<String, Value>);

impl ItemMetadata {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn id(&self) -> &str {
        self.str_field("id")
    }

    pub fn name(&self) -> &str {
        self.str_field("name")
    }

    pub fn ext(&self) -> &str {
        self.str_field("ext")
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }

    // Missing, null and non-string values all read as "".
    fn str_field(&self, key: &str) -> &str {
        self.0.get(key).and_then(Value::as_str).unwrap_or_default()
    }
}

impl From<Map<String, Value>> for ItemMetadata {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// One entry of an item listing, pointing at the gateway's own image route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSummary {
    pub id: String,
    pub thumbnail_url: String,
}

/// Folder objects are forwarded as the host returns them.
pub type FolderSummary = Value;

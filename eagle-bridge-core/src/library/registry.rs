use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::{GatewayError, Library, Result};

/// Directory-name suffix that marks a library root.
pub const LIBRARY_SUFFIX: &str = ".library";

/// Name to path snapshot of the libraries found under a search root.
///
/// Built once by [`LibraryRegistry::discover`] and read-only afterwards.
/// A later scan produces a new registry instead of mutating this one.
#[derive(Debug, Clone, Default)]
pub struct LibraryRegistry {
    root: Option<PathBuf>,
    libraries: BTreeMap<String, Library>,
}

impl LibraryRegistry {
    /// Registry with no libraries, used when no search root is configured.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Recursively scan `root` for `*.library` directories.
    ///
    /// Discovery is advisory: an unreadable root yields an empty registry and
    /// entries that fail mid-walk are skipped, so the result may be partial
    /// but never an error. Hidden directories are not descended into.
    ///
    /// When two libraries share a name, the one visited later wins. Walk
    /// order follows the filesystem and is not guaranteed to be stable.
    pub fn discover(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();

        let root = match std::fs::canonicalize(root) {
            Ok(path) if path.is_dir() => path,
            Ok(path) => {
                warn!(
                    path = %path.display(),
                    "library search path is not a directory"
                );
                return Self::empty();
            }
            Err(err) => {
                warn!(
                    path = %root.display(),
                    error = %err,
                    "library search path is unreadable"
                );
                return Self::empty();
            }
        };

        let mut libraries = BTreeMap::new();
        let mut walk_errors = 0usize;

        let walker = WalkDir::new(&root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    walk_errors += 1;
                    debug!(error = %err, "skipping unreadable entry");
                    continue;
                }
            };

            if entry.depth() == 0 || !is_directory(&entry) {
                continue;
            }

            let Some(name) = library_name(entry.file_name().to_str()) else {
                continue;
            };

            if let Some(previous) = libraries.insert(
                name.to_string(),
                Library {
                    name: name.to_string(),
                    path: entry.path().to_path_buf(),
                },
            ) {
                debug!(
                    library = name,
                    replaced = %previous.path.display(),
                    "duplicate library name, keeping the later one"
                );
            }
        }

        info!(
            root = %root.display(),
            libraries = libraries.len(),
            walk_errors,
            "library discovery complete"
        );

        Self {
            root: Some(root),
            libraries,
        }
    }

    /// Build a registry from already-known libraries.
    pub fn from_libraries(libraries: impl IntoIterator<Item = Library>) -> Self {
        Self {
            root: None,
            libraries: libraries
                .into_iter()
                .map(|library| (library.name.clone(), library))
                .collect(),
        }
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// All libraries as a name to path mapping.
    pub fn list(&self) -> BTreeMap<String, PathBuf> {
        self.libraries
            .iter()
            .map(|(name, library)| (name.clone(), library.path.clone()))
            .collect()
    }

    pub fn get(&self, name: &str) -> Result<&Library> {
        self.libraries
            .get(name)
            .ok_or_else(|| GatewayError::not_found("Library not found"))
    }

    pub fn len(&self) -> usize {
        self.libraries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty()
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

/// Library name for a directory name, if it names a library.
// Symlinks are not walked into, but a linked library still counts.
fn is_directory(entry: &DirEntry) -> bool {
    if entry.path_is_symlink() {
        entry.path().is_dir()
    } else {
        entry.file_type().is_dir()
    }
}

fn library_name(dir_name: Option<&str>) -> Option<&str> {
    let name = dir_name?.strip_suffix(LIBRARY_SUFFIX)?;
    if name.is_empty() || name.starts_with('.') {
        return None;
    }
    Some(name)
}

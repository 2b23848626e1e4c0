//! Layout persistence.
//!
//! [`LayoutStore`] is the seam the simulation loads layouts through.  Two
//! implementations are provided:
//!
//! - [`FileLayoutStore`]: one pretty-printed JSON file per layout in a
//!   directory;
//! - [`MemoryLayoutStore`]: a process-local map, for tests and for layouts
//!   built in code.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use log::debug;

use crate::{Layout, LayoutError, LayoutResult};

/// Load and save [`Layout`] documents by name.
pub trait LayoutStore {
    /// Fetch the layout stored under `name`.
    ///
    /// # Errors
    ///
    /// `NotFound` if no such layout exists, `Io` for read failures, `Parse`
    /// if the stored document is not a layout.
    fn load(&self, name: &str) -> LayoutResult<Layout>;

    /// Store `layout` under `name`, replacing any previous document.
    fn save(&self, layout: &Layout, name: &str) -> LayoutResult<()>;

    /// Absolute location of the stored document, if it has one.
    ///
    /// Handed to the decision service during the environment handshake.
    fn path_of(&self, _name: &str) -> Option<PathBuf> {
        None
    }
}

// ── FileLayoutStore ───────────────────────────────────────────────────────────

/// Stores each layout as `<dir>/<name>.json`.
///
/// A `name` that already ends in `.json` is used as-is.
#[derive(Clone, Debug)]
pub struct FileLayoutStore {
    dir: PathBuf,
}

impl FileLayoutStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `name` (not necessarily existing).
    pub fn file_for(&self, name: &str) -> PathBuf {
        if name.ends_with(".json") {
            self.dir.join(name)
        } else {
            self.dir.join(format!("{name}.json"))
        }
    }
}

impl LayoutStore for FileLayoutStore {
    fn load(&self, name: &str) -> LayoutResult<Layout> {
        let path = self.file_for(name);
        let file = match fs::File::open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(LayoutError::NotFound(name.to_owned()));
            }
            Err(e) => return Err(LayoutError::Io(e)),
        };
        debug!("loading layout {name:?} from {}", path.display());
        load_reader(file)
    }

    fn save(&self, layout: &Layout, name: &str) -> LayoutResult<()> {
        let path = self.file_for(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(layout)
            .map_err(|e| LayoutError::Parse(e.to_string()))?;
        fs::write(&path, json)?;
        debug!("saved layout {name:?} to {}", path.display());
        Ok(())
    }

    fn path_of(&self, name: &str) -> Option<PathBuf> {
        std::path::absolute(self.file_for(name)).ok()
    }
}

/// Parse a layout document from any `Read` source.
pub fn load_reader<R: Read>(reader: R) -> LayoutResult<Layout> {
    serde_json::from_reader(reader).map_err(|e| LayoutError::Parse(e.to_string()))
}

/// Parse a layout document from a JSON string.
pub fn load_str(json: &str) -> LayoutResult<Layout> {
    serde_json::from_str(json).map_err(|e| LayoutError::Parse(e.to_string()))
}

// ── MemoryLayoutStore ─────────────────────────────────────────────────────────

/// An in-process store.  Layouts are cloned in and out.
#[derive(Debug, Default)]
pub struct MemoryLayoutStore {
    layouts: Mutex<HashMap<String, Layout>>,
}

impl MemoryLayoutStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.layouts.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LayoutStore for MemoryLayoutStore {
    fn load(&self, name: &str) -> LayoutResult<Layout> {
        self.layouts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
            .ok_or_else(|| LayoutError::NotFound(name.to_owned()))
    }

    fn save(&self, layout: &Layout, name: &str) -> LayoutResult<()> {
        self.layouts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_owned(), layout.clone());
        Ok(())
    }
}

use std::fs;
use std::io::ErrorKind;

use log::debug;

use super::SnippetStorage;
use super::lock::StoreLock;
use super::models::{NewSnippet, Snippet, Store, today};
use crate::config::AppPaths;
use crate::errors::{Result, SnipitError};

/// JSON-file repository. Every call reads the document fresh from disk;
/// nothing is cached between operations.
pub struct JsonStorage {
    paths: AppPaths,
}

impl JsonStorage {
    pub fn new(paths: AppPaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &AppPaths {
        &self.paths
    }

    fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.paths.base_dir).map_err(|e| SnipitError::io(&self.paths.base_dir, e))
    }

    /// Runs one locked load-mutate-save cycle. The closure returns its
    /// result plus whether the store changed; unchanged stores are not
    /// written back.
    pub fn modify<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Store) -> Result<(T, bool)>,
    {
        self.ensure_dir()?;
        let _lock = StoreLock::acquire(&self.paths.lock_path)?;
        let mut store = self.load()?;
        let (value, changed) = f(&mut store)?;
        if changed {
            self.save(&store)?;
        }
        Ok(value)
    }
}

impl SnippetStorage for JsonStorage {
    fn load(&self) -> Result<Store> {
        self.ensure_dir()?;
        let path = &self.paths.store_path;
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("no store at {}, starting empty", path.display());
                return Ok(Store::default());
            }
            Err(e) => return Err(SnipitError::io(path, e)),
        };
        let store: Store = serde_json::from_str(&raw).map_err(|source| SnipitError::CorruptStore {
            path: path.clone(),
            source,
        })?;
        debug!("loaded {} snippet(s) from {}", store.snippets.len(), path.display());
        Ok(store)
    }

    fn save(&self, store: &Store) -> Result<()> {
        self.ensure_dir()?;
        let path = &self.paths.store_path;
        let body = serde_json::to_string_pretty(store)?;
        fs::write(path, body).map_err(|e| SnipitError::io(path, e))?;
        debug!("wrote {} snippet(s) to {}", store.snippets.len(), path.display());
        Ok(())
    }

    fn add(&self, snippet: NewSnippet) -> Result<Snippet> {
        self.modify(|store| Ok((store.push(snippet, today())?, true)))
    }

    fn delete_by_id(&self, id: i64) -> Result<bool> {
        self.modify(|store| {
            let before = store.snippets.len();
            store.snippets.retain(|s| s.id != id);
            let removed = store.snippets.len() < before;
            Ok((removed, removed))
        })
    }
}

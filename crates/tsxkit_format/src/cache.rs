//! Shared cache of parsed tilesets
//!
//! Maps usually reference the same handful of `.tsx` files many times over.
//! [`TilesetCache`] parses each file once and hands out [`Arc`] clones,
//! evicting the least recently used entry once capacity is reached.
//!
//! Entries are keyed by the absolute path with `.` and `..` resolved textually.
//! The filesystem is never consulted for the key, so a path keeps hitting
//! after its file is deleted. Symlinks are not resolved; two links to one
//! file are two entries.

use crate::{load_tileset, TsxError};
use std::collections::{HashMap, VecDeque};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tsxkit_core::Tileset;

/// Least-recently-used cache of loaded tilesets, keyed by normalized path
#[derive(Debug)]
pub struct TilesetCache {
    capacity: usize,
    entries: HashMap<PathBuf, Arc<Tileset>>,
    /// Most recently used at the back
    order: VecDeque<PathBuf>,
}

impl Default for TilesetCache {
    fn default() -> Self {
        Self::new(16)
    }
}

impl TilesetCache {
    /// Create a cache holding at most `capacity` tilesets; 0 disables caching
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    /// Look up an already loaded tileset without touching the disk
    pub fn get(&mut self, path: impl AsRef<Path>) -> Option<Arc<Tileset>> {
        let key = Self::key(path.as_ref());
        let tileset = self.entries.get(&key).cloned()?;
        self.touch(&key);
        Some(tileset)
    }

    /// Return the cached tileset for `path`, loading and caching it on a miss
    pub fn get_or_load(&mut self, path: impl AsRef<Path>) -> Result<Arc<Tileset>, TsxError> {
        let path = path.as_ref();
        let key = Self::key(path);

        if let Some(tileset) = self.entries.get(&key).cloned() {
            tracing::trace!(path = %key.display(), "tileset cache hit");
            self.touch(&key);
            return Ok(tileset);
        }

        let tileset = Arc::new(load_tileset(path)?);
        if self.capacity == 0 {
            return Ok(tileset);
        }

        if self.entries.len() >= self.capacity {
            tracing::debug!(capacity = self.capacity, "tileset cache full");
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
                tracing::debug!(path = %oldest.display(), "evicted tileset");
            }
        }

        self.entries.insert(key.clone(), Arc::clone(&tileset));
        self.order.push_back(key);
        Ok(tileset)
    }

    fn touch(&mut self, key: &Path) {
        if let Some(pos) = self.order.iter().position(|p| p == key) {
            if let Some(entry) = self.order.remove(pos) {
                self.order.push_back(entry);
            }
        }
    }

    fn key(path: &Path) -> PathBuf {
        let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        let mut key = PathBuf::new();
        for component in absolute.components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    key.pop();
                }
                other => key.push(other),
            }
        }
        key
    }
}

// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Named byte-blob storage for font sources, cache records and page images.

use alloc::string::String;
use alloc::vec::Vec;
use hashbrown::HashMap;
use std::path::{Path, PathBuf};

use crate::Error;

/// Reads and writes named byte blobs.
///
/// Paths are relative, `/`-separated asset names such as
/// `fonts/fontImage_12.dat`.
pub trait AssetStore {
    /// Reads a whole blob, or `None` if it does not exist or cannot be read.
    fn read(&self, path: &str) -> Option<Vec<u8>>;

    /// Writes a whole blob, replacing any previous contents.
    fn write(&mut self, path: &str, bytes: &[u8]) -> Result<(), Error>;
}

/// An [`AssetStore`] rooted at a directory on the local filesystem.
#[derive(Clone, Debug)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    /// Creates a store resolving asset names below `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory assets are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let mut resolved = self.root.clone();
        resolved.extend(path.split('/').filter(|part| !part.is_empty()));
        resolved
    }
}

impl AssetStore for DirectoryStore {
    fn read(&self, path: &str) -> Option<Vec<u8>> {
        std::fs::read(self.resolve(path)).ok()
    }

    fn write(&mut self, path: &str, bytes: &[u8]) -> Result<(), Error> {
        let resolved = self.resolve(path);
        if let Some(parent) = resolved.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::storage(alloc::format!("{}: {e}", parent.display())))?;
        }
        std::fs::write(&resolved, bytes)
            .map_err(|e| Error::storage(alloc::format!("{}: {e}", resolved.display())))
    }
}

/// An [`AssetStore`] keeping blobs in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a blob.
    pub fn insert(&mut self, path: impl Into<String>, bytes: Vec<u8>) {
        self.files.insert(path.into(), bytes);
    }

    /// Returns `true` if a blob with this name exists.
    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    /// Borrows a stored blob.
    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.files.get(path).map(Vec::as_slice)
    }

    /// Names of all stored blobs, sorted.
    pub fn paths(&self) -> Vec<&str> {
        let mut paths: Vec<_> = self.files.keys().map(String::as_str).collect();
        paths.sort_unstable();
        paths
    }
}

impl AssetStore for MemoryStore {
    fn read(&self, path: &str) -> Option<Vec<u8>> {
        self.files.get(path).cloned()
    }

    fn write(&mut self, path: &str, bytes: &[u8]) -> Result<(), Error> {
        self.files.insert(String::from(path), bytes.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_store_round_trips() {
        let root = std::env::temp_dir().join(alloc::format!(
            "parley_atlas_store_{}",
            std::process::id()
        ));
        let mut store = DirectoryStore::new(&root);
        assert!(store.read("fonts/missing.dat").is_none());
        store.write("fonts/probe.dat", b"abc").unwrap();
        assert_eq!(store.read("fonts/probe.dat").as_deref(), Some(&b"abc"[..]));
        std::fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn memory_store_lists_paths() {
        let mut store = MemoryStore::new();
        store.write("fonts/b.dat", &[1]).unwrap();
        store.insert("fonts/a.dat", vec![2]);
        assert_eq!(store.paths(), ["fonts/a.dat", "fonts/b.dat"]);
        assert_eq!(store.read("fonts/a.dat"), Some(vec![2]));
    }
}

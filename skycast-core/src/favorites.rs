use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::debug;

use crate::model::City;

/// Hard cap on the number of stored favorites.
pub const MAX_FAVORITES: usize = 3;

const FAVORITES_FILE_NAME: &str = "favorites.json";

#[derive(Debug, Error)]
pub enum FavoritesError {
    #[error("favorites list already holds the maximum of {max} cities")]
    Full { max: usize },

    #[error("index {index} is out of range for {len} favorites")]
    OutOfRange { index: usize, len: usize },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// JSON-file-backed list of favorite cities, rewritten wholesale on every
/// mutation. Insertion order is display order; duplicates are allowed.
///
/// There is no cross-process locking; concurrent external modification is
/// unsupported.
#[derive(Debug, Clone)]
pub struct FavoritesStore {
    path: PathBuf,
}

impl FavoritesStore {
    pub fn open_default() -> Result<Self> {
        Ok(Self { path: crate::config::default_data_dir()?.join(FAVORITES_FILE_NAME) })
    }

    pub fn in_dir(dir: &Path) -> Self {
        Self { path: dir.join(FAVORITES_FILE_NAME) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file reads as an empty list; the file is only created on
    /// the first mutation. Malformed JSON is an error.
    pub fn load_all(&self) -> Result<Vec<City>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no favorites file yet, starting empty");
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read favorites file: {}", self.path.display()))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse favorites file: {}", self.path.display()))
    }

    pub fn save_all(&self, favorites: &[City]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create data directory: {}", parent.display())
            })?;
        }

        let json = serde_json::to_string(favorites).context("Failed to serialize favorites")?;

        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write favorites file: {}", self.path.display()))?;

        Ok(())
    }

    /// Appends `city` and persists. When the list is already at
    /// [`MAX_FAVORITES`] the stored file is left untouched.
    pub fn add(&self, city: City) -> Result<(), FavoritesError> {
        let mut favorites = self.load_all()?;

        if favorites.len() >= MAX_FAVORITES {
            return Err(FavoritesError::Full { max: MAX_FAVORITES });
        }

        favorites.push(city);
        self.save_all(&favorites)?;

        Ok(())
    }

    /// Removes the favorite at `index` (0-based) and persists, returning the
    /// removed city. An out-of-range index leaves the stored list unchanged.
    pub fn remove_at(&self, index: usize) -> Result<City, FavoritesError> {
        let mut favorites = self.load_all()?;

        if index >= favorites.len() {
            return Err(FavoritesError::OutOfRange { index, len: favorites.len() });
        }

        let removed = favorites.remove(index);
        self.save_all(&favorites)?;

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn city(name: &str) -> City {
        City {
            name: name.to_string(),
            state: "PA".to_string(),
            country: "US".to_string(),
            lat: 42.1,
            lon: -80.08,
        }
    }

    #[test]
    fn missing_file_loads_as_empty_list() {
        let dir = tempdir().expect("tempdir");
        let store = FavoritesStore::in_dir(dir.path());

        assert!(store.load_all().expect("load must not error").is_empty());
    }

    #[test]
    fn add_persists_in_insertion_order() {
        let dir = tempdir().expect("tempdir");
        let store = FavoritesStore::in_dir(dir.path());

        store.add(city("Erie")).expect("first add");
        store.add(city("Easton")).expect("second add");

        let stored = store.load_all().expect("load");
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].name, "Erie");
        assert_eq!(stored[1].name, "Easton");
    }

    #[test]
    fn duplicates_are_not_deduplicated() {
        let dir = tempdir().expect("tempdir");
        let store = FavoritesStore::in_dir(dir.path());

        store.add(city("Erie")).expect("add");
        store.add(city("Erie")).expect("duplicate add");

        assert_eq!(store.load_all().expect("load").len(), 2);
    }

    #[test]
    fn fourth_add_is_rejected_and_file_is_untouched() {
        let dir = tempdir().expect("tempdir");
        let store = FavoritesStore::in_dir(dir.path());

        for name in ["Erie", "Easton", "Altoona"] {
            store.add(city(name)).expect("add within capacity");
        }
        let before = fs::read(store.path()).expect("read before");

        let err = store.add(city("Scranton")).expect_err("capacity must reject");
        assert!(matches!(err, FavoritesError::Full { max: MAX_FAVORITES }));

        let after = fs::read(store.path()).expect("read after");
        assert_eq!(before, after, "rejected add must not rewrite the file");
        assert_eq!(store.load_all().expect("load").len(), MAX_FAVORITES);
    }

    #[test]
    fn remove_at_returns_the_removed_city() {
        let dir = tempdir().expect("tempdir");
        let store = FavoritesStore::in_dir(dir.path());

        store.add(city("Erie")).expect("add");
        store.add(city("Easton")).expect("add");

        let removed = store.remove_at(0).expect("remove");
        assert_eq!(removed.name, "Erie");

        let stored = store.load_all().expect("load");
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].name, "Easton");
    }

    #[test]
    fn remove_at_out_of_range_leaves_list_unchanged() {
        let dir = tempdir().expect("tempdir");
        let store = FavoritesStore::in_dir(dir.path());

        store.add(city("Erie")).expect("add");

        let err = store.remove_at(5).expect_err("out of range must reject");
        assert!(matches!(err, FavoritesError::OutOfRange { index: 5, len: 1 }));
        assert_eq!(store.load_all().expect("load").len(), 1);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempdir().expect("tempdir");
        let store = FavoritesStore::in_dir(dir.path());
        fs::write(store.path(), "{not json").expect("write");

        let err = store.load_all().expect_err("malformed JSON must error");
        assert!(err.to_string().contains("Failed to parse favorites file"));
    }
}

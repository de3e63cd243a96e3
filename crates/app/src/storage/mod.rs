//! Cart snapshot persistence.

mod records;

use std::{
    fs,
    path::{Path, PathBuf},
};

use barrow::cart::{CartError, CartState};
use thiserror::Error;
use tracing::debug;

pub use records::{CartSnapshotRecord, LineItemRecord};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("snapshot io error")]
    Io(#[from] std::io::Error),

    #[error("snapshot serialization error")]
    Json(#[from] serde_json::Error),

    #[error("unknown currency code: {0}")]
    UnknownCurrency(String),

    #[error("invalid snapshot data")]
    Cart(#[from] CartError),
}

/// Cart snapshots as JSON files on disk.
///
/// The browser storefront this mirrors keeps the cart in local storage;
/// a file per cart plays the same role for a process that restarts.
#[derive(Debug, Clone)]
pub struct JsonCartStorage {
    path: PathBuf,
}

impl JsonCartStorage {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Where this storage reads and writes its snapshot.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the saved cart, if a snapshot exists.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the file exists but cannot be read,
    /// parsed, or validated.
    pub fn load(&self) -> Result<Option<CartState>, StorageError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path)?;
        let record: CartSnapshotRecord = serde_json::from_str(&contents)?;

        Ok(Some(record.into_state()?))
    }

    /// Write the cart state, replacing any previous snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the snapshot cannot be serialized or
    /// written.
    pub fn save(&self, state: &CartState) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let record = CartSnapshotRecord::from(state);
        let contents = serde_json::to_string_pretty(&record)?;

        fs::write(&self.path, contents)?;

        debug!(path = %self.path.display(), lines = state.len(), "cart snapshot saved");

        Ok(())
    }

    /// Delete the snapshot if one exists.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the file exists but cannot be removed.
    pub fn clear(&self) -> Result<(), StorageError> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use barrow::{products::ProductId, store::CartStore};
    use rusty_money::{Money, iso::INR};
    use testresult::TestResult;

    use crate::test;

    use super::*;

    fn storage_in(dir: &tempfile::TempDir) -> JsonCartStorage {
        JsonCartStorage::new(dir.path().join("cart.json"))
    }

    #[test]
    fn load_without_a_snapshot_returns_none() -> TestResult {
        let dir = tempfile::tempdir()?;

        let restored = storage_in(&dir).load()?;

        assert!(restored.is_none());

        Ok(())
    }

    #[test]
    fn snapshots_round_trip_with_recomputed_totals() -> TestResult {
        let dir = tempfile::tempdir()?;
        let storage = storage_in(&dir);

        let catalog = test::demo_catalog();
        let mut store = CartStore::new(INR);

        let headphones = catalog
            .get(ProductId::new(1))
            .expect("demo catalog should include product 1");

        store.add_many(headphones, 2);

        let state = store.state();

        storage.save(&state)?;

        let restored = storage.load()?.expect("snapshot should exist after save");

        assert_eq!(restored.items(), state.items());
        assert_eq!(restored.total(), Money::from_minor(4_999_800, INR));
        assert_eq!(restored.item_count(), 2);

        Ok(())
    }

    #[test]
    fn zero_quantity_lines_are_dropped_on_load() -> TestResult {
        let dir = tempfile::tempdir()?;
        let storage = storage_in(&dir);

        let record = CartSnapshotRecord {
            currency: "INR".to_string(),
            saved_at: jiff::Timestamp::now(),
            items: vec![
                LineItemRecord {
                    id: 1,
                    name: "Premium Wireless Headphones".to_string(),
                    price_minor: 2_499_900,
                    image: String::new(),
                    category: String::new(),
                    quantity: 1,
                },
                LineItemRecord {
                    id: 2,
                    name: "Phantom Line".to_string(),
                    price_minor: 100,
                    image: String::new(),
                    category: String::new(),
                    quantity: 0,
                },
            ],
        };

        fs::write(storage.path(), serde_json::to_string(&record)?)?;

        let restored = storage.load()?.expect("snapshot should parse");

        assert_eq!(restored.len(), 1);
        assert_eq!(restored.total(), Money::from_minor(2_499_900, INR));

        Ok(())
    }

    #[test]
    fn unknown_currency_codes_are_rejected() -> TestResult {
        let dir = tempfile::tempdir()?;
        let storage = storage_in(&dir);

        fs::write(
            storage.path(),
            r#"{ "currency": "ZZZ", "saved_at": "2026-08-23T00:00:00Z", "items": [] }"#,
        )?;

        let result = storage.load();

        assert!(
            matches!(result, Err(StorageError::UnknownCurrency(ref code)) if code == "ZZZ"),
            "expected UnknownCurrency, got {result:?}"
        );

        Ok(())
    }

    #[test]
    fn corrupt_snapshots_surface_as_json_errors() -> TestResult {
        let dir = tempfile::tempdir()?;
        let storage = storage_in(&dir);

        fs::write(storage.path(), "not json")?;

        let result = storage.load();

        assert!(
            matches!(result, Err(StorageError::Json(_))),
            "expected Json error, got {result:?}"
        );

        Ok(())
    }

    #[test]
    fn clear_removes_the_snapshot() -> TestResult {
        let dir = tempfile::tempdir()?;
        let storage = storage_in(&dir);

        let state = CartState::new(INR);

        storage.save(&state)?;
        storage.clear()?;

        assert!(storage.load()?.is_none());

        storage.clear()?;

        Ok(())
    }
}

//! JSON-file-backed snapshot source.
//!
//! Stores the full record list as one pretty-printed JSON array (default:
//! `$XDG_DATA_HOME/pocket-ledger/transactions.json`).

use std::fs;
use std::path::{Path, PathBuf};

use super::Snapshot;
use crate::error::Result;
#[cfg(feature = "snapshot-file")]
use crate::error::LedgerError;

/// Application name used for the XDG data directory.
#[cfg(feature = "snapshot-file")]
const APP_NAME: &str = "pocket-ledger";

/// File name of the record list inside the data directory.
#[cfg(feature = "snapshot-file")]
const TRANSACTIONS_FILE: &str = "transactions.json";

/// A JSON file holding a snapshot of transaction records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotFile {
    /// Location of the JSON array.
    path: PathBuf,
}

impl SnapshotFile {
    /// Creates a handle for the given file path. Nothing is read yet.
    #[inline]
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Returns the default XDG-compliant location of the record file.
    ///
    /// On Linux: `$XDG_DATA_HOME/pocket-ledger/transactions.json`
    /// (typically `~/.local/share/pocket-ledger/transactions.json`).
    ///
    /// # Errors
    ///
    /// Returns an error if the platform data directory cannot be determined.
    #[cfg(feature = "snapshot-file")]
    #[inline]
    pub fn default_path() -> Result<PathBuf> {
        dirs::data_dir()
            .map(|data_path| data_path.join(APP_NAME).join(TRANSACTIONS_FILE))
            .ok_or_else(|| {
                LedgerError::Snapshot("could not determine platform data directory".to_owned())
            })
    }

    /// Returns the file path.
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and decodes the snapshot. A missing file is an empty
    /// snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or is not a
    /// JSON array of records.
    #[tracing::instrument(skip_all, fields(path = %self.path.display()))]
    pub fn load(&self) -> Result<Snapshot> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Snapshot::from_json_str(&contents),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("snapshot file missing, starting empty");
                Ok(Snapshot::default())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Atomically writes the snapshot (write-to-tmp then rename), creating
    /// parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or any filesystem operation fails.
    #[tracing::instrument(skip_all, fields(path = %self.path.display(), records = snapshot.len()))]
    pub fn save(&self, snapshot: &Snapshot) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp_path = self.path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(snapshot.records())?;
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::models::{TransactionId, TransactionKind, TransactionRecord};

    /// Creates a snapshot file inside a fresh temp directory.
    fn temp_file() -> (SnapshotFile, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let file = SnapshotFile::new(dir.path().join("nested").join("transactions.json"));
        (file, dir)
    }

    fn record(id: &str) -> TransactionRecord {
        TransactionRecord {
            id: TransactionId::from(id),
            amount: 42.0,
            kind: TransactionKind::Expense,
            category: Some("Home".to_owned()),
            description: "Lamp".to_owned(),
            occurred_at: Some(chrono::DateTime::from_timestamp(1_750_000_000, 0).unwrap()),
        }
    }

    #[test]
    fn missing_file_loads_empty() {
        let (file, _dir) = temp_file();
        assert!(file.load().unwrap().is_empty());
    }

    #[test]
    fn save_then_load() {
        let (file, _dir) = temp_file();
        let snapshot = Snapshot::from_records(vec![record("a"), record("b")]);
        file.save(&snapshot).unwrap();
        assert!(file.path().exists());
        assert_eq!(file.load().unwrap(), snapshot);
    }

    #[test]
    fn save_overwrites_previous_content() {
        let (file, _dir) = temp_file();
        file.save(&Snapshot::from_records(vec![record("a")])).unwrap();
        file.save(&Snapshot::from_records(vec![record("b")])).unwrap();
        let loaded = file.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert!(loaded.get(&TransactionId::from("b")).is_some());
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let (file, _dir) = temp_file();
        fs::create_dir_all(file.path().parent().unwrap()).unwrap();
        fs::write(file.path(), "not json").unwrap();
        assert!(file.load().is_err());
    }

    #[cfg(feature = "snapshot-file")]
    #[test]
    fn default_path_ends_with_app_file() {
        if let Ok(path) = SnapshotFile::default_path() {
            assert!(path.ends_with("pocket-ledger/transactions.json"));
        }
    }
}

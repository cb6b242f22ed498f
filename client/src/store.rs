//! Local key-value store.
//!
//! Persistence is a flat key-value space in a data directory, one file per
//! key, values as text: counters as decimal strings, the sales log as a
//! JSON array, the sync credential as an opaque string. Reading an unset
//! key yields a defined default (0 for counters, empty for the log) so
//! consumers never need a bootstrap step.

use crate::error::{ClientError, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use till_engine::{LedgerSnapshot, PriceTier, SaleRecord};

const LOG_KEY: &str = "salesRecords";
const TOKEN_KEY: &str = "syncToken";

/// Persistent key-value store scoped to this device.
#[derive(Debug)]
pub struct LocalStore {
    dir: PathBuf,
}

impl LocalStore {
    /// Open (creating if necessary) the store in `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    fn read_key(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.key_path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    // Atomic write: tempfile in the same directory, then rename over the key.
    fn write_key(&self, key: &str, value: &str) -> Result<()> {
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(value.as_bytes())?;
        tmp.persist(self.key_path(key))
            .map_err(|e| ClientError::Storage(format!("persist '{}': {}", key, e)))?;
        Ok(())
    }

    /// Read a tier's counter. Unset or unparseable values read as 0, the
    /// same fallback the legacy localStorage version applied.
    pub fn get_count(&self, tier: PriceTier) -> Result<u32> {
        let key = tier.storage_key();
        match self.read_key(key)? {
            Some(text) => Ok(text.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(key, value = %text.trim(), "corrupt counter value, reading as 0");
                0
            })),
            None => Ok(0),
        }
    }

    /// Persist a tier's counter as a decimal string.
    pub fn set_count(&self, tier: PriceTier, count: u32) -> Result<()> {
        self.write_key(tier.storage_key(), &count.to_string())
    }

    /// Load the sales log. An unset key is an empty log.
    pub fn load_log(&self) -> Result<Vec<SaleRecord>> {
        match self.read_key(LOG_KEY)? {
            Some(json) => serde_json::from_str(&json)
                .map_err(|e| ClientError::Storage(format!("corrupt sales log: {}", e))),
            None => Ok(Vec::new()),
        }
    }

    /// Persist the full sales log as a JSON array.
    pub fn save_log(&self, records: &[SaleRecord]) -> Result<()> {
        let json = serde_json::to_string(records)
            .map_err(|e| ClientError::Storage(format!("encode sales log: {}", e)))?;
        self.write_key(LOG_KEY, &json)
    }

    /// Load the full application state from the individual keys.
    pub fn load_snapshot(&self) -> Result<LedgerSnapshot> {
        let mut snapshot = LedgerSnapshot {
            inventory69: self.get_count(PriceTier::P69)?,
            inventory99: self.get_count(PriceTier::P99)?,
            sales_records: self.load_log()?,
        };
        // A log carried over from the legacy implementation has no IDs
        snapshot.backfill_legacy_fields();
        Ok(snapshot)
    }

    /// Overwrite the full application state, all keys.
    pub fn save_snapshot(&self, snapshot: &LedgerSnapshot) -> Result<()> {
        self.set_count(PriceTier::P69, snapshot.inventory69)?;
        self.set_count(PriceTier::P99, snapshot.inventory99)?;
        self.save_log(&snapshot.sales_records)
    }

    /// The stored sync credential, if any.
    pub fn get_token(&self) -> Result<Option<String>> {
        Ok(self
            .read_key(TOKEN_KEY)?
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty()))
    }

    /// Persist the sync credential for reuse in later sessions.
    pub fn set_token(&self, token: &str) -> Result<()> {
        self.write_key(TOKEN_KEY, token)
    }

    /// The directory backing this store.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use till_engine::Pesos;

    fn temp_store() -> (tempfile::TempDir, LocalStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn unset_keys_read_as_defaults() {
        let (_dir, store) = temp_store();

        assert_eq!(store.get_count(PriceTier::P69).unwrap(), 0);
        assert_eq!(store.get_count(PriceTier::P99).unwrap(), 0);
        assert!(store.load_log().unwrap().is_empty());
        assert!(store.get_token().unwrap().is_none());
    }

    #[test]
    fn counter_roundtrip_as_decimal_text() {
        let (_dir, store) = temp_store();

        store.set_count(PriceTier::P69, 42).unwrap();
        assert_eq!(store.get_count(PriceTier::P69).unwrap(), 42);

        // Stored as plain text under the legacy key name
        let raw = fs::read_to_string(store.dir().join("inventory69")).unwrap();
        assert_eq!(raw, "42");
    }

    #[test]
    fn corrupt_counter_reads_as_zero() {
        let (_dir, store) = temp_store();
        fs::write(store.dir().join("inventory99"), "not-a-number").unwrap();
        assert_eq!(store.get_count(PriceTier::P99).unwrap(), 0);
    }

    #[test]
    fn log_roundtrip() {
        let (_dir, store) = temp_store();
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 21, 0, 0).unwrap();
        let records = vec![SaleRecord::new(
            "sale-1",
            PriceTier::P69,
            2,
            Some(Pesos::from_pesos(150)),
            now,
        )];

        store.save_log(&records).unwrap();
        assert_eq!(store.load_log().unwrap(), records);
    }

    #[test]
    fn snapshot_roundtrip() {
        let (_dir, store) = temp_store();
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 21, 0, 0).unwrap();
        let snapshot = LedgerSnapshot {
            inventory69: 5,
            inventory99: 7,
            sales_records: vec![SaleRecord::new("s", PriceTier::P99, 1, None, now)],
        };

        store.save_snapshot(&snapshot).unwrap();
        assert_eq!(store.load_snapshot().unwrap(), snapshot);
    }

    #[test]
    fn token_roundtrip() {
        let (_dir, store) = temp_store();
        store.set_token("ghp_secret").unwrap();
        assert_eq!(store.get_token().unwrap().as_deref(), Some("ghp_secret"));
    }
}

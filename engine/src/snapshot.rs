//! Snapshot type for persisting and mirroring ledger state.
//!
//! A snapshot is the entire application state as one transferable JSON
//! document: both inventory counters plus the full sales log. The same
//! shape is written to local storage and to the remote mirror, and it is
//! byte-compatible with documents produced by the legacy implementation.

use crate::{
    error::Result, inventory::Inventory, record::SaleRecord, Error,
};
use serde::{Deserialize, Serialize};

/// A point-in-time snapshot of the full ledger state.
///
/// Wire shape: `{"inventory69": n, "inventory99": n, "salesRecords": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSnapshot {
    /// Counter for the ₱69 tier.
    pub inventory69: u32,
    /// Counter for the ₱99 tier.
    pub inventory99: u32,
    /// The full sales log, in append order.
    pub sales_records: Vec<SaleRecord>,
}

impl LedgerSnapshot {
    /// Create an empty snapshot.
    pub fn empty() -> Self {
        Self {
            inventory69: 0,
            inventory99: 0,
            sales_records: Vec::new(),
        }
    }

    /// Build a snapshot from inventory counters and a sales log.
    pub fn from_parts(inventory: &Inventory, sales_records: Vec<SaleRecord>) -> Self {
        use crate::tier::PriceTier;
        Self {
            inventory69: inventory.count(PriceTier::P69),
            inventory99: inventory.count(PriceTier::P99),
            sales_records,
        }
    }

    /// The inventory counters as an [`Inventory`].
    pub fn inventory(&self) -> Inventory {
        Inventory::with_counts(self.inventory69, self.inventory99)
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::InvalidSnapshot(e.to_string()))
    }

    /// Serialize to pretty JSON, for the remote document.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::InvalidSnapshot(e.to_string()))
    }

    /// Deserialize from JSON, backfilling fields legacy documents lack.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut snapshot: Self =
            serde_json::from_str(json).map_err(|e| Error::InvalidSnapshot(e.to_string()))?;
        snapshot.backfill_legacy_fields();
        Ok(snapshot)
    }

    /// Fill in `id` and `date_key` for records written by the legacy
    /// implementation, which had neither.
    ///
    /// Legacy IDs derive from the timestamp; a disambiguating suffix keeps
    /// them unique even when two legacy sales share a millisecond.
    /// `from_json` applies this automatically; callers assembling a
    /// snapshot from separately-stored keys should call it themselves.
    pub fn backfill_legacy_fields(&mut self) {
        let mut seen: std::collections::HashSet<String> = self
            .sales_records
            .iter()
            .filter(|r| !r.id.is_empty())
            .map(|r| r.id.clone())
            .collect();

        for record in &mut self.sales_records {
            if record.date_key.is_empty() {
                record.date_key = crate::record::date_key_for(record.timestamp);
            }
            if record.id.is_empty() {
                let base = format!("legacy-{}", record.timestamp.to_rfc3339());
                let mut candidate = base.clone();
                let mut n = 1;
                while !seen.insert(candidate.clone()) {
                    candidate = format!("{}-{}", base, n);
                    n += 1;
                }
                record.id = candidate;
            }
        }
    }
}

impl Default for LedgerSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{money::Pesos, tier::PriceTier};
    use chrono::{TimeZone, Utc};

    #[test]
    fn empty_snapshot() {
        let snapshot = LedgerSnapshot::empty();
        assert_eq!(snapshot.inventory69, 0);
        assert_eq!(snapshot.inventory99, 0);
        assert!(snapshot.sales_records.is_empty());
    }

    #[test]
    fn json_roundtrip() {
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 21, 0, 0).unwrap();
        let inventory = Inventory::with_counts(5, 2);
        let records = vec![SaleRecord::new(
            "sale-1",
            PriceTier::P69,
            3,
            Some(Pesos::from_pesos(250)),
            now,
        )];

        let snapshot = LedgerSnapshot::from_parts(&inventory, records);
        let json = snapshot.to_json().unwrap();
        let restored = LedgerSnapshot::from_json(&json).unwrap();

        assert_eq!(snapshot, restored);
    }

    #[test]
    fn wire_shape_matches_legacy_keys() {
        let snapshot = LedgerSnapshot::from_parts(&Inventory::with_counts(1, 2), Vec::new());
        let json: serde_json::Value = serde_json::to_value(&snapshot).unwrap();

        assert_eq!(json["inventory69"], 1);
        assert_eq!(json["inventory99"], 2);
        assert!(json["salesRecords"].is_array());
    }

    #[test]
    fn parse_legacy_document() {
        // A document exactly as the legacy localStorage version wrote it
        let json = r#"{
            "inventory69": 4,
            "inventory99": 0,
            "salesRecords": [
                {"timestamp": "2025-06-15T21:00:00.000Z", "price": 69, "quantity": 1, "dateKey": "2025-06-15"},
                {"timestamp": "2025-06-15T21:00:00.000Z", "price": 99, "quantity": 2}
            ]
        }"#;

        let snapshot = LedgerSnapshot::from_json(json).unwrap();
        assert_eq!(snapshot.inventory69, 4);
        assert_eq!(snapshot.sales_records.len(), 2);

        // Backfilled IDs are unique even for identical timestamps
        let ids: Vec<_> = snapshot.sales_records.iter().map(|r| &r.id).collect();
        assert!(!ids[0].is_empty());
        assert!(!ids[1].is_empty());
        assert_ne!(ids[0], ids[1]);

        // Missing dateKey is derived from the timestamp in the reference zone
        assert_eq!(snapshot.sales_records[1].date_key, "2025-06-15");
    }

    #[test]
    fn reject_malformed_document() {
        let result = LedgerSnapshot::from_json("{\"inventory69\": \"many\"}");
        assert!(matches!(result, Err(Error::InvalidSnapshot(_))));
    }
}

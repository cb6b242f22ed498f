//! Sale records.

use crate::{money::Pesos, tier::PriceTier};
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a sale record.
///
/// Assigned at creation, independent of the timestamp. Two sales rung up in
/// the same millisecond still get distinct IDs.
pub type SaleId = String;

/// Calendar-day bucket string, `YYYY-MM-DD` in the reference timezone.
pub type DateKey = String;

/// Offset of the shop's reference timezone from UTC, in seconds.
///
/// All date bucketing happens in this one timezone so that daily totals do
/// not shift when the viewer's device is set to a different zone.
const REFERENCE_TZ_OFFSET_SECS: i32 = -7 * 3600;

/// The shop's reference timezone.
pub fn reference_tz() -> FixedOffset {
    FixedOffset::east_opt(REFERENCE_TZ_OFFSET_SECS).expect("valid fixed offset")
}

/// Derive the date bucket for an instant.
///
/// This is the single derivation point: the result is stored on the record
/// verbatim at creation time and never re-derived for grouping.
pub fn date_key_for(instant: DateTime<Utc>) -> DateKey {
    instant
        .with_timezone(&reference_tz())
        .format("%Y-%m-%d")
        .to_string()
}

/// A single recorded sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRecord {
    /// Unique record ID. Legacy documents predate IDs; the snapshot loader
    /// backfills one derived from the timestamp.
    #[serde(default)]
    pub id: SaleId,
    /// Instant the sale was rung up (ISO-8601 on the wire).
    pub timestamp: DateTime<Utc>,
    /// Price tier sold.
    pub price: PriceTier,
    /// Number of items sold, always positive.
    pub quantity: u32,
    /// Amount handed over by the customer. Absent in legacy records.
    #[serde(rename = "paidAmount", default, skip_serializing_if = "Option::is_none")]
    pub paid: Option<Pesos>,
    /// Date bucket, derived once at creation and stored verbatim.
    #[serde(default)]
    pub date_key: DateKey,
}

impl SaleRecord {
    /// Create a new record for a sale happening at `now`.
    pub fn new(
        id: impl Into<SaleId>,
        price: PriceTier,
        quantity: u32,
        paid: Option<Pesos>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            timestamp: now,
            price,
            quantity,
            paid,
            date_key: date_key_for(now),
        }
    }

    /// Total value of the sale.
    pub fn total(&self) -> Pesos {
        self.price.price() * self.quantity
    }

    /// Change due, when the paid amount is known.
    pub fn change(&self) -> Option<Pesos> {
        self.paid.map(|paid| paid - self.total())
    }
}

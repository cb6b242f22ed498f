//! Date-bucketed sales aggregation.

use crate::{money::Pesos, record::SaleRecord, tier::PriceTier};
use std::collections::BTreeMap;

/// Aggregate figures for one calendar day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DailySummary {
    sold: BTreeMap<PriceTier, u32>,
    /// Gross takings for the day.
    pub gross: Pesos,
}

impl DailySummary {
    /// Items sold at a tier on this day.
    pub fn sold(&self, tier: PriceTier) -> u32 {
        self.sold.get(&tier).copied().unwrap_or(0)
    }

    /// Total items sold across both tiers.
    pub fn items_sold(&self) -> u32 {
        self.sold.values().sum()
    }

    fn accumulate(&mut self, record: &SaleRecord) {
        *self.sold.entry(record.price).or_default() += record.quantity;
        self.gross = self.gross + record.total();
    }
}

/// Group records by their stored date key.
///
/// Pure function: accumulation is commutative, so the input order never
/// affects the result, and calling it twice on the same records yields
/// identical output. The stored `date_key` is used as-is; timestamps are
/// never re-bucketed.
pub fn group_by_date(records: &[SaleRecord]) -> BTreeMap<String, DailySummary> {
    let mut summary: BTreeMap<String, DailySummary> = BTreeMap::new();
    for record in records {
        summary
            .entry(record.date_key.clone())
            .or_default()
            .accumulate(record);
    }
    summary
}

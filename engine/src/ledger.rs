//! Ledger - the in-memory state container.
//!
//! The Ledger holds the inventory counters and the sales log, and applies
//! the point-of-sale operations to them. Every mutation validates all of
//! its inputs before touching any state, so a rejected operation never
//! leaves a torn ledger behind (e.g. stock decremented for a sale that was
//! refused for short payment).

use crate::{
    error::Result,
    inventory::{Inventory, RemoveOutcome},
    money::Pesos,
    record::{SaleId, SaleRecord},
    snapshot::LedgerSnapshot,
    tier::PriceTier,
    Error,
};
use chrono::{DateTime, Utc};

/// Result of a successful sale.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleReceipt {
    /// The record appended to the log.
    pub record: SaleRecord,
    /// Change due back to the customer.
    pub change: Pesos,
}

/// The main state container: inventory counters plus the sales log.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    inventory: Inventory,
    sales: Vec<SaleRecord>,
}

impl Ledger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ledger from already-loaded state.
    pub fn from_parts(inventory: Inventory, sales: Vec<SaleRecord>) -> Self {
        Self { inventory, sales }
    }

    /// The inventory counters.
    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// The sales log in append order.
    pub fn sales(&self) -> &[SaleRecord] {
        &self.sales
    }

    /// Add stock to a tier.
    pub fn add_stock(&mut self, tier: PriceTier, quantity: u32) -> Result<u32> {
        self.inventory.add_stock(tier, quantity)
    }

    /// Remove stock from a tier; see [`Inventory::remove_stock`] for the
    /// confirmation protocol around clamping.
    pub fn remove_stock(
        &mut self,
        tier: PriceTier,
        quantity: u32,
        confirmed: bool,
    ) -> Result<RemoveOutcome> {
        self.inventory.remove_stock(tier, quantity, confirmed)
    }

    /// Record a sale.
    ///
    /// Validation order is validate-all-then-mutate: quantity, then stock
    /// availability, then payment sufficiency, and only after all three
    /// pass is the inventory decremented and the record appended.
    pub fn record_sale(
        &mut self,
        id: impl Into<SaleId>,
        tier: PriceTier,
        quantity: u32,
        paid: Pesos,
        now: DateTime<Utc>,
    ) -> Result<SaleReceipt> {
        if quantity == 0 {
            return Err(Error::InvalidQuantity);
        }

        let available = self.inventory.count(tier);
        if available < quantity {
            return Err(Error::InsufficientStock {
                tier,
                requested: quantity,
                available,
            });
        }

        let total = tier.price() * quantity;
        let change = paid
            .checked_sub(total)
            .ok_or(Error::InsufficientPayment {
                required: total,
                paid,
            })?;

        // All checks passed; mutation cannot fail from here.
        self.inventory.consume(tier, quantity)?;
        let record = SaleRecord::new(id, tier, quantity, Some(paid), now);
        self.sales.push(record.clone());

        Ok(SaleReceipt { record, change })
    }

    /// Delete a sale by ID, restoring the stock it consumed.
    ///
    /// Returns the removed record, or `None` when no record matches
    /// (a no-op).
    pub fn delete_sale(&mut self, id: &str) -> Option<SaleRecord> {
        let index = self.sales.iter().position(|r| r.id == id)?;
        let record = self.sales.remove(index);
        self.inventory.restore(record.price, record.quantity);
        Some(record)
    }

    /// The sales log sorted newest-first, for history views.
    pub fn history(&self) -> Vec<&SaleRecord> {
        let mut records: Vec<&SaleRecord> = self.sales.iter().collect();
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        records
    }

    /// Export the full ledger state as a snapshot.
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot::from_parts(&self.inventory, self.sales.clone())
    }

    /// Replace the full ledger state with a snapshot's, wholesale.
    pub fn restore_snapshot(&mut self, snapshot: LedgerSnapshot) {
        self.inventory = snapshot.inventory();
        self.sales = snapshot.sales_records;
    }
}

//! Inventory counters.
//!
//! One non-negative counter per price tier. The counters can only be
//! mutated through the operations here, each of which maintains the
//! never-negative invariant.

use crate::{error::Result, tier::PriceTier, Error};
use serde::{Deserialize, Serialize};

/// Outcome of a stock removal request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// Stock was removed. `clamped` is true when the request exceeded the
    /// counter and the excess was discarded.
    Removed { new_count: u32, clamped: bool },
    /// The request exceeds the counter and the caller has not confirmed the
    /// destructive clamp. State is unchanged.
    NeedsConfirmation { available: u32 },
}

/// Stock counters for both price tiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inventory {
    inventory69: u32,
    inventory99: u32,
}

impl Inventory {
    /// Create an inventory with both counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an inventory from explicit counter values.
    pub fn with_counts(inventory69: u32, inventory99: u32) -> Self {
        Self {
            inventory69,
            inventory99,
        }
    }

    fn slot(&mut self, tier: PriceTier) -> &mut u32 {
        match tier {
            PriceTier::P69 => &mut self.inventory69,
            PriceTier::P99 => &mut self.inventory99,
        }
    }

    /// Current count for a tier.
    pub fn count(&self, tier: PriceTier) -> u32 {
        match tier {
            PriceTier::P69 => self.inventory69,
            PriceTier::P99 => self.inventory99,
        }
    }

    /// Overwrite a tier's counter, e.g. when loading persisted state.
    pub fn set_count(&mut self, tier: PriceTier, count: u32) {
        *self.slot(tier) = count;
    }

    /// Add stock to a tier. No upper bound.
    pub fn add_stock(&mut self, tier: PriceTier, quantity: u32) -> Result<u32> {
        if quantity == 0 {
            return Err(Error::InvalidQuantity);
        }
        let slot = self.slot(tier);
        *slot = slot.saturating_add(quantity);
        Ok(*slot)
    }

    /// Remove stock from a tier.
    ///
    /// Removing more than is available is destructive (the excess is
    /// discarded, the counter clamps to zero), so it requires the caller to
    /// pass `confirmed`. Without confirmation the call reports
    /// [`RemoveOutcome::NeedsConfirmation`] and leaves state unchanged.
    pub fn remove_stock(
        &mut self,
        tier: PriceTier,
        quantity: u32,
        confirmed: bool,
    ) -> Result<RemoveOutcome> {
        if quantity == 0 {
            return Err(Error::InvalidQuantity);
        }
        let available = self.count(tier);
        if quantity > available && !confirmed {
            return Ok(RemoveOutcome::NeedsConfirmation { available });
        }
        let new_count = available.saturating_sub(quantity);
        self.set_count(tier, new_count);
        Ok(RemoveOutcome::Removed {
            new_count,
            clamped: quantity > available,
        })
    }

    /// Consume stock for a sale. Fails without mutating when the counter
    /// is short.
    pub fn consume(&mut self, tier: PriceTier, quantity: u32) -> Result<u32> {
        let available = self.count(tier);
        if available < quantity {
            return Err(Error::InsufficientStock {
                tier,
                requested: quantity,
                available,
            });
        }
        let new_count = available - quantity;
        self.set_count(tier, new_count);
        Ok(new_count)
    }

    /// Return stock consumed by a sale that is being deleted.
    pub fn restore(&mut self, tier: PriceTier, quantity: u32) -> u32 {
        let slot = self.slot(tier);
        *slot = slot.saturating_add(quantity);
        *slot
    }
}

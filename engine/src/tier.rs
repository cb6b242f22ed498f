//! The two catalog price tiers.
//!
//! The shop sells items at exactly two fixed price points, and the price
//! doubles as the SKU key. Tiers are a closed enum rather than a bare
//! number so an unrecognized price is a typed error, never a silent
//! default.

use crate::{money::Pesos, Error};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A catalog price tier, identified by its peso price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum PriceTier {
    /// The ₱69 tier.
    P69,
    /// The ₱99 tier.
    P99,
}

impl PriceTier {
    /// Both tiers, in deterministic display order.
    pub const ALL: [PriceTier; 2] = [PriceTier::P69, PriceTier::P99];

    /// Unit price of this tier.
    pub fn price(&self) -> Pesos {
        Pesos::from_pesos(self.price_in_pesos() as i64)
    }

    /// Unit price as a whole peso number (the wire representation).
    pub fn price_in_pesos(&self) -> u32 {
        match self {
            PriceTier::P69 => 69,
            PriceTier::P99 => 99,
        }
    }

    /// Key under which this tier's counter is persisted.
    pub fn storage_key(&self) -> &'static str {
        match self {
            PriceTier::P69 => "inventory69",
            PriceTier::P99 => "inventory99",
        }
    }
}

impl TryFrom<u32> for PriceTier {
    type Error = Error;

    fn try_from(price: u32) -> Result<Self, Error> {
        match price {
            69 => Ok(PriceTier::P69),
            99 => Ok(PriceTier::P99),
            other => Err(Error::UnknownTier(other)),
        }
    }
}

impl From<PriceTier> for u32 {
    fn from(tier: PriceTier) -> u32 {
        tier.price_in_pesos()
    }
}

impl fmt::Display for PriceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "₱{}", self.price_in_pesos())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_known_prices() {
        assert_eq!(PriceTier::try_from(69).unwrap(), PriceTier::P69);
        assert_eq!(PriceTier::try_from(99).unwrap(), PriceTier::P99);
    }

    #[test]
    fn unknown_price_is_rejected() {
        assert_eq!(PriceTier::try_from(45), Err(Error::UnknownTier(45)));
        assert_eq!(PriceTier::try_from(0), Err(Error::UnknownTier(0)));
    }

    #[test]
    fn prices() {
        assert_eq!(PriceTier::P69.price(), Pesos::from_pesos(69));
        assert_eq!(PriceTier::P99.price(), Pesos::from_pesos(99));
    }

    #[test]
    fn storage_keys() {
        assert_eq!(PriceTier::P69.storage_key(), "inventory69");
        assert_eq!(PriceTier::P99.storage_key(), "inventory99");
    }

    #[test]
    fn serde_as_bare_number() {
        assert_eq!(serde_json::to_string(&PriceTier::P69).unwrap(), "69");

        let tier: PriceTier = serde_json::from_str("99").unwrap();
        assert_eq!(tier, PriceTier::P99);

        let bad: Result<PriceTier, _> = serde_json::from_str("45");
        assert!(bad.is_err());
    }
}

//! Exact peso amounts.
//!
//! All ledger math runs on integer centavos so that totals and change are
//! exact. On the wire amounts appear as decimal peso numbers (the legacy
//! document format), so serialization converts in both directions.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Add, Mul, Sub};

/// A peso amount, stored as integer centavos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Pesos(i64);

impl Pesos {
    /// Zero pesos.
    pub const ZERO: Pesos = Pesos(0);

    /// Create an amount from whole pesos.
    pub fn from_pesos(pesos: i64) -> Self {
        Pesos(pesos * 100)
    }

    /// Create an amount from centavos.
    pub fn from_centavos(centavos: i64) -> Self {
        Pesos(centavos)
    }

    /// The amount in centavos.
    pub fn centavos(&self) -> i64 {
        self.0
    }

    /// Subtract, returning `None` on underflow below zero.
    ///
    /// Used for change calculation: `paid.checked_sub(total)` is `None`
    /// exactly when the payment is insufficient.
    pub fn checked_sub(self, other: Pesos) -> Option<Pesos> {
        if self.0 < other.0 {
            None
        } else {
            Some(Pesos(self.0 - other.0))
        }
    }

    /// Render as a bare decimal string with two places, e.g. `250.00`.
    ///
    /// Used for CSV cells, where the currency sign is omitted.
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        format!("{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl fmt::Display for Pesos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "₱{}", self.to_decimal_string())
    }
}

impl Add for Pesos {
    type Output = Pesos;

    fn add(self, rhs: Pesos) -> Pesos {
        Pesos(self.0 + rhs.0)
    }
}

impl Sub for Pesos {
    type Output = Pesos;

    fn sub(self, rhs: Pesos) -> Pesos {
        Pesos(self.0 - rhs.0)
    }
}

impl Mul<u32> for Pesos {
    type Output = Pesos;

    fn mul(self, rhs: u32) -> Pesos {
        Pesos(self.0 * rhs as i64)
    }
}

// Wire format: a JSON number of pesos (e.g. 250.5). Legacy documents were
// written by a float-based implementation, so deserialization accepts any
// numeric value and rounds to the nearest centavo.
impl Serialize for Pesos {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.0 as f64 / 100.0)
    }
}

impl<'de> Deserialize<'de> for Pesos {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        if !value.is_finite() {
            return Err(serde::de::Error::custom("non-finite peso amount"));
        }
        Ok(Pesos((value * 100.0).round() as i64))
    }
}

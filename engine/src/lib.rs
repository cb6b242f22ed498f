//! # Till Engine
//!
//! The deterministic core of Till, a two-SKU point-of-sale and inventory
//! tracker.
//!
//! This crate holds all of the ledger logic: stock counters, the sales log,
//! change calculation, date-bucketed summaries, and the snapshot document
//! that both local storage and the remote mirror persist. It is pure state
//! manipulation - the same inputs always produce the same outputs.
//!
//! ## Design Principles
//!
//! - **No IO**: the engine has no knowledge of files, network, or clocks;
//!   callers supply timestamps and record IDs
//! - **Validate-all-then-mutate**: an operation either applies completely
//!   or rejects without touching any state
//! - **Exact money**: all arithmetic runs on integer centavos
//!
//! ## Core Concepts
//!
//! ### Price Tiers
//!
//! The shop sells at exactly two fixed price points, ₱69 and ₱99, and the
//! price doubles as the SKU key. [`PriceTier`] is the closed enum for them;
//! unknown prices are typed errors.
//!
//! ### The Ledger
//!
//! [`Ledger`] owns the two inventory counters and the append-ordered sales
//! log. Sales consume stock, deletions restore it, and counters can never
//! go negative.
//!
//! ### Snapshots
//!
//! [`LedgerSnapshot`] is the entire application state as one JSON document,
//! byte-compatible with the legacy wire format
//! (`{"inventory69": n, "inventory99": n, "salesRecords": [...]}`). The IO
//! layer persists it locally and mirrors it remotely.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::Utc;
//! use till_engine::{Ledger, Pesos, PriceTier};
//!
//! let mut ledger = Ledger::new();
//! ledger.add_stock(PriceTier::P69, 5).unwrap();
//!
//! let receipt = ledger
//!     .record_sale("sale-1", PriceTier::P69, 3, Pesos::from_pesos(250), Utc::now())
//!     .unwrap();
//! assert_eq!(receipt.change, Pesos::from_pesos(43));
//! assert_eq!(ledger.inventory().count(PriceTier::P69), 2);
//!
//! let snapshot = ledger.snapshot();
//! assert_eq!(snapshot.inventory69, 2);
//! ```

pub mod csv;
pub mod error;
pub mod inventory;
pub mod ledger;
pub mod money;
pub mod record;
pub mod snapshot;
pub mod summary;
pub mod tier;

// Re-export main types at crate root
pub use csv::{render_csv, SALES_CSV_FILENAME};
pub use error::{Error, Result};
pub use inventory::{Inventory, RemoveOutcome};
pub use ledger::{Ledger, SaleReceipt};
pub use money::Pesos;
pub use record::{date_key_for, reference_tz, DateKey, SaleId, SaleRecord};
pub use snapshot::LedgerSnapshot;
pub use summary::{group_by_date, DailySummary};
pub use tier::PriceTier;

//! The application session.
//!
//! `Session` is the single context object owning the local store, the
//! in-memory ledger, and the optional remote mirror. There are no ambient
//! singletons: everything a component needs is passed from here.
//!
//! Every local mutation persists to the local store synchronously, then
//! schedules a best-effort background push of the full snapshot. Remote
//! failures are logged and swallowed; the local ledger is the source of
//! truth for the running session.

use crate::{
    error::Result,
    store::LocalStore,
    sync::{Mirror, Pull},
};
use chrono::Utc;
use std::sync::Arc;
use till_engine::{
    render_csv, Ledger, Pesos, PriceTier, RemoveOutcome, SaleReceipt, SaleRecord,
};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Application session: local store + ledger + optional mirror.
///
/// A session without a mirror is the degraded no-credential mode: every
/// local operation still works, nothing syncs.
pub struct Session {
    store: LocalStore,
    ledger: Ledger,
    mirror: Option<Arc<Mutex<Mirror>>>,
    last_push: Option<JoinHandle<()>>,
}

impl Session {
    /// Create a session, loading the ledger from the local store.
    pub fn new(store: LocalStore, mirror: Option<Mirror>) -> Result<Self> {
        let mut ledger = Ledger::new();
        ledger.restore_snapshot(store.load_snapshot()?);

        Ok(Self {
            store,
            ledger,
            mirror: mirror.map(|m| Arc::new(Mutex::new(m))),
            last_push: None,
        })
    }

    /// Whether remote mirroring is enabled for this session.
    pub fn sync_enabled(&self) -> bool {
        self.mirror.is_some()
    }

    /// The current ledger state.
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Startup reconciliation: pull the remote snapshot (remote overwrites
    /// local wholesale when it exists), then push to settle.
    ///
    /// All remote failures degrade to local-only operation; none of them
    /// are surfaced as errors.
    pub async fn startup(&mut self) -> Result<()> {
        let Some(mirror) = self.mirror.clone() else {
            tracing::info!("sync disabled, running locally");
            return Ok(());
        };

        let mut mirror = mirror.lock().await;
        match mirror.pull().await {
            Ok(Pull::Fetched(snapshot)) => {
                self.ledger.restore_snapshot(snapshot.clone());
                self.store.save_snapshot(&snapshot)?;
            }
            Ok(Pull::NoRemoteData) => {}
            Err(e) => {
                tracing::warn!("startup pull failed: {}", e);
                return Ok(());
            }
        }

        if let Err(e) = mirror.push(&self.ledger.snapshot()).await {
            tracing::warn!("startup push failed: {}", e);
        }
        Ok(())
    }

    /// Add stock to a tier.
    pub fn add_stock(&mut self, tier: PriceTier, quantity: u32) -> Result<u32> {
        let new_count = self.ledger.add_stock(tier, quantity)?;
        self.store.set_count(tier, new_count)?;
        self.schedule_push();
        Ok(new_count)
    }

    /// Remove stock from a tier. See [`till_engine::Inventory::remove_stock`]
    /// for the confirmation protocol.
    pub fn remove_stock(
        &mut self,
        tier: PriceTier,
        quantity: u32,
        confirmed: bool,
    ) -> Result<RemoveOutcome> {
        let outcome = self.ledger.remove_stock(tier, quantity, confirmed)?;
        if let RemoveOutcome::Removed { new_count, .. } = outcome {
            self.store.set_count(tier, new_count)?;
            self.schedule_push();
        }
        Ok(outcome)
    }

    /// Record a sale happening now, minting a fresh record ID.
    pub fn record_sale(
        &mut self,
        tier: PriceTier,
        quantity: u32,
        paid: Pesos,
    ) -> Result<SaleReceipt> {
        let id = ulid::Ulid::new().to_string();
        let receipt = self.ledger.record_sale(id, tier, quantity, paid, Utc::now())?;

        self.store.set_count(tier, self.ledger.inventory().count(tier))?;
        self.store.save_log(self.ledger.sales())?;
        self.schedule_push();
        Ok(receipt)
    }

    /// Delete a sale by ID, restoring its stock. Unknown IDs are a no-op.
    pub fn delete_sale(&mut self, id: &str) -> Result<Option<SaleRecord>> {
        let Some(removed) = self.ledger.delete_sale(id) else {
            return Ok(None);
        };

        self.store
            .set_count(removed.price, self.ledger.inventory().count(removed.price))?;
        self.store.save_log(self.ledger.sales())?;
        self.schedule_push();
        Ok(Some(removed))
    }

    /// Write the sales log as CSV to `path`.
    pub fn export_csv(&self, path: &std::path::Path) -> Result<()> {
        std::fs::write(path, render_csv(self.ledger.sales()))?;
        Ok(())
    }

    /// Push the current snapshot and wait for the result. Remote failures
    /// are logged, not returned.
    pub async fn sync_now(&mut self) {
        let Some(mirror) = self.mirror.clone() else {
            return;
        };
        let snapshot = self.ledger.snapshot();
        if let Err(e) = mirror.lock().await.push(&snapshot).await {
            tracing::warn!("push failed: {}", e);
        };
    }

    /// Fire-and-forget push of the current snapshot.
    ///
    /// Never blocks the triggering operation. If a pull or push is already
    /// in flight the new attempt is skipped (not queued); the next mutation
    /// will push a fresher snapshot anyway.
    fn schedule_push(&mut self) {
        let Some(mirror) = self.mirror.clone() else {
            return;
        };
        let snapshot = self.ledger.snapshot();

        self.last_push = Some(tokio::spawn(async move {
            let Ok(mut mirror) = mirror.try_lock() else {
                tracing::debug!("sync already in flight, skipping push");
                return;
            };
            if let Err(e) = mirror.push(&snapshot).await {
                tracing::warn!("background push failed: {}", e);
            }
        }));
    }

    /// Wait for the most recently scheduled background push to settle.
    /// Used before process exit; a long-lived UI never needs this.
    pub async fn flush(&mut self) {
        if let Some(handle) = self.last_push.take() {
            let _ = handle.await;
        }
    }
}

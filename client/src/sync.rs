//! Remote mirror synchronization.
//!
//! The mirror keeps the full local snapshot reflected in one remote
//! document. Pull overwrites local state wholesale with the remote
//! document; push replaces the remote document wholesale, guarded by the
//! revision token from the most recent successful pull or push. There is
//! no merge: the domain tolerates occasional lost writes, and a stale
//! revision is logged, not retried.

use crate::remote::{RemoteError, RemoteStore, RevisionToken};
use till_engine::LedgerSnapshot;

/// Mirror activity states, mutually exclusive within one process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncState {
    #[default]
    Idle,
    Pulling,
    Pushing,
}

/// Result of a pull.
#[derive(Debug, Clone, PartialEq)]
pub enum Pull {
    /// The remote document does not exist yet; local state is untouched.
    NoRemoteData,
    /// The remote snapshot, which replaces local state wholesale.
    Fetched(LedgerSnapshot),
}

/// The remote mirror: a remote store plus the cached revision token.
///
/// The token lives in process memory only. A fresh `Mirror` therefore has
/// no precondition to offer, pulls before its first push, and from then on
/// carries the token forward through every successful pull and push.
pub struct Mirror {
    remote: Box<dyn RemoteStore>,
    revision: Option<RevisionToken>,
    state: SyncState,
}

impl Mirror {
    pub fn new(remote: Box<dyn RemoteStore>) -> Self {
        Self {
            remote,
            revision: None,
            state: SyncState::Idle,
        }
    }

    /// Current activity state.
    pub fn state(&self) -> SyncState {
        self.state
    }

    /// Fetch the remote snapshot and cache its revision token.
    pub async fn pull(&mut self) -> Result<Pull, RemoteError> {
        self.state = SyncState::Pulling;
        let result = self.pull_inner().await;
        self.state = SyncState::Idle;
        result
    }

    async fn pull_inner(&mut self) -> Result<Pull, RemoteError> {
        let Some(file) = self.remote.fetch().await? else {
            tracing::info!("no remote data yet");
            return Ok(Pull::NoRemoteData);
        };

        let snapshot = LedgerSnapshot::from_json(&file.content)
            .map_err(|e| RemoteError::BadResponse(e.to_string()))?;
        tracing::debug!(
            records = snapshot.sales_records.len(),
            revision = %file.revision.0,
            "pulled remote snapshot"
        );
        self.revision = Some(file.revision);
        Ok(Pull::Fetched(snapshot))
    }

    /// Replace the remote document with the given snapshot.
    ///
    /// On [`RemoteError::StaleRevision`] the cached token is left as-is and
    /// the push is not retried; the caller's local state keeps the
    /// attempted value.
    pub async fn push(&mut self, snapshot: &LedgerSnapshot) -> Result<(), RemoteError> {
        self.state = SyncState::Pushing;
        let result = self.push_inner(snapshot).await;
        self.state = SyncState::Idle;
        result
    }

    async fn push_inner(&mut self, snapshot: &LedgerSnapshot) -> Result<(), RemoteError> {
        let content = snapshot
            .to_json_pretty()
            .map_err(|e| RemoteError::BadResponse(e.to_string()))?;

        let revision = self.remote.put(&content, self.revision.as_ref()).await?;
        tracing::debug!(revision = %revision.0, "pushed snapshot to remote");
        self.revision = Some(revision);
        Ok(())
    }
}

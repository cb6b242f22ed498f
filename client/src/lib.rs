//! # Till Client
//!
//! The IO layer of Till: local key-value persistence, the remote mirror,
//! and the application session that wires both to the
//! [`till_engine`] ledger.
//!
//! The data model is local-first: the [`store::LocalStore`] on this device
//! is the source of truth for the running session, and the remote mirror
//! is a best-effort whole-document copy guarded by a revision token. Pull
//! overwrites local wholesale; push overwrites remote wholesale; a stale
//! revision loses, gets logged, and is never retried automatically.

pub mod config;
pub mod error;
pub mod remote;
pub mod session;
pub mod store;
pub mod sync;

pub use config::{Config, ConfigError, RemoteConfig};
pub use error::{ClientError, Result};
pub use remote::{GitHubRemote, MemoryRemote, RemoteError, RemoteFile, RemoteStore, RevisionToken};
pub use session::Session;
pub use store::LocalStore;
pub use sync::{Mirror, Pull, SyncState};

//! Configuration management for the client.

use std::env;
use std::path::PathBuf;

/// Where the remote mirror document lives: one file at a fixed path in a
/// fixed hosted repository.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Repository owner (user or organization).
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Path of the mirror document within the repository.
    pub path: String,
    /// Branch the document lives on.
    pub branch: String,
}

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory for the local key-value store.
    pub data_dir: PathBuf,
    /// Remote mirror location; `None` disables mirroring entirely.
    pub remote: Option<RemoteConfig>,
    /// Credential override. When absent the stored credential (or an
    /// interactive prompt) is used instead.
    pub token: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// `TILL_REMOTE_REPO` is `owner/name`; leaving it unset runs the client
    /// purely locally.
    pub fn from_env() -> Result<Self, ConfigError> {
        let data_dir = env::var("TILL_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("till_data"));

        let remote = match env::var("TILL_REMOTE_REPO") {
            Ok(value) => {
                let (owner, repo) = value
                    .split_once('/')
                    .ok_or_else(|| ConfigError::InvalidRepo(value.clone()))?;
                if owner.is_empty() || repo.is_empty() {
                    return Err(ConfigError::InvalidRepo(value));
                }
                Some(RemoteConfig {
                    owner: owner.to_string(),
                    repo: repo.to_string(),
                    path: env::var("TILL_REMOTE_PATH")
                        .unwrap_or_else(|_| "data/till.json".to_string()),
                    branch: env::var("TILL_REMOTE_BRANCH").unwrap_or_else(|_| "main".to_string()),
                })
            }
            Err(_) => None,
        };

        let token = env::var("TILL_SYNC_TOKEN").ok();

        Ok(Self {
            data_dir,
            remote,
            token,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("TILL_REMOTE_REPO must be 'owner/name', got '{0}'")]
    InvalidRepo(String),
}

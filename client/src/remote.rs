//! Remote hosted-file store.
//!
//! The remote side of the mirror is a single JSON document in a hosted
//! repository, accessed through a generic "get file / put file with
//! revision precondition" API. Every read returns an opaque revision token
//! (a content hash); every write must carry the last observed token and
//! fails with [`RemoteError::StaleRevision`] when someone else wrote in
//! between.

use crate::config::RemoteConfig;
use async_trait::async_trait;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

/// Opaque token proving which version of the remote document was last
/// observed. Used as an optimistic-concurrency precondition on writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionToken(pub String);

/// A fetched remote document plus its revision.
#[derive(Debug, Clone)]
pub struct RemoteFile {
    pub content: String,
    pub revision: RevisionToken,
}

/// Errors from a remote store.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// The write precondition failed: the document changed since the last
    /// observed revision.
    #[error("remote document changed since last sync (stale revision)")]
    StaleRevision,

    /// The credential was rejected.
    #[error("remote rejected the sync credential")]
    Unauthorized,

    #[error("remote request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected remote response: {0}")]
    BadResponse(String),
}

/// A hosted-file API holding one document with replace-if-unchanged
/// semantics.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Fetch the document. `None` means it does not exist yet, which is
    /// not an error.
    async fn fetch(&self) -> Result<Option<RemoteFile>, RemoteError>;

    /// Replace the document wholesale. `revision` is the precondition:
    /// `None` claims the document does not exist yet.
    async fn put(
        &self,
        content: &str,
        revision: Option<&RevisionToken>,
    ) -> Result<RevisionToken, RemoteError>;
}

// ---------------------------------------------------------------------------
// GitHub contents API
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct ContentsResponse {
    content: String,
    sha: String,
}

#[derive(Serialize)]
struct PutRequest<'a> {
    message: &'a str,
    content: String,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

#[derive(Deserialize)]
struct PutResponse {
    content: PutContent,
}

#[derive(Deserialize)]
struct PutContent {
    sha: String,
}

/// The production remote: one file in a GitHub repository, revisioned by
/// its blob SHA through the contents API.
pub struct GitHubRemote {
    client: reqwest::Client,
    config: RemoteConfig,
    token: String,
}

impl GitHubRemote {
    pub fn new(config: RemoteConfig, token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            token,
        }
    }

    fn contents_url(&self) -> String {
        format!(
            "https://api.github.com/repos/{}/{}/contents/{}",
            self.config.owner, self.config.repo, self.config.path
        )
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", "till-client")
    }
}

#[async_trait]
impl RemoteStore for GitHubRemote {
    async fn fetch(&self) -> Result<Option<RemoteFile>, RemoteError> {
        let response = self
            .request(self.client.get(self.contents_url()))
            .query(&[("ref", self.config.branch.as_str())])
            .send()
            .await?;

        match response.status().as_u16() {
            404 => return Ok(None),
            401 | 403 => return Err(RemoteError::Unauthorized),
            _ => {}
        }
        let response = response.error_for_status()?;
        let body: ContentsResponse = response.json().await?;

        // The API base64-encodes file content with embedded newlines
        let encoded: String = body.content.chars().filter(|c| !c.is_whitespace()).collect();
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .map_err(|e| RemoteError::BadResponse(format!("content not base64: {}", e)))?;
        let content = String::from_utf8(bytes)
            .map_err(|e| RemoteError::BadResponse(format!("content not utf-8: {}", e)))?;

        Ok(Some(RemoteFile {
            content,
            revision: RevisionToken(body.sha),
        }))
    }

    async fn put(
        &self,
        content: &str,
        revision: Option<&RevisionToken>,
    ) -> Result<RevisionToken, RemoteError> {
        let body = PutRequest {
            message: "till: update mirror",
            content: base64::engine::general_purpose::STANDARD.encode(content),
            branch: &self.config.branch,
            sha: revision.map(|r| r.0.as_str()),
        };

        let response = self
            .request(self.client.put(self.contents_url()))
            .json(&body)
            .send()
            .await?;

        match response.status().as_u16() {
            // 409/422: precondition mismatch - someone wrote since our token
            409 | 422 => return Err(RemoteError::StaleRevision),
            401 | 403 => return Err(RemoteError::Unauthorized),
            _ => {}
        }
        let response = response.error_for_status()?;
        let body: PutResponse = response.json().await?;
        Ok(RevisionToken(body.content.sha))
    }
}

// ---------------------------------------------------------------------------
// In-memory remote, for tests
// ---------------------------------------------------------------------------

use std::sync::{Arc, Mutex};

/// An in-process remote with the same replace-if-unchanged semantics,
/// shareable between multiple "clients" to exercise conflict scenarios.
#[derive(Debug, Clone, Default)]
pub struct MemoryRemote {
    document: Arc<Mutex<Option<(String, RevisionToken)>>>,
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    fn revision_for(content: &str) -> RevisionToken {
        use sha2::{Digest, Sha256};
        let digest = Sha256::digest(content.as_bytes());
        RevisionToken(format!("{:x}", digest))
    }

    /// Current document content, for assertions.
    pub fn content(&self) -> Option<String> {
        self.document
            .lock()
            .unwrap()
            .as_ref()
            .map(|(content, _)| content.clone())
    }
}

#[async_trait]
impl RemoteStore for MemoryRemote {
    async fn fetch(&self) -> Result<Option<RemoteFile>, RemoteError> {
        Ok(self
            .document
            .lock()
            .unwrap()
            .as_ref()
            .map(|(content, revision)| RemoteFile {
                content: content.clone(),
                revision: revision.clone(),
            }))
    }

    async fn put(
        &self,
        content: &str,
        revision: Option<&RevisionToken>,
    ) -> Result<RevisionToken, RemoteError> {
        let mut document = self.document.lock().unwrap();

        let current = document.as_ref().map(|(_, revision)| revision);
        if current != revision {
            return Err(RemoteError::StaleRevision);
        }

        let new_revision = Self::revision_for(content);
        *document = Some((content.to_string(), new_revision.clone()));
        Ok(new_revision)
    }
}

//! SourceHost trait and the repository walk built on it.
//!
//! The trait covers the handful of hosting API reads the reviews need. The
//! production implementation lives in [`github`]; tests supply their own.

pub mod github;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::PullRequestInfo;

/// Errors from the hosting API client.
#[derive(Error, Debug)]
pub enum HostingError {
    #[error("hosting API not configured: {0}")]
    NotConfigured(String),

    #[error("invalid API URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("request to {url} failed: {reason}")]
    Request { url: String, reason: String },

    #[error("{url} returned HTTP {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("failed to decode {context}: {reason}")]
    Decode { context: String, reason: String },

    #[error("unexpected content at '{path}': {reason}")]
    UnexpectedContent { path: String, reason: String },
}

/// Kind of a repository contents entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
    /// Symlinks, submodules, anything else. Never descended into or fetched.
    Other,
}

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// Repository-relative path.
    pub path: String,
    pub kind: EntryKind,
}

impl DirEntry {
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::File,
        }
    }

    pub fn dir(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Dir,
        }
    }
}

/// Read access to a source-control hosting service.
#[async_trait]
pub trait SourceHost: Send + Sync {
    /// Pull request metadata.
    async fn pull_request(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<PullRequestInfo, HostingError>;

    /// Paths of every file changed by the pull request, in API order.
    async fn pull_request_files(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<Vec<String>, HostingError>;

    /// The pull request as a unified diff.
    async fn pull_request_diff(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<String, HostingError>;

    /// Entries directly under `path` (`""` is the repository root).
    async fn list_dir(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
    ) -> Result<Vec<DirEntry>, HostingError>;

    /// Decoded text content of one file.
    async fn file_content(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
    ) -> Result<String, HostingError>;
}

/// Every file path in the repository, depth-first in listing order.
///
/// A failed listing at any depth fails the whole walk.
pub async fn list_files_recursive(
    host: &dyn SourceHost,
    owner: &str,
    repo: &str,
) -> Result<Vec<String>, HostingError> {
    let mut files = Vec::new();
    let mut stack: Vec<DirEntry> = host.list_dir(owner, repo, "").await?;
    stack.reverse();

    while let Some(entry) = stack.pop() {
        match entry.kind {
            EntryKind::File => files.push(entry.path),
            EntryKind::Dir => {
                tracing::debug!(path = %entry.path, "listing directory");
                let children = host.list_dir(owner, repo, &entry.path).await?;
                stack.extend(children.into_iter().rev());
            }
            EntryKind::Other => {
                tracing::debug!(path = %entry.path, "skipping non-file entry");
            }
        }
    }

    Ok(files)
}

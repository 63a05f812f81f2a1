//! GitHub REST API client.

use async_trait::async_trait;
use base64::Engine;
use chrono::{DateTime, Utc};
use reqwest::Url;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::config::GithubConfig;
use crate::constants;
use crate::models::PullRequestInfo;

use super::{DirEntry, EntryKind, HostingError, SourceHost};

const ACCEPT_JSON: &str = "application/vnd.github+json";
const ACCEPT_DIFF: &str = "application/vnd.github.v3.diff";

/// Production hosting client for github.com or a GitHub Enterprise API root.
pub struct GithubClient {
    http: reqwest::Client,
    api_url: Url,
    token: String,
}

#[derive(Debug, Deserialize)]
struct PullResponse {
    number: u64,
    title: String,
    user: Option<UserResponse>,
    created_at: DateTime<Utc>,
    html_url: String,
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    login: String,
}

#[derive(Debug, Deserialize)]
struct PullFileResponse {
    filename: String,
}

/// The contents endpoint returns an array for directories and an object for files.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ContentsResponse {
    Listing(Vec<ContentEntry>),
    Single(ContentEntry),
}

#[derive(Debug, Deserialize)]
struct ContentEntry {
    path: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    encoding: Option<String>,
}

impl From<PullResponse> for PullRequestInfo {
    fn from(pr: PullResponse) -> Self {
        PullRequestInfo {
            number: pr.number,
            title: pr.title,
            author: pr.user.map(|u| u.login).unwrap_or_default(),
            created_at: pr.created_at,
            html_url: pr.html_url,
        }
    }
}

impl ContentEntry {
    fn entry_kind(&self) -> EntryKind {
        match self.kind.as_str() {
            "file" => EntryKind::File,
            "dir" => EntryKind::Dir,
            _ => EntryKind::Other,
        }
    }
}

impl GithubClient {
    /// Create a client, failing fast when no token is configured.
    pub fn new(config: &GithubConfig) -> Result<Self, HostingError> {
        let token = config.token().map(str::to_string).ok_or_else(|| {
            HostingError::NotConfigured(format!(
                "no token found. Set {}.",
                constants::ENV_GITHUB_TOKEN
            ))
        })?;

        let api_url = Url::parse(&config.api_url).map_err(|e| HostingError::InvalidUrl {
            url: config.api_url.clone(),
            reason: e.to_string(),
        })?;
        if api_url.cannot_be_a_base() {
            return Err(HostingError::InvalidUrl {
                url: config.api_url.clone(),
                reason: "not a base URL".to_string(),
            });
        }

        let http = reqwest::Client::builder()
            .user_agent(constants::USER_AGENT)
            .timeout(constants::REQUEST_TIMEOUT)
            .build()
            .map_err(|e| HostingError::Request {
                url: config.api_url.clone(),
                reason: format!("failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            http,
            api_url,
            token,
        })
    }

    /// Append percent-encoded path segments to the API root.
    fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Result<Url, HostingError> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|()| HostingError::InvalidUrl {
                url: self.api_url.to_string(),
                reason: "not a base URL".to_string(),
            })?
            .pop_if_empty()
            .extend(segments.into_iter().filter(|s| !s.is_empty()));
        Ok(url)
    }

    fn pull_url(&self, owner: &str, repo: &str, number: u64) -> Result<Url, HostingError> {
        let number = number.to_string();
        self.endpoint(["repos", owner, repo, "pulls", number.as_str()])
    }

    fn pull_files_url(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        page: u32,
    ) -> Result<Url, HostingError> {
        let number = number.to_string();
        let mut url = self.endpoint(["repos", owner, repo, "pulls", number.as_str(), "files"])?;
        url.query_pairs_mut()
            .append_pair("per_page", &constants::PR_FILES_PAGE_SIZE.to_string())
            .append_pair("page", &page.to_string());
        Ok(url)
    }

    fn contents_url(&self, owner: &str, repo: &str, path: &str) -> Result<Url, HostingError> {
        self.endpoint(
            ["repos", owner, repo, "contents"]
                .into_iter()
                .chain(path.split('/')),
        )
    }

    async fn get(&self, url: Url, accept: &str) -> Result<reqwest::Response, HostingError> {
        tracing::debug!(%url, "GET");
        let response = self
            .http
            .get(url.clone())
            .bearer_auth(&self.token)
            .header("Accept", accept)
            .header("X-GitHub-Api-Version", constants::GITHUB_API_VERSION)
            .send()
            .await
            .map_err(|e| HostingError::Request {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(HostingError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, HostingError> {
        let context = url.to_string();
        self.get(url, ACCEPT_JSON)
            .await?
            .json()
            .await
            .map_err(|e| HostingError::Decode {
                context,
                reason: e.to_string(),
            })
    }
}

#[async_trait]
impl SourceHost for GithubClient {
    async fn pull_request(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<PullRequestInfo, HostingError> {
        let pr: PullResponse = self.get_json(self.pull_url(owner, repo, number)?).await?;
        Ok(pr.into())
    }

    async fn pull_request_files(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<Vec<String>, HostingError> {
        let mut files = Vec::new();
        let mut page = 1u32;

        loop {
            let url = self.pull_files_url(owner, repo, number, page)?;
            let batch: Vec<PullFileResponse> = self.get_json(url).await?;
            let count = batch.len();
            files.extend(batch.into_iter().map(|f| f.filename));

            if is_last_page(count) {
                break;
            }
            page += 1;
        }

        Ok(files)
    }

    async fn pull_request_diff(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<String, HostingError> {
        let url = self.pull_url(owner, repo, number)?;
        let context = url.to_string();
        self.get(url, ACCEPT_DIFF)
            .await?
            .text()
            .await
            .map_err(|e| HostingError::Decode {
                context,
                reason: e.to_string(),
            })
    }

    async fn list_dir(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
    ) -> Result<Vec<DirEntry>, HostingError> {
        let contents: ContentsResponse = self.get_json(self.contents_url(owner, repo, path)?).await?;
        Ok(listing_entries(contents))
    }

    async fn file_content(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
    ) -> Result<String, HostingError> {
        let contents: ContentsResponse = self.get_json(self.contents_url(owner, repo, path)?).await?;
        match contents {
            ContentsResponse::Single(entry) if entry.entry_kind() == EntryKind::File => {
                decode_content(&entry)
            }
            ContentsResponse::Single(entry) => Err(HostingError::UnexpectedContent {
                path: path.to_string(),
                reason: format!("expected a file, found '{}'", entry.kind),
            }),
            ContentsResponse::Listing(_) => Err(HostingError::UnexpectedContent {
                path: path.to_string(),
                reason: "expected a file, found a directory".to_string(),
            }),
        }
    }
}

/// A single-file response lists as that one file.
/// A short page means the listing is exhausted.
fn is_last_page(count: usize) -> bool {
    count < constants::PR_FILES_PAGE_SIZE
}

fn listing_entries(contents: ContentsResponse) -> Vec<DirEntry> {
    let entries = match contents {
        ContentsResponse::Listing(entries) => entries,
        ContentsResponse::Single(entry) => vec![entry],
    };
    entries
        .into_iter()
        .map(|e| DirEntry {
            kind: e.entry_kind(),
            path: e.path,
        })
        .collect()
}

/// Decode a file entry according to its `encoding` field.
fn decode_content(entry: &ContentEntry) -> Result<String, HostingError> {
    let raw = entry.content.as_deref().unwrap_or_default();
    match entry.encoding.as_deref() {
        Some("base64") => {
            let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
            let bytes = base64::engine::general_purpose::STANDARD
                .decode(compact)
                .map_err(|e| HostingError::Decode {
                    context: entry.path.clone(),
                    reason: e.to_string(),
                })?;
            String::from_utf8(bytes).map_err(|_| HostingError::Decode {
                context: entry.path.clone(),
                reason: "content is not valid UTF-8".to_string(),
            })
        }
        Some("none") => Err(HostingError::UnexpectedContent {
            path: entry.path.clone(),
            reason: "content not inlined by the API (file too large)".to_string(),
        }),
        _ => Ok(raw.to_string()),
    }
}

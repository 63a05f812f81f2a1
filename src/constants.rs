//! App-wide constants.
//!
//! Centralises the tool name, config paths, environment variable names,
//! API endpoints and defaults so a rename only requires changing this file.

use std::time::Duration;

/// Display name of the tool (lowercase).
pub const APP_NAME: &str = "code-guardian";

/// Crate version, as reported by `--version`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// User-Agent sent with every HTTP request (GitHub rejects requests without one).
pub const USER_AGENT: &str = concat!("code-guardian/", env!("CARGO_PKG_VERSION"));

/// Local config filename (e.g. `.code-guardian.toml` in the working directory).
pub const CONFIG_FILENAME: &str = ".code-guardian.toml";

/// Directory name under `~/.config/` for global config.
pub const CONFIG_DIR: &str = "code-guardian";

/// Default root directory for saved Markdown reports.
pub const REPORTS_DIR: &str = "reports";

// ── Hosting API ─────────────────────────────────────────────────────

pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const GITHUB_API_VERSION: &str = "2022-11-28";

/// Page size used when listing the files of a pull request.
pub const PR_FILES_PAGE_SIZE: usize = 100;

// ── Completion API ──────────────────────────────────────────────────

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4";

/// Response token cap for whole-diff pull request review.
pub const DEFAULT_PR_MAX_TOKENS: u32 = 500;

/// Whitespace tokens per chunk for repository analysis.
pub const DEFAULT_CHUNK_TOKENS: usize = 3000;

/// Upper bound on a single HTTP request (hosting or completion API).
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

// ── Environment variable names ──────────────────────────────────────

pub const ENV_GITHUB_TOKEN: &str = "GITHUB_TOKEN";
pub const ENV_GITHUB_API_URL: &str = "GITHUB_API_URL";
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";
pub const ENV_MODEL: &str = "CODE_GUARDIAN_MODEL";

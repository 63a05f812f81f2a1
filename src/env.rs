//! Environment variable abstraction for testability.
//!
//! Production code uses [`Env::real()`] which delegates to [`std::env::var`]
//! (after an optional `.env` file has been merged into the process
//! environment by [`load_dotenv`]). Tests use [`Env::mock()`] backed by a
//! `HashMap`, so credential handling can be exercised without touching the
//! process environment.

use std::collections::HashMap;
use std::path::PathBuf;

/// Environment variable reader.
#[derive(Clone, Debug)]
pub struct Env {
    overrides: Option<HashMap<String, String>>,
}

impl Env {
    /// Create an `Env` that reads from the real process environment.
    pub fn real() -> Self {
        Self { overrides: None }
    }

    /// Create an `Env` backed by explicit key-value pairs.
    pub fn mock(vars: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>) -> Self {
        Self {
            overrides: Some(
                vars.into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Look up an environment variable by name.
    pub fn var(&self, name: &str) -> Result<String, std::env::VarError> {
        match &self.overrides {
            Some(map) => map.get(name).cloned().ok_or(std::env::VarError::NotPresent),
            None => std::env::var(name),
        }
    }

    /// Look up a variable, treating an empty or whitespace-only value as unset.
    ///
    /// Credentials exported as `GITHUB_TOKEN=` count as missing.
    pub fn non_empty(&self, name: &str) -> Option<String> {
        self.var(name).ok().filter(|v| !v.trim().is_empty())
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::real()
    }
}

/// Merge a `.env` file from the working directory into the process environment.
///
/// Variables already present in the environment win. A missing file is not
/// an error; the path that was loaded (if any) is returned for logging.
pub fn load_dotenv() -> Option<PathBuf> {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::debug!(path = %path.display(), "loaded .env file");
            Some(path)
        }
        Err(e) if e.not_found() => {
            tracing::debug!(".env file not found, using process environment");
            None
        }
        Err(e) => {
            tracing::warn!("ignoring unreadable .env file: {e}");
            None
        }
    }
}

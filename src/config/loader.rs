//! Config struct and loading logic.
//!
//! Priority (highest to lowest):
//! 1. CLI flags (applied by the caller)
//! 2. Environment variables (including a merged `.env` file)
//! 3. `.code-guardian.toml` in the working directory
//! 4. `~/.config/code-guardian/config.toml` (global defaults)
//! 5. Built-in defaults

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::constants;
use crate::env::Env;

/// Errors during config loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ParseFile {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("{name} not found. Set it in the environment or in a .env file.")]
    MissingCredential { name: &'static str },
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub github: GithubConfig,
    pub openai: OpenAiConfig,
    pub analysis: AnalysisConfig,
    pub report: ReportConfig,
}

/// Hosting API settings.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    pub api_url: String,
    pub token: Option<String>,
}

impl std::fmt::Debug for GithubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubConfig")
            .field("api_url", &self.api_url)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl GithubConfig {
    /// The token, unless it is missing or blank.
    pub fn token(&self) -> Option<&str> {
        non_blank(self.token.as_deref())
    }
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_url: constants::DEFAULT_GITHUB_API_URL.to_string(),
            token: None,
        }
    }
}

/// Completion API settings.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    /// Response token cap for whole-diff PR review. Repository analysis is uncapped.
    pub pr_max_tokens: Option<u32>,
}

impl std::fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("pr_max_tokens", &self.pr_max_tokens)
            .finish()
    }
}

impl OpenAiConfig {
    /// The API key, unless it is missing or blank.
    pub fn api_key(&self) -> Option<&str> {
        non_blank(self.api_key.as_deref())
    }
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: constants::DEFAULT_OPENAI_BASE_URL.to_string(),
            model: constants::DEFAULT_MODEL.to_string(),
            api_key: None,
            pr_max_tokens: Some(constants::DEFAULT_PR_MAX_TOKENS),
        }
    }
}

/// How a repository-analysis section whose completion failed is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FailedSectionStyle {
    /// A visible "analysis unavailable" line naming the error.
    #[default]
    Marker,
    /// The section body is left empty.
    Empty,
}

/// Repository analysis settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Whitespace tokens per chunk.
    pub chunk_size: usize,
    /// Sections analysed at the same time.
    pub max_concurrent: usize,
    pub failed_section: FailedSectionStyle,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            chunk_size: constants::DEFAULT_CHUNK_TOKENS,
            max_concurrent: 1,
            failed_section: FailedSectionStyle::default(),
        }
    }
}

/// Markdown report settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub dir: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(constants::REPORTS_DIR),
        }
    }
}

impl Config {
    /// Load configuration with proper layering.
    ///
    /// Reads from global config, the working directory's config, then
    /// applies environment variable overrides.
    pub fn load(work_dir: Option<&Path>, env: &Env) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                let global = Self::load_file(&global_path)?;
                config.merge(global);
            }
        }

        if let Some(dir) = work_dir {
            let local_path = dir.join(constants::CONFIG_FILENAME);
            if local_path.exists() {
                let local = Self::load_file(&local_path)?;
                config.merge(local);
            }
        }

        config.apply_env_vars(env);

        Ok(config)
    }

    /// Check that both API credentials are present.
    ///
    /// Called before any network request so a missing key is reported
    /// up front rather than halfway through a review.
    pub fn check_credentials(&self) -> Result<(), ConfigError> {
        if self.github.token().is_none() {
            return Err(ConfigError::MissingCredential {
                name: constants::ENV_GITHUB_TOKEN,
            });
        }
        if self.openai.api_key().is_none() {
            return Err(ConfigError::MissingCredential {
                name: constants::ENV_OPENAI_API_KEY,
            });
        }
        Ok(())
    }

    fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseFile {
            path: path.to_path_buf(),
            source: e,
        })
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(constants::CONFIG_DIR).join("config.toml"))
    }

    /// Merge another config into this one (other takes precedence for non-default values).
    fn merge(&mut self, other: Config) {
        let default_github = GithubConfig::default();
        if other.github.api_url != default_github.api_url {
            self.github.api_url = other.github.api_url.clone();
        }
        if other.github.token().is_some() {
            self.github.token = other.github.token;
        }

        let default_openai = OpenAiConfig::default();
        if other.openai.base_url != default_openai.base_url {
            self.openai.base_url = other.openai.base_url.clone();
        }
        if other.openai.model != default_openai.model {
            self.openai.model = other.openai.model.clone();
        }
        if other.openai.api_key().is_some() {
            self.openai.api_key = other.openai.api_key;
        }
        if other.openai.pr_max_tokens != default_openai.pr_max_tokens {
            self.openai.pr_max_tokens = other.openai.pr_max_tokens;
        }

        let default_analysis = AnalysisConfig::default();
        if other.analysis.chunk_size != default_analysis.chunk_size {
            self.analysis.chunk_size = other.analysis.chunk_size;
        }
        if other.analysis.max_concurrent != default_analysis.max_concurrent {
            self.analysis.max_concurrent = other.analysis.max_concurrent;
        }
        if other.analysis.failed_section != default_analysis.failed_section {
            self.analysis.failed_section = other.analysis.failed_section;
        }

        if other.report.dir != ReportConfig::default().dir {
            self.report.dir = other.report.dir;
        }
    }

    fn apply_env_vars(&mut self, env: &Env) {
        if let Some(val) = env.non_empty(constants::ENV_GITHUB_TOKEN) {
            self.github.token = Some(val);
        }
        if let Some(val) = env.non_empty(constants::ENV_GITHUB_API_URL) {
            self.github.api_url = val;
        }
        if let Some(val) = env.non_empty(constants::ENV_OPENAI_API_KEY) {
            self.openai.api_key = Some(val);
        }
        if let Some(val) = env.non_empty(constants::ENV_OPENAI_BASE_URL) {
            self.openai.base_url = val;
        }
        if let Some(val) = env.non_empty(constants::ENV_MODEL) {
            self.openai.model = val;
        }
    }
}

/// Blank credentials count as missing wherever they come from.
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env() -> Env {
        Env::mock(Vec::<(&str, &str)>::new())
    }

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.github.api_url, "https://api.github.com");
        assert_eq!(config.openai.model, "gpt-4");
        assert_eq!(config.openai.pr_max_tokens, Some(500));
        assert_eq!(config.analysis.chunk_size, 3000);
        assert_eq!(config.analysis.max_concurrent, 1);
        assert_eq!(config.analysis.failed_section, FailedSectionStyle::Marker);
        assert_eq!(config.report.dir, PathBuf::from("reports"));
    }

    #[test]
    fn parse_toml_config() {
        let toml_str = r#"
[openai]
model = "gpt-4o"
pr_max_tokens = 1200

[analysis]
chunk_size = 1500
max_concurrent = 5
failed_section = "empty"

[report]
dir = "out"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.openai.model, "gpt-4o");
        assert_eq!(config.openai.pr_max_tokens, Some(1200));
        assert_eq!(config.openai.base_url, "https://api.openai.com/v1");
        assert_eq!(config.analysis.chunk_size, 1500);
        assert_eq!(config.analysis.max_concurrent, 5);
        assert_eq!(config.analysis.failed_section, FailedSectionStyle::Empty);
        assert_eq!(config.report.dir, PathBuf::from("out"));
    }

    #[test]
    fn merge_overrides_non_default_values() {
        let mut base = Config::default();
        let mut other = Config::default();
        other.github.api_url = "https://ghe.example.com/api/v3".to_string();
        other.github.token = Some("ghp_file".to_string());
        other.openai.model = "gpt-4o-mini".to_string();
        other.openai.api_key = Some("sk-file".to_string());
        other.analysis.chunk_size = 100;
        other.analysis.failed_section = FailedSectionStyle::Empty;
        other.report.dir = PathBuf::from("elsewhere");

        base.merge(other);

        assert_eq!(base.github.api_url, "https://ghe.example.com/api/v3");
        assert_eq!(base.github.token.as_deref(), Some("ghp_file"));
        assert_eq!(base.openai.model, "gpt-4o-mini");
        assert_eq!(base.openai.api_key.as_deref(), Some("sk-file"));
        assert_eq!(base.analysis.chunk_size, 100);
        assert_eq!(base.analysis.failed_section, FailedSectionStyle::Empty);
        assert_eq!(base.report.dir, PathBuf::from("elsewhere"));
    }

    #[test]
    fn merge_keeps_base_when_other_is_default() {
        let mut base = Config::default();
        base.openai.model = "gpt-4o".to_string();
        base.analysis.max_concurrent = 3;

        base.merge(Config::default());

        assert_eq!(base.openai.model, "gpt-4o");
        assert_eq!(base.analysis.max_concurrent, 3);
    }

    #[test]
    fn load_file_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "not valid {{ toml").unwrap();

        let err = Config::load_file(&path).unwrap_err();
        assert!(err.to_string().contains("parse"));
    }

    #[test]
    fn load_file_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_file(&dir.path().join("missing.toml")).unwrap_err();
        assert!(err.to_string().contains("read"));
    }

    #[test]
    fn load_from_work_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(".code-guardian.toml"),
            "[openai]\nmodel = \"gpt-4o\"\n",
        )
        .unwrap();

        let config = Config::load(Some(dir.path()), &no_env()).unwrap();
        assert_eq!(config.openai.model, "gpt-4o");
    }

    #[test]
    fn env_vars_override_file_values() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(".code-guardian.toml"),
            "[openai]\nmodel = \"gpt-4o\"\n",
        )
        .unwrap();
        let env = Env::mock([
            ("CODE_GUARDIAN_MODEL", "gpt-4.1"),
            ("GITHUB_TOKEN", "ghp_env"),
            ("OPENAI_API_KEY", "sk-env"),
            ("OPENAI_BASE_URL", "http://localhost:8080/v1"),
            ("GITHUB_API_URL", "http://localhost:9090"),
        ]);

        let config = Config::load(Some(dir.path()), &env).unwrap();
        assert_eq!(config.openai.model, "gpt-4.1");
        assert_eq!(config.github.token.as_deref(), Some("ghp_env"));
        assert_eq!(config.openai.api_key.as_deref(), Some("sk-env"));
        assert_eq!(config.openai.base_url, "http://localhost:8080/v1");
        assert_eq!(config.github.api_url, "http://localhost:9090");
    }

    #[test]
    fn empty_env_values_are_ignored() {
        let env = Env::mock([("GITHUB_TOKEN", ""), ("OPENAI_API_KEY", "")]);
        let mut config = Config::default();
        config.apply_env_vars(&env);
        assert!(config.github.token.is_none());
        assert!(config.openai.api_key.is_none());
    }

    #[test]
    fn check_credentials_reports_github_first() {
        let config = Config::default();
        let err = config.check_credentials().unwrap_err();
        assert!(err.to_string().contains("GITHUB_TOKEN"), "got: {err}");
    }

    #[test]
    fn check_credentials_reports_openai_key() {
        let mut config = Config::default();
        config.github.token = Some("ghp".to_string());
        let err = config.check_credentials().unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"), "got: {err}");

        config.openai.api_key = Some("sk".to_string());
        assert!(config.check_credentials().is_ok());
    }

    #[test]
    fn blank_file_credentials_count_as_missing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(constants::CONFIG_FILENAME),
            "[github]\ntoken = \"\"\n\n[openai]\napi_key = \"  \"\n",
        )
        .unwrap();

        let config = Config::load(Some(dir.path()), &no_env()).unwrap();
        assert!(config.github.token().is_none());
        assert!(config.openai.api_key().is_none());
        let err = config.check_credentials().unwrap_err();
        assert!(err.to_string().contains("GITHUB_TOKEN"), "got: {err}");
    }

    #[test]
    fn blank_file_credential_keeps_earlier_value() {
        let mut base = Config::default();
        base.openai.api_key = Some("sk-global".to_string());
        let mut local = Config::default();
        local.openai.api_key = Some(String::new());
        base.merge(local);
        assert_eq!(base.openai.api_key(), Some("sk-global"));
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let mut config = Config::default();
        config.github.token = Some("ghp_secret".to_string());
        config.openai.api_key = Some("sk-secret".to_string());
        let debug = format!("{config:?}");
        assert!(!debug.contains("ghp_secret"));
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}

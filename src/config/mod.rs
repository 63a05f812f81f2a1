//! Configuration loading and layering.
//!
//! Handles `.code-guardian.toml` loading, environment variable resolution,
//! and CLI flag merging with proper priority ordering.

pub mod loader;

pub use loader::{
    AnalysisConfig, Config, ConfigError, FailedSectionStyle, GithubConfig, OpenAiConfig,
    ReportConfig,
};

//! Clap argument types, validation, and config overrides.

use clap::Parser;
use std::path::PathBuf;

use code_guardian::config::{Config, FailedSectionStyle};

/// AI-assisted review of GitHub pull requests and repositories.
#[derive(Parser, Debug)]
#[command(name = "code-guardian", version = code_guardian::constants::VERSION)]
pub struct Cli {
    /// Enable debug logging (overrides RUST_LOG for this crate).
    #[arg(long, short = 'v', global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Review a pull request's diff.
    PrReview(PrReviewArgs),

    /// Review a whole repository.
    RepoReview(RepoReviewArgs),

    /// Print version information.
    Version,
}

/// Overrides shared by both review commands.
#[derive(clap::Args, Debug, Default)]
pub struct CommonArgs {
    /// Save the report as Markdown under the reports directory.
    #[arg(long, short = 'o', default_value_t = false)]
    pub output: bool,

    /// Completion model (overrides config and CODE_GUARDIAN_MODEL).
    #[arg(long)]
    pub model: Option<String>,

    /// Directory reports are saved under.
    #[arg(long)]
    pub reports_dir: Option<PathBuf>,
}

impl CommonArgs {
    pub fn apply(&self, config: &mut Config) {
        if let Some(ref model) = self.model {
            config.openai.model = model.clone();
        }
        if let Some(ref dir) = self.reports_dir {
            config.report.dir = dir.clone();
        }
    }
}

/// Arguments for the `pr-review` subcommand.
#[derive(Parser, Debug)]
pub struct PrReviewArgs {
    /// Repository owner (user or organisation).
    pub owner: String,

    /// Repository name.
    pub repo: String,

    /// Pull request number.
    pub pr_number: String,

    #[command(flatten)]
    pub common: CommonArgs,
}

impl PrReviewArgs {
    /// Parse the pull request number; it must be a positive integer.
    pub fn validate_number(&self) -> Result<u64, String> {
        match self.pr_number.trim().parse::<u64>() {
            Ok(0) | Err(_) => Err(format!(
                "invalid PR number '{}': expected a positive integer",
                self.pr_number
            )),
            Ok(n) => Ok(n),
        }
    }
}

/// Arguments for the `repo-review` subcommand.
#[derive(Parser, Debug)]
pub struct RepoReviewArgs {
    /// Repository owner (user or organisation).
    pub owner: String,

    /// Repository name.
    pub repo: String,

    #[command(flatten)]
    pub common: CommonArgs,

    /// Whitespace tokens per chunk sent to the completion API.
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Maximum number of sections analysed at the same time.
    #[arg(long)]
    pub max_concurrent: Option<usize>,

    /// How a section whose analysis failed is shown.
    #[arg(long, value_enum)]
    pub failed_section: Option<FailedSectionStyle>,

    /// Suppress the live progress display.
    #[arg(long, short = 'q', default_value_t = false)]
    pub quiet: bool,
}

impl RepoReviewArgs {
    pub fn apply(&self, config: &mut Config) {
        self.common.apply(config);
        if let Some(size) = self.chunk_size {
            config.analysis.chunk_size = size;
        }
        if let Some(n) = self.max_concurrent {
            config.analysis.max_concurrent = n;
        }
        if let Some(style) = self.failed_section {
            config.analysis.failed_section = style;
        }
    }
}

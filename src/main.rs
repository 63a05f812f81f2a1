//! code-guardian: AI-assisted review of GitHub pull requests and repositories.
//!
//! Entry point and error handling boundary. Uses `anyhow` for
//! ergonomic error propagation and user-facing messages.

mod cli;

use code_guardian::completion::openai::OpenAiClient;
use code_guardian::config::Config;
use code_guardian::constants;
use code_guardian::env::{self, Env};
use code_guardian::hosting::github::GithubClient;
use code_guardian::output::markdown::MarkdownRenderer;
use code_guardian::output::report::{self, ReportKind};
use code_guardian::output::terminal::TerminalRenderer;
use code_guardian::output::ReportRenderer;
use code_guardian::review::Reviewer;

use std::io::IsTerminal;
use std::path::Path;
use std::process;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use cli::args::{Cli, Command, PrReviewArgs, RepoReviewArgs};

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::PrReview(args) => run_pr_review(args).await,
        Command::RepoReview(args) => run_repo_review(args).await,
        Command::Version => run_version(),
    }
}

/// Install the stderr log subscriber; `RUST_LOG` applies unless `--verbose` is set.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("warn,code_guardian=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run_version() -> Result<()> {
    println!("{} {}", constants::APP_NAME.bold(), constants::VERSION.green().bold());
    Ok(())
}

/// Load layered config and verify both credentials before any network call.
fn load_config() -> Result<Config> {
    env::load_dotenv();
    let cwd = std::env::current_dir().context("failed to determine working directory")?;
    let config = Config::load(Some(&cwd), &Env::real()).context("failed to load configuration")?;
    Ok(config)
}

/// Build both API clients from a fully resolved config.
fn build_reviewer(config: &Config, show_progress: bool) -> Result<Reviewer> {
    config.check_credentials()?;
    let host = GithubClient::new(&config.github).context("failed to set up GitHub client")?;
    let completer =
        OpenAiClient::new(config.openai.clone()).context("failed to set up completion client")?;
    Ok(Reviewer::new(
        Arc::new(host),
        Arc::new(completer),
        config,
        show_progress,
    ))
}

fn save_report(path: &Path, content: &str) -> Result<()> {
    report::write_report(path, content)?;
    cli::status(format!("✅ Analysis saved to file: {}", path.display()).green());
    Ok(())
}

async fn run_pr_review(args: PrReviewArgs) -> Result<()> {
    let number = match args.validate_number() {
        Ok(n) => n,
        Err(msg) => bail!(msg),
    };

    let mut config = load_config()?;
    args.common.apply(&mut config);
    let reviewer = build_reviewer(&config, false)?;

    cli::status(
        format!("🔍 Fetching PR #{number} from {}/{}...", args.owner, args.repo).blue(),
    );
    let pr_report = reviewer
        .review_pull_request(&args.owner, &args.repo, number)
        .await
        .with_context(|| format!("failed to review PR #{number}"))?;

    print!("{}", TerminalRenderer.render_pr(&pr_report));

    if args.common.output {
        let path = report::report_path(
            &config.report.dir,
            ReportKind::PullRequest { number },
            &args.owner,
            &args.repo,
            &chrono::Local::now(),
        );
        save_report(&path, &MarkdownRenderer.render_pr(&pr_report))?;
    }
    Ok(())
}

async fn run_repo_review(args: RepoReviewArgs) -> Result<()> {
    let mut config = load_config()?;
    args.apply(&mut config);
    let show_progress = !args.quiet && std::io::stderr().is_terminal();
    let reviewer = build_reviewer(&config, show_progress)?;

    cli::status(
        format!("📂 Fetching repository {}/{}...", args.owner, args.repo).blue(),
    );
    let repo_report = reviewer
        .review_repository(&args.owner, &args.repo)
        .await
        .with_context(|| format!("failed to review {}/{}", args.owner, args.repo))?;

    let style = config.analysis.failed_section;
    print!("{}", TerminalRenderer.render_repo(&repo_report, style));

    if args.common.output {
        let path = report::report_path(
            &config.report.dir,
            ReportKind::Repository,
            &args.owner,
            &args.repo,
            &chrono::Local::now(),
        );
        save_report(&path, &MarkdownRenderer.render_repo(&repo_report, style))?;
    }
    Ok(())
}

//! Review pipelines: fetch, analyse, and assemble the report snapshot.
//!
//! A pull request review sends the whole diff in one request and fails as a
//! unit. A repository review runs the five analysis sections in parallel
//! (bounded by `analysis.max_concurrent`); a failed section is recorded and
//! the others carry on.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use strum::IntoEnumIterator;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::analysis::{
    self, AnalysisError, ChunkMode, PR_REVIEW_INSTRUCTION, Persona, section_instruction,
};
use crate::completion::{CompletionClient, CompletionOptions};
use crate::config::Config;
use crate::hosting::{self, HostingError, SourceHost};
use crate::models::{AnalysisSection, PrReport, RepoReport, SectionResult};
use crate::progress::{ProgressTracker, SectionStatus};
use crate::source;

/// Errors from a review run.
#[derive(Error, Debug)]
pub enum ReviewError {
    #[error(transparent)]
    Hosting(#[from] HostingError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("no valid source code found for analysis")]
    NoSourceCode,
}

/// Runs reviews against a hosting service and a completion backend.
pub struct Reviewer {
    host: Arc<dyn SourceHost>,
    completer: Arc<dyn CompletionClient>,
    config: Config,
    /// Draw live section progress on stderr during repository reviews.
    show_progress: bool,
}

impl Reviewer {
    pub fn new(
        host: Arc<dyn SourceHost>,
        completer: Arc<dyn CompletionClient>,
        config: &Config,
        show_progress: bool,
    ) -> Self {
        Self {
            host,
            completer,
            config: config.clone(),
            show_progress,
        }
    }

    /// Fetch a pull request and review its diff in a single request.
    ///
    /// Any failure aborts the review; no partial report is produced.
    pub async fn review_pull_request(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<PrReport, ReviewError> {
        let pull_request = self.host.pull_request(owner, repo, number).await?;
        let files = self.host.pull_request_files(owner, repo, number).await?;
        let diff = self.host.pull_request_diff(owner, repo, number).await?;
        tracing::info!(
            number,
            files = files.len(),
            diff_chars = diff.len(),
            "fetched pull request"
        );

        let options = CompletionOptions {
            max_tokens: self.config.openai.pr_max_tokens,
        };
        let feedback = analysis::aggregate(
            self.completer.as_ref(),
            Persona::PrReviewer,
            PR_REVIEW_INSTRUCTION,
            &diff,
            ChunkMode::Whole,
            &options,
        )
        .await?;

        Ok(PrReport {
            owner: owner.to_string(),
            repo: repo.to_string(),
            pull_request,
            files,
            diff,
            feedback,
        })
    }

    /// List and fetch the repository source, then run every analysis section.
    ///
    /// Listing failures and an empty source are fatal. Per-file fetch failures
    /// and per-section analysis failures are recorded in the report.
    pub async fn review_repository(&self, owner: &str, repo: &str) -> Result<RepoReport, ReviewError> {
        let paths = hosting::list_files_recursive(self.host.as_ref(), owner, repo).await?;
        tracing::info!(files = paths.len(), "listed repository");

        let bundle = source::collect_source(self.host.as_ref(), owner, repo, &paths).await;
        if bundle.is_empty() {
            return Err(ReviewError::NoSourceCode);
        }

        let sections = self.analyze_sections(&bundle.text).await?;

        Ok(RepoReport {
            owner: owner.to_string(),
            repo: repo.to_string(),
            files: bundle.files,
            skipped: bundle.skipped,
            sections,
        })
    }

    /// Run all sections over `text`, returning results in report order.
    async fn analyze_sections(
        &self,
        text: &str,
    ) -> Result<Vec<(AnalysisSection, SectionResult)>, ReviewError> {
        let max_tokens = self.config.analysis.chunk_size;
        // Validates the chunk size once instead of failing every section.
        let chunk_count = analysis::chunk(text, max_tokens)
            .map_err(AnalysisError::from)?
            .len();
        tracing::info!(chunk_count, max_tokens, "chunked repository source");

        let all: Vec<AnalysisSection> = AnalysisSection::iter().collect();
        let progress = Arc::new(ProgressTracker::new(&all, chunk_count, self.show_progress));
        progress.start();

        let semaphore = Arc::new(Semaphore::new(self.config.analysis.max_concurrent.max(1)));
        let text: Arc<str> = Arc::from(text);
        let mut join_set = JoinSet::new();

        for section in all.iter().copied() {
            let completer = Arc::clone(&self.completer);
            let sem = Arc::clone(&semaphore);
            let progress = Arc::clone(&progress);
            let text = Arc::clone(&text);

            join_set.spawn(async move {
                let _permit = match sem.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(e) => return (section, SectionResult::Failed(e.to_string())),
                };
                progress.update(section, SectionStatus::InProgress);
                let started = Instant::now();

                let outcome = analysis::aggregate(
                    completer.as_ref(),
                    Persona::CodeReviewer,
                    section_instruction(section),
                    &text,
                    ChunkMode::Chunked { max_tokens },
                    &CompletionOptions::default(),
                )
                .await;

                let elapsed_ms = started.elapsed().as_millis() as u64;
                let result = match outcome {
                    Ok(body) => {
                        tracing::info!(%section, elapsed_ms, "section complete");
                        progress.update(section, SectionStatus::Done);
                        SectionResult::Completed(body)
                    }
                    Err(e) => {
                        // The tracker reports the failure itself while live.
                        if progress.is_live() {
                            tracing::debug!(%section, elapsed_ms, error = %e, "section failed");
                        } else {
                            tracing::warn!(%section, elapsed_ms, error = %e, "section failed");
                        }
                        progress.update(section, SectionStatus::Failed(e.to_string()));
                        SectionResult::Failed(e.to_string())
                    }
                };
                (section, result)
            });
        }

        let mut results: BTreeMap<AnalysisSection, SectionResult> = BTreeMap::new();
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((section, result)) => {
                    results.insert(section, result);
                }
                Err(e) => tracing::warn!(error = %e, "analysis task panicked"),
            }
        }
        progress.finish();

        Ok(all
            .into_iter()
            .map(|section| {
                let result = results
                    .remove(&section)
                    .unwrap_or_else(|| SectionResult::Failed("analysis task aborted".to_string()));
                (section, result)
            })
            .collect())
    }
}

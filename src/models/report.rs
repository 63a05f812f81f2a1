//! Report snapshots consumed by the renderers.
//!
//! Built once per command invocation and never mutated afterwards.

use super::{AnalysisSection, PullRequestInfo};
use crate::config::FailedSectionStyle;

/// Everything needed to render a pull request review.
#[derive(Debug, Clone)]
pub struct PrReport {
    pub owner: String,
    pub repo: String,
    pub pull_request: PullRequestInfo,
    /// Paths of the changed files, in API order.
    pub files: Vec<String>,
    /// The unified diff, verbatim.
    pub diff: String,
    /// Completion text for the whole diff, verbatim.
    pub feedback: String,
}

/// Outcome of one repository-analysis section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionResult {
    Completed(String),
    /// The section's aggregation failed; holds the error message.
    Failed(String),
}

impl SectionResult {
    /// Body text for this section under the given failure policy.
    pub fn body(&self, style: FailedSectionStyle) -> String {
        match (self, style) {
            (SectionResult::Completed(text), _) => text.clone(),
            (SectionResult::Failed(reason), FailedSectionStyle::Marker) => {
                format!("_Analysis unavailable: {reason}_")
            }
            (SectionResult::Failed(_), FailedSectionStyle::Empty) => String::new(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, SectionResult::Failed(_))
    }
}

/// Everything needed to render a whole-repository review.
#[derive(Debug, Clone)]
pub struct RepoReport {
    pub owner: String,
    pub repo: String,
    /// Files whose content went into the analysis, in fetch order.
    pub files: Vec<String>,
    /// Files that were listed but could not be fetched or decoded.
    pub skipped: Vec<String>,
    /// One entry per section, always in [`AnalysisSection`] declaration order.
    pub sections: Vec<(AnalysisSection, SectionResult)>,
}

impl RepoReport {
    /// Number of sections whose analysis failed.
    pub fn failed_sections(&self) -> usize {
        self.sections.iter().filter(|(_, r)| r.is_failed()).count()
    }
}

//! Output renderers: colored terminal text and Markdown reports, plus report persistence.

pub mod markdown;
pub mod report;
pub mod terminal;

use crate::config::FailedSectionStyle;
use crate::models::{PrReport, RepoReport};

/// Trait for rendering review reports to an output format.
pub trait ReportRenderer {
    /// Render a pull request review.
    fn render_pr(&self, report: &PrReport) -> String;

    /// Render a repository review; `style` decides how failed sections read.
    fn render_repo(&self, report: &RepoReport, style: FailedSectionStyle) -> String;
}

/// Human-readable creation time used by every renderer.
pub(crate) fn format_created_at(report: &PrReport) -> String {
    report
        .pull_request
        .created_at
        .format("%Y-%m-%d %H:%M:%S UTC")
        .to_string()
}

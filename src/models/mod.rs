//! Shared types used across all modules.
//!
//! Pull request metadata, analysis sections, and the read-only report
//! snapshots handed to the renderers. Other modules import from here
//! rather than reaching into each other's internals.

pub mod pull_request;
pub mod report;

use std::fmt;

use strum::{EnumCount, EnumIter};

pub use pull_request::PullRequestInfo;
pub use report::{PrReport, RepoReport, SectionResult};

/// One of the independent analyses run against a whole repository.
///
/// Declaration order is report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumCount)]
pub enum AnalysisSection {
    Summary,
    UseCases,
    CodeQuality,
    Security,
    Improvements,
}

impl AnalysisSection {
    /// Section heading shared by the terminal and Markdown renderers.
    pub fn heading(self) -> &'static str {
        match self {
            AnalysisSection::Summary => "Application Summary",
            AnalysisSection::UseCases => "Key Use Cases",
            AnalysisSection::CodeQuality => "Code Quality Issues (Critical Only)",
            AnalysisSection::Security => "Security Issues (Critical Only)",
            AnalysisSection::Improvements => "Key Areas for Improvement",
        }
    }

    /// Emoji prefix used in front of the heading.
    pub fn icon(self) -> &'static str {
        match self {
            AnalysisSection::Summary => "📖",
            AnalysisSection::UseCases => "✅",
            AnalysisSection::CodeQuality => "🚨",
            AnalysisSection::Security => "🔒",
            AnalysisSection::Improvements => "📈",
        }
    }
}

impl fmt::Display for AnalysisSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisSection::Summary => write!(f, "summary"),
            AnalysisSection::UseCases => write!(f, "use-cases"),
            AnalysisSection::CodeQuality => write!(f, "code-quality"),
            AnalysisSection::Security => write!(f, "security"),
            AnalysisSection::Improvements => write!(f, "improvements"),
        }
    }
}

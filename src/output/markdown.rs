//! Markdown renderer for saved reports.

use crate::config::FailedSectionStyle;
use crate::models::{PrReport, RepoReport};
use crate::output::{ReportRenderer, format_created_at};

/// Renders reports as Markdown documents with fixed section headers.
pub struct MarkdownRenderer;

/// A backtick fence longer than any backtick run inside `text`.
fn fence_for(text: &str) -> String {
    let mut longest = 0;
    let mut run = 0;
    for c in text.chars() {
        if c == '`' {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    "`".repeat((longest + 1).max(3))
}

fn file_list(files: &[String]) -> String {
    files.iter().map(|f| format!("- {f}\n")).collect()
}

impl ReportRenderer for MarkdownRenderer {
    fn render_pr(&self, report: &PrReport) -> String {
        let pr = &report.pull_request;
        let fence = fence_for(&report.diff);
        let diff = report.diff.strip_suffix('\n').unwrap_or(&report.diff);

        let mut out = String::new();
        out.push_str("# Pull Request Analysis Report\n\n");
        out.push_str(&format!("## PR {} - {}\n", pr.number, pr.title));
        out.push_str(&format!("- **Repository:** {}/{}\n", report.owner, report.repo));
        out.push_str(&format!("- **Author:** {}\n", pr.author));
        out.push_str(&format!("- **Created at:** {}\n", format_created_at(report)));
        out.push_str(&format!("- **PR Link:** [{0}]({0})\n\n", pr.html_url));

        out.push_str("## 📂 Files changed:\n");
        out.push_str(&file_list(&report.files));
        out.push('\n');

        out.push_str("## 🔍 Code changes:\n");
        out.push_str(&format!("{fence}diff\n{diff}\n{fence}\n\n"));

        out.push_str("## 🤖 AI Suggestions:\n");
        out.push_str(&report.feedback);
        out.push('\n');
        out
    }

    fn render_repo(&self, report: &RepoReport, style: FailedSectionStyle) -> String {
        let mut out = String::new();
        out.push_str("# Repository Analysis Report\n\n");
        out.push_str(&format!("## 📂 Repository: {}/{}\n", report.owner, report.repo));
        out.push_str(&format!("- **Files analysed:** {}\n", report.files.len()));
        if !report.skipped.is_empty() {
            out.push_str(&format!("- **Files skipped:** {}\n", report.skipped.join(", ")));
        }

        for (section, result) in &report.sections {
            out.push_str(&format!("\n## {} {}:\n", section.icon(), section.heading()));
            out.push_str(&result.body(style));
            out.push('\n');
        }
        out
    }
}

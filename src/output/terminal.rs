//! Terminal renderer: labeled, colored sections in a fixed order.

use colored::{ColoredString, Colorize};

use crate::config::FailedSectionStyle;
use crate::models::{AnalysisSection, PrReport, RepoReport};
use crate::output::{ReportRenderer, format_created_at};

/// Terminal output renderer with colored section headings.
pub struct TerminalRenderer;

fn section_heading(section: AnalysisSection) -> ColoredString {
    let text = format!("{} {}:", section.icon(), section.heading());
    match section {
        AnalysisSection::Summary => text.cyan(),
        AnalysisSection::UseCases => text.green(),
        AnalysisSection::CodeQuality => text.red(),
        AnalysisSection::Security => text.yellow(),
        AnalysisSection::Improvements => text.blue(),
    }
}

impl ReportRenderer for TerminalRenderer {
    fn render_pr(&self, report: &PrReport) -> String {
        let pr = &report.pull_request;
        let mut output = String::new();

        output.push_str(&format!(
            "\n{}\n",
            format!("🔍 PR {} - {}", pr.number, pr.title).cyan().bold()
        ));
        output.push_str(&format!("{}\n", format!("👤 Author: {}", pr.author).green()));
        output.push_str(&format!(
            "{}\n",
            format!("📅 Created at: {}", format_created_at(report)).yellow()
        ));
        output.push_str(&format!("{}\n", format!("🔗 PR Link: {}", pr.html_url).blue()));

        output.push_str(&format!(
            "\n{}\n",
            format!("📂 Files changed ({}):", report.files.len()).magenta()
        ));
        for file in &report.files {
            output.push_str(&format!("  - {file}\n"));
        }

        output.push_str(&format!(
            "\n{}\n",
            format!("📌 Code changes ({} characters)", report.diff.chars().count()).magenta()
        ));

        output.push_str(&format!("\n{}\n", "📢 AI Feedback:".green().bold()));
        output.push_str(&report.feedback);
        output.push('\n');

        output
    }

    fn render_repo(&self, report: &RepoReport, style: FailedSectionStyle) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "\n{}\n",
            format!(
                "📌 Repository Analysis Summary for {}/{}",
                report.owner, report.repo
            )
            .magenta()
            .bold()
        ));
        output.push_str(&format!(
            "{}\n",
            format!("   {} file(s) analysed", report.files.len()).dimmed()
        ));
        if !report.skipped.is_empty() {
            output.push_str(&format!(
                "{}\n",
                format!("   {} file(s) skipped: {}", report.skipped.len(), report.skipped.join(", "))
                    .yellow()
            ));
        }

        for (section, result) in &report.sections {
            output.push_str(&format!("\n{}\n", section_heading(*section)));
            let body = result.body(style);
            if result.is_failed() && !body.is_empty() {
                output.push_str(&format!("{}\n", body.red()));
            } else {
                output.push_str(&body);
                output.push('\n');
            }
        }

        let failed = report.failed_sections();
        if failed > 0 {
            output.push_str(&format!(
                "\n{}\n",
                format!(
                    "⚠ {failed} of {} section(s) could not be analysed",
                    report.sections.len()
                )
                .yellow()
                .bold()
            ));
        }

        output
    }
}

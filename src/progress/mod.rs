//! Progress reporting for terminal output.
//!
//! Live-updating section status for repository analysis, drawn on stderr
//! with colored icons. Disabled when stderr is not a terminal or with `--quiet`.

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard};

use colored::Colorize;

use crate::models::AnalysisSection;

/// Status of a single analysis section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionStatus {
    /// Queued, waiting for a concurrency slot.
    Pending,
    /// Chunks are being sent.
    InProgress,
    Done,
    Failed(String),
}

/// Tracks and renders live progress for the analysis sections.
///
/// Shared across tasks via `Arc`.
pub struct ProgressTracker {
    inner: Mutex<ProgressState>,
    /// If false, all output is suppressed.
    enabled: bool,
}

struct ProgressState {
    /// Ordered by section so rendering matches report order.
    sections: BTreeMap<AnalysisSection, SectionStatus>,
    /// Number of lines last printed (for clearing).
    rendered_lines: usize,
    chunk_count: usize,
}

impl ProgressTracker {
    /// `chunk_count` is shown in the header; pass 0 when unknown.
    pub fn new(sections: &[AnalysisSection], chunk_count: usize, enabled: bool) -> Self {
        let sections = sections
            .iter()
            .map(|s| (*s, SectionStatus::Pending))
            .collect();
        Self {
            inner: Mutex::new(ProgressState {
                sections,
                rendered_lines: 0,
                chunk_count,
            }),
            enabled,
        }
    }

    fn state(&self) -> MutexGuard<'_, ProgressState> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Current status of a section, if tracked.
    pub fn status(&self, section: AnalysisSection) -> Option<SectionStatus> {
        self.state().sections.get(&section).cloned()
    }

    /// Whether the live display owns stderr. Other stderr writes while live
    /// throw off the line count used to redraw.
    pub fn is_live(&self) -> bool {
        self.enabled
    }

    /// Update the status of a section and re-render.
    pub fn update(&self, section: AnalysisSection, status: SectionStatus) {
        let mut state = self.state();
        state.sections.insert(section, status);
        if self.enabled {
            Self::render(&mut state);
        }
    }

    /// Print the initial listing.
    pub fn start(&self) {
        if !self.enabled {
            return;
        }
        let mut state = self.state();
        Self::render(&mut state);
    }

    /// Clear the live display and print the final status of each section.
    pub fn finish(&self) {
        if !self.enabled {
            return;
        }
        let mut state = self.state();
        Self::clear_lines(state.rendered_lines);
        state.rendered_lines = 0;

        let stderr = io::stderr();
        let mut handle = stderr.lock();
        for (section, status) in &state.sections {
            let line = match status {
                SectionStatus::Failed(reason) => {
                    format!("{} {} {}", "✖".red().bold(), section.heading().dimmed(), reason.red())
                }
                _ => format!("{} {} {}", "✔".green().bold(), section.heading().dimmed(), "done".green()),
            };
            let _ = writeln!(handle, "  {line}");
        }
        let _ = writeln!(handle);
    }

    fn render(state: &mut ProgressState) {
        let stderr = io::stderr();
        let mut handle = stderr.lock();

        Self::clear_lines(state.rendered_lines);

        let mut lines = 0;

        let chunks = match state.chunk_count {
            0 => String::new(),
            1 => " over 1 chunk".to_string(),
            n => format!(" over {n} chunks"),
        };
        let _ = writeln!(
            handle,
            "  {} Analysing {} section(s){chunks}",
            "▸".cyan().bold(),
            state.sections.len(),
        );
        lines += 1;

        for (section, status) in &state.sections {
            let (icon, status_text) = match status {
                SectionStatus::Pending => ("○".dimmed().to_string(), "waiting".dimmed().to_string()),
                SectionStatus::InProgress => (
                    "◌".cyan().bold().to_string(),
                    "analysing…".cyan().to_string(),
                ),
                SectionStatus::Done => ("✔".green().bold().to_string(), "done".green().to_string()),
                SectionStatus::Failed(reason) => {
                    ("✖".red().bold().to_string(), reason.red().to_string())
                }
            };
            let _ = writeln!(
                handle,
                "    {icon} {} {status_text}",
                section.heading().dimmed()
            );
            lines += 1;
        }

        let _ = handle.flush();
        state.rendered_lines = lines;
    }

    /// Move cursor up and clear `n` lines.
    fn clear_lines(n: usize) {
        if n == 0 {
            return;
        }
        let stderr = io::stderr();
        let mut handle = stderr.lock();
        for _ in 0..n {
            let _ = write!(handle, "\x1b[1A\x1b[2K");
        }
        let _ = handle.flush();
    }
}

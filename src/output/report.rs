//! Report file naming and persistence.
//!
//! Reports land under `<dir>/pr/` or `<dir>/repo/` with a timestamp-qualified
//! name, so repeated runs never overwrite each other.

use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("failed to write report {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// What a report describes; decides its subdirectory and file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    PullRequest { number: u64 },
    Repository,
}

impl ReportKind {
    fn subdir(self) -> &'static str {
        match self {
            ReportKind::PullRequest { .. } => "pr",
            ReportKind::Repository => "repo",
        }
    }
}

/// `<dir>/pr/<ts>-<repo>_<owner>_<n>.md` or `<dir>/repo/<ts>-<repo>_<owner>.md`.
pub fn report_path<Tz: TimeZone>(
    dir: &Path,
    kind: ReportKind,
    owner: &str,
    repo: &str,
    timestamp: &DateTime<Tz>,
) -> PathBuf
where
    Tz::Offset: std::fmt::Display,
{
    let ts = timestamp.format("%Y%m%d-%H%M%S");
    let name = match kind {
        ReportKind::PullRequest { number } => format!("{ts}-{repo}_{owner}_{number}.md"),
        ReportKind::Repository => format!("{ts}-{repo}_{owner}.md"),
    };
    dir.join(kind.subdir()).join(name)
}

/// Write `content` to `path`, creating parent directories as needed.
pub fn write_report(path: &Path, content: &str) -> Result<(), ReportError> {
    let err = |source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(err)?;
    }
    std::fs::write(path, content).map_err(err)?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "report written");
    Ok(())
}

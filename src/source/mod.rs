//! Repository source collection.
//!
//! Filters the repository listing down to analysable files, fetches each one,
//! and concatenates them into the single text the repository analysis runs on.

use crate::hosting::SourceHost;

/// Concatenated repository source plus bookkeeping for the report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceBundle {
    /// `// File: <path>` blocks in fetch order.
    pub text: String,
    /// Files whose content is in `text`.
    pub files: Vec<String>,
    /// Files that passed the filter but could not be fetched or decoded.
    pub skipped: Vec<String>,
}

impl SourceBundle {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Markdown files and anything with `LICENSE` in its path are left out of analysis.
pub fn is_analyzable(path: &str) -> bool {
    !path.ends_with(".md") && !path.contains("LICENSE")
}

/// Append one file block to the bundle text.
fn push_file_block(text: &mut String, path: &str, content: &str) {
    text.push_str("// File: ");
    text.push_str(path);
    text.push('\n');
    text.push_str(content);
    text.push('\n');
}

/// Fetch every analysable path and concatenate the contents.
///
/// A file that fails to fetch is recorded in `skipped` for the report to
/// list; it never fails the collection.
pub async fn collect_source(
    host: &dyn SourceHost,
    owner: &str,
    repo: &str,
    paths: &[String],
) -> SourceBundle {
    let mut bundle = SourceBundle::default();

    for path in paths.iter().filter(|p| is_analyzable(p)) {
        match host.file_content(owner, repo, path).await {
            Ok(content) => {
                tracing::debug!(%path, bytes = content.len(), "fetched file");
                push_file_block(&mut bundle.text, path, &content);
                bundle.files.push(path.clone());
            }
            Err(e) => {
                tracing::debug!(%path, error = %e, "skipping file");
                bundle.skipped.push(path.clone());
            }
        }
    }

    bundle
}

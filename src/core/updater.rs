//! File updater — load, transform, conditionally save, report.
//!
//! Each file is processed independently: a missing file or an I/O failure is
//! folded into that file's report and the run continues to the next path.
//! The caller decides what the aggregate outcome means for the process exit.

use std::path::Path;

use serde::Serialize;

use crate::files::FileSystem;
use crate::patch;

/// Per-file outcome of one update pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Pattern matched and the new content was written back.
    Updated,
    /// Content identical after the pass (pattern not found, or every match
    /// already carries its follow-up line). No write occurs.
    Unchanged,
    /// Path does not resolve to an existing file. Reported, not fatal.
    NotFound,
    /// Read or write failed. Reported, run continues.
    Failed,
}

/// Report for one processed file.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReport {
    pub path: String,
    pub outcome: Outcome,
    /// Number of follow-up statements inserted.
    #[serde(skip_serializing_if = "is_zero")]
    pub insertions: usize,
    /// Newline-count delta between old and new content.
    #[serde(skip_serializing_if = "is_zero")]
    pub lines_added: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn is_zero(v: &usize) -> bool {
    *v == 0
}

impl FileReport {
    fn new(path: &Path, outcome: Outcome) -> Self {
        Self {
            path: path.display().to_string(),
            outcome,
            insertions: 0,
            lines_added: 0,
            error: None,
        }
    }

    fn failed(path: &Path, error: String) -> Self {
        Self {
            error: Some(error),
            ..Self::new(path, Outcome::Failed)
        }
    }
}

/// Aggregate counts across one run.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub updated: usize,
    pub unchanged: usize,
    pub not_found: usize,
    pub failed: usize,
    pub insertions: usize,
    pub lines_added: usize,
}

impl RunSummary {
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// Result of processing a list of files.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResult {
    pub files: Vec<FileReport>,
    pub summary: RunSummary,
}

fn newline_count(text: &str) -> usize {
    text.bytes().filter(|b| *b == b'\n').count()
}

/// Transform one file: insert the font call after every matched statement,
/// writing back only if the content changed.
pub fn update_file(fs: &dyn FileSystem, path: &Path, dry_run: bool) -> FileReport {
    if !fs.exists(path) {
        log_status!("patch", "File not found: {}", path.display());
        return FileReport::new(path, Outcome::NotFound);
    }

    let content = match fs.read(path) {
        Ok(content) => content,
        Err(e) => {
            log_status!("patch", "Failed to read {}: {}", path.display(), e);
            return FileReport::failed(path, e.to_string());
        }
    };

    let (updated, insertions) = patch::apply(&content);

    if updated == content {
        log_status!("patch", "No changes: {}", path.display());
        return FileReport::new(path, Outcome::Unchanged);
    }

    let lines_added = newline_count(&updated) - newline_count(&content);

    if !dry_run {
        if let Err(e) = fs.write(path, &updated) {
            log_status!("patch", "Failed to write {}: {}", path.display(), e);
            return FileReport::failed(path, e.to_string());
        }
    }

    log_status!(
        "patch",
        "{} {} (+{} lines)",
        if dry_run { "Would update" } else { "Updated" },
        path.display(),
        lines_added
    );

    FileReport {
        insertions,
        lines_added,
        ..FileReport::new(path, Outcome::Updated)
    }
}

/// Process an explicit list of paths in order, collecting per-file reports
/// and aggregate counts.
pub fn run(fs: &dyn FileSystem, paths: &[String], dry_run: bool) -> RunResult {
    let mut files = Vec::with_capacity(paths.len());
    let mut summary = RunSummary::default();

    for path in paths {
        let report = update_file(fs, Path::new(path), dry_run);

        match report.outcome {
            Outcome::Updated => summary.updated += 1,
            Outcome::Unchanged => summary.unchanged += 1,
            Outcome::NotFound => summary.not_found += 1,
            Outcome::Failed => summary.failed += 1,
        }
        summary.insertions += report.insertions;
        summary.lines_added += report.lines_added;

        files.push(report);
    }

    RunResult { files, summary }
}

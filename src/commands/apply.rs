use std::path::Path;

use clap::Args;
use serde::Serialize;

use fontpatch::files::{local, FileSystem};
use fontpatch::updater::{self, FileReport, RunSummary};
use fontpatch::{log_status, Error};

use crate::commands::CmdResult;

#[derive(Args)]
pub struct ApplyArgs {
    /// Files to patch in place
    #[arg(value_name = "PATH")]
    pub paths: Vec<String>,

    /// Read additional paths from a file, one per line
    /// (blank lines and '#' comments are skipped)
    #[arg(long, value_name = "FILE")]
    pub paths_from: Option<String>,

    /// Report what would change without writing anything
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Serialize)]
#[serde(tag = "command")]
pub enum ApplyOutput {
    #[serde(rename = "apply")]
    Apply {
        dry_run: bool,
        files: Vec<FileReport>,
        summary: RunSummary,
    },
}

pub fn run(args: ApplyArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<ApplyOutput> {
    run_with_fs(args, &local())
}

fn run_with_fs(args: ApplyArgs, fs: &dyn FileSystem) -> CmdResult<ApplyOutput> {
    let mut paths = args.paths;

    if let Some(list_file) = &args.paths_from {
        let content = fs.read(Path::new(list_file)).map_err(|e| {
            Error::InvalidArgument(
                "paths_from".to_string(),
                format!("Cannot read '{}': {}", list_file, e),
            )
        })?;
        paths.extend(parse_path_list(&content));
    }

    if paths.is_empty() {
        return Err(Error::InvalidArgument(
            "paths".to_string(),
            "No files to patch. Pass paths as arguments or use --paths-from.".to_string(),
        ));
    }

    log_status!("apply", "Patching font usage in {} file(s)...", paths.len());

    let result = updater::run(fs, &paths, args.dry_run);

    log_status!(
        "apply",
        "Done: {} updated, {} unchanged, {} not found, {} failed",
        result.summary.updated,
        result.summary.unchanged,
        result.summary.not_found,
        result.summary.failed
    );

    let exit_code = if result.summary.has_failures() { 1 } else { 0 };

    Ok((
        ApplyOutput::Apply {
            dry_run: args.dry_run,
            files: result.files,
            summary: result.summary,
        },
        exit_code,
    ))
}

/// Parse a path-list file: one path per line, trimmed; blank lines and
/// lines starting with '#' are skipped.
fn parse_path_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_path_list_skips_blanks_and_comments() {
        let content = "# Unity UI scripts\n/a/Popup.cs\n\n  /b/Settings.cs  \n# done\n";
        assert_eq!(
            parse_path_list(content),
            vec!["/a/Popup.cs".to_string(), "/b/Settings.cs".to_string()]
        );
    }

    #[test]
    fn parse_path_list_empty_input() {
        assert!(parse_path_list("").is_empty());
        assert!(parse_path_list("\n# only a comment\n").is_empty());
    }

    use fontpatch::files::MemoryFs;
    use fontpatch::updater::Outcome;

    fn args(paths: &[&str], paths_from: Option<&str>) -> ApplyArgs {
        ApplyArgs {
            paths: paths.iter().map(|p| p.to_string()).collect(),
            paths_from: paths_from.map(str::to_string),
            dry_run: false,
        }
    }

    #[test]
    fn paths_from_is_read_through_the_filesystem() {
        let fs = MemoryFs::new();
        fs.insert("/list.txt", "# scripts\n/a.cs\n/b.cs\n");
        fs.insert(
            "/a.cs",
            "    TextMeshProUGUI label = obj.AddComponent<TextMeshProUGUI>();\n",
        );
        fs.insert("/b.cs", "void Start() { }\n");

        let (output, exit_code) = run_with_fs(args(&[], Some("/list.txt")), &fs).unwrap();

        assert_eq!(exit_code, 0);
        let ApplyOutput::Apply { files, summary, .. } = output;
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].outcome, Outcome::Updated);
        assert_eq!(files[1].outcome, Outcome::Unchanged);
        assert_eq!(summary.updated, 1);
    }

    #[test]
    fn missing_paths_from_file_is_a_validation_error() {
        let fs = MemoryFs::new();
        let err = run_with_fs(args(&[], Some("/nope.txt")), &fs).unwrap_err();
        assert_eq!(err.code(), "INVALID_ARGUMENT");
        assert!(err.to_string().contains("/nope.txt"));
    }

    #[test]
    fn empty_path_list_is_a_validation_error() {
        let fs = MemoryFs::new();
        let err = run_with_fs(args(&[], None), &fs).unwrap_err();
        assert_eq!(err.code(), "INVALID_ARGUMENT");
    }

    #[test]
    fn any_failed_file_maps_to_exit_code_1() {
        let fs = MemoryFs::new();
        fs.insert(
            "/bad.cs",
            "    TextMeshProUGUI label = obj.AddComponent<TextMeshProUGUI>();\n",
        );
        fs.fail_reads_on("/bad.cs");

        let (output, exit_code) = run_with_fs(args(&["/bad.cs"], None), &fs).unwrap();

        assert_eq!(exit_code, 1);
        let ApplyOutput::Apply { summary, .. } = output;
        assert_eq!(summary.failed, 1);
    }
}

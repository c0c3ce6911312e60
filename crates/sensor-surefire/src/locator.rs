//! Report file discovery.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

/// Prefix of per-class report files.
pub const TEST_REPORT_PREFIX: &str = "TEST-";

/// Prefix of aggregated suite report files, used when no per-class file exists.
pub const TEST_SUITE_REPORT_PREFIX: &str = "TESTS-";

const REPORT_EXTENSION: &str = ".xml";

/// Lists the report files of `dir`.
///
/// Returns `TEST-*.xml` files, or `TESTS-*.xml` files when there are none,
/// sorted by filename. A missing or unreadable directory yields no files.
pub fn find_reports(dir: &Path) -> Vec<PathBuf> {
    if !dir.is_dir() {
        debug!(dir = %dir.display(), "reports directory not found");
        return Vec::new();
    }

    let files = match list_files(dir) {
        Ok(files) => files,
        Err(error) => {
            warn!(dir = %dir.display(), %error, "cannot list reports directory");
            return Vec::new();
        }
    };

    let reports = with_prefix(&files, TEST_REPORT_PREFIX);
    if !reports.is_empty() {
        return reports;
    }
    with_prefix(&files, TEST_SUITE_REPORT_PREFIX)
}

fn list_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

fn with_prefix(files: &[PathBuf], prefix: &str) -> Vec<PathBuf> {
    files
        .iter()
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with(prefix) && name.ends_with(REPORT_EXTENSION))
        })
        .cloned()
        .collect()
}

//! Report discovery with Ant-style include patterns.

use std::path::{Component, Path, PathBuf};

use globset::{GlobBuilder, GlobMatcher};
use tracing::{debug, warn};
use walkdir::WalkDir;

const GLOB_META: &[char] = &['*', '?', '[', '{'];

/// An Ant-style include pattern.
///
/// `*` matches within one directory, `**` spans directories and a trailing
/// `/` stands for `/**`. Matching ignores case. Relative patterns are matched
/// against paths relative to the base directory.
#[derive(Debug, Clone)]
pub struct ReportPattern {
    pattern: String,
    matcher: GlobMatcher,
}

impl ReportPattern {
    pub fn new(pattern: &str) -> Result<Self, globset::Error> {
        let mut pattern = pattern.trim().replace('\\', "/");
        if pattern.ends_with('/') {
            pattern.push_str("**");
        }
        let matcher = GlobBuilder::new(&pattern)
            .literal_separator(true)
            .case_insensitive(true)
            .build()?
            .compile_matcher();
        Ok(Self { pattern, matcher })
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    pub fn is_absolute(&self) -> bool {
        Path::new(&self.pattern).is_absolute()
    }

    /// Leading directories of the pattern that hold no wildcard.
    fn literal_prefix(&self) -> PathBuf {
        let mut components = Path::new(&self.pattern).components().peekable();
        let mut prefix = PathBuf::new();
        while let Some(component) = components.next() {
            let is_last = components.peek().is_none();
            let literal = match component {
                Component::Normal(part) => part.to_str().is_some_and(|part| !part.contains(GLOB_META)),
                _ => true,
            };
            if !literal || is_last {
                break;
            }
            prefix.push(component);
        }
        prefix
    }

    /// Files the pattern selects, sorted by path. Relative patterns scan the
    /// whole base directory; absolute ones start at their literal prefix.
    pub fn scan(&self, base_dir: &Path) -> Vec<PathBuf> {
        let root = if self.is_absolute() {
            self.literal_prefix()
        } else {
            base_dir.to_path_buf()
        };
        if !root.is_dir() {
            debug!(root = %root.display(), pattern = %self.pattern, "no directory to scan");
            return Vec::new();
        }

        let mut reports = Vec::new();
        for entry in WalkDir::new(&root).follow_links(false) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(error) => {
                    warn!(%error, "skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let candidate = if self.is_absolute() {
                path
            } else {
                match path.strip_prefix(base_dir) {
                    Ok(relative) => relative,
                    Err(_) => continue,
                }
            };
            if self.matcher.is_match(candidate) {
                reports.push(path.to_path_buf());
            }
        }
        reports.sort();
        reports
    }
}

/// Report files matching `pattern` under `base_dir`.
///
/// An invalid pattern is logged and selects nothing.
pub fn find_reports(base_dir: &Path, pattern: &str) -> Vec<PathBuf> {
    match ReportPattern::new(pattern) {
        Ok(pattern) => pattern.scan(base_dir),
        Err(error) => {
            warn!(pattern, %error, "invalid report pattern");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn touch(base: &Path, relative: &str) {
        let path = base.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create dirs");
        }
        fs::write(path, "<oclint/>").expect("write report");
    }

    fn relative(base: &Path, paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .filter_map(|path| path.strip_prefix(base).ok())
            .map(|path| path.to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn single_star_stays_in_directory() {
        let dir = tempfile::tempdir().expect("create temp dir");
        touch(dir.path(), "sonar-reports/app-oclint.xml");
        touch(dir.path(), "sonar-reports/nested/lib-oclint.xml");
        touch(dir.path(), "sonar-reports/tests.xml");

        let found = find_reports(dir.path(), "sonar-reports/*oclint.xml");

        assert_eq!(relative(dir.path(), &found), vec!["sonar-reports/app-oclint.xml"]);
    }

    #[test]
    fn matching_ignores_case() {
        let dir = tempfile::tempdir().expect("create temp dir");
        touch(dir.path(), "Sonar-Reports/App-OCLint.XML");

        let found = find_reports(dir.path(), "sonar-reports/*oclint.xml");

        assert_eq!(found.len(), 1);
    }

    #[test]
    fn double_star_and_trailing_slash_span_directories() {
        let dir = tempfile::tempdir().expect("create temp dir");
        touch(dir.path(), "build/a/oclint.xml");
        touch(dir.path(), "build/a/b/oclint.xml");
        touch(dir.path(), "other/oclint.xml");

        let deep = find_reports(dir.path(), "build/**/oclint.xml");
        let everything = find_reports(dir.path(), "build/");

        assert_eq!(
            relative(dir.path(), &deep),
            vec!["build/a/b/oclint.xml", "build/a/oclint.xml"]
        );
        assert_eq!(everything.len(), 2);
    }

    #[test]
    fn no_match_is_empty() {
        let dir = tempfile::tempdir().expect("create temp dir");
        assert!(find_reports(dir.path(), "sonar-reports/*oclint.xml").is_empty());
        assert!(find_reports(dir.path(), "[").is_empty());
    }

    #[test]
    fn literal_prefix_stops_at_first_wildcard() {
        let pattern = ReportPattern::new("reports/oclint/*.xml").unwrap();
        assert_eq!(pattern.literal_prefix(), PathBuf::from("reports/oclint"));
        let pattern = ReportPattern::new("oclint.xml").unwrap();
        assert_eq!(pattern.literal_prefix(), PathBuf::new());
    }
}

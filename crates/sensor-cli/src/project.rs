//! Project tree backing the sensors' file lookups.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use globset::{GlobBuilder, GlobSetBuilder};
use sensor_model::{InputFileSystem, OBJC_LANGUAGE_KEY, ProjectContext, ResourceHandle, Settings};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Settings key of the project key.
pub const PROJECT_KEY: &str = "sonar.projectKey";

/// Settings key of the comma separated child module list.
pub const MODULES_KEY: &str = "sonar.modules";

/// Source files of a project, indexed once at startup.
#[derive(Debug, Clone)]
pub struct ProjectTree {
    base_dir: PathBuf,
    /// Paths relative to `base_dir`, `/` separated, sorted.
    files: Vec<String>,
    languages: BTreeSet<&'static str>,
}

impl ProjectTree {
    /// Indexes every file below `base_dir`, skipping hidden entries. The
    /// base directory is kept in canonical form so absolute report paths
    /// can be made relative to it.
    pub fn scan(base_dir: &Path) -> Result<Self> {
        if !base_dir.is_dir() {
            bail!("project directory not found: {}", base_dir.display());
        }
        let base_dir = &base_dir
            .canonicalize()
            .with_context(|| format!("resolve {}", base_dir.display()))?;

        let mut files = Vec::new();
        let walker = WalkDir::new(base_dir)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));
        for entry in walker {
            let entry = entry.with_context(|| format!("walk {}", base_dir.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(base_dir) else {
                continue;
            };
            files.push(relative.to_string_lossy().replace('\\', "/"));
        }
        files.sort();

        let languages = files
            .iter()
            .filter_map(|file| language_of(Path::new(file)))
            .collect();
        debug!(base_dir = %base_dir.display(), files = files.len(), "indexed project tree");

        Ok(Self {
            base_dir: base_dir.to_path_buf(),
            files,
            languages,
        })
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }

    /// Project model for this tree: key and modules come from the settings.
    pub fn context(&self, settings: &Settings) -> ProjectContext {
        let key = settings
            .get_string(PROJECT_KEY)
            .map(str::to_string)
            .or_else(|| {
                self.base_dir
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
            })
            .unwrap_or_else(|| "project".to_string());
        let mut context = ProjectContext::root(key, &self.base_dir);
        context.modules = settings
            .get_string(MODULES_KEY)
            .map(|modules| {
                modules
                    .split(',')
                    .map(str::trim)
                    .filter(|module| !module.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        context
    }
}

impl InputFileSystem for ProjectTree {
    fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn has_language(&self, language: &str) -> bool {
        self.languages.contains(language)
    }

    fn input_file(&self, relative_path: &Path) -> Option<ResourceHandle> {
        let wanted = relative_path.to_string_lossy().replace('\\', "/");
        let wanted = wanted.trim_start_matches("./");
        self.files
            .binary_search_by(|file| file.as_str().cmp(wanted))
            .ok()
            .map(|index| ResourceHandle::file(self.files[index].as_str()))
    }

    fn input_file_matching(&self, patterns: &[String]) -> Option<ResourceHandle> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            match GlobBuilder::new(pattern).literal_separator(true).build() {
                Ok(glob) => {
                    builder.add(glob);
                }
                Err(error) => warn!(pattern = %pattern, %error, "ignoring invalid file pattern"),
            }
        }
        let set = match builder.build() {
            Ok(set) => set,
            Err(error) => {
                warn!(%error, "cannot build file patterns");
                return None;
            }
        };
        self.files
            .iter()
            .find(|file| set.is_match(file.as_str()))
            .map(|file| ResourceHandle::file(file.as_str()))
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

fn language_of(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?;
    ["m", "mm", "h"]
        .iter()
        .any(|known| extension.eq_ignore_ascii_case(known))
        .then_some(OBJC_LANGUAGE_KEY)
}

use crate::config::Config;
use ignore::WalkBuilder;
use miette::{IntoDiagnostic, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// A discovered `.java` source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
}

impl SourceFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn read_contents(&self) -> Result<String> {
        std::fs::read_to_string(&self.path).into_diagnostic()
    }
}

/// Finds Java source files under a directory tree.
pub struct FileFinder<'a> {
    config: &'a Config,
}

impl<'a> FileFinder<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Find all `.java` files under `root`, honoring ignore files and the
    /// configured exclusion globs. Results are sorted by path so repeated
    /// runs see the same order.
    pub fn find_java_files(&self, root: &Path) -> Result<Vec<SourceFile>> {
        debug!("Scanning for Java files in: {}", root.display());

        if !root.exists() {
            trace!("Directory does not exist: {}", root.display());
            return Ok(Vec::new());
        }

        let walker = WalkBuilder::new(root)
            .hidden(true)           // Skip hidden files
            .git_ignore(true)       // Respect .gitignore
            .git_global(true)       // Respect global gitignore
            .git_exclude(true)      // Respect .git/info/exclude
            .ignore(true)           // Respect .ignore files
            .parents(true)          // Check parent directories for ignore files
            .follow_links(false)    // Don't follow symlinks
            .build();

        let mut files: Vec<SourceFile> = walker
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter_map(|entry| {
                let path = entry.path();

                if path.extension().and_then(|e| e.to_str()) != Some("java") {
                    return None;
                }
                if self.config.should_exclude(path) {
                    trace!("Excluding: {}", path.display());
                    return None;
                }

                trace!("Found: {}", path.display());
                Some(SourceFile::new(path.to_path_buf()))
            })
            .collect();

        files.sort_by(|a, b| a.path.cmp(&b.path));
        debug!("Found {} Java files", files.len());
        Ok(files)
    }
}

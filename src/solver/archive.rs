// Classpath-archive type provider

use miette::{IntoDiagnostic, Result, WrapErr};
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;
use zip::ZipArchive;

/// Class names listed in jar archives. Resolution is by name only: member and
/// hierarchy information is not read from bytecode, so archive types resolve
/// but expose nothing to method lookup.
#[derive(Debug, Default)]
pub struct ArchiveSolver {
    classes: HashSet<String>,
}

impl ArchiveSolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the class list of one archive. Returns the number of classes
    /// added.
    pub fn load(&mut self, path: &Path) -> Result<usize> {
        let file = File::open(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to open archive: {}", path.display()))?;
        let archive = ZipArchive::new(BufReader::new(file))
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read archive: {}", path.display()))?;

        let mut added = 0;
        for entry in archive.file_names() {
            if let Some(class_name) = entry_to_class_name(entry) {
                if self.classes.insert(class_name) {
                    added += 1;
                }
            }
        }

        debug!("Loaded {} classes from {}", added, path.display());
        Ok(added)
    }

    pub fn contains(&self, fqcn: &str) -> bool {
        self.classes.contains(fqcn)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// Map a zip entry name to a class name, dropping everything that is not a
/// nameable class: metadata entries, synthetic info files and anonymous
/// classes. Nested classes get their binary `$` turned into `.`.
fn entry_to_class_name(entry: &str) -> Option<String> {
    let path = entry.strip_suffix(".class")?;
    if entry.starts_with("META-INF/") {
        return None;
    }

    let file_name = path.rsplit('/').next().unwrap_or(path);
    if file_name == "module-info" || file_name == "package-info" {
        return None;
    }

    // Anonymous and local classes carry numeric `$` segments
    if file_name
        .split('$')
        .skip(1)
        .any(|segment| segment.chars().next().is_some_and(|c| c.is_ascii_digit()))
    {
        return None;
    }

    Some(path.replace('/', ".").replace('$', "."))
}

use crate::model::{GraphDocument, MethodDescriptor};
use miette::{IntoDiagnostic, Result, WrapErr};
use serde::Serialize;
use std::path::Path;

/// Serialize a value as pretty JSON, creating parent directories first.
fn write_pretty<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .into_diagnostic()
                .wrap_err_with(|| {
                    format!("Failed to create output directory: {}", parent.display())
                })?;
        }
    }

    let json = serde_json::to_string_pretty(value).into_diagnostic()?;
    std::fs::write(path, json)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to write {}", path.display()))
}

pub fn write_graph(document: &GraphDocument, path: &Path) -> Result<()> {
    write_pretty(document, path)
}

/// Missing-tests output: a flat array of method descriptors, one per
/// untested target.
pub fn write_missing_tests(missing: &[MethodDescriptor], path: &Path) -> Result<()> {
    write_pretty(&missing, path)
}

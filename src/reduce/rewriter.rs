use crate::parser::Span;
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Confirm};
use miette::{IntoDiagnostic, Result, WrapErr};
use std::fs;
use std::path::Path;

/// Rewrites test sources on a working copy. The original tree is never
/// touched: reduction runs against a full copy under the output directory.
pub struct SourceRewriter;

impl SourceRewriter {
    pub fn new() -> Self {
        Self
    }

    /// Clear and recreate the output directory, then copy the test tree into
    /// it. Returns false when the user declines to clear an existing
    /// directory.
    pub fn prepare_working_copy(
        &self,
        source: &Path,
        output: &Path,
        assume_yes: bool,
    ) -> Result<bool> {
        if output.exists() {
            if !assume_yes {
                let prompt = format!(
                    "Output directory {} will be cleared. Continue?",
                    output.display()
                );
                let confirmed = Confirm::with_theme(&ColorfulTheme::default())
                    .with_prompt(prompt)
                    .default(false)
                    .interact()
                    .into_diagnostic()?;
                if !confirmed {
                    println!("{}", "Aborted.".yellow());
                    return Ok(false);
                }
            }
            fs::remove_dir_all(output)
                .into_diagnostic()
                .wrap_err_with(|| {
                    format!("Failed to clear output directory: {}", output.display())
                })?;
        }
        fs::create_dir_all(output)
            .into_diagnostic()
            .wrap_err_with(|| {
                format!("Failed to create output directory: {}", output.display())
            })?;

        for entry in walkdir::WalkDir::new(source) {
            let entry = entry
                .into_diagnostic()
                .wrap_err_with(|| format!("Failed to walk test tree: {}", source.display()))?;
            // The output directory may nest inside the tree being copied
            if entry.path().starts_with(output) {
                continue;
            }
            let relative = entry.path().strip_prefix(source).into_diagnostic()?;
            let destination = output.join(relative);
            if entry.file_type().is_dir() {
                fs::create_dir_all(&destination).into_diagnostic()?;
            } else if entry.file_type().is_file() {
                fs::copy(entry.path(), &destination)
                    .into_diagnostic()
                    .wrap_err_with(|| format!("Failed to copy {}", entry.path().display()))?;
            }
        }
        Ok(true)
    }

    /// Cut the given byte ranges out of a file, back to front. Each cut takes
    /// the line's leading indentation and one trailing newline with it; all
    /// other text is preserved byte for byte.
    pub fn excise(&self, path: &Path, spans: &[Span]) -> Result<()> {
        let mut contents = fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read {}", path.display()))?;

        let mut spans = spans.to_vec();
        spans.sort_by(|a, b| b.start.cmp(&a.start));

        for span in spans {
            if span.end > contents.len() || span.start > span.end {
                return Err(miette::miette!("Invalid byte range in {}", path.display()));
            }
            let start = widen_to_indent(&contents, span.start);
            let end = consume_newline(&contents, span.end);
            contents.replace_range(start..end, "");
        }

        fs::write(path, contents)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to write {}", path.display()))
    }
}

impl Default for SourceRewriter {
    fn default() -> Self {
        Self::new()
    }
}

fn widen_to_indent(text: &str, mut start: usize) -> usize {
    let bytes = text.as_bytes();
    while start > 0 && matches!(bytes[start - 1], b' ' | b'\t') {
        start -= 1;
    }
    start
}

fn consume_newline(text: &str, end: usize) -> usize {
    let bytes = text.as_bytes();
    if bytes.get(end) == Some(&b'\r') && bytes.get(end + 1) == Some(&b'\n') {
        return end + 2;
    }
    if bytes.get(end) == Some(&b'\n') {
        return end + 1;
    }
    end
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::JavaParser;

    fn removal_spans(source: &str, names: &[&str]) -> Vec<Span> {
        let unit = JavaParser::new()
            .parse(Path::new("T.java"), source)
            .unwrap();
        let ty = &unit.types[0];
        names
            .iter()
            .map(|name| {
                ty.methods
                    .iter()
                    .find(|m| m.name == *name)
                    .unwrap()
                    .removal_span()
            })
            .collect()
    }

    #[test]
    fn test_excise_removes_whole_lines() {
        let source = "class T {\n    void a() {}\n    void b() {}\n}\n";
        let file = tempfile::NamedTempFile::new().unwrap();
        fs::write(file.path(), source).unwrap();

        let spans = removal_spans(source, &["a"]);
        SourceRewriter::new().excise(file.path(), &spans).unwrap();

        let rewritten = fs::read_to_string(file.path()).unwrap();
        assert_eq!(rewritten, "class T {\n    void b() {}\n}\n");
    }

    #[test]
    fn test_excise_multiple_spans_back_to_front() {
        let source = "class T {\n    void a() {}\n    void keep() {}\n    void b() {}\n}\n";
        let file = tempfile::NamedTempFile::new().unwrap();
        fs::write(file.path(), source).unwrap();

        let spans = removal_spans(source, &["a", "b"]);
        SourceRewriter::new().excise(file.path(), &spans).unwrap();

        let rewritten = fs::read_to_string(file.path()).unwrap();
        assert_eq!(rewritten, "class T {\n    void keep() {}\n}\n");
    }

    #[test]
    fn test_excise_takes_leading_comment() {
        let source = "class T {\n    /** docs */\n    void a() {}\n    void b() {}\n}\n";
        let file = tempfile::NamedTempFile::new().unwrap();
        fs::write(file.path(), source).unwrap();

        let spans = removal_spans(source, &["a"]);
        SourceRewriter::new().excise(file.path(), &spans).unwrap();

        let rewritten = fs::read_to_string(file.path()).unwrap();
        assert_eq!(rewritten, "class T {\n    void b() {}\n}\n");
    }

    #[test]
    fn test_excise_rejects_bad_range() {
        let file = tempfile::NamedTempFile::new().unwrap();
        fs::write(file.path(), "short").unwrap();

        let result = SourceRewriter::new().excise(file.path(), &[Span::new(0, 100)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_prepare_working_copy_clears_and_copies() {
        let source = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let output_dir = output.path().join("reduced");

        fs::create_dir_all(source.path().join("com/example")).unwrap();
        fs::write(source.path().join("com/example/ATest.java"), "class ATest {}").unwrap();

        let rewriter = SourceRewriter::new();
        assert!(rewriter
            .prepare_working_copy(source.path(), &output_dir, true)
            .unwrap());
        assert!(output_dir.join("com/example/ATest.java").exists());

        // stale files from a previous run disappear on the next one
        fs::write(output_dir.join("stale.java"), "class Stale {}").unwrap();
        assert!(rewriter
            .prepare_working_copy(source.path(), &output_dir, true)
            .unwrap());
        assert!(!output_dir.join("stale.java").exists());
        assert!(output_dir.join("com/example/ATest.java").exists());
    }
}

use miette::{IntoDiagnostic, Result, WrapErr};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for an analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Glob patterns excluded from file discovery
    pub exclude: Vec<String>,

    /// Regex marking test methods for the reducer; matched against the
    /// method name
    pub test_method_pattern: String,

    /// Classpath archives loaded in addition to the positional jar
    pub extra_archives: Vec<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            exclude: vec![
                "**/build/**".to_string(),
                "**/target/**".to_string(),
                "**/generated/**".to_string(),
                "**/.gradle/**".to_string(),
                "**/.idea/**".to_string(),
            ],
            test_method_pattern: "^test".to_string(),
            extra_archives: vec![],
        }
    }
}

impl Config {
    /// Load configuration from a file (YAML or TOML)
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        match extension {
            "yml" | "yaml" => serde_yaml::from_str(&contents)
                .into_diagnostic()
                .wrap_err("Failed to parse YAML config"),
            "toml" => toml::from_str(&contents)
                .into_diagnostic()
                .wrap_err("Failed to parse TOML config"),
            _ => {
                // Try YAML first, then TOML
                if let Ok(config) = serde_yaml::from_str(&contents) {
                    Ok(config)
                } else {
                    toml::from_str(&contents)
                        .into_diagnostic()
                        .wrap_err("Failed to parse config file")
                }
            }
        }
    }

    /// Try to load configuration from default locations
    pub fn from_default_locations(project_root: &Path) -> Result<Self> {
        let default_names = [
            ".collabcov.yml",
            ".collabcov.yaml",
            ".collabcov.toml",
            "collabcov.yml",
            "collabcov.yaml",
            "collabcov.toml",
        ];

        for name in &default_names {
            let path = project_root.join(name);
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        // No config file found, use defaults
        Ok(Self::default())
    }

    /// Check if a path matches an exclusion pattern
    pub fn should_exclude(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();
        self.exclude.iter().any(|pattern| glob_match(pattern, &path_str))
    }

    /// Compile the test-method pattern.
    pub fn test_pattern(&self) -> Result<Regex> {
        Regex::new(&self.test_method_pattern)
            .into_diagnostic()
            .wrap_err_with(|| {
                format!(
                    "Invalid test_method_pattern: {}",
                    self.test_method_pattern
                )
            })
    }
}

/// Simple glob matching for patterns like "*Test" or "**/build/**"
fn glob_match(pattern: &str, text: &str) -> bool {
    if pattern.starts_with('*') && !pattern.contains('/') {
        // Pattern like "*Test" matches "StoreTest"
        let suffix = &pattern[1..];
        return text.ends_with(suffix);
    }

    if pattern.ends_with('*') && !pattern.contains('/') {
        // Pattern like "Legacy*" matches "LegacyStore"
        let prefix = &pattern[..pattern.len() - 1];
        return text.starts_with(prefix);
    }

    if pattern.contains("**") {
        let cleaned = pattern.replace("**/", "").replace("/**", "");

        // "**/build/**" matches a complete directory segment, so
        // "/build/" matches but "/buildcache/" does not
        if pattern.starts_with("**/") && pattern.ends_with("/**") {
            let dir_name = cleaned.trim_matches('/');
            let dir_pattern = format!("/{}/", dir_name);
            return text.contains(&dir_pattern);
        }

        let parts: Vec<&str> = pattern.split("**").collect();
        if parts.len() == 2 {
            let prefix = parts[0].trim_end_matches('/');
            let suffix = parts[1].trim_start_matches('/');

            if prefix.is_empty() && suffix.is_empty() {
                return true;
            }
            if prefix.is_empty() {
                return text.ends_with(suffix) || text.contains(&format!("/{}", suffix));
            }
            if suffix.is_empty() {
                return text.starts_with(prefix) || text.contains(&format!("{}/", prefix));
            }
            return (text.starts_with(prefix) || text.contains(&format!("/{}/", prefix)))
                && (text.ends_with(suffix) || text.contains(&format!("/{}", suffix)));
        }
    }

    text == pattern
}

//! Configuration
//!
//! Reads `.errtriagerc.yaml`, `.errtriagerc.yml` or `.errtriagerc.json`
//! from the working directory or the nearest ancestor that has one.

use crate::domain::Locale;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file names, in lookup order
pub const CONFIG_FILE_NAMES: [&str; 3] = [
    ".errtriagerc.yaml",
    ".errtriagerc.yml",
    ".errtriagerc.json",
];

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Color mode options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

/// Output settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format
    pub format: OutputFormat,

    /// Color mode
    pub color: ColorMode,
}

/// Rule configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Rule ids removed from every domain
    pub disabled: Vec<String>,

    /// Extra rule files, relative to the config file
    pub files: Vec<PathBuf>,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default report locale
    pub locale: Locale,

    /// Output settings
    pub output: OutputConfig,

    /// Rule configuration
    pub rules: RulesConfig,

    /// Directory the config was loaded from
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

impl Config {
    /// Create default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        let mut config: Self = match ext {
            "yaml" | "yml" => serde_yaml::from_str(&content)?,
            "json" => serde_json::from_str(&content)?,
            _ => {
                return Err(ConfigError::Invalid(format!(
                    "Unknown config file format: {}",
                    ext
                )))
            }
        };

        config.base_dir = path.parent().map(Path::to_path_buf);
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Find the nearest config file, starting at `start` and walking up
    pub fn discover(start: &Path) -> Option<PathBuf> {
        start.ancestors().find_map(|dir| {
            CONFIG_FILE_NAMES
                .iter()
                .map(|name| dir.join(name))
                .find(|candidate| candidate.is_file())
        })
    }

    /// Load the nearest config file from the current directory, if any
    pub fn load_default() -> Result<Self, ConfigError> {
        let cwd = std::env::current_dir()?;
        match Self::discover(&cwd) {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    /// Rule file paths resolved against the config directory
    pub fn rule_files(&self) -> Vec<PathBuf> {
        self.rules
            .files
            .iter()
            .map(|file| match &self.base_dir {
                Some(base) if file.is_relative() => base.join(file),
                _ => file.clone(),
            })
            .collect()
    }

    /// Whether a rule id has been disabled
    pub fn is_disabled(&self, rule_id: &str) -> bool {
        self.rules.disabled.iter().any(|id| id == rule_id)
    }

    /// Merge another config into this one (other takes precedence)
    ///
    /// Rule files from both sides are resolved against their own config
    /// directory first. The merged paths are final, so `base_dir` is cleared
    /// and later calls to [`Config::rule_files`] return them unchanged.
    pub fn merge(&mut self, other: Self) {
        if other.locale != Locale::default() {
            self.locale = other.locale;
        }
        if other.output.format != OutputFormat::Text {
            self.output.format = other.output.format;
        }
        if other.output.color != ColorMode::Auto {
            self.output.color = other.output.color;
        }

        let mut files = self.rule_files();
        files.extend(other.rule_files());
        self.rules.files = files;
        self.rules.disabled.extend(other.rules.disabled);
        self.base_dir = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::new();
        assert_eq!(config.locale, Locale::En);
        assert_eq!(config.output.format, OutputFormat::Text);
        assert_eq!(config.output.color, ColorMode::Auto);
        assert!(config.rules.disabled.is_empty());
    }

    #[test]
    fn test_load_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".errtriagerc.yaml");
        fs::write(
            &path,
            "locale: zh\noutput:\n  format: json\n  color: never\nrules:\n  disabled: [deadlock]\n  files: [team.yaml]\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.locale, Locale::Zh);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.output.color, ColorMode::Never);
        assert!(config.is_disabled("deadlock"));
        assert!(!config.is_disabled("slow_query"));
        assert_eq!(config.rule_files(), vec![dir.path().join("team.yaml")]);
    }

    #[test]
    fn test_load_json_partial() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".errtriagerc.json");
        fs::write(&path, r#"{"rules": {"disabled": ["n_plus_one"]}}"#).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.locale, Locale::En);
        assert_eq!(config.rules.disabled, vec!["n_plus_one".to_string()]);
    }

    #[test]
    fn test_unknown_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");
        fs::write(&path, "x=1").unwrap();
        assert!(matches!(Config::load(&path), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_invalid_locale() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".errtriagerc.yaml");
        fs::write(&path, "locale: fr\n").unwrap();
        assert!(matches!(Config::load(&path), Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn test_discover_walks_up() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a/b/c");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join(".errtriagerc.yml"), "locale: zh\n").unwrap();

        let found = Config::discover(&nested).unwrap();
        assert_eq!(found, dir.path().join(".errtriagerc.yml"));
    }

    #[test]
    fn test_absolute_rule_file_kept() {
        let config = Config {
            rules: RulesConfig {
                files: vec![PathBuf::from("/etc/rules.yaml")],
                ..RulesConfig::default()
            },
            base_dir: Some(PathBuf::from("/home/me")),
            ..Config::default()
        };
        assert_eq!(config.rule_files(), vec![PathBuf::from("/etc/rules.yaml")]);
    }

    #[test]
    fn test_merge() {
        let mut base = Config::new();
        let other = Config {
            locale: Locale::Zh,
            output: OutputConfig {
                format: OutputFormat::Json,
                color: ColorMode::Never,
            },
            rules: RulesConfig {
                disabled: vec!["deadlock".to_string()],
                files: vec![],
            },
            base_dir: None,
        };
        base.merge(other);
        assert_eq!(base.locale, Locale::Zh);
        assert_eq!(base.output.format, OutputFormat::Json);
        assert_eq!(base.output.color, ColorMode::Never);
        assert!(base.is_disabled("deadlock"));
    }

    #[test]
    fn test_merge_keeps_rule_files_anchored() {
        let mut base = Config {
            rules: RulesConfig {
                files: vec![PathBuf::from("shared.yaml")],
                ..RulesConfig::default()
            },
            base_dir: Some(PathBuf::from("/repo")),
            ..Config::default()
        };
        let other = Config {
            rules: RulesConfig {
                files: vec![PathBuf::from("team.yaml")],
                ..RulesConfig::default()
            },
            base_dir: Some(PathBuf::from("/repo/service")),
            ..Config::default()
        };
        base.merge(other);
        assert_eq!(
            base.rule_files(),
            vec![
                PathBuf::from("/repo/shared.yaml"),
                PathBuf::from("/repo/service/team.yaml"),
            ]
        );
    }

    #[test]
    fn test_merge_relative_config_resolves_once() {
        let config = Config::load(Path::new("tests/fixtures/errtriage.yaml")).unwrap();
        let standalone = config.rule_files();
        assert_eq!(
            standalone,
            vec![
                PathBuf::from("tests/fixtures/custom_rules.yaml"),
                PathBuf::from("tests/fixtures/late_rules.json"),
            ]
        );

        let mut merged = Config::default();
        merged.merge(config);
        assert_eq!(merged.rule_files(), standalone);

        // merging again must not re-anchor already resolved paths
        merged.merge(Config::default());
        assert_eq!(merged.rule_files(), standalone);
        assert!(merged.rule_files().iter().all(|p| p.is_file()));
    }
}

//! Configuration file support for krm-lint

use crate::engine::ErrorPolicy;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Settings {
    #[serde(default)]
    pub defaults: Defaults,

    #[serde(default)]
    pub colors: Colors,

    #[serde(default)]
    pub ban_kinds: BanKindsSettings,

    #[serde(default)]
    pub sink: SinkSettings,
}

/// Output encoding of the resulting ResourceList
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

/// Default values for common operations
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Defaults {
    #[serde(default)]
    pub policy: ErrorPolicy,

    #[serde(default)]
    pub format: OutputFormat,
}

/// Color settings
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Colors {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// Ban list adjustments applied on top of the built-in list
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct BanKindsSettings {
    /// `Kind` for the core group or `group/Kind`
    #[serde(default)]
    pub extra_banned: Vec<String>,

    #[serde(default)]
    pub allowed: Vec<String>,
}

/// write-yaml settings
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct SinkSettings {
    #[serde(default)]
    pub overwrite: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Colors {
    fn default() -> Self {
        Self {
            enabled: default_true(),
        }
    }
}

impl Settings {
    /// Load settings from an explicit file, or from the standard locations.
    /// An explicit file must exist and parse; a discovered one that fails to
    /// parse is reported and replaced by defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from_file(path);
        }

        match Self::find_config_file() {
            Some(path) => Ok(Self::load_from_file(&path).unwrap_or_else(|e| {
                crate::log_warn!("Ignoring settings file: {:#}", e);
                Self::default()
            })),
            None => Ok(Self::default()),
        }
    }

    /// Load settings from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        crate::log_info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Find config file in standard locations
    /// Priority:
    /// 1. .krm-lint.toml in current directory
    /// 2. ~/.config/krm-lint/config.toml (XDG config directory)
    fn find_config_file() -> Option<PathBuf> {
        let local_config = PathBuf::from(".krm-lint.toml");
        if local_config.exists() {
            return Some(local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("krm-lint").join("config.toml");
            if xdg_config.exists() {
                return Some(xdg_config);
            }
        }

        None
    }

    /// Generate example config file content
    pub fn example_config() -> String {
        let header = "# krm-lint configuration file\n\
                      # Place this file at ~/.config/krm-lint/config.toml or .krm-lint.toml in your project\n\n";

        match toml::to_string_pretty(&Settings::default()) {
            Ok(config) => format!("{}{}", header, config),
            Err(_) => r#"# krm-lint configuration file
# Place this file at ~/.config/krm-lint/config.toml or .krm-lint.toml in your project

[defaults]
policy = "aggregate-all"  # Options: fail-fast, aggregate-all
format = "yaml"           # Options: yaml, json

[colors]
enabled = true

[ban_kinds]
# Entries are Kind (core group) or group/Kind
extra_banned = []
allowed = []

[sink]
overwrite = false
"#
            .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.defaults.policy, ErrorPolicy::AggregateAll);
        assert_eq!(settings.defaults.format, OutputFormat::Yaml);
        assert!(settings.colors.enabled);
        assert!(!settings.sink.overwrite);
    }

    #[test]
    fn test_settings_deserialization() {
        let toml_str = r#"
[defaults]
policy = "fail-fast"
format = "json"

[ban_kinds]
extra_banned = ["ConfigMap", "apps/DaemonSet"]
allowed = ["Secret"]
"#;
        let settings: Settings = toml::from_str(toml_str).unwrap();
        assert_eq!(settings.defaults.policy, ErrorPolicy::FailFast);
        assert_eq!(settings.defaults.format, OutputFormat::Json);
        assert_eq!(settings.ban_kinds.extra_banned.len(), 2);
        assert_eq!(settings.ban_kinds.allowed, vec!["Secret".to_string()]);
    }

    #[test]
    fn test_load_explicit_file() {
        let mut temp = tempfile::NamedTempFile::new().unwrap();
        temp.write_all(b"[sink]\noverwrite = true\n").unwrap();

        let settings = Settings::load(Some(temp.path())).unwrap();
        assert!(settings.sink.overwrite);
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        assert!(Settings::load(Some(Path::new("/definitely/not/here.toml"))).is_err());
    }

    #[test]
    fn test_example_config() {
        let example = Settings::example_config();
        assert!(example.contains("krm-lint configuration"));
        assert!(example.contains("[defaults]"));
        assert!(example.contains("[ban_kinds]"));
        assert!(example.contains("[sink]"));
    }
}

//! Configuration for the retention engine and match generator.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variable (CASE_RETENTION_CONFIG, a path to a config file)
//! 2. Config file (.case-retention/config.yaml, searched upward from the cwd)
//! 3. Config file in the home directory (~/.case-retention/config.yaml)
//! 4. Built-in defaults
//!
//! Every field in the file is optional; missing fields take their defaults.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::matching::DEFAULT_PAGE_SIZE;
use crate::retention::{Period, RetentionPolicySelector, RuleSettings};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "CASE_RETENTION_CONFIG";

const CONFIG_DIR: &str = ".case-retention";
const CONFIG_FILE: &str = "config.yaml";

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub retention: RuleSettings,
    #[serde(default)]
    pub matching: MatchSettings,
}

fn default_version() -> String {
    "1".to_string()
}

impl ConfigFile {
    /// Parse config from YAML content
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context("Failed to parse config YAML")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSettings {
    /// Results requested per lookup
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

/// A setting that cannot be used
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigViolation {
    #[error("statutory minimum '{value}' is not a period like 7Y0M0D")]
    InvalidStatutoryMinimum { value: String },

    #[error("statutory minimum must be longer than zero")]
    ZeroStatutoryMinimum,

    #[error("{field} must not be blank")]
    BlankPromptReference { field: &'static str },

    #[error("{field} must not be the nil UUID")]
    NilResultTypeId { field: &'static str },

    #[error("page size must be at least 1")]
    ZeroPageSize,
}

/// Resolved configuration
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResolvedConfig {
    pub retention: RuleSettings,
    pub matching: MatchSettings,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

impl ResolvedConfig {
    /// Check the settings before they are used
    pub fn validate(&self) -> Result<(), ConfigViolation> {
        let retention = &self.retention;

        let minimum: Period = retention.statutory_minimum.parse().map_err(|_| {
            ConfigViolation::InvalidStatutoryMinimum {
                value: retention.statutory_minimum.clone(),
            }
        })?;
        if minimum == Period::default() {
            return Err(ConfigViolation::ZeroStatutoryMinimum);
        }

        if retention.total_custodial_period_prompt.trim().is_empty() {
            return Err(ConfigViolation::BlankPromptReference {
                field: "total_custodial_period_prompt",
            });
        }
        if retention.life_prompt_references.iter().any(|r| r.trim().is_empty()) {
            return Err(ConfigViolation::BlankPromptReference {
                field: "life_prompt_references",
            });
        }

        if retention.custodial_result_type_id == Uuid::nil() {
            return Err(ConfigViolation::NilResultTypeId {
                field: "custodial_result_type_id",
            });
        }
        if retention.discharge_result_type_id == Uuid::nil() {
            return Err(ConfigViolation::NilResultTypeId {
                field: "discharge_result_type_id",
            });
        }

        if self.matching.page_size == 0 {
            return Err(ConfigViolation::ZeroPageSize);
        }

        Ok(())
    }

    /// Policy selector using these settings
    pub fn selector(&self) -> RetentionPolicySelector {
        RetentionPolicySelector::new(self.retention.clone())
    }
}

/// Find config file by searching `start` and its parents, then the home directory
fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_DIR).join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    dirs::home_dir()
        .map(|home| home.join(CONFIG_DIR).join(CONFIG_FILE))
        .filter(|path| path.exists())
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    ConfigFile::from_yaml(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve configuration from an explicit path or by discovery from `start`
pub fn load_config_from(explicit: Option<PathBuf>, start: &Path) -> Result<ResolvedConfig> {
    let config_file = match explicit {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            Some(path)
        }
        None => find_config_file(start),
    };

    let resolved = match config_file {
        Some(ref path) => {
            let file = load_config_file(path)?;
            ResolvedConfig {
                retention: file.retention,
                matching: file.matching,
                config_file: config_file.clone(),
            }
        }
        None => ResolvedConfig::default(),
    };

    resolved
        .validate()
        .with_context(|| match &resolved.config_file {
            Some(path) => format!("Invalid config file: {}", path.display()),
            None => "Invalid default configuration".to_string(),
        })?;

    Ok(resolved)
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let explicit = std::env::var(CONFIG_ENV).ok().map(PathBuf::from);
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    load_config_from(explicit, &cwd)
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| format!("{:#}", e)));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Force reload configuration (useful for testing)
pub fn reload_config() -> Result<ResolvedConfig> {
    load_config()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_config(dir: &Path, content: &str) -> PathBuf {
        let config_dir = dir.join(CONFIG_DIR);
        std::fs::create_dir_all(&config_dir).unwrap();
        let path = config_dir.join(CONFIG_FILE);
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "{}", content).unwrap();
        path
    }

    #[test]
    fn test_config_file_parsing() {
        let config = ConfigFile::from_yaml(
            r#"
version: "1"
retention:
  total_custodial_period_prompt: totalCustodialPeriod
  statutory_minimum: 6Y0M0D
  remittal_result_type_ids:
    - 5f3c2d10-8a9e-4b7c-9d1e-2f3a4b5c6d7e
matching:
  page_size: 10
"#,
        )
        .unwrap();

        assert_eq!(config.version, "1");
        assert_eq!(config.retention.statutory_minimum, "6Y0M0D");
        assert_eq!(config.retention.remittal_result_type_ids.len(), 1);
        assert_eq!(config.matching.page_size, 10);
        // Unspecified fields fall back to defaults
        assert_eq!(
            config.retention.discharge_result_type_id,
            RuleSettings::default().discharge_result_type_id
        );
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = ConfigFile::from_yaml("{}").unwrap();
        assert_eq!(config.retention, RuleSettings::default());
        assert_eq!(config.matching, MatchSettings::default());
    }

    #[test]
    fn test_discovers_config_in_parent_directory() {
        let temp = TempDir::new().unwrap();
        let path = write_config(temp.path(), "matching:\n  page_size: 40");
        let nested = temp.path().join("cases").join("2026");
        std::fs::create_dir_all(&nested).unwrap();

        let config = load_config_from(None, &nested).unwrap();
        assert_eq!(config.matching.page_size, 40);
        assert_eq!(config.config_file, Some(path));
    }

    #[test]
    fn test_explicit_path_must_exist() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope.yaml");
        assert!(load_config_from(Some(missing), temp.path()).is_err());
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = write_config(temp.path(), "retention:\n  statutory_minimum: seven years");
        let err = load_config_from(Some(path), temp.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("seven years"));
    }

    #[test]
    fn test_validate() {
        assert!(ResolvedConfig::default().validate().is_ok());

        let mut config = ResolvedConfig::default();
        config.matching.page_size = 0;
        assert_eq!(config.validate(), Err(ConfigViolation::ZeroPageSize));

        let mut config = ResolvedConfig::default();
        config.retention.statutory_minimum = "0Y0M0D".to_string();
        assert_eq!(config.validate(), Err(ConfigViolation::ZeroStatutoryMinimum));

        let mut config = ResolvedConfig::default();
        config.retention.custodial_result_type_id = Uuid::nil();
        assert_eq!(
            config.validate(),
            Err(ConfigViolation::NilResultTypeId {
                field: "custodial_result_type_id"
            })
        );

        let mut config = ResolvedConfig::default();
        config.retention.total_custodial_period_prompt = "  ".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigViolation::BlankPromptReference { .. })
        ));
    }
}

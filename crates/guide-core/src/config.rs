use crate::error::Result;
use crate::fetch::RetryPolicy;
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// FetchConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
    #[serde(default = "default_attempt_timeout_secs")]
    pub attempt_timeout_secs: u64,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_backoff_ms() -> u64 {
    300
}

fn default_attempt_timeout_secs() -> u64 {
    10
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_backoff_ms: default_initial_backoff_ms(),
            attempt_timeout_secs: default_attempt_timeout_secs(),
        }
    }
}

impl FetchConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            initial_backoff: Duration::from_millis(self.initial_backoff_ms),
            attempt_timeout: Duration::from_secs(self.attempt_timeout_secs),
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Published-CSV URL of the sheet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet_url: Option<String>,
    /// Detail page that takes the item id as `?id=`; used for share links.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default = "default_checklist_namespace")]
    pub checklist_namespace: String,
    #[serde(default = "default_recent_namespace")]
    pub recent_namespace: String,
    #[serde(default)]
    pub fetch: FetchConfig,
}

fn default_checklist_namespace() -> String {
    "guide-checklist".to_string()
}

fn default_recent_namespace() -> String {
    "guide-recent".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sheet_url: None,
            base_url: None,
            checklist_namespace: default_checklist_namespace(),
            recent_namespace: default_recent_namespace(),
            fetch: FetchConfig::default(),
        }
    }
}

impl Config {
    /// Load `.guide/config.yaml`, or defaults when the file does not exist.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        let config: Config = serde_yaml::from_str(&data)?;
        Ok(config)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())?;
        Ok(())
    }

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        match self.sheet_url.as_deref().map(str::trim) {
            None | Some("") => warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "sheet_url is not set; pass --url or --file".to_string(),
            }),
            Some(url) if reqwest::Url::parse(url).is_err() => warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!("sheet_url '{url}' is not a valid URL"),
            }),
            Some(_) => {}
        }

        if let Some(base) = &self.base_url {
            if reqwest::Url::parse(base).is_err() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("base_url '{base}' is not a valid URL"),
                });
            }
        }

        if self.fetch.max_attempts == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "fetch.max_attempts is 0; one attempt will still be made".to_string(),
            });
        }

        if self.checklist_namespace == self.recent_namespace {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "checklist_namespace and recent_namespace must differ".to_string(),
            });
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.fetch.retry_policy(), RetryPolicy::default());
    }

    #[test]
    fn config_roundtrip() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            sheet_url: Some("https://example.com/pub?output=csv".into()),
            ..Config::default()
        };
        config.save(dir.path()).unwrap();
        assert_eq!(Config::load(dir.path()).unwrap(), config);
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".guide")).unwrap();
        std::fs::write(
            dir.path().join(".guide/config.yaml"),
            "sheet_url: https://example.com/x.csv\nfetch:\n  max_attempts: 5\n",
        )
        .unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.fetch.max_attempts, 5);
        assert_eq!(config.fetch.initial_backoff_ms, 300);
        assert_eq!(config.checklist_namespace, "guide-checklist");
    }

    #[test]
    fn validate_flags_missing_url_and_namespace_clash() {
        let config = Config {
            recent_namespace: "guide-checklist".into(),
            ..Config::default()
        };
        let warnings = config.validate();
        assert!(warnings.iter().any(|w| w.message.contains("sheet_url")));
        assert!(warnings.iter().any(|w| w.level == WarnLevel::Error));
    }

    #[test]
    fn validate_accepts_good_config() {
        let config = Config {
            sheet_url: Some("https://example.com/x.csv".into()),
            base_url: Some("https://guide.example.com/detail.html".into()),
            ..Config::default()
        };
        assert!(config.validate().is_empty());
    }
}

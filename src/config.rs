use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const DEFAULT_MAX_REFINEMENT_PASSES: u32 = 5;
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 120;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("settings validation failed: {0}")]
    Validation(String),
    #[error("io error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("yaml error at {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_api_key_env() -> String {
    DEFAULT_API_KEY_ENV.to_string()
}

fn default_model() -> String {
    crate::roles::DEFAULT_MODEL.to_string()
}

fn default_max_refinement_passes() -> u32 {
    DEFAULT_MAX_REFINEMENT_PASSES
}

fn default_request_timeout_seconds() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECONDS
}

fn default_state_root() -> PathBuf {
    PathBuf::from(".postforge")
}

/// Static run configuration. Everything here is fixed at coordinator
/// construction; nothing is re-read mid-run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Settings {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Name of the environment variable holding the provider API key. The
    /// key itself never appears in settings files.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_refinement_passes")]
    pub max_refinement_passes: u32,
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,
    /// Root for diagnostics output (the coordinator log). Not article data.
    #[serde(default = "default_state_root")]
    pub state_root: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            api_key_env: default_api_key_env(),
            model: default_model(),
            max_refinement_passes: default_max_refinement_passes(),
            request_timeout_seconds: default_request_timeout_seconds(),
            state_root: default_state_root(),
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let settings: Settings =
            serde_yaml::from_str(&raw).map_err(|source| ConfigError::Yaml {
                path: path.display().to_string(),
                source,
            })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_base.trim().is_empty() {
            return Err(ConfigError::Validation(
                "api_base must be non-empty".to_string(),
            ));
        }
        if self.api_key_env.trim().is_empty() {
            return Err(ConfigError::Validation(
                "api_key_env must be non-empty".to_string(),
            ));
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::Validation("model must be non-empty".to_string()));
        }
        if self.max_refinement_passes == 0 {
            return Err(ConfigError::Validation(
                "max_refinement_passes must be at least 1".to_string(),
            ));
        }
        if self.request_timeout_seconds == 0 {
            return Err(ConfigError::Validation(
                "request_timeout_seconds must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        Settings::default().validate().expect("defaults are valid");
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let settings: Settings =
            serde_yaml::from_str("model: gemini-2.0-flash-exp\nmax_refinement_passes: 3\n")
                .expect("parse settings");
        assert_eq!(settings.max_refinement_passes, 3);
        assert_eq!(settings.api_base, DEFAULT_API_BASE);
        assert_eq!(settings.api_key_env, DEFAULT_API_KEY_ENV);
        assert_eq!(settings.request_timeout_seconds, DEFAULT_REQUEST_TIMEOUT_SECONDS);
    }

    #[test]
    fn zero_pass_cap_is_rejected() {
        let settings = Settings {
            max_refinement_passes: 0,
            ..Settings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn blank_model_is_rejected() {
        let settings = Settings {
            model: "  ".to_string(),
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }
}

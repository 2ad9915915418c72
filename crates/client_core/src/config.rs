use std::fs;

use serde::Deserialize;
use tracing::warn;
use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const SETTINGS_FILE: &str = "churn.toml";

const API_BASE_URL_ENV_KEYS: [&str; 2] = ["API_BASE_URL", "APP__API_BASE_URL"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_base_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    api_base_url: Option<String>,
}

impl Settings {
    /// Applies a command-line override when one was given and is non-blank.
    pub fn with_api_base_url(mut self, api_base_url: Option<String>) -> Self {
        if let Some(v) = api_base_url.filter(|v| !v.trim().is_empty()) {
            self.api_base_url = v;
        }
        self
    }
}

/// Resolves settings from `churn.toml` in the working directory and the
/// process environment.
pub fn load_settings() -> Settings {
    let file_raw = fs::read_to_string(SETTINGS_FILE).ok();
    settings_from_sources(file_raw.as_deref(), |key| std::env::var(key).ok())
}

/// Layers defaults, then the settings file, then environment variables.
/// Later `APP__` keys win over the bare ones.
pub fn settings_from_sources(
    file_raw: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Settings {
    let mut settings = Settings::default();

    if let Some(raw) = file_raw {
        match toml::from_str::<FileSettings>(raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.api_base_url.filter(|v| !v.trim().is_empty()) {
                    settings.api_base_url = v;
                }
            }
            Err(err) => warn!(error = %err, file = SETTINGS_FILE, "ignoring unreadable settings file"),
        }
    }

    for key in API_BASE_URL_ENV_KEYS {
        if let Some(v) = env(key).filter(|v| !v.trim().is_empty()) {
            settings.api_base_url = v;
        }
    }

    settings
}

/// Validates a base url and strips trailing slashes so endpoint paths can be
/// appended directly.
pub fn prepare_base_url(raw_base_url: &str) -> Result<String, ConfigError> {
    let trimmed = raw_base_url.trim();
    let invalid = |reason: &str| ConfigError::InvalidBaseUrl {
        url: raw_base_url.to_string(),
        reason: reason.to_string(),
    };

    let parsed = Url::parse(trimmed).map_err(|err| invalid(&err.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if parsed.host_str().is_none() {
        return Err(invalid("missing host"));
    }
    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(invalid("query strings and fragments are not supported"));
    }

    Ok(trimmed.trim_end_matches('/').to_string())
}

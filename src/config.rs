//! Runtime configuration for the Gemini backend.
//!
//! Settings come from an optional YAML file and are then overridden by any
//! command-line flags. Every field has a default, so an empty (or absent)
//! file is valid.
//!
//! ```yaml
//! model: gemini-2.5-flash
//! api_base: https://generativelanguage.googleapis.com
//! request_timeout_secs: 120
//! ```

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::time::Duration;
use tracing::{info, instrument};
use url::Url;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Model name used for both generation and translation.
    pub model: String,
    /// Scheme and host (optionally a path prefix) of the Gemini REST API.
    pub api_base: String,
    /// Per-request timeout; generation of ten long articles is slow.
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            request_timeout_secs: 120,
        }
    }
}

impl Config {
    /// Apply command-line overrides on top of file values.
    pub fn with_overrides(mut self, model: Option<String>, api_base: Option<String>) -> Self {
        if let Some(model) = model {
            self.model = model;
        }
        if let Some(api_base) = api_base {
            self.api_base = api_base;
        }
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// The `generateContent` URL for the configured model.
    ///
    /// # Errors
    ///
    /// Returns an error if `api_base` is not an absolute http(s) URL or the
    /// model name is empty.
    pub fn endpoint(&self) -> Result<Url, Box<dyn Error>> {
        if self.model.trim().is_empty() {
            return Err("model name must not be empty".into());
        }
        let mut base = Url::parse(&self.api_base)?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(format!("unsupported api_base scheme: {}", base.scheme()).into());
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(base.join(&format!("v1beta/models/{}:generateContent", self.model.trim()))?)
    }
}

/// Load configuration from a YAML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid YAML for [`Config`].
#[instrument(level = "info")]
pub fn load_config(path: &str) -> Result<Config, Box<dyn Error>> {
    let raw = std::fs::read_to_string(path)?;
    let config: Config = if raw.trim().is_empty() {
        Config::default()
    } else {
        serde_yaml::from_str(&raw)?
    };
    info!(model = %config.model, api_base = %config.api_base, "Loaded configuration");
    Ok(config)
}

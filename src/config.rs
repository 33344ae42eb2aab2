//! Analysis service configuration, built once at startup and passed to the client.
//!
//! Values are layered: an optional YAML file, then `GEMINI_*` environment
//! variables, then command-line flags. A key that is missing, blank, or still
//! the template placeholder leaves the service unconfigured, in which case
//! every AI-backed operation answers with its fallback value.

use std::{env, fmt, fs, path::Path, time::Duration};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::cli::AiArgs;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-exp";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const API_KEY_ENV: &str = "GEMINI_API_KEY";
const MODEL_ENV: &str = "GEMINI_MODEL";
const ENDPOINT_ENV: &str = "GEMINI_ENDPOINT";
const PLACEHOLDER_KEYS: &[&str] = &["your_gemini_api_key", "your-gemini-api-key"];

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    api_key: Option<String>,
    model: Option<String>,
    endpoint: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Clone, PartialEq)]
pub struct AnalysisConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub timeout: Duration,
    pub configured: bool,
}

impl AnalysisConfig {
    pub fn new(api_key: Option<String>) -> Self {
        let configured = api_key.as_deref().is_some_and(key_is_usable);
        Self {
            api_key,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            configured,
        }
    }

    pub fn offline() -> Self {
        Self::new(None)
    }

    pub fn from_args(args: &AiArgs) -> Result<Self> {
        let file = match &args.config {
            Some(path) => load_file(path)?,
            None => ConfigFile::default(),
        };
        Ok(Self::layered(args, file, |name| env::var(name).ok()))
    }

    /// Flags win over the environment, which wins over the file.
    fn layered(args: &AiArgs, file: ConfigFile, env: impl Fn(&str) -> Option<String>) -> Self {
        let api_key = args
            .api_key
            .clone()
            .or_else(|| env(API_KEY_ENV))
            .or(file.api_key);
        let mut config = Self::new(api_key);
        if let Some(model) = args.model.clone().or_else(|| env(MODEL_ENV)).or(file.model) {
            config.model = model;
        }
        if let Some(endpoint) = env(ENDPOINT_ENV).or(file.endpoint) {
            config.endpoint = endpoint;
        }
        if let Some(secs) = file.timeout_secs {
            config.timeout = Duration::from_secs(secs);
        }
        if args.offline {
            config.configured = false;
        }
        config
    }
}

impl fmt::Debug for AnalysisConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .field("configured", &self.configured)
            .finish()
    }
}

fn key_is_usable(key: &str) -> bool {
    let trimmed = key.trim();
    !trimmed.is_empty()
        && !PLACEHOLDER_KEYS
            .iter()
            .any(|placeholder| trimmed.eq_ignore_ascii_case(placeholder))
}

fn load_file(path: &Path) -> Result<ConfigFile> {
    let raw = fs::read_to_string(path).with_context(|| format!("Opening config file {path:?}"))?;
    serde_yaml::from_str(&raw).with_context(|| format!("Parsing config file {path:?}"))
}

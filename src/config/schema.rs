use crate::error::ConfigError;
use crate::governance::policy::{
    DEFAULT_BLOCKED_TOPICS, DEFAULT_MAX_RETRIES, DEFAULT_MIN_WORDS, DEFAULT_PASSING_SCORE,
    DEFAULT_REQUIRED_MARKERS,
};
use anyhow::{Context, Result};
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_DIR_NAME: &str = ".editorial-governor";

// ── Top-level config ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Workspace directory - computed from home, not serialized
    #[serde(skip)]
    pub workspace_dir: PathBuf,
    /// Path to config.toml - computed from home, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,
    pub api_key: Option<String>,
    pub default_provider: Option<String>,
    pub default_model: Option<String>,
    pub default_temperature: f64,

    #[serde(default)]
    pub governance: GovernanceConfig,

    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub reliability: ReliabilityConfig,

    #[serde(default)]
    pub sinks: SinkConfig,
}

// ── Governance constants ─────────────────────────────────────────

/// Deployment policy for the governance loop. Read once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GovernanceConfig {
    /// Iteration budget per run (default: 3)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Minimum weighted score to publish (default: 7.0)
    #[serde(default = "default_passing_score")]
    pub passing_score: f64,
    /// Minimum whitespace-delimited tokens in a draft (default: 300)
    #[serde(default = "default_min_words")]
    pub min_words: usize,
    /// Case-insensitive substrings every draft must contain
    #[serde(default = "default_required_markers")]
    pub required_markers: Vec<String>,
    /// Case-insensitive substrings that block a topic outright
    #[serde(default = "default_blocked_topics")]
    pub blocked_topics: Vec<String>,
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

fn default_passing_score() -> f64 {
    DEFAULT_PASSING_SCORE
}

fn default_min_words() -> usize {
    DEFAULT_MIN_WORDS
}

fn default_required_markers() -> Vec<String> {
    DEFAULT_REQUIRED_MARKERS.iter().map(ToString::to_string).collect()
}

fn default_blocked_topics() -> Vec<String> {
    DEFAULT_BLOCKED_TOPICS.iter().map(ToString::to_string).collect()
}

impl Default for GovernanceConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            passing_score: default_passing_score(),
            min_words: default_min_words(),
            required_markers: default_required_markers(),
            blocked_topics: default_blocked_topics(),
        }
    }
}

impl GovernanceConfig {
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.max_retries == 0 {
            return Err(ConfigError::Validation(
                "governance.max_retries must be at least 1".into(),
            ));
        }
        if !(1.0..=10.0).contains(&self.passing_score) {
            return Err(ConfigError::Validation(format!(
                "governance.passing_score {} outside 1.0..=10.0",
                self.passing_score
            )));
        }
        if self.required_markers.is_empty() {
            return Err(ConfigError::Validation(
                "governance.required_markers must name at least one marker".into(),
            ));
        }
        if self.required_markers.iter().any(|m| m.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "governance.required_markers contains an empty marker".into(),
            ));
        }
        if self.blocked_topics.iter().any(|t| t.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "governance.blocked_topics contains an empty term".into(),
            ));
        }
        Ok(())
    }
}

// ── Generation backend ───────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Upper bound on a single draft/critique/refine call (default: 120s)
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Override the provider's base URL (self-hosted gateways, Ollama host)
    #[serde(default)]
    pub base_url: Option<String>,
    /// Temperature for the critique persona; falls back to `default_temperature`
    #[serde(default)]
    pub critique_temperature: Option<f64>,
}

fn default_request_timeout_secs() -> u64 {
    120
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout_secs(),
            base_url: None,
            critique_temperature: None,
        }
    }
}

// ── Provider reliability ─────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReliabilityConfig {
    /// Retries per provider before failing over.
    #[serde(default = "default_provider_retries")]
    pub provider_retries: u32,
    /// Base backoff (ms) for provider retry delay.
    #[serde(default = "default_provider_backoff_ms")]
    pub provider_backoff_ms: u64,
    /// Fallback provider chain (e.g. `["openai", "ollama"]`).
    #[serde(default)]
    pub fallback_providers: Vec<String>,
}

fn default_provider_retries() -> u32 {
    2
}

fn default_provider_backoff_ms() -> u64 {
    500
}

impl Default for ReliabilityConfig {
    fn default() -> Self {
        Self {
            provider_retries: default_provider_retries(),
            provider_backoff_ms: default_provider_backoff_ms(),
            fallback_providers: Vec::new(),
        }
    }
}

// ── Terminal-action sinks ────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SinkConfig {
    /// "log" (default), "file" or "memory"
    #[serde(default = "default_sink_backend")]
    pub backend: String,
    /// Directory for published drafts and `escalations.jsonl` (file sink only).
    /// Defaults to `<workspace>/published`.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

fn default_sink_backend() -> String {
    "log".into()
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            backend: default_sink_backend(),
            output_dir: None,
        }
    }
}

// ── Config impl ──────────────────────────────────────────────────

impl Default for Config {
    fn default() -> Self {
        let home =
            UserDirs::new().map_or_else(|| PathBuf::from("."), |u| u.home_dir().to_path_buf());
        let config_dir = home.join(CONFIG_DIR_NAME);

        Self {
            workspace_dir: config_dir.join("workspace"),
            config_path: config_dir.join("config.toml"),
            api_key: None,
            default_provider: Some("openrouter".to_string()),
            default_model: Some("openai/gpt-4o".to_string()),
            default_temperature: 0.7,
            governance: GovernanceConfig::default(),
            backend: BackendConfig::default(),
            reliability: ReliabilityConfig::default(),
            sinks: SinkConfig::default(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        self.governance.validate()?;
        if !(0.0..=2.0).contains(&self.default_temperature) {
            anyhow::bail!(ConfigError::Validation(format!(
                "default_temperature {} outside 0.0..=2.0",
                self.default_temperature
            )));
        }
        if self.backend.request_timeout_secs == 0 {
            anyhow::bail!(ConfigError::Validation(
                "backend.request_timeout_secs must be at least 1".into()
            ));
        }
        Ok(())
    }

    /// Directory the file sink writes into.
    pub fn sink_output_dir(&self) -> PathBuf {
        self.sinks
            .output_dir
            .clone()
            .unwrap_or_else(|| self.workspace_dir.join("published"))
    }

    pub fn load_or_init() -> Result<Self> {
        let home = UserDirs::new()
            .map(|u| u.home_dir().to_path_buf())
            .context("Could not find home directory")?;
        Self::load_or_init_in(&home.join(CONFIG_DIR_NAME))
    }

    /// Load `config.toml` from `config_dir`, writing defaults when absent.
    pub fn load_or_init_in(config_dir: &Path) -> Result<Self> {
        let config_path = config_dir.join("config.toml");
        let workspace_dir = config_dir.join("workspace");

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).context("Failed to create config directory")?;
        }
        if !workspace_dir.exists() {
            fs::create_dir_all(&workspace_dir).context("Failed to create workspace directory")?;
        }

        if config_path.exists() {
            let contents =
                fs::read_to_string(&config_path).context("Failed to read config file")?;
            let mut config: Config =
                toml::from_str(&contents).context("Failed to parse config file")?;
            // Set computed paths that are skipped during serialization
            config.config_path = config_path;
            config.workspace_dir = workspace_dir;
            config.validate()?;
            Ok(config)
        } else {
            let config = Self {
                config_path,
                workspace_dir,
                ..Self::default()
            };
            config.validate()?;
            config.save()?;
            Ok(config)
        }
    }

    /// Apply environment variable overrides to config
    pub fn apply_env_overrides(&mut self) {
        // API Key: EDITORIAL_GOVERNOR_API_KEY or API_KEY
        if let Ok(key) =
            std::env::var("EDITORIAL_GOVERNOR_API_KEY").or_else(|_| std::env::var("API_KEY"))
            && !key.is_empty()
        {
            self.api_key = Some(key);
        }

        if let Ok(provider) = std::env::var("EDITORIAL_GOVERNOR_PROVIDER")
            && !provider.is_empty()
        {
            self.default_provider = Some(provider);
        }

        if let Ok(model) = std::env::var("EDITORIAL_GOVERNOR_MODEL")
            && !model.is_empty()
        {
            self.default_model = Some(model);
        }

        if let Ok(temp_str) = std::env::var("EDITORIAL_GOVERNOR_TEMPERATURE")
            && let Ok(temp) = temp_str.parse::<f64>()
            && (0.0..=2.0).contains(&temp)
        {
            self.default_temperature = temp;
        }

        if let Ok(dir) = std::env::var("EDITORIAL_GOVERNOR_OUTPUT_DIR")
            && !dir.is_empty()
        {
            self.sinks.output_dir = Some(PathBuf::from(dir));
        }
    }

    pub fn save(&self) -> Result<()> {
        let toml_str = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&self.config_path, toml_str).context("Failed to write config file")?;
        Ok(())
    }
}

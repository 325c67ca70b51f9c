//! Configuration for redsift.
//!
//! Loaded from YAML with a fallback chain:
//! 1. Explicit path if provided
//! 2. .redsift.yml in current directory
//! 3. ~/.config/redsift/redsift.yml
//! 4. Defaults

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// LLM model and sampling settings.
    pub llm: LlmSettings,

    /// Analysis run parameters.
    pub analysis: AnalysisSettings,

    /// Reddit collection settings.
    pub reddit: RedditSettings,

    /// Prompt template location.
    pub prompts: PromptSettings,
}

impl Config {
    /// Load configuration with the fallback chain.
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path)
                .context(format!("Failed to load config from {}", path.display()));
        }

        let project_config = PathBuf::from(".redsift.yml");
        if project_config.exists() {
            match Self::load_from_file(&project_config) {
                Ok(config) => {
                    log::info!("Loaded config from .redsift.yml");
                    return Ok(config);
                }
                Err(e) => {
                    log::warn!("Failed to load .redsift.yml: {}", e);
                }
            }
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("redsift").join("redsift.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => {
                        log::info!("Loaded config from {}", user_config.display());
                        return Ok(config);
                    }
                    Err(e) => {
                        log::warn!("Failed to load {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.analysis.num_top_posts == 0 {
            eyre::bail!("analysis.num_top_posts must be >= 1");
        }
        if self.analysis.rate_limit_per_second <= 0.0 {
            eyre::bail!("analysis.rate_limit_per_second must be > 0");
        }
        if self.analysis.max_retries == 0 {
            eyre::bail!("analysis.max_retries must be >= 1");
        }
        if self.analysis.base_delay_secs <= 0.0 {
            eyre::bail!("analysis.base_delay_secs must be > 0");
        }
        if self.llm.max_tokens == 0 {
            eyre::bail!("llm.max_tokens must be > 0");
        }
        Ok(())
    }
}

/// LLM model and sampling settings, forwarded to the API untouched.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LlmSettings {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: u32,
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: "claude-3-5-haiku-20241022".to_string(),
            max_tokens: 4096,
            temperature: 0.3,
            top_p: 0.999,
            top_k: 250,
            timeout_secs: 300,
        }
    }
}

/// Analysis run parameters.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// How many top-scoring posts form the corpus
    pub num_top_posts: usize,

    /// Comments below this score are dropped
    pub min_comment_score: i64,

    /// Outbound LLM calls per second
    pub rate_limit_per_second: f64,

    /// Attempt budget per task
    pub max_retries: u32,

    /// Backoff base delay in seconds
    pub base_delay_secs: f64,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            num_top_posts: 10,
            min_comment_score: 1,
            rate_limit_per_second: 0.5,
            max_retries: 3,
            base_delay_secs: 2.0,
        }
    }
}

/// Reddit collection settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RedditSettings {
    /// User-Agent sent to Reddit
    pub user_agent: String,

    /// Maximum posts per listing request
    pub search_limit: u32,
}

impl Default for RedditSettings {
    fn default() -> Self {
        Self {
            user_agent: "redsift/0.1 (corpus collection)".to_string(),
            search_limit: 100,
        }
    }
}

/// Prompt template location.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PromptSettings {
    pub templates_dir: PathBuf,
}

impl Default for PromptSettings {
    fn default() -> Self {
        Self {
            templates_dir: PathBuf::from("prompts"),
        }
    }
}

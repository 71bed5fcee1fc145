use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::llm::{LLMConfig, LLMProvider};
use crate::youtube::DEFAULT_MAX_RESULTS;

/// Configuration for the course generator service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server settings
    pub server: ServerConfig,

    /// Generative-text provider settings
    pub llm: LLMConfig,

    /// Video search settings
    pub youtube: YouTubeConfig,

    /// Web search settings for the reading-content feature
    pub web_search: WebSearchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind the orchestration endpoint to
    pub host: String,

    /// Port to listen on
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YouTubeConfig {
    /// YouTube Data API key
    pub api_key: Option<String>,

    /// Result cap for topic-level searches (per-lesson searches use 1)
    pub max_results: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSearchConfig {
    /// Google Custom Search API key
    pub api_key: Option<String>,

    /// Custom Search engine id (cx)
    pub engine_id: Option<String>,

    /// Number of search results to consider per query
    pub result_count: u32,

    /// Timeout for fetching candidate pages (seconds)
    pub fetch_timeout_seconds: u64,
}

impl Config {
    /// Load configuration from the usual file locations, falling back to
    /// defaults. Credentials from the environment override either way.
    pub fn load() -> Result<Self> {
        let config_paths = [
            "course-generator.toml",
            "config/course-generator.toml",
            "/etc/course-generator/config.toml",
        ];

        for path in &config_paths {
            if let Ok(config_str) = std::fs::read_to_string(path) {
                match toml::from_str::<Config>(&config_str) {
                    Ok(config) => {
                        tracing::info!("📄 Loaded configuration from: {}", path);
                        return Ok(config.with_env_overrides());
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse config file {}: {}", path, e);
                    }
                }
            }
        }

        Ok(Self::default().with_env_overrides())
    }

    /// Load configuration from an explicit file path
    pub fn load_from(path: &str) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Cannot read config file {}: {}", path, e))?;
        let config: Config = toml::from_str(&config_str)?;
        tracing::info!("📄 Loaded configuration from: {}", path);
        Ok(config.with_env_overrides())
    }

    /// Overlay credentials and server settings from environment variables
    fn with_env_overrides(mut self) -> Self {
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            if self.llm.provider == LLMProvider::Gemini {
                self.llm.api_key = Some(key);
            }
        }

        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            if self.llm.provider == LLMProvider::OpenAI {
                self.llm.api_key = Some(key);
            }
        }

        if let Ok(key) = std::env::var("YOUTUBE_API_KEY") {
            self.youtube.api_key = Some(key);
        }

        if let Ok(key) = std::env::var("GOOGLE_CSE_API_KEY") {
            self.web_search.api_key = Some(key);
        }

        if let Ok(engine_id) = std::env::var("GOOGLE_CSE_CX") {
            self.web_search.engine_id = Some(engine_id);
        }

        if let Ok(port) = std::env::var("COURSEGEN_PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.llm.api_key.is_none() {
            return Err(anyhow!(
                "LLM API key required (set GEMINI_API_KEY or OPENAI_API_KEY)"
            ));
        }

        if self.youtube.api_key.is_none() {
            return Err(anyhow!("YouTube API key required (set YOUTUBE_API_KEY)"));
        }

        if self.youtube.max_results == 0 {
            return Err(anyhow!("youtube.max_results must be greater than 0"));
        }

        // The reading-content feature is optional, but half a credential pair
        // is a misconfiguration rather than an opt-out.
        if self.web_search.api_key.is_some() != self.web_search.engine_id.is_some() {
            return Err(anyhow!(
                "Web search requires both GOOGLE_CSE_API_KEY and GOOGLE_CSE_CX"
            ));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8000,
            },
            llm: LLMConfig::default(),
            youtube: YouTubeConfig {
                api_key: None,
                max_results: DEFAULT_MAX_RESULTS,
            },
            web_search: WebSearchConfig {
                api_key: None,
                engine_id: None,
                result_count: 5,
                fetch_timeout_seconds: 10,
            },
        }
    }
}

/// Configuration builder for programmatic config creation
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.config.server.port = port;
        self
    }

    pub fn with_llm_provider(mut self, provider: LLMProvider) -> Self {
        self.config.llm.provider = provider;
        self
    }

    pub fn with_llm_api_key(mut self, api_key: String) -> Self {
        self.config.llm.api_key = Some(api_key);
        self
    }

    pub fn with_youtube_api_key(mut self, api_key: String) -> Self {
        self.config.youtube.api_key = Some(api_key);
        self
    }

    pub fn with_web_search(mut self, api_key: String, engine_id: String) -> Self {
        self.config.web_search.api_key = Some(api_key);
        self.config.web_search.engine_id = Some(engine_id);
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

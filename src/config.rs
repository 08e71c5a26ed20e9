use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

const DEFAULT_NEWS_QUERY: &str = "climate change OR global warming OR carbon emissions OR renewable energy OR green energy OR deforestation OR climate crisis OR air pollution OR eco-friendly OR climate policy OR heatwaves OR climate innovation";

/// Main configuration structure loaded from gaia.toml and environment variables
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub generation: GenerationConfig,
    pub news: NewsConfig,
    #[serde(skip)]
    pub runtime: RuntimeConfig,
}

/// HTTP surface and session settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    /// Where `/logout` sends the browser
    pub logout_url: String,
    /// Upper bound on concurrently tracked sessions (least recently used are evicted)
    pub session_cache_max: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8501)),
            logout_url: "https://gaia-flask.onrender.com/logout".to_string(),
            session_cache_max: 1024,
        }
    }
}

/// Text generation backend
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub model: String,
    pub base_url: String,
    pub timeout_ms: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: "gemini-1.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout_ms: 30_000,
        }
    }
}

/// News search backend and paging
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NewsConfig {
    pub base_url: String,
    pub query: String,
    pub page_size: u32,
    pub language: String,
    pub sort_by: String,
    pub timeout_ms: u64,
    /// Articles shown before the user asks for more
    pub initial_visible: usize,
    /// Articles added per "load more"
    pub page_step: usize,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://newsapi.org/v2".to_string(),
            query: DEFAULT_NEWS_QUERY.to_string(),
            page_size: 100,
            language: "en".to_string(),
            sort_by: "publishedAt".to_string(),
            timeout_ms: 15_000,
            initial_visible: 5,
            page_step: 5,
        }
    }
}

/// Log filter used when `RUST_LOG` is unset
pub const DEFAULT_LOG_LEVEL: &str = "gaia=info,tower_http=info";

/// Runtime configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub gemini_api_key: Option<String>,
    pub news_api_key: Option<String>,
    pub log_level: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            news_api_key: None,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl RuntimeConfig {
    /// Load runtime configuration from environment variables
    pub fn load_from_env() -> Self {
        Self {
            gemini_api_key: std::env::var("GEMINI_API_KEY").ok(),
            news_api_key: std::env::var("NEWS_API_KEY").ok(),
            log_level: Self::log_level_from_env(),
        }
    }

    /// `RUST_LOG`, or the service default when unset.
    pub fn log_level_from_env() -> String {
        std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
    }
}

impl Config {
    /// Load `.env` files into the process environment. Existing variables win.
    /// Lookup order:
    /// 1) GAIA_ENV_FILE if set
    /// 2) ./.env
    /// 3) ../.env when the API keys are still missing
    pub fn load_env_files() {
        if let Ok(env_path) = std::env::var("GAIA_ENV_FILE") {
            let _ = dotenvy::from_path(env_path);
        } else {
            let _ = dotenvy::from_path(".env");
            let core_present =
                std::env::var("GEMINI_API_KEY").is_ok() || std::env::var("NEWS_API_KEY").is_ok();
            if !core_present {
                let _ = dotenvy::from_path("../.env");
            }
        }
    }

    /// Read a TOML config file, falling back to defaults when it does not exist.
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(toml::from_str(&content)?),
            Err(_) => {
                tracing::warn!("Config file {} not found, using defaults", path);
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from TOML file and environment variables
    /// Uses GAIA_CONFIG environment variable or defaults to "gaia.toml"
    pub fn load() -> anyhow::Result<Self> {
        Self::load_env_files();

        let config_path =
            std::env::var("GAIA_CONFIG").unwrap_or_else(|_| "gaia.toml".to_string());
        let mut config = Self::from_file(&config_path)?;

        config.apply_env_overrides();
        config.runtime = RuntimeConfig::load_from_env();

        if config.runtime.gemini_api_key.is_none() {
            tracing::warn!("GEMINI_API_KEY is not set; advice will use the built-in rules");
        }
        if config.runtime.news_api_key.is_none() {
            tracing::warn!("NEWS_API_KEY is not set; the news page will show a fetch error");
        }

        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("GAIA_HTTP_BIND") {
            match v.parse::<SocketAddr>() {
                Ok(bind) => {
                    self.server.bind = bind;
                    tracing::debug!("GAIA_HTTP_BIND env override applied");
                }
                Err(_) => tracing::warn!("Ignoring unparseable GAIA_HTTP_BIND '{}'", v),
            }
        }
        if let Ok(url) = std::env::var("GAIA_LOGOUT_URL") {
            self.server.logout_url = url;
        }
        if let Ok(model) = std::env::var("GEMINI_MODEL") {
            self.generation.model = model;
        }
        if let Some(timeout) = std::env::var("GEMINI_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            self.generation.timeout_ms = timeout;
        }
        if let Some(timeout) = std::env::var("NEWS_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            self.news.timeout_ms = timeout;
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.session_cache_max == 0 {
            anyhow::bail!("server.session_cache_max must be at least 1");
        }
        if self.generation.model.trim().is_empty() {
            anyhow::bail!("generation.model must not be empty");
        }
        if self.generation.timeout_ms == 0 || self.news.timeout_ms == 0 {
            anyhow::bail!("backend timeouts must be greater than 0ms");
        }
        if !(1..=100).contains(&self.news.page_size) {
            anyhow::bail!("news.page_size must be between 1 and 100");
        }
        if self.news.initial_visible == 0 || self.news.page_step == 0 {
            anyhow::bail!("news.initial_visible and news.page_step must be at least 1");
        }
        for (name, url) in [
            ("generation.base_url", &self.generation.base_url),
            ("news.base_url", &self.news.base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                anyhow::bail!("{} must start with http:// or https://, got '{}'", name, url);
            }
        }
        Ok(())
    }
}

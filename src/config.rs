use std::env;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Language every generated palette name, description and color name is
/// written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayLanguage {
    #[default]
    Spanish,
    English,
}

impl DisplayLanguage {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "es" | "spanish" | "español" => Some(DisplayLanguage::Spanish),
            "en" | "english" => Some(DisplayLanguage::English),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DisplayLanguage::Spanish => "Spanish",
            DisplayLanguage::English => "English",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl ProviderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// `API_KEY` wins over `GEMINI_API_KEY`. Empty values count as unset.
    pub fn from_env() -> Self {
        let api_key = env::var("API_KEY")
            .ok()
            .or_else(|| env::var("GEMINI_API_KEY").ok())
            .filter(|key| !key.trim().is_empty());
        let model = env::var("GEMINI_MODEL")
            .ok()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let base_url = env::var("GEMINI_BASE_URL")
            .ok()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        ProviderConfig {
            api_key,
            model,
            base_url,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub language: DisplayLanguage,
    pub json_logs: bool,
    pub provider: ProviderConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: "127.0.0.1".to_string(),
            port: 8080,
            language: DisplayLanguage::default(),
            json_logs: false,
            provider: ProviderConfig::default(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let defaults = Config::default();
        let host = env::var("HOST").ok().unwrap_or(defaults.host);
        let port = env::var("PORT")
            .ok()
            .and_then(|port| port.parse().ok())
            .unwrap_or(defaults.port);
        let language = env::var("PALETTE_LANGUAGE")
            .ok()
            .and_then(|code| DisplayLanguage::from_code(&code))
            .unwrap_or(defaults.language);
        let json_logs = env::var("LOG_FORMAT").map_or(false, |val| val == "json");

        Config {
            host,
            port,
            language,
            json_logs,
            provider: ProviderConfig::from_env(),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_language(mut self, language: DisplayLanguage) -> Self {
        self.language = language;
        self
    }

    pub fn with_provider(mut self, provider: ProviderConfig) -> Self {
        self.provider = provider;
        self
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Chat completion backend settings loaded from environment variables.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Bearer token. Requests fail with `NotConfigured` while this is unset.
    pub api_key: Option<String>,
    /// API root without a trailing slash (default: `https://api.openai.com/v1`).
    pub base_url: String,
    /// Model name sent with every request (default: `gpt-4`).
    pub model: String,
    /// Per-request HTTP timeout in seconds (default: `60`).
    pub request_timeout_secs: u64,
}

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl LlmConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                     |
    /// |----------------------------|-----------------------------|
    /// | `OPENAI_API_KEY`           | unset                       |
    /// | `LLM_BASE_URL`             | `https://api.openai.com/v1` |
    /// | `LLM_MODEL`                | `gpt-4`                     |
    /// | `LLM_REQUEST_TIMEOUT_SECS` | `60`                        |
    ///
    /// An unparseable timeout falls back to the default.
    pub fn from_env() -> Self {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        let base_url = std::env::var("LLM_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.into())
            .trim_end_matches('/')
            .to_string();

        let model = std::env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());

        let request_timeout_secs = std::env::var("LLM_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        Self {
            api_key,
            base_url,
            model,
            request_timeout_secs,
        }
    }

    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

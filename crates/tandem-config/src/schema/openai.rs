use serde::{Deserialize, Serialize};

/// Connection settings for the OpenAI Assistants API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiSection {
    /// Override for the API base URL (proxies, compatible servers).
    pub base_url: Option<String>,
    /// Environment variable holding the API key. The key itself never
    /// lives in the config file.
    pub api_key_env: String,
    pub organization: Option<String>,
    pub poll_interval_ms: u64,
    pub run_timeout_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for OpenAiSection {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key_env: "OPENAI_API_KEY".into(),
            organization: None,
            poll_interval_ms: 1000,
            run_timeout_secs: 600,
            request_timeout_secs: 120,
        }
    }
}

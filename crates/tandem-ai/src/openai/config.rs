//! OpenAI client configuration.

use std::time::Duration;

use crate::AiError;

pub(crate) const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI client configuration.
#[derive(Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
    pub organization: Option<String>,
    /// Delay between run status checks.
    pub poll_interval: Duration,
    /// Upper bound on how long a single run may stay queued or in progress.
    pub run_timeout: Duration,
    pub request_timeout: Duration,
}

impl std::fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("organization", &self.organization)
            .field("poll_interval", &self.poll_interval)
            .field("run_timeout", &self.run_timeout)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            organization: None,
            poll_interval: Duration::from_millis(1000),
            run_timeout: Duration::from_secs(600),
            request_timeout: Duration::from_secs(120),
        }
    }

    /// Read the API key from `key_var`, with optional `OPENAI_BASE_URL` and
    /// `OPENAI_ORG_ID` overrides. Every variable is resolved through `lookup`.
    pub fn from_lookup(
        key_var: &str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, AiError> {
        let api_key = lookup(key_var)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AiError::ApiError(format!("{key_var} not set")))?;

        let mut config = Self::new(api_key);
        if let Some(base_url) = lookup("OPENAI_BASE_URL").filter(|url| !url.is_empty()) {
            config = config.with_base_url(base_url);
        }
        if let Some(org) = lookup("OPENAI_ORG_ID").filter(|org| !org.is_empty()) {
            config = config.with_organization(org);
        }
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_run_timeout(mut self, timeout: Duration) -> Self {
        self.run_timeout = timeout;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

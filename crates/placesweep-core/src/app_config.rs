#[derive(Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub base_url: String,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Results requested per search page (provider maximum is 20).
    pub page_size: u32,
    /// Wait before a continuation token may be used.
    pub page_token_delay_ms: u64,
    /// Upper bound on pages per run; guards against cycling tokens.
    pub max_pages: usize,
    pub language_code: Option<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &"[redacted]")
            .field("base_url", &self.base_url)
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("page_size", &self.page_size)
            .field("page_token_delay_ms", &self.page_token_delay_ms)
            .field("max_pages", &self.max_pages)
            .field("language_code", &self.language_code)
            .finish()
    }
}

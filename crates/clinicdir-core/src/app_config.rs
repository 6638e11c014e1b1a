use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    /// Base URL of the clinic directory API, e.g. `https://api.example.com/v1`.
    pub api_base_url: String,
    /// Bearer token forwarded to the clinic API on admin calls.
    pub api_token: Option<String>,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Fixed submitter key for edit submissions; a fresh one is minted per
    /// submission when unset.
    pub submitter_key: Option<String>,
    pub deleted_page_size: u32,
    pub deleted_max_pages: u32,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_base_url", &self.api_base_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "[redacted]"))
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field(
                "submitter_key",
                &self.submitter_key.as_ref().map(|_| "[redacted]"),
            )
            .field("deleted_page_size", &self.deleted_page_size)
            .field("deleted_max_pages", &self.deleted_max_pages)
            .finish()
    }
}

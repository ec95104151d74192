use crate::error::Result;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;

/// Default base URL of the v2 REST API
pub const API_BASE_URL: &str = "https://api.tumblr.com/v2";

/// Default base URL of the OAuth1 endpoints
pub const OAUTH_BASE_URL: &str = "https://www.tumblr.com/oauth";

/// Create the HTTP client used by [`crate::transport::ReqwestTransport`]
/// with pooling and the timeouts carried by `config`
pub fn create_http_client(config: &Config) -> Result<Client> {
    let mut builder = ClientBuilder::new()
        .pool_max_idle_per_host(50)
        .connect_timeout(config.connect_timeout)
        .user_agent(config.user_agent.clone());

    if let Some(timeout) = config.timeout {
        builder = builder.timeout(timeout);
    }

    Ok(builder.build()?)
}

/// Configuration for the Tumblr client
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL for API calls, without trailing slash
    pub api_base_url: String,
    /// Base URL for the OAuth1 handshake, without trailing slash
    pub oauth_base_url: String,
    /// User-Agent header sent with every request
    pub user_agent: String,
    /// Whole-request timeout enforced by the transport (none by default)
    pub timeout: Option<Duration>,
    /// Connection establishment timeout
    pub connect_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_base_url: API_BASE_URL.to_string(),
            oauth_base_url: OAUTH_BASE_URL.to_string(),
            user_agent: format!("tumblr-client-rs/{}", env!("CARGO_PKG_VERSION")),
            timeout: None,
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl Config {
    /// Create a configuration pointing at the given API and OAuth base URLs
    pub fn new(api_base_url: impl Into<String>, oauth_base_url: impl Into<String>) -> Self {
        Config {
            api_base_url: trim_base(api_base_url.into()),
            oauth_base_url: trim_base(oauth_base_url.into()),
            ..Config::default()
        }
    }

    /// Set the User-Agent header
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set a whole-request timeout on the transport
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the connect timeout on the transport
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Get the OAuth endpoint URL for the given step (`request_token`, `authorize`, `access_token`)
    pub fn oauth_url(&self, step: &str) -> String {
        format!("{}/{}", self.oauth_base_url, step)
    }
}

fn trim_base(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

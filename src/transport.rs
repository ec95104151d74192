use async_trait::async_trait;
use reqwest::{Client, Method};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::config::{create_http_client, Config};
use crate::error::{Result, TumblrError};
use crate::method::HttpMethod;

/// A fully built HTTP request, ready to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// First header with the given name (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Raw HTTP response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Sends HTTP requests on behalf of the client.
///
/// Implementations must return [`TumblrError::Cancelled`] once `cancel` fires
/// and surface network failures as [`TumblrError::Transport`]. Any status code
/// is a successful send; interpreting it is the caller's job.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: HttpRequest, cancel: &CancellationToken) -> Result<HttpResponse>;
}

/// Default transport backed by a pooled `reqwest` client
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build a transport from the timeouts and user agent in `config`
    pub fn new(config: &Config) -> Result<Self> {
        Ok(ReqwestTransport {
            client: create_http_client(config)?,
        })
    }

    /// Wrap an existing `reqwest` client
    pub fn with_client(client: Client) -> Self {
        ReqwestTransport { client }
    }

    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let method = match request.method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
        };

        let mut builder = self.client.request(method, request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.bytes().await?.to_vec();

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest, cancel: &CancellationToken) -> Result<HttpResponse> {
        if cancel.is_cancelled() {
            return Err(TumblrError::Cancelled);
        }

        tokio::select! {
            _ = cancel.cancelled() => Err(TumblrError::Cancelled),
            result = self.execute(request) => result,
        }
    }
}

//! Three-legged OAuth1 handshake.
//!
//! 1. [`OAuthClient::get_request_token`] obtains a temporary token.
//! 2. The user visits [`OAuthClient::authorize_url`] and approves the app.
//! 3. [`OAuthClient::get_access_token`] trades the request token and the
//!    verifier for the long-lived access token used by [`crate::TumblrClient`].

use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::config::Config;
use crate::error::{Result, TumblrError};
use crate::method::{ApiMethod, HttpMethod};
use crate::oauth::{ConsumerCredentials, OAuthSigner};
use crate::token::Token;
use crate::transport::{HttpRequest, HttpTransport, ReqwestTransport};

/// Client for the OAuth1 token endpoints
#[derive(Clone)]
pub struct OAuthClient {
    signer: OAuthSigner,
    config: Config,
    transport: Arc<dyn HttpTransport>,
}

impl std::fmt::Debug for OAuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthClient")
            .field("signer", &self.signer)
            .field("oauth_base_url", &self.config.oauth_base_url)
            .finish_non_exhaustive()
    }
}

impl OAuthClient {
    pub fn new(consumer: ConsumerCredentials) -> Result<Self> {
        Self::with_config(consumer, Config::default())
    }

    pub fn with_config(consumer: ConsumerCredentials, config: Config) -> Result<Self> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::with_transport(consumer, config, Arc::new(transport)))
    }

    pub fn with_transport(
        consumer: ConsumerCredentials,
        config: Config,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        OAuthClient {
            signer: OAuthSigner::new(consumer),
            config,
            transport,
        }
    }

    /// Replace the request signer (custom nonce source or clock)
    pub fn with_signer(mut self, signer: OAuthSigner) -> Self {
        self.signer = signer;
        self
    }

    /// Obtain a request token. `callback_url` receives the verifier once the
    /// user authorizes the app.
    pub async fn get_request_token(&self, callback_url: &str) -> Result<Token> {
        if callback_url.is_empty() {
            return Err(TumblrError::argument(
                "callback_url",
                "Callback URL cannot be empty.",
            ));
        }

        let method = ApiMethod::new(
            &self.config.oauth_url("request_token"),
            None,
            HttpMethod::Post,
            None,
        )?;
        let oauth = self.signer.sign_with_extra(&method, &[("oauth_callback", callback_url)])?;
        self.exchange(&method, oauth.authorization_header()).await
    }

    /// Page where the user approves the request token
    pub fn authorize_url(&self, request_token: &Token) -> Result<Url> {
        if request_token.key.is_empty() {
            return Err(TumblrError::argument(
                "request_token",
                "Request token cannot be empty.",
            ));
        }
        let mut url = Url::parse(&self.config.oauth_url("authorize"))?;
        url.query_pairs_mut()
            .append_pair("oauth_token", &request_token.key);
        Ok(url)
    }

    /// Exchange an authorized request token for an access token.
    ///
    /// `verifier` is either the bare `oauth_verifier` or the whole callback
    /// URL the platform redirected to.
    pub async fn get_access_token(&self, request_token: &Token, verifier: &str) -> Result<Token> {
        if !request_token.is_valid() {
            return Err(TumblrError::argument(
                "request_token",
                "Request token key and secret are required.",
            ));
        }
        let verifier = extract_verifier(verifier)?;

        let method = ApiMethod::new(
            &self.config.oauth_url("access_token"),
            Some(request_token.clone()),
            HttpMethod::Post,
            None,
        )?;
        let oauth = self
            .signer
            .sign_with_extra(&method, &[("oauth_verifier", verifier.as_str())])?;
        self.exchange(&method, oauth.authorization_header()).await
    }

    async fn exchange(&self, method: &ApiMethod, authorization: String) -> Result<Token> {
        let request = HttpRequest {
            method: method.http_method(),
            url: method.url().clone(),
            headers: vec![
                ("Authorization".to_string(), authorization),
                (
                    "Content-Type".to_string(),
                    "application/x-www-form-urlencoded".to_string(),
                ),
            ],
            body: Some(String::new()),
        };

        let response = self
            .transport
            .send(request, &CancellationToken::new())
            .await?;
        let body = String::from_utf8_lossy(&response.body);
        tracing::debug!(url = %method.url(), status = response.status, "oauth exchange");

        if !(200..300).contains(&response.status) {
            return Err(TumblrError::OAuth(format!(
                "{} returned HTTP {}: {}",
                method.url().path(),
                response.status,
                body.trim()
            )));
        }
        parse_token_response(&body)
    }
}

/// Read `oauth_token` / `oauth_token_secret` from a form-encoded body
fn parse_token_response(body: &str) -> Result<Token> {
    let mut key = None;
    let mut secret = None;
    for (name, value) in url::form_urlencoded::parse(body.trim().as_bytes()) {
        match &*name {
            "oauth_token" => key = Some(value.into_owned()),
            "oauth_token_secret" => secret = Some(value.into_owned()),
            _ => {}
        }
    }

    match (key, secret) {
        (Some(key), Some(secret)) if !key.is_empty() && !secret.is_empty() => {
            Ok(Token::new(key, secret))
        }
        _ => Err(TumblrError::OAuth(format!(
            "token response is missing oauth_token or oauth_token_secret: {}",
            body
        ))),
    }
}

fn extract_verifier(value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(TumblrError::argument("verifier", "Verifier cannot be empty."));
    }

    match Url::parse(value) {
        Ok(url) if url.has_host() => url
            .query_pairs()
            .find(|(name, _)| name == "oauth_verifier")
            .map(|(_, v)| v.into_owned())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                TumblrError::argument("verifier", "Callback URL has no oauth_verifier parameter.")
            }),
        _ => Ok(value.to_string()),
    }
}

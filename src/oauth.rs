use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha1::Sha1;
use std::sync::Arc;
use url::Url;
use uuid::Uuid;

use crate::error::{Result, TumblrError};
use crate::method::{ApiMethod, HttpMethod};
pub use crate::params::percent_encode;
use crate::params::{encode_pairs, sort_canonical};

type HmacSha1 = Hmac<Sha1>;

const SIGNATURE_METHOD: &str = "HMAC-SHA1";
const OAUTH_VERSION: &str = "1.0";

/// Consumer key and secret issued to the application.
#[derive(Clone, PartialEq, Eq)]
pub struct ConsumerCredentials {
    pub key: String,
    secret: String,
}

impl ConsumerCredentials {
    /// Create consumer credentials; both halves are required
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Result<Self> {
        let key = key.into();
        let secret = secret.into();
        if key.is_empty() {
            return Err(TumblrError::argument("consumer_key", "Consumer key cannot be empty."));
        }
        if secret.is_empty() {
            return Err(TumblrError::argument(
                "consumer_secret",
                "Consumer secret cannot be empty.",
            ));
        }
        Ok(ConsumerCredentials { key, secret })
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl std::fmt::Debug for ConsumerCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsumerCredentials")
            .field("key", &self.key)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Source of `oauth_nonce` values
pub trait NonceSource: Send + Sync {
    fn nonce(&self) -> String;
}

/// Source of `oauth_timestamp` values
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Random nonces from UUID v4
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidNonce;

impl NonceSource for UuidNonce {
    fn nonce(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Signed OAuth protocol parameters for one request, `oauth_signature` included
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthParameters {
    params: Vec<(String, String)>,
}

impl OAuthParameters {
    /// Value of `oauth_signature`
    pub fn signature(&self) -> &str {
        self.get("oauth_signature").unwrap_or_default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// `Authorization` header value: `OAuth k="v", ...` with encoded values
    pub fn authorization_header(&self) -> String {
        let fields: Vec<String> = self
            .params
            .iter()
            .map(|(n, v)| format!("{}=\"{}\"", percent_encode(n), percent_encode(v)))
            .collect();
        format!("OAuth {}", fields.join(", "))
    }

    /// Raw pairs, for the form-encoded fallback
    pub fn form_pairs(&self) -> &[(String, String)] {
        &self.params
    }
}

/// OAuth1 HMAC-SHA1 request signer
#[derive(Clone)]
pub struct OAuthSigner {
    consumer: ConsumerCredentials,
    nonce_source: Arc<dyn NonceSource>,
    clock: Arc<dyn Clock>,
}

impl OAuthSigner {
    /// Create a signer with random nonces and the system clock
    pub fn new(consumer: ConsumerCredentials) -> Self {
        OAuthSigner {
            consumer,
            nonce_source: Arc::new(UuidNonce),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_nonce_source(mut self, nonce_source: Arc<dyn NonceSource>) -> Self {
        self.nonce_source = nonce_source;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn consumer(&self) -> &ConsumerCredentials {
        &self.consumer
    }

    /// Current time according to the signer's clock
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Sign a method with a fresh nonce and the current time
    pub fn sign(&self, method: &ApiMethod) -> Result<OAuthParameters> {
        self.sign_with_extra(method, &[])
    }

    /// Sign a method with additional protocol parameters (`oauth_callback`, `oauth_verifier`)
    pub fn sign_with_extra(
        &self,
        method: &ApiMethod,
        extra: &[(&str, &str)],
    ) -> Result<OAuthParameters> {
        let nonce = self.nonce_source.nonce();
        let timestamp = self.clock.now().timestamp();
        self.sign_with(method, extra, &nonce, timestamp)
    }

    /// Deterministic signing with an explicit nonce and timestamp
    pub fn sign_with(
        &self,
        method: &ApiMethod,
        extra: &[(&str, &str)],
        nonce: &str,
        timestamp: i64,
    ) -> Result<OAuthParameters> {
        let mut oauth: Vec<(String, String)> = vec![
            ("oauth_consumer_key".to_string(), self.consumer.key.clone()),
            ("oauth_nonce".to_string(), nonce.to_string()),
            ("oauth_signature_method".to_string(), SIGNATURE_METHOD.to_string()),
            ("oauth_timestamp".to_string(), timestamp.to_string()),
        ];
        if let Some(token) = method.token() {
            oauth.push(("oauth_token".to_string(), token.key.clone()));
        }
        oauth.push(("oauth_version".to_string(), OAUTH_VERSION.to_string()));
        for (name, value) in extra {
            oauth.push((name.to_string(), value.to_string()));
        }

        // Request parameters: query already on the URL plus the method's own set
        let mut all: Vec<(String, String)> = method
            .url()
            .query_pairs()
            .map(|(n, v)| (n.into_owned(), v.into_owned()))
            .collect();
        all.extend(method.parameters().iter().map(|(n, v)| (n.to_string(), v)));
        all.extend(oauth.iter().cloned());

        let base_string = signature_base_string(method.http_method(), method.url(), &all);
        tracing::trace!(base_string = %base_string, "OAuth signature base string");

        let token_secret = method.token().map(|t| t.secret.as_str()).unwrap_or("");
        let signature = hmac_sha1_base64(&self.consumer.secret, token_secret, &base_string)?;

        oauth.push(("oauth_signature".to_string(), signature));
        oauth.sort();

        Ok(OAuthParameters { params: oauth })
    }
}

impl std::fmt::Debug for OAuthSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthSigner")
            .field("consumer", &self.consumer)
            .finish_non_exhaustive()
    }
}

/// `METHOD&encode(base_url)&encode(sorted, encoded parameter string)`
pub fn signature_base_string(
    http_method: HttpMethod,
    url: &Url,
    params: &[(String, String)],
) -> String {
    let mut sorted = params.to_vec();
    sort_canonical(&mut sorted);
    let param_string = encode_pairs(sorted.iter().map(|(n, v)| (n.as_str(), v)));

    format!(
        "{}&{}&{}",
        http_method.as_str(),
        percent_encode(&base_url(url)),
        percent_encode(&param_string)
    )
}

/// Scheme, host, non-default port and path; no query or fragment
pub fn base_url(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
    match url.port() {
        Some(port) => format!("{}://{}:{}{}", url.scheme(), host, port, url.path()),
        None => format!("{}://{}{}", url.scheme(), host, url.path()),
    }
}

fn hmac_sha1_base64(consumer_secret: &str, token_secret: &str, base_string: &str) -> Result<String> {
    let key = format!("{}&{}", percent_encode(consumer_secret), percent_encode(token_secret));
    let mut mac = HmacSha1::new_from_slice(key.as_bytes())
        .map_err(|e| TumblrError::OAuth(format!("invalid signing key: {}", e)))?;
    mac.update(base_string.as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParameterSet;
    use crate::token::Token;

    // Published OAuth1 walkthrough vector (status update request)
    const CONSUMER_KEY: &str = "xvz1evFS4wEEPTGEFPHBog";
    const CONSUMER_SECRET: &str = "kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw";
    const TOKEN_KEY: &str = "370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb";
    const TOKEN_SECRET: &str = "LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE";
    const NONCE: &str = "kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg";
    const TIMESTAMP: i64 = 1318622958;

    fn vector_method() -> ApiMethod {
        let params = ParameterSet::new()
            .with("status", "Hello Ladies + Gentlemen, a signed OAuth request!");
        ApiMethod::new(
            "https://api.twitter.com/1.1/statuses/update.json?include_entities=true",
            Some(Token::new(TOKEN_KEY, TOKEN_SECRET)),
            HttpMethod::Post,
            Some(params),
        )
        .unwrap()
    }

    fn signer() -> OAuthSigner {
        OAuthSigner::new(ConsumerCredentials::new(CONSUMER_KEY, CONSUMER_SECRET).unwrap())
    }

    #[test]
    fn test_signature_matches_known_vector() {
        let signed = signer()
            .sign_with(&vector_method(), &[], NONCE, TIMESTAMP)
            .unwrap();
        assert_eq!(signed.signature(), "hCtSmYh+iHYCEqBWrE7C7hYmtUk=");
    }

    #[test]
    fn test_signature_is_deterministic() {
        let method = vector_method();
        let a = signer().sign_with(&method, &[], "abc", 1_700_000_000).unwrap();
        let b = signer().sign_with(&method, &[], "abc", 1_700_000_000).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.authorization_header(), b.authorization_header());

        let c = signer().sign_with(&method, &[], "abd", 1_700_000_000).unwrap();
        assert_ne!(a.signature(), c.signature());
    }

    #[test]
    fn test_base_string_layout() {
        let url = Url::parse("HTTPS://Api.Tumblr.com:443/v2/user/info").unwrap();
        let base = signature_base_string(
            HttpMethod::Get,
            &url,
            &[("b".to_string(), "2".to_string()), ("a".to_string(), "x y".to_string())],
        );
        assert_eq!(
            base,
            "GET&https%3A%2F%2Fapi.tumblr.com%2Fv2%2Fuser%2Finfo&a%3Dx%2520y%26b%3D2"
        );
    }

    #[test]
    fn test_base_string_follows_canonical_pairs() {
        let params = ParameterSet::new().with("a~", 1).with("a\u{e9}", 2);
        let url = Url::parse("https://api.tumblr.com/v2/user/info").unwrap();
        let base = signature_base_string(HttpMethod::Get, &url, &params.canonical_pairs());

        assert!(base.ends_with("&a%25C3%25A9%3D2%26a~%3D1"));
        let mut reversed = params.canonical_pairs();
        reversed.reverse();
        assert_eq!(base, signature_base_string(HttpMethod::Get, &url, &reversed));
    }

    #[test]
    fn test_base_url_keeps_custom_port() {
        let url = Url::parse("http://localhost:8080/v2/tagged?tag=x#frag").unwrap();
        assert_eq!(base_url(&url), "http://localhost:8080/v2/tagged");
    }

    #[test]
    fn test_authorization_header_shape() {
        let method =
            ApiMethod::new("https://api.tumblr.com/v2/user/info", None, HttpMethod::Get, None)
                .unwrap();
        let signed = signer().sign_with(&method, &[], "n0nce", 42).unwrap();
        let header = signed.authorization_header();

        assert!(header.starts_with("OAuth oauth_consumer_key=\"xvz1evFS4wEEPTGEFPHBog\", "));
        assert!(header.contains("oauth_nonce=\"n0nce\""));
        assert!(header.contains("oauth_timestamp=\"42\""));
        assert!(header.contains("oauth_version=\"1.0\""));
        assert!(!header.contains("oauth_token="));
        assert!(signed.get("oauth_token").is_none());
    }

    #[test]
    fn test_extra_parameters_are_signed() {
        let method = ApiMethod::new(
            "https://www.tumblr.com/oauth/request_token",
            None,
            HttpMethod::Post,
            None,
        )
        .unwrap();
        let plain = signer().sign_with(&method, &[], "n", 1).unwrap();
        let with_callback = signer()
            .sign_with(&method, &[("oauth_callback", "app://done")], "n", 1)
            .unwrap();

        assert_eq!(with_callback.get("oauth_callback"), Some("app://done"));
        assert_ne!(plain.signature(), with_callback.signature());
    }

    #[test]
    fn test_consumer_credentials_required() {
        assert!(ConsumerCredentials::new("", "secret").unwrap_err().is_argument());
        assert!(ConsumerCredentials::new("key", "").unwrap_err().is_argument());
    }

    #[test]
    fn test_injected_nonce_and_clock() {
        struct FixedNonce;
        impl NonceSource for FixedNonce {
            fn nonce(&self) -> String {
                NONCE.to_string()
            }
        }
        struct FixedClock;
        impl Clock for FixedClock {
            fn now(&self) -> DateTime<Utc> {
                DateTime::from_timestamp(TIMESTAMP, 0).unwrap()
            }
        }

        let signed = signer()
            .with_nonce_source(Arc::new(FixedNonce))
            .with_clock(Arc::new(FixedClock))
            .sign(&vector_method())
            .unwrap();
        assert_eq!(signed.signature(), "hCtSmYh+iHYCEqBWrE7C7hYmtUk=");
    }
}

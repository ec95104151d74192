use serde::{Deserialize, Serialize};

/// Token represents an OAuth1 token: a public key and its shared secret.
/// Both consumer-issued access tokens and temporary request tokens use this shape.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Public token value (`oauth_token`)
    #[serde(rename = "oauth_token")]
    pub key: String,

    /// Token secret used in the signing key (`oauth_token_secret`)
    #[serde(rename = "oauth_token_secret")]
    pub secret: String,
}

impl Token {
    /// Create a new Token
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Token {
            key: key.into(),
            secret: secret.into(),
        }
    }

    /// Check that both halves of the token are present
    pub fn is_valid(&self) -> bool {
        !self.key.is_empty() && !self.secret.is_empty()
    }
}

// Implement Debug manually to avoid exposing the secret
impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("key", &self.key)
            .field("secret", &"<redacted>")
            .finish()
    }
}

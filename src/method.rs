use crate::config::API_BASE_URL;
use crate::error::{Result, TumblrError};
use crate::params::ParameterSet;
use crate::token::Token;
use std::fmt;
use std::str::FromStr;
use url::Url;

/// HTTP verbs accepted by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Whether parameters travel in the query string rather than a form body
    pub fn uses_query(&self) -> bool {
        matches!(self, HttpMethod::Get)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = TumblrError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            _ => Err(TumblrError::argument(
                "http_method",
                format!("unsupported HTTP method: {}", s),
            )),
        }
    }
}

/// One API call: absolute URL, verb, optional OAuth token and parameters.
///
/// Immutable once built; the client signs and dispatches it as is.
#[derive(Debug, Clone)]
pub struct ApiMethod {
    url: Url,
    http_method: HttpMethod,
    token: Option<Token>,
    parameters: ParameterSet,
}

impl ApiMethod {
    /// Create a method for an absolute `http`/`https` URL
    pub fn new(
        url: &str,
        token: Option<Token>,
        http_method: HttpMethod,
        parameters: Option<ParameterSet>,
    ) -> Result<Self> {
        if url.is_empty() {
            return Err(TumblrError::argument("url", "URL cannot be empty."));
        }
        let url = Url::parse(url)
            .map_err(|e| TumblrError::argument("url", format!("URL must be absolute: {}", e)))?;
        if !matches!(url.scheme(), "http" | "https") || !url.has_host() {
            return Err(TumblrError::argument(
                "url",
                format!("URL must be an absolute http(s) URL: {}", url),
            ));
        }

        Ok(ApiMethod {
            url,
            http_method,
            token,
            parameters: parameters.unwrap_or_default(),
        })
    }

    /// Blog-scoped method: `https://api.tumblr.com/v2/blog/{blog}/{method}`
    pub fn blog(
        blog_name: &str,
        method_name: &str,
        token: Option<Token>,
        http_method: HttpMethod,
        parameters: Option<ParameterSet>,
    ) -> Result<Self> {
        Self::blog_at(API_BASE_URL, blog_name, method_name, token, http_method, parameters)
    }

    /// Blog-scoped method under a custom API base URL
    pub fn blog_at(
        base_url: &str,
        blog_name: &str,
        method_name: &str,
        token: Option<Token>,
        http_method: HttpMethod,
        parameters: Option<ParameterSet>,
    ) -> Result<Self> {
        let blog_name = validate_blog_name(blog_name)?;
        check_method_name(method_name)?;
        let url = format!("{}/blog/{}/{}", base_url, blog_name, method_name);
        Self::new(&url, token, http_method, parameters)
    }

    /// User-scoped method: `https://api.tumblr.com/v2/user/{method}`
    pub fn user(
        method_name: &str,
        token: Option<Token>,
        http_method: HttpMethod,
        parameters: Option<ParameterSet>,
    ) -> Result<Self> {
        Self::user_at(API_BASE_URL, method_name, token, http_method, parameters)
    }

    /// User-scoped method under a custom API base URL
    pub fn user_at(
        base_url: &str,
        method_name: &str,
        token: Option<Token>,
        http_method: HttpMethod,
        parameters: Option<ParameterSet>,
    ) -> Result<Self> {
        check_method_name(method_name)?;
        let url = format!("{}/user/{}", base_url, method_name);
        Self::new(&url, token, http_method, parameters)
    }

    /// The tag search endpoint: `https://api.tumblr.com/v2/tagged`
    pub fn tagged_at(
        base_url: &str,
        token: Option<Token>,
        parameters: Option<ParameterSet>,
    ) -> Result<Self> {
        Self::new(&format!("{}/tagged", base_url), token, HttpMethod::Get, parameters)
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn http_method(&self) -> HttpMethod {
        self.http_method
    }

    pub fn token(&self) -> Option<&Token> {
        self.token.as_ref()
    }

    pub fn parameters(&self) -> &ParameterSet {
        &self.parameters
    }
}

/// Validate a blog name and qualify it as `{name}.tumblr.com` when it has no domain part
pub fn validate_blog_name(blog_name: &str) -> Result<String> {
    if blog_name.is_empty() {
        return Err(TumblrError::argument("blog_name", "Blog name cannot be empty."));
    }

    // Blog names and host names only; anything else would alter the request path
    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':');
    if !blog_name.chars().all(allowed) {
        return Err(TumblrError::argument(
            "blog_name",
            "Blog name may only contain letters, digits, '-', '_', '.' and ':'.",
        ));
    }

    if blog_name.contains('.') {
        Ok(blog_name.to_string())
    } else {
        Ok(format!("{}.tumblr.com", blog_name))
    }
}

fn check_method_name(method_name: &str) -> Result<()> {
    if method_name.is_empty() {
        return Err(TumblrError::argument("method_name", "Method name cannot be empty."));
    }
    Ok(())
}

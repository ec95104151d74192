//! # tumblr-client - Tumblr v2 API client for Rust
//!
//! A typed, asynchronous client for the Tumblr v2 REST API. It signs
//! requests with OAuth1, builds the blog, user and tag endpoints, and
//! decodes the platform's loosely typed JSON into strongly typed models.
//!
//! ## Features
//!
//! - OAuth1 HMAC-SHA1 request signing and the three-legged token handshake
//! - Typed operations for blogs, posts, queues, blocks, notifications,
//!   the dashboard, likes, follows and filtered content
//! - Polymorphic post decoding with a fallback for unknown post types
//! - Tolerant decoding of booleans and numbers sent as strings
//! - Argument validation before any network traffic
//! - Swappable HTTP transport with cooperative cancellation
//!
//! ## Basic Usage
//!
//! ```no_run
//! use tumblr_client::{ConsumerCredentials, PostsQuery, TumblrClient};
//!
//! # async fn run() -> tumblr_client::Result<()> {
//! let consumer = ConsumerCredentials::new("consumer_key", "consumer_secret")?;
//! let client = TumblrClient::new(consumer, None)?;
//!
//! let info = client.get_blog_info("staff").await?;
//! println!("{} has {} posts", info.base.title, info.posts);
//!
//! let page = client.get_posts("staff", &PostsQuery::new().with_limit(5)).await?;
//! for post in &page.posts {
//!     println!("{} {}", post.type_name(), post.common.post_url);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Authentication
//!
//! Operations acting for a user need an access token, obtained once through
//! [`OAuthClient`]:
//!
//! ```no_run
//! use tumblr_client::{ConsumerCredentials, OAuthClient, PostData, TumblrClient};
//!
//! # async fn run() -> tumblr_client::Result<()> {
//! let consumer = ConsumerCredentials::new("consumer_key", "consumer_secret")?;
//! let oauth = OAuthClient::new(consumer.clone())?;
//!
//! let request_token = oauth.get_request_token("https://example.com/callback").await?;
//! println!("Authorize at {}", oauth.authorize_url(&request_token)?);
//! let access_token = oauth.get_access_token(&request_token, "verifier").await?;
//!
//! let client = TumblrClient::new(consumer, Some(access_token))?;
//! let created = client
//!     .create_post("myblog", &PostData::text("Hello", Some("First post"))?)
//!     .await?;
//! println!("created post {}", created.id);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod convert;
pub mod error;
pub mod method;
pub mod model;
pub mod oauth;
pub mod oauth_client;
pub mod params;
pub mod query;
pub mod response;
pub mod time;
pub mod token;
pub mod transport;

// Re-export main types for convenience
pub use client::{TumblrClient, MAX_FILTERED_CONTENT_COUNT, MAX_FILTERED_CONTENT_LENGTH};
pub use config::Config;
pub use error::{Result, TumblrError};
pub use method::{ApiMethod, HttpMethod};
pub use model::*;
pub use oauth::{ConsumerCredentials, OAuthSigner};
pub use oauth_client::OAuthClient;
pub use params::{ParamValue, ParameterSet};
pub use query::{DashboardCursor, DashboardQuery, PostsQuery, MAX_PAGE_SIZE};
pub use response::{ApiErrorDetail, Envelope, Meta};
pub use time::Timestamp;
pub use token::Token;
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};

// Re-export the cancellation token accepted by the `_with_cancel` operations
pub use tokio_util::sync::CancellationToken;

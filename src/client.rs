//! The [`TumblrClient`] facade.
//!
//! Every operation follows the same sequence: reject the call if the client
//! was disposed, validate the arguments, check that an OAuth token is present
//! when the endpoint needs one, then sign, send and decode. The first three
//! steps never touch the network.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::convert::WireEnum;
use crate::error::{Result, TumblrError};
use crate::method::{validate_blog_name, ApiMethod, HttpMethod};
use crate::model::blog::{BlocksResponse, BlogInfoResponse, FollowedBy};
use crate::model::notification::NotificationsResponse;
use crate::model::post::PostCollection;
use crate::model::user::{FilteredContentResponse, UserInfoResponse, UserLimitsResponse};
use crate::model::{
    BlogBase, BlogInfo, Followers, Following, Likes, Notification, NotificationTypes, Post,
    PostCreationInfo, PostCreationState, PostData, PostFilter, PostType, Posts, UserInfo,
    UserLimits,
};
use crate::oauth::{ConsumerCredentials, OAuthSigner};
use crate::params::ParameterSet;
use crate::query::{DashboardQuery, PostsQuery, MAX_PAGE_SIZE};
use crate::response::Envelope;
use crate::token::Token;
use crate::transport::{HttpRequest, HttpTransport, ReqwestTransport};

/// Most filter strings a user can have
pub const MAX_FILTERED_CONTENT_COUNT: usize = 200;

/// Longest filter string accepted, in characters
pub const MAX_FILTERED_CONTENT_LENGTH: usize = 250;

/// Asynchronous client for the Tumblr v2 API.
///
/// The client is `Send + Sync`; concurrent calls share nothing but the
/// credentials and the transport. After [`TumblrClient::dispose`] every call
/// fails with [`TumblrError::Disposed`].
pub struct TumblrClient {
    signer: OAuthSigner,
    token: Option<Token>,
    config: Config,
    transport: RwLock<Option<Arc<dyn HttpTransport>>>,
}

impl fmt::Debug for TumblrClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TumblrClient")
            .field("signer", &self.signer)
            .field("token", &self.token)
            .field("config", &self.config)
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

impl TumblrClient {
    /// Create a client for the public platform with the default transport
    pub fn new(consumer: ConsumerCredentials, token: Option<Token>) -> Result<Self> {
        Self::with_config(consumer, token, Config::default())
    }

    /// Create a client with a custom configuration and the default transport
    pub fn with_config(
        consumer: ConsumerCredentials,
        token: Option<Token>,
        config: Config,
    ) -> Result<Self> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::with_transport(consumer, token, config, Arc::new(transport)))
    }

    /// Create a client sending through the given transport
    pub fn with_transport(
        consumer: ConsumerCredentials,
        token: Option<Token>,
        config: Config,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        TumblrClient {
            signer: OAuthSigner::new(consumer),
            token,
            config,
            transport: RwLock::new(Some(transport)),
        }
    }

    /// Replace the request signer (custom nonce source or clock)
    pub fn with_signer(mut self, signer: OAuthSigner) -> Self {
        self.signer = signer;
        self
    }

    pub fn token(&self) -> Option<&Token> {
        self.token.as_ref()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The consumer key, sent as `api_key` by the unauthenticated reads
    pub fn api_key(&self) -> &str {
        &self.signer.consumer().key
    }

    /// Release the transport. Irreversible; later calls fail with [`TumblrError::Disposed`].
    pub fn dispose(&self) {
        let mut slot = self.transport.write().unwrap_or_else(PoisonError::into_inner);
        if slot.take().is_some() {
            tracing::debug!("client disposed");
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.transport
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }

    // ---- generic entry points ----

    /// Send any method and decode its `response` payload
    pub async fn call<T>(&self, method: &ApiMethod, cancel: &CancellationToken) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.send(method, cancel).await?.decode()
    }

    /// Send any method, only checking the envelope for errors
    pub async fn call_no_result(&self, method: &ApiMethod, cancel: &CancellationToken) -> Result<()> {
        self.send(method, cancel).await?.check()?;
        Ok(())
    }

    async fn send(&self, method: &ApiMethod, cancel: &CancellationToken) -> Result<Envelope> {
        let transport = self.transport()?;
        let request = self.build_request(method)?;

        let start = Instant::now();
        let response = transport.send(request, cancel).await?;
        tracing::debug!(
            method = %method.http_method(),
            url = %method.url(),
            status = response.status,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "api call"
        );

        Envelope::parse(response.status, &response.body)
    }

    fn build_request(&self, method: &ApiMethod) -> Result<HttpRequest> {
        let mut headers = Vec::new();
        if method.token().is_some() {
            let oauth = self.signer.sign(method)?;
            headers.push(("Authorization".to_string(), oauth.authorization_header()));
        }

        let mut url = method.url().clone();
        let params = method.parameters();
        let body = if method.http_method().uses_query() {
            if !params.is_empty() {
                let query = match url.query() {
                    Some(existing) if !existing.is_empty() => {
                        format!("{}&{}", existing, params.to_query_string())
                    }
                    _ => params.to_query_string(),
                };
                url.set_query(Some(&query));
            }
            None
        } else {
            headers.push((
                "Content-Type".to_string(),
                "application/x-www-form-urlencoded".to_string(),
            ));
            Some(params.to_form_body())
        };

        Ok(HttpRequest {
            method: method.http_method(),
            url,
            headers,
            body,
        })
    }

    fn transport(&self) -> Result<Arc<dyn HttpTransport>> {
        self.transport
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(TumblrError::Disposed)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_disposed() {
            return Err(TumblrError::Disposed);
        }
        Ok(())
    }

    fn require_token(&self, operation: &str) -> Result<Token> {
        self.token
            .clone()
            .ok_or_else(|| TumblrError::token_required(operation))
    }

    fn api_key_params(&self) -> ParameterSet {
        ParameterSet::new().with("api_key", self.api_key())
    }

    fn blog_method(
        &self,
        blog_name: &str,
        method_name: &str,
        token: Option<Token>,
        http_method: HttpMethod,
        params: ParameterSet,
    ) -> Result<ApiMethod> {
        ApiMethod::blog_at(
            &self.config.api_base_url,
            blog_name,
            method_name,
            token,
            http_method,
            Some(params),
        )
    }

    fn user_method(
        &self,
        method_name: &str,
        token: Token,
        http_method: HttpMethod,
        params: ParameterSet,
    ) -> Result<ApiMethod> {
        ApiMethod::user_at(
            &self.config.api_base_url,
            method_name,
            Some(token),
            http_method,
            Some(params),
        )
    }

    async fn fetch<T>(&self, method: ApiMethod) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.call(&method, &CancellationToken::new()).await
    }

    async fn execute(&self, method: ApiMethod) -> Result<()> {
        self.call_no_result(&method, &CancellationToken::new()).await
    }

    // ---- blog ----

    /// Public information about a blog
    pub async fn get_blog_info(&self, blog_name: &str) -> Result<BlogInfo> {
        self.ensure_open()?;
        check_blog(blog_name)?;

        let method = self.blog_method(
            blog_name,
            "info",
            self.token.clone(),
            HttpMethod::Get,
            self.api_key_params(),
        )?;
        let response: BlogInfoResponse = self.fetch(method).await?;
        Ok(response.blog)
    }

    /// Posts liked by a blog; `before`/`after` page by like time instead of offset
    pub async fn get_blog_likes(
        &self,
        blog_name: &str,
        offset: i64,
        limit: u32,
        before: Option<DateTime<Utc>>,
        after: Option<DateTime<Utc>>,
    ) -> Result<Likes> {
        self.ensure_open()?;
        check_blog(blog_name)?;
        check_offset(offset)?;
        check_limit(limit)?;

        let mut params = self.api_key_params();
        params
            .add_with_default("offset", offset, 0)
            .add("limit", limit)
            .add_opt("before", before.map(|t| t.timestamp()))
            .add_opt("after", after.map(|t| t.timestamp()));

        let method = self.blog_method(blog_name, "likes", None, HttpMethod::Get, params)?;
        self.fetch(method).await
    }

    /// One page of a blog's published posts
    pub async fn get_posts(&self, blog_name: &str, query: &PostsQuery) -> Result<Posts> {
        self.ensure_open()?;
        check_blog(blog_name)?;
        check_offset(query.offset)?;
        check_limit(query.limit)?;

        let mut params = self.api_key_params();
        params
            .add_with_default("offset", query.offset, 0)
            .add("limit", query.limit)
            .add_with_default("reblog_info", query.reblog_info, false)
            .add_with_default("notes_info", query.notes_info, false)
            .add_with_default("filter", query.filter.to_wire(), PostFilter::Html.to_wire())
            .add_opt("tag", query.tag.as_deref());

        let method_name = match query.post_type {
            PostType::All => "posts".to_string(),
            post_type => format!("posts/{}", post_type.to_wire()),
        };
        let method = self.blog_method(blog_name, &method_name, None, HttpMethod::Get, params)?;
        self.fetch(method).await
    }

    /// A single post by id; `None` when the blog returns no post
    pub async fn get_post(
        &self,
        blog_name: &str,
        id: i64,
        reblog_info: bool,
        notes_info: bool,
    ) -> Result<Option<Post>> {
        self.ensure_open()?;
        check_blog(blog_name)?;
        check_id("id", id)?;

        let mut params = self.api_key_params();
        params
            .add("id", id)
            .add_with_default("reblog_info", reblog_info, false)
            .add_with_default("notes_info", notes_info, false);

        let method = self.blog_method(blog_name, "posts", None, HttpMethod::Get, params)?;
        let page: Posts = self.fetch(method).await?;
        Ok(page.posts.into_iter().next())
    }

    pub async fn delete_post(&self, blog_name: &str, id: i64) -> Result<()> {
        self.ensure_open()?;
        check_blog(blog_name)?;
        check_id("id", id)?;
        let token = self.require_token("delete_post")?;

        let params = ParameterSet::new().with("id", id);
        let method = self.blog_method(blog_name, "post/delete", Some(token), HttpMethod::Post, params)?;
        self.execute(method).await
    }

    pub async fn create_post(&self, blog_name: &str, post: &PostData) -> Result<PostCreationInfo> {
        self.create_post_with_cancel(blog_name, post, &CancellationToken::new())
            .await
    }

    pub async fn create_post_with_cancel(
        &self,
        blog_name: &str,
        post: &PostData,
        cancel: &CancellationToken,
    ) -> Result<PostCreationInfo> {
        self.ensure_open()?;
        check_blog(blog_name)?;
        let token = self.require_token("create_post")?;

        let method = self.blog_method(
            blog_name,
            "post",
            Some(token),
            HttpMethod::Post,
            post.to_parameter_set(),
        )?;
        self.call(&method, cancel).await
    }

    pub async fn edit_post(
        &self,
        blog_name: &str,
        id: i64,
        post: &PostData,
    ) -> Result<PostCreationInfo> {
        self.edit_post_with_cancel(blog_name, id, post, &CancellationToken::new())
            .await
    }

    pub async fn edit_post_with_cancel(
        &self,
        blog_name: &str,
        id: i64,
        post: &PostData,
        cancel: &CancellationToken,
    ) -> Result<PostCreationInfo> {
        self.ensure_open()?;
        check_blog(blog_name)?;
        check_id("id", id)?;
        let token = self.require_token("edit_post")?;

        let mut params = ParameterSet::new().with("id", id);
        for (name, value) in post.to_parameter_set().iter() {
            params.add(name, value);
        }
        let method = self.blog_method(blog_name, "post/edit", Some(token), HttpMethod::Post, params)?;
        self.call(&method, cancel).await
    }

    /// Reblog a post onto `blog_name`, published immediately
    pub async fn reblog(
        &self,
        blog_name: &str,
        id: i64,
        reblog_key: &str,
        comment: Option<&str>,
    ) -> Result<PostCreationInfo> {
        self.ensure_open()?;
        check_blog(blog_name)?;
        check_id("id", id)?;
        check_not_empty("reblog_key", reblog_key)?;
        let token = self.require_token("reblog")?;

        let mut params = ParameterSet::new();
        params
            .add("id", id)
            .add("reblog_key", reblog_key)
            .add_opt("comment", comment);

        let method = self.blog_method(blog_name, "post/reblog", Some(token), HttpMethod::Post, params)?;
        self.fetch(method).await
    }

    /// Reblog with an explicit state. `publish_on` must lie in the future and
    /// is only sent for [`PostCreationState::Queue`].
    pub async fn reblog_with_state(
        &self,
        blog_name: &str,
        id: i64,
        reblog_key: &str,
        state: PostCreationState,
        publish_on: Option<DateTime<Utc>>,
        comment: Option<&str>,
    ) -> Result<PostCreationInfo> {
        self.ensure_open()?;
        check_blog(blog_name)?;
        check_id("id", id)?;
        check_not_empty("reblog_key", reblog_key)?;
        let token = self.require_token("reblog_with_state")?;
        if let Some(publish_on) = publish_on {
            if publish_on <= self.signer.now() {
                return Err(TumblrError::argument(
                    "publish_on",
                    "publish_on must be in the future",
                ));
            }
        }

        let mut params = ParameterSet::new();
        params
            .add("id", id)
            .add("reblog_key", reblog_key)
            .add_opt("comment", comment)
            .add("state", state.to_wire());
        if state == PostCreationState::Queue {
            params.add_opt("publish_on", publish_on.map(|t| t.to_rfc2822()));
        }

        let method = self.blog_method(blog_name, "post/reblog", Some(token), HttpMethod::Post, params)?;
        self.fetch(method).await
    }

    pub async fn get_followers(&self, blog_name: &str, offset: i64, limit: u32) -> Result<Followers> {
        self.ensure_open()?;
        check_blog(blog_name)?;
        check_offset(offset)?;
        check_limit(limit)?;
        let token = self.require_token("get_followers")?;

        let mut params = ParameterSet::new();
        params.add_with_default("offset", offset, 0).add("limit", limit);

        let method = self.blog_method(blog_name, "followers", Some(token), HttpMethod::Get, params)?;
        self.fetch(method).await
    }

    /// Whether the blog named by `query` follows `blog_name`
    pub async fn get_followed_by(&self, blog_name: &str, query: &str) -> Result<bool> {
        self.ensure_open()?;
        check_blog(blog_name)?;
        check_not_empty("query", query)?;
        let token = self.require_token("get_followed_by")?;

        let params = ParameterSet::new().with("query", query);
        let method = self.blog_method(blog_name, "followed_by", Some(token), HttpMethod::Get, params)?;
        let response: FollowedBy = self.fetch(method).await?;
        Ok(response.followed_by)
    }

    /// Draft posts, paged with `since_id`
    pub async fn get_draft_posts(
        &self,
        blog_name: &str,
        since_id: i64,
        filter: PostFilter,
    ) -> Result<Vec<Post>> {
        self.ensure_open()?;
        check_blog(blog_name)?;
        check_non_negative("since_id", since_id)?;
        let token = self.require_token("get_draft_posts")?;

        let mut params = ParameterSet::new();
        params
            .add_with_default("since_id", since_id, 0)
            .add_with_default("filter", filter.to_wire(), PostFilter::Html.to_wire());

        let method = self.blog_method(blog_name, "posts/draft", Some(token), HttpMethod::Get, params)?;
        let response: PostCollection = self.fetch(method).await?;
        Ok(response.posts)
    }

    pub async fn get_submission_posts(
        &self,
        blog_name: &str,
        offset: i64,
        filter: PostFilter,
    ) -> Result<Vec<Post>> {
        self.ensure_open()?;
        check_blog(blog_name)?;
        check_offset(offset)?;
        let token = self.require_token("get_submission_posts")?;

        let mut params = ParameterSet::new();
        params
            .add_with_default("offset", offset, 0)
            .add_with_default("filter", filter.to_wire(), PostFilter::Html.to_wire());

        let method = self.blog_method(
            blog_name,
            "posts/submission",
            Some(token),
            HttpMethod::Get,
            params,
        )?;
        let response: PostCollection = self.fetch(method).await?;
        Ok(response.posts)
    }

    /// Activity items of a blog, newest first.
    ///
    /// Page backwards by passing the last item's [`Notification::cursor`] as
    /// `before`. `types` filters the items unless it is [`NotificationTypes::ALL`].
    pub async fn get_notifications(
        &self,
        blog_name: &str,
        before: Option<DateTime<Utc>>,
        types: NotificationTypes,
    ) -> Result<Vec<Notification>> {
        self.ensure_open()?;
        check_blog(blog_name)?;
        if types.is_empty() {
            return Err(TumblrError::argument(
                "types",
                "at least one notification type is required",
            ));
        }
        let token = self.require_token("get_notifications")?;

        let mut params = ParameterSet::new();
        params.add_opt("before", before.map(|t| t.timestamp()));
        if !types.is_all() {
            params.add_array("types", types.to_wire_array());
        }

        let method = self.blog_method(blog_name, "notifications", Some(token), HttpMethod::Get, params)?;
        let response: NotificationsResponse = self.fetch(method).await?;
        Ok(response.notifications)
    }

    pub async fn get_queued_posts(
        &self,
        blog_name: &str,
        offset: i64,
        limit: u32,
        filter: PostFilter,
    ) -> Result<Vec<Post>> {
        self.ensure_open()?;
        check_blog(blog_name)?;
        check_offset(offset)?;
        check_limit(limit)?;
        let token = self.require_token("get_queued_posts")?;

        let mut params = ParameterSet::new();
        params
            .add_with_default("offset", offset, 0)
            .add("limit", limit)
            .add_with_default("filter", filter.to_wire(), PostFilter::Html.to_wire());

        let method = self.blog_method(blog_name, "posts/queue", Some(token), HttpMethod::Get, params)?;
        let response: PostCollection = self.fetch(method).await?;
        Ok(response.posts)
    }

    /// Move a queued post after `insert_after` (`0` moves it to the top)
    pub async fn reorder_queue(&self, blog_name: &str, post_id: i64, insert_after: i64) -> Result<()> {
        self.ensure_open()?;
        check_blog(blog_name)?;
        check_id("post_id", post_id)?;
        check_non_negative("insert_after", insert_after)?;
        let token = self.require_token("reorder_queue")?;

        let mut params = ParameterSet::new();
        params
            .add("post_id", post_id.to_string())
            .add("insert_after", insert_after.to_string());

        let method = self.blog_method(
            blog_name,
            "posts/queue/reorder",
            Some(token),
            HttpMethod::Post,
            params,
        )?;
        self.execute(method).await
    }

    pub async fn shuffle_queue(&self, blog_name: &str) -> Result<()> {
        self.ensure_open()?;
        check_blog(blog_name)?;
        let token = self.require_token("shuffle_queue")?;

        let method = self.blog_method(
            blog_name,
            "posts/queue/shuffle",
            Some(token),
            HttpMethod::Post,
            ParameterSet::new(),
        )?;
        self.execute(method).await
    }

    pub async fn get_blocks(&self, blog_name: &str, offset: i64, limit: u32) -> Result<Vec<BlogBase>> {
        self.ensure_open()?;
        check_blog(blog_name)?;
        check_offset(offset)?;
        check_limit(limit)?;
        let token = self.require_token("get_blocks")?;

        let mut params = ParameterSet::new();
        params.add_with_default("offset", offset, 0).add("limit", limit);

        let method = self.blog_method(blog_name, "blocks", Some(token), HttpMethod::Get, params)?;
        let response: BlocksResponse = self.fetch(method).await?;
        Ok(response.blocked_tumblelogs)
    }

    /// Block `blocked_blog` from interacting with `blog_name`
    pub async fn block_blog(&self, blog_name: &str, blocked_blog: &str) -> Result<()> {
        self.ensure_open()?;
        check_blog(blog_name)?;
        let blocked = validate_blog_name(blocked_blog)
            .map_err(|_| TumblrError::argument("blocked_blog", "Blocked blog name cannot be empty."))?;
        let token = self.require_token("block_blog")?;

        let params = ParameterSet::new().with("blocked_tumblelog", blocked);
        self.execute(self.blog_method(blog_name, "blocks", Some(token), HttpMethod::Post, params)?)
            .await
    }

    /// Block the author of a post, which also covers anonymous askers
    pub async fn block_post_author(&self, blog_name: &str, post_id: i64) -> Result<()> {
        self.ensure_open()?;
        check_blog(blog_name)?;
        check_id("post_id", post_id)?;
        let token = self.require_token("block_post_author")?;

        let params = ParameterSet::new().with("post_id", post_id);
        self.execute(self.blog_method(blog_name, "blocks", Some(token), HttpMethod::Post, params)?)
            .await
    }

    /// Remove a block; without a blog name, removes all anonymous blocks
    pub async fn remove_block(&self, blog_name: &str, blocked_blog: Option<&str>) -> Result<()> {
        self.ensure_open()?;
        check_blog(blog_name)?;
        let blocked = match blocked_blog {
            Some(name) if !name.is_empty() => Some(validate_blog_name(name)?),
            _ => None,
        };
        let token = self.require_token("remove_block")?;

        let mut params = ParameterSet::new();
        match blocked {
            Some(blocked) => params.add("blocked_tumblelog", blocked),
            None => params.add("anonymous_only", true),
        };

        self.execute(self.blog_method(blog_name, "blocks", Some(token), HttpMethod::Delete, params)?)
            .await
    }

    // ---- user ----

    pub async fn get_user_info(&self) -> Result<UserInfo> {
        self.ensure_open()?;
        let token = self.require_token("get_user_info")?;

        let method = self.user_method("info", token, HttpMethod::Get, ParameterSet::new())?;
        let response: UserInfoResponse = self.fetch(method).await?;
        Ok(response.user)
    }

    /// Blogs the current user follows
    pub async fn get_following(&self, offset: i64, limit: u32) -> Result<Following> {
        self.ensure_open()?;
        check_offset(offset)?;
        check_limit(limit)?;
        let token = self.require_token("get_following")?;

        let mut params = ParameterSet::new();
        params.add_with_default("offset", offset, 0).add("limit", limit);

        let method = self.user_method("following", token, HttpMethod::Get, params)?;
        self.fetch(method).await
    }

    /// Posts liked by the current user
    pub async fn get_likes(
        &self,
        offset: i64,
        limit: u32,
        before: Option<DateTime<Utc>>,
        after: Option<DateTime<Utc>>,
    ) -> Result<Likes> {
        self.ensure_open()?;
        check_offset(offset)?;
        check_limit(limit)?;
        let token = self.require_token("get_likes")?;

        let mut params = ParameterSet::new();
        params
            .add_with_default("offset", offset, 0)
            .add("limit", limit)
            .add_opt("before", before.map(|t| t.timestamp()))
            .add_opt("after", after.map(|t| t.timestamp()));

        let method = self.user_method("likes", token, HttpMethod::Get, params)?;
        self.fetch(method).await
    }

    pub async fn like(&self, id: i64, reblog_key: &str) -> Result<()> {
        self.like_or_unlike("like", id, reblog_key).await
    }

    pub async fn unlike(&self, id: i64, reblog_key: &str) -> Result<()> {
        self.like_or_unlike("unlike", id, reblog_key).await
    }

    async fn like_or_unlike(&self, method_name: &str, id: i64, reblog_key: &str) -> Result<()> {
        self.ensure_open()?;
        check_id("id", id)?;
        check_not_empty("reblog_key", reblog_key)?;
        let token = self.require_token(method_name)?;

        let mut params = ParameterSet::new();
        params.add("id", id).add("reblog_key", reblog_key);
        self.execute(self.user_method(method_name, token, HttpMethod::Post, params)?)
            .await
    }

    pub async fn follow(&self, blog_url: &str) -> Result<()> {
        self.follow_or_unfollow("follow", blog_url).await
    }

    pub async fn unfollow(&self, blog_url: &str) -> Result<()> {
        self.follow_or_unfollow("unfollow", blog_url).await
    }

    async fn follow_or_unfollow(&self, method_name: &str, blog_url: &str) -> Result<()> {
        self.ensure_open()?;
        check_not_empty("blog_url", blog_url)?;
        let token = self.require_token(method_name)?;

        let params = ParameterSet::new().with("url", blog_url);
        self.execute(self.user_method(method_name, token, HttpMethod::Post, params)?)
            .await
    }

    /// One page of the current user's dashboard
    pub async fn get_dashboard_posts(&self, query: &DashboardQuery) -> Result<Vec<Post>> {
        self.ensure_open()?;
        check_offset(query.offset)?;
        check_limit(query.limit)?;
        let cursor = query.cursor.map(|c| c.parameter());
        if let Some((name, id)) = cursor {
            check_non_negative(name, id)?;
        }
        let token = self.require_token("get_dashboard_posts")?;

        let mut params = ParameterSet::new();
        params.add_with_default("type", query.post_type.to_wire(), PostType::All.to_wire());
        if let Some((name, id)) = cursor {
            params.add_with_default(name, id, 0);
        }
        params
            .add_with_default("offset", query.offset, 0)
            .add("limit", query.limit)
            .add_with_default("reblog_info", query.reblog_info, false)
            .add_with_default("notes_info", query.notes_info, false);

        let method = self.user_method("dashboard", token, HttpMethod::Get, params)?;
        let response: PostCollection = self.fetch(method).await?;
        Ok(response.posts)
    }

    pub async fn get_user_limits(&self) -> Result<UserLimits> {
        self.ensure_open()?;
        let token = self.require_token("get_user_limits")?;

        let method = self.user_method("limits", token, HttpMethod::Get, ParameterSet::new())?;
        let response: UserLimitsResponse = self.fetch(method).await?;
        Ok(response.user)
    }

    /// The current user's filter strings
    pub async fn get_filtered_content(&self) -> Result<Vec<String>> {
        self.ensure_open()?;
        let token = self.require_token("get_filtered_content")?;
        self.fetch_filtered_content(token).await
    }

    async fn fetch_filtered_content(&self, token: Token) -> Result<Vec<String>> {
        let method = self.user_method("filtered_content", token, HttpMethod::Get, ParameterSet::new())?;
        let response: FilteredContentResponse = self.fetch(method).await?;
        Ok(response.filtered_content)
    }

    /// Add several filter strings in one call.
    ///
    /// Every item is checked before anything is sent; the current filters
    /// are then fetched to enforce the overall limit.
    pub async fn set_filtered_content<I, S>(&self, items: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.ensure_open()?;
        let items = items
            .into_iter()
            .enumerate()
            .map(|(i, item)| -> Result<String> {
                let item = item.as_ref();
                check_filter_item("filtered_content", item).map_err(|e| match e {
                    TumblrError::Argument { name, message } => TumblrError::Argument {
                        name,
                        message: format!("item {}: {}", i, message),
                    },
                    other => other,
                })?;
                Ok(item.trim().to_string())
            })
            .collect::<Result<Vec<String>>>()?;
        if items.is_empty() {
            return Err(TumblrError::argument(
                "filtered_content",
                "at least one filter string is required",
            ));
        }
        if items.len() > MAX_FILTERED_CONTENT_COUNT {
            return Err(too_many_filters(0));
        }
        let token = self.require_token("set_filtered_content")?;

        let current = self.fetch_filtered_content(token.clone()).await?;
        if current.len() + items.len() > MAX_FILTERED_CONTENT_COUNT {
            return Err(too_many_filters(current.len()));
        }

        let mut params = ParameterSet::new();
        params.add_array("filtered_content", items);
        self.execute(self.user_method("filtered_content", token, HttpMethod::Post, params)?)
            .await
    }

    /// Add one filter string, rejecting exact duplicates of existing filters
    pub async fn add_filtered_content(&self, item: &str) -> Result<()> {
        self.ensure_open()?;
        check_filter_item("filtered_content", item)?;
        let token = self.require_token("add_filtered_content")?;

        let current = self.fetch_filtered_content(token.clone()).await?;
        if current.len() + 1 > MAX_FILTERED_CONTENT_COUNT {
            return Err(too_many_filters(current.len()));
        }

        let item = item.trim();
        if current.iter().any(|existing| existing == item) {
            return Err(TumblrError::argument(
                "filtered_content",
                format!("{} already exists", item),
            ));
        }

        let params = ParameterSet::new().with("filtered_content", item);
        self.execute(self.user_method("filtered_content", token, HttpMethod::Post, params)?)
            .await
    }

    pub async fn delete_filtered_content(&self, item: &str) -> Result<()> {
        self.ensure_open()?;
        check_filter_item("filtered_content", item)?;
        let token = self.require_token("delete_filtered_content")?;

        let params = ParameterSet::new().with("filtered_content", item);
        self.execute(self.user_method("filtered_content", token, HttpMethod::Delete, params)?)
            .await
    }

    // ---- tagged ----

    /// Posts with the given tag, newest first; page with `before`
    pub async fn get_tagged_posts(
        &self,
        tag: &str,
        before: Option<DateTime<Utc>>,
        limit: u32,
        filter: PostFilter,
    ) -> Result<Vec<Post>> {
        self.ensure_open()?;
        check_not_empty("tag", tag)?;
        check_limit(limit)?;

        let mut params = self.api_key_params();
        params
            .add("tag", tag)
            .add_opt("before", before.map(|t| t.timestamp()))
            .add("limit", limit)
            .add_with_default("filter", filter.to_wire(), PostFilter::Html.to_wire());

        let method = ApiMethod::tagged_at(&self.config.api_base_url, self.token.clone(), Some(params))?;
        self.fetch(method).await
    }
}

fn check_blog(blog_name: &str) -> Result<()> {
    validate_blog_name(blog_name).map(|_| ())
}

fn check_offset(offset: i64) -> Result<()> {
    check_non_negative("offset", offset)
}

fn check_limit(limit: u32) -> Result<()> {
    if limit == 0 || limit > MAX_PAGE_SIZE {
        return Err(TumblrError::argument(
            "limit",
            format!("limit must be between 1 and {}.", MAX_PAGE_SIZE),
        ));
    }
    Ok(())
}

fn check_id(name: &'static str, id: i64) -> Result<()> {
    if id <= 0 {
        return Err(TumblrError::argument(name, format!("{} must be greater than 0.", name)));
    }
    Ok(())
}

fn check_non_negative(name: &'static str, value: i64) -> Result<()> {
    if value < 0 {
        return Err(TumblrError::argument(
            name,
            format!("{} must be greater or equal to zero.", name),
        ));
    }
    Ok(())
}

fn check_not_empty(name: &'static str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(TumblrError::argument(name, format!("{} cannot be empty.", name)));
    }
    Ok(())
}

fn check_filter_item(name: &'static str, item: &str) -> Result<()> {
    if item.is_empty() {
        return Err(TumblrError::argument(name, "must not be empty"));
    }
    if item.trim().is_empty() {
        return Err(TumblrError::argument(name, "must not be whitespace"));
    }
    if item.chars().count() > MAX_FILTERED_CONTENT_LENGTH {
        return Err(TumblrError::argument(
            name,
            format!(
                "each filter string cannot be more than {} characters in length",
                MAX_FILTERED_CONTENT_LENGTH
            ),
        ));
    }
    Ok(())
}

fn too_many_filters(current: usize) -> TumblrError {
    TumblrError::argument(
        "filtered_content",
        format!(
            "each user can have a maximum of {} filter strings, {} left",
            MAX_FILTERED_CONTENT_COUNT,
            MAX_FILTERED_CONTENT_COUNT.saturating_sub(current)
        ),
    )
}

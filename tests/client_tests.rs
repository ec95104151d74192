//! Facade behavior against a scripted in-memory transport.

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tumblr_client::oauth::Clock;
use tumblr_client::{
    CancellationToken, Config, ConsumerCredentials, DashboardCursor, DashboardQuery, HttpMethod,
    HttpRequest, HttpResponse, HttpTransport, NotificationTypes, OAuthSigner, PostCreationState,
    PostFilter, PostType, PostsQuery, Result, Token, TumblrClient, TumblrError,
};

/// Replays canned responses in order and records every request
#[derive(Default)]
struct ScriptedTransport {
    responses: Mutex<VecDeque<(u16, Value)>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn respond(&self, response: Value) -> &Self {
        self.respond_with(200, response)
    }

    fn respond_with(&self, status: u16, response: Value) -> &Self {
        let msg = if status < 300 { "OK" } else { "Error" };
        let envelope = json!({
            "meta": {"status": status, "msg": msg},
            "response": response,
        });
        self.responses.lock().unwrap().push_back((status, envelope));
        self
    }

    fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: HttpRequest, cancel: &CancellationToken) -> Result<HttpResponse> {
        if cancel.is_cancelled() {
            return Err(TumblrError::Cancelled);
        }
        self.requests.lock().unwrap().push(request);
        let (status, body) = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or((200, json!({"meta": {"status": 200, "msg": "OK"}, "response": []})));
        Ok(HttpResponse {
            status,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: serde_json::to_vec(&body).unwrap(),
        })
    }
}

struct FixedClock(DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn consumer() -> ConsumerCredentials {
    ConsumerCredentials::new("ck", "cs").unwrap()
}

fn anonymous(transport: &Arc<ScriptedTransport>) -> TumblrClient {
    TumblrClient::with_transport(consumer(), None, Config::default(), transport.clone())
}

fn authorized(transport: &Arc<ScriptedTransport>) -> TumblrClient {
    TumblrClient::with_transport(
        consumer(),
        Some(Token::new("tk", "ts")),
        Config::default(),
        transport.clone(),
    )
}

fn text_posts(first_id: i64, count: usize) -> Vec<Value> {
    (0..count as i64)
        .map(|i| json!({"type": "text", "id": first_id + i, "body": "b"}))
        .collect()
}

fn query_value(request: &HttpRequest, name: &str) -> Option<String> {
    request
        .url
        .query_pairs()
        .find(|(n, _)| n == name)
        .map(|(_, v)| v.into_owned())
}

#[tokio::test]
async fn test_pagination_stops_on_empty_page() {
    init_tracing();
    let transport = ScriptedTransport::new();
    for (page, count) in [20usize, 20, 7, 0].into_iter().enumerate() {
        transport.respond(json!({
            "blog": {"name": "staff"},
            "total_posts": 47,
            "posts": text_posts(page as i64 * 100 + 1, count),
        }));
    }
    let client = anonymous(&transport);

    let mut offset = 0;
    let mut collected = Vec::new();
    loop {
        let query = PostsQuery::new().with_offset(offset);
        let page = client.get_posts("staff", &query).await.unwrap();
        if page.posts.is_empty() {
            break;
        }
        offset += page.posts.len() as i64;
        collected.extend(page.posts);
    }

    assert_eq!(transport.calls(), 4);
    assert_eq!(collected.len(), 47);

    let offsets: Vec<Option<String>> = transport
        .requests()
        .iter()
        .map(|r| query_value(r, "offset"))
        .collect();
    assert_eq!(
        offsets,
        vec![None, Some("20".to_string()), Some("40".to_string()), Some("47".to_string())]
    );
}

#[tokio::test]
async fn test_disposed_client_makes_no_calls() {
    let transport = ScriptedTransport::new();
    let client = authorized(&transport);
    assert!(!client.is_disposed());

    client.dispose();
    client.dispose();
    assert!(client.is_disposed());

    let err = client.get_blog_info("staff").await.unwrap_err();
    assert!(matches!(err, TumblrError::Disposed));
    assert!(err.is_invalid_operation());

    // Disposal wins over argument validation
    let err = client.get_posts("", &PostsQuery::new()).await.unwrap_err();
    assert!(matches!(err, TumblrError::Disposed));

    let err = client.get_user_info().await.unwrap_err();
    assert!(matches!(err, TumblrError::Disposed));
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn test_missing_token_is_invalid_operation() {
    let transport = ScriptedTransport::new();
    let client = anonymous(&transport);

    let err = client.get_user_info().await.unwrap_err();
    assert!(matches!(err, TumblrError::InvalidOperation(_)));

    let err = client.like(123, "key").await.unwrap_err();
    assert!(err.is_invalid_operation());

    let err = client.get_filtered_content().await.unwrap_err();
    assert!(err.is_invalid_operation());

    let err = client
        .get_notifications("staff", None, NotificationTypes::ALL)
        .await
        .unwrap_err();
    assert!(err.is_invalid_operation());

    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn test_argument_validation_makes_no_calls() {
    let transport = ScriptedTransport::new();
    let client = authorized(&transport);

    let err = client.get_blog_info("").await.unwrap_err();
    assert!(matches!(err, TumblrError::Argument { name: "blog_name", .. }));

    let err = client.get_blog_info("staff?x").await.unwrap_err();
    assert!(matches!(err, TumblrError::Argument { name: "blog_name", .. }));

    for limit in [0, 21] {
        let err = client
            .get_posts("staff", &PostsQuery::new().with_limit(limit))
            .await
            .unwrap_err();
        assert!(matches!(err, TumblrError::Argument { name: "limit", .. }));
    }

    let err = client.get_followers("staff", -1, 20).await.unwrap_err();
    assert!(matches!(err, TumblrError::Argument { name: "offset", .. }));

    let err = client.delete_post("staff", 0).await.unwrap_err();
    assert!(matches!(err, TumblrError::Argument { name: "id", .. }));

    let err = client.reorder_queue("staff", 10, -1).await.unwrap_err();
    assert!(matches!(err, TumblrError::Argument { name: "insert_after", .. }));

    let err = client.like(1, "").await.unwrap_err();
    assert!(matches!(err, TumblrError::Argument { name: "reblog_key", .. }));

    let err = client.block_blog("staff", "").await.unwrap_err();
    assert!(matches!(err, TumblrError::Argument { name: "blocked_blog", .. }));

    let err = client
        .get_notifications("staff", None, NotificationTypes::empty())
        .await
        .unwrap_err();
    assert!(matches!(err, TumblrError::Argument { name: "types", .. }));

    let err = client
        .get_dashboard_posts(&DashboardQuery::new().with_cursor(DashboardCursor::Before(-5)))
        .await
        .unwrap_err();
    assert!(matches!(err, TumblrError::Argument { name: "before_id", .. }));

    let err = client
        .get_tagged_posts("", None, 20, PostFilter::Html)
        .await
        .unwrap_err();
    assert!(matches!(err, TumblrError::Argument { name: "tag", .. }));

    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn test_filtered_content_item_too_long() {
    let transport = ScriptedTransport::new();
    let client = authorized(&transport);

    let long = "x".repeat(251);
    let err = client
        .set_filtered_content(["fine", long.as_str()])
        .await
        .unwrap_err();
    assert!(err.is_argument());

    let err = client.add_filtered_content(&long).await.unwrap_err();
    assert!(err.is_argument());

    let err = client.add_filtered_content("   ").await.unwrap_err();
    assert!(err.is_argument());

    let err = client.set_filtered_content(Vec::<String>::new()).await.unwrap_err();
    assert!(err.is_argument());

    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn test_filtered_content_count_limit() {
    let transport = ScriptedTransport::new();
    let client = authorized(&transport);

    // More than the limit on its own: rejected before fetching
    let items: Vec<String> = (0..201).map(|i| format!("word{}", i)).collect();
    let err = client.set_filtered_content(&items).await.unwrap_err();
    assert!(err.is_argument());
    assert_eq!(transport.calls(), 0);

    // Over the limit together with the current filters: only the fetch happens
    let current: Vec<String> = (0..199).map(|i| format!("old{}", i)).collect();
    transport.respond(json!({"filtered_content": current}));
    let err = client.set_filtered_content(["new1", "new2"]).await.unwrap_err();
    assert!(err.is_argument());
    assert_eq!(transport.calls(), 1);
    assert_eq!(transport.requests()[0].method, HttpMethod::Get);
}

#[tokio::test]
async fn test_filtered_content_duplicate() {
    let transport = ScriptedTransport::new();
    transport.respond(json!({"filtered_content": ["spoilers", "politics"]}));
    let client = authorized(&transport);

    let err = client.add_filtered_content("  spoilers ").await.unwrap_err();
    match err {
        TumblrError::Argument { message, .. } => assert!(message.contains("already exists")),
        other => panic!("expected an argument error, got {:?}", other),
    }
    assert_eq!(transport.calls(), 1);

    // Duplicates are case-sensitive
    transport
        .respond(json!({"filtered_content": ["spoilers"]}))
        .respond(json!([]));
    client.add_filtered_content("Spoilers").await.unwrap();

    let requests = transport.requests();
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[2].method, HttpMethod::Post);
    assert_eq!(requests[2].body.as_deref(), Some("filtered_content=Spoilers"));
}

#[tokio::test]
async fn test_set_filtered_content_posts_array() {
    let transport = ScriptedTransport::new();
    transport
        .respond(json!({"filtered_content": []}))
        .respond(json!([]));
    let client = authorized(&transport);

    client.set_filtered_content([" cats ", "dogs"]).await.unwrap();

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].url.path(), "/v2/user/filtered_content");
    assert_eq!(
        requests[1].body.as_deref(),
        Some("filtered_content%5B0%5D=cats&filtered_content%5B1%5D=dogs")
    );
}

#[tokio::test]
async fn test_get_requests_use_query_string() {
    let transport = ScriptedTransport::new();
    transport.respond(json!({"blog": {"name": "staff"}, "posts": []}));
    let client = anonymous(&transport);

    let query = PostsQuery::new()
        .with_type(PostType::Photo)
        .with_limit(5)
        .with_filter(PostFilter::Text)
        .with_tag("cats");
    client.get_posts("staff", &query).await.unwrap();

    let request = &transport.requests()[0];
    assert_eq!(request.method, HttpMethod::Get);
    assert_eq!(request.url.path(), "/v2/blog/staff.tumblr.com/posts/photo");
    assert_eq!(
        request.url.query(),
        Some("api_key=ck&limit=5&filter=text&tag=cats")
    );
    assert!(request.body.is_none());
    assert!(request.header("Authorization").is_none());
}

#[tokio::test]
async fn test_post_requests_use_signed_form_body() {
    let transport = ScriptedTransport::new();
    let client = authorized(&transport);

    client.like(123, "abc").await.unwrap();

    let request = &transport.requests()[0];
    assert_eq!(request.method, HttpMethod::Post);
    assert_eq!(request.url.as_str(), "https://api.tumblr.com/v2/user/like");
    assert_eq!(request.body.as_deref(), Some("id=123&reblog_key=abc"));
    assert_eq!(
        request.header("content-type"),
        Some("application/x-www-form-urlencoded")
    );
    let auth = request.header("Authorization").unwrap();
    assert!(auth.starts_with("OAuth "));
    assert!(auth.contains("oauth_consumer_key=\"ck\""));
    assert!(auth.contains("oauth_token=\"tk\""));
    assert!(auth.contains("oauth_signature=\""));
}

#[tokio::test]
async fn test_notification_types_are_expanded() {
    init_tracing();
    let transport = ScriptedTransport::new();
    transport.respond(json!({
        "notifications": [
            {"type": "like", "timestamp": 1600000000, "target_post_id": "42"},
            {"type": "brand_new_kind", "timestamp": 1599999999}
        ]
    }));
    let client = authorized(&transport);

    let before = Utc.with_ymd_and_hms(2020, 9, 13, 12, 26, 40).unwrap();
    let items = client
        .get_notifications(
            "staff",
            Some(before),
            NotificationTypes::FOLLOWER | NotificationTypes::LIKE,
        )
        .await
        .unwrap();

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].kind(), NotificationTypes::LIKE);
    assert_eq!(items[0].target_post_id, 42);
    assert!(items[1].kind().is_empty());
    assert_eq!(items[1].type_name, "brand_new_kind");

    let request = &transport.requests()[0];
    assert_eq!(request.url.path(), "/v2/blog/staff.tumblr.com/notifications");
    assert_eq!(
        request.url.query(),
        Some("before=1600000000&types%5B0%5D=like&types%5B1%5D=follower")
    );
}

#[tokio::test]
async fn test_all_notification_types_are_not_sent() {
    let transport = ScriptedTransport::new();
    transport.respond(json!({"notifications": []}));
    let client = authorized(&transport);

    client
        .get_notifications("staff", None, NotificationTypes::ALL)
        .await
        .unwrap();
    assert_eq!(transport.requests()[0].url.query(), None);
}

#[tokio::test]
async fn test_remove_block_without_blog_is_anonymous_only() {
    let transport = ScriptedTransport::new();
    let client = authorized(&transport);

    client.remove_block("staff", None).await.unwrap();
    client.remove_block("staff", Some("spammer")).await.unwrap();

    let requests = transport.requests();
    assert_eq!(requests[0].method, HttpMethod::Delete);
    assert_eq!(requests[0].body.as_deref(), Some("anonymous_only=true"));
    assert_eq!(
        requests[1].body.as_deref(),
        Some("blocked_tumblelog=spammer.tumblr.com")
    );
}

#[tokio::test]
async fn test_reblog_publish_on() {
    let now = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
    let signer = OAuthSigner::new(consumer()).with_clock(Arc::new(FixedClock(now)));
    let transport = ScriptedTransport::new();
    let client = authorized(&transport).with_signer(signer);

    let err = client
        .reblog_with_state(
            "staff",
            1,
            "key",
            PostCreationState::Queue,
            Some(now - Duration::hours(1)),
            None,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, TumblrError::Argument { name: "publish_on", .. }));
    assert_eq!(transport.calls(), 0);

    transport
        .respond(json!({"id": 11}))
        .respond(json!({"id": 12}));
    let later = now + Duration::days(1);
    let queued = client
        .reblog_with_state("staff", 1, "key", PostCreationState::Queue, Some(later), Some("nice"))
        .await
        .unwrap();
    assert_eq!(queued.id, 11);
    client
        .reblog_with_state("staff", 1, "key", PostCreationState::Draft, Some(later), None)
        .await
        .unwrap();

    let requests = transport.requests();
    assert_eq!(requests[0].url.path(), "/v2/blog/staff.tumblr.com/post/reblog");
    assert_eq!(
        requests[0].body.as_deref(),
        Some("id=1&reblog_key=key&comment=nice&state=queue&publish_on=Thu%2C%2011%20Jan%202024%2000%3A00%3A00%20%2B0000")
    );
    assert_eq!(
        requests[1].body.as_deref(),
        Some("id=1&reblog_key=key&state=draft")
    );
}

#[tokio::test]
async fn test_dashboard_cursor() {
    let transport = ScriptedTransport::new();
    transport.respond(json!({"posts": text_posts(1, 3)}));
    let client = authorized(&transport);

    let posts = client
        .get_dashboard_posts(
            &DashboardQuery::new()
                .with_cursor(DashboardCursor::Before(999))
                .with_limit(3)
                .with_type(PostType::Text),
        )
        .await
        .unwrap();
    assert_eq!(posts.len(), 3);

    let request = &transport.requests()[0];
    assert_eq!(request.url.path(), "/v2/user/dashboard");
    assert_eq!(
        request.url.query(),
        Some("type=text&before_id=999&limit=3")
    );
}

#[tokio::test]
async fn test_get_post_without_match() {
    let transport = ScriptedTransport::new();
    transport
        .respond(json!({"blog": {"name": "staff"}, "posts": []}))
        .respond(json!({"blog": {"name": "staff"}, "posts": text_posts(77, 1)}));
    let client = anonymous(&transport);

    assert!(client.get_post("staff", 77, false, false).await.unwrap().is_none());
    let post = client.get_post("staff", 77, true, false).await.unwrap().unwrap();
    assert_eq!(post.id(), 77);

    let requests = transport.requests();
    assert_eq!(requests[1].url.query(), Some("api_key=ck&id=77&reblog_info=true"));
}

#[tokio::test]
async fn test_api_error_surfaces_details() {
    let transport = ScriptedTransport::new();
    transport.respond_with(403, json!({"errors": [{"title": "Forbidden", "code": 5}]}));
    let client = authorized(&transport);

    let err = client.shuffle_queue("staff").await.unwrap_err();
    assert_eq!(err.status_code(), Some(403));
    assert!(matches!(err, TumblrError::Api { status: 403, .. }));
}

#[tokio::test]
async fn test_cancelled_token_stops_call() {
    let transport = ScriptedTransport::new();
    let client = authorized(&transport);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let post = tumblr_client::PostData::quote("to be or not to be", None).unwrap();
    let err = client
        .create_post_with_cancel("staff", &post, &cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, TumblrError::Cancelled));
    assert_eq!(transport.calls(), 0);
}

//! Request payloads for creating and editing posts.

use chrono::{DateTime, Utc};

use crate::convert::WireEnum;
use crate::error::{Result, TumblrError};
use crate::model::post::{PostCreationState, PostFormat, PostType};
use crate::params::ParameterSet;

/// Content and options of a post to create or edit.
///
/// Built through one constructor per post type, then refined with the
/// `with_*` setters:
///
/// ```
/// use tumblr_client::{PostCreationState, PostData};
///
/// let post = PostData::text("Hello from Rust", Some("Greetings"))?
///     .with_tags(["rust", "tumblr"])
///     .with_state(PostCreationState::Queue);
///
/// let params = post.to_parameter_set();
/// assert_eq!(params.get("type").map(|v| v.to_string()).as_deref(), Some("text"));
/// assert_eq!(params.get("tags").map(|v| v.to_string()).as_deref(), Some("rust,tumblr"));
/// # Ok::<(), tumblr_client::TumblrError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PostData {
    post_type: PostType,
    state: PostCreationState,
    format: PostFormat,
    tags: Vec<String>,
    date: Option<DateTime<Utc>>,
    slug: Option<String>,
    tweet: Option<String>,
    fields: ParameterSet,
}

impl PostData {
    fn new(post_type: PostType, fields: ParameterSet) -> Self {
        PostData {
            post_type,
            state: PostCreationState::Published,
            format: PostFormat::Html,
            tags: Vec::new(),
            date: None,
            slug: None,
            tweet: None,
            fields,
        }
    }

    /// Text post; `body` is required
    pub fn text(body: &str, title: Option<&str>) -> Result<Self> {
        require("body", body)?;
        let mut fields = ParameterSet::new();
        fields.add("body", body).add_opt("title", title);
        Ok(Self::new(PostType::Text, fields))
    }

    /// Photo post from an image hosted at `source`
    pub fn photo(source: &str, caption: Option<&str>, click_through_url: Option<&str>) -> Result<Self> {
        require("source", source)?;
        let mut fields = ParameterSet::new();
        fields
            .add("source", source)
            .add_opt("caption", caption)
            .add_opt("link", click_through_url);
        Ok(Self::new(PostType::Photo, fields))
    }

    /// Quote post
    pub fn quote(quote: &str, source: Option<&str>) -> Result<Self> {
        require("quote", quote)?;
        let mut fields = ParameterSet::new();
        fields.add("quote", quote).add_opt("source", source);
        Ok(Self::new(PostType::Quote, fields))
    }

    /// Link post
    pub fn link(url: &str, title: Option<&str>, description: Option<&str>) -> Result<Self> {
        require("url", url)?;
        let mut fields = ParameterSet::new();
        fields
            .add("url", url)
            .add_opt("title", title)
            .add_opt("description", description);
        Ok(Self::new(PostType::Link, fields))
    }

    /// Chat post; `conversation` holds one `label: phrase` line per message
    pub fn chat(conversation: &str, title: Option<&str>) -> Result<Self> {
        require("conversation", conversation)?;
        let mut fields = ParameterSet::new();
        fields.add("conversation", conversation).add_opt("title", title);
        Ok(Self::new(PostType::Chat, fields))
    }

    /// Audio post from an externally hosted track
    pub fn audio(external_url: &str, caption: Option<&str>) -> Result<Self> {
        require("external_url", external_url)?;
        let mut fields = ParameterSet::new();
        fields
            .add("external_url", external_url)
            .add_opt("caption", caption);
        Ok(Self::new(PostType::Audio, fields))
    }

    /// Video post from embed HTML or a video page URL
    pub fn video(embed: &str, caption: Option<&str>) -> Result<Self> {
        require("embed", embed)?;
        let mut fields = ParameterSet::new();
        fields.add("embed", embed).add_opt("caption", caption);
        Ok(Self::new(PostType::Video, fields))
    }

    pub fn with_state(mut self, state: PostCreationState) -> Self {
        self.state = state;
        self
    }

    pub fn with_format(mut self, format: PostFormat) -> Self {
        self.format = format;
        self
    }

    /// Replace the tags; blank entries are dropped
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags
            .into_iter()
            .map(Into::into)
            .map(|t: String| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        self
    }

    /// Publication date (for backdating or scheduled queue entries)
    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    /// Short text used in the post URL
    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    /// Custom text for the connected Twitter account, `"off"` disables cross-posting
    pub fn with_tweet(mut self, tweet: impl Into<String>) -> Self {
        self.tweet = Some(tweet.into());
        self
    }

    pub fn post_type(&self) -> PostType {
        self.post_type
    }

    pub fn state(&self) -> PostCreationState {
        self.state
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Encode into request parameters; platform defaults are left out
    pub fn to_parameter_set(&self) -> ParameterSet {
        let mut params = ParameterSet::new();
        params
            .add("type", self.post_type.to_wire())
            .add_with_default(
                "state",
                self.state.to_wire(),
                PostCreationState::Published.to_wire(),
            )
            .add_with_default("format", self.format.to_wire(), PostFormat::Html.to_wire());

        if !self.tags.is_empty() {
            params.add("tags", self.tags.join(","));
        }
        params
            .add_opt(
                "date",
                self.date
                    .map(|d| d.format("%Y-%m-%d %H:%M:%S GMT").to_string()),
            )
            .add_opt("slug", self.slug.as_deref())
            .add_opt("tweet", self.tweet.as_deref());

        for (name, value) in self.fields.iter() {
            params.add(name, value);
        }
        params
    }
}

fn require(name: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(TumblrError::argument(name, format!("{} cannot be empty.", name)));
    }
    Ok(())
}

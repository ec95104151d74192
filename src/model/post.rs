//! Posts and their kind-specific payloads.
//!
//! A post is decoded in two steps: the `type` discriminator is read first,
//! then the shared fields and the matching kind payload are decoded from the
//! same JSON object. Kinds this crate does not know are kept as
//! [`PostKind::Unknown`] with the raw object, so nothing is lost.

use serde::de::{self, Deserializer, Error as _};
use serde::ser::{Error as _, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::convert::{bool_lenient, lenient_wire, long_lenient, WireEnum};
use crate::model::note::Note;
use crate::model::trail::Trail;
use crate::time::Timestamp;
use crate::wire_enum_serde;

/// Post type, as used by listings and by post creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PostType {
    /// Any type; only meaningful as a listing filter
    #[default]
    All,
    Text,
    Quote,
    Link,
    Answer,
    Video,
    Audio,
    Photo,
    Chat,
}

impl WireEnum for PostType {
    const WIRE_TABLE: &'static [(Self, &'static str)] = &[
        (PostType::All, "all"),
        (PostType::Text, "text"),
        (PostType::Quote, "quote"),
        (PostType::Link, "link"),
        (PostType::Answer, "answer"),
        (PostType::Video, "video"),
        (PostType::Audio, "audio"),
        (PostType::Photo, "photo"),
        (PostType::Chat, "chat"),
    ];
    const TYPE_NAME: &'static str = "post type";
}

wire_enum_serde!(PostType);

/// Body format of a post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PostFormat {
    #[default]
    Html,
    Markdown,
    Raw,
}

impl WireEnum for PostFormat {
    const WIRE_TABLE: &'static [(Self, &'static str)] = &[
        (PostFormat::Html, "html"),
        (PostFormat::Markdown, "markdown"),
        (PostFormat::Raw, "raw"),
    ];
    const TYPE_NAME: &'static str = "post format";
}

wire_enum_serde!(PostFormat);

/// Publication state reported on a post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostState {
    Published,
    Queued,
    Draft,
    Private,
    Submission,
}

impl WireEnum for PostState {
    const WIRE_TABLE: &'static [(Self, &'static str)] = &[
        (PostState::Published, "published"),
        (PostState::Queued, "queued"),
        (PostState::Draft, "draft"),
        (PostState::Private, "private"),
        (PostState::Submission, "submission"),
    ];
    const TYPE_NAME: &'static str = "post state";
}

wire_enum_serde!(PostState);

/// State requested when creating or reblogging a post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PostCreationState {
    #[default]
    Published,
    Draft,
    Queue,
    Private,
}

impl WireEnum for PostCreationState {
    const WIRE_TABLE: &'static [(Self, &'static str)] = &[
        (PostCreationState::Published, "published"),
        (PostCreationState::Draft, "draft"),
        (PostCreationState::Queue, "queue"),
        (PostCreationState::Private, "private"),
    ];
    const TYPE_NAME: &'static str = "post creation state";
}

wire_enum_serde!(PostCreationState);

/// Format in which listings return post bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PostFilter {
    #[default]
    Html,
    Text,
    Raw,
}

impl WireEnum for PostFilter {
    const WIRE_TABLE: &'static [(Self, &'static str)] = &[
        (PostFilter::Html, "html"),
        (PostFilter::Text, "text"),
        (PostFilter::Raw, "raw"),
    ];
    const TYPE_NAME: &'static str = "post filter";
}

wire_enum_serde!(PostFilter);

/// Fields every post carries regardless of its kind
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostCommon {
    pub blog_name: String,
    #[serde(with = "long_lenient")]
    pub id: i64,
    pub post_url: String,
    pub short_url: String,
    pub slug: String,
    pub summary: String,
    pub timestamp: Timestamp,
    pub date: String,
    #[serde(deserialize_with = "lenient_wire", skip_serializing_if = "Option::is_none")]
    pub format: Option<PostFormat>,
    #[serde(deserialize_with = "lenient_wire", skip_serializing_if = "Option::is_none")]
    pub state: Option<PostState>,
    pub reblog_key: String,
    pub tags: Vec<String>,
    #[serde(with = "bool_lenient")]
    pub bookmarklet: bool,
    #[serde(with = "bool_lenient")]
    pub mobile: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_title: Option<String>,
    #[serde(with = "bool_lenient")]
    pub liked: bool,
    #[serde(with = "bool_lenient")]
    pub followed: bool,
    #[serde(with = "long_lenient")]
    pub note_count: i64,
    pub trail: Vec<Trail>,
    pub notes: Vec<Note>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reblogged_from_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reblogged_root_name: Option<String>,
}

/// A decoded post: shared fields plus the kind-specific payload
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub common: PostCommon,
    pub kind: PostKind,
}

/// Kind-specific payload of a post
#[derive(Debug, Clone, PartialEq)]
pub enum PostKind {
    Text(TextPost),
    Photo(PhotoPost),
    Quote(QuotePost),
    Link(LinkPost),
    Answer(AnswerPost),
    Video(VideoPost),
    Audio(AudioPost),
    Chat(ChatPost),
    /// A type this crate does not know; `raw` is the complete post object
    Unknown { type_name: String, raw: Value },
}

impl Post {
    pub fn id(&self) -> i64 {
        self.common.id
    }

    /// Wire type token (`"text"`, `"photo"`, ... or the unknown type's own token)
    pub fn type_name(&self) -> &str {
        match &self.kind {
            PostKind::Unknown { type_name, .. } => type_name.as_str(),
            kind => kind.post_type().map(|t| t.to_wire()).unwrap_or_default(),
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self.kind, PostKind::Unknown { .. })
    }
}

impl PostKind {
    /// The matching [`PostType`], `None` for [`PostKind::Unknown`]
    pub fn post_type(&self) -> Option<PostType> {
        match self {
            PostKind::Text(_) => Some(PostType::Text),
            PostKind::Photo(_) => Some(PostType::Photo),
            PostKind::Quote(_) => Some(PostType::Quote),
            PostKind::Link(_) => Some(PostType::Link),
            PostKind::Answer(_) => Some(PostType::Answer),
            PostKind::Video(_) => Some(PostType::Video),
            PostKind::Audio(_) => Some(PostType::Audio),
            PostKind::Chat(_) => Some(PostType::Chat),
            PostKind::Unknown { .. } => None,
        }
    }

    /// Decode the payload for the given type token from the full post object
    fn decode(type_name: &str, object: &Value) -> Result<Self, serde_json::Error> {
        let kind = match PostType::from_wire(type_name) {
            Some(PostType::Text) => PostKind::Text(TextPost::deserialize(object)?),
            Some(PostType::Photo) => PostKind::Photo(PhotoPost::deserialize(object)?),
            Some(PostType::Quote) => PostKind::Quote(QuotePost::deserialize(object)?),
            Some(PostType::Link) => PostKind::Link(LinkPost::deserialize(object)?),
            Some(PostType::Answer) => PostKind::Answer(AnswerPost::deserialize(object)?),
            Some(PostType::Video) => PostKind::Video(VideoPost::deserialize(object)?),
            Some(PostType::Audio) => PostKind::Audio(AudioPost::deserialize(object)?),
            Some(PostType::Chat) => PostKind::Chat(ChatPost::deserialize(object)?),
            Some(PostType::All) | None => {
                tracing::warn!(post_type = %type_name, "unknown post type, keeping raw payload");
                PostKind::Unknown {
                    type_name: type_name.to_string(),
                    raw: object.clone(),
                }
            }
        };
        Ok(kind)
    }

    fn to_value(&self) -> Result<Value, serde_json::Error> {
        match self {
            PostKind::Text(p) => serde_json::to_value(p),
            PostKind::Photo(p) => serde_json::to_value(p),
            PostKind::Quote(p) => serde_json::to_value(p),
            PostKind::Link(p) => serde_json::to_value(p),
            PostKind::Answer(p) => serde_json::to_value(p),
            PostKind::Video(p) => serde_json::to_value(p),
            PostKind::Audio(p) => serde_json::to_value(p),
            PostKind::Chat(p) => serde_json::to_value(p),
            PostKind::Unknown { raw, .. } => Ok(raw.clone()),
        }
    }
}

impl<'de> Deserialize<'de> for Post {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let object = Value::deserialize(deserializer)?;
        let type_name = match object.get("type") {
            Some(Value::String(t)) => t.clone(),
            Some(other) => {
                return Err(de::Error::custom(format!(
                    "post `type` must be a string, got {}",
                    other
                )))
            }
            None => return Err(de::Error::missing_field("type")),
        };

        let kind = PostKind::decode(&type_name, &object).map_err(D::Error::custom)?;
        let common = PostCommon::deserialize(&object).map_err(D::Error::custom)?;

        Ok(Post { common, kind })
    }
}

impl Serialize for Post {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut object = match self.kind.to_value().map_err(S::Error::custom)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        if let Value::Object(common) = serde_json::to_value(&self.common).map_err(S::Error::custom)? {
            object.extend(common);
        }
        object.insert("type".to_string(), Value::from(self.type_name()));
        object.serialize(serializer)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextPost {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub body: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotoPost {
    pub caption: String,
    pub photos: Vec<Photo>,
    #[serde(with = "long_lenient")]
    pub width: i64,
    #[serde(with = "long_lenient")]
    pub height: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_permalink: Option<String>,
}

/// One image of a photo or link post
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Photo {
    pub caption: String,
    pub original_size: PhotoInfo,
    pub alt_sizes: Vec<PhotoInfo>,
    /// Camera metadata, present when the uploader kept it
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub exif: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotoInfo {
    #[serde(with = "long_lenient")]
    pub width: i64,
    #[serde(with = "long_lenient")]
    pub height: i64,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuotePost {
    pub text: String,
    pub source: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkPost {
    pub title: String,
    pub url: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    pub photos: Vec<Photo>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnswerPost {
    pub asking_name: String,
    pub asking_url: Option<String>,
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoPost {
    pub caption: String,
    pub player: Vec<VideoPlayer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permalink_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(with = "long_lenient")]
    pub thumbnail_width: i64,
    #[serde(with = "long_lenient")]
    pub thumbnail_height: i64,
}

/// Embed code for one player width
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoPlayer {
    /// Pixel width, or a token such as `"100%"` for responsive players
    pub width: Value,
    pub embed_code: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioPost {
    pub caption: String,
    pub player: String,
    #[serde(with = "long_lenient")]
    pub plays: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album_art: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_name: Option<String>,
    #[serde(with = "long_lenient")]
    pub track_number: i64,
    #[serde(with = "long_lenient")]
    pub year: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_source_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatPost {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub body: String,
    pub dialogue: Vec<DialogueLine>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogueLine {
    pub name: String,
    pub label: String,
    pub phrase: String,
}

/// Result of creating, editing or reblogging a post
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostCreationInfo {
    #[serde(default, with = "long_lenient")]
    pub id: i64,
}

/// `{"posts": [...]}` payload of the non-blog listings
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct PostCollection {
    #[serde(default)]
    pub posts: Vec<Post>,
}

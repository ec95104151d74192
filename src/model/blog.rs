use serde::{Deserialize, Serialize};

use crate::convert::{bool_lenient, bool_string, long_lenient};
use crate::model::links::Links;
use crate::model::post::Post;
use crate::model::trail::Theme;
use crate::time::Timestamp;

/// Fields shared by every blog record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogBase {
    pub name: String,
    pub title: String,
    pub description: String,
    pub url: String,
    pub uuid: String,
    pub updated: Timestamp,
}

/// Public information about a blog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogInfo {
    #[serde(flatten)]
    pub base: BlogBase,
    #[serde(with = "long_lenient")]
    pub posts: i64,
    #[serde(with = "long_lenient")]
    pub total_posts: i64,
    #[serde(with = "long_lenient")]
    pub likes: i64,
    #[serde(with = "bool_lenient")]
    pub ask: bool,
    #[serde(with = "bool_lenient")]
    pub ask_anon: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ask_page_title: Option<String>,
    #[serde(with = "bool_lenient")]
    pub is_nsfw: bool,
    #[serde(with = "bool_lenient")]
    pub share_likes: bool,
    #[serde(with = "bool_lenient")]
    pub followed: bool,
    #[serde(with = "bool_lenient")]
    pub is_blocked_from_primary: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
}

/// A follower of a blog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Follower {
    pub name: String,
    pub url: String,
    pub updated: Timestamp,
    #[serde(with = "bool_lenient")]
    pub following: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Followers {
    #[serde(with = "long_lenient")]
    pub total_users: i64,
    pub users: Vec<Follower>,
}

/// Blogs followed by the current user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Following {
    #[serde(with = "long_lenient")]
    pub total_blogs: i64,
    pub blogs: Vec<BlogBase>,
}

/// Liked posts of a blog or of the current user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Likes {
    pub liked_posts: Vec<Post>,
    #[serde(with = "long_lenient")]
    pub liked_count: i64,
    #[serde(rename = "_links", skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
}

/// One page of a blog's posts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Posts {
    pub blog: BlogBase,
    pub posts: Vec<Post>,
    #[serde(with = "long_lenient")]
    pub total_posts: i64,
    #[serde(rename = "_links", skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct BlogInfoResponse {
    #[serde(default)]
    pub blog: BlogInfo,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct BlocksResponse {
    #[serde(default)]
    pub blocked_tumblelogs: Vec<BlogBase>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct FollowedBy {
    #[serde(default, with = "bool_string")]
    pub followed_by: bool,
}

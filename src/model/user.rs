use serde::{Deserialize, Serialize};

use crate::convert::{bool_lenient, lenient_wire, long_lenient};
use crate::model::blog::BlogBase;
use crate::model::post::PostFormat;
use crate::time::Timestamp;

/// The authenticated user and the blogs they own
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserInfo {
    pub name: String,
    #[serde(with = "long_lenient")]
    pub likes: i64,
    #[serde(with = "long_lenient")]
    pub following: i64,
    #[serde(deserialize_with = "lenient_wire", skip_serializing_if = "Option::is_none")]
    pub default_post_format: Option<PostFormat>,
    pub blogs: Vec<UserBlogInfo>,
}

impl UserInfo {
    /// The user's primary blog
    pub fn primary_blog(&self) -> Option<&UserBlogInfo> {
        self.blogs.iter().find(|b| b.primary)
    }
}

/// A blog as listed in [`UserInfo`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserBlogInfo {
    #[serde(flatten)]
    pub base: BlogBase,
    #[serde(with = "bool_lenient")]
    pub primary: bool,
    #[serde(with = "bool_lenient")]
    pub admin: bool,
    #[serde(with = "long_lenient")]
    pub followers: i64,
    #[serde(with = "long_lenient")]
    pub posts: i64,
    #[serde(with = "long_lenient")]
    pub drafts: i64,
    #[serde(with = "long_lenient")]
    pub queue: i64,
    #[serde(with = "long_lenient")]
    pub messages: i64,
    #[serde(rename = "type")]
    pub blog_type: String,
}

/// Posting limits of the authenticated user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserLimits {
    pub blogs: UserLimit,
    pub follows: UserLimit,
    pub likes: UserLimit,
    pub photos: UserLimit,
    pub posts: UserLimit,
    #[serde(rename = "video_Seconds", alias = "video_seconds")]
    pub video_seconds: UserLimit,
    pub videos: UserLimit,
}

/// One rate limit: quota, remaining budget and reset instant
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserLimit {
    pub description: String,
    #[serde(with = "long_lenient")]
    pub limit: i64,
    #[serde(with = "long_lenient")]
    pub remaining: i64,
    pub reset_at: Timestamp,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct UserInfoResponse {
    #[serde(default)]
    pub user: UserInfo,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct UserLimitsResponse {
    #[serde(default)]
    pub user: UserLimits,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct FilteredContentResponse {
    #[serde(default)]
    pub filtered_content: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_info_decode() {
        let json = r#"{
            "user": {
                "name": "derekg",
                "likes": 25,
                "following": "263",
                "default_post_format": "html",
                "blogs": [
                    {"name": "derekg", "url": "https://derekg.org/", "primary": true, "followers": 33004929, "type": "public"},
                    {"name": "side", "primary": false}
                ]
            }
        }"#;
        let response: UserInfoResponse = serde_json::from_str(json).unwrap();
        let user = response.user;
        assert_eq!(user.following, 263);
        assert_eq!(user.default_post_format, Some(PostFormat::Html));
        let primary = user.primary_blog().unwrap();
        assert_eq!(primary.base.name, "derekg");
        assert_eq!(primary.followers, 33004929);
        assert_eq!(primary.blog_type, "public");
    }

    #[test]
    fn test_user_limits_decode() {
        let json = r#"{
            "user": {
                "posts": {"description": "Total posts per day", "limit": 250, "remaining": 249, "reset_at": 1597242491},
                "video_Seconds": {"description": "Seconds of video", "limit": "600", "remaining": "600", "reset_at": "1597242491"}
            }
        }"#;
        let response: UserLimitsResponse = serde_json::from_str(json).unwrap();
        let limits = response.user;
        assert_eq!(limits.posts.remaining, 249);
        assert_eq!(limits.video_seconds.limit, 600);
        assert_eq!(limits.video_seconds.reset_at.unix(), 1597242491);
        assert_eq!(limits.blogs, UserLimit::default());
    }

    #[test]
    fn test_filtered_content_decode() {
        let json = r#"{"filtered_content": ["spoilers", "politics"]}"#;
        let response: FilteredContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.filtered_content, vec!["spoilers", "politics"]);
    }
}

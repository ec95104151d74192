use serde::{Deserialize, Serialize};

use crate::convert::{bool_lenient, long_lenient, long_string, string_lenient};

/// Blog theme as embedded in trails and blog records
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub avatar_shape: String,
    pub background_color: String,
    pub body_font: String,
    #[serde(with = "string_lenient")]
    pub header_bounds: String,
    #[serde(with = "long_lenient")]
    pub header_focus_height: i64,
    #[serde(with = "long_lenient")]
    pub header_focus_width: i64,
    #[serde(with = "long_lenient")]
    pub header_full_height: i64,
    #[serde(with = "long_lenient")]
    pub header_full_width: i64,
    pub header_image: String,
    pub header_image_focused: String,
    pub header_image_scaled: String,
    #[serde(with = "bool_lenient")]
    pub header_stretch: bool,
    pub link_color: String,
    #[serde(with = "bool_lenient")]
    pub show_avatar: bool,
    #[serde(with = "bool_lenient")]
    pub show_description: bool,
    #[serde(with = "bool_lenient")]
    pub show_header_image: bool,
    #[serde(with = "bool_lenient")]
    pub show_title: bool,
    pub title_color: String,
    pub title_font: String,
    pub title_font_weight: String,
}

/// One step of a reblog chain
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Trail {
    pub blog: TrailBlog,
    pub post: TrailPost,
    pub content_raw: String,
    pub content: String,
    #[serde(with = "bool_lenient")]
    pub is_root_item: bool,
    #[serde(with = "bool_lenient")]
    pub is_current_item: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailBlog {
    pub name: String,
    #[serde(with = "bool_lenient")]
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
    #[serde(with = "bool_lenient")]
    pub share_likes: bool,
    #[serde(with = "bool_lenient")]
    pub share_following: bool,
    #[serde(with = "bool_lenient")]
    pub can_be_followed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailPost {
    /// Sent as a string by the platform
    #[serde(with = "long_string")]
    pub id: i64,
}

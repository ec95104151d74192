//! Typed models of the API payloads.
//!
//! All models decode leniently: absent fields take their defaults and the
//! platform's stringly-typed scalars go through the codecs in
//! [`crate::convert`].

pub mod blog;
pub mod links;
pub mod note;
pub mod notification;
pub mod post;
pub mod post_data;
pub mod trail;
pub mod user;

pub use blog::{BlogBase, BlogInfo, Follower, Followers, Following, Likes, Posts};
pub use links::{Link, Links, QueryParams};
pub use note::{Note, NoteType};
pub use notification::{Notification, NotificationTypes};
pub use post::{
    AnswerPost, AudioPost, ChatPost, DialogueLine, LinkPost, Photo, PhotoInfo, PhotoPost, Post,
    PostCommon, PostCreationInfo, PostCreationState, PostFilter, PostFormat, PostKind, PostState,
    PostType, QuotePost, TextPost, VideoPlayer, VideoPost,
};
pub use post_data::PostData;
pub use trail::{Theme, Trail, TrailBlog, TrailPost};
pub use user::{UserBlogInfo, UserInfo, UserLimit, UserLimits};

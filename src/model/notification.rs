use serde::de::{self, Deserializer, SeqAccess, Visitor};
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

use crate::convert::{bool_lenient, bool_string, lenient_wire, long_lenient, long_string};
use crate::model::post::PostType;
use crate::time::Timestamp;

/// Set of notification types, one bit per type.
///
/// Used both as a request filter (`types[i]` parameters) and as the decoded
/// type of a single [`Notification`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NotificationTypes(u32);

impl NotificationTypes {
    pub const LIKE: Self = Self(1 << 0);
    pub const REPLY: Self = Self(1 << 1);
    pub const FOLLOWER: Self = Self(1 << 2);
    pub const MENTION_IN_REPLY: Self = Self(1 << 3);
    pub const MENTION_IN_POST: Self = Self(1 << 4);
    pub const REBLOG_NAKED: Self = Self(1 << 5);
    pub const REBLOG_WITH_CONTENT: Self = Self(1 << 6);
    pub const ASK: Self = Self(1 << 7);
    pub const ANSWERED_ASK: Self = Self(1 << 8);
    pub const NEW_GROUP_BLOG_MEMBER: Self = Self(1 << 9);
    pub const POST_ATTRIBUTION: Self = Self(1 << 10);
    pub const POST_FLAGGED: Self = Self(1 << 11);
    pub const POST_APPEAL_ACCEPTED: Self = Self(1 << 12);
    pub const POST_APPEAL_REJECTED: Self = Self(1 << 13);
    pub const WHAT_YOU_MISSED: Self = Self(1 << 14);
    pub const CONVERSATIONAL_NOTE: Self = Self(1 << 15);
    pub const MILESTONE_BIRTHDAY: Self = Self(1 << 16);

    /// Every known type
    pub const ALL: Self = Self((1 << 17) - 1);

    /// Flags and wire tokens in declaration order
    pub const WIRE_TABLE: [(Self, &'static str); 17] = [
        (Self::LIKE, "like"),
        (Self::REPLY, "reply"),
        (Self::FOLLOWER, "follower"),
        (Self::MENTION_IN_REPLY, "mention_in_reply"),
        (Self::MENTION_IN_POST, "mention_in_post"),
        (Self::REBLOG_NAKED, "reblog_naked"),
        (Self::REBLOG_WITH_CONTENT, "reblog_with_content"),
        (Self::ASK, "ask"),
        (Self::ANSWERED_ASK, "answered_ask"),
        (Self::NEW_GROUP_BLOG_MEMBER, "new_group_blog_member"),
        (Self::POST_ATTRIBUTION, "post_attribution"),
        (Self::POST_FLAGGED, "post_flagged"),
        (Self::POST_APPEAL_ACCEPTED, "post_appeal_accepted"),
        (Self::POST_APPEAL_REJECTED, "post_appeal_rejected"),
        (Self::WHAT_YOU_MISSED, "what_you_missed"),
        (Self::CONVERSATIONAL_NOTE, "conversational_note"),
        (Self::MILESTONE_BIRTHDAY, "milestone_birthday"),
    ];

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn bits(&self) -> u32 {
        self.0
    }

    /// Build from raw bits, dropping bits that name no type
    pub const fn from_bits_truncate(bits: u32) -> Self {
        Self(bits & Self::ALL.0)
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_all(&self) -> bool {
        self.0 == Self::ALL.0
    }

    pub const fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }

    /// Single flags set in `self`, in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (Self, &'static str)> + '_ {
        Self::WIRE_TABLE
            .iter()
            .copied()
            .filter(move |(flag, _)| self.contains(*flag))
    }

    /// Wire tokens, one per set bit, in declaration order
    pub fn to_wire_array(&self) -> Vec<&'static str> {
        self.iter().map(|(_, token)| token).collect()
    }

    /// Flag for a single wire token
    pub fn from_wire(token: &str) -> Option<Self> {
        Self::WIRE_TABLE
            .iter()
            .find(|(_, t)| *t == token)
            .map(|(flag, _)| *flag)
    }

    /// Union of the flags named by `tokens`; the first unknown token is returned as the error
    pub fn from_wire_array<I, S>(tokens: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        tokens.into_iter().try_fold(Self::empty(), |acc, token| {
            let token = token.as_ref();
            Self::from_wire(token)
                .map(|flag| acc | flag)
                .ok_or_else(|| token.to_string())
        })
    }
}

impl BitOr for NotificationTypes {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for NotificationTypes {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for NotificationTypes {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl fmt::Debug for NotificationTypes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("NotificationTypes(empty)");
        }
        write!(f, "NotificationTypes({})", self.to_wire_array().join(" | "))
    }
}

/// Serialized as the array of wire tokens
impl Serialize for NotificationTypes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let tokens = self.to_wire_array();
        let mut seq = serializer.serialize_seq(Some(tokens.len()))?;
        for token in tokens {
            seq.serialize_element(token)?;
        }
        seq.end()
    }
}

struct TypesVisitor;

impl<'de> Visitor<'de> for TypesVisitor {
    type Value = NotificationTypes;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a notification type token or an array of tokens")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        NotificationTypes::from_wire(v)
            .ok_or_else(|| E::custom(format!("unknown notification type: {:?}", v)))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut types = NotificationTypes::empty();
        while let Some(token) = seq.next_element::<String>()? {
            match NotificationTypes::from_wire(&token) {
                Some(flag) => types |= flag,
                None => tracing::warn!(token = %token, "unknown notification type ignored"),
            }
        }
        Ok(types)
    }
}

/// Accepts a single token or an array of tokens
impl<'de> Deserialize<'de> for NotificationTypes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(TypesVisitor)
    }
}

/// One activity item of a blog.
///
/// Which optional fields are present depends on the type; absent fields keep
/// their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Notification {
    /// Wire type token; kept verbatim so types unknown to this crate survive decoding
    #[serde(rename = "type")]
    pub type_name: String,
    pub timestamp: Timestamp,
    pub before: Timestamp,
    #[serde(with = "long_string")]
    pub target_post_id: i64,
    pub target_post_summary: String,
    pub target_tumblelog_name: String,
    pub target_tumblelog_uuid: String,
    pub from_tumblelog_name: String,
    pub from_tumblelog_uuid: String,
    #[serde(with = "bool_string")]
    pub from_tumblelog_is_adult: bool,
    #[serde(with = "bool_string")]
    pub followed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_root_post_id: Option<i64>,
    #[serde(with = "bool_lenient")]
    pub private_channel: bool,
    #[serde(deserialize_with = "lenient_wire", skip_serializing_if = "Option::is_none")]
    pub target_post_type: Option<PostType>,
    #[serde(deserialize_with = "lenient_wire", skip_serializing_if = "Option::is_none")]
    pub post_type: Option<PostType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_url_large: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reblog_key: Option<String>,
    #[serde(with = "long_lenient")]
    pub post_id: i64,
    pub post_tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub added_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_text: Option<String>,
}

impl Notification {
    /// Decoded type flag; empty for types unknown to this crate
    pub fn kind(&self) -> NotificationTypes {
        NotificationTypes::from_wire(&self.type_name).unwrap_or_else(|| {
            tracing::warn!(token = %self.type_name, "unknown notification type");
            NotificationTypes::empty()
        })
    }

    pub fn is_known(&self) -> bool {
        NotificationTypes::from_wire(&self.type_name).is_some()
    }

    /// Cursor for the next older page: pass it as `before`
    pub fn cursor(&self) -> Timestamp {
        self.timestamp
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct NotificationsResponse {
    #[serde(default)]
    pub notifications: Vec<Notification>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_array_in_declaration_order() {
        let types = NotificationTypes::FOLLOWER | NotificationTypes::LIKE;
        assert_eq!(types.to_wire_array(), vec!["like", "follower"]);

        let back = NotificationTypes::from_wire_array(["like", "follower"]).unwrap();
        assert_eq!(back, types);
    }

    #[test]
    fn test_all_covers_every_token() {
        let all = NotificationTypes::ALL.to_wire_array();
        assert_eq!(all.len(), 17);
        assert_eq!(all.first(), Some(&"like"));
        assert_eq!(all.last(), Some(&"milestone_birthday"));
        assert!(NotificationTypes::from_wire_array(all).unwrap().is_all());
    }

    #[test]
    fn test_from_wire_array_rejects_unknown() {
        let err = NotificationTypes::from_wire_array(["like", "poke"]).unwrap_err();
        assert_eq!(err, "poke");
    }

    #[test]
    fn test_flag_operations() {
        let mut types = NotificationTypes::empty();
        assert!(types.is_empty());
        types.insert(NotificationTypes::ASK);
        types |= NotificationTypes::REPLY;
        assert!(types.contains(NotificationTypes::ASK));
        assert!(!types.contains(NotificationTypes::LIKE));
        types.remove(NotificationTypes::ASK);
        assert_eq!(types, NotificationTypes::REPLY);
        assert_eq!(
            NotificationTypes::from_bits_truncate(u32::MAX),
            NotificationTypes::ALL
        );
        assert_eq!(format!("{:?}", types), "NotificationTypes(reply)");
    }

    #[test]
    fn test_types_serde() {
        let types = NotificationTypes::ASK | NotificationTypes::LIKE;
        let json = serde_json::to_string(&types).unwrap();
        assert_eq!(json, r#"["like","ask"]"#);
        let back: NotificationTypes = serde_json::from_str(&json).unwrap();
        assert_eq!(back, types);

        let single: NotificationTypes = serde_json::from_str(r#""reblog_naked""#).unwrap();
        assert_eq!(single, NotificationTypes::REBLOG_NAKED);
    }

    #[test]
    fn test_notification_decode() {
        let json = r#"{
            "type": "like",
            "timestamp": 1597242491,
            "before": 1597242000,
            "target_post_id": "123456789012",
            "target_tumblelog_name": "staff",
            "from_tumblelog_name": "fan",
            "from_tumblelog_is_adult": "false",
            "followed": "TRUE",
            "target_post_type": "photo",
            "media_url": "https://64.media.tumblr.com/a_75sq.jpg",
            "private_channel": false
        }"#;
        let n: Notification = serde_json::from_str(json).unwrap();
        assert_eq!(n.kind(), NotificationTypes::LIKE);
        assert!(n.is_known());
        assert_eq!(n.target_post_id, 123456789012);
        assert!(n.followed);
        assert_eq!(n.target_post_type, Some(PostType::Photo));
        assert_eq!(n.cursor().unix(), 1597242491);
        assert!(n.reply_text.is_none());
    }

    #[test]
    fn test_unknown_notification_type_survives() {
        let json = r#"{"type": "poke", "timestamp": 10, "target_post_id": ""}"#;
        let n: Notification = serde_json::from_str(json).unwrap();
        assert_eq!(n.type_name, "poke");
        assert!(!n.is_known());
        assert!(n.kind().is_empty());
        assert_eq!(n.target_post_id, 0);
    }
}

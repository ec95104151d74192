use serde::{Deserialize, Serialize};

use crate::convert::{bool_lenient, lenient_wire, WireEnum};
use crate::time::Timestamp;
use crate::wire_enum_serde;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteType {
    Like,
    Reblog,
    Posted,
    Reply,
    Answer,
}

impl WireEnum for NoteType {
    const WIRE_TABLE: &'static [(Self, &'static str)] = &[
        (NoteType::Like, "like"),
        (NoteType::Reblog, "reblog"),
        (NoteType::Posted, "posted"),
        (NoteType::Reply, "reply"),
        (NoteType::Answer, "answer"),
    ];
    const TYPE_NAME: &'static str = "note type";
}

wire_enum_serde!(NoteType);

/// A note (like, reblog, reply) attached to a post when `notes_info` is requested
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Note {
    /// `None` for note kinds this crate does not know yet
    #[serde(rename = "type", deserialize_with = "lenient_wire")]
    pub note_type: Option<NoteType>,
    pub timestamp: Timestamp,
    pub blog_name: String,
    pub blog_uuid: String,
    pub blog_url: String,
    #[serde(with = "bool_lenient")]
    pub followed: bool,
    pub avatar_shape: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reblog_parent_blog_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_decode() {
        let json = r#"[
            {"type": "reblog", "timestamp": 1597242491, "blog_name": "a", "followed": "false",
             "post_id": "123", "reblog_parent_blog_name": "staff"},
            {"type": "like", "timestamp": "1597242400", "blog_name": "b"},
            {"type": "pinned_by_staff", "timestamp": 1, "blog_name": "c"}
        ]"#;
        let notes: Vec<Note> = serde_json::from_str(json).unwrap();
        assert_eq!(notes[0].note_type, Some(NoteType::Reblog));
        assert_eq!(notes[0].post_id.as_deref(), Some("123"));
        assert_eq!(notes[1].note_type, Some(NoteType::Like));
        assert_eq!(notes[1].timestamp.unix(), 1597242400);
        assert_eq!(notes[2].note_type, None);
    }

    #[test]
    fn test_note_type_tokens() {
        assert_eq!(NoteType::Posted.to_string(), "posted");
        assert_eq!(NoteType::from_wire("reply"), Some(NoteType::Reply));
        assert_eq!(NoteType::from_wire("Reply"), None);
    }
}

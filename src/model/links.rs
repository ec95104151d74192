use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::convert::long_lenient;
use crate::time::Timestamp;

/// `_links` block attached to paged listings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Links {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<Link>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<Link>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terms_of_service: Option<Link>,
}

/// A navigation link: `{"type": "api", "method": "GET", "href": ..., "query_params": {...}}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Link {
    #[serde(rename = "type")]
    pub link_type: String,
    pub method: String,
    pub href: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_params: Option<QueryParams>,
}

/// Cursor carried by a navigation link
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryParams {
    #[serde(default, with = "long_lenient")]
    pub offset: i64,
    #[serde(default, with = "long_lenient")]
    pub limit: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<Timestamp>,

    /// Endpoint-specific cursor fields (`before_id`, `page_number`, ...)
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

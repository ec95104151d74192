use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::convert::long_lenient;
use crate::error::{Result, TumblrError};

/// Status block of the response envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    pub status: u16,
    #[serde(default)]
    pub msg: String,
}

/// One entry of the `errors` array of a failed call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub detail: String,
    #[serde(default, with = "long_lenient")]
    pub code: i64,
}

/// Envelope wrapping every API response: `{"meta": {...}, "response": ...}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,

    /// Response payload
    #[serde(default)]
    pub response: Value,

    /// Top-level errors, sent by some endpoints next to `meta`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ApiErrorDetail>,

    /// HTTP status of the carrying response (not serialized)
    #[serde(skip)]
    pub http_status: u16,
}

impl Envelope {
    /// Parse the body of an HTTP response.
    ///
    /// A non-JSON body fails with [`TumblrError::Http`] when the status is an
    /// error and [`TumblrError::Decoding`] otherwise.
    pub fn parse(http_status: u16, body: &[u8]) -> Result<Self> {
        let mut envelope: Envelope = serde_json::from_slice(body).map_err(|e| {
            if is_success(http_status) {
                TumblrError::Decoding(format!("response is not a JSON envelope: {}", e))
            } else {
                TumblrError::Http {
                    status: http_status,
                    body: String::from_utf8_lossy(body).to_string(),
                }
            }
        })?;
        envelope.http_status = http_status;
        Ok(envelope)
    }

    /// Effective status: `meta.status`, or the HTTP status when `meta` is absent
    pub fn status(&self) -> u16 {
        self.meta.as_ref().map(|m| m.status).unwrap_or(self.http_status)
    }

    pub fn is_success(&self) -> bool {
        is_success(self.http_status) && is_success(self.status())
    }

    /// Detailed errors from `response.errors`, falling back to top-level `errors`
    pub fn error_details(&self) -> Vec<ApiErrorDetail> {
        self.response
            .get("errors")
            .and_then(|errors| serde_json::from_value(errors.clone()).ok())
            .filter(|errors: &Vec<ApiErrorDetail>| !errors.is_empty())
            .unwrap_or_else(|| self.errors.clone())
    }

    /// Convert a failed envelope into [`TumblrError::Api`]
    pub fn into_error(self) -> TumblrError {
        let errors = self.error_details();
        let status = if is_success(self.status()) {
            self.http_status
        } else {
            self.status()
        };
        let message = self
            .meta
            .map(|m| m.msg)
            .filter(|msg| !msg.is_empty())
            .or_else(|| errors.first().map(|e| e.title.clone()))
            .unwrap_or_else(|| "unknown error".to_string());

        TumblrError::Api {
            status,
            message,
            errors,
        }
    }

    /// Fail with the API error if the envelope signals one
    pub fn check(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(self.into_error())
        }
    }

    /// Decode the `response` payload into the target type
    pub fn decode<T>(self) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let envelope = self.check()?;
        serde_json::from_value(envelope.response)
            .map_err(|e| TumblrError::Decoding(e.to_string()))
    }

    /// Get a value from the payload by a slash-separated path, e.g. `"blog/name"`
    pub fn get(&self, path: &str) -> Option<&Value> {
        path.split('/')
            .filter(|s| !s.is_empty())
            .try_fold(&self.response, |current, part| match current {
                Value::Object(map) => map.get(part),
                Value::Array(arr) => part.parse::<usize>().ok().and_then(|i| arr.get(i)),
                _ => None,
            })
    }
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Parse an HTTP body and decode its payload in one step
pub fn decode_response<T>(http_status: u16, body: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    Envelope::parse(http_status, body)?.decode()
}

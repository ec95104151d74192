//! Ordered request parameters.
//!
//! A [`ParameterSet`] keeps the parameters of one API call in insertion order
//! for transmission and computes the canonical OAuth1 ordering on demand for
//! signing. Values equal to their declared default are never inserted, so the
//! platform only sees what the caller actually changed.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::fmt;

/// RFC3986 reserved set: everything except ALPHA / DIGIT / `-` `.` `_` `~`
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode a string for OAuth1 signing and transmission.
///
/// Stricter than form encoding: spaces become `%20`, and only unreserved
/// characters pass through unchanged.
pub fn percent_encode(src: &str) -> String {
    utf8_percent_encode(src, OAUTH_ENCODE_SET).to_string()
}

/// A typed parameter value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Str(String),
    Int(i64),
    Bool(bool),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Str(s) => f.write_str(s),
            ParamValue::Int(i) => write!(f, "{}", i),
            ParamValue::Bool(b) => f.write_str(if *b { "true" } else { "false" }),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Str(value)
    }
}

impl From<&String> for ParamValue {
    fn from(value: &String) -> Self {
        ParamValue::Str(value.clone())
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Int(value.into())
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        ParamValue::Int(value.into())
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

/// Ordered set of request parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterSet {
    entries: Vec<(String, ParamValue)>,
}

impl ParameterSet {
    pub fn new() -> Self {
        ParameterSet::default()
    }

    /// Add a parameter. Adding a name twice replaces the earlier value in place.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> &mut Self {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
        self
    }

    /// Add a parameter unless it equals `default`
    pub fn add_with_default<V>(&mut self, name: impl Into<String>, value: V, default: V) -> &mut Self
    where
        V: Into<ParamValue>,
    {
        let value = value.into();
        if value != default.into() {
            self.add(name, value);
        }
        self
    }

    /// Add a parameter only when a value is present
    pub fn add_opt<V>(&mut self, name: impl Into<String>, value: Option<V>) -> &mut Self
    where
        V: Into<ParamValue>,
    {
        if let Some(value) = value {
            self.add(name, value);
        }
        self
    }

    /// Expand a collection into `name[0]`, `name[1]`, ... in element order
    pub fn add_array<I, V>(&mut self, name: &str, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<ParamValue>,
    {
        for (i, value) in values.into_iter().enumerate() {
            self.add(format!("{}[{}]", name, i), value);
        }
        self
    }

    /// Builder-style [`ParameterSet::add`]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.add(name, value);
        self
    }

    /// Look up a value by name
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(name, value)` in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, String)> + '_ {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.to_string()))
    }

    /// Pairs in canonical signing order: sorted by encoded name, then by
    /// encoded value. The pairs themselves are returned unencoded.
    ///
    /// Only depends on the pairs themselves, never on insertion order.
    pub fn canonical_pairs(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = self
            .entries
            .iter()
            .map(|(n, v)| (n.clone(), v.to_string()))
            .collect();
        sort_canonical(&mut pairs);
        pairs
    }

    /// `name=value&...` in insertion order, both sides percent-encoded
    pub fn to_query_string(&self) -> String {
        encode_pairs(self.iter())
    }

    /// Body for `application/x-www-form-urlencoded` requests
    pub fn to_form_body(&self) -> String {
        self.to_query_string()
    }
}

impl<N, V> FromIterator<(N, V)> for ParameterSet
where
    N: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        let mut set = ParameterSet::new();
        for (name, value) in iter {
            set.add(name, value);
        }
        set
    }
}

/// Percent-encode and join pairs as `name=value&name=value`
/// Sort raw pairs by their percent-encoded form, the order OAuth1 signs in.
pub(crate) fn sort_canonical(pairs: &mut [(String, String)]) {
    pairs.sort_by_cached_key(|(n, v)| (percent_encode(n), percent_encode(v)));
}

pub(crate) fn encode_pairs<'a, I, V>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, V)>,
    V: AsRef<str>,
{
    pairs
        .into_iter()
        .map(|(n, v)| format!("{}={}", percent_encode(n), percent_encode(v.as_ref())))
        .collect::<Vec<_>>()
        .join("&")
}

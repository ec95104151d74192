//! Tolerant codecs for the platform's inconsistent scalar encodings.
//!
//! Booleans arrive as `true` or `"true"`, integers as `42`, `"42"` or `""`,
//! and enum values as snake_case tokens. Each codec is a serde `with` module
//! so the wire shape is chosen per field.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serializer};
use std::fmt;

/// Parse `"true"` / `"false"` case-insensitively; `""`, `"0"` and `"1"` are accepted too
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim() {
        v if v.eq_ignore_ascii_case("true") || v == "1" => Some(true),
        v if v.eq_ignore_ascii_case("false") || v == "0" || v.is_empty() => Some(false),
        _ => None,
    }
}

/// Parse an integer that may be sent as an empty string
pub fn parse_long(value: &str) -> Result<i64, std::num::ParseIntError> {
    let value = value.trim();
    if value.is_empty() {
        Ok(0)
    } else {
        value.parse()
    }
}

struct BoolVisitor;

impl<'de> Visitor<'de> for BoolVisitor {
    type Value = bool;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a boolean or a \"true\"/\"false\" string")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<bool, E> {
        Ok(v)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<bool, E> {
        Ok(v != 0)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<bool, E> {
        Ok(v != 0)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<bool, E> {
        parse_bool(v).ok_or_else(|| E::invalid_value(de::Unexpected::Str(v), &self))
    }

    fn visit_unit<E: de::Error>(self) -> Result<bool, E> {
        Ok(false)
    }

    fn visit_none<E: de::Error>(self) -> Result<bool, E> {
        Ok(false)
    }
}

struct LongVisitor;

impl<'de> Visitor<'de> for LongVisitor {
    type Value = i64;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an integer, a numeric string or an empty string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
        Ok(v)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
        i64::try_from(v).map_err(|_| E::invalid_value(de::Unexpected::Unsigned(v), &self))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<i64, E> {
        parse_long(v).map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
    }

    fn visit_unit<E: de::Error>(self) -> Result<i64, E> {
        Ok(0)
    }

    fn visit_none<E: de::Error>(self) -> Result<i64, E> {
        Ok(0)
    }
}

/// Boolean read leniently, written as `"true"` / `"false"`
pub mod bool_string {
    use super::*;

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(if *value { "true" } else { "false" })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        deserializer.deserialize_any(BoolVisitor)
    }
}

/// Boolean read leniently, written as a native JSON boolean
pub mod bool_lenient {
    use super::*;

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bool(*value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        deserializer.deserialize_any(BoolVisitor)
    }
}

/// 64-bit integer read from a number, a numeric string or `""` (zero),
/// written as a string
pub mod long_string {
    use super::*;

    pub fn serialize<S: Serializer>(value: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string().to_lowercase())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        deserializer.deserialize_any(LongVisitor)
    }
}

/// Like [`long_string`] but written as a JSON number
pub mod long_lenient {
    use super::*;

    pub fn serialize<S: Serializer>(value: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(*value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        deserializer.deserialize_any(LongVisitor)
    }
}

/// String field the platform sometimes sends as a number, a boolean or `null`
pub mod string_lenient {
    use super::*;

    struct StringVisitor;

    impl<'de> Visitor<'de> for StringVisitor {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a string or a scalar")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_unit<E: de::Error>(self) -> Result<String, E> {
            Ok(String::new())
        }

        fn visit_none<E: de::Error>(self) -> Result<String, E> {
            Ok(String::new())
        }
    }

    pub fn serialize<S: Serializer>(value: &str, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        deserializer.deserialize_any(StringVisitor)
    }
}

/// Enum with an explicit, statically declared wire token per variant.
///
/// The table is the single source of truth for both directions; every
/// variant must appear exactly once.
pub trait WireEnum: Sized + Copy + PartialEq + 'static {
    /// `(variant, token)` pairs in declaration order
    const WIRE_TABLE: &'static [(Self, &'static str)];

    /// Name used in error messages
    const TYPE_NAME: &'static str;

    fn to_wire(self) -> &'static str {
        Self::WIRE_TABLE
            .iter()
            .find(|(variant, _)| *variant == self)
            .map(|(_, token)| *token)
            .unwrap_or_default()
    }

    fn from_wire(token: &str) -> Option<Self> {
        Self::WIRE_TABLE
            .iter()
            .find(|(_, t)| *t == token)
            .map(|(variant, _)| *variant)
    }
}

/// Implement `Serialize`/`Deserialize` for a [`WireEnum`] through its table.
/// Unknown tokens fail deserialization.
#[macro_export]
macro_rules! wire_enum_serde {
    ($ty:ty) => {
        impl ::serde::Serialize for $ty {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str($crate::convert::WireEnum::to_wire(*self))
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $ty {
            fn deserialize<D: ::serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let token = <String as ::serde::Deserialize>::deserialize(deserializer)?;
                <$ty as $crate::convert::WireEnum>::from_wire(&token).ok_or_else(|| {
                    ::serde::de::Error::custom(format!(
                        "unknown {} value: {:?}",
                        <$ty as $crate::convert::WireEnum>::TYPE_NAME,
                        token
                    ))
                })
            }
        }

        impl ::std::fmt::Display for $ty {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::convert::WireEnum::to_wire(*self))
            }
        }
    };
}

/// Optional wire enum that decodes unknown or empty tokens to `None`
pub fn lenient_wire<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: WireEnum,
{
    let token = Option::<String>::deserialize(deserializer)?;
    Ok(match token {
        Some(token) if !token.is_empty() => {
            let value = T::from_wire(&token);
            if value.is_none() {
                tracing::warn!(kind = T::TYPE_NAME, token = %token, "unknown wire token ignored");
            }
            value
        }
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Flags {
        #[serde(with = "bool_string")]
        followed: bool,
        #[serde(with = "bool_lenient")]
        active: bool,
        #[serde(with = "long_string")]
        target_post_id: i64,
    }

    #[derive(Debug, Deserialize)]
    struct Theme {
        #[serde(with = "string_lenient")]
        header_bounds: String,
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("false"), Some(false));
        assert_eq!(parse_bool(""), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_parse_long() {
        assert_eq!(parse_long(""), Ok(0));
        assert_eq!(parse_long("123456789012"), Ok(123456789012));
        assert!(parse_long("12a").is_err());
    }

    #[test]
    fn test_lenient_scalars_from_strings() {
        let json = r#"{"followed": "TRUE", "active": "false", "target_post_id": ""}"#;
        let flags: Flags = serde_json::from_str(json).unwrap();
        assert_eq!(
            flags,
            Flags {
                followed: true,
                active: false,
                target_post_id: 0
            }
        );
    }

    #[test]
    fn test_lenient_scalars_from_native_values() {
        let json = r#"{"followed": false, "active": true, "target_post_id": 123456789012}"#;
        let flags: Flags = serde_json::from_str(json).unwrap();
        assert!(!flags.followed);
        assert!(flags.active);
        assert_eq!(flags.target_post_id, 123456789012);
    }

    #[test]
    fn test_write_shapes() {
        let flags = Flags {
            followed: true,
            active: true,
            target_post_id: 0,
        };
        let value = serde_json::to_value(&flags).unwrap();
        assert_eq!(value["followed"], "true");
        assert_eq!(value["active"], true);
        assert_eq!(value["target_post_id"], "0");

        let back: Flags = serde_json::from_value(value).unwrap();
        assert_eq!(back, flags);
    }

    #[test]
    fn test_long_round_trip_large_value() {
        let flags = Flags {
            followed: false,
            active: false,
            target_post_id: 123456789012,
        };
        let json = serde_json::to_string(&flags).unwrap();
        let back: Flags = serde_json::from_str(&json).unwrap();
        assert_eq!(back.target_post_id, 123456789012);
    }

    #[test]
    fn test_string_lenient() {
        let theme: Theme = serde_json::from_str(r#"{"header_bounds": 0}"#).unwrap();
        assert_eq!(theme.header_bounds, "0");
        let theme: Theme = serde_json::from_str(r#"{"header_bounds": "0,1280,720,0"}"#).unwrap();
        assert_eq!(theme.header_bounds, "0,1280,720,0");
        let theme: Theme = serde_json::from_str(r#"{"header_bounds": null}"#).unwrap();
        assert_eq!(theme.header_bounds, "");
    }

    #[test]
    fn test_bad_bool_string_is_rejected() {
        let json = r#"{"followed": "yes", "active": true, "target_post_id": 1}"#;
        assert!(serde_json::from_str::<Flags>(json).is_err());
    }
}

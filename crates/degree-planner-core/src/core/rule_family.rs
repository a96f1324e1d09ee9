// crates/degree-planner-core/src/core/rule_family.rs
// ============================================================================
// Module: Rule Families
// Description: Shared encoding for the `type`-tagged rule enums.
// Purpose: Decode known discriminators strictly and keep unknown ones intact.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Auxiliary and selection rules are stored as JSON objects tagged by a
//! `type` field. `rule_family!` generates, from one variant list:
//! - the public closed enum with an `Unknown` fallback variant,
//! - owned and borrowed internally tagged mirrors used for serde,
//! - accessors for the shared `part` field and the discriminator.
//!
//! Documents with a recognised discriminator decode into that variant. A
//! recognised discriminator with malformed fields is kept as an
//! [`UnknownRule`] carrying the decode error, so one bad rule never rejects
//! the whole degree. Unrecognised documents are kept as an [`UnknownRule`]
//! and re-encode unchanged.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

// ============================================================================
// SECTION: Unknown Rule
// ============================================================================

/// Rule document whose discriminator is not recognised or whose fields do
/// not decode.
///
/// # Invariants
/// - Serialises back to the same fields it was decoded from.
/// - `decode_error` is set only for documents that failed to decode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnknownRule {
    /// Original discriminator, if any.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Part the rule is attached to.
    #[serde(default)]
    pub part: String,
    /// Handbook text of the rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Parameters as scraped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_params: Option<Vec<Value>>,
    /// Any other fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    /// Why a recognised discriminator failed to decode.
    #[serde(skip)]
    pub decode_error: Option<String>,
}

impl UnknownRule {
    /// Returns the discriminator, or an empty string when absent.
    #[must_use]
    pub fn kind(&self) -> &str {
        self.kind.as_deref().unwrap_or_default()
    }

    /// Returns the handbook text, or an empty string when absent.
    #[must_use]
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }

    /// Returns the decode error for a malformed rule.
    #[must_use]
    pub fn decode_error(&self) -> Option<&str> {
        self.decode_error.as_deref()
    }

    /// Keeps a rule document that failed to decode.
    ///
    /// Shared fields are lifted when they have the expected shape; every
    /// other field stays in `extra`. Non-object documents keep no fields.
    #[must_use]
    pub fn malformed(value: Value, error: impl fmt::Display) -> Self {
        let mut extra = match value {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        let kind = take_string(&mut extra, "type");
        let part = take_string(&mut extra, "part").unwrap_or_default();
        let text = take_string(&mut extra, "text");
        let raw_params = match extra.remove("raw_params") {
            Some(Value::Array(params)) => Some(params),
            Some(other) => {
                extra.insert("raw_params".to_string(), other);
                None
            }
            None => None,
        };
        Self {
            kind,
            part,
            text,
            raw_params,
            extra,
            decode_error: Some(error.to_string()),
        }
    }
}

/// Removes `key` from `map` when it holds a string.
fn take_string(map: &mut Map<String, Value>, key: &str) -> Option<String> {
    match map.remove(key) {
        Some(Value::String(value)) => Some(value),
        Some(other) => {
            map.insert(key.to_string(), other);
            None
        }
        None => None,
    }
}

/// Reads the `type` discriminator of a rule document.
pub(crate) fn discriminator(value: &Value) -> &str {
    value.get("type").and_then(Value::as_str).unwrap_or_default()
}

// ============================================================================
// SECTION: Family Macro
// ============================================================================

/// Generates a `type`-tagged rule family with an unknown fallback.
macro_rules! rule_family {
    (
        $(#[$meta:meta])*
        pub enum $name:ident via $tagged:ident, $tagged_ref:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident($ty:ty) = $tag:literal,
            )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                $variant($ty),
            )+
            /// Rule with an unrecognised discriminator.
            Unknown($crate::core::rule_family::UnknownRule),
        }

        /// Owned tagged mirror used to decode known variants.
        #[derive(serde::Deserialize)]
        #[serde(tag = "type")]
        enum $tagged {
            $(
                $(#[$vmeta])*
                #[serde(rename = $tag)]
                $variant($ty),
            )+
        }

        /// Borrowed tagged mirror used to encode known variants.
        #[derive(serde::Serialize)]
        #[serde(tag = "type")]
        enum $tagged_ref<'a> {
            $(
                $(#[$vmeta])*
                #[serde(rename = $tag)]
                $variant(&'a $ty),
            )+
        }

        impl $name {
            /// Discriminators decoded into dedicated variants.
            pub const KNOWN_TYPES: &'static [&'static str] = &[$($tag),+];

            /// Returns the part this rule is attached to.
            #[must_use]
            pub fn part(&self) -> &str {
                match self {
                    $(Self::$variant(rule) => &rule.part,)+
                    Self::Unknown(rule) => &rule.part,
                }
            }

            /// Returns the serialised discriminator.
            #[must_use]
            pub fn type_name(&self) -> &str {
                match self {
                    $(Self::$variant(_) => $tag,)+
                    Self::Unknown(rule) => rule.kind(),
                }
            }

            /// Returns a copy attached to `prefix.part`.
            #[must_use]
            pub fn prefixed(&self, prefix: &str) -> Self {
                let mut rule = self.clone();
                let part = match &mut rule {
                    $(Self::$variant(inner) => &mut inner.part,)+
                    Self::Unknown(inner) => &mut inner.part,
                };
                *part = $crate::core::codes::join_part(prefix, part);
                rule
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                match self {
                    $(Self::$variant(rule) => {
                        serde::Serialize::serialize(&$tagged_ref::$variant(rule), serializer)
                    })+
                    Self::Unknown(rule) => serde::Serialize::serialize(rule, serializer),
                }
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                use $crate::core::rule_family::UnknownRule;

                let value = <serde_json::Value as serde::Deserialize>::deserialize(deserializer)?;
                let kind = $crate::core::rule_family::discriminator(&value);
                if Self::KNOWN_TYPES.contains(&kind) {
                    match <$tagged as serde::Deserialize>::deserialize(&value) {
                        Ok(tagged) => Ok(match tagged {
                            $($tagged::$variant(rule) => Self::$variant(rule),)+
                        }),
                        Err(err) => Ok(Self::Unknown(UnknownRule::malformed(value, err))),
                    }
                } else {
                    match <UnknownRule as serde::Deserialize>::deserialize(&value) {
                        Ok(rule) => Ok(Self::Unknown(rule)),
                        Err(err) => Ok(Self::Unknown(UnknownRule::malformed(value, err))),
                    }
                }
            }
        }
    };
}

pub(crate) use rule_family;

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test fixtures use unwraps for clarity.")]

    use serde_json::json;

    use super::*;

    #[test]
    fn unknown_rule_keeps_extra_fields() {
        let doc = json!({"type": "AR99", "part": "A", "text": "see handbook", "weight": 3});
        let rule: UnknownRule = serde_json::from_value(doc.clone()).unwrap();
        assert_eq!(rule.kind(), "AR99");
        assert_eq!(rule.extra.get("weight"), Some(&json!(3)));
        assert_eq!(serde_json::to_value(&rule).unwrap(), doc);
    }

    #[test]
    fn malformed_rule_keeps_fields_and_error() {
        let doc = json!({"type": "AR1", "part": "A", "n": "eight", "level": 2});
        let rule = UnknownRule::malformed(doc.clone(), "expected u32");
        assert_eq!(rule.kind(), "AR1");
        assert_eq!(rule.part, "A");
        assert_eq!(rule.decode_error(), Some("expected u32"));
        assert_eq!(serde_json::to_value(&rule).unwrap(), doc);
    }

    #[test]
    fn malformed_non_object_keeps_nothing() {
        let rule = UnknownRule::malformed(json!(7), "not an object");
        assert_eq!(rule.kind(), "");
        assert!(rule.part.is_empty());
        assert!(rule.extra.is_empty());
    }

    #[test]
    fn discriminator_defaults_to_empty() {
        assert_eq!(discriminator(&json!({"part": "A"})), "");
        assert_eq!(discriminator(&json!({"type": 7})), "");
    }
}

//! Leaf predicate for filtering JSON records.
//!
//! `key:value` compares the record's top-level field `key` with `value`; a
//! bare `value` matches if any top-level field does. Scalars are compared by
//! their text (`50`, `true`), arrays match if any element does, and a `null`
//! field counts as empty, so `key:` finds records where `key` is null or "".

use std::collections::BTreeSet;

use clap::ValueEnum;
use search_expression_parser::LeafNode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strsim::levenshtein;
use thiserror::Error;

/// Maximum Levenshtein distance to consider a key as a suggestion.
const MAX_SUGGESTION_DISTANCE: usize = 3;

/// How a query value is compared with a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// The field must equal the value.
    #[default]
    Exact,
    /// The field must contain the value.
    Contains,
}

/// Errors raised while matching a leaf against a record.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MatchError {
    /// No record has the requested key.
    #[error("unknown key '{key}'{}", suggestion_hint(.suggestion))]
    UnknownKey {
        /// The key used in the query.
        key: String,
        /// A similarly named key, if any.
        suggestion: Option<String>,
    },

    /// Bare values are disabled in the configuration.
    #[error("bare value '{value}' is not allowed; use key:value instead")]
    BareValueNotAllowed {
        /// The bare value used in the query.
        value: String,
    },
}

fn suggestion_hint(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(". Did you mean '{s}'?"),
        None => String::new(),
    }
}

/// Resolved matching options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOptions {
    pub mode: MatchMode,
    pub case_sensitive: bool,
    pub allow_bare_values: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            mode: MatchMode::Exact,
            case_sensitive: false,
            allow_bare_values: true,
        }
    }
}

/// Matches search expression leaves against JSON records.
#[derive(Debug, Clone)]
pub struct RecordMatcher {
    options: MatchOptions,
    /// Every top-level key seen in the input.
    known_keys: BTreeSet<String>,
}

impl RecordMatcher {
    /// Creates a matcher for `records`.
    ///
    /// Keys are collected from all records up front, so a key that some
    /// records lack simply does not match them, while a key that no record
    /// has is reported as unknown.
    pub fn new(options: MatchOptions, records: &[Value]) -> Self {
        let known_keys = records
            .iter()
            .filter_map(Value::as_object)
            .flat_map(|object| object.keys().cloned())
            .collect();
        Self {
            options,
            known_keys,
        }
    }

    /// Evaluates one leaf against one record.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::UnknownKey`] if no record has the key, and
    /// [`MatchError::BareValueNotAllowed`] for bare values when those are
    /// disabled.
    pub fn matches(&self, leaf: LeafNode<'_>, record: &Value) -> Result<bool, MatchError> {
        match leaf {
            LeafNode::KeyValue(node) => {
                let key = node.key.as_str();
                if !self.is_known_key(key) {
                    return Err(self.unknown_key(key));
                }
                let needle = node.value.as_str();
                Ok(self
                    .lookup(record, key)
                    .is_some_and(|field| self.field_matches(field, needle)))
            }
            LeafNode::Value(node) => {
                let needle = node.value.as_str();
                if !self.options.allow_bare_values {
                    return Err(MatchError::BareValueNotAllowed {
                        value: needle.to_string(),
                    });
                }
                Ok(match record {
                    Value::Object(object) => {
                        object.values().any(|field| self.field_matches(field, needle))
                    }
                    other => self.field_matches(other, needle),
                })
            }
        }
    }

    fn is_known_key(&self, key: &str) -> bool {
        if self.options.case_sensitive {
            self.known_keys.contains(key)
        } else {
            self.known_keys.iter().any(|k| k.eq_ignore_ascii_case(key))
        }
    }

    fn lookup<'r>(&self, record: &'r Value, key: &str) -> Option<&'r Value> {
        let object: &Map<String, Value> = record.as_object()?;
        if let Some(field) = object.get(key) {
            return Some(field);
        }
        if self.options.case_sensitive {
            return None;
        }
        object
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, field)| field)
    }

    fn field_matches(&self, field: &Value, needle: &str) -> bool {
        match field {
            Value::Null => self.text_matches("", needle),
            Value::Bool(b) => self.text_matches(&b.to_string(), needle),
            Value::Number(n) => self.text_matches(&n.to_string(), needle),
            Value::String(s) => self.text_matches(s, needle),
            Value::Array(items) => items
                .iter()
                .any(|item| !item.is_array() && self.field_matches(item, needle)),
            Value::Object(_) => false,
        }
    }

    fn text_matches(&self, text: &str, needle: &str) -> bool {
        let (text, needle) = if self.options.case_sensitive {
            (text.to_string(), needle.to_string())
        } else {
            (text.to_lowercase(), needle.to_lowercase())
        };
        match self.options.mode {
            MatchMode::Exact => text == needle,
            MatchMode::Contains => text.contains(&needle),
        }
    }

    fn unknown_key(&self, key: &str) -> MatchError {
        MatchError::UnknownKey {
            key: key.to_string(),
            suggestion: find_similar_key(key, self.known_keys.iter().map(String::as_str)),
        }
    }
}

/// Finds the best matching key from a list of candidates using Levenshtein distance.
///
/// Returns the best match if its edit distance is within the threshold,
/// otherwise returns `None`.
pub(crate) fn find_similar_key<'a>(
    query: &str,
    candidates: impl Iterator<Item = &'a str>,
) -> Option<String> {
    let query_lower = query.to_lowercase();

    let (best_match, best_distance) = candidates
        .filter(|name| !name.is_empty())
        .map(|name| (name, levenshtein(&query_lower, &name.to_lowercase())))
        .min_by_key(|(_, d)| *d)?;

    // Only suggest if the distance is within threshold and not an exact match
    if best_distance > 0 && best_distance <= MAX_SUGGESTION_DISTANCE {
        Some(best_match.to_string())
    } else {
        None
    }
}

//! Tag linking over a localization tree.
//!
//! The tree is plain JSON (`serde_json::Value`): objects, arrays, scalars.
//! Strings stored directly under one of [`LINKABLE_KEYS`] are passed through
//! [`link_tags`]; everything else is walked or left as is.

use super::tags::{TagMap, link_tags};
use serde_json::Value;
use std::borrow::Cow;

/// Field names whose string values receive keyword links, at any depth.
pub const LINKABLE_KEYS: &[&str] = &[
    "$about-text$",
    "$contact-text$",
    "group_description",
    "description",
];

#[inline]
pub fn is_linkable(key: &str) -> bool {
    LINKABLE_KEYS.contains(&key)
}

/// Link keywords in every linkable string of `node`, in place.
///
/// Shape, key order and element count are preserved. Returns the number of
/// strings that changed.
pub fn apply_tags(node: &mut Value, tags: &TagMap) -> usize {
    if tags.is_empty() {
        return 0;
    }

    match node {
        Value::Object(map) => map
            .iter_mut()
            .map(|(key, value)| match value {
                Value::String(text) if is_linkable(key) => link_in_place(text, tags),
                other => apply_tags(other, tags),
            })
            .sum(),
        Value::Array(items) => items.iter_mut().map(|item| apply_tags(item, tags)).sum(),
        Value::String(_) | Value::Number(_) | Value::Bool(_) | Value::Null => 0,
    }
}

fn link_in_place(text: &mut String, tags: &TagMap) -> usize {
    match link_tags(text, tags) {
        Cow::Borrowed(_) => 0,
        Cow::Owned(linked) => {
            *text = linked;
            1
        }
    }
}

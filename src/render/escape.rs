//! HTML escaping for text taken from data files.

use super::tags::{LinkAnchor, TagMap};
use std::borrow::Cow;

/// Escape HTML special characters.
///
/// Uses `Cow` to avoid allocation when no escaping is needed.
#[inline]
pub fn escape_html(s: &str) -> Cow<'_, str> {
    // Fast path: check if escaping is needed
    if !s.contains(['<', '>', '&', '"', '\'']) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len() + 16);
    for c in s.chars() {
        match c {
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '&' => result.push_str("&amp;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    Cow::Owned(result)
}

/// Escape everything except anchors the tag linker produced from `tags`.
///
/// Linkable fields reach the card and group renderers already linked, yet
/// they are still untrusted text. An anchor survives only if its label is a
/// keyword of `tags` and its href that keyword's escaped URL; it is rebuilt
/// from its parts. All other markup is escaped like plain text.
pub fn escape_linked<'a>(s: &'a str, tags: &TagMap) -> Cow<'a, str> {
    if !s.contains(['<', '>', '&', '"', '\'']) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len() + 16);
    let mut last = 0;
    for anchor in LinkAnchor::find_all(s, tags) {
        result.push_str(&escape_html(&s[last..anchor.range.start]));
        result.push_str(&anchor.to_html());
        last = anchor.range.end;
    }
    result.push_str(&escape_html(&s[last..]));
    Cow::Owned(result)
}

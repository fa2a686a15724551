//! Keyword → hyperlink substitution.
//!
//! A [`TagMap`] is loaded from the tag map file for each page. [`link_tags`]
//! turns every occurrence of one of its keywords into an anchor:
//!
//! ```text
//! {"Rust": "https://rust-lang.org"}
//! "I like Rust"  →  I like <a target="_blank" href="https://rust-lang.org">Rust</a>
//! ```
//!
//! Matching is a single left-to-right scan over an alternation of all
//! keywords, so inserted anchors are never rescanned. Text inside existing
//! `<a>…</a>` elements and inside tag markup is left alone, which makes
//! linking idempotent.

use super::escape::escape_html;
use regex::Regex;
use serde::de::{Deserialize, Deserializer, Error as _, MapAccess, Visitor};
use std::{borrow::Cow, fmt, ops::Range, sync::LazyLock};

/// Regions that must never be linked: whole anchor elements first, then any
/// other tag (including comments and `<style …>` openers). A `<` that does not
/// open a tag name, like in `a < b`, is plain text.
static RE_PROTECTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<[aA][ \t\r\n>].*?</[aA][ \t\r\n]*>|<[A-Za-z/!?][^>]*>").unwrap()
});

/// Character references emitted by [`escape_html`]; no others may appear in
/// a kept href.
const HREF_ENTITIES: [(&str, char); 5] = [
    ("&amp;", '&'),
    ("&lt;", '<'),
    ("&gt;", '>'),
    ("&quot;", '"'),
    ("&#x27;", '\''),
];

/// Exact shape of an anchor emitted by [`link_tags`].
static RE_LINK_ANCHOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<a target="_blank" href="([^"<>]*)">([^<>]*)</a>"#).unwrap()
});

// ============================================================================
// Tag Map
// ============================================================================

/// Ordered keyword → URL map with a precompiled matcher.
///
/// Iteration order is the order of the tag map file; at any text position
/// the first keyword in that order wins.
#[derive(Debug, Clone, Default)]
pub struct TagMap {
    entries: Vec<(String, String)>,
    pattern: Option<Regex>,
}

impl TagMap {
    /// Build a map from `(keyword, url)` pairs.
    ///
    /// Empty keywords are ignored. A repeated keyword keeps its first
    /// position and its last URL.
    pub fn new<I, K, V>(entries: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut deduped: Vec<(String, String)> = Vec::new();
        for (keyword, url) in entries {
            let (keyword, url) = (keyword.into(), url.into());
            if keyword.is_empty() {
                continue;
            }
            match deduped.iter_mut().find(|(k, _)| *k == keyword) {
                Some(entry) => entry.1 = url,
                None => deduped.push((keyword, url)),
            }
        }

        let pattern = if deduped.is_empty() {
            None
        } else {
            let alternation = deduped
                .iter()
                .map(|(keyword, _)| regex::escape(keyword))
                .collect::<Vec<_>>()
                .join("|");
            Some(Regex::new(&alternation)?)
        };

        Ok(Self {
            entries: deduped,
            pattern,
        })
    }

    /// Parse a JSON object of keyword → URL strings, keeping key order.
    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    /// URL for `keyword`, if mapped.
    pub fn get(&self, keyword: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == keyword)
            .map(|(_, url)| url.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'de> Deserialize<'de> for TagMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TagMapVisitor;

        impl<'de> Visitor<'de> for TagMapVisitor {
            type Value = TagMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping keywords to URL strings")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<TagMap, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, String>()? {
                    entries.push(entry);
                }
                TagMap::new(entries).map_err(A::Error::custom)
            }
        }

        deserializer.deserialize_map(TagMapVisitor)
    }
}

// ============================================================================
// Linking
// ============================================================================

/// Replace every keyword occurrence in `text` with an anchor to its URL.
///
/// Returns `Cow::Borrowed` when nothing matched.
pub fn link_tags<'a>(text: &'a str, tags: &TagMap) -> Cow<'a, str> {
    let Some(pattern) = &tags.pattern else {
        return Cow::Borrowed(text);
    };
    if !pattern.is_match(text) {
        return Cow::Borrowed(text);
    }

    let mut result = String::with_capacity(text.len() + 64);
    let mut last = 0;
    for protected in RE_PROTECTED.find_iter(text) {
        link_segment(&text[last..protected.start()], pattern, tags, &mut result);
        result.push_str(protected.as_str());
        last = protected.end();
    }
    link_segment(&text[last..], pattern, tags, &mut result);

    if result == text {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(result)
    }
}

/// Link one run of plain text (no markup inside) into `out`.
fn link_segment(segment: &str, pattern: &Regex, tags: &TagMap, out: &mut String) {
    let mut last = 0;
    for found in pattern.find_iter(segment) {
        out.push_str(&segment[last..found.start()]);
        let keyword = found.as_str();
        match tags.get(keyword) {
            Some(url) => out.push_str(&anchor_html(url, keyword)),
            None => out.push_str(keyword),
        }
        last = found.end();
    }
    out.push_str(&segment[last..]);
}

fn anchor_html(href: &str, label: &str) -> String {
    format!(r#"<a target="_blank" href="{}">{label}</a>"#, escape_html(href))
}

// ============================================================================
// Anchor Recognition
// ============================================================================

/// A linker-shaped anchor found in text that is otherwise escaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkAnchor<'a> {
    pub range: Range<usize>,
    pub href: &'a str,
    pub label: &'a str,
}

impl<'a> LinkAnchor<'a> {
    /// All anchors in `s` that [`link_tags`] could have produced with `tags`.
    ///
    /// The label must be a keyword of `tags` and the href exactly its escaped
    /// URL, which must also be safe to keep. Anything else that merely looks
    /// like a link is not returned.
    pub fn find_all<'t>(
        s: &'a str,
        tags: &'t TagMap,
    ) -> impl Iterator<Item = LinkAnchor<'a>> + use<'a, 't> {
        RE_LINK_ANCHOR.captures_iter(s).filter_map(move |caps| {
            let whole = caps.get(0)?;
            let href = caps.get(1)?.as_str();
            let label = caps.get(2)?.as_str();
            let url = tags.get(label)?;
            (escape_html(url) == href && is_safe_href(href)).then(|| LinkAnchor {
                range: whole.range(),
                href,
                label,
            })
        })
    }

    /// Rebuild the anchor, escaping the label as plain text.
    pub fn to_html(&self) -> String {
        format!(
            r#"<a target="_blank" href="{}">{}</a>"#,
            self.href,
            escape_html(self.label)
        )
    }
}

/// Relative references are fine; absolute ones must use a web or mail scheme.
///
/// `href` is attribute text; it is decoded first so that character references
/// cannot hide a scheme.
fn is_safe_href(href: &str) -> bool {
    let Some(decoded) = decode_href(href) else {
        return false;
    };
    let href = decoded.trim_start();
    let scheme_end = href.find(':');
    let path_start = href.find(['/', '?', '#']);
    match (scheme_end, path_start) {
        (Some(colon), Some(path)) if path < colon => true,
        (Some(colon), _) => {
            let scheme = href[..colon].to_ascii_lowercase();
            matches!(scheme.as_str(), "http" | "https" | "mailto")
        }
        (None, _) => true,
    }
}

/// Undo [`escape_html`]; `None` if any other character reference is present.
fn decode_href(href: &str) -> Option<Cow<'_, str>> {
    if !href.contains('&') {
        return Some(Cow::Borrowed(href));
    }

    let mut decoded = String::with_capacity(href.len());
    let mut rest = href;
    while let Some(amp) = rest.find('&') {
        decoded.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let (entity, c) = HREF_ENTITIES
            .iter()
            .find(|(entity, _)| tail.starts_with(entity))?;
        decoded.push(*c);
        rest = &tail[entity.len()..];
    }
    decoded.push_str(rest);
    Some(Cow::Owned(decoded))
}

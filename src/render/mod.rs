//! Template rendering engine.
//!
//! # Pipeline
//!
//! ```text
//! localization tree ──► tree::apply_tags ──► (linked tree)
//!                                                │
//! $projects$ value ──► projects::render_projects_section
//!                          ├── section::TemplateCache   (CSS + sub-templates, once per path)
//!                          └── group::render_group      (per group, failures skipped)
//!                                  └── card::render_card (per record, invalid ones skipped)
//! ```
//!
//! Component sub-templates use `{{name}}` placeholders, filled by [`fill`].

pub mod card;
pub mod escape;
pub mod group;
pub mod projects;
pub mod section;
pub mod tags;
pub mod tree;

use regex::{Captures, Regex};
use std::{borrow::Cow, io, path::PathBuf, sync::LazyLock};
use thiserror::Error;

static RE_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([A-Za-z0-9_]+)\}\}").unwrap());

/// Errors raised while rendering component templates.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to read template `{0}`")]
    Template(PathBuf, #[source] io::Error),

    #[error("malformed project group: {0}")]
    MalformedGroup(String),
}

/// A recoverable problem: the offending item was left out of the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    /// Where it happened, e.g. `group "Tools", project #2`.
    pub location: String,
    pub message: String,
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}

/// Replace each `{{name}}` in `template` with `lookup(name)`.
///
/// One pass: substituted values are never scanned again. Names for which
/// `lookup` returns `None` stay verbatim.
pub fn fill<'t, F>(template: &'t str, lookup: F) -> Cow<'t, str>
where
    F: Fn(&str) -> Option<String>,
{
    RE_PLACEHOLDER.replace_all(template, |caps: &Captures| {
        lookup(&caps[1]).unwrap_or_else(|| caps[0].to_owned())
    })
}

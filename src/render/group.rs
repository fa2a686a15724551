//! Project group rendering.
//!
//! A group is a titled list of project cards. Records that fail validation
//! are skipped and reported as [`Warning`]s; they never abort the group.

use super::{
    Warning,
    card::{ProjectData, render_card},
    escape::{escape_html, escape_linked},
    fill,
    section::ComponentTemplate,
    tags::TagMap,
};
use serde::Deserialize;
use serde_json::Value;

/// Separator between consecutive cards.
const CARD_SEPARATOR: &str = "\n    ";

/// A project list entry: a readable record, or anything else.
///
/// Unreadable entries (not an object, wrong field types) are kept so that
/// they can be reported instead of failing the whole collection.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ProjectEntry {
    Record(ProjectData),
    Malformed(Value),
}

/// A titled group of projects.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProjectGroup {
    #[serde(default)]
    pub group_title: String,
    #[serde(default)]
    pub group_description: String,
    #[serde(default)]
    pub projects: Vec<ProjectEntry>,
}

/// Output of [`render_group`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedGroup {
    pub html: String,
    /// Number of cards that made it into `html`.
    pub cards: usize,
    pub warnings: Vec<Warning>,
}

/// Render a group with the group sub-template, or the built-in layout when
/// that sub-template is empty.
pub fn render_group(
    group: &ProjectGroup,
    templates: &ComponentTemplate,
    links: &TagMap,
) -> RenderedGroup {
    let mut cards = Vec::with_capacity(group.projects.len());
    let mut warnings = Vec::new();

    for (index, entry) in group.projects.iter().enumerate() {
        let result = match entry {
            ProjectEntry::Record(project) => {
                render_card(project, templates, links).map_err(|err| err.to_string())
            }
            ProjectEntry::Malformed(value) => Err(format!(
                "unreadable project record (found {})",
                json_kind(value)
            )),
        };
        match result {
            Ok(card) => cards.push(card),
            Err(message) => warnings.push(Warning {
                location: format!("group \"{}\", project #{}", group.group_title, index + 1),
                message,
            }),
        }
    }

    let projects = cards.join(CARD_SEPARATOR);
    let title = escape_html(&group.group_title);
    let description = escape_linked(&group.group_description, links);

    let html = if templates.group.is_empty() {
        fallback_layout(&title, &description, &projects)
    } else {
        fill(&templates.group, |name| match name {
            "group_title" => Some(title.to_string()),
            "group_description" => Some(description.to_string()),
            "projects" => Some(projects.clone()),
            _ => None,
        })
        .into_owned()
    };

    RenderedGroup {
        html,
        cards: cards.len(),
        warnings,
    }
}

/// Built-in group layout; arguments are already escaped.
fn fallback_layout(title: &str, description: &str, projects: &str) -> String {
    format!(
        r#"<div class="project-group mb-5">
  <h3 class="project-group-title mb-3">{title}</h3>
  <p class="project-group-description mb-4">{description}</p>
  <div class="row g-4">
    {projects}
  </div>
</div>"#
    )
}

/// Short JSON type name for diagnostics.
pub(super) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object with invalid fields",
    }
}

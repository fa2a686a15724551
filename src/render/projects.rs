//! Projects section assembly.
//!
//! Turns the projects collection of one language into a self-contained HTML
//! fragment: the component template's `<style>` block followed by every
//! group, separated by blank lines.

use super::{
    RenderError, Warning,
    group::{ProjectGroup, RenderedGroup, json_kind, render_group},
    section::{ComponentTemplate, TemplateCache},
    tags::TagMap,
};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

/// Separator between the CSS block and each group.
const GROUP_SEPARATOR: &str = "\n\n";

/// A group list entry: a readable group, or anything else.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum GroupEntry {
    Group(ProjectGroup),
    Malformed(Value),
}

/// Root value of the projects placeholder: `{ "groups": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProjectsCollection {
    #[serde(default)]
    pub groups: Vec<GroupEntry>,
}

impl ProjectsCollection {
    pub fn from_value(value: &Value) -> serde_json::Result<Self> {
        Self::deserialize(value)
    }
}

/// Output of [`render_projects_section`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedSection {
    pub html: String,
    /// Groups that made it into `html`.
    pub groups: usize,
    pub cards: usize,
    pub warnings: Vec<Warning>,
}

/// Render every group of `collection` with the component template at
/// `template_path`. `links` is the tag map the collection was linked with.
///
/// Only an unreadable component template is an error. Groups that cannot be
/// rendered are skipped and reported in [`RenderedSection::warnings`].
pub fn render_projects_section(
    collection: &ProjectsCollection,
    template_path: &Path,
    cache: &TemplateCache,
    links: &TagMap,
) -> Result<RenderedSection, RenderError> {
    let templates = cache.component(template_path)?;
    Ok(assemble(collection, &templates, links))
}

fn assemble(
    collection: &ProjectsCollection,
    templates: &ComponentTemplate,
    links: &TagMap,
) -> RenderedSection {
    let mut parts = Vec::with_capacity(collection.groups.len() + 1);
    if !templates.css.is_empty() {
        parts.push(templates.css.clone());
    }

    let mut section = RenderedSection::default();
    for (index, entry) in collection.groups.iter().enumerate() {
        match render_entry(entry, templates, links) {
            Ok(rendered) => {
                parts.push(rendered.html);
                section.groups += 1;
                section.cards += rendered.cards;
                section.warnings.extend(rendered.warnings);
            }
            Err(err) => section.warnings.push(Warning {
                location: format!("group #{}", index + 1),
                message: err.to_string(),
            }),
        }
    }

    section.html = parts.join(GROUP_SEPARATOR);
    section
}

fn render_entry(
    entry: &GroupEntry,
    templates: &ComponentTemplate,
    links: &TagMap,
) -> Result<RenderedGroup, RenderError> {
    match entry {
        GroupEntry::Group(group) => Ok(render_group(group, templates, links)),
        GroupEntry::Malformed(value) => Err(RenderError::MalformedGroup(format!(
            "expected an object with group_title, group_description and projects, found {}",
            json_kind(value)
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;

    const COMPONENT: &str = r#"<style>.card{}</style>
<!--PROJECT_CARD_START--><card>{{title}}</card><!--PROJECT_CARD_END-->
<!--PROJECT_GROUP_START--><group>{{group_title}}:{{projects}}</group><!--PROJECT_GROUP_END-->"#;

    fn write_component(dir: &Path, content: &str) -> std::path::PathBuf {
        let path = dir.join("projects_template.html");
        fs::write(&path, content).unwrap();
        path
    }

    fn render(collection: &ProjectsCollection, path: &Path) -> RenderedSection {
        render_projects_section(collection, path, &TemplateCache::new(), &TagMap::default())
            .unwrap()
    }

    fn project(title: &str) -> Value {
        json!({"title": title, "description": "d", "url": "https://x", "button_text": "Go"})
    }

    #[test]
    fn test_css_then_groups() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_component(dir.path(), COMPONENT);
        let collection = ProjectsCollection::from_value(&json!({
            "groups": [
                {"group_title": "One", "group_description": "", "projects": [project("A"), project("B")]},
                {"group_title": "Two", "group_description": "", "projects": [project("C")]}
            ]
        }))
        .unwrap();

        let section = render(&collection, &path);
        assert_eq!(
            section.html,
            "<style>.card{}</style>\n\n\
             <group>One:<card>A</card>\n    <card>B</card></group>\n\n\
             <group>Two:<card>C</card></group>"
        );
        assert_eq!(section.groups, 2);
        assert_eq!(section.cards, 3);
        assert!(section.warnings.is_empty());
    }

    #[test]
    fn test_group_with_no_valid_records() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_component(dir.path(), COMPONENT);
        let collection = ProjectsCollection::from_value(&json!({
            "groups": [
                {"group_title": "Empty", "projects": [{"title": "no url"}]},
                {"group_title": "Full", "projects": [project("A"), project("B")]}
            ]
        }))
        .unwrap();

        let section = render(&collection, &path);
        assert_eq!(section.html.matches("<group>").count(), 2);
        assert!(section.html.contains("<group>Empty:</group>"));
        assert!(section.html.contains("<group>Full:<card>A</card>\n    <card>B</card></group>"));
        assert_eq!(section.cards, 2);
        assert_eq!(section.warnings.len(), 1);
    }

    #[test]
    fn test_malformed_group_skipped() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_component(dir.path(), COMPONENT);
        let collection = ProjectsCollection::from_value(&json!({
            "groups": [
                "not a group",
                {"group_title": 7},
                {"group_title": "Ok", "projects": [project("A")]}
            ]
        }))
        .unwrap();

        let section = render(&collection, &path);
        assert_eq!(section.groups, 1);
        assert!(section.html.ends_with("<group>Ok:<card>A</card></group>"));
        assert_eq!(section.warnings.len(), 2);
        assert_eq!(section.warnings[0].location, "group #1");
        assert!(section.warnings[0].message.contains("found a string"));
        assert_eq!(section.warnings[1].location, "group #2");
    }

    #[test]
    fn test_without_style_or_group_template() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_component(
            dir.path(),
            "<!--PROJECT_CARD_START--><card>{{title}}</card><!--PROJECT_CARD_END-->",
        );
        let collection = ProjectsCollection::from_value(&json!({
            "groups": [{"group_title": "G", "projects": [project("A")]}]
        }))
        .unwrap();

        let section = render(&collection, &path);
        assert!(section.html.starts_with(r#"<div class="project-group mb-5">"#));
        assert!(section.html.contains("<card>A</card>"));
    }

    #[test]
    fn test_empty_collection_is_css_only() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_component(dir.path(), COMPONENT);
        let collection = ProjectsCollection::from_value(&json!({})).unwrap();

        let section = render(&collection, &path);
        assert_eq!(section.html, "<style>.card{}</style>");
        assert_eq!(section.groups, 0);
    }

    #[test]
    fn test_missing_component_template() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = render_projects_section(
            &ProjectsCollection::default(),
            &dir.path().join("missing.html"),
            &TemplateCache::new(),
            &TagMap::default(),
        );
        assert!(matches!(result, Err(RenderError::Template(..))));
    }

    #[test]
    fn test_collection_root_must_be_object() {
        assert!(ProjectsCollection::from_value(&json!("text")).is_err());
        assert!(ProjectsCollection::from_value(&json!({"groups": "x"})).is_err());
    }
}

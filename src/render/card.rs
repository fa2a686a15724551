//! Project card rendering.
//!
//! A card template may reference:
//!
//! | Placeholder         | Value                                           |
//! |---------------------|-------------------------------------------------|
//! | `{{image_section}}` | filled image sub-template, or empty             |
//! | `{{title}}`         | escaped title                                   |
//! | `{{description}}`   | escaped description (linker anchors kept)       |
//! | `{{tags}}`          | tag badges, or a language badge when no tags    |
//! | `{{language}}`      | escaped language label, or empty                |
//! | `{{stars}}`         | star badge when `stars > 0`, or empty           |
//! | `{{url}}`           | escaped project URL                             |
//! | `{{button_text}}`   | escaped button label                            |

use super::{
    escape::{escape_html, escape_linked},
    fill,
    section::ComponentTemplate,
    tags::TagMap,
};
use serde::Deserialize;
use thiserror::Error;

/// Separator between consecutive badges.
const BADGE_SEPARATOR: &str = "\n        ";

/// A project record whose required fields are missing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("project missing required fields: {}", .fields.join(", "))]
pub struct MissingFieldError {
    pub fields: Vec<&'static str>,
}

/// One project record as read from a localization file.
///
/// Every field is optional at this stage; [`ProjectData::validate`] checks
/// the required ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProjectData {
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub button_text: Option<String>,
    pub image: Option<String>,
    pub tags: Option<Vec<String>>,
    /// Primary technology label.
    pub language: Option<String>,
    pub stars: Option<u64>,
}

/// A validated project record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Project<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub url: &'a str,
    pub button_text: &'a str,
    pub image: Option<&'a str>,
    pub tags: &'a [String],
    pub language: Option<&'a str>,
    pub stars: u64,
}

impl ProjectData {
    pub const REQUIRED_FIELDS: [&'static str; 4] = ["title", "description", "url", "button_text"];

    /// Check required fields, naming every one that is absent.
    pub fn validate(&self) -> Result<Project<'_>, MissingFieldError> {
        match (&self.title, &self.description, &self.url, &self.button_text) {
            (Some(title), Some(description), Some(url), Some(button_text)) => Ok(Project {
                title,
                description,
                url,
                button_text,
                image: self.image.as_deref().filter(|s| !s.is_empty()),
                tags: self.tags.as_deref().unwrap_or_default(),
                language: self.language.as_deref().filter(|s| !s.is_empty()),
                stars: self.stars.unwrap_or(0),
            }),
            (title, description, url, button_text) => {
                let present = [
                    title.is_some(),
                    description.is_some(),
                    url.is_some(),
                    button_text.is_some(),
                ];
                let fields = Self::REQUIRED_FIELDS
                    .into_iter()
                    .zip(present)
                    .filter_map(|(name, present)| (!present).then_some(name))
                    .collect();
                Err(MissingFieldError { fields })
            }
        }
    }
}

/// Render one project into a card fragment.
///
/// `links` is the tag map the description was linked with. Fails only when
/// a required field is missing.
pub fn render_card(
    project: &ProjectData,
    templates: &ComponentTemplate,
    links: &TagMap,
) -> Result<String, MissingFieldError> {
    let project = project.validate()?;

    let image_section = render_image(&project, &templates.image);
    let tags = render_tags(project.tags, project.language);
    let stars = render_stars(project.stars);

    let card = fill(&templates.card, |name| {
        let value = match name {
            "image_section" => image_section.clone(),
            "title" => escape_html(project.title).into_owned(),
            "description" => escape_linked(project.description, links).into_owned(),
            "tags" => tags.clone(),
            "language" => project
                .language
                .map(|l| escape_html(l).into_owned())
                .unwrap_or_default(),
            "stars" => stars.clone(),
            "url" => escape_html(project.url).into_owned(),
            "button_text" => escape_html(project.button_text).into_owned(),
            _ => return None,
        };
        Some(value)
    });
    Ok(card.into_owned())
}

fn render_image(project: &Project<'_>, image_template: &str) -> String {
    let Some(image) = project.image else {
        return String::new();
    };
    fill(image_template, |name| match name {
        "image" => Some(escape_html(image).into_owned()),
        "title" => Some(escape_html(project.title).into_owned()),
        _ => None,
    })
    .into_owned()
}

/// Tag badges; a lone language badge stands in when there are no tags.
fn render_tags(tags: &[String], language: Option<&str>) -> String {
    if tags.is_empty() {
        return language
            .map(|language| {
                format!(
                    r#"<span class="badge bg-primary project-language">{}</span>"#,
                    escape_html(language)
                )
            })
            .unwrap_or_default();
    }

    tags.iter()
        .map(|tag| {
            format!(
                r#"<span class="badge bg-secondary project-tag">{}</span>"#,
                escape_html(tag)
            )
        })
        .collect::<Vec<_>>()
        .join(BADGE_SEPARATOR)
}

fn render_stars(stars: u64) -> String {
    if stars == 0 {
        return String::new();
    }
    format!(
        r#"<span class="badge bg-warning text-dark project-stars"><i class="bi bi-star-fill"></i> {stars}</span>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const CARD: &str =
        "{{image_section}}|{{title}}|{{description}}|{{tags}}|{{stars}}|{{url}}|{{button_text}}";
    const IMAGE: &str = r#"<img src="{{image}}" alt="{{title}}">"#;

    fn templates() -> ComponentTemplate {
        ComponentTemplate {
            card: CARD.into(),
            image: IMAGE.into(),
            ..Default::default()
        }
    }

    fn links() -> TagMap {
        TagMap::new([("Rust", "https://rust-lang.org")]).unwrap()
    }

    fn project() -> ProjectData {
        ProjectData {
            title: Some("P".into()),
            description: Some("D".into()),
            url: Some("http://x".into()),
            button_text: Some("Go".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_minimal_project() {
        let html = render_card(&project(), &templates(), &links()).unwrap();
        assert_eq!(html, "|P|D|||http://x|Go");
    }

    #[test]
    fn test_missing_url_named() {
        let mut data = project();
        data.url = None;

        let err = render_card(&data, &templates(), &links()).unwrap_err();
        assert_eq!(err.fields, vec!["url"]);
        assert_eq!(err.to_string(), "project missing required fields: url");
    }

    #[test]
    fn test_all_missing_fields_named_in_order() {
        let err = ProjectData::default().validate().unwrap_err();
        assert_eq!(err.fields, ProjectData::REQUIRED_FIELDS);
    }

    #[test]
    fn test_image_section() {
        let mut data = project();
        data.image = Some("img/p.png".into());

        let html = render_card(&data, &templates(), &links()).unwrap();
        assert!(html.starts_with(r#"<img src="img/p.png" alt="P">|P|"#));
    }

    #[test]
    fn test_empty_image_renders_nothing() {
        let mut data = project();
        data.image = Some(String::new());

        let html = render_card(&data, &templates(), &links()).unwrap();
        assert!(html.starts_with("|P|"));
    }

    #[test]
    fn test_tags_and_stars() {
        let mut data = project();
        data.tags = Some(vec!["Rust".into(), "CLI".into()]);
        data.language = Some("Rust".into());
        data.stars = Some(42);

        let html = render_card(&data, &templates(), &links()).unwrap();
        assert!(html.contains(r#"<span class="badge bg-secondary project-tag">Rust</span>"#));
        assert!(html.contains(r#"<span class="badge bg-secondary project-tag">CLI</span>"#));
        assert!(!html.contains("project-language"));
        assert!(html.contains("</i> 42</span>"));
    }

    #[test]
    fn test_language_badge_without_tags() {
        let mut data = project();
        data.language = Some("Go".into());
        data.tags = Some(vec![]);

        let html = render_card(&data, &templates(), &links()).unwrap();
        assert!(html.contains(r#"<span class="badge bg-primary project-language">Go</span>"#));
    }

    #[test]
    fn test_language_placeholder() {
        let templates = ComponentTemplate {
            card: "[{{language}}]".into(),
            ..Default::default()
        };
        let mut data = project();
        assert_eq!(render_card(&data, &templates, &links()).unwrap(), "[]");

        data.language = Some("C<3".into());
        assert_eq!(render_card(&data, &templates, &links()).unwrap(), "[C&lt;3]");
    }

    #[test]
    fn test_zero_stars_renders_nothing() {
        assert_eq!(render_stars(0), "");
        assert!(render_stars(7).contains("bi-star-fill"));
    }

    #[test]
    fn test_everything_escaped() {
        let data = ProjectData {
            title: Some("<script>alert(1)</script>".into()),
            description: Some("<b>bold</b>".into()),
            url: Some(r#"http://x/"onmouseover="#.into()),
            button_text: Some("Go & see".into()),
            image: Some(r#"a.png" onerror="x"#.into()),
            tags: Some(vec!["<i>".into()]),
            ..Default::default()
        };

        let html = render_card(&data, &templates(), &links()).unwrap();
        assert!(!html.contains("<script>"));
        assert!(!html.contains("<b>"));
        assert!(!html.contains("<i>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("http://x/&quot;onmouseover="));
        assert!(html.contains("Go &amp; see"));
        assert!(html.contains(r#"src="a.png&quot; onerror=&quot;x""#));
    }

    #[test]
    fn test_linked_description_keeps_anchor() {
        let mut data = project();
        data.description =
            Some(r#"Uses <a target="_blank" href="https://rust-lang.org">Rust</a> & C"#.into());

        let html = render_card(&data, &templates(), &links()).unwrap();
        assert!(html.contains(
            r#"|Uses <a target="_blank" href="https://rust-lang.org">Rust</a> &amp; C|"#
        ));
    }

    #[test]
    fn test_entity_encoded_script_anchor_escaped() {
        for href in ["&#106;avascript:alert(1)", "javascript&colon;alert(1)"] {
            let mut data = project();
            data.description = Some(format!(r#"<a target="_blank" href="{href}">x</a>"#));

            let html = render_card(&data, &templates(), &links()).unwrap();
            assert!(!html.contains("<a "), "{html}");
            assert!(html.contains("|&lt;a target=&quot;_blank&quot; href=&quot;"));
        }
    }

    #[test]
    fn test_values_not_rescanned() {
        let mut data = project();
        data.title = Some("{{url}}".into());

        let html = render_card(&data, &templates(), &links()).unwrap();
        assert!(html.starts_with("|{{url}}|"));
    }

    #[test]
    fn test_deserialize_lenient_record() {
        let data: ProjectData = serde_json::from_str(
            r#"{"title": "P", "url": "u", "stars": 5, "tags": ["a"], "extra": true}"#,
        )
        .unwrap();
        assert_eq!(data.stars, Some(5));
        assert_eq!(data.validate().unwrap_err().fields, vec!["description", "button_text"]);
    }

    #[test]
    fn test_deserialize_rejects_wrong_types() {
        assert!(serde_json::from_str::<ProjectData>(r#"{"stars": -1}"#).is_err());
        assert!(serde_json::from_str::<ProjectData>(r#"{"tags": "Rust"}"#).is_err());
        assert!(serde_json::from_str::<ProjectData>(r#""just a string""#).is_err());
    }
}

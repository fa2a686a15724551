//! Per-language page generation.
//!
//! # Flow
//!
//! ```text
//! <source>/tags.json ──► TagMap ─┐
//! <source>/<lang>.json ──────────┴─► apply_tags ─► placeholders ─┐
//! <source>/template.html ─────────────────────────────────────────┴─► substitute
//!                                                                         │
//!                                      <output>/<lang>/index.html ◄───────┘
//! ```
//!
//! Each top-level localization key is a placeholder token. Its
//! [`PlaceholderKind`] decides how the value is rendered and which token of
//! the page template receives it.

use super::error::GenerateError;
use crate::{
    config::FilesConfig,
    render::{
        Warning,
        projects::{ProjectsCollection, render_projects_section},
        section::TemplateCache,
        tags::TagMap,
        tree::apply_tags,
    },
    utils::minify::minify,
};
use regex::{Captures, Regex};
use rustc_hash::FxHashMap;
use serde_json::{Map, Value};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Localization key holding the projects collection.
pub const PROJECTS_KEY: &str = "$projects$";
/// Page template token receiving the rendered projects section.
pub const PROJECTS_PLACEHOLDER: &str = "$projects-content$";

/// Output file name inside each language directory.
const INDEX_FILE: &str = "index.html";

// ============================================================================
// Placeholder Kinds
// ============================================================================

/// How a top-level localization value is turned into page text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderKind {
    /// Value stringified and substituted at the key's own token.
    Text,
    /// Projects collection rendered into a section at [`PROJECTS_PLACEHOLDER`].
    Projects,
}

/// Keys that are not plain text, with the token they fill.
const STRUCTURED_KEYS: &[(&str, PlaceholderKind, &str)] =
    &[(PROJECTS_KEY, PlaceholderKind::Projects, PROJECTS_PLACEHOLDER)];

impl PlaceholderKind {
    /// Kind of `key` and the template token its rendering replaces.
    pub fn classify(key: &str) -> (Self, &str) {
        STRUCTURED_KEYS
            .iter()
            .find(|(k, _, _)| *k == key)
            .map_or((Self::Text, key), |&(_, kind, token)| (kind, token))
    }
}

// ============================================================================
// Generator
// ============================================================================

/// Summary of one rendered page.
#[derive(Debug, Clone, Default)]
pub struct RenderedPage {
    pub html: String,
    /// Linkable strings that received at least one link.
    pub linked: usize,
    /// Template tokens that were replaced (counting repeats).
    pub substituted: usize,
    pub groups: usize,
    pub cards: usize,
    pub warnings: Vec<Warning>,
}

/// Page generator for one run.
///
/// Owns the template cache, so component templates are read once per run
/// and a new run starts from a clean cache.
#[derive(Debug)]
pub struct Generator {
    files: FilesConfig,
    minify: bool,
    cache: TemplateCache,
}

impl Generator {
    pub fn new(files: FilesConfig) -> Self {
        Self {
            files,
            minify: false,
            cache: TemplateCache::new(),
        }
    }

    /// Minify pages before writing them.
    pub fn with_minify(mut self, minify: bool) -> Self {
        self.minify = minify;
        self
    }

    pub fn cache(&self) -> &TemplateCache {
        &self.cache
    }

    /// Render the page for `lang` from the inputs in `work_dir` and write it
    /// to `<output_dir>/index.html`.
    ///
    /// Nothing is written unless rendering succeeded; the file is replaced
    /// atomically.
    pub fn generate_page(
        &self,
        lang: &str,
        output_dir: &Path,
        work_dir: &Path,
    ) -> Result<(PathBuf, RenderedPage), GenerateError> {
        let page = self.render_page(lang, work_dir)?;
        let html = minify(page.html.as_bytes(), self.minify);

        fs::create_dir_all(output_dir)
            .map_err(|err| GenerateError::Write(output_dir.to_path_buf(), err))?;
        let path = output_dir.join(INDEX_FILE);
        write_atomic(&path, &html).map_err(|err| GenerateError::Write(path.clone(), err))?;

        Ok((path, page))
    }

    /// Render the page for `lang` without touching the filesystem output.
    pub fn render_page(&self, lang: &str, work_dir: &Path) -> Result<RenderedPage, GenerateError> {
        let tags_path = work_dir.join(&self.files.tags);
        let tags = TagMap::from_json(&read(&tags_path)?)
            .map_err(|err| GenerateError::Json(tags_path.clone(), err))?;

        let lang_path = work_dir.join(format!("{lang}.json"));
        let mut tree: Value = serde_json::from_str(&read(&lang_path)?)
            .map_err(|err| GenerateError::Json(lang_path.clone(), err))?;

        let template_path = work_dir.join(&self.files.template);
        let template = read(&template_path)?;

        let mut page = RenderedPage {
            linked: apply_tags(&mut tree, &tags),
            ..Default::default()
        };
        let Value::Object(entries) = tree else {
            return Err(GenerateError::NotAnObject(lang_path));
        };

        let mut replacements =
            self.placeholder_values(&entries, &tags, &lang_path, work_dir, &mut page)?;
        if !replacements.iter().any(|(token, _)| *token == PROJECTS_PLACEHOLDER) {
            if template.contains(PROJECTS_PLACEHOLDER) {
                page.warnings.push(Warning {
                    location: lang_path.display().to_string(),
                    message: format!(
                        "no `{PROJECTS_KEY}` entry, `{PROJECTS_PLACEHOLDER}` left empty"
                    ),
                });
            }
            replacements.push((PROJECTS_PLACEHOLDER, String::new()));
        }

        let (html, substituted) = substitute(&template, &replacements)?;
        page.html = html;
        page.substituted = substituted;
        Ok(page)
    }

    /// Token → rendered value for every top-level entry, in file order.
    fn placeholder_values<'a>(
        &self,
        entries: &'a Map<String, Value>,
        tags: &TagMap,
        lang_path: &Path,
        work_dir: &Path,
        page: &mut RenderedPage,
    ) -> Result<Vec<(&'a str, String)>, GenerateError> {
        let mut replacements = Vec::with_capacity(entries.len() + 1);

        for (key, value) in entries {
            let (kind, token) = PlaceholderKind::classify(key);
            let rendered = match kind {
                PlaceholderKind::Text => stringify(value),
                PlaceholderKind::Projects => {
                    let collection = ProjectsCollection::from_value(value).map_err(|source| {
                        GenerateError::Projects {
                            path: lang_path.to_path_buf(),
                            key: PROJECTS_KEY,
                            source,
                        }
                    })?;
                    let section = render_projects_section(
                        &collection,
                        &work_dir.join(&self.files.projects_template),
                        &self.cache,
                        tags,
                    )?;
                    page.groups += section.groups;
                    page.cards += section.cards;
                    page.warnings.extend(section.warnings);
                    section.html
                }
            };
            replacements.push((token, rendered));
        }
        Ok(replacements)
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn read(path: &Path) -> Result<String, GenerateError> {
    fs::read_to_string(path).map_err(|err| GenerateError::Read(path.to_path_buf(), err))
}

/// Text for a plain placeholder value.
fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Replace every token of `replacements` in `template` in a single pass.
///
/// Inserted values are never rescanned, so a value containing another token
/// keeps it verbatim. Longer tokens win over tokens they contain. Returns the
/// output and the number of replacements made.
fn substitute(
    template: &str,
    replacements: &[(&str, String)],
) -> Result<(String, usize), GenerateError> {
    let mut tokens: Vec<&str> = replacements
        .iter()
        .map(|(token, _)| *token)
        .filter(|token| !token.is_empty())
        .collect();
    if tokens.is_empty() {
        return Ok((template.to_owned(), 0));
    }
    tokens.sort_unstable_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
    tokens.dedup();

    let alternation = tokens
        .iter()
        .map(|token| regex::escape(token))
        .collect::<Vec<_>>()
        .join("|");
    let pattern = Regex::new(&alternation).map_err(GenerateError::Placeholders)?;

    // Later entries win for duplicate tokens.
    let values: FxHashMap<&str, &str> = replacements
        .iter()
        .map(|(token, value)| (*token, value.as_str()))
        .collect();

    let mut count = 0;
    let html = pattern.replace_all(template, |caps: &Captures| {
        count += 1;
        values.get(&caps[0]).copied().unwrap_or_default()
    });
    Ok((html.into_owned(), count))
}

/// Write through a sibling temporary file so readers never see a partial page.
fn write_atomic(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let tmp = path.with_extension("html.tmp");
    let result = fs::write(&tmp, content).and_then(|()| fs::rename(&tmp, path));
    if result.is_err() {
        fs::remove_file(&tmp).ok();
    }
    result
}

// ============================================================================
// Tests
// ============================================================================

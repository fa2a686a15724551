//! Marker-delimited template sections and the per-run template cache.
//!
//! One component template file carries the CSS block and every sub-template:
//!
//! ```html
//! <style> .project-card { … } </style>
//! <!--PROJECT_CARD_START-->    …{{title}}…    <!--PROJECT_CARD_END-->
//! <!--IMAGE_SECTION_START-->   …{{image}}…    <!--IMAGE_SECTION_END-->
//! <!--PROJECT_GROUP_START-->   …{{projects}}… <!--PROJECT_GROUP_END-->
//! ```

use super::RenderError;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

// ============================================================================
// Markers
// ============================================================================

/// A start/end marker pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Markers {
    pub start: &'static str,
    pub end: &'static str,
}

pub const CARD_MARKERS: Markers = Markers {
    start: "<!--PROJECT_CARD_START-->",
    end: "<!--PROJECT_CARD_END-->",
};

pub const IMAGE_MARKERS: Markers = Markers {
    start: "<!--IMAGE_SECTION_START-->",
    end: "<!--IMAGE_SECTION_END-->",
};

pub const GROUP_MARKERS: Markers = Markers {
    start: "<!--PROJECT_GROUP_START-->",
    end: "<!--PROJECT_GROUP_END-->",
};

const STYLE_OPEN: &str = "<style>";
const STYLE_CLOSE: &str = "</style>";

// ============================================================================
// Extraction
// ============================================================================

/// Text strictly between the first `start` and the first `end`, trimmed.
///
/// Both markers are searched from the beginning independently. A missing
/// marker, or an end marker that does not follow the start marker, yields
/// an empty string.
pub fn extract_section<'a>(template: &'a str, start: &str, end: &str) -> &'a str {
    let (Some(start_idx), Some(end_idx)) = (template.find(start), template.find(end)) else {
        return "";
    };
    template
        .get(start_idx + start.len()..end_idx)
        .map(str::trim)
        .unwrap_or("")
}

/// The first `<style>…</style>` block, tags included, or an empty string.
pub fn extract_style(template: &str) -> &str {
    let (Some(start_idx), Some(end_idx)) = (template.find(STYLE_OPEN), template.find(STYLE_CLOSE))
    else {
        return "";
    };
    template
        .get(start_idx..end_idx + STYLE_CLOSE.len())
        .filter(|_| start_idx < end_idx)
        .unwrap_or("")
}

/// Sub-templates carved out of one component template file.
///
/// An empty field means the section is absent; renderers fall back to
/// their built-in layout (group) or render nothing (image).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentTemplate {
    pub css: String,
    pub card: String,
    pub image: String,
    pub group: String,
}

impl ComponentTemplate {
    pub fn parse(content: &str) -> Self {
        let section = |m: Markers| extract_section(content, m.start, m.end).to_owned();
        Self {
            css: extract_style(content).to_owned(),
            card: section(CARD_MARKERS),
            image: section(IMAGE_MARKERS),
            group: section(GROUP_MARKERS),
        }
    }
}

// ============================================================================
// Template Cache
// ============================================================================

/// Read-through cache of parsed component templates, keyed by file path.
///
/// Constructed at the start of a generation run and shared by every
/// language of that run. Entries are never invalidated; concurrent first
/// loads of one path may both parse the file, the last write wins and both
/// values are identical.
#[derive(Debug, Default)]
pub struct TemplateCache {
    components: RwLock<FxHashMap<PathBuf, Arc<ComponentTemplate>>>,
}

impl TemplateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parsed component template at `path`, reading the file on first use.
    pub fn component(&self, path: &Path) -> Result<Arc<ComponentTemplate>, RenderError> {
        if let Some(cached) = self.components.read().get(path) {
            return Ok(Arc::clone(cached));
        }

        let content = fs::read_to_string(path)
            .map_err(|err| RenderError::Template(path.to_path_buf(), err))?;
        let parsed = Arc::new(ComponentTemplate::parse(&content));
        self.components
            .write()
            .insert(path.to_path_buf(), Arc::clone(&parsed));
        Ok(parsed)
    }

    pub fn len(&self) -> usize {
        self.components.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.read().is_empty()
    }
}

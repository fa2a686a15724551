//! `[build]` section configuration.
//!
//! Contains the input/output paths, the language list and output options.

use super::defaults;
use educe::Educe;
use serde::Deserialize;
use std::path::PathBuf;

/// `[build]` section in folio.toml - generation pipeline configuration.
///
/// # Example
/// ```toml
/// [build]
/// source = "generator"      # tags.json, <lang>.json and templates
/// output = "."              # pages land in <output>/<lang>/index.html
/// languages = ["de", "en"]
/// minify = false
/// ```
#[derive(Debug, Clone, Educe, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Project root directory (usually set via CLI `--root`).
    #[serde(default = "defaults::build::root")]
    #[educe(Default = defaults::build::root())]
    pub root: Option<PathBuf>,

    /// Directory holding the tag map, localization files and templates.
    #[serde(default = "defaults::build::source")]
    #[educe(Default = defaults::build::source())]
    pub source: PathBuf,

    /// Directory receiving one `<lang>/index.html` per language.
    #[serde(default = "defaults::build::output")]
    #[educe(Default = defaults::build::output())]
    pub output: PathBuf,

    /// Language codes to generate, each backed by `<source>/<lang>.json`.
    #[serde(default = "defaults::build::languages")]
    #[educe(Default = defaults::build::languages())]
    pub languages: Vec<String>,

    /// Minify generated HTML.
    #[serde(default = "defaults::r#false")]
    #[educe(Default = false)]
    pub minify: bool,

    /// Generate languages concurrently.
    #[serde(default = "defaults::r#false")]
    #[educe(Default = false)]
    pub parallel: bool,

    /// Input file names inside the source directory.
    #[serde(default)]
    pub files: FilesConfig,
}

/// `[build.files]` section - input file names, relative to `[build.source]`.
#[derive(Debug, Clone, Educe, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct FilesConfig {
    /// Keyword → URL map used for tag linking.
    #[serde(default = "defaults::build::files::tags")]
    #[educe(Default = defaults::build::files::tags())]
    pub tags: PathBuf,

    /// Page template with `$key$` placeholders.
    #[serde(default = "defaults::build::files::template")]
    #[educe(Default = defaults::build::files::template())]
    pub template: PathBuf,

    /// Component template with the card/image/group sections and CSS.
    #[serde(default = "defaults::build::files::projects_template")]
    #[educe(Default = defaults::build::files::projects_template())]
    pub projects_template: PathBuf,
}

//! Site configuration management for `folio.toml`.
//!
//! # Sections
//!
//! | Section          | Purpose                                        |
//! |------------------|------------------------------------------------|
//! | `[build]`        | Source/output paths, languages, output options |
//! | `[build.files]`  | Input file names inside the source directory   |
//!
//! The file is optional: without it every field takes its default.
//!
//! # Example
//!
//! ```toml
//! [build]
//! source = "generator"
//! output = "."
//! languages = ["de", "en"]
//!
//! [build.files]
//! tags = "tags.json"
//! ```

mod build;
pub mod defaults;
mod error;

pub use build::{BuildConfig, FilesConfig};
pub use error::ConfigError;

use crate::cli::{Cli, Commands};
use anyhow::{Result, bail};
use educe::Educe;
use serde::Deserialize;
use std::{
    fs,
    path::{Component, Path, PathBuf},
};

/// Root configuration structure representing folio.toml
#[derive(Debug, Clone, Educe, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Generation settings
    #[serde(default)]
    pub build: BuildConfig,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Read(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        self.build.root.as_deref().unwrap_or(Path::new("./"))
    }

    /// Set the root directory path
    pub fn set_root(&mut self, path: &Path) {
        self.build.root = Some(path.to_path_buf())
    }

    /// Directory receiving the page for `lang`.
    pub fn language_output_dir(&self, lang: &str) -> PathBuf {
        self.build.output.join(lang)
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &Cli) {
        let root = cli
            .root
            .as_ref()
            .cloned()
            .unwrap_or_else(|| self.get_root().to_owned());

        Self::update_option(&mut self.build.source, cli.source.as_ref());
        Self::update_option(&mut self.build.output, cli.output.as_ref());

        if !cli.languages().is_empty() {
            self.build.languages = cli.languages().to_vec();
        }

        if let Commands::Build {
            minify, parallel, ..
        } = &cli.command
        {
            Self::update_option(&mut self.build.minify, minify.as_ref());
            Self::update_option(&mut self.build.parallel, parallel.as_ref());
        }

        self.update_path_with_root(&root, &cli.config);
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Resolve every path against the root and normalize to absolute paths
    fn update_path_with_root(&mut self, root: &Path, config_file: &Path) {
        let root = Self::normalize_path(&Self::expand_tilde(root));
        self.set_root(&root);

        self.config_path = Self::normalize_path(&root.join(config_file));
        self.build.source =
            Self::normalize_path(&root.join(Self::expand_tilde(&self.build.source)));
        self.build.output =
            Self::normalize_path(&root.join(Self::expand_tilde(&self.build.output)));
    }

    /// Expand a leading `~` to the home directory
    fn expand_tilde(path: &Path) -> PathBuf {
        match path.to_str() {
            Some(s) => PathBuf::from(shellexpand::tilde(s).into_owned()),
            None => path.to_path_buf(),
        }
    }

    /// Normalize a path to absolute, using canonicalize if the path exists
    fn normalize_path(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| {
            // For non-existent paths, manually make them absolute
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            }
        })
    }

    /// Validate configuration before generating
    pub fn validate(&self) -> Result<()> {
        if !self.build.source.is_dir() {
            bail!(ConfigError::invalid(
                "build.source",
                format!("`{}` is not a directory", self.build.source.display())
            ));
        }

        if self.build.languages.is_empty() {
            bail!(ConfigError::invalid(
                "build.languages",
                "must have at least one element"
            ));
        }

        if let Some(lang) = self.build.languages.iter().find(|l| !is_plain_component(l)) {
            bail!(ConfigError::invalid(
                "build.languages",
                format!("`{lang}` is not a valid language code")
            ));
        }

        Ok(())
    }
}

/// A language code doubles as a file stem and an output directory name,
/// so it must be exactly one normal path component.
fn is_plain_component(lang: &str) -> bool {
    let mut components = Path::new(lang).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_from_str() {
        let config = SiteConfig::from_str(
            r#"
            [build]
            languages = ["en"]
            "#,
        )
        .unwrap();

        assert_eq!(config.build.languages, vec!["en"]);
    }

    #[test]
    fn test_from_str_invalid_toml() {
        let result = SiteConfig::from_str("[build\nsource = 1");
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_section_rejected() {
        let result = SiteConfig::from_str("[serve]\nport = 8080");
        assert!(result.is_err());
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = SiteConfig::from_path(Path::new("/definitely/not/here/folio.toml")).unwrap_err();
        assert!(err.to_string().starts_with("cannot read config file"));
    }

    #[test]
    fn test_get_root_default() {
        let config = SiteConfig::default();
        assert_eq!(config.get_root(), Path::new("./"));
    }

    #[test]
    fn test_set_root() {
        let mut config = SiteConfig::default();
        config.set_root(Path::new("/custom/path"));
        assert_eq!(config.get_root(), Path::new("/custom/path"));
    }

    #[test]
    fn test_update_with_cli_overrides() {
        let cli = Cli::try_parse_from([
            "folio", "-r", "/site", "-s", "data", "-o", "public", "build", "-l", "fr", "--minify",
        ])
        .unwrap();
        let mut config = SiteConfig::default();
        config.update_with_cli(&cli);

        assert_eq!(config.get_root(), Path::new("/site"));
        assert_eq!(config.build.source, PathBuf::from("/site/data"));
        assert_eq!(config.build.output, PathBuf::from("/site/public"));
        assert_eq!(config.config_path, PathBuf::from("/site/folio.toml"));
        assert_eq!(config.build.languages, vec!["fr"]);
        assert!(config.build.minify);
        assert!(!config.build.parallel);
    }

    #[test]
    fn test_update_with_cli_keeps_file_values() {
        let cli = Cli::try_parse_from(["folio", "-r", "/site", "check"]).unwrap();
        let mut config = SiteConfig::from_str(
            r#"
            [build]
            languages = ["it"]
            minify = true
            "#,
        )
        .unwrap();
        config.update_with_cli(&cli);

        assert_eq!(config.build.languages, vec!["it"]);
        assert!(config.build.minify);
        assert_eq!(config.build.source, PathBuf::from("/site/generator"));
    }

    #[test]
    fn test_language_paths() {
        let mut config = SiteConfig::default();
        config.build.output = PathBuf::from("/site");

        assert_eq!(config.language_output_dir("de"), PathBuf::from("/site/de"));
    }

    #[test]
    fn test_validate() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut config = SiteConfig::default();
        config.build.source = dir.path().to_path_buf();
        assert!(config.validate().is_ok());

        config.build.languages = vec![];
        assert!(config.validate().is_err());

        config.build.languages = vec!["../de".into()];
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("not a valid language code"));

        config.build.languages = vec!["en".into()];
        config.build.source = dir.path().join("missing");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_is_plain_component() {
        assert!(is_plain_component("en"));
        assert!(is_plain_component("zh-Hans"));
        assert!(!is_plain_component(""));
        assert!(!is_plain_component(".."));
        assert!(!is_plain_component("a/b"));
        assert!(!is_plain_component("/en"));
    }
}

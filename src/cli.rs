//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Folio multilingual page generator CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Project root directory (default: current directory)
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Source directory holding tags.json, <lang>.json and templates (relative to root)
    #[arg(short, long)]
    pub source: Option<PathBuf>,

    /// Output directory receiving <lang>/index.html (relative to root)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Config file name (default: folio.toml)
    #[arg(short = 'C', long, default_value = "folio.toml")]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Language selection shared by Build and Check
#[derive(clap::Args, Debug, Clone)]
pub struct LangArgs {
    /// Only process these languages (repeatable), overriding [build.languages]
    #[arg(short, long = "lang", value_name = "LANG")]
    pub languages: Vec<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Generate one index.html per language
    Build {
        #[command(flatten)]
        lang_args: LangArgs,

        /// Minify the html content
        #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
        minify: Option<bool>,

        /// Generate languages concurrently
        #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
        parallel: Option<bool>,
    },

    /// Render every language without writing anything, reporting problems
    Check {
        #[command(flatten)]
        lang_args: LangArgs,
    },
}

impl Cli {
    pub const fn is_check(&self) -> bool {
        matches!(self.command, Commands::Check { .. })
    }

    /// Languages requested on the command line (empty when none were given).
    pub fn languages(&self) -> &[String] {
        match &self.command {
            Commands::Build { lang_args, .. } | Commands::Check { lang_args } => {
                &lang_args.languages
            }
        }
    }
}

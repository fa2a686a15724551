//! Site generation orchestration.
//!
//! # Architecture
//!
//! ```text
//! build_site()
//!     │
//!     ├── Generator::new() ──► one TemplateCache for the run
//!     │
//!     ├── for each language (sequential, or rayon when parallel)
//!     │       │
//!     │       ├── build: generate_page() ──► <output>/<lang>/index.html
//!     │       └── check: render_page()   ──► nothing written
//!     │
//!     └── summary ──► error if any language failed
//! ```
//!
//! A failing language is logged and skipped; the others still run.

use crate::{
    config::SiteConfig,
    generator::{GenerateError, Generator, RenderedPage},
    log,
};
use anyhow::{Result, bail};
use rayon::prelude::*;
use std::{error::Error as _, path::PathBuf};

/// What to do with each rendered page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Write `<output>/<lang>/index.html`.
    Build,
    /// Render only.
    Check,
}

/// Result of one language.
#[derive(Debug)]
pub struct LanguageReport {
    pub lang: String,
    /// Written file, `None` in check mode.
    pub path: Option<PathBuf>,
    pub page: RenderedPage,
}

/// Totals over a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub pages: usize,
    pub failed: usize,
    pub cards: usize,
    pub warnings: usize,
}

/// Generate every configured language.
pub fn build_site(config: &SiteConfig, mode: Mode) -> Result<Summary> {
    let generator = Generator::new(config.build.files.clone()).with_minify(config.build.minify);
    let languages = &config.build.languages;

    let run = |lang: &String| {
        let result = run_language(&generator, config, lang, mode);
        report_language(lang, &result);
        result
    };
    let results: Vec<_> = if config.build.parallel {
        languages.par_iter().map(run).collect()
    } else {
        languages.iter().map(run).collect()
    };

    let summary = summarize(&results);
    let verb = match mode {
        Mode::Build => "generated",
        Mode::Check => "checked",
    };
    log!(
        "build";
        "{verb} {} of {} pages, {} cards, {} warnings",
        summary.pages,
        languages.len(),
        summary.cards,
        summary.warnings
    );

    if summary.failed > 0 {
        bail!("{} of {} languages failed", summary.failed, languages.len());
    }
    Ok(summary)
}

fn run_language(
    generator: &Generator,
    config: &SiteConfig,
    lang: &str,
    mode: Mode,
) -> Result<LanguageReport, GenerateError> {
    let source = &config.build.source;
    let (path, page) = match mode {
        Mode::Build => {
            let output_dir = config.language_output_dir(lang);
            let (path, page) = generator.generate_page(lang, &output_dir, source)?;
            (Some(path), page)
        }
        Mode::Check => (None, generator.render_page(lang, source)?),
    };

    Ok(LanguageReport {
        lang: lang.to_owned(),
        path,
        page,
    })
}

fn report_language(lang: &str, result: &Result<LanguageReport, GenerateError>) {
    match result {
        Ok(report) => {
            for warning in &report.page.warnings {
                log!("warn"; "[{}] {}", report.lang, warning);
            }
            match &report.path {
                Some(path) => log!(
                    "page";
                    "[{}] {} ({} groups, {} cards)",
                    report.lang,
                    path.display(),
                    report.page.groups,
                    report.page.cards
                ),
                None => log!(
                    "check";
                    "[{}] ok, {} placeholders, {} linked texts",
                    report.lang,
                    report.page.substituted,
                    report.page.linked
                ),
            }
        }
        Err(err) => log!("error"; "[{lang}] {}", error_chain(err)),
    }
}

/// Error and all its sources on one line.
fn error_chain(err: &GenerateError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

fn summarize(results: &[Result<LanguageReport, GenerateError>]) -> Summary {
    results.iter().fold(Summary::default(), |mut acc, result| {
        match result {
            Ok(report) => {
                acc.pages += 1;
                acc.cards += report.page.cards;
                acc.warnings += report.page.warnings.len();
            }
            Err(_) => acc.failed += 1,
        }
        acc
    })
}

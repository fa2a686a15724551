//! Page generation errors.
//!
//! Every variant is fatal for the language being generated and leaves its
//! previous output untouched.

use crate::render::RenderError;
use std::{io, path::PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("failed to read `{0}`")]
    Read(PathBuf, #[source] io::Error),

    #[error("malformed JSON in `{0}`")]
    Json(PathBuf, #[source] serde_json::Error),

    #[error("`{0}` must contain a JSON object at the top level")]
    NotAnObject(PathBuf),

    #[error("`{key}` in `{path}` is not a projects collection")]
    Projects {
        path: PathBuf,
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("too many placeholders to build a matcher")]
    Placeholders(#[source] regex::Error),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("failed to write `{0}`")]
    Write(PathBuf, #[source] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_display_names_path() {
        let err = GenerateError::Read(
            PathBuf::from("generator/de.json"),
            io::Error::new(io::ErrorKind::NotFound, "gone"),
        );
        assert_eq!(err.to_string(), "failed to read `generator/de.json`");
        assert_eq!(err.source().unwrap().to_string(), "gone");
    }

    #[test]
    fn test_render_error_is_transparent() {
        let err = GenerateError::from(RenderError::MalformedGroup("bad".into()));
        assert_eq!(err.to_string(), "malformed project group: bad");
    }
}

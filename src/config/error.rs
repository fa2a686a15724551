//! Errors raised while loading `folio.toml`.

use std::{io, path::PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file `{0}`")]
    Read(PathBuf, #[source] io::Error),

    #[error("malformed folio.toml")]
    Syntax(#[from] toml::de::Error),

    /// A value that parsed but cannot be used; `section` is the dotted key.
    #[error("invalid [{section}] in folio.toml: {message}")]
    Invalid {
        section: &'static str,
        message: String,
    },
}

impl ConfigError {
    pub fn invalid(section: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            section,
            message: message.into(),
        }
    }
}

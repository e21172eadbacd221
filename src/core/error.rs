//! Error kinds surfaced by the library layer.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HodlError {
    #[error("no value for key '{key}' in section [{section}]")]
    NotFound { section: String, key: String },

    /// Displayed verbatim to the user, hence the CLI-style wording.
    #[error("HODL: error: invalid choice: {0} (please supply a number)")]
    NotANumber(String),

    #[error("HODL: error: invalid choice: {0} (please supply a positive number)")]
    Negative(String),

    #[error("value too large to compute: {0}")]
    Overflow(String),

    #[error("not a rate: '{0}'")]
    MalformedRate(String),

    #[error("failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Ini {
        path: PathBuf,
        #[source]
        source: ini::Error,
    },
}

impl HodlError {
    /// Input rejections are reported to the user but do not fail the command.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, HodlError::NotANumber(_) | HodlError::Negative(_))
    }
}

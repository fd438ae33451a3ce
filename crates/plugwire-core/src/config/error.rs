//! # Plugwire Core Configuration Errors
//!
//! [`ConfigError`] covers everything that can go wrong between a wiring file
//! on disk and a parsed [`WiringConfig`](crate::config::WiringConfig).
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error reading wiring file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported configuration format: {0}")]
    UnsupportedFormat(String),

    #[error("Deserialization from '{format}' failed: {source}")]
    Parse {
        format: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

impl ConfigError {
    pub fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        ConfigError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn parse<E>(format: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ConfigError::Parse {
            format: format.into(),
            source: Box::new(source),
        }
    }
}

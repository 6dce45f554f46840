//! Error types for tessera.

use std::io;

/// Errors produced by the tessera toolkit.
#[derive(Debug, thiserror::Error)]
pub enum TesseraError {
    /// A (category, name) pair was absent from one of the skin stores.
    #[error("no {kind} entry \"{category};{name}\" in skin")]
    MissingEntry {
        /// Which store kind was queried ("value", "sprite", "color", "font").
        kind: &'static str,
        category: String,
        name: String,
    },

    #[error("skin error: {0}")]
    Skin(String),

    #[error("layout error: {0}")]
    Layout(String),

    #[error("resource error: {0}")]
    Resource(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl TesseraError {
    /// Shorthand for a store miss.
    pub fn missing(kind: &'static str, category: &str, name: &str) -> Self {
        Self::MissingEntry {
            kind,
            category: category.to_string(),
            name: name.to_string(),
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, TesseraError>;

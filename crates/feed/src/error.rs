// ABOUTME: Error types for feed encoding operations.
// ABOUTME: Provides EncodeError with UnknownFormat, Xml and Json variants.

use std::fmt;
use thiserror::Error;

/// Errors that can occur while choosing a format or serializing a feed.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The requested output format is not atom, rss or json.
    #[error("unknown feed format {0:?} (expected atom, rss or json)")]
    UnknownFormat(String),

    /// Writing the Atom or RSS document failed.
    #[error("failed to write XML feed: {0}")]
    Xml(String),

    /// Serializing the JSON Feed document failed.
    #[error("failed to write JSON feed: {0}")]
    Json(#[from] serde_json::Error),
}

impl EncodeError {
    /// Creates an Xml error from an underlying quick-xml or UTF-8 error.
    pub fn xml(err: impl fmt::Display) -> Self {
        EncodeError::Xml(err.to_string())
    }
}

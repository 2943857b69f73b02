// ABOUTME: Error types for compiling extraction specs into matchers and templates.
// ABOUTME: SpecError covers configuration failures; TemplateError locates template syntax errors.

use std::fmt;
use thiserror::Error;

/// A syntax error inside a text template, located by byte offset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at offset {offset}")]
pub struct TemplateError {
    pub offset: usize,
    pub message: String,
}

impl TemplateError {
    pub fn new(offset: usize, message: impl Into<String>) -> Self {
        Self {
            offset,
            message: message.into(),
        }
    }
}

/// Errors raised while compiling a feed configuration.
///
/// These are configuration errors: a feed that fails to compile is never
/// served. Per-item problems (missing matches, bad dates) are not errors.
#[derive(Debug, Error)]
pub enum SpecError {
    /// A CSS selector (item or field) failed to parse.
    #[error("invalid selector {selector:?} for {context}: {message}")]
    Selector {
        context: String,
        selector: String,
        message: String,
    },

    /// A title, description or filter template failed to parse.
    #[error("invalid {name} template: {source}")]
    Template {
        name: String,
        #[source]
        source: TemplateError,
    },

    /// The date regex failed to compile.
    #[error("invalid date_regex {pattern:?}: {source}")]
    Regex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The date format contains an unknown strftime specifier.
    #[error("invalid date_format {0:?}")]
    DateFormat(String),

    /// The link or date field is not declared in `values`.
    #[error("{role} field {name:?} is not defined in values")]
    UnknownField { role: &'static str, name: String },

    /// The feed link is not an absolute URL.
    #[error("invalid feed link {link:?}: {source}")]
    BaseUrl {
        link: String,
        #[source]
        source: url::ParseError,
    },

    /// Wraps any of the above with the slug of the feed that failed.
    #[error("feed {slug:?}: {source}")]
    Feed {
        slug: String,
        #[source]
        source: Box<SpecError>,
    },
}

impl SpecError {
    /// Creates a Selector error from a parse failure.
    pub fn selector(
        context: impl Into<String>,
        selector: impl Into<String>,
        message: impl fmt::Display,
    ) -> Self {
        SpecError::Selector {
            context: context.into(),
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Attaches the feed slug to an error.
    pub fn in_feed(self, slug: impl Into<String>) -> Self {
        SpecError::Feed {
            slug: slug.into(),
            source: Box::new(self),
        }
    }
}

// ABOUTME: Output format selection for encoded feeds.
// ABOUTME: FeedFormat parses atom/rss/json names and dispatches to the matching encoder.

use std::fmt;
use std::str::FromStr;

use crate::error::EncodeError;
use crate::models::Feed;
use crate::{atom, json, rss};

/// Supported syndication formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FeedFormat {
    #[default]
    Atom,
    Rss,
    Json,
}

impl FeedFormat {
    /// Picks the output format for a request.
    ///
    /// A configured format wins over the request extension; with neither the
    /// feed is Atom. Empty strings count as unset.
    pub fn select(configured: Option<&str>, extension: Option<&str>) -> Result<Self, EncodeError> {
        match configured.filter(|s| !s.is_empty()).or(extension.filter(|s| !s.is_empty())) {
            Some(name) => name.parse(),
            None => Ok(FeedFormat::Atom),
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            FeedFormat::Atom => "application/atom+xml; charset=UTF-8",
            FeedFormat::Rss => "application/rss+xml; charset=UTF-8",
            FeedFormat::Json => "application/feed+json; charset=UTF-8",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            FeedFormat::Atom => "atom",
            FeedFormat::Rss => "rss",
            FeedFormat::Json => "json",
        }
    }

    /// Serializes `feed` in this format.
    pub fn encode(self, feed: &Feed) -> Result<String, EncodeError> {
        match self {
            FeedFormat::Atom => atom::to_atom(feed),
            FeedFormat::Rss => rss::to_rss(feed),
            FeedFormat::Json => json::to_json_feed(feed),
        }
    }
}

impl FromStr for FeedFormat {
    type Err = EncodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "atom" => Ok(FeedFormat::Atom),
            "rss" => Ok(FeedFormat::Rss),
            "json" => Ok(FeedFormat::Json),
            _ => Err(EncodeError::UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for FeedFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("ATOM".parse::<FeedFormat>().unwrap(), FeedFormat::Atom);
        assert_eq!("Rss".parse::<FeedFormat>().unwrap(), FeedFormat::Rss);
        assert_eq!("json".parse::<FeedFormat>().unwrap(), FeedFormat::Json);
        assert!(matches!(
            "html".parse::<FeedFormat>(),
            Err(EncodeError::UnknownFormat(ref s)) if s == "html"
        ));
    }

    #[test]
    fn test_select_precedence() {
        assert_eq!(FeedFormat::select(None, None).unwrap(), FeedFormat::Atom);
        assert_eq!(FeedFormat::select(None, Some("rss")).unwrap(), FeedFormat::Rss);
        assert_eq!(
            FeedFormat::select(Some("json"), Some("rss")).unwrap(),
            FeedFormat::Json
        );
        assert_eq!(FeedFormat::select(Some(""), Some("rss")).unwrap(), FeedFormat::Rss);
        assert!(FeedFormat::select(None, Some("xml")).is_err());
    }

    #[test]
    fn test_content_types() {
        assert_eq!(
            FeedFormat::Atom.content_type(),
            "application/atom+xml; charset=UTF-8"
        );
        assert_eq!(
            FeedFormat::Json.content_type(),
            "application/feed+json; charset=UTF-8"
        );
        assert_eq!(FeedFormat::Rss.to_string(), "rss");
    }
}

// ABOUTME: Raw, deserializable feed configuration records as written by users.
// ABOUTME: FeedConfig carries feed metadata; ItemSpec carries the per-item extraction rules.

//! Feed configuration records.
//!
//! These are plain data: nothing here is validated. `CompiledFeed::compile`
//! turns an `ItemSpec` into ready-to-use selectors and templates.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One named feed: metadata plus the extraction rules for its source page.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FeedConfig {
    /// Feed title shown to readers
    pub title: String,
    /// Feed description
    #[serde(default)]
    pub description: String,
    /// Source page URL; also the base for resolving item links
    pub link: String,
    /// Forced output format (atom, rss, json)
    #[serde(default)]
    pub format: Option<String>,
    /// Extraction rules
    pub spec: ItemSpec,
}

/// Declarative extraction rules for the repeated items of a page.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ItemSpec {
    /// CSS selector matching each item element
    pub item: String,
    /// Field name to selector expression (`+` sibling, `@` the element itself)
    #[serde(default)]
    pub values: HashMap<String, String>,
    /// Title template
    #[serde(default)]
    pub title: String,
    /// Description template
    #[serde(default)]
    pub description: String,
    /// Field whose `href` becomes the item link
    #[serde(default)]
    pub link: Option<String>,
    /// Filter template; rendering "false" or "" drops the item
    #[serde(default)]
    pub filter: String,
    /// Field holding the item date
    #[serde(default)]
    pub date: Option<String>,
    /// Regex narrowing the date text to the matched substring
    #[serde(default)]
    pub date_regex: Option<String>,
    /// Explicit date format: "rfc3339" (default), "rfc2822" or a strftime pattern
    #[serde(default)]
    pub date_format: Option<String>,
    /// Literal token replacements applied before date parsing
    #[serde(default)]
    pub date_map: HashMap<String, String>,
}

/// Treats an empty or whitespace-only optional string as unset.
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_json() {
        let json = r#"{
            "title": "News",
            "link": "https://example.com/news",
            "spec": {
                "item": "article",
                "values": { "Title": "h2", "Link": "h2 a" },
                "title": "{{ .Title.Text }}",
                "link": "Link"
            }
        }"#;

        let config: FeedConfig = serde_json::from_str(json).expect("deserialize");
        assert_eq!(config.title, "News");
        assert_eq!(config.description, "");
        assert!(config.format.is_none());
        assert_eq!(config.spec.item, "article");
        assert_eq!(config.spec.values.len(), 2);
        assert_eq!(config.spec.link.as_deref(), Some("Link"));
        assert!(config.spec.filter.is_empty());
        assert!(config.spec.date.is_none());
        assert!(config.spec.date_map.is_empty());
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(&Some("Date".to_string())), Some("Date"));
        assert_eq!(non_empty(&Some("  ".to_string())), None);
        assert_eq!(non_empty(&None), None);
    }
}

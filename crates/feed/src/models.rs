// ABOUTME: Feed-level models handed to the encoders.
// ABOUTME: Pairs channel metadata from the config with the extracted items and their latest date.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use scrapefeed_extract::{FeedConfig, FeedResult, NormalizedItem};

/// Channel metadata: what the feed is called and where it lives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedMeta {
    pub title: String,
    pub description: String,
    pub link: String,
}

impl From<&FeedConfig> for FeedMeta {
    fn from(config: &FeedConfig) -> Self {
        Self {
            title: config.title.clone(),
            description: config.description.clone(),
            link: config.link.clone(),
        }
    }
}

/// A complete feed ready to encode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feed {
    pub meta: FeedMeta,
    pub items: Vec<NormalizedItem>,
    /// Newest item date; `None` when no item had a resolvable date.
    pub updated: Option<DateTime<Utc>>,
}

impl Feed {
    pub fn new(meta: FeedMeta, result: FeedResult) -> Self {
        Self {
            meta,
            updated: result.latest_created_at,
            items: result.items,
        }
    }

    /// The HTTP `Date` value for this feed, when it has a date.
    pub fn http_date(&self) -> Option<String> {
        self.updated.map(http_date)
    }
}

/// Formats a timestamp as an RFC 7231 IMF-fixdate (`Sun, 06 Nov 1994 08:49:37 GMT`).
pub fn http_date(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

// ABOUTME: JSON Feed 1.1 encoder for extracted feeds.
// ABOUTME: Maps feed metadata and items onto the jsonfeed.org document shape via serde.

use chrono::SecondsFormat;
use serde::Serialize;

use crate::error::EncodeError;
use crate::models::Feed;

const JSON_FEED_VERSION: &str = "https://jsonfeed.org/version/1.1";

#[derive(Debug, Serialize)]
struct JsonFeed<'a> {
    version: &'static str,
    title: &'a str,
    home_page_url: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    description: &'a str,
    items: Vec<JsonFeedItem<'a>>,
}

#[derive(Debug, Serialize)]
struct JsonFeedItem<'a> {
    id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<&'a str>,
    title: &'a str,
    content_html: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    date_published: Option<String>,
}

/// Serializes `feed` as a pretty-printed JSON Feed document.
pub fn to_json_feed(feed: &Feed) -> Result<String, EncodeError> {
    let items = feed
        .items
        .iter()
        .map(|item| JsonFeedItem {
            id: &item.id,
            url: Some(item.link.as_str()).filter(|link| !link.is_empty()),
            title: &item.title,
            content_html: &item.description,
            date_published: item
                .created_at
                .map(|at| at.to_rfc3339_opts(SecondsFormat::Secs, true)),
        })
        .collect();

    let doc = JsonFeed {
        version: JSON_FEED_VERSION,
        title: &feed.meta.title,
        home_page_url: &feed.meta.link,
        description: &feed.meta.description,
        items,
    };
    Ok(serde_json::to_string_pretty(&doc)?)
}

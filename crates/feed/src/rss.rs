// ABOUTME: RSS 2.0 encoder for extracted feeds.
// ABOUTME: Undated items omit pubDate; guids are permalinks only when the id is the item link.

use crate::error::EncodeError;
use crate::models::Feed;
use crate::xml::XmlDoc;

/// Serializes `feed` as an RSS 2.0 document.
pub fn to_rss(feed: &Feed) -> Result<String, EncodeError> {
    let mut doc = XmlDoc::new()?;
    doc.open("rss", &[("version", "2.0")])?;
    doc.open("channel", &[])?;
    doc.text("title", &[], &feed.meta.title)?;
    doc.text("link", &[], &feed.meta.link)?;
    doc.text("description", &[], &feed.meta.description)?;
    if let Some(updated) = feed.updated {
        doc.text("lastBuildDate", &[], &updated.to_rfc2822())?;
    }

    for item in &feed.items {
        doc.open("item", &[])?;
        doc.text("title", &[], &item.title)?;
        if !item.link.is_empty() {
            doc.text("link", &[], &item.link)?;
        }
        doc.text("description", &[], &item.description)?;
        let permalink = if !item.link.is_empty() && item.id == item.link {
            "true"
        } else {
            "false"
        };
        doc.text("guid", &[("isPermaLink", permalink)], &item.id)?;
        if let Some(at) = item.created_at {
            doc.text("pubDate", &[], &at.to_rfc2822())?;
        }
        doc.close("item")?;
    }

    doc.close("channel")?;
    doc.close("rss")?;
    doc.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FeedMeta;
    use chrono::{TimeZone, Utc};
    use scrapefeed_extract::NormalizedItem;

    #[test]
    fn test_rss_document() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let feed = Feed {
            meta: FeedMeta {
                title: "News".to_string(),
                description: "Latest".to_string(),
                link: "https://example.com/news".to_string(),
            },
            items: vec![
                NormalizedItem {
                    title: "First".to_string(),
                    description: "Body".to_string(),
                    link: "https://example.com/news/1".to_string(),
                    id: "https://example.com/news/1".to_string(),
                    created_at: Some(at),
                },
                NormalizedItem {
                    title: "Second".to_string(),
                    id: "tag:example.com,0001-01-01:abc".to_string(),
                    ..Default::default()
                },
            ],
            updated: Some(at),
        };

        let xml = to_rss(&feed).unwrap();
        assert!(xml.contains("<rss version=\"2.0\">"));
        assert!(xml.contains("<lastBuildDate>Fri, "));
        assert!(xml.contains("Mar 2024 12:00:00 +0000</lastBuildDate>"));
        assert!(xml.contains(
            "<guid isPermaLink=\"true\">https://example.com/news/1</guid>"
        ));
        assert!(xml.contains(
            "<guid isPermaLink=\"false\">tag:example.com,0001-01-01:abc</guid>"
        ));
        assert_eq!(xml.matches("<pubDate>").count(), 1);
        assert_eq!(xml.matches("<item>").count(), 2);
    }

    #[test]
    fn test_rss_without_dates() {
        let feed = Feed {
            meta: FeedMeta {
                title: "Empty".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        let xml = to_rss(&feed).unwrap();
        assert!(!xml.contains("lastBuildDate"));
        assert!(!xml.contains("<item>"));
        assert!(xml.contains("<title>Empty</title>"));
    }
}

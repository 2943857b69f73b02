// ABOUTME: Atom 1.0 encoder for extracted feeds.
// ABOUTME: Entries without a date inherit the feed's updated time, which falls back to now.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::EncodeError;
use crate::models::Feed;
use crate::xml::XmlDoc;

const ATOM_NS: &str = "http://www.w3.org/2005/Atom";

fn rfc3339(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Serializes `feed` as an Atom document.
pub fn to_atom(feed: &Feed) -> Result<String, EncodeError> {
    // Atom requires <updated> on the feed and on every entry.
    let updated = rfc3339(feed.updated.unwrap_or_else(Utc::now));

    let mut doc = XmlDoc::new()?;
    doc.open("feed", &[("xmlns", ATOM_NS)])?;
    doc.text("title", &[], &feed.meta.title)?;
    doc.text("id", &[], &feed.meta.link)?;
    doc.text("updated", &[], &updated)?;
    if !feed.meta.description.is_empty() {
        doc.text("subtitle", &[], &feed.meta.description)?;
    }
    doc.empty("link", &[("href", feed.meta.link.as_str())])?;

    for item in &feed.items {
        doc.open("entry", &[])?;
        doc.text("title", &[], &item.title)?;
        if !item.link.is_empty() {
            doc.empty("link", &[("rel", "alternate"), ("href", item.link.as_str())])?;
        }
        doc.text("id", &[], &item.id)?;
        let entry_updated = item.created_at.map(rfc3339);
        doc.text("updated", &[], entry_updated.as_deref().unwrap_or(updated.as_str()))?;
        if !item.description.is_empty() {
            doc.text("summary", &[("type", "html")], &item.description)?;
        }
        doc.close("entry")?;
    }

    doc.close("feed")?;
    doc.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FeedMeta;
    use chrono::TimeZone;
    use scrapefeed_extract::NormalizedItem;

    fn feed() -> Feed {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        Feed {
            meta: FeedMeta {
                title: "News & Views".to_string(),
                description: "Latest".to_string(),
                link: "https://example.com/news".to_string(),
            },
            items: vec![
                NormalizedItem {
                    title: "First <b>".to_string(),
                    description: "<p>Body</p>".to_string(),
                    link: "https://example.com/news/1".to_string(),
                    id: "https://example.com/news/1".to_string(),
                    created_at: Some(at),
                },
                NormalizedItem {
                    title: "Second".to_string(),
                    description: String::new(),
                    link: String::new(),
                    id: "tag:example.com,0001-01-01:abc".to_string(),
                    created_at: None,
                },
            ],
            updated: Some(at),
        }
    }

    #[test]
    fn test_atom_document_structure() {
        let xml = to_atom(&feed()).unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
        assert!(xml.contains("<feed xmlns=\"http://www.w3.org/2005/Atom\">"));
        assert!(xml.contains("<title>News &amp; Views</title>"));
        assert!(xml.contains("<subtitle>Latest</subtitle>"));
        assert!(xml.contains("<updated>2024-03-01T12:00:00Z</updated>"));
        assert_eq!(xml.matches("<entry>").count(), 2);
        assert!(xml.trim_end().ends_with("</feed>"));
    }

    #[test]
    fn test_atom_escapes_item_content() {
        let xml = to_atom(&feed()).unwrap();
        assert!(xml.contains("<title>First &lt;b&gt;</title>"));
        assert!(xml.contains("<summary type=\"html\">&lt;p&gt;Body&lt;/p&gt;</summary>"));
    }

    #[test]
    fn test_atom_entry_without_link_or_date() {
        let xml = to_atom(&feed()).unwrap();
        assert_eq!(xml.matches("rel=\"alternate\"").count(), 1);
        assert!(xml.contains("<id>tag:example.com,0001-01-01:abc</id>"));
        // Both entries plus the feed carry the feed date.
        assert_eq!(xml.matches("<updated>2024-03-01T12:00:00Z</updated>").count(), 3);
    }
}

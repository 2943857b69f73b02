// ABOUTME: End-to-end tests from HTML extraction through each feed encoder.
// ABOUTME: Verifies that compiled feeds render into well-formed Atom, RSS and JSON Feed output.

use std::collections::HashMap;

use scrapefeed_extract::{CompiledFeed, FeedConfig, ItemSpec};
use scrapefeed_feed::{Feed, FeedFormat, FeedMeta};

const PAGE: &str = r#"<html><body>
<div class="entry">
    <h3><a href="/p/1">Hello &amp; welcome</a></h3>
    <time>2024-01-05T09:30:00Z</time>
</div>
<div class="entry">
    <h3>No link here</h3>
    <time>sometime</time>
</div>
</body></html>"#;

fn feed() -> Feed {
    let values: HashMap<String, String> = [("Head", "h3"), ("Link", "h3 a"), ("When", "time")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let config = FeedConfig {
        title: "Entries".to_string(),
        description: "Scraped entries".to_string(),
        link: "https://blog.example.net/".to_string(),
        format: None,
        spec: ItemSpec {
            item: "div.entry".to_string(),
            values,
            title: "{{ .Head.Text | trim }}".to_string(),
            link: Some("Link".to_string()),
            date: Some("When".to_string()),
            ..Default::default()
        },
    };
    let compiled = CompiledFeed::compile(&config).expect("compile");
    Feed::new(FeedMeta::from(&config), compiled.extract_html(PAGE))
}

#[test]
fn test_atom_from_page() {
    let xml = FeedFormat::Atom.encode(&feed()).unwrap();
    assert!(xml.contains("<title>Hello &amp; welcome</title>"));
    assert!(xml.contains("href=\"https://blog.example.net/p/1\""));
    assert!(xml.contains("<id>tag:blog.example.net,0001-01-01:"));
    assert!(xml.contains("<updated>2024-01-05T09:30:00Z</updated>"));
}

#[test]
fn test_rss_from_page() {
    let xml = FeedFormat::Rss.encode(&feed()).unwrap();
    assert_eq!(xml.matches("<item>").count(), 2);
    assert!(xml.contains("<link>https://blog.example.net/p/1</link>"));
}

#[test]
fn test_json_from_page() {
    let text = FeedFormat::Json.encode(&feed()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["items"][0]["title"], "Hello & welcome");
    assert_eq!(value["items"][0]["date_published"], "2024-01-05T09:30:00Z");
    assert!(value["items"][1].get("date_published").is_none());
    assert_eq!(value["items"][1]["url"], "https://blog.example.net/");
}

#[test]
fn test_http_date_tracks_latest_item() {
    assert_eq!(
        feed().http_date().as_deref(),
        Some("Fri, 05 Jan 2024 09:30:00 GMT")
    );
}

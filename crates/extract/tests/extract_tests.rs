// ABOUTME: Integration tests for the extraction engine using JSON-configured feeds.
// ABOUTME: Covers sibling fields, locale token maps, link resolution and shared registries.

use std::collections::HashMap;

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use scrapefeed_extract::{CompiledFeed, FeedConfig, FeedRegistry};
use scraper::Html;

const EVENTS_HTML: &str = r#"<!DOCTYPE html>
<html>
<body>
<table id="events">
    <tr class="head">
        <td class="date">Datum: 03 Mär 2024</td>
        <td class="name"><a href="event/1.html">Konzert</a></td>
    </tr>
    <tr class="body" data-kind="music"><td colspan="2">Ein Abend mit Musik</td></tr>
    <tr class="head">
        <td class="date">Datum: 12 Okt 2024</td>
        <td class="name"><a href="//tickets.example.org/2">Lesung</a></td>
    </tr>
    <tr class="body" data-kind="books"><td colspan="2">Bücher und Tee</td></tr>
</table>
</body>
</html>"#;

const EVENTS_CONFIG: &str = r#"{
    "title": "Events",
    "description": "Upcoming events",
    "link": "https://example.com/events/",
    "spec": {
        "item": "tr.head",
        "values": {
            "Date": "td.date",
            "Name": "td.name",
            "Link": "td.name a",
            "Body": "+td",
            "Row": "+@"
        },
        "title": "{{ .Name.Text | trim }}",
        "description": "{{ .Body.Text }} ({{ .Row.Attr \"data-kind\" }})",
        "link": "Link",
        "date": "Date",
        "date_regex": "\\d{2} \\S+ \\d{4}",
        "date_format": "%d %b %Y",
        "date_map": { "Mär": "Mar", "Okt": "Oct" }
    }
}"#;

fn events_feed() -> CompiledFeed {
    let config: FeedConfig = serde_json::from_str(EVENTS_CONFIG).expect("config");
    CompiledFeed::compile(&config).expect("compile")
}

#[test]
fn test_events_table_extraction() {
    let result = events_feed().extract_html(EVENTS_HTML);
    assert_eq!(result.len(), 2);

    let first = &result.items[0];
    assert_eq!(first.title, "Konzert");
    assert_eq!(first.description, "Ein Abend mit Musik (music)");
    assert_eq!(first.link, "https://example.com/events/event/1.html");
    assert_eq!(first.id, first.link);
    assert_eq!(
        first.created_at,
        Some(Utc.with_ymd_and_hms(2024, 3, 3, 0, 0, 0).unwrap())
    );

    let second = &result.items[1];
    assert_eq!(second.title, "Lesung");
    assert_eq!(second.description, "Bücher und Tee (books)");
    assert_eq!(second.link, "https://tickets.example.org/2");
    assert_eq!(
        second.created_at,
        Some(Utc.with_ymd_and_hms(2024, 10, 12, 0, 0, 0).unwrap())
    );

    assert_eq!(result.latest_created_at, second.created_at);
}

#[test]
fn test_repeated_runs_are_identical() {
    let feed = events_feed();
    let first = feed.extract_html(EVENTS_HTML);
    let second = feed.extract_html(EVENTS_HTML);
    assert_eq!(first, second);
}

#[test]
fn test_result_serializes_to_json() {
    let result = events_feed().extract_html(EVENTS_HTML);
    let json = serde_json::to_value(&result).expect("serialize");
    assert_eq!(json["items"][0]["title"], "Konzert");
    assert_eq!(json["latest_created_at"], "2024-10-12T00:00:00Z");
}

#[test]
fn test_registry_shared_across_threads() {
    let config: FeedConfig = serde_json::from_str(EVENTS_CONFIG).expect("config");
    let mut configs = HashMap::new();
    configs.insert("events".to_string(), config);
    let registry = FeedRegistry::compile(configs).expect("registry");

    let counts: Vec<usize> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    let feed = registry.get("events").expect("feed");
                    let doc = Html::parse_document(EVENTS_HTML);
                    feed.compiled.extract(&doc).len()
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("thread"))
            .collect()
    });

    assert_eq!(counts, vec![2, 2, 2, 2]);
}

#[test]
fn test_unparseable_dates_do_not_drop_items() {
    let html = EVENTS_HTML.replace("03 Mär 2024", "irgendwann");
    let result = events_feed().extract_html(&html);
    assert_eq!(result.len(), 2);
    assert_eq!(result.items[0].created_at, None);
    assert_eq!(
        result.latest_created_at,
        Some(Utc.with_ymd_and_hms(2024, 10, 12, 0, 0, 0).unwrap())
    );
}

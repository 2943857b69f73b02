// ABOUTME: Runs a compiled feed over a parsed document and collects normalized items.
// ABOUTME: Applies the filter gate, renders templates, resolves links, dates and ids in document order.

use chrono::{DateTime, Utc};
use scraper::{ElementRef, Html};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::compile::CompiledFeed;
use crate::identity::{assign_id, resolve_link};
use crate::selector::{select_items, FieldMap};

/// One extracted feed entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedItem {
    pub title: String,
    pub description: String,
    pub link: String,
    pub id: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// Items in document order plus the newest resolved item date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedResult {
    pub items: Vec<NormalizedItem>,
    pub latest_created_at: Option<DateTime<Utc>>,
}

impl FeedResult {
    /// Appends an item and folds its date into `latest_created_at`.
    pub fn push(&mut self, item: NormalizedItem) {
        if let Some(at) = item.created_at {
            self.latest_created_at = Some(match self.latest_created_at {
                Some(latest) => latest.max(at),
                None => at,
            });
        }
        self.items.push(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Filter contract: exactly `"false"` or `""` rejects the item.
pub fn filter_admits(rendered: &str) -> bool {
    !(rendered.is_empty() || rendered == "false")
}

impl CompiledFeed {
    /// Extracts all items from a parsed document.
    pub fn extract(&self, doc: &Html) -> FeedResult {
        let mut result = FeedResult::default();
        for element in select_items(doc, &self.item) {
            if let Some(item) = self.extract_item(element) {
                result.push(item);
            }
        }
        result
    }

    /// Parses `html` and extracts all items from it.
    pub fn extract_html(&self, html: &str) -> FeedResult {
        self.extract(&Html::parse_document(html))
    }

    /// Builds one item, or `None` when the filter rejects it.
    fn extract_item(&self, element: ElementRef<'_>) -> Option<NormalizedItem> {
        let fields = FieldMap::resolve(&self.fields, element);

        if let Some(filter) = &self.filter {
            let verdict = filter.render(&fields);
            if !filter_admits(&verdict) {
                debug!(verdict = %verdict, "item rejected by filter");
                return None;
            }
        }

        let title = self.title.render(&fields);
        let description = self.description.render(&fields);

        let href = self
            .link_field
            .as_deref()
            .and_then(|name| fields.get(name))
            .map(|field| field.attr("href"))
            .unwrap_or("");
        let link = resolve_link(&self.base, href);

        let resolved = self
            .date
            .as_ref()
            .and_then(|rule| rule.resolve(&fields));
        let created_at = resolved.map(|date| date.utc());

        let id = assign_id(
            &link,
            &self.base,
            resolved.map(|date| date.calendar_date()),
            &title,
            &description,
        );

        Some(NormalizedItem {
            title,
            description,
            link,
            id,
            created_at,
        })
    }
}

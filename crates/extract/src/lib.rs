// ABOUTME: Extraction engine turning HTML pages into normalized feed items via declarative specs.
// ABOUTME: Re-exports the public API: FeedConfig, CompiledFeed, FeedRegistry, FeedResult, SpecError.

//! scrapefeed-extract - build feed items out of arbitrary HTML pages.
//!
//! A feed is described by an [`ItemSpec`]: a CSS selector for the repeated
//! item elements, per-field selectors, title/description/filter templates
//! and date rules. [`CompiledFeed::compile`] validates it once; the compiled
//! feed is immutable and reused for every document.
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use scrapefeed_extract::{CompiledFeed, FeedConfig, ItemSpec};
//!
//! let mut values = HashMap::new();
//! values.insert("Title".to_string(), "a".to_string());
//! let config = FeedConfig {
//!     title: "Example".to_string(),
//!     link: "https://example.com/".to_string(),
//!     spec: ItemSpec {
//!         item: "li".to_string(),
//!         values,
//!         title: "{{ .Title.Text }}".to_string(),
//!         link: Some("Title".to_string()),
//!         ..Default::default()
//!     },
//!     ..Default::default()
//! };
//!
//! let feed = CompiledFeed::compile(&config).unwrap();
//! let result = feed.extract_html(r#"<ul><li><a href="/a">A</a></li></ul>"#);
//! assert_eq!(result.items[0].title, "A");
//! assert_eq!(result.items[0].link, "https://example.com/a");
//! ```

pub mod aggregate;
pub mod compile;
pub mod config;
pub mod date;
pub mod error;
pub mod identity;
pub mod selector;
pub mod template;

pub use crate::aggregate::{filter_admits, FeedResult, NormalizedItem};
pub use crate::compile::{CompiledFeed, FeedRegistry, FeedRequest, RegisteredFeed};
pub use crate::config::{FeedConfig, ItemSpec};
pub use crate::date::{DateFormat, DateRule, DateSource, ResolvedDate};
pub use crate::error::{SpecError, TemplateError};
pub use crate::selector::{FieldMap, FieldRef, FieldSelector};
pub use crate::template::Template;

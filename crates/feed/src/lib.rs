// ABOUTME: Feed encoding library for scrapefeed.
// ABOUTME: Turns extracted items into Atom, RSS or JSON Feed documents.

pub mod atom;
pub mod error;
pub mod format;
pub mod json;
pub mod models;
pub mod rss;
mod xml;

pub use atom::to_atom;
pub use error::EncodeError;
pub use format::FeedFormat;
pub use json::to_json_feed;
pub use models::{http_date, Feed, FeedMeta};
pub use rss::to_rss;

// ABOUTME: Item link resolution against the feed URL and stable identifier derivation.
// ABOUTME: Items without a distinguishing link get a tag: URI built from a SHA-256 of their content.

use chrono::NaiveDate;
use sha2::{Digest, Sha256};
use tracing::debug;
use url::Url;

/// Date component used in tag URIs when the item date is unresolved.
pub const ZERO_DATE: &str = "0001-01-01";

/// Joins `href` to the feed URL. Returns `""` when the join fails.
///
/// Relative, scheme-relative and fragment-only references resolve against
/// `base`; an empty reference resolves to `base` itself.
pub fn resolve_link(base: &Url, href: &str) -> String {
    match base.join(href) {
        Ok(url) => url.to_string(),
        Err(err) => {
            debug!(href = %href, error = %err, "could not resolve item link");
            String::new()
        }
    }
}

/// True when `link` cannot tell items apart: empty, or the feed URL itself.
pub fn is_degenerate_link(link: &str, base: &Url) -> bool {
    link.is_empty() || link == base.as_str()
}

/// Builds `tag:<host>,<yyyy-mm-dd>:<sha256(title ++ description)>`.
///
/// `date` is the item's calendar date in the offset it was published in.
pub fn tag_uri(
    host: &str,
    date: Option<NaiveDate>,
    title: &str,
    description: &str,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(title.as_bytes());
    hasher.update(description.as_bytes());
    let digest = hasher.finalize();

    let date = match date {
        Some(day) => day.format("%Y-%m-%d").to_string(),
        None => ZERO_DATE.to_string(),
    };
    format!("tag:{},{}:{:x}", host, date, digest)
}

/// Picks the item id: the link when usable, otherwise a content-derived tag URI.
pub fn assign_id(
    link: &str,
    base: &Url,
    date: Option<NaiveDate>,
    title: &str,
    description: &str,
) -> String {
    if is_degenerate_link(link, base) {
        tag_uri(base.host_str().unwrap_or(""), date, title, description)
    } else {
        link.to_string()
    }
}

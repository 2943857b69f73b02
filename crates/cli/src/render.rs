// ABOUTME: Renders one configured feed: resolves the request name, loads the page, encodes the result.
// ABOUTME: Pages come from the feed link over HTTP, or from a local file in offline mode.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use scrapefeed_extract::FeedRegistry;
use scrapefeed_feed::{Feed, FeedFormat, FeedMeta};
use tracing::{debug, info};

const USER_AGENT: &str = concat!("scrapefeed/", env!("CARGO_PKG_VERSION"));

/// Where the source page comes from.
#[derive(Debug, Clone)]
pub enum PageSource {
    /// Fetch the feed's configured link.
    Fetch,
    /// Read the page from a local file.
    File(PathBuf),
}

/// Per-request options from the command line.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    /// Slug, optionally with a format extension (`news.rss`).
    pub name: String,
    pub source: PageSource,
    /// Format used when neither the config nor the name picks one.
    pub format: Option<String>,
}

/// An encoded feed ready to write out.
#[derive(Debug, Clone)]
pub struct RenderedFeed {
    pub slug: String,
    pub format: FeedFormat,
    pub body: String,
    /// HTTP `Date` value of the newest item, when any item had a date.
    pub http_date: Option<String>,
    pub item_count: usize,
}

/// Looks the feed up, extracts its items and encodes them.
pub fn render_feed(registry: &FeedRegistry, request: &RenderRequest) -> Result<RenderedFeed> {
    let Some(found) = registry.resolve(&request.name) else {
        bail!("no feed named {:?}", request.name);
    };
    let feed = found.feed;

    let extension = found.extension.or(request.format.as_deref());
    let format = FeedFormat::select(feed.config.format.as_deref(), extension)
        .with_context(|| format!("feed {:?}", found.slug))?;

    let html = match &request.source {
        PageSource::Fetch => fetch_page(&feed.config.link)?,
        PageSource::File(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
    };

    let result = feed.compiled.extract_html(&html);
    info!(
        feed = found.slug,
        items = result.len(),
        format = %format,
        "extracted feed"
    );

    let feed = Feed::new(FeedMeta::from(&feed.config), result);
    let body = format
        .encode(&feed)
        .with_context(|| format!("failed to encode feed {:?}", found.slug))?;

    Ok(RenderedFeed {
        slug: found.slug.to_string(),
        format,
        http_date: feed.http_date(),
        item_count: feed.items.len(),
        body,
    })
}

/// Fetches `url` and returns its body; any status other than 200 is an error.
pub fn fetch_page(url: &str) -> Result<String> {
    let client = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(30))
        .build()
        .context("failed to build HTTP client")?;

    debug!(url = %url, "fetching page");
    let response = client
        .get(url)
        .send()
        .with_context(|| format!("failed to fetch {url}"))?;

    let status = response.status();
    if status != StatusCode::OK {
        bail!("upstream returned {status} for {url}");
    }

    response
        .text()
        .with_context(|| format!("failed to read body of {url}"))
}

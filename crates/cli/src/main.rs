// ABOUTME: CLI for turning HTML pages into feeds using scrapefeed extraction specs.
// ABOUTME: Lists configured feeds, validates the config, and renders a feed as Atom, RSS or JSON.

mod config;
mod render;

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::load_registry;
use crate::render::{render_feed, PageSource, RenderRequest};

/// Build Atom, RSS and JSON feeds out of web pages that do not publish one.
#[derive(Parser, Debug)]
#[command(name = "scrapefeed")]
#[command(about = "Render feeds from HTML pages using declarative extraction specs", long_about = None)]
struct Args {
    /// Feed configuration file (TOML, or JSON with a .json extension). Use "-" for stdin.
    #[arg(short, long, global = true, default_value = "scrapefeed.toml")]
    config: PathBuf,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List configured feeds as "slug<TAB>title".
    List,

    /// Render one feed and print it.
    Render {
        /// Feed slug, optionally with a format extension (news.rss).
        name: String,

        /// Read the page from this file instead of fetching the feed link.
        #[arg(long)]
        html: Option<PathBuf>,

        /// Output format (atom, rss, json) when the config does not force one.
        #[arg(long)]
        format: Option<String>,

        /// Write the feed to this file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compile every feed and report configuration errors.
    Check,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose)?;

    let registry = load_registry(&args.config)
        .with_context(|| format!("failed to load {}", args.config.display()))?;

    match args.command {
        Command::List => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            for (slug, feed) in registry.iter() {
                writeln!(out, "{}\t{}", slug, feed.config.title)?;
            }
        }
        Command::Check => {
            println!("ok: {} feed(s) compiled", registry.len());
        }
        Command::Render {
            name,
            html,
            format,
            output,
        } => {
            let request = RenderRequest {
                name,
                source: html.map_or(PageSource::Fetch, PageSource::File),
                format,
            };
            let rendered = render_feed(&registry, &request)?;
            info!(
                feed = %rendered.slug,
                items = rendered.item_count,
                content_type = rendered.format.content_type(),
                date = rendered.http_date.as_deref().unwrap_or("-"),
                "rendered feed"
            );

            match output {
                Some(path) => fs::write(&path, &rendered.body)
                    .with_context(|| format!("failed to write {}", path.display()))?,
                None => println!("{}", rendered.body),
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))
}

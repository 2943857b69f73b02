// ABOUTME: Compiles feed configurations into immutable, shareable extraction plans.
// ABOUTME: FeedRegistry holds every compiled feed by slug and resolves request names to feeds.

//! Spec compilation and the feed registry.
//!
//! Compilation is where configuration errors surface: invalid selectors,
//! templates, regexes, date formats, undeclared link/date fields, or a feed
//! link that is not an absolute URL. A compiled feed is never mutated and can
//! be shared across threads.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use scraper::Selector;
use tracing::warn;
use url::Url;

use crate::config::{non_empty, FeedConfig, ItemSpec};
use crate::date::DateRule;
use crate::error::SpecError;
use crate::selector::{compile_css, FieldSelector};
use crate::template::Template;

/// A feed configuration compiled into ready-to-use matchers and templates.
#[derive(Debug, Clone)]
pub struct CompiledFeed {
    pub(crate) base: Url,
    pub(crate) item: Selector,
    pub(crate) fields: Vec<(String, FieldSelector)>,
    pub(crate) title: Template,
    pub(crate) description: Template,
    pub(crate) filter: Option<Template>,
    pub(crate) link_field: Option<String>,
    pub(crate) date: Option<DateRule>,
}

impl CompiledFeed {
    /// Compiles a feed configuration.
    pub fn compile(config: &FeedConfig) -> Result<Self, SpecError> {
        let base = Url::parse(&config.link).map_err(|source| SpecError::BaseUrl {
            link: config.link.clone(),
            source,
        })?;
        Self::compile_spec(&config.spec, base)
    }

    /// Compiles the item rules against an already parsed base URL.
    pub fn compile_spec(spec: &ItemSpec, base: Url) -> Result<Self, SpecError> {
        if spec.item.trim().is_empty() {
            return Err(SpecError::selector("item", &spec.item, "selector is empty"));
        }
        let item = compile_css("item", &spec.item)?;

        // Sorted so field resolution order does not depend on hash order.
        let mut names: Vec<&String> = spec.values.keys().collect();
        names.sort();
        let mut fields = Vec::with_capacity(names.len());
        for name in names {
            fields.push((name.clone(), FieldSelector::parse(name, &spec.values[name])?));
        }

        let link_field = non_empty(&spec.link).map(str::to_string);
        if let Some(name) = &link_field {
            require_field(&spec.values, "link", name)?;
        }

        let date = match non_empty(&spec.date) {
            Some(name) => {
                require_field(&spec.values, "date", name)?;
                Some(DateRule::new(
                    name,
                    non_empty(&spec.date_regex),
                    non_empty(&spec.date_format),
                    spec.date_map.clone(),
                )?)
            }
            None => None,
        };

        let title = compile_template("title", &spec.title)?;
        let description = compile_template("description", &spec.description)?;
        let filter = if spec.filter.is_empty() {
            None
        } else {
            Some(compile_template("filter", &spec.filter)?)
        };

        let compiled = Self {
            base,
            item,
            fields,
            title,
            description,
            filter,
            link_field,
            date,
        };
        compiled.warn_undeclared_fields(&spec.values);
        Ok(compiled)
    }

    /// The feed URL items are resolved against.
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Host used in derived tag URIs.
    pub fn host(&self) -> &str {
        self.base.host_str().unwrap_or("")
    }

    pub fn date_rule(&self) -> Option<&DateRule> {
        self.date.as_ref()
    }

    pub fn has_filter(&self) -> bool {
        self.filter.is_some()
    }

    fn templates(&self) -> impl Iterator<Item = &Template> {
        [&self.title, &self.description]
            .into_iter()
            .chain(self.filter.as_ref())
    }

    fn warn_undeclared_fields(&self, values: &HashMap<String, String>) {
        for template in self.templates() {
            for name in template.referenced_fields() {
                if !values.contains_key(name) {
                    warn!(
                        template = template.name(),
                        field = name,
                        "template references a field missing from values; it renders empty"
                    );
                }
            }
        }
    }
}

fn require_field(
    values: &HashMap<String, String>,
    role: &'static str,
    name: &str,
) -> Result<(), SpecError> {
    if values.contains_key(name) {
        Ok(())
    } else {
        Err(SpecError::UnknownField {
            role,
            name: name.to_string(),
        })
    }
}

fn compile_template(name: &str, source: &str) -> Result<Template, SpecError> {
    Template::compile(name, source).map_err(|source| SpecError::Template {
        name: name.to_string(),
        source,
    })
}

/// A configured feed together with its compiled extraction plan.
#[derive(Debug, Clone)]
pub struct RegisteredFeed {
    pub config: FeedConfig,
    pub compiled: CompiledFeed,
}

/// A registry lookup: the feed plus the extension stripped from the request name.
#[derive(Debug, Clone, Copy)]
pub struct FeedRequest<'r> {
    pub slug: &'r str,
    pub feed: &'r RegisteredFeed,
    pub extension: Option<&'r str>,
}

/// Immutable set of compiled feeds keyed by slug.
#[derive(Debug, Clone, Default)]
pub struct FeedRegistry {
    feeds: BTreeMap<String, RegisteredFeed>,
}

impl FeedRegistry {
    /// Compiles every feed; the first invalid feed aborts the whole registry.
    pub fn compile<I>(configs: I) -> Result<Self, SpecError>
    where
        I: IntoIterator<Item = (String, FeedConfig)>,
    {
        let mut feeds = BTreeMap::new();
        for (slug, config) in configs {
            let compiled = CompiledFeed::compile(&config).map_err(|e| e.in_feed(&slug))?;
            feeds.insert(slug, RegisteredFeed { config, compiled });
        }
        Ok(Self { feeds })
    }

    pub fn get(&self, slug: &str) -> Option<&RegisteredFeed> {
        self.feeds.get(slug)
    }

    /// Looks up a request name such as `news` or `news.rss`.
    ///
    /// The full name is tried first; otherwise its extension is stripped and
    /// returned so the caller can pick the output format from it.
    pub fn resolve<'r>(&'r self, name: &'r str) -> Option<FeedRequest<'r>> {
        if let Some((slug, feed)) = self.feeds.get_key_value(name) {
            return Some(FeedRequest {
                slug,
                feed,
                extension: None,
            });
        }

        let path = Path::new(name);
        let extension = path.extension()?.to_str()?;
        let stem = &name[..name.len() - extension.len() - 1];
        let (slug, feed) = self.feeds.get_key_value(stem)?;
        Some(FeedRequest {
            slug,
            feed,
            extension: Some(extension),
        })
    }

    /// Feeds in slug order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RegisteredFeed)> {
        self.feeds.iter().map(|(slug, feed)| (slug.as_str(), feed))
    }

    pub fn len(&self) -> usize {
        self.feeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.feeds.is_empty()
    }
}

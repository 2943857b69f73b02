// ABOUTME: Item date resolution: trims, narrows by regex, normalizes tokens, then parses.
// ABOUTME: Tries the configured explicit format first and falls back to free-form parsing.

//! Date resolution for feed items.
//!
//! The working text goes through these steps, in order:
//! 1. raw field text, trimmed
//! 2. optional regex: the first non-empty match replaces the text
//! 3. optional token map: `"key "` is replaced by `"value "` for every pair
//! 4. explicit format (RFC 3339 unless configured otherwise)
//! 5. free-form fallback (`dateparser`, then named-timezone layouts)
//!
//! Resolved dates keep the offset they were read in; the calendar date used
//! in derived ids is taken in that offset.
//!
//! An unparseable date is logged and left unresolved; it never fails the item.

use std::collections::HashMap;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use regex::Regex;
use tracing::warn;

use crate::error::SpecError;
use crate::selector::FieldMap;

/// The explicit format tried before free-form parsing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DateFormat {
    #[default]
    Rfc3339,
    Rfc2822,
    /// A chrono strftime pattern, e.g. `%d.%m.%Y %H:%M`.
    Pattern(String),
}

impl DateFormat {
    /// Parses a configured format. `None` means RFC 3339.
    pub fn parse(spec: Option<&str>) -> Result<Self, SpecError> {
        let Some(spec) = spec else {
            return Ok(DateFormat::Rfc3339);
        };
        match spec.trim().to_ascii_lowercase().as_str() {
            "rfc3339" => Ok(DateFormat::Rfc3339),
            "rfc2822" => Ok(DateFormat::Rfc2822),
            _ => {
                // A pattern without specifiers (e.g. a Go layout) can never match.
                if !spec.contains('%')
                    || StrftimeItems::new(spec).any(|item| matches!(item, Item::Error))
                {
                    return Err(SpecError::DateFormat(spec.to_string()));
                }
                Ok(DateFormat::Pattern(spec.to_string()))
            }
        }
    }

    /// Parses `text` strictly with this format.
    ///
    /// Patterns without an offset are read as UTC; date-only patterns as UTC midnight.
    pub fn parse_text(&self, text: &str) -> Option<DateTime<FixedOffset>> {
        match self {
            DateFormat::Rfc3339 => DateTime::parse_from_rfc3339(text).ok(),
            DateFormat::Rfc2822 => DateTime::parse_from_rfc2822(text).ok(),
            DateFormat::Pattern(pattern) => {
                if let Ok(dt) = DateTime::parse_from_str(text, pattern) {
                    return Some(dt);
                }
                if let Ok(naive) = NaiveDateTime::parse_from_str(text, pattern) {
                    return Some(Utc.from_utc_datetime(&naive).into());
                }
                let date = NaiveDate::parse_from_str(text, pattern).ok()?;
                Some(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)).into())
            }
        }
    }
}

/// Which strategy produced a resolved date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSource {
    Explicit,
    FreeForm,
}

/// A successfully resolved item date, in the offset it was read in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedDate {
    pub at: DateTime<FixedOffset>,
    pub source: DateSource,
}

impl ResolvedDate {
    pub fn utc(&self) -> DateTime<Utc> {
        self.at.with_timezone(&Utc)
    }

    /// Calendar date in the date's own offset.
    pub fn calendar_date(&self) -> NaiveDate {
        self.at.date_naive()
    }
}

/// Compiled date rules for one feed.
#[derive(Debug, Clone)]
pub struct DateRule {
    field: String,
    regex: Option<Regex>,
    format: DateFormat,
    token_map: HashMap<String, String>,
}

impl DateRule {
    pub fn new(
        field: &str,
        regex: Option<&str>,
        format: Option<&str>,
        token_map: HashMap<String, String>,
    ) -> Result<Self, SpecError> {
        let regex = regex
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| SpecError::Regex {
                    pattern: pattern.to_string(),
                    source,
                })
            })
            .transpose()?;

        Ok(Self {
            field: field.to_string(),
            regex,
            format: DateFormat::parse(format)?,
            token_map,
        })
    }

    /// The field the date is read from.
    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn format(&self) -> &DateFormat {
        &self.format
    }

    /// Resolves the date of one item from its field map.
    pub fn resolve(&self, fields: &FieldMap<'_>) -> Option<ResolvedDate> {
        let raw = fields.get(&self.field)?.text();
        self.parse(&self.working_text(&raw))
    }

    /// Applies trimming, regex narrowing and token replacement.
    pub fn working_text(&self, raw: &str) -> String {
        let mut text = raw.trim().to_string();

        if let Some(regex) = &self.regex {
            if let Some(m) = regex.find(&text) {
                if !m.as_str().is_empty() {
                    text = m.as_str().to_string();
                }
            }
        }

        // Pair order is unspecified; overlapping keys may interact.
        for (from, to) in &self.token_map {
            text = text.replace(&format!("{} ", from), &format!("{} ", to));
        }

        text
    }

    /// Parses prepared working text: explicit format first, then free-form.
    pub fn parse(&self, text: &str) -> Option<ResolvedDate> {
        if text.is_empty() {
            return None;
        }

        if let Some(at) = self.format.parse_text(text) {
            return Some(ResolvedDate {
                at,
                source: DateSource::Explicit,
            });
        }

        match parse_free_form(text) {
            Some(at) => Some(ResolvedDate {
                at,
                source: DateSource::FreeForm,
            }),
            None => {
                warn!(field = %self.field, text = %text, "could not parse item date");
                None
            }
        }
    }
}

/// Best-effort parsing of loosely formatted dates.
///
/// Naive inputs are interpreted in the local timezone; a missing time of day
/// is local midnight.
pub fn parse_free_form(text: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(dt) = dateparser::parse_with(text, &Local, NaiveTime::MIN) {
        return Some(dt.with_timezone(&Local).into());
    }
    parse_with_named_timezone(text)
}

/// Parses datetime strings ending in a named timezone (CEST, JST, ...).
fn parse_with_named_timezone(s: &str) -> Option<DateTime<FixedOffset>> {
    // Offsets in seconds east of UTC; the first match wins for ambiguous names.
    const TZ_OFFSETS: &[(&str, i32)] = &[
        ("GMT", 0),
        ("UTC", 0),
        ("EST", -5 * 3600),
        ("EDT", -4 * 3600),
        ("CST", -6 * 3600),
        ("CDT", -5 * 3600),
        ("MST", -7 * 3600),
        ("MDT", -6 * 3600),
        ("PST", -8 * 3600),
        ("PDT", -7 * 3600),
        ("AKST", -9 * 3600),
        ("AKDT", -8 * 3600),
        ("HST", -10 * 3600),
        ("WET", 0),
        ("WEST", 3600),
        ("CET", 3600),
        ("CEST", 2 * 3600),
        ("EET", 2 * 3600),
        ("EEST", 3 * 3600),
        ("BST", 3600),
        ("MSK", 3 * 3600),
        ("IST", 5 * 3600 + 30 * 60),
        ("JST", 9 * 3600),
        ("KST", 9 * 3600),
        ("AEST", 10 * 3600),
        ("AEDT", 11 * 3600),
        ("NZST", 12 * 3600),
        ("NZDT", 13 * 3600),
    ];

    const LAYOUTS: &[&str] = &[
        "%a, %d %b %Y %H:%M:%S",
        "%a, %e %b %Y %H:%M:%S",
        "%a, %d %b %Y %H:%M",
        "%d %b %Y %H:%M:%S",
        "%e %b %Y %H:%M:%S",
        "%d %b %Y %H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];

    let (base, zone) = s.trim().rsplit_once(' ')?;
    let offset_secs = TZ_OFFSETS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(zone))
        .map(|(_, secs)| *secs)?;
    let offset = FixedOffset::east_opt(offset_secs)?;

    LAYOUTS.iter().find_map(|layout| {
        let naive = NaiveDateTime::parse_from_str(base.trim_end(), layout).ok()?;
        offset.from_local_datetime(&naive).single()
    })
}

// ABOUTME: Item and field selection: compiles CSS selectors and the `+`/`@` field mini-language.
// ABOUTME: Resolves fields to element references (FieldRef) that templates read text and attributes from.

//! Selector-based element resolution.
//!
//! Field expressions are parsed once into a [`FieldSelector`]:
//! - `+expr` moves to the item's next element sibling, then applies `expr`.
//! - `@` binds the field to the current element itself.
//! - anything else is a descendant CSS query (an empty query matches nothing).
//!
//! Resolution never fails. A query without matches yields an empty
//! [`FieldRef`], which reads as empty text and empty attributes.

use std::collections::HashMap;

use scraper::{ElementRef, Html, Selector};

use crate::error::SpecError;

const SIBLING_MARKER: char = '+';
const DIRECT_MARKER: char = '@';

/// Compiles a CSS selector, reporting failures as configuration errors.
pub fn compile_css(context: &str, css: &str) -> Result<Selector, SpecError> {
    Selector::parse(css).map_err(|e| SpecError::selector(context, css, e))
}

/// Returns the item elements matching `selector`, in document order.
pub fn select_items<'a>(doc: &'a Html, selector: &Selector) -> Vec<ElementRef<'a>> {
    doc.select(selector).collect()
}

/// A parsed field selector expression.
#[derive(Debug, Clone)]
pub enum FieldSelector {
    /// Query descendants of the current element. `None` matches nothing.
    DescendantQuery(Option<Selector>),
    /// Bind to the current element itself.
    DirectBind,
    /// Move to the next element sibling, then apply the inner selector.
    SiblingThenQuery(Box<FieldSelector>),
}

impl FieldSelector {
    /// Parses a field expression for the field called `field`.
    pub fn parse(field: &str, expr: &str) -> Result<Self, SpecError> {
        match expr.strip_prefix(SIBLING_MARKER) {
            Some(rest) if rest.starts_with(SIBLING_MARKER) => Err(SpecError::selector(
                format!("field {}", field),
                expr,
                "the '+' sibling marker may appear only once",
            )),
            Some(rest) => Ok(FieldSelector::SiblingThenQuery(Box::new(
                Self::parse_target(field, rest)?,
            ))),
            None => Self::parse_target(field, expr),
        }
    }

    fn parse_target(field: &str, expr: &str) -> Result<Self, SpecError> {
        if expr.starts_with(DIRECT_MARKER) {
            return Ok(FieldSelector::DirectBind);
        }
        let css = expr.trim();
        if css.is_empty() {
            return Ok(FieldSelector::DescendantQuery(None));
        }
        let selector = compile_css(&format!("field {}", field), css)?;
        Ok(FieldSelector::DescendantQuery(Some(selector)))
    }

    /// Resolves this selector against one item element.
    pub fn resolve<'a>(&self, element: ElementRef<'a>) -> FieldRef<'a> {
        match self {
            FieldSelector::DescendantQuery(Some(selector)) => {
                FieldRef::new(element.select(selector).collect())
            }
            FieldSelector::DescendantQuery(None) => FieldRef::default(),
            FieldSelector::DirectBind => FieldRef::new(vec![element]),
            FieldSelector::SiblingThenQuery(inner) => match next_element_sibling(element) {
                Some(sibling) => inner.resolve(sibling),
                None => FieldRef::default(),
            },
        }
    }
}

fn next_element_sibling(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element.next_siblings().find_map(ElementRef::wrap)
}

/// An ordered, possibly empty set of elements bound to a field.
///
/// Text concatenates every element's raw text; attributes and HTML come
/// from the first element.
#[derive(Debug, Clone, Default)]
pub struct FieldRef<'a> {
    elements: Vec<ElementRef<'a>>,
}

impl<'a> FieldRef<'a> {
    pub fn new(elements: Vec<ElementRef<'a>>) -> Self {
        Self { elements }
    }

    /// Raw, untrimmed text of all bound elements.
    pub fn text(&self) -> String {
        self.elements.iter().flat_map(|el| el.text()).collect()
    }

    /// Attribute of the first element, or `""` when absent.
    pub fn attr(&self, name: &str) -> &str {
        self.attr_or(name, "")
    }

    /// Attribute of the first element, or `default` when absent.
    pub fn attr_or<'s>(&'s self, name: &str, default: &'s str) -> &'s str {
        self.elements
            .first()
            .and_then(|el| el.value().attr(name))
            .unwrap_or(default)
    }

    /// Inner HTML of the first element.
    pub fn html(&self) -> String {
        self.elements
            .first()
            .map(|el| el.inner_html())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// Field name to element reference, scoped to one candidate item.
#[derive(Debug, Clone, Default)]
pub struct FieldMap<'a> {
    fields: HashMap<&'a str, FieldRef<'a>>,
}

impl<'a> FieldMap<'a> {
    /// Resolves every configured field against `element`.
    pub fn resolve(selectors: &'a [(String, FieldSelector)], element: ElementRef<'a>) -> Self {
        let fields = selectors
            .iter()
            .map(|(name, selector)| (name.as_str(), selector.resolve(element)))
            .collect();
        Self { fields }
    }

    pub fn get(&self, name: &str) -> Option<&FieldRef<'a>> {
        self.fields.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE_HTML: &str = r#"
        <table>
            <tr class="label"><th>Release</th><td class="when">2024-03-01</td></tr>
            <tr class="value"><td><a href="/v1">v1.0</a></td><td>notes</td></tr>
            <tr class="label"><th>Last</th></tr>
        </table>
    "#;

    fn parse_html() -> Html {
        Html::parse_document(TABLE_HTML)
    }

    fn items<'a>(doc: &'a Html, css: &str) -> Vec<ElementRef<'a>> {
        let selector = compile_css("test", css).expect("selector");
        select_items(doc, &selector)
    }

    #[test]
    fn test_parse_plain_descendant() {
        let sel = FieldSelector::parse("Title", "td.when").unwrap();
        assert!(matches!(sel, FieldSelector::DescendantQuery(Some(_))));
    }

    #[test]
    fn test_parse_empty_is_descendant_without_selector() {
        let sel = FieldSelector::parse("Title", "").unwrap();
        assert!(matches!(sel, FieldSelector::DescendantQuery(None)));
    }

    #[test]
    fn test_parse_direct_bind_ignores_remainder() {
        assert!(matches!(
            FieldSelector::parse("Date", "@").unwrap(),
            FieldSelector::DirectBind
        ));
        assert!(matches!(
            FieldSelector::parse("Date", "@text").unwrap(),
            FieldSelector::DirectBind
        ));
    }

    #[test]
    fn test_parse_sibling_variants() {
        let sel = FieldSelector::parse("Link", "+td a").unwrap();
        match sel {
            FieldSelector::SiblingThenQuery(inner) => {
                assert!(matches!(*inner, FieldSelector::DescendantQuery(Some(_))))
            }
            other => panic!("unexpected {:?}", other),
        }

        let sel = FieldSelector::parse("Next", "+@").unwrap();
        match sel {
            FieldSelector::SiblingThenQuery(inner) => {
                assert!(matches!(*inner, FieldSelector::DirectBind))
            }
            other => panic!("unexpected {:?}", other),
        }

        let sel = FieldSelector::parse("Next", "+").unwrap();
        match sel {
            FieldSelector::SiblingThenQuery(inner) => {
                assert!(matches!(*inner, FieldSelector::DescendantQuery(None)))
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_repeated_sibling_marker() {
        let err = FieldSelector::parse("Link", "++td").unwrap_err();
        assert!(matches!(err, SpecError::Selector { .. }));
    }

    #[test]
    fn test_parse_rejects_invalid_css() {
        let err = FieldSelector::parse("Title", "[[[invalid").unwrap_err();
        assert!(err.to_string().contains("field Title"));
    }

    #[test]
    fn test_sibling_query_moves_to_next_row() {
        let doc = parse_html();
        let rows = items(&doc, "tr.label");
        assert_eq!(rows.len(), 2);

        let sel = FieldSelector::parse("Link", "+td a").unwrap();
        let field = sel.resolve(rows[0]);
        assert_eq!(field.len(), 1);
        assert_eq!(field.text(), "v1.0");
        assert_eq!(field.attr("href"), "/v1");
    }

    #[test]
    fn test_sibling_query_without_sibling_is_empty() {
        let doc = parse_html();
        let rows = items(&doc, "tr.label");

        let sel = FieldSelector::parse("Link", "+td a").unwrap();
        let field = sel.resolve(rows[1]);
        assert!(field.is_empty());
        assert_eq!(field.text(), "");
        assert_eq!(field.attr("href"), "");
    }

    #[test]
    fn test_direct_bind_is_item_itself() {
        let doc = parse_html();
        let rows = items(&doc, "tr.value");

        let field = FieldSelector::DirectBind.resolve(rows[0]);
        assert_eq!(field.len(), 1);
        assert_eq!(field.attr("class"), "value");
        assert_eq!(field.text(), "v1.0notes");
    }

    #[test]
    fn test_descendant_query_collects_all_matches() {
        let doc = parse_html();
        let rows = items(&doc, "tr.value");

        let field = FieldSelector::parse("Cells", "td").unwrap().resolve(rows[0]);
        assert_eq!(field.len(), 2);
        assert_eq!(field.text(), "v1.0notes");
        assert_eq!(field.html(), r#"<a href="/v1">v1.0</a>"#);
    }

    #[test]
    fn test_attr_or_default() {
        let doc = parse_html();
        let rows = items(&doc, "tr.value");
        let field = FieldSelector::parse("Link", "a").unwrap().resolve(rows[0]);
        assert_eq!(field.attr_or("title", "none"), "none");
        assert_eq!(field.attr_or("href", "none"), "/v1");
    }

    #[test]
    fn test_field_map_resolves_every_selector() {
        let doc = parse_html();
        let rows = items(&doc, "tr.label");
        let selectors = vec![
            ("When".to_string(), FieldSelector::parse("When", "td.when").unwrap()),
            ("Row".to_string(), FieldSelector::DirectBind),
        ];

        let map = FieldMap::resolve(&selectors, rows[0]);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("When").unwrap().text(), "2024-03-01");
        assert!(map.get("Missing").is_none());
    }

    #[test]
    fn test_select_items_empty_match() {
        let doc = parse_html();
        assert!(items(&doc, "article").is_empty());
    }
}

use chrono::NaiveDate;
use roxmltree::Node;
use rust_decimal::Decimal;

use super::format::{parse_date, parse_decimal};
use crate::codes::CodeList;
use crate::core::{SchemedId, ZugferdError};

/// Prefix → namespace URI table of one dialect.
pub type Namespaces = &'static [(&'static str, &'static str)];

/// Typed, namespace-aware read access into a parsed document.
///
/// Paths are `/`-separated child steps written with the dialect's usual
/// prefixes (`ram:SellerTradeParty/ram:Name`). Prefixes resolve through the
/// namespace table, not through the document's own declarations, so a
/// document using other prefixes for the same URIs still matches.
///
/// Every getter is total: a missing node yields `None`, an empty string or
/// `false`. Only [`XmlQuery::date`] can fail, on an unknown format code.
#[derive(Debug, Clone, Copy)]
pub struct XmlQuery {
    namespaces: Namespaces,
}

impl XmlQuery {
    pub const fn new(namespaces: Namespaces) -> Self {
        Self { namespaces }
    }

    fn resolve(&self, prefix: &str) -> Option<&'static str> {
        self.namespaces
            .iter()
            .find(|(p, _)| *p == prefix)
            .map(|(_, uri)| *uri)
    }

    /// Does `node` match a single `prefix:Local` step?
    pub fn is(&self, node: Node<'_, '_>, step: &str) -> bool {
        if !node.is_element() {
            return false;
        }
        let tag = node.tag_name();
        match step.split_once(':') {
            Some((prefix, local)) => {
                tag.name() == local
                    && self
                        .resolve(prefix)
                        .is_some_and(|uri| tag.namespace() == Some(uri))
            }
            None => tag.name() == step && tag.namespace().is_none(),
        }
    }

    /// All nodes reached by `path`, in document order.
    pub fn nodes<'a, 'input>(&self, from: Node<'a, 'input>, path: &str) -> Vec<Node<'a, 'input>> {
        let mut current = vec![from];
        for step in path.split('/').filter(|s| !s.is_empty() && *s != ".") {
            current = current
                .into_iter()
                .flat_map(|n| n.children().filter(move |c| self.is(*c, step)))
                .collect();
            if current.is_empty() {
                break;
            }
        }
        current
    }

    /// First node reached by `path`.
    pub fn node<'a, 'input>(&self, from: Node<'a, 'input>, path: &str) -> Option<Node<'a, 'input>> {
        self.nodes(from, path).into_iter().next()
    }

    pub fn exists(&self, from: Node<'_, '_>, path: &str) -> bool {
        self.node(from, path).is_some()
    }

    /// Trimmed text of the first node at `path`; `None` when absent or empty.
    pub fn text(&self, from: Node<'_, '_>, path: &str) -> Option<String> {
        self.node(from, path).and_then(node_text)
    }

    /// Like [`XmlQuery::text`], defaulting to an empty string.
    pub fn string(&self, from: Node<'_, '_>, path: &str) -> String {
        self.text(from, path).unwrap_or_default()
    }

    pub fn attribute(&self, from: Node<'_, '_>, path: &str, name: &str) -> Option<String> {
        self.node(from, path)
            .and_then(|n| n.attribute(name))
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_owned)
    }

    pub fn decimal(&self, from: Node<'_, '_>, path: &str) -> Option<Decimal> {
        self.node(from, path)
            .and_then(|n| n.text())
            .and_then(parse_decimal)
    }

    pub fn decimal_or_zero(&self, from: Node<'_, '_>, path: &str) -> Decimal {
        self.decimal(from, path).unwrap_or_default()
    }

    /// `true` for `true` or `1`, ignoring case and surrounding whitespace.
    pub fn boolean(&self, from: Node<'_, '_>, path: &str) -> bool {
        self.text(from, path)
            .is_some_and(|t| t.eq_ignore_ascii_case("true") || t == "1")
    }

    /// Date at `path`, honoring a `format` attribute on that node.
    pub fn date(&self, from: Node<'_, '_>, path: &str) -> Result<Option<NaiveDate>, ZugferdError> {
        let Some(node) = self.node(from, path) else {
            return Ok(None);
        };
        let Some(text) = node_text(node) else {
            return Ok(None);
        };
        parse_date(&text, node.attribute("format"))
    }

    /// Coded value at `path`. Tokens missing from the list come back as the
    /// list's `Unknown` value.
    pub fn code<C: CodeList>(&self, from: Node<'_, '_>, path: &str) -> Option<C> {
        self.text(from, path).map(|t| parse_code(&t))
    }

    /// Coded value held in an attribute of the node at `path`.
    pub fn code_attribute<C: CodeList>(&self, from: Node<'_, '_>, path: &str, name: &str) -> Option<C> {
        self.attribute(from, path, name).map(|t| parse_code(&t))
    }

    /// Identifier text at `path` qualified by its `schemeID` attribute.
    pub fn schemed_id<S: CodeList>(&self, from: Node<'_, '_>, path: &str) -> Option<SchemedId<S>> {
        let node = self.node(from, path)?;
        let value = node_text(node)?;
        let scheme = node
            .attribute("schemeID")
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(parse_code);
        Some(SchemedId { scheme, value })
    }
}

/// Parse a code token, logging tokens that are not in the list.
pub fn parse_code<C: CodeList>(token: &str) -> C {
    let value = C::parse(token);
    if value.is_unknown() {
        tracing::debug!(list = C::NAME, token, "code not in list, keeping as Unknown");
    }
    value
}

fn node_text(node: Node<'_, '_>) -> Option<String> {
    node.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::CurrencyCode;
    use rust_decimal_macros::dec;

    const NS: Namespaces = &[("a", "urn:test:a"), ("b", "urn:test:b")];

    const XML: &str = r#"<?xml version="1.0"?>
<x:Root xmlns:x="urn:test:a" xmlns:y="urn:test:b">
  <y:Item id=" 7 "><y:Amount> 12.50 </y:Amount><y:Flag>TRUE</y:Flag></y:Item>
  <y:Item><y:Amount>oops</y:Amount><y:When format="102">20240615</y:When></y:Item>
  <y:Code>EUR</y:Code>
  <y:Other>XXX</y:Other>
  <y:Empty>   </y:Empty>
  <y:Bad format="999">2024</y:Bad>
</x:Root>"#;

    #[test]
    fn resolves_by_namespace_not_prefix() {
        let doc = roxmltree::Document::parse(XML).unwrap();
        let q = XmlQuery::new(NS);
        let root = doc.root_element();
        assert!(q.is(root, "a:Root"));
        assert!(!q.is(root, "b:Root"));
        assert_eq!(q.nodes(root, "b:Item").len(), 2);
        assert_eq!(q.nodes(root, "./b:Item/b:Amount").len(), 2);
    }

    #[test]
    fn typed_getters_are_total() {
        let doc = roxmltree::Document::parse(XML).unwrap();
        let q = XmlQuery::new(NS);
        let root = doc.root_element();

        assert_eq!(q.decimal(root, "b:Item/b:Amount"), Some(dec!(12.50)));
        assert_eq!(q.decimal(root, "b:Missing"), None);
        assert!(q.boolean(root, "b:Item/b:Flag"));
        assert!(!q.boolean(root, "b:Missing"));
        assert_eq!(q.attribute(root, "b:Item", "id").as_deref(), Some("7"));
        assert_eq!(q.text(root, "b:Empty"), None);
        assert_eq!(q.string(root, "b:Missing"), "");
        assert_eq!(q.code::<CurrencyCode>(root, "b:Code"), Some(CurrencyCode::Eur));
        assert_eq!(q.code::<CurrencyCode>(root, "b:Other"), Some(CurrencyCode::Unknown));
        assert_eq!(q.code::<CurrencyCode>(root, "b:Missing"), None);
    }

    #[test]
    fn relative_queries_and_dates() {
        let doc = roxmltree::Document::parse(XML).unwrap();
        let q = XmlQuery::new(NS);
        let items = q.nodes(doc.root_element(), "b:Item");

        assert_eq!(q.decimal(items[1], "b:Amount"), None);
        assert_eq!(
            q.date(items[1], "b:When").unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 15)
        );
        assert_eq!(q.date(items[0], "b:When").unwrap(), None);
        assert!(q.date(doc.root_element(), "b:Bad").is_err());
    }
}

//! Locator chains: ordered fallback lookup rules for one field
//!
//! Listing markup varies between renders of the same site, so each field is
//! described by a chain of locator strategies tried in declaration order.
//! The first strategy producing a non-empty value wins; a chain that
//! matches nothing yields absence, which is a normal outcome rather than
//! an error.

use scraper::{ElementRef, Selector};

/// The record fields a locator chain can populate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Price,
    Rating,
    Id,
}

/// A single structural lookup rule, evaluated against one item container
#[derive(Debug, Clone)]
pub enum Locator {
    /// Text content of the first descendant matching the selector
    Text(Selector),

    /// Attribute value of the first descendant matching the selector
    Attr(Selector, String),

    /// Attribute on the item container element itself
    ContainerAttr(String),
}

impl Locator {
    /// Parses a locator from its configuration spelling
    ///
    /// A plain CSS selector becomes a [`Locator::Text`] lookup. A spelling
    /// of the form `selector@attribute` becomes a [`Locator::Attr`] lookup
    /// (the suffix must be a bare attribute name; `@` cannot appear in a
    /// CSS selector, so the split is unambiguous).
    pub fn parse(spec: &str) -> Result<Self, String> {
        if let Some((selector_part, attr)) = spec.rsplit_once('@') {
            if is_attribute_name(attr) {
                let selector = Selector::parse(selector_part.trim())
                    .map_err(|e| format!("unparseable selector: {:?}", e))?;
                return Ok(Self::Attr(selector, attr.to_string()));
            }
        }

        let selector =
            Selector::parse(spec.trim()).map_err(|e| format!("unparseable selector: {:?}", e))?;
        Ok(Self::Text(selector))
    }

    /// Evaluates this locator against an item container
    ///
    /// Returns the trimmed value, or `None` when the target substructure is
    /// missing or its value is empty. Total: never fails.
    pub fn evaluate(&self, container: &ElementRef<'_>) -> Option<String> {
        let raw = match self {
            Self::Text(selector) => container
                .select(selector)
                .next()
                .map(|el| el.text().collect::<String>()),
            Self::Attr(selector, attr) => container
                .select(selector)
                .next()
                .and_then(|el| el.value().attr(attr).map(str::to_string)),
            Self::ContainerAttr(attr) => container.value().attr(attr).map(str::to_string),
        };

        raw.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
    }
}

/// A field together with its ordered fallback strategies
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub field: Field,
    chain: Vec<Locator>,
}

impl FieldRule {
    pub fn new(field: Field, chain: Vec<Locator>) -> Self {
        Self { field, chain }
    }

    /// Resolves the field's value for one container
    ///
    /// Strategies are evaluated in declaration order; the first non-empty
    /// result wins. Declaration order encodes fallback priority, so it must
    /// stay stable.
    pub fn resolve(&self, container: &ElementRef<'_>) -> Option<String> {
        self.chain.iter().find_map(|locator| locator.evaluate(container))
    }
}

/// Returns true if `s` looks like a bare attribute name
fn is_attribute_name(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == ':')
}

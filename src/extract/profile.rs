//! Compiled extraction profile
//!
//! The profile is the deployment-specific description of the target site's
//! listing markup: where item containers live, how each field is located
//! inside one, what a blocked interstitial looks like, and how the
//! next-page control is found. It is compiled once from configuration and
//! shared read-only across all workers.

use crate::config::SelectorConfig;
use crate::extract::locator::{Field, FieldRule, Locator};
use crate::{ConfigError, ConfigResult};
use scraper::Selector;

/// Compiled selectors and locator chains for one deployment
#[derive(Debug, Clone)]
pub struct ExtractionProfile {
    /// Matches one listing entry
    pub item_container: Selector,

    /// Per-field locator chains, applied to every container
    pub rules: Vec<FieldRule>,

    /// Matches the interstitial/challenge marker of a blocked page
    pub blocked_marker: Selector,

    /// Matches the next-page control
    pub next_page: Selector,

    /// Class marking the next-page control as disabled
    pub next_page_disabled_class: String,

    /// Raw container selector, handed to the document provider as the
    /// structure to wait for
    pub wait_selector: String,
}

impl ExtractionProfile {
    /// Compiles a profile from its configuration
    ///
    /// Any unparseable selector is a configuration error; the run must not
    /// start with a profile that can never match.
    pub fn compile(selectors: &SelectorConfig) -> ConfigResult<Self> {
        let item_container = compile_selector(&selectors.item_container, "item-container")?;
        let blocked_marker = compile_selector(&selectors.blocked_marker, "blocked-marker")?;
        let next_page = compile_selector(&selectors.next_page, "next-page")?;

        let mut rules = vec![
            FieldRule::new(Field::Title, compile_chain(&selectors.title, "title")?),
            FieldRule::new(Field::Price, compile_chain(&selectors.price, "price")?),
            FieldRule::new(Field::Rating, compile_chain(&selectors.rating, "rating")?),
        ];

        if !selectors.id_attribute.is_empty() {
            rules.push(FieldRule::new(
                Field::Id,
                vec![Locator::ContainerAttr(selectors.id_attribute.clone())],
            ));
        }

        Ok(Self {
            item_container,
            rules,
            blocked_marker,
            next_page,
            next_page_disabled_class: selectors.next_page_disabled_class.clone(),
            wait_selector: selectors.item_container.clone(),
        })
    }
}

fn compile_selector(spec: &str, context: &str) -> ConfigResult<Selector> {
    Selector::parse(spec).map_err(|_| ConfigError::InvalidSelector {
        selector: spec.to_string(),
        context: context.to_string(),
    })
}

fn compile_chain(specs: &[String], context: &str) -> ConfigResult<Vec<Locator>> {
    specs
        .iter()
        .map(|spec| {
            Locator::parse(spec).map_err(|_| ConfigError::InvalidSelector {
                selector: spec.to_string(),
                context: context.to_string(),
            })
        })
        .collect()
}

//! CSS selector matching for memory documents
//!
//! Selectors are parsed with scraper's selector grammar and matched by the
//! `selectors` engine through an [`Element`] view over the document arena, so
//! memory documents accept the same selector syntax as a browser.

use crate::dom::memory::{MemoryDocument, NodeKind};
use crate::dom::NodeId;
use crate::error::{ExtractError, Result};
use indexmap::IndexMap;
use scraper::error::SelectorErrorKind;
use scraper::selector::{CssLocalName, CssString, NonTSPseudoClass, PseudoElement, Simple};
use selectors::attr::{AttrSelectorOperation, CaseSensitivity, NamespaceConstraint};
use selectors::bloom::BloomFilter;
use selectors::matching::{
    self, ElementSelectorFlags, MatchingContext, MatchingForInvalidation, MatchingMode, NeedsSelectorFlags,
    QuirksMode, SelectorCaches,
};
use selectors::parser::{ParseRelative, SelectorImpl};
use selectors::{Element, OpaqueElement, SelectorList};
use std::fmt;

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

type Namespace = <Simple as SelectorImpl>::NamespaceUrl;

/// A parsed selector group
#[derive(Debug, Clone)]
pub struct CompiledSelector {
    selectors: SelectorList<Simple>,
}

impl CompiledSelector {
    pub fn parse(selector: &str) -> Result<Self> {
        let mut input = cssparser::ParserInput::new(selector);
        let mut parser = cssparser::Parser::new(&mut input);

        SelectorList::parse(&scraper::selector::Parser, &mut parser, ParseRelative::No)
            .map(|selectors| Self { selectors })
            .map_err(|err| ExtractError::InvalidSelector {
                selector: selector.to_string(),
                reason: SelectorErrorKind::from(err).to_string(),
            })
    }

    /// Whether the element `node` matches, with `scope` as the `:scope` element
    pub fn matches(&self, doc: &MemoryDocument, node: NodeId, scope: NodeId) -> bool {
        let element = MemoryElement { doc, id: node };
        let mut caches = SelectorCaches::default();
        let mut context = MatchingContext::new(
            MatchingMode::Normal,
            None,
            &mut caches,
            QuirksMode::NoQuirks,
            NeedsSelectorFlags::No,
            MatchingForInvalidation::No,
        );
        context.scope_element = Some(MemoryElement { doc, id: scope }.opaque());

        matching::matches_selector_list(&self.selectors, &element, &mut context)
    }
}

/// Quote `value` as a CSS string literal usable inside attribute selectors
pub fn quote_css_string(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    // Writing into a String cannot fail
    let _ = cssparser::serialize_string(value, &mut quoted);
    quoted
}

/// Element view of one arena node
#[derive(Clone, Copy)]
struct MemoryElement<'a> {
    doc: &'a MemoryDocument,
    id: NodeId,
}

impl fmt::Debug for MemoryElement<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MemoryElement({})", self.id)
    }
}

impl<'a> MemoryElement<'a> {
    fn tag_name(&self) -> &'a str {
        match &self.doc.entry(self.id).kind {
            NodeKind::Element { tag_name, .. } => tag_name,
            NodeKind::Text(_) => "",
        }
    }

    fn attributes(&self) -> Option<&'a IndexMap<String, String>> {
        match &self.doc.entry(self.id).kind {
            NodeKind::Element { attributes, .. } => Some(attributes),
            NodeKind::Text(_) => None,
        }
    }

    fn attribute(&self, name: &str) -> Option<&'a str> {
        self.attributes()?.get(name).map(String::as_str)
    }

    fn wrap(&self, id: NodeId) -> Option<Self> {
        matches!(self.doc.entry(id).kind, NodeKind::Element { .. }).then_some(Self { doc: self.doc, id })
    }

    fn siblings(&self) -> &'a [NodeId] {
        match self.doc.entry(self.id).parent {
            Some(parent) => &self.doc.entry(parent).children,
            None => &[],
        }
    }

    fn position(&self) -> Option<usize> {
        self.siblings().iter().position(|id| *id == self.id)
    }
}

impl Element for MemoryElement<'_> {
    type Impl = Simple;

    fn opaque(&self) -> OpaqueElement {
        OpaqueElement::new(self.doc.entry(self.id))
    }

    fn parent_element(&self) -> Option<Self> {
        self.doc.entry(self.id).parent.and_then(|parent| self.wrap(parent))
    }

    fn parent_node_is_shadow_root(&self) -> bool {
        false
    }

    fn containing_shadow_host(&self) -> Option<Self> {
        None
    }

    fn is_pseudo_element(&self) -> bool {
        false
    }

    fn prev_sibling_element(&self) -> Option<Self> {
        let position = self.position()?;
        self.siblings()[..position].iter().rev().find_map(|id| self.wrap(*id))
    }

    fn next_sibling_element(&self) -> Option<Self> {
        let position = self.position()?;
        self.siblings()[position + 1..].iter().find_map(|id| self.wrap(*id))
    }

    fn first_element_child(&self) -> Option<Self> {
        self.doc.entry(self.id).children.iter().find_map(|id| self.wrap(*id))
    }

    fn is_html_element_in_html_document(&self) -> bool {
        true
    }

    fn has_local_name(&self, local_name: &CssLocalName) -> bool {
        self.tag_name() == &*local_name.0
    }

    fn has_namespace(&self, ns: &Namespace) -> bool {
        ns.is_empty() || &**ns == HTML_NAMESPACE
    }

    fn is_same_type(&self, other: &Self) -> bool {
        self.tag_name() == other.tag_name()
    }

    fn attr_matches(
        &self,
        ns: &NamespaceConstraint<&Namespace>,
        local_name: &CssLocalName,
        operation: &AttrSelectorOperation<&CssString>,
    ) -> bool {
        if let NamespaceConstraint::Specific(ns) = ns {
            if !ns.is_empty() {
                return false;
            }
        }
        self.attribute(&local_name.0).is_some_and(|value| operation.eval_str(value))
    }

    fn match_non_ts_pseudo_class(&self, _pc: &NonTSPseudoClass, _context: &mut MatchingContext<'_, Simple>) -> bool {
        false
    }

    fn match_pseudo_element(&self, _pe: &PseudoElement, _context: &mut MatchingContext<'_, Simple>) -> bool {
        false
    }

    fn apply_selector_flags(&self, _flags: ElementSelectorFlags) {}

    fn is_link(&self) -> bool {
        matches!(self.tag_name(), "a" | "area" | "link") && self.attribute("href").is_some()
    }

    fn is_html_slot_element(&self) -> bool {
        false
    }

    fn has_id(&self, id: &CssLocalName, case_sensitivity: CaseSensitivity) -> bool {
        self.attribute("id").is_some_and(|value| case_sensitivity.eq(id.0.as_bytes(), value.as_bytes()))
    }

    fn has_class(&self, name: &CssLocalName, case_sensitivity: CaseSensitivity) -> bool {
        self.attribute("class").is_some_and(|classes| {
            classes.split_ascii_whitespace().any(|class| case_sensitivity.eq(name.0.as_bytes(), class.as_bytes()))
        })
    }

    fn has_custom_state(&self, _name: &CssLocalName) -> bool {
        false
    }

    fn imported_part(&self, _name: &CssLocalName) -> Option<CssLocalName> {
        None
    }

    fn is_part(&self, _name: &CssLocalName) -> bool {
        false
    }

    fn is_empty(&self) -> bool {
        !self.doc.entry(self.id).children.iter().any(|id| match &self.doc.entry(*id).kind {
            NodeKind::Element { .. } => true,
            NodeKind::Text(text) => !text.is_empty(),
        })
    }

    fn is_root(&self) -> bool {
        self.doc.entry(self.id).parent.is_none()
    }

    fn add_element_unique_hashes(&self, _filter: &mut BloomFilter) -> bool {
        false
    }
}

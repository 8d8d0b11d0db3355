// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapter for Understory DOM.
//!
//! ## Feature
//!
//! Enable with `dom_adapter`.
//!
//! ## Notes
//!
//! [`Document`] implements [`ParentLookup`] and [`SelectorMatch`], so it can be
//! passed straight to [`TapDispatcher::handle`](crate::dispatcher::TapDispatcher::handle).
//! [`event_at`] resolves a primitive's target by hit testing, and
//! [`DocumentPlatform`] performs setup against a document for hosts that have
//! no platform of their own (tests, headless runs).

use kurbo::Point;
use understory_dom::{Document, ElementSpec, NodeId};

use crate::environment::{Capabilities, Platform, Primitives};
use crate::types::{InputEvent, InputKind, ParentLookup, SelectorMatch};

impl ParentLookup<NodeId> for Document {
    fn parent_of(&self, node: &NodeId) -> Option<NodeId> {
        self.parent(*node)
    }
}

impl SelectorMatch<NodeId> for Document {
    fn matches(&self, node: &NodeId, selector: &str) -> bool {
        Document::matches(self, *node, selector)
    }
}

/// Build a primitive targeted at the deepest element under `pt`.
///
/// Returns `None` if no element is hit.
pub fn event_at(doc: &Document, kind: InputKind, pt: Point) -> Option<InputEvent<NodeId>> {
    let target = doc.hit_test_point(pt)?;
    Some(InputEvent {
        kind,
        target,
        point: Some(pt),
    })
}

/// A [`Platform`] that applies setup to a [`Document`].
///
/// The viewport meta tag goes into `head` (or `html`, or the root, whichever
/// exists first), and touch manipulation is written to the `html` element's
/// `style` attribute, replacing what was there. Bound listeners are only
/// recorded; the host routes primitives itself.
#[derive(Debug)]
pub struct DocumentPlatform<'a> {
    doc: &'a mut Document,
    capabilities: Capabilities,
    bound: Option<(Option<NodeId>, Primitives)>,
}

impl<'a> DocumentPlatform<'a> {
    /// Wrap `doc`, reporting `capabilities`.
    ///
    /// [`Capabilities::SELECTOR_MATCH`] is always added since the document
    /// matches selectors itself.
    pub fn new(doc: &'a mut Document, capabilities: Capabilities) -> Self {
        Self {
            doc,
            capabilities: capabilities | Capabilities::SELECTOR_MATCH,
            bound: None,
        }
    }

    /// The container and listeners requested by setup, if it ran.
    pub fn bound(&self) -> Option<(Option<NodeId>, Primitives)> {
        self.bound
    }

    fn html(&self) -> NodeId {
        self.doc
            .query_selector("html")
            .unwrap_or_else(|| self.doc.root())
    }
}

impl Platform<NodeId> for DocumentPlatform<'_> {
    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn has_viewport_meta(&self) -> bool {
        self.doc.query_selector("meta[name=viewport]").is_some()
    }

    fn insert_viewport_meta(&mut self, content: &str) {
        let parent = self.doc.query_selector("head").unwrap_or_else(|| self.html());
        self.doc.create_element(
            parent,
            ElementSpec::new("meta")
                .attr("name", "viewport")
                .attr("content", content),
        );
    }

    fn enable_touch_manipulation(&mut self) {
        let html = self.html();
        self.doc.set_attribute(html, "style", "touch-action: manipulation");
    }

    fn bind(&mut self, container: Option<NodeId>, primitives: Primitives) {
        self.bound = Some((container, primitives));
    }
}

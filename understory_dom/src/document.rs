// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core document implementation: structure, updates, queries.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;
use kurbo::{Point, Rect};

use crate::selector::Selector;
use crate::types::{Element, ElementSpec, NodeId};

/// Tag carried by the document root.
pub const DOCUMENT_TAG: &str = "#document";

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// An arena of elements hanging off a single document root.
pub struct Document {
    nodes: Vec<Option<Node>>, // slots
    generations: Vec<u32>,    // last generation per slot (persists across frees)
    free_list: Vec<usize>,
    root: NodeId,
    // Parsed selector strings seen by `matches`; `None` marks a parse failure.
    selectors: RefCell<BTreeMap<String, Option<Selector>>>,
}

impl core::fmt::Debug for Document {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Document")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("root", &self.root)
            .field("cached_selectors", &self.selectors.borrow().len())
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    element: Element,
}

impl Document {
    /// Create a document holding only its root.
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            root: NodeId::new(0, 1),
            selectors: RefCell::default(),
        };
        doc.root = doc.alloc(ElementSpec::new(DOCUMENT_TAG).build());
        doc
    }

    /// The document root. It has no parent and is never matched by selectors.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Append a new element as the last child of `parent`.
    ///
    /// If `parent` is stale the element is created detached.
    pub fn create_element(&mut self, parent: NodeId, spec: ElementSpec) -> NodeId {
        let id = self.alloc(spec.build());
        if self.is_alive(parent) {
            self.node_mut(parent).children.push(id);
            self.node_mut(id).parent = Some(parent);
        }
        id
    }

    /// Remove an element and its subtree. Removing the root is a no-op.
    pub fn remove(&mut self, id: NodeId) {
        if !self.is_alive(id) || id == self.root {
            return;
        }
        if let Some(parent) = self.node(id).parent {
            self.node_mut(parent).children.retain(|c| *c != id);
        }
        let children = core::mem::take(&mut self.node_mut(id).children);
        for child in children {
            // Detach first so the recursive call does not touch our child list.
            self.node_mut(child).parent = None;
            self.remove(child);
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    /// Returns true if `id` refers to a live node.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .is_some_and(|n| n.generation == id.generation())
    }

    /// Parent of a live node, or `None` for the root, detached, and stale nodes.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id)?.parent
    }

    /// Children of a live node, in document order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node_opt(id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Element data of a live node.
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        self.node_opt(id).map(|n| &n.element)
    }

    /// Set an attribute on a live node. `id` and `class` update the dedicated fields.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(n) = self.node_opt_mut(id) {
            n.element.set_attribute(name, value);
        }
    }

    /// Add a class to a live node.
    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if let Some(n) = self.node_opt_mut(id) {
            n.element.add_class(class);
        }
    }

    /// Update the layout box of a live node.
    pub fn set_bounds(&mut self, id: NodeId, bounds: Rect) {
        if let Some(n) = self.node_opt_mut(id) {
            n.element.bounds = bounds;
        }
    }

    /// First element in document order whose `id` attribute equals `id`.
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        let mut stack = Vec::from([self.root]);
        while let Some(n) = stack.pop() {
            let node = self.node(n);
            if node.element.id.as_deref() == Some(id) {
                return Some(n);
            }
            stack.extend(node.children.iter().rev());
        }
        None
    }

    /// First element in document order matching `selector`.
    ///
    /// Returns `None` for unparsable selectors.
    pub fn query_selector(&self, selector: &str) -> Option<NodeId> {
        let selector = Selector::parse(selector).ok()?;
        let mut stack = Vec::from([self.root]);
        while let Some(n) = stack.pop() {
            if selector.matches(self, n) {
                return Some(n);
            }
            stack.extend(self.node(n).children.iter().rev());
        }
        None
    }

    /// Returns true if `id` matches `selector`. Unparsable selectors never match.
    ///
    /// Each distinct selector string is parsed once and kept for the lifetime
    /// of the document.
    pub fn matches(&self, id: NodeId, selector: &str) -> bool {
        let mut cache = self.selectors.borrow_mut();
        if !cache.contains_key(selector) {
            cache.insert(selector.into(), Selector::parse(selector).ok());
        }
        cache[selector]
            .as_ref()
            .is_some_and(|s| s.matches(self, id))
    }

    /// Root→node path (inclusive) of a live node.
    pub fn path_to_root(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cur = self.is_alive(id).then_some(id);
        while let Some(n) = cur {
            out.push(n);
            cur = self.node(n).parent;
        }
        out.reverse();
        out
    }

    /// Find the deepest element under `pt`.
    ///
    /// Later siblings paint over earlier ones, so children are searched last
    /// to first. A child is only considered if its own bounds contain the
    /// point. Returns `None` when no element is hit; the root is never hit.
    pub fn hit_test_point(&self, pt: Point) -> Option<NodeId> {
        self.hit_children(self.root, pt)
    }

    fn hit_children(&self, id: NodeId, pt: Point) -> Option<NodeId> {
        self.node(id)
            .children
            .iter()
            .rev()
            .find(|c| self.node(**c).element.bounds.contains(pt))
            .map(|c| self.hit_children(*c, pt).unwrap_or(*c))
    }

    fn alloc(&mut self, element: Element) -> NodeId {
        let node = |generation| Node {
            generation,
            parent: None,
            children: Vec::new(),
            element,
        };
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(node(generation));
            (idx, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(node(generation)));
            self.generations.push(generation);
            (self.nodes.len() - 1, generation)
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "NodeId uses 32-bit indices by design."
        )]
        let idx = idx as u32;
        NodeId::new(idx, generation)
    }

    fn node_opt(&self, id: NodeId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.generation()).then_some(n)
    }

    fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.generation() {
            return None;
        }
        Some(n)
    }

    fn node(&self, id: NodeId) -> &Node {
        self.node_opt(id).expect("stale NodeId")
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.node_opt_mut(id).expect("stale NodeId")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn root_is_parentless_document() {
        let doc = Document::new();
        let root = doc.root();
        assert!(doc.is_alive(root));
        assert_eq!(doc.parent(root), None);
        assert_eq!(doc.element(root).unwrap().tag, DOCUMENT_TAG);
    }

    #[test]
    fn create_links_parent_and_children() {
        let mut doc = Document::new();
        let a = doc.create_element(doc.root(), ElementSpec::new("div"));
        let b = doc.create_element(a, ElementSpec::new("span"));
        let c = doc.create_element(a, ElementSpec::new("span"));
        assert_eq!(doc.parent(b), Some(a));
        assert_eq!(doc.children(a), &[b, c]);
        assert_eq!(doc.path_to_root(c), vec![doc.root(), a, c]);
    }

    #[test]
    fn remove_frees_subtree_and_reuse_bumps_generation() {
        let mut doc = Document::new();
        let a = doc.create_element(doc.root(), ElementSpec::new("div"));
        let b = doc.create_element(a, ElementSpec::new("span"));
        doc.remove(a);
        assert!(!doc.is_alive(a));
        assert!(!doc.is_alive(b));
        assert!(doc.children(doc.root()).is_empty());

        let c = doc.create_element(doc.root(), ElementSpec::new("p"));
        assert!(doc.is_alive(c));
        assert_ne!(c, a);
        assert_ne!(c, b);
        assert_eq!(doc.parent(a), None);
        assert!(doc.element(b).is_none());
    }

    #[test]
    fn root_cannot_be_removed() {
        let mut doc = Document::new();
        let root = doc.root();
        doc.remove(root);
        assert!(doc.is_alive(root));
    }

    #[test]
    fn stale_parent_creates_detached_element() {
        let mut doc = Document::new();
        let a = doc.create_element(doc.root(), ElementSpec::new("div"));
        doc.remove(a);
        let b = doc.create_element(a, ElementSpec::new("div"));
        assert_eq!(doc.parent(b), None);
        assert!(!doc.matches(b, "div"));
    }

    #[test]
    fn get_element_by_id_uses_document_order() {
        let mut doc = Document::new();
        let a = doc.create_element(doc.root(), ElementSpec::new("div").id("dup"));
        let _b = doc.create_element(doc.root(), ElementSpec::new("div").id("dup"));
        let inner = doc.create_element(a, ElementSpec::new("i").id("inner"));
        assert_eq!(doc.get_element_by_id("dup"), Some(a));
        assert_eq!(doc.get_element_by_id("inner"), Some(inner));
        assert_eq!(doc.get_element_by_id("nope"), None);
    }

    #[test]
    fn hit_test_prefers_deepest_then_last_sibling() {
        let mut doc = Document::new();
        let page = doc.create_element(
            doc.root(),
            ElementSpec::new("body").bounds(Rect::new(0.0, 0.0, 100.0, 100.0)),
        );
        let under = doc.create_element(
            page,
            ElementSpec::new("div").bounds(Rect::new(0.0, 0.0, 50.0, 50.0)),
        );
        let over = doc.create_element(
            page,
            ElementSpec::new("div").bounds(Rect::new(25.0, 25.0, 75.0, 75.0)),
        );
        assert_eq!(doc.hit_test_point(Point::new(10.0, 10.0)), Some(under));
        assert_eq!(doc.hit_test_point(Point::new(30.0, 30.0)), Some(over));
        assert_eq!(doc.hit_test_point(Point::new(90.0, 10.0)), Some(page));
        assert_eq!(doc.hit_test_point(Point::new(200.0, 10.0)), None);
    }

    #[test]
    fn mutators_ignore_stale_ids() {
        let mut doc = Document::new();
        let a = doc.create_element(doc.root(), ElementSpec::new("div"));
        doc.remove(a);
        doc.add_class(a, "x");
        doc.set_attribute(a, "id", "y");
        doc.set_bounds(a, Rect::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(doc.get_element_by_id("y"), None);
    }

    #[test]
    fn query_selector_finds_first_match_in_document_order() {
        let mut doc = Document::new();
        let html = doc.create_element(doc.root(), ElementSpec::new("html"));
        let head = doc.create_element(html, ElementSpec::new("head"));
        let body = doc.create_element(html, ElementSpec::new("body"));
        let meta = doc.create_element(head, ElementSpec::new("meta").attr("name", "viewport"));
        doc.create_element(body, ElementSpec::new("meta").attr("name", "viewport"));
        assert_eq!(doc.query_selector("meta[name=viewport]"), Some(meta));
        assert_eq!(doc.query_selector("html > body"), Some(body));
        assert_eq!(doc.query_selector("video"), None);
        assert_eq!(doc.query_selector("a >"), None);
    }

    #[test]
    fn matches_tracks_attribute_updates() {
        let mut doc = Document::new();
        let a = doc.create_element(doc.root(), ElementSpec::new("div"));
        assert!(!doc.matches(a, ".on"));
        doc.add_class(a, "on");
        assert!(doc.matches(a, ".on"));
        doc.set_attribute(a, "id", "main");
        assert!(doc.matches(a, "div#main.on"));
        assert!(!doc.matches(a, "div:bad"));
    }

    #[test]
    fn selectors_are_parsed_once_per_string() {
        let mut doc = Document::new();
        let a = doc.create_element(doc.root(), ElementSpec::new("div").class("x"));
        let b = doc.create_element(a, ElementSpec::new("span"));
        for node in [a, b, a, b] {
            doc.matches(node, ".x span");
            doc.matches(node, "div:bad");
        }
        let cache = doc.selectors.borrow();
        assert_eq!(cache.len(), 2);
        assert!(cache[".x span"].is_some());
        assert!(cache["div:bad"].is_none());
        drop(cache);
        assert!(doc.matches(b, ".x span"));
        assert!(!doc.matches(a, ".x span"));
    }
}

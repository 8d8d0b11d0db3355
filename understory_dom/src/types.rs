// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the document: node identifiers and element data.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use kurbo::Rect;

/// Identifier for a node in a [`Document`](crate::Document).
///
/// A small, copyable handle made of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On insert, a fresh slot is allocated with generation `1`.
/// - On remove, the slot is freed; any existing `NodeId` that pointed to that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `NodeId`.
///
/// Stale `NodeId`s never alias a different live node because the generation must match.
/// Use [`Document::is_alive`](crate::Document::is_alive) to check liveness.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    pub(crate) const fn generation(self) -> u32 {
        self.1
    }
}

/// Element data stored for every node.
///
/// The document root is an element too, with the tag `#document`; selectors
/// never match it because it has no parent to bubble from.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Element {
    /// Lowercased tag name.
    pub tag: String,
    /// Optional `id` attribute.
    pub id: Option<String>,
    /// Class list, in insertion order, without duplicates.
    pub classes: Vec<String>,
    /// Remaining attributes as name/value pairs.
    pub attributes: Vec<(String, String)>,
    /// Layout box in document coordinates, used for hit testing.
    pub bounds: Rect,
}

impl Element {
    /// Returns true if the element carries `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Look up an attribute value.
    ///
    /// `id` and `class` are answered from their dedicated fields so that
    /// attribute selectors see them as a browser would.
    pub fn attribute(&self, name: &str) -> Option<String> {
        match name {
            "id" => self.id.clone(),
            "class" if !self.classes.is_empty() => Some(self.classes.join(" ")),
            _ => self
                .attributes
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone()),
        }
    }

    pub(crate) fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    pub(crate) fn set_attribute(&mut self, name: &str, value: &str) {
        match name {
            "id" => self.id = Some(value.to_string()),
            "class" => {
                self.classes.clear();
                for c in value.split_ascii_whitespace() {
                    self.add_class(c);
                }
            }
            _ => {
                if let Some(slot) = self.attributes.iter_mut().find(|(k, _)| k == name) {
                    slot.1 = value.to_string();
                } else {
                    self.attributes.push((name.to_string(), value.to_string()));
                }
            }
        }
    }
}

/// Builder describing an element to insert.
///
/// ```
/// use understory_dom::ElementSpec;
/// let spec = ElementSpec::new("DIV").id("parent").class("block").class("block");
/// let el = spec.build();
/// assert_eq!(el.tag, "div");
/// assert_eq!(el.classes, vec!["block".to_string()]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ElementSpec {
    element: Element,
}

impl ElementSpec {
    /// Start describing an element with the given tag name.
    pub fn new(tag: &str) -> Self {
        Self {
            element: Element {
                tag: tag.to_ascii_lowercase(),
                ..Element::default()
            },
        }
    }

    /// Set the `id` attribute.
    pub fn id(mut self, id: &str) -> Self {
        self.element.id = Some(id.to_string());
        self
    }

    /// Add a class.
    pub fn class(mut self, class: &str) -> Self {
        self.element.add_class(class);
        self
    }

    /// Set an arbitrary attribute.
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.element.set_attribute(name, value);
        self
    }

    /// Set the layout box used for hit testing.
    pub fn bounds(mut self, bounds: Rect) -> Self {
        self.element.bounds = bounds;
        self
    }

    /// Finish the spec.
    pub fn build(self) -> Element {
        self.element
    }
}

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory DOM: a minimal arena document with selector matching.
//!
//! ## Overview
//!
//! This crate is the smallest document model that a delegated event dispatcher
//! needs: parent traversal, CSS-subset selector matching, and point hit testing.
//! It is not a browser DOM. There is no style, layout, or text; callers assign each
//! element a layout box in document coordinates and keep it current.
//!
//! ## API overview
//!
//! - [`Document`]: slot arena of elements under one parentless root.
//! - [`NodeId`]: generational handle of a node.
//! - [`Element`] / [`ElementSpec`]: element data and its builder.
//! - [`Selector`]: parsed selector list; see the [`selector`] module for the supported syntax.
//!
//! ### Minimal usage
//!
//! ```
//! use understory_dom::{Document, ElementSpec};
//! use kurbo::{Point, Rect};
//!
//! let mut doc = Document::new();
//! let page = Rect::new(0.0, 0.0, 100.0, 100.0);
//! let html = doc.create_element(doc.root(), ElementSpec::new("html").bounds(page));
//! let parent = doc.create_element(
//!     html,
//!     ElementSpec::new("div").id("parent").bounds(page),
//! );
//! let child = doc.create_element(
//!     parent,
//!     ElementSpec::new("div").id("child").bounds(Rect::new(10.0, 10.0, 20.0, 20.0)),
//! );
//!
//! assert!(doc.matches(child, "#parent > #child"));
//! assert_eq!(doc.hit_test_point(Point::new(15.0, 15.0)), Some(child));
//! assert_eq!(doc.parent(child), Some(parent));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod document;
pub mod selector;
mod types;

pub use document::{DOCUMENT_TAG, Document};
pub use selector::{Selector, SelectorError};
pub use types::{Element, ElementSpec, NodeId};

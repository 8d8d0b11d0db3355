// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_tap --heading-base-level=0

//! Understory Tap: a deterministic, `no_std` delegated tap dispatcher for UI.
//!
//! ## Overview
//!
//! Register handlers by name and selector once, at the root of a document, and
//! let every tap on any matching element reach them. The crate decides which
//! handlers fire, in what order, for one physical interaction. It does not own
//! a document, render, or recognize multi-touch gestures.
//!
//! ## Pieces
//!
//! - [`Registry`](crate::registry::Registry): named handlers, suspension, and
//!   the cached candidate list.
//! - [`bubble`](crate::matcher::bubble): walks from the interaction origin up
//!   through its ancestors, invoking each candidate whose selector matches.
//! - [`Disambiguator`](crate::disambiguator::Disambiguator): turns touch and
//!   click primitives into at most one activation per gesture.
//! - [`environment`](crate::environment): one-time platform setup that picks
//!   the disambiguator mode.
//! - [`TapDispatcher`](crate::dispatcher::TapDispatcher): the facade tying it
//!   all together.
//!
//! ## Inputs
//!
//! The host supplies the document through [`ParentLookup`](crate::types::ParentLookup)
//! and [`SelectorMatch`](crate::types::SelectorMatch), and feeds raw primitives as
//! [`InputEvent`](crate::types::InputEvent) values. With the `dom_adapter`
//! feature, an `understory_dom` document works out of the box.
//!
//! ## Ordering
//!
//! - Inner elements before outer ones.
//! - Within one element, registration order.
//! - Each handler at most once per interaction.
//! - [`stop_propagation`](crate::event::ActivationEvent::stop_propagation) takes
//!   effect after the current element's handlers have all run.
//!
//! ## Minimal usage
//!
//! ```
//! use understory_tap::dispatcher::TapDispatcher;
//! use understory_tap::types::{InputEvent, ParentLookup, SelectorMatch};
//!
//! // 0 is the document; 1 = #list; 2 = .item inside it.
//! struct Page;
//! impl ParentLookup<u32> for Page {
//!     fn parent_of(&self, n: &u32) -> Option<u32> {
//!         match n { 2 => Some(1), 1 => Some(0), _ => None }
//!     }
//! }
//! impl SelectorMatch<u32> for Page {
//!     fn matches(&self, n: &u32, sel: &str) -> bool {
//!         matches!((*n, sel), (1, "#list") | (2, ".item"))
//!     }
//! }
//!
//! let mut taps: TapDispatcher<u32> = TapDispatcher::new();
//! taps.on("open", ".item", |_, node, _| assert_eq!(node, 2))
//!     .on("list", "#list", |_, node, _| assert_eq!(node, 1));
//! let response = taps.handle(&Page, &InputEvent::click(2));
//! assert_eq!(response.report.map(|r| r.invoked), Some(2));
//! assert_eq!(taps.names(false), ["open", "list"]);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod adapters;
pub mod config;
pub mod disambiguator;
pub mod dispatcher;
pub mod environment;
pub mod event;
pub mod matcher;
pub mod name;
pub mod registry;
pub mod types;

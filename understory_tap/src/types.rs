// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types: tree collaborator traits and raw input primitives.
//!
//! ## Overview
//!
//! The dispatcher does not own a document. Hosts expose theirs through
//! [`ParentLookup`] and [`SelectorMatch`], and feed raw platform input as
//! [`InputEvent`] values.

use kurbo::Point;

/// Look up the parent of a node for bubbling.
///
/// The [matcher](crate::matcher) only visits nodes that have a parent, so the
/// tree's root (a document, for example) is never matched.
pub trait ParentLookup<K> {
    /// Returns the parent of `node`, or `None` if `node` is a root.
    fn parent_of(&self, node: &K) -> Option<K>;
}

/// Decide whether a node satisfies a handler's selector.
pub trait SelectorMatch<K> {
    /// Returns true if `node` matches `selector`.
    ///
    /// Implementations should treat selectors they cannot interpret as non-matching.
    fn matches(&self, node: &K, selector: &str) -> bool;
}

/// A tree that supports both parent traversal and selector matching.
///
/// Blanket-implemented for every type implementing [`ParentLookup`] and [`SelectorMatch`].
pub trait DocumentTree<K>: ParentLookup<K> + SelectorMatch<K> {}

impl<K, T: ParentLookup<K> + SelectorMatch<K> + ?Sized> DocumentTree<K> for T {}

/// Kind of a raw input primitive delivered by the platform.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum InputKind {
    /// A touch sequence began.
    TouchStart,
    /// A touch point moved. Only start and end positions count toward drag detection.
    TouchMove,
    /// A touch sequence ended.
    TouchEnd,
    /// The platform cancelled the touch sequence.
    TouchCancel,
    /// A click-type primitive, including the synthetic click emitted after a touch.
    Click,
}

impl InputKind {
    /// Returns true for the touch primitives.
    pub const fn is_touch(self) -> bool {
        !matches!(self, Self::Click)
    }
}

/// A raw input primitive.
///
/// `point` holds page coordinates of the changed touch. Clicks usually carry none.
#[derive(Clone, Debug, PartialEq)]
pub struct InputEvent<K> {
    /// What happened.
    pub kind: InputKind,
    /// Node the platform targeted.
    pub target: K,
    /// Page coordinates, when the primitive has them.
    pub point: Option<Point>,
}

impl<K> InputEvent<K> {
    /// A touch start at `point`.
    pub fn touch_start(target: K, point: Point) -> Self {
        Self {
            kind: InputKind::TouchStart,
            target,
            point: Some(point),
        }
    }

    /// A touch move to `point`.
    pub fn touch_move(target: K, point: Point) -> Self {
        Self {
            kind: InputKind::TouchMove,
            target,
            point: Some(point),
        }
    }

    /// A touch end at `point`.
    pub fn touch_end(target: K, point: Point) -> Self {
        Self {
            kind: InputKind::TouchEnd,
            target,
            point: Some(point),
        }
    }

    /// A touch cancellation.
    pub fn touch_cancel(target: K) -> Self {
        Self {
            kind: InputKind::TouchCancel,
            target,
            point: None,
        }
    }

    /// A click-type primitive.
    pub fn click(target: K) -> Self {
        Self {
            kind: InputKind::Click,
            target,
            point: None,
        }
    }
}

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The logical activation event handed to handlers.

use core::cell::Cell;

use crate::types::InputEvent;

/// A recognized activation, shared by every handler invoked for one interaction.
///
/// Handlers receive it by shared reference; the two flags are the only state
/// they can change. The dispatcher reads them back once the walk finishes.
#[derive(Debug)]
pub struct ActivationEvent<'a, K> {
    original: &'a InputEvent<K>,
    default_prevented: Cell<bool>,
    bubbles: Cell<bool>,
}

impl<'a, K> ActivationEvent<'a, K> {
    /// Wrap a raw primitive. The event starts bubbling, default not prevented.
    pub fn new(original: &'a InputEvent<K>) -> Self {
        Self {
            original,
            default_prevented: Cell::new(false),
            bubbles: Cell::new(true),
        }
    }

    /// The primitive that produced this activation.
    pub fn original_event(&self) -> &'a InputEvent<K> {
        self.original
    }

    /// Ask the platform not to run its default action for the primitive.
    ///
    /// Independent of bubbling.
    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    /// Stop the walk after the current tree level.
    ///
    /// Handlers matching the same node still run.
    pub fn stop_propagation(&self) {
        self.bubbles.set(false);
    }

    /// Whether [`prevent_default`](Self::prevent_default) was called.
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented.get()
    }

    /// Whether the walk may continue to the next ancestor.
    pub fn bubbles(&self) -> bool {
        self.bubbles.get()
    }
}

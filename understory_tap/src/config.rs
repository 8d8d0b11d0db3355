// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dispatcher configuration.

use alloc::string::{String, ToString};

/// Default per-axis movement, in page units, under which a touch is still a tap.
pub const DEFAULT_DRAG_THRESHOLD: f64 = 4.0;

/// Viewport meta content inserted on touch platforms that have none.
///
/// Disabling user scaling removes the double-tap-to-zoom wait on older engines.
pub const DEFAULT_VIEWPORT_META: &str =
    "width=device-width, user-scalable=no, initial-scale=1, maximum-scale=1, minimum-scale=1";

/// Tunables for a [`TapDispatcher`](crate::dispatcher::TapDispatcher).
#[derive(Clone, Debug, PartialEq)]
pub struct TapConfig {
    /// Per-axis drag threshold; see [`DEFAULT_DRAG_THRESHOLD`].
    pub drag_threshold: f64,
    /// Viewport meta content to insert when missing, or `None` to leave the document alone.
    pub viewport_meta: Option<String>,
}

impl Default for TapConfig {
    fn default() -> Self {
        Self {
            drag_threshold: DEFAULT_DRAG_THRESHOLD,
            viewport_meta: Some(DEFAULT_VIEWPORT_META.to_string()),
        }
    }
}

impl TapConfig {
    /// Set the drag threshold.
    pub fn with_drag_threshold(mut self, threshold: f64) -> Self {
        self.drag_threshold = threshold;
        self
    }

    /// Set or clear the viewport meta content.
    pub fn with_viewport_meta(mut self, content: Option<&str>) -> Self {
        self.viewport_meta = content.map(ToString::to_string);
        self
    }
}

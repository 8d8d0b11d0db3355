// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bubble matcher.
//!
//! ## Overview
//!
//! Walks from the interaction origin up through its ancestors, invoking every
//! candidate handler whose selector matches the current node.
//!
//! ## Rules
//!
//! - The candidate list is snapshotted before the walk; handlers may mutate the
//!   registry freely without affecting the walk in flight.
//! - A handler fires at most once per walk: its entry leaves the working list on
//!   its first match.
//! - Within one node, handlers run in candidate (registration) order.
//! - [`stop_propagation`](crate::event::ActivationEvent::stop_propagation) is
//!   checked after each node, so the rest of that node's matches still run.
//! - Only nodes with a parent are visited; the walk ends below the tree root.
//! - The [`ActivationEvent`] is created on the first match; a walk with no
//!   matches allocates nothing for it.

use crate::event::ActivationEvent;
use crate::registry::Registry;
use crate::types::{DocumentTree, InputEvent};

/// What a walk did.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct DispatchReport {
    /// Number of handlers invoked.
    pub invoked: usize,
    /// Whether a handler stopped propagation.
    pub stopped: bool,
    /// Whether a handler asked to suppress the platform default action.
    pub default_prevented: bool,
}

/// Walk from `event.target` upward and invoke matching handlers.
///
/// ```
/// use understory_tap::matcher::bubble;
/// use understory_tap::registry::Registry;
/// use understory_tap::types::{InputEvent, ParentLookup, SelectorMatch};
///
/// // 3 → 2 → 1 → 0 (root).
/// struct Chain;
/// impl ParentLookup<u32> for Chain {
///     fn parent_of(&self, n: &u32) -> Option<u32> { n.checked_sub(1) }
/// }
/// impl SelectorMatch<u32> for Chain {
///     fn matches(&self, n: &u32, sel: &str) -> bool { sel.parse::<u32>().ok() == Some(*n) }
/// }
///
/// let mut reg = Registry::new();
/// reg.on("inner", "3", |_, _, _| {}).on("outer", "1", |_, _, ev| ev.stop_propagation());
/// let report = bubble(&mut reg, &Chain, &InputEvent::click(3));
/// assert_eq!(report.invoked, 2);
/// assert!(report.stopped);
/// ```
pub fn bubble<K, T>(registry: &mut Registry<K>, tree: &T, event: &InputEvent<K>) -> DispatchReport
where
    K: Copy,
    T: DocumentTree<K> + ?Sized,
{
    bubble_from(registry, tree, event.target, event)
}

/// Like [`bubble`], but start the walk at `origin` instead of `event.target`.
///
/// Handlers still see `event` as the original primitive.
pub fn bubble_from<K, T>(
    registry: &mut Registry<K>,
    tree: &T,
    origin: K,
    event: &InputEvent<K>,
) -> DispatchReport
where
    K: Copy,
    T: DocumentTree<K> + ?Sized,
{
    let mut working = registry.snapshot();
    let mut activation: Option<ActivationEvent<'_, K>> = None;
    let mut report = DispatchReport::default();
    let mut node = origin;

    while !working.is_empty() {
        let Some(parent) = tree.parent_of(&node) else {
            break;
        };

        let mut i = 0;
        while i < working.len() {
            if !tree.matches(&node, working[i].selector()) {
                i += 1;
                continue;
            }
            let entry = working.remove(i);
            let ev = activation.get_or_insert_with(|| ActivationEvent::new(event));
            tracing::trace!(name = entry.name(), "invoking handler");
            entry.invoke(registry, node, ev);
            report.invoked += 1;
        }

        if activation.as_ref().is_some_and(|ev| !ev.bubbles()) {
            report.stopped = true;
            break;
        }
        node = parent;
    }

    report.default_prevented = activation
        .as_ref()
        .is_some_and(ActivationEvent::is_default_prevented);
    report
}

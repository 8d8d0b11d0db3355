// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Handler registry and candidate cache.
//!
//! ## Overview
//!
//! A [`Registry`] maps handler names to a selector and a callback, tracks which
//! names are suspended, and keeps the candidate list (registered minus
//! suspended, in registration order) current after every mutation. The
//! [matcher](crate::matcher) reads candidates through [`Registry::snapshot`].
//!
//! ## Rules
//!
//! - Names are coerced to strings through [`Name`]; the first registration of a
//!   key wins and later ones are ignored.
//! - Only registered names can be suspended. Suspending anything else is
//!   forgotten, so a later registration of that name starts active.
//! - Removing a name also resumes it.
//!
//! ```
//! use understory_tap::registry::Registry;
//!
//! let mut reg: Registry<u32> = Registry::new();
//! reg.on("a", "#parent", |_, _, _| {})
//!     .on("b", "#child", |_, _, _| {})
//!     .suspend("a");
//! assert_eq!(reg.names(false), ["a", "b"]);
//! assert_eq!(reg.names(true), ["a"]);
//! assert_eq!(reg.candidates().collect::<Vec<_>>(), ["b"]);
//! ```

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;

use crate::event::ActivationEvent;
use crate::name::Name;

/// Handler callback.
///
/// Receives the registry (so it may register, remove, or suspend handlers while
/// a dispatch is in flight), the node whose selector matched, and the shared
/// activation event.
pub type Handler<K> = Box<dyn Fn(&mut Registry<K>, K, &ActivationEvent<'_, K>)>;

/// A registered handler.
pub struct Entry<K> {
    name: String,
    selector: String,
    handler: Handler<K>,
}

impl<K> core::fmt::Debug for Entry<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Entry")
            .field("name", &self.name)
            .field("selector", &self.selector)
            .finish_non_exhaustive()
    }
}

impl<K> Entry<K> {
    /// The string key.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The selector nodes must match.
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// Run the callback.
    pub fn invoke(&self, registry: &mut Registry<K>, node: K, event: &ActivationEvent<'_, K>) {
        (self.handler)(registry, node, event);
    }
}

/// Name → (selector, handler) table with suspension and a cached candidate list.
pub struct Registry<K> {
    entries: Vec<Rc<Entry<K>>>,
    suspended: Vec<String>,
    candidates: Vec<Rc<Entry<K>>>,
}

impl<K> core::fmt::Debug for Registry<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Registry")
            .field("entries", &self.entries)
            .field("suspended", &self.suspended)
            .field("candidates", &self.candidates.len())
            .finish()
    }
}

impl<K> Default for Registry<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Registry<K> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            suspended: Vec::new(),
            candidates: Vec::new(),
        }
    }

    /// Register `handler` for nodes matching `selector` under `name`.
    ///
    /// A no-op if the name's key is already registered.
    pub fn on<F>(
        &mut self,
        name: impl Into<Name>,
        selector: impl Into<String>,
        handler: F,
    ) -> &mut Self
    where
        F: Fn(&mut Self, K, &ActivationEvent<'_, K>) + 'static,
    {
        let name = name.into().into_key();
        if self.contains(&name) {
            tracing::debug!(name = %name, "handler already registered; ignoring");
            return self;
        }
        let selector = selector.into();
        tracing::debug!(name = %name, selector = %selector, "handler registered");
        self.entries.push(Rc::new(Entry {
            name,
            selector,
            handler: Box::new(handler),
        }));
        self.elect();
        self
    }

    /// Register a handler that removes itself before its first invocation.
    ///
    /// It fires at most once, however many ancestors match, and observes a
    /// registry where its name is already gone.
    pub fn one<F>(
        &mut self,
        name: impl Into<Name>,
        selector: impl Into<String>,
        handler: F,
    ) -> &mut Self
    where
        F: Fn(&mut Self, K, &ActivationEvent<'_, K>) + 'static,
    {
        let name = name.into().into_key();
        let key = name.clone();
        self.on(name, selector, move |reg: &mut Self, node, ev| {
            reg.off(key.as_str());
            handler(reg, node, ev);
        })
    }

    /// Remove a handler and any suspension of it. Absent names are ignored.
    pub fn off(&mut self, name: impl Into<Name>) -> &mut Self {
        let name = name.into().into_key();
        if let Some(pos) = self.entries.iter().position(|e| e.name == name) {
            self.entries.remove(pos);
            tracing::debug!(name = %name, "handler removed");
        }
        self.resume(name)
    }

    /// Remove every handler and every suspension.
    pub fn off_all(&mut self) -> &mut Self {
        self.entries.clear();
        tracing::debug!("all handlers removed");
        self.resume_all()
    }

    /// Suspend a registered handler. Unregistered names are ignored.
    pub fn suspend(&mut self, name: impl Into<Name>) -> &mut Self {
        let name = name.into().into_key();
        if self.contains(&name) && !self.is_suspended(&name) {
            tracing::debug!(name = %name, "handler suspended");
            self.suspended.push(name);
        }
        self.elect();
        self
    }

    /// Suspend every registered handler.
    pub fn suspend_all(&mut self) -> &mut Self {
        for e in &self.entries {
            if !self.suspended.contains(&e.name) {
                self.suspended.push(e.name.clone());
            }
        }
        tracing::debug!(count = self.suspended.len(), "all handlers suspended");
        self.elect();
        self
    }

    /// Lift a suspension.
    pub fn resume(&mut self, name: impl Into<Name>) -> &mut Self {
        let name = name.into().into_key();
        if let Some(pos) = self.suspended.iter().position(|n| *n == name) {
            self.suspended.remove(pos);
            tracing::debug!(name = %name, "handler resumed");
        }
        self.elect();
        self
    }

    /// Lift every suspension.
    pub fn resume_all(&mut self) -> &mut Self {
        self.suspended.clear();
        self.elect();
        self
    }

    /// Registered names in registration order, or suspended names in suspension order.
    pub fn names(&self, suspended_only: bool) -> Vec<String> {
        if suspended_only {
            self.suspended.clone()
        } else {
            self.entries.iter().map(|e| e.name.clone()).collect()
        }
    }

    /// Active handler names, in registration order.
    pub fn candidates(&self) -> impl Iterator<Item = &str> + '_ {
        self.candidates.iter().map(|e| e.name.as_str())
    }

    /// Copy of the candidate list for one dispatch.
    ///
    /// Later registry mutations do not affect the snapshot.
    pub fn snapshot(&self) -> Vec<Rc<Entry<K>>> {
        self.candidates.clone()
    }

    /// Returns true if `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    /// Returns true if `name` is suspended.
    pub fn is_suspended(&self, name: &str) -> bool {
        self.suspended.iter().any(|n| n == name)
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no handler is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn elect(&mut self) {
        self.candidates = self
            .entries
            .iter()
            .filter(|e| !self.suspended.contains(&e.name))
            .cloned()
            .collect();
    }
}

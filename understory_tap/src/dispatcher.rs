// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The dispatcher facade.
//!
//! ## Overview
//!
//! [`TapDispatcher`] ties the pieces together. It owns a [`Registry`], a
//! [`Disambiguator`], and the one-shot setup guard. Hosts call
//! [`enchant`](TapDispatcher::enchant) once, then forward every bound primitive
//! to [`handle`](TapDispatcher::handle) and cancel the platform default action
//! when the returned [`Response`] asks for it.
//!
//! Until `enchant` runs, primitives are interpreted in pass-through mode: clicks
//! dispatch, touch primitives are ignored.
//!
//! ```
//! use understory_tap::dispatcher::TapDispatcher;
//! use understory_tap::types::{InputEvent, ParentLookup, SelectorMatch};
//!
//! // 2 → 1 → 0 (root).
//! struct Chain;
//! impl ParentLookup<u32> for Chain {
//!     fn parent_of(&self, n: &u32) -> Option<u32> { n.checked_sub(1) }
//! }
//! impl SelectorMatch<u32> for Chain {
//!     fn matches(&self, n: &u32, sel: &str) -> bool { sel.parse::<u32>().ok() == Some(*n) }
//! }
//!
//! let mut taps: TapDispatcher<u32> = TapDispatcher::new();
//! taps.on("save", "1", |_, _, ev| ev.prevent_default());
//! let response = taps.handle(&Chain, &InputEvent::click(2));
//! assert!(response.default_prevented);
//! assert_eq!(response.report.map(|r| r.invoked), Some(1));
//! ```

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Debug;

use kurbo::Point;

use crate::config::TapConfig;
use crate::disambiguator::{Decision, Disambiguator, Mode};
use crate::environment::{self, Binding, Platform, SetupError};
use crate::event::ActivationEvent;
use crate::matcher::{DispatchReport, bubble_from};
use crate::name::Name;
use crate::registry::Registry;
use crate::types::{DocumentTree, InputEvent};

/// What the host should do after a primitive was handled.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Response {
    /// Cancel the primitive's platform default action.
    pub default_prevented: bool,
    /// Present if the primitive was recognized as an activation and dispatched.
    pub report: Option<DispatchReport>,
}

/// Delegated tap dispatcher.
#[derive(Debug)]
pub struct TapDispatcher<K> {
    registry: Registry<K>,
    disambiguator: Disambiguator<K>,
    config: TapConfig,
    binding: Option<Binding<K>>,
}

impl<K: Copy + PartialEq + Debug> Default for TapDispatcher<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + PartialEq + Debug> TapDispatcher<K> {
    /// Create a dispatcher with the default [`TapConfig`].
    pub fn new() -> Self {
        Self::with_config(TapConfig::default())
    }

    /// Create a dispatcher with `config`.
    pub fn with_config(config: TapConfig) -> Self {
        Self {
            registry: Registry::new(),
            disambiguator: Disambiguator::new(Mode::PassThrough, config.drag_threshold),
            config,
            binding: None,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &TapConfig {
        &self.config
    }

    /// See [`Registry::on`].
    pub fn on<F>(
        &mut self,
        name: impl Into<Name>,
        selector: impl Into<String>,
        handler: F,
    ) -> &mut Self
    where
        F: Fn(&mut Registry<K>, K, &ActivationEvent<'_, K>) + 'static,
    {
        self.registry.on(name, selector, handler);
        self
    }

    /// See [`Registry::one`].
    pub fn one<F>(
        &mut self,
        name: impl Into<Name>,
        selector: impl Into<String>,
        handler: F,
    ) -> &mut Self
    where
        F: Fn(&mut Registry<K>, K, &ActivationEvent<'_, K>) + 'static,
    {
        self.registry.one(name, selector, handler);
        self
    }

    /// See [`Registry::off`].
    pub fn off(&mut self, name: impl Into<Name>) -> &mut Self {
        self.registry.off(name);
        self
    }

    /// See [`Registry::off_all`].
    pub fn off_all(&mut self) -> &mut Self {
        self.registry.off_all();
        self
    }

    /// See [`Registry::suspend`].
    pub fn suspend(&mut self, name: impl Into<Name>) -> &mut Self {
        self.registry.suspend(name);
        self
    }

    /// See [`Registry::suspend_all`].
    pub fn suspend_all(&mut self) -> &mut Self {
        self.registry.suspend_all();
        self
    }

    /// See [`Registry::resume`].
    pub fn resume(&mut self, name: impl Into<Name>) -> &mut Self {
        self.registry.resume(name);
        self
    }

    /// See [`Registry::resume_all`].
    pub fn resume_all(&mut self) -> &mut Self {
        self.registry.resume_all();
        self
    }

    /// See [`Registry::names`].
    pub fn names(&self, suspended_only: bool) -> Vec<String> {
        self.registry.names(suspended_only)
    }

    /// The handler registry.
    pub fn registry(&self) -> &Registry<K> {
        &self.registry
    }

    /// The handler registry, mutably.
    pub fn registry_mut(&mut self) -> &mut Registry<K> {
        &mut self.registry
    }

    /// The disambiguator mode in effect.
    pub fn mode(&self) -> Mode {
        self.disambiguator.mode()
    }

    /// Returns true once [`enchant`](Self::enchant) has succeeded.
    pub fn is_enchanted(&self) -> bool {
        self.binding.is_some()
    }

    /// Returns true if setup found a platform that delivers touch primitives.
    pub fn is_touchable(&self) -> bool {
        self.binding.as_ref().is_some_and(|b| b.touchable)
    }

    /// The setup outcome, if setup has run.
    pub fn binding(&self) -> Option<&Binding<K>> {
        self.binding.as_ref()
    }

    /// Bind to the platform once.
    ///
    /// Selects the disambiguator mode from the platform's capabilities, applies
    /// the document changes, and asks the platform to attach listeners to
    /// `container` (`None` for the whole document). Later calls do nothing,
    /// whatever container they name. A failed setup may be retried.
    pub fn enchant<P>(&mut self, platform: &mut P, container: Option<K>) -> Result<(), SetupError>
    where
        P: Platform<K> + ?Sized,
    {
        if self.binding.is_some() {
            tracing::debug!("already enchanted; ignoring");
            return Ok(());
        }
        let viewport_meta = self.config.viewport_meta.as_deref();
        let binding = environment::apply(platform, container, viewport_meta)?;
        self.disambiguator.set_mode(binding.mode);
        self.binding = Some(binding);
        Ok(())
    }

    /// Consume one primitive, dispatching it if it completes an activation.
    pub fn handle<T>(&mut self, tree: &T, event: &InputEvent<K>) -> Response
    where
        T: DocumentTree<K> + ?Sized,
    {
        match self.disambiguator.feed(event) {
            Decision::Dispatch(origin) => {
                let report = bubble_from(&mut self.registry, tree, origin, event);
                Response {
                    default_prevented: report.default_prevented,
                    report: Some(report),
                }
            }
            Decision::SuppressDefault => Response {
                default_prevented: true,
                report: None,
            },
            Decision::Ignore => Response::default(),
        }
    }

    /// Synthesize a tap on `target`, as the platform would deliver it.
    ///
    /// On a touch platform this feeds a touch start and a touch end at the
    /// origin, then a click unless the touch end's default action was
    /// prevented. Elsewhere it feeds a single click.
    ///
    /// Returns the response of the primitive that dispatched, or of the last
    /// primitive fed if none did.
    pub fn simulate<T>(&mut self, tree: &T, target: K) -> Response
    where
        T: DocumentTree<K> + ?Sized,
    {
        if !self.is_touchable() {
            return self.handle(tree, &InputEvent::click(target));
        }
        self.handle(tree, &InputEvent::touch_start(target, Point::ORIGIN));
        let end = self.handle(tree, &InputEvent::touch_end(target, Point::ORIGIN));
        if end.default_prevented {
            return end;
        }
        let click = self.handle(tree, &InputEvent::click(target));
        if end.report.is_some() { end } else { click }
    }
}

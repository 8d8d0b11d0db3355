// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Environment adapter: one-time platform setup.
//!
//! ## Mode selection
//!
//! | Capabilities | Document changes | Bound primitives | Mode |
//! |---|---|---|---|
//! | no `SELECTOR_MATCH` | none | none | setup fails |
//! | no `TOUCH` | none | `CLICK` | pass-through |
//! | `TOUCH` + `TOUCH_ACTION` | viewport meta, `touch-action: manipulation` | `CLICK` | pass-through |
//! | `TOUCH` only | viewport meta | all touch + `CLICK` | touch tracking |
//!
//! The viewport meta tag is only inserted when the document has none and a
//! content string is configured.

use bitflags::bitflags;

use crate::disambiguator::Mode;

bitflags! {
    /// What the platform can do.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Capabilities: u8 {
        /// The platform delivers touch primitives.
        const TOUCH          = 0b0000_0001;
        /// The platform honors `touch-action: manipulation`, which removes the
        /// synthetic click delay.
        const TOUCH_ACTION   = 0b0000_0010;
        /// Nodes can be matched against selectors.
        const SELECTOR_MATCH = 0b0000_0100;
    }
}

bitflags! {
    /// Primitive listeners to attach to the base container.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Primitives: u8 {
        /// Touch start (passive).
        const TOUCH_START  = 0b0000_0001;
        /// Touch end.
        const TOUCH_END    = 0b0000_0010;
        /// Touch cancel.
        const TOUCH_CANCEL = 0b0000_0100;
        /// Click.
        const CLICK        = 0b0000_1000;
        /// Everything touch tracking needs.
        const TOUCH_TRACKING = Self::TOUCH_START.bits()
            | Self::TOUCH_END.bits()
            | Self::TOUCH_CANCEL.bits()
            | Self::CLICK.bits();
    }
}

/// Errors reported by setup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    /// The platform offers no way to match nodes against selectors.
    #[error("platform cannot match selectors; delegated dispatch is unavailable")]
    SelectorMatchUnavailable,
}

/// The host side of setup.
///
/// Implementations report capabilities, make the requested document changes,
/// and attach capture-phase listeners for the requested primitives, routing
/// them into [`TapDispatcher::handle`](crate::dispatcher::TapDispatcher::handle).
pub trait Platform<K> {
    /// Report platform capabilities.
    fn capabilities(&self) -> Capabilities;

    /// Returns true if the document already declares a viewport.
    fn has_viewport_meta(&self) -> bool;

    /// Add a viewport meta tag with `content`.
    fn insert_viewport_meta(&mut self, content: &str);

    /// Apply `touch-action: manipulation` to the document.
    fn enable_touch_manipulation(&mut self);

    /// Attach listeners for `primitives` to `container` (`None` means the whole document).
    fn bind(&mut self, container: Option<K>, primitives: Primitives);
}

/// Outcome of a successful setup.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Binding<K> {
    /// Where listeners were attached.
    pub container: Option<K>,
    /// Disambiguator mode to use.
    pub mode: Mode,
    /// Listeners that were attached.
    pub primitives: Primitives,
    /// Whether the platform delivers touch primitives.
    pub touchable: bool,
}

/// Choose a mode and listener set for `caps`.
pub fn select_mode(caps: Capabilities) -> Result<(Mode, Primitives), SetupError> {
    if !caps.contains(Capabilities::SELECTOR_MATCH) {
        return Err(SetupError::SelectorMatchUnavailable);
    }
    Ok(
        if caps.contains(Capabilities::TOUCH) && !caps.contains(Capabilities::TOUCH_ACTION) {
            (Mode::TouchTracking, Primitives::TOUCH_TRACKING)
        } else {
            (Mode::PassThrough, Primitives::CLICK)
        },
    )
}

/// Run setup against `platform`.
///
/// Fails before touching the platform if selectors cannot be matched.
pub fn apply<K, P>(
    platform: &mut P,
    container: Option<K>,
    viewport_meta: Option<&str>,
) -> Result<Binding<K>, SetupError>
where
    K: Copy,
    P: Platform<K> + ?Sized,
{
    let caps = platform.capabilities();
    let (mode, primitives) = select_mode(caps)?;
    let touchable = caps.contains(Capabilities::TOUCH);

    if touchable {
        if let Some(content) = viewport_meta
            && !platform.has_viewport_meta()
        {
            platform.insert_viewport_meta(content);
        }
        if caps.contains(Capabilities::TOUCH_ACTION) {
            platform.enable_touch_manipulation();
        }
    }
    platform.bind(container, primitives);
    tracing::debug!(?mode, ?primitives, touchable, "environment bound");

    Ok(Binding {
        container,
        mode,
        primitives,
        touchable,
    })
}

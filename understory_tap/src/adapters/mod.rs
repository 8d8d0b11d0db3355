// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapters to integrate with other Understory crates.
//!
//! Enabled via feature flags so the core stays `no_std` with no tree dependency.

#[cfg(feature = "dom_adapter")]
pub mod dom;

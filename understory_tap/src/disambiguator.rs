// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Touch/click disambiguation.
//!
//! ## Overview
//!
//! Platforms that emit touch primitives usually follow every touch sequence with
//! a synthetic click. Handling both fires twice; handling only clicks adds the
//! click delay. [`Disambiguator`] turns raw primitives into at most one
//! [`Decision::Dispatch`] per gesture and tells the host which primitives to
//! cancel.
//!
//! ## Touch tracking
//!
//! ```text
//! Idle ──TouchStart──▶ Tracking ──TouchEnd (still)──▶ Accepted ──Click──▶ Idle
//!                         │
//!                         ├──TouchEnd (dragged)──▶ Cancelled ──Click──▶ Idle
//!                         └──TouchCancel──▶ Idle
//! ```
//!
//! - A touch end farther than the drag threshold from its start, on either
//!   axis, is a drag: its default action is suppressed and nothing is dispatched.
//! - The click that follows an accepted tap is let through only if it targets
//!   the accepted node; any other click is suppressed.
//! - A click that arrives while a touch is still down is suppressed; the touch
//!   keeps its start point.
//! - A new touch start always begins a fresh gesture.
//!
//! ## Pass-through
//!
//! When the platform can disable the synthetic click itself, clicks are
//! dispatched directly and touch primitives are ignored.
//!
//! ```
//! use kurbo::Point;
//! use understory_tap::disambiguator::{Decision, Disambiguator, Mode};
//! use understory_tap::types::InputEvent;
//!
//! let mut d = Disambiguator::new(Mode::TouchTracking, 4.0);
//! assert_eq!(d.feed(&InputEvent::touch_start(7, Point::new(10.0, 10.0))), Decision::Ignore);
//! assert_eq!(d.feed(&InputEvent::touch_end(7, Point::new(12.0, 9.0))), Decision::Dispatch(7));
//! // The platform's follow-up click on the same node is let through untouched.
//! assert_eq!(d.feed(&InputEvent::click(7)), Decision::Ignore);
//! ```

use kurbo::Point;

use crate::types::{InputEvent, InputKind};

/// How primitives are interpreted.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Mode {
    /// Clicks are activations; touch primitives are ignored.
    #[default]
    PassThrough,
    /// Touch sequences are activations; follow-up clicks are filtered.
    TouchTracking,
}

/// Per-gesture state.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum GestureState<K> {
    /// No gesture in flight.
    Idle,
    /// A touch started at `start` and has not ended.
    Tracking {
        /// Page coordinates of the touch start.
        start: Point,
    },
    /// The last gesture was a tap on `target`; awaiting the synthetic click.
    Accepted {
        /// Node the tap was dispatched to.
        target: K,
    },
    /// The last gesture was a drag.
    Cancelled,
}

/// What the host should do with a primitive.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Decision<K> {
    /// Run the bubble matcher from this node.
    Dispatch(K),
    /// Cancel the primitive's platform default action; dispatch nothing.
    SuppressDefault,
    /// Nothing to do.
    Ignore,
}

/// Touch/click disambiguation state machine.
#[derive(Clone, Debug)]
pub struct Disambiguator<K> {
    mode: Mode,
    drag_threshold: f64,
    state: GestureState<K>,
}

impl<K: Copy + PartialEq + core::fmt::Debug> Disambiguator<K> {
    /// Create an idle disambiguator.
    pub fn new(mode: Mode, drag_threshold: f64) -> Self {
        Self {
            mode,
            drag_threshold,
            state: GestureState::Idle,
        }
    }

    /// Current mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Switch mode. The gesture in flight, if any, is dropped.
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.state = GestureState::Idle;
    }

    /// Maximum per-axis movement, in page units, for a touch to still count as a tap.
    pub fn drag_threshold(&self) -> f64 {
        self.drag_threshold
    }

    /// Set the drag threshold.
    pub fn set_drag_threshold(&mut self, threshold: f64) {
        self.drag_threshold = threshold;
    }

    /// Current gesture state.
    pub fn state(&self) -> &GestureState<K> {
        &self.state
    }

    /// Drop any gesture in flight.
    pub fn reset(&mut self) {
        self.state = GestureState::Idle;
    }

    /// Consume one primitive.
    ///
    /// Primitives without coordinates are treated as if they happened at the
    /// gesture's start point (touch end) or at the origin (touch start).
    pub fn feed(&mut self, event: &InputEvent<K>) -> Decision<K> {
        let decision = match self.mode {
            Mode::PassThrough => match event.kind {
                InputKind::Click => Decision::Dispatch(event.target),
                _ => Decision::Ignore,
            },
            Mode::TouchTracking => self.track(event),
        };
        tracing::trace!(kind = ?event.kind, ?decision, "primitive consumed");
        decision
    }

    fn track(&mut self, event: &InputEvent<K>) -> Decision<K> {
        match event.kind {
            InputKind::TouchStart => {
                self.state = GestureState::Tracking {
                    start: event.point.unwrap_or(Point::ORIGIN),
                };
                Decision::Ignore
            }
            InputKind::TouchMove => Decision::Ignore,
            InputKind::TouchEnd => {
                let GestureState::Tracking { start } = self.state else {
                    // No start to measure against; not a tap.
                    self.state = GestureState::Idle;
                    return Decision::Ignore;
                };
                let moved = event.point.unwrap_or(start) - start;
                if moved.x.abs() > self.drag_threshold || moved.y.abs() > self.drag_threshold {
                    self.state = GestureState::Cancelled;
                    Decision::SuppressDefault
                } else {
                    self.state = GestureState::Accepted {
                        target: event.target,
                    };
                    Decision::Dispatch(event.target)
                }
            }
            InputKind::TouchCancel => {
                self.state = GestureState::Idle;
                Decision::Ignore
            }
            InputKind::Click => match self.state {
                // A stray click mid-touch does not end the gesture.
                GestureState::Tracking { .. } => Decision::SuppressDefault,
                GestureState::Accepted { target } if target == event.target => {
                    self.state = GestureState::Idle;
                    Decision::Ignore
                }
                _ => {
                    self.state = GestureState::Idle;
                    Decision::SuppressDefault
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracking() -> Disambiguator<u32> {
        Disambiguator::new(Mode::TouchTracking, 4.0)
    }

    fn pt(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn still_touch_is_a_tap() {
        let mut d = tracking();
        assert_eq!(d.feed(&InputEvent::touch_start(1, pt(0.0, 0.0))), Decision::Ignore);
        assert_eq!(
            *d.state(),
            GestureState::Tracking {
                start: pt(0.0, 0.0)
            }
        );
        assert_eq!(d.feed(&InputEvent::touch_end(1, pt(0.0, 0.0))), Decision::Dispatch(1));
        assert_eq!(*d.state(), GestureState::Accepted { target: 1 });
    }

    #[test]
    fn movement_up_to_threshold_still_taps() {
        let mut d = tracking();
        d.feed(&InputEvent::touch_start(1, pt(10.0, 10.0)));
        assert_eq!(d.feed(&InputEvent::touch_end(1, pt(14.0, 6.0))), Decision::Dispatch(1));

        d.feed(&InputEvent::touch_start(1, pt(10.0, 10.0)));
        assert_eq!(
            d.feed(&InputEvent::touch_end(1, pt(10.0, 14.5))),
            Decision::SuppressDefault
        );
        assert_eq!(*d.state(), GestureState::Cancelled);

        d.feed(&InputEvent::touch_start(1, pt(10.0, 10.0)));
        assert_eq!(
            d.feed(&InputEvent::touch_end(1, pt(5.0, 10.0))),
            Decision::SuppressDefault
        );
    }

    #[test]
    fn moves_do_not_count_toward_drag() {
        let mut d = tracking();
        d.feed(&InputEvent::touch_start(1, pt(0.0, 0.0)));
        assert_eq!(d.feed(&InputEvent::touch_move(1, pt(50.0, 50.0))), Decision::Ignore);
        assert_eq!(d.feed(&InputEvent::touch_end(1, pt(1.0, 1.0))), Decision::Dispatch(1));
    }

    #[test]
    fn synthetic_click_on_accepted_target_passes() {
        let mut d = tracking();
        d.feed(&InputEvent::touch_start(1, pt(0.0, 0.0)));
        d.feed(&InputEvent::touch_end(1, pt(0.0, 0.0)));
        assert_eq!(d.feed(&InputEvent::click(1)), Decision::Ignore);
        assert_eq!(*d.state(), GestureState::Idle);
        // Exactly one click is consumed per tap.
        assert_eq!(d.feed(&InputEvent::click(1)), Decision::SuppressDefault);
    }

    #[test]
    fn synthetic_click_on_other_target_is_suppressed() {
        let mut d = tracking();
        d.feed(&InputEvent::touch_start(1, pt(0.0, 0.0)));
        d.feed(&InputEvent::touch_end(1, pt(0.0, 0.0)));
        assert_eq!(d.feed(&InputEvent::click(2)), Decision::SuppressDefault);
        assert_eq!(*d.state(), GestureState::Idle);
    }

    #[test]
    fn click_after_drag_is_suppressed() {
        let mut d = tracking();
        d.feed(&InputEvent::touch_start(1, pt(0.0, 0.0)));
        d.feed(&InputEvent::touch_end(1, pt(30.0, 0.0)));
        assert_eq!(d.feed(&InputEvent::click(1)), Decision::SuppressDefault);
    }

    #[test]
    fn cancel_forgets_everything() {
        let mut d = tracking();
        d.feed(&InputEvent::touch_start(1, pt(0.0, 0.0)));
        d.feed(&InputEvent::touch_end(1, pt(0.0, 0.0)));
        assert_eq!(d.feed(&InputEvent::touch_cancel(1)), Decision::Ignore);
        assert_eq!(*d.state(), GestureState::Idle);
        assert_eq!(d.feed(&InputEvent::click(1)), Decision::SuppressDefault);

        d.feed(&InputEvent::touch_start(1, pt(0.0, 0.0)));
        d.feed(&InputEvent::touch_cancel(1));
        assert_eq!(d.feed(&InputEvent::touch_end(1, pt(0.0, 0.0))), Decision::Ignore);
    }

    #[test]
    fn new_start_resets_accepted_target() {
        let mut d = tracking();
        d.feed(&InputEvent::touch_start(1, pt(0.0, 0.0)));
        d.feed(&InputEvent::touch_end(1, pt(0.0, 0.0)));
        d.feed(&InputEvent::touch_start(2, pt(100.0, 0.0)));
        assert_eq!(
            *d.state(),
            GestureState::Tracking {
                start: pt(100.0, 0.0)
            }
        );
        assert_eq!(d.feed(&InputEvent::touch_end(2, pt(101.0, 0.0))), Decision::Dispatch(2));
        assert_eq!(d.feed(&InputEvent::click(2)), Decision::Ignore);
    }

    #[test]
    fn click_during_touch_keeps_tracking() {
        let mut d = tracking();
        d.feed(&InputEvent::touch_start(3, pt(20.0, 20.0)));
        assert_eq!(d.feed(&InputEvent::click(4)), Decision::SuppressDefault);
        assert_eq!(
            *d.state(),
            GestureState::Tracking {
                start: pt(20.0, 20.0)
            }
        );
        assert_eq!(d.feed(&InputEvent::touch_end(3, pt(20.0, 20.0))), Decision::Dispatch(3));
    }

    #[test]
    fn end_without_start_is_not_a_tap() {
        let mut d = tracking();
        assert_eq!(d.feed(&InputEvent::touch_end(1, pt(0.0, 0.0))), Decision::Ignore);
        assert_eq!(*d.state(), GestureState::Idle);
    }

    #[test]
    fn missing_end_coordinates_count_as_still() {
        let mut d = tracking();
        d.feed(&InputEvent::touch_start(1, pt(40.0, 40.0)));
        let end = InputEvent {
            kind: InputKind::TouchEnd,
            target: 1,
            point: None,
        };
        assert_eq!(d.feed(&end), Decision::Dispatch(1));
    }

    #[test]
    fn pass_through_dispatches_clicks_only() {
        let mut d: Disambiguator<u32> = Disambiguator::new(Mode::PassThrough, 4.0);
        assert_eq!(d.feed(&InputEvent::touch_start(1, pt(0.0, 0.0))), Decision::Ignore);
        assert_eq!(d.feed(&InputEvent::touch_end(1, pt(0.0, 0.0))), Decision::Ignore);
        assert_eq!(d.feed(&InputEvent::click(3)), Decision::Dispatch(3));
        assert_eq!(d.feed(&InputEvent::click(3)), Decision::Dispatch(3));
        assert_eq!(*d.state(), GestureState::Idle);
    }

    #[test]
    fn set_mode_drops_gesture() {
        let mut d = tracking();
        d.feed(&InputEvent::touch_start(1, pt(0.0, 0.0)));
        d.set_mode(Mode::PassThrough);
        assert_eq!(*d.state(), GestureState::Idle);
        assert_eq!(d.mode(), Mode::PassThrough);
    }
}

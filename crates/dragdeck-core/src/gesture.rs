#![forbid(unsafe_code)]

//! Long-press drag recognition: turns raw pointer events into drag gestures.
//!
//! [`LongPressDragRecognizer`] is a stateful processor that converts raw
//! [`Event`] sequences into [`DragGesture`]s. A drag only begins after the
//! pointer has been held roughly still for the long-press threshold, which is
//! what separates "pick this card up" from "scroll the list" or "tap".
//!
//! # State Machine
//!
//! ```text
//!            down               long press (tick or move)
//!   Idle ───────────▶ AwaitingLongPress ───────────────────▶ Dragging
//!    ▲                 │  up / cancel / slop exceeded           │
//!    └─────────────────┘                                        │
//!    ▲                        up → End, cancel / focus → Cancel │
//!    └──────────────────────────────────────────────────────────┘
//! ```
//!
//! The recognizer never blocks: hosts call [`process`](LongPressDragRecognizer::process)
//! for every event and [`check_long_press`](LongPressDragRecognizer::check_long_press)
//! on every tick.
//!
//! # Invariants
//!
//! 1. Every drag sequence is well-formed: `Start` → zero or more `Move` →
//!    exactly one of `End` or `Cancel`.
//! 2. Only one pointer is tracked at a time. Events from any other pointer
//!    are ignored until the tracked gesture finishes.
//! 3. The sum of `Move` deltas equals `end - start` of the sequence.
//! 4. After `reset()`, the recognizer is `Idle` and emits nothing.
//!
//! # Failure Modes
//!
//! - If the host never ticks, a long press is still promoted on the next
//!   move or release of the tracked pointer.
//! - `reset()` drops an active drag without emitting `Cancel`; callers that
//!   need cleanup should feed a cancel event instead.

use std::time::Duration;

use tracing::trace;
use web_time::Instant;

use crate::event::{Event, PointerEvent, PointerEventKind, PointerId};
use crate::geometry::Point;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Thresholds for long-press drag recognition.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GestureConfig {
    /// Time the pointer must be held before a drag starts (default: 500ms).
    pub long_press_threshold: Duration,
    /// Maximum movement (logical px) tolerated while waiting for the long
    /// press. Moving further hands the gesture back to scrolling
    /// (default: 8.0).
    pub touch_slop: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            long_press_threshold: Duration::from_millis(500),
            touch_slop: 8.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Drag gestures produced by the recognizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragGesture {
    /// Long press confirmed; the drag begins at `pos`.
    Start { pos: Point },

    /// Ongoing drag movement.
    Move {
        current: Point,
        /// Movement since the previous `Start` or `Move`.
        delta: Point,
    },

    /// Pointer released after a drag.
    End { start: Point, end: Point },

    /// Drag interrupted (system cancel or focus loss).
    Cancel,
}

impl DragGesture {
    /// Returns true for `End` and `Cancel`.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::End { .. } | Self::Cancel)
    }
}

/// Observable phase of the recognizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecognizerState {
    Idle,
    AwaitingLongPress,
    Dragging,
}

// ---------------------------------------------------------------------------
// Internal state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
enum Phase {
    Idle,
    AwaitingLongPress {
        pointer: PointerId,
        down_pos: Point,
        last_pos: Point,
        down_at: Instant,
    },
    Dragging {
        pointer: PointerId,
        start_pos: Point,
        last_pos: Point,
    },
}

// ---------------------------------------------------------------------------
// LongPressDragRecognizer
// ---------------------------------------------------------------------------

/// Stateful recognizer for long-press-then-drag gestures.
#[derive(Debug, Clone)]
pub struct LongPressDragRecognizer {
    config: GestureConfig,
    phase: Phase,
}

impl Default for LongPressDragRecognizer {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}

impl LongPressDragRecognizer {
    /// Create a new recognizer with the given configuration.
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            phase: Phase::Idle,
        }
    }

    /// Process a raw event, returning any drag gestures produced.
    ///
    /// Most events produce 0 or 1 gestures. A move or release that arrives
    /// after the long-press threshold without an intervening tick produces
    /// `Start` followed by `Move`/`End`.
    pub fn process(&mut self, event: &Event, now: Instant) -> Vec<DragGesture> {
        let mut out = Vec::with_capacity(2);
        match event {
            Event::Pointer(pointer) => self.on_pointer(pointer, now, &mut out),
            Event::Focus(false) => self.interrupt("focus lost", &mut out),
            Event::Focus(true) => {}
        }
        out
    }

    /// Check for the long-press timeout. Call periodically (e.g., on tick).
    ///
    /// Returns `Some(DragGesture::Start { .. })` exactly once per press, when
    /// the tracked pointer has been held beyond the threshold.
    pub fn check_long_press(&mut self, now: Instant) -> Option<DragGesture> {
        let Phase::AwaitingLongPress {
            pointer,
            last_pos,
            down_at,
            ..
        } = self.phase
        else {
            return None;
        };
        if now.saturating_duration_since(down_at) < self.config.long_press_threshold {
            return None;
        }
        Some(self.promote(pointer, last_pos))
    }

    /// Current phase.
    #[inline]
    #[must_use]
    pub fn state(&self) -> RecognizerState {
        match self.phase {
            Phase::Idle => RecognizerState::Idle,
            Phase::AwaitingLongPress { .. } => RecognizerState::AwaitingLongPress,
            Phase::Dragging { .. } => RecognizerState::Dragging,
        }
    }

    /// Whether a drag is currently in progress.
    #[inline]
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, Phase::Dragging { .. })
    }

    /// The pointer currently being tracked, if any.
    #[must_use]
    pub fn tracked_pointer(&self) -> Option<PointerId> {
        match self.phase {
            Phase::Idle => None,
            Phase::AwaitingLongPress { pointer, .. } | Phase::Dragging { pointer, .. } => {
                Some(pointer)
            }
        }
    }

    /// Reset to idle without emitting anything.
    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
    }

    /// Get a reference to the current configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Update the configuration.
    pub fn set_config(&mut self, config: GestureConfig) {
        self.config = config;
    }
}

// ---------------------------------------------------------------------------
// Internal event handlers
// ---------------------------------------------------------------------------

impl LongPressDragRecognizer {
    fn on_pointer(&mut self, event: &PointerEvent, now: Instant, out: &mut Vec<DragGesture>) {
        if let Some(tracked) = self.tracked_pointer()
            && tracked != event.pointer
        {
            trace!(
                tracked = tracked.0,
                ignored = event.pointer.0,
                "second pointer ignored while a gesture is active"
            );
            return;
        }

        let pos = event.position;
        match event.kind {
            PointerEventKind::Down => self.on_down(event.pointer, pos, now),
            PointerEventKind::Move => self.on_move(pos, now, out),
            PointerEventKind::Up => self.on_up(pos, now, out),
            PointerEventKind::Cancel => self.interrupt("pointer cancelled", out),
        }
    }

    fn on_down(&mut self, pointer: PointerId, pos: Point, now: Instant) {
        if self.is_dragging() {
            // Duplicate down from the tracked pointer mid-drag; keep dragging.
            return;
        }
        trace!(pointer = pointer.0, x = pos.x, y = pos.y, "awaiting long press");
        self.phase = Phase::AwaitingLongPress {
            pointer,
            down_pos: pos,
            last_pos: pos,
            down_at: now,
        };
    }

    fn on_move(&mut self, pos: Point, now: Instant, out: &mut Vec<DragGesture>) {
        match self.phase {
            Phase::Idle => {}
            Phase::AwaitingLongPress {
                pointer,
                down_pos,
                last_pos,
                down_at,
            } => {
                if now.saturating_duration_since(down_at) >= self.config.long_press_threshold {
                    out.push(self.promote(pointer, last_pos));
                    self.drag_to(pos, out);
                } else if down_pos.distance(pos) > self.config.touch_slop {
                    trace!(pointer = pointer.0, "touch slop exceeded before long press");
                    self.phase = Phase::Idle;
                } else if let Phase::AwaitingLongPress { last_pos, .. } = &mut self.phase {
                    *last_pos = pos;
                }
            }
            Phase::Dragging { .. } => self.drag_to(pos, out),
        }
    }

    fn on_up(&mut self, pos: Point, now: Instant, out: &mut Vec<DragGesture>) {
        if let Phase::AwaitingLongPress {
            pointer,
            last_pos,
            down_at,
            ..
        } = self.phase
            && now.saturating_duration_since(down_at) >= self.config.long_press_threshold
        {
            out.push(self.promote(pointer, last_pos));
        }

        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Dragging { start_pos, .. } => {
                trace!(x = pos.x, y = pos.y, "drag released");
                out.push(DragGesture::End {
                    start: start_pos,
                    end: pos,
                });
            }
            Phase::AwaitingLongPress { .. } => trace!("released before long press"),
            Phase::Idle => {}
        }
    }

    fn interrupt(&mut self, reason: &'static str, out: &mut Vec<DragGesture>) {
        if let Phase::Dragging { .. } = std::mem::replace(&mut self.phase, Phase::Idle) {
            trace!(reason, "drag cancelled");
            out.push(DragGesture::Cancel);
        }
    }

    fn promote(&mut self, pointer: PointerId, pos: Point) -> DragGesture {
        trace!(pointer = pointer.0, x = pos.x, y = pos.y, "long press confirmed");
        self.phase = Phase::Dragging {
            pointer,
            start_pos: pos,
            last_pos: pos,
        };
        DragGesture::Start { pos }
    }

    fn drag_to(&mut self, pos: Point, out: &mut Vec<DragGesture>) {
        if let Phase::Dragging { last_pos, .. } = &mut self.phase {
            let delta = pos - *last_pos;
            *last_pos = pos;
            out.push(DragGesture::Move {
                current: pos,
                delta,
            });
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> Instant {
        Instant::now()
    }

    fn down(x: f32, y: f32) -> Event {
        PointerEvent::down(x, y).into()
    }

    fn moved(x: f32, y: f32) -> Event {
        PointerEvent::moved(x, y).into()
    }

    fn up(x: f32, y: f32) -> Event {
        PointerEvent::up(x, y).into()
    }

    fn cancel() -> Event {
        PointerEvent::cancel(0.0, 0.0).into()
    }

    const MS_100: Duration = Duration::from_millis(100);
    const MS_200: Duration = Duration::from_millis(200);
    const MS_600: Duration = Duration::from_millis(600);
    const MS_700: Duration = Duration::from_millis(700);

    /// Press at (x, y) and confirm the long press via tick.
    fn start_drag(gr: &mut LongPressDragRecognizer, t: Instant, x: f32, y: f32) {
        assert!(gr.process(&down(x, y), t).is_empty());
        let started = gr.check_long_press(t + MS_600);
        assert_eq!(started, Some(DragGesture::Start { pos: Point::new(x, y) }));
    }

    // --- Long press ---

    #[test]
    fn down_awaits_long_press() {
        let mut gr = LongPressDragRecognizer::default();
        let t = now();

        let events = gr.process(&down(5.0, 5.0), t);
        assert!(events.is_empty());
        assert_eq!(gr.state(), RecognizerState::AwaitingLongPress);
        assert!(gr.check_long_press(t + MS_200).is_none());
        assert!(!gr.is_dragging());
    }

    #[test]
    fn tick_past_threshold_starts_drag() {
        let mut gr = LongPressDragRecognizer::default();
        let t = now();
        start_drag(&mut gr, t, 5.0, 5.0);
        assert!(gr.is_dragging());
        assert_eq!(gr.state(), RecognizerState::Dragging);
    }

    #[test]
    fn long_press_not_repeated() {
        let mut gr = LongPressDragRecognizer::default();
        let t = now();
        start_drag(&mut gr, t, 5.0, 5.0);
        assert!(gr.check_long_press(t + MS_700).is_none());
    }

    #[test]
    fn small_jitter_within_slop_keeps_waiting() {
        let mut gr = LongPressDragRecognizer::default();
        let t = now();
        gr.process(&down(5.0, 5.0), t);
        assert!(gr.process(&moved(8.0, 5.0), t + MS_100).is_empty());
        assert_eq!(gr.state(), RecognizerState::AwaitingLongPress);

        // The drag starts where the pointer rests, not where it went down.
        let started = gr.check_long_press(t + MS_600);
        assert_eq!(started, Some(DragGesture::Start { pos: Point::new(8.0, 5.0) }));
    }

    #[test]
    fn moving_beyond_slop_hands_back_to_scroll() {
        let mut gr = LongPressDragRecognizer::default();
        let t = now();
        gr.process(&down(5.0, 5.0), t);
        assert!(gr.process(&moved(5.0, 40.0), t + MS_100).is_empty());
        assert_eq!(gr.state(), RecognizerState::Idle);
        assert!(gr.check_long_press(t + MS_600).is_none());
    }

    #[test]
    fn release_before_threshold_is_a_tap() {
        let mut gr = LongPressDragRecognizer::default();
        let t = now();
        gr.process(&down(5.0, 5.0), t);
        assert!(gr.process(&up(5.0, 5.0), t + MS_100).is_empty());
        assert_eq!(gr.state(), RecognizerState::Idle);
        assert!(gr.check_long_press(t + MS_600).is_none());
    }

    #[test]
    fn late_move_without_tick_promotes_then_moves() {
        let mut gr = LongPressDragRecognizer::default();
        let t = now();
        gr.process(&down(5.0, 5.0), t);

        let events = gr.process(&moved(25.0, 5.0), t + MS_600);
        assert_eq!(
            events,
            vec![
                DragGesture::Start { pos: Point::new(5.0, 5.0) },
                DragGesture::Move {
                    current: Point::new(25.0, 5.0),
                    delta: Point::new(20.0, 0.0),
                },
            ]
        );
    }

    #[test]
    fn late_release_without_tick_starts_and_ends() {
        let mut gr = LongPressDragRecognizer::default();
        let t = now();
        gr.process(&down(5.0, 5.0), t);

        let events = gr.process(&up(5.0, 5.0), t + MS_600);
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], DragGesture::Start { .. }));
        assert!(matches!(events[1], DragGesture::End { .. }));
        assert_eq!(gr.state(), RecognizerState::Idle);
    }

    #[test]
    fn custom_threshold() {
        let mut gr = LongPressDragRecognizer::new(GestureConfig {
            long_press_threshold: Duration::from_millis(150),
            ..GestureConfig::default()
        });
        let t = now();
        gr.process(&down(0.0, 0.0), t);
        assert!(gr.check_long_press(t + MS_100).is_none());
        assert!(gr.check_long_press(t + MS_200).is_some());
    }

    // --- Drag ---

    #[test]
    fn drag_move_reports_incremental_delta() {
        let mut gr = LongPressDragRecognizer::default();
        let t = now();
        start_drag(&mut gr, t, 10.0, 10.0);

        let e1 = gr.process(&moved(15.0, 12.0), t + MS_700);
        assert_eq!(
            e1,
            vec![DragGesture::Move {
                current: Point::new(15.0, 12.0),
                delta: Point::new(5.0, 2.0),
            }]
        );

        let e2 = gr.process(&moved(12.0, 20.0), t + MS_700);
        assert_eq!(
            e2,
            vec![DragGesture::Move {
                current: Point::new(12.0, 20.0),
                delta: Point::new(-3.0, 8.0),
            }]
        );
    }

    #[test]
    fn drag_end_on_release() {
        let mut gr = LongPressDragRecognizer::default();
        let t = now();
        start_drag(&mut gr, t, 10.0, 10.0);
        gr.process(&moved(30.0, 10.0), t + MS_700);

        let events = gr.process(&up(31.0, 10.0), t + MS_700);
        assert_eq!(
            events,
            vec![DragGesture::End {
                start: Point::new(10.0, 10.0),
                end: Point::new(31.0, 10.0),
            }]
        );
        assert!(events[0].is_terminal());
        assert!(!gr.is_dragging());
    }

    #[test]
    fn drag_cancel_on_pointer_cancel() {
        let mut gr = LongPressDragRecognizer::default();
        let t = now();
        start_drag(&mut gr, t, 10.0, 10.0);

        let events = gr.process(&cancel(), t + MS_700);
        assert_eq!(events, vec![DragGesture::Cancel]);
        assert_eq!(gr.state(), RecognizerState::Idle);
    }

    #[test]
    fn focus_loss_cancels_drag() {
        let mut gr = LongPressDragRecognizer::default();
        let t = now();
        start_drag(&mut gr, t, 10.0, 10.0);

        let events = gr.process(&Event::Focus(false), t + MS_700);
        assert_eq!(events, vec![DragGesture::Cancel]);
    }

    #[test]
    fn focus_loss_without_drag_is_silent() {
        let mut gr = LongPressDragRecognizer::default();
        let t = now();
        gr.process(&down(1.0, 1.0), t);
        assert!(gr.process(&Event::Focus(false), t + MS_100).is_empty());
        assert_eq!(gr.state(), RecognizerState::Idle);
    }

    #[test]
    fn focus_gain_ignored() {
        let mut gr = LongPressDragRecognizer::default();
        assert!(gr.process(&Event::Focus(true), now()).is_empty());
    }

    #[test]
    fn move_while_idle_is_ignored() {
        let mut gr = LongPressDragRecognizer::default();
        assert!(gr.process(&moved(10.0, 10.0), now()).is_empty());
        assert_eq!(gr.state(), RecognizerState::Idle);
    }

    // --- Single pointer ---

    #[test]
    fn second_pointer_is_ignored_while_dragging() {
        let mut gr = LongPressDragRecognizer::default();
        let t = now();
        start_drag(&mut gr, t, 10.0, 10.0);

        let other = PointerId(2);
        let e = gr.process(
            &PointerEvent::down(50.0, 50.0).with_pointer(other).into(),
            t + MS_700,
        );
        assert!(e.is_empty());
        let e = gr.process(
            &PointerEvent::up(50.0, 50.0).with_pointer(other).into(),
            t + MS_700,
        );
        assert!(e.is_empty());

        assert!(gr.is_dragging());
        assert_eq!(gr.tracked_pointer(), Some(PointerId(0)));
    }

    #[test]
    fn second_pointer_cannot_hijack_long_press() {
        let mut gr = LongPressDragRecognizer::default();
        let t = now();
        gr.process(&down(10.0, 10.0), t);
        gr.process(
            &PointerEvent::down(80.0, 80.0)
                .with_pointer(PointerId(3))
                .into(),
            t + MS_100,
        );
        let started = gr.check_long_press(t + MS_600);
        assert_eq!(started, Some(DragGesture::Start { pos: Point::new(10.0, 10.0) }));
    }

    #[test]
    fn reset_returns_to_idle_silently() {
        let mut gr = LongPressDragRecognizer::default();
        let t = now();
        start_drag(&mut gr, t, 10.0, 10.0);
        gr.reset();
        assert_eq!(gr.state(), RecognizerState::Idle);
        assert!(gr.tracked_pointer().is_none());
        assert!(gr.process(&up(0.0, 0.0), t + MS_700).is_empty());
    }

    #[test]
    fn config_getter_and_setter() {
        let mut gr = LongPressDragRecognizer::default();
        assert_eq!(gr.config(), &GestureConfig::default());
        let config = GestureConfig {
            touch_slop: 2.0,
            ..GestureConfig::default()
        };
        gr.set_config(config.clone());
        assert_eq!(gr.config(), &config);
    }

    #[test]
    fn default_config_values() {
        let config = GestureConfig::default();
        assert_eq!(config.long_press_threshold, Duration::from_millis(500));
        assert_eq!(config.touch_slop, 8.0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn config_deserializes_with_defaults() {
        let config: GestureConfig = serde_json::from_str(r#"{"touch_slop": 4.0}"#)
            .expect("partial config should parse");
        assert_eq!(config.touch_slop, 4.0);
        assert_eq!(config.long_press_threshold, Duration::from_millis(500));
    }
}

#![forbid(unsafe_code)]

//! Canonical input event types.
//!
//! Hosts translate their native pointer input into these values before
//! handing them to drag sources. Positions are window-absolute (see
//! [`crate::geometry`]).
//!
//! # Design Notes
//!
//! - Every pointer event carries a [`PointerId`] so recognizers can track a
//!   single pointer and ignore the rest.
//! - `Cancel` is the system interrupting a gesture (incoming call, parent
//!   stealing the pointer). It is distinct from `Up` at the input layer but
//!   handled identically by drag sources.

use crate::geometry::Point;

/// Canonical input event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// A pointer (touch, mouse, pen) event.
    Pointer(PointerEvent),

    /// Focus gained or lost.
    ///
    /// `true` = focus gained, `false` = focus lost. Losing focus interrupts
    /// any gesture in progress.
    Focus(bool),
}

/// Identifies one pointer across a down/move/up sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PointerId(pub u64);

/// A pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Which pointer produced the event.
    pub pointer: PointerId,
    /// The type of pointer event.
    pub kind: PointerEventKind,
    /// Window-absolute position.
    pub position: Point,
}

impl PointerEvent {
    /// Create a new pointer event for the primary pointer.
    #[must_use]
    pub const fn new(kind: PointerEventKind, position: Point) -> Self {
        Self {
            pointer: PointerId(0),
            kind,
            position,
        }
    }

    /// Pointer pressed.
    #[must_use]
    pub const fn down(x: f32, y: f32) -> Self {
        Self::new(PointerEventKind::Down, Point::new(x, y))
    }

    /// Pointer moved while pressed.
    #[must_use]
    pub const fn moved(x: f32, y: f32) -> Self {
        Self::new(PointerEventKind::Move, Point::new(x, y))
    }

    /// Pointer released.
    #[must_use]
    pub const fn up(x: f32, y: f32) -> Self {
        Self::new(PointerEventKind::Up, Point::new(x, y))
    }

    /// Gesture interrupted by the system.
    #[must_use]
    pub const fn cancel(x: f32, y: f32) -> Self {
        Self::new(PointerEventKind::Cancel, Point::new(x, y))
    }

    /// Attribute the event to a specific pointer.
    #[must_use]
    pub const fn with_pointer(mut self, pointer: PointerId) -> Self {
        self.pointer = pointer;
        self
    }
}

impl From<PointerEvent> for Event {
    fn from(event: PointerEvent) -> Self {
        Self::Pointer(event)
    }
}

/// Types of pointer events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    /// Pointer pressed.
    Down,
    /// Pointer moved.
    Move,
    /// Pointer released.
    Up,
    /// Gesture interrupted.
    Cancel,
}

/// Whether a handler claimed an event.
///
/// A consumed event must not also be delivered to scrollable ancestors; this
/// is how an active drag keeps a surrounding list from scrolling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventStatus {
    /// The handler did not use the event.
    #[default]
    Ignored,
    /// The handler used the event; stop propagation.
    Consumed,
}

impl EventStatus {
    /// Returns `true` if the event was consumed.
    #[inline]
    #[must_use]
    pub const fn is_consumed(self) -> bool {
        matches!(self, Self::Consumed)
    }

    /// Combine two statuses; consumed wins.
    #[inline]
    #[must_use]
    pub const fn or(self, other: Self) -> Self {
        if self.is_consumed() { self } else { other }
    }
}

#![forbid(unsafe_code)]

//! Core: geometry, pointer events, drag gesture recognition, and haptics.
//!
//! # Role in dragdeck
//! `dragdeck-core` is the input layer. It owns the value types every other
//! crate speaks in ([`geometry::Point`], [`geometry::Rect`]), the normalized
//! pointer [`event::Event`]s a host framework feeds in, and the
//! long-press-then-drag state machine that turns those events into
//! [`gesture::DragGesture`]s.
//!
//! # Primary responsibilities
//! - **Geometry**: window-absolute points, sizes and rectangles with
//!   half-open hit testing.
//! - **Event**: pointer down/move/up/cancel plus focus changes.
//! - **Gesture recognition**: `Idle → AwaitingLongPress → Dragging`, driven
//!   by discrete events and periodic ticks, never blocking.
//! - **Haptics**: the optional vibration capability a drag source may pulse.
//!
//! # How it fits in the system
//! `dragdeck-widgets` consumes these types to drive the shared drag session.
//! Nothing here knows about payloads, columns, or rendering.

pub mod event;
pub mod geometry;
pub mod gesture;
pub mod haptics;

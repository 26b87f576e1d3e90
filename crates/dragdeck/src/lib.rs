#![forbid(unsafe_code)]

//! dragdeck public facade crate.
//!
//! Re-exports the types an application needs to make list items draggable
//! between columns, plus a prelude for day-to-day use.
//!
//! The host drives everything from its UI loop:
//!
//! 1. Create one [`DragDropScope`] per board.
//! 2. Build a [`DragSource`] per item and a [`DropTarget`] per column (or
//!    per slot).
//! 3. After layout, report bounds with `on_layout`; forward pointer
//!    [`Event`]s to sources; call `tick` on sources every frame.
//! 4. Render through [`DragDropScope::render`] and paint its ghost on top.
//! 5. In `on_end`, move the item in the application's own model when
//!    `column.can_move()` says so.

use thiserror::Error;

// --- Core re-exports -------------------------------------------------------

pub use dragdeck_core::event::{Event, EventStatus, PointerEvent, PointerEventKind, PointerId};
pub use dragdeck_core::geometry::{Point, Rect, Size};
pub use dragdeck_core::gesture::{GestureConfig, RecognizerState};
pub use dragdeck_core::haptics::{Haptics, HapticsError};

// --- Runtime re-exports ----------------------------------------------------

pub use dragdeck_runtime::{BatchScope, Observable, Subscription};

// --- Widget re-exports -----------------------------------------------------

pub use dragdeck_widgets::{
    BuildError, ColumnPosition, DragDropScope, DragSession, DragSource, DragSourceConfig,
    DropContext, DropTarget, GhostFrame, GhostLayer, GhostStyle, ItemPosition, PositionTracking,
    RowPosition, ScopeFrame, SessionRef,
};

pub use web_time::Instant;

// --- Errors ---------------------------------------------------------------

/// Top-level error type for dragdeck apps.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A widget builder was incomplete.
    #[error(transparent)]
    Build(#[from] BuildError),
    /// A haptics backend failed. Drags never fail on this; it is here for
    /// hosts that drive haptics themselves.
    #[error(transparent)]
    Haptics(#[from] HapticsError),
}

/// Standard result type for dragdeck APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        ColumnPosition, DragDropScope, DragSource, DropContext, DropTarget, Error, Event,
        EventStatus, Instant, Point, PointerEvent, PositionTracking, Rect, Result, RowPosition,
    };

    pub use crate::{core, runtime, widgets};
}

pub use dragdeck_core as core;
pub use dragdeck_runtime as runtime;
pub use dragdeck_widgets as widgets;

#![forbid(unsafe_code)]

//! Drag-and-drop widgets for dragdeck.
//!
//! - [`DragDropScope`] owns the drag session for a subtree and paints the
//!   ghost overlay.
//! - [`DragSource`] turns a long press on an element into a drag.
//! - [`DropTarget`] hit-tests the drag point and records itself as the
//!   destination.
//!
//! Everything is single-threaded and driven by the host's UI loop: the host
//! reports layout bounds, forwards pointer events with timestamps, ticks
//! sources so a stationary long press is noticed, and calls `render`.
//!
//! # Example
//!
//! ```
//! use dragdeck_core::event::PointerEvent;
//! use dragdeck_core::geometry::Rect;
//! use dragdeck_widgets::DragDropScope;
//! use std::time::Duration;
//! use web_time::Instant;
//!
//! let scope: DragDropScope<&str, u8, String> = DragDropScope::new();
//! let mut card = scope
//!     .drag_source("card", 0, 0)
//!     .content(|dragging, _| if dragging { "·".into() } else { "card".into() })
//!     .build()?;
//! let mut done = scope
//!     .drop_target(1)
//!     .content(|cx| format!("done {:?}", cx.payload))
//!     .build()?;
//! card.on_layout(Rect::new(0.0, 0.0, 100.0, 40.0));
//! done.on_layout(Rect::new(200.0, 0.0, 100.0, 400.0));
//!
//! let t0 = Instant::now();
//! card.handle_event(&PointerEvent::down(10.0, 10.0).into(), t0);
//! card.tick(t0 + Duration::from_millis(500));
//! card.handle_event(&PointerEvent::moved(250.0, 30.0).into(), t0);
//! card.handle_event(&PointerEvent::up(250.0, 30.0).into(), t0);
//!
//! let frame = scope.render(|| done.render());
//! assert_eq!(frame.content, "done Some(\"card\")");
//! # Ok::<(), dragdeck_widgets::BuildError>(())
//! ```

pub mod error;
pub mod ghost;
pub mod position;
pub mod scope;
pub mod session;
pub mod source;
pub mod target;

pub use error::BuildError;
pub use ghost::{GhostFrame, GhostLayer, GhostStyle};
pub use position::{ColumnPosition, ItemPosition, RowPosition};
pub use scope::{DragDropScope, ScopeFrame};
pub use session::{ColumnKey, ContentFn, DragSession, GhostContent, Payload, SessionRef};
pub use source::{DragCallback, DragSource, DragSourceBuilder, DragSourceConfig};
pub use target::{DropContext, DropTarget, DropTargetBuilder, PositionTracking};

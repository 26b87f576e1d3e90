#![forbid(unsafe_code)]

//! Shared drag state and the handle widgets use to reach it.
//!
//! A [`DragSession`] is plain data. It lives inside an
//! [`Observable`](dragdeck_runtime::Observable) owned by the
//! [`DragDropScope`](crate::DragDropScope); drag sources and drop targets
//! hold a [`SessionRef`] and go through it for every read and write.
//!
//! # Invariants
//!
//! 1. `drag_delta` is zero whenever `is_dragging` is false.
//! 2. `payload` is set for the whole dragging window and for at most one
//!    rendered frame after the drag ends.
//! 3. Every write that touches more than one field happens inside a single
//!    [`SessionRef::update`], so observers never see half of it.

use std::fmt;
use std::rc::Rc;

use dragdeck_core::geometry::{Point, Rect};
use dragdeck_runtime::{Observable, WeakObservable};
use tracing::debug;

use crate::position::{ColumnPosition, ItemPosition, RowPosition};

/// Values that can be carried by a drag.
///
/// Blanket-implemented; exists to keep bounds readable.
pub trait Payload: Clone + PartialEq + 'static {}

impl<T> Payload for T where T: Clone + PartialEq + 'static {}

/// Values that identify a column or bucket.
pub trait ColumnKey: Clone + PartialEq + fmt::Debug + 'static {}

impl<K> ColumnKey for K where K: Clone + PartialEq + fmt::Debug + 'static {}

/// Render function of a drag source: `(is_dragging, payload) -> view`.
pub type ContentFn<T, V> = Rc<dyn Fn(bool, Option<&T>) -> V>;

/// The ghost overlay's render function, captured from the active source.
///
/// Two values are equal when they hold the same function, so replacing the
/// ghost with a different source's content counts as a session change.
pub struct GhostContent<T, V>(ContentFn<T, V>);

impl<T, V> GhostContent<T, V> {
    /// Wrap a source's render function.
    #[must_use]
    pub fn new(content: ContentFn<T, V>) -> Self {
        Self(content)
    }

    /// Invoke the captured function.
    pub fn render(&self, is_dragging: bool, payload: Option<&T>) -> V {
        (self.0)(is_dragging, payload)
    }
}

impl<T, V> Clone for GhostContent<T, V> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T, V> PartialEq for GhostContent<T, V> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<T, V> fmt::Debug for GhostContent<T, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("GhostContent")
            .field(&Rc::as_ptr(&self.0).cast::<()>())
            .finish()
    }
}

/// State of the drag in progress, if any.
///
/// `T` is the payload, `K` the column key, `V` the host's view type.
pub struct DragSession<T, K, V> {
    /// True from drag start to drag end or cancel.
    pub is_dragging: bool,
    /// Window-absolute point where the drag began.
    pub drag_anchor: Point,
    /// Accumulated pointer movement since the drag began.
    pub drag_delta: Point,
    /// Item being moved.
    pub payload: Option<T>,
    pub row_position: RowPosition,
    pub column_position: ColumnPosition<K>,
    /// Render function for the ghost overlay.
    pub ghost_content: Option<GhostContent<T, V>>,
}

impl<T, K, V> DragSession<T, K, V> {
    /// Current drag point: `drag_anchor + drag_delta`.
    #[inline]
    #[must_use]
    pub fn drag_point(&self) -> Point {
        self.drag_anchor + self.drag_delta
    }

    /// Whether a drag is active and its point lies inside `bounds`.
    #[must_use]
    pub fn hit_test(&self, bounds: Rect) -> bool {
        self.is_dragging && bounds.contains(self.drag_point())
    }
}

impl<T, K: Clone + PartialEq, V> DragSession<T, K, V> {
    /// Row and column pairs together.
    #[must_use]
    pub fn item_position(&self) -> ItemPosition<K> {
        ItemPosition::new(self.row_position, self.column_position.clone())
    }
}

impl<T, K, V> Default for DragSession<T, K, V> {
    fn default() -> Self {
        Self {
            is_dragging: false,
            drag_anchor: Point::ZERO,
            drag_delta: Point::ZERO,
            payload: None,
            row_position: RowPosition::default(),
            column_position: ColumnPosition::default(),
            ghost_content: None,
        }
    }
}

impl<T: Clone, K: Clone, V> Clone for DragSession<T, K, V> {
    fn clone(&self) -> Self {
        Self {
            is_dragging: self.is_dragging,
            drag_anchor: self.drag_anchor,
            drag_delta: self.drag_delta,
            payload: self.payload.clone(),
            row_position: self.row_position,
            column_position: self.column_position.clone(),
            ghost_content: self.ghost_content.clone(),
        }
    }
}

impl<T: PartialEq, K: PartialEq, V> PartialEq for DragSession<T, K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.is_dragging == other.is_dragging
            && self.drag_anchor == other.drag_anchor
            && self.drag_delta == other.drag_delta
            && self.payload == other.payload
            && self.row_position == other.row_position
            && self.column_position == other.column_position
            && self.ghost_content == other.ghost_content
    }
}

impl<T: fmt::Debug, K: fmt::Debug, V> fmt::Debug for DragSession<T, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragSession")
            .field("is_dragging", &self.is_dragging)
            .field("drag_anchor", &self.drag_anchor)
            .field("drag_delta", &self.drag_delta)
            .field("payload", &self.payload)
            .field("row_position", &self.row_position)
            .field("column_position", &self.column_position)
            .field("ghost_content", &self.ghost_content.is_some())
            .finish()
    }
}

/// Non-owning handle to the session of an enclosing [`DragDropScope`].
///
/// Every operation degrades to a logged no-op once the scope is gone.
///
/// [`DragDropScope`]: crate::DragDropScope
pub struct SessionRef<T, K, V> {
    inner: WeakObservable<DragSession<T, K, V>>,
}

impl<T, K, V> Clone for SessionRef<T, K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T, K, V> fmt::Debug for SessionRef<T, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionRef")
            .field("alive", &self.inner.is_alive())
            .finish()
    }
}

impl<T: Payload, K: ColumnKey, V: 'static> SessionRef<T, K, V> {
    pub(crate) fn new(session: &Observable<DragSession<T, K, V>>) -> Self {
        Self {
            inner: session.downgrade(),
        }
    }

    /// Strong handle to the session, if the scope still exists.
    #[must_use]
    pub fn upgrade(&self) -> Option<Observable<DragSession<T, K, V>>> {
        self.inner.upgrade()
    }

    /// Whether the owning scope still exists.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.inner.is_alive()
    }

    /// Read the session. Returns `None` if the scope is gone.
    pub fn read<R>(&self, f: impl FnOnce(&DragSession<T, K, V>) -> R) -> Option<R> {
        match self.inner.upgrade() {
            Some(session) => Some(session.with(f)),
            None => {
                debug!("drag session read after its scope was dropped");
                None
            }
        }
    }

    /// Whether a drag is active. `false` if the scope is gone.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.inner
            .upgrade()
            .is_some_and(|s| s.with(|s| s.is_dragging))
    }

    /// Mutate the session in one step. Observers are notified once if
    /// anything changed.
    ///
    /// Returns whether the session changed.
    pub fn update(&self, f: impl FnOnce(&mut DragSession<T, K, V>)) -> bool {
        match self.inner.upgrade() {
            Some(session) => session.update(f),
            None => {
                debug!("drag session write after its scope was dropped");
                false
            }
        }
    }
}

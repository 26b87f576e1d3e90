#![forbid(unsafe_code)]

//! Session provider for a subtree of drag sources and drop targets.
//!
//! A [`DragDropScope`] owns exactly one [`DragSession`]. Sources and targets
//! created through [`DragDropScope::drag_source`] and
//! [`DragDropScope::drop_target`] share it without the host threading a
//! session handle through its own views.
//!
//! Each frame the host calls [`DragDropScope::render`]: the scope renders the
//! host content, then, while a drag is active, the ghost overlay on top of
//! it. Layout passes that move several targets at once should run inside
//! [`DragDropScope::layout_pass`] so observers see the pass as one change.

use std::fmt;

use dragdeck_core::geometry::Size;
use dragdeck_runtime::{BatchScope, Observable, Subscription};
use tracing::trace;

use crate::ghost::{GhostFrame, GhostOverlay, GhostStyle};
use crate::session::{ColumnKey, DragSession, Payload, SessionRef};
use crate::source::DragSourceBuilder;
use crate::target::DropTargetBuilder;

/// Output of one [`DragDropScope::render`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct ScopeFrame<V> {
    /// The host's own content.
    pub content: V,
    /// Ghost overlay to paint above `content`, while a drag is active.
    pub ghost: Option<GhostFrame<V>>,
}

/// Owner of the drag session shared by a subtree.
pub struct DragDropScope<T, K, V> {
    session: Observable<DragSession<T, K, V>>,
    ghost: GhostOverlay,
    style: GhostStyle,
}

impl<T: Payload, K: ColumnKey, V: 'static> DragDropScope<T, K, V> {
    /// Create a scope with the default ghost style.
    #[must_use]
    pub fn new() -> Self {
        Self::with_style(GhostStyle::default())
    }

    /// Create a scope with a custom ghost style.
    #[must_use]
    pub fn with_style(style: GhostStyle) -> Self {
        Self {
            session: Observable::new(DragSession::default()),
            ghost: GhostOverlay::default(),
            style,
        }
    }

    /// Handle for components that need the session.
    #[must_use]
    pub fn session_ref(&self) -> SessionRef<T, K, V> {
        SessionRef::new(&self.session)
    }

    /// Copy of the current session.
    #[must_use]
    pub fn snapshot(&self) -> DragSession<T, K, V> {
        self.session.get()
    }

    /// Read the current session by reference.
    pub fn with_session<R>(&self, f: impl FnOnce(&DragSession<T, K, V>) -> R) -> R {
        self.session.with(f)
    }

    /// Whether a drag is active.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.session.with(|s| s.is_dragging)
    }

    /// Session version; bumps on every change. Handy for dirty checks.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.session.version()
    }

    /// Be told about every session change. Drop the guard to unsubscribe.
    pub fn subscribe(&self, callback: impl Fn(&DragSession<T, K, V>) + 'static) -> Subscription {
        self.session.subscribe(callback)
    }

    /// Ghost style in use.
    #[must_use]
    pub fn style(&self) -> &GhostStyle {
        &self.style
    }

    /// Start building a drag source bound to this scope.
    pub fn drag_source(&self, payload: T, row: usize, column: K) -> DragSourceBuilder<T, K, V> {
        DragSourceBuilder::new(self.session_ref(), payload, row, column)
    }

    /// Start building a drop target bound to this scope.
    pub fn drop_target(&self, column: K) -> DropTargetBuilder<T, K, V> {
        DropTargetBuilder::new(self.session_ref(), column)
    }

    /// Run a host layout pass.
    ///
    /// Session writes made by targets during the pass are applied
    /// immediately; observers are notified once, when the pass returns.
    pub fn layout_pass<R>(&self, f: impl FnOnce() -> R) -> R {
        let _batch = BatchScope::new();
        f()
    }

    /// The ghost overlay's layout reports its own size.
    pub fn on_ghost_layout(&self, size: Size) {
        self.ghost.measure(size);
    }

    /// Render one frame: `content`, plus the ghost overlay while dragging.
    ///
    /// Drop targets rendered inside `content` see the payload of a drop that
    /// just completed. Once the frame is rendered that payload is cleared,
    /// so it is visible for exactly one frame.
    pub fn render(&self, content: impl FnOnce() -> V) -> ScopeFrame<V> {
        let content = content();

        let active = self.session.with(|s| {
            if s.is_dragging {
                s.ghost_content.clone().map(|ghost| (ghost, s.drag_point()))
            } else {
                None
            }
        });

        let ghost = match active {
            Some((ghost, drag_point)) => Some(GhostFrame {
                layer: self.ghost.layer(drag_point, &self.style),
                view: ghost.render(false, None),
            }),
            None => {
                self.ghost.reset();
                None
            }
        };

        let cleared = self.session.update(|s| {
            if !s.is_dragging {
                s.payload = None;
            }
        });
        if cleared {
            trace!("post-drop payload cleared");
        }

        ScopeFrame { content, ghost }
    }
}

impl<T: Payload, K: ColumnKey, V: 'static> Default for DragDropScope<T, K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug, K: fmt::Debug, V> fmt::Debug for DragDropScope<T, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragDropScope")
            .field("session", &self.session)
            .field("style", &self.style)
            .field("ghost_size", &self.ghost.measured())
            .finish()
    }
}

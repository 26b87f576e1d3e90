#![forbid(unsafe_code)]

//! Drop targets: regions that react to the drag point.
//!
//! A [`DropTarget`] hit-tests the session's drag point against its own
//! bounds whenever its layout changes and whenever the session changes
//! during a drag. The result (`hovered`) survives the end of the drag so the
//! target that was under the finger at release can claim the drop; it is
//! reset when the next drag starts.
//!
//! How a hovered target records itself as the destination is chosen with
//! [`PositionTracking`]. Targets never decide whether a move is allowed;
//! they report a candidate and expose the payload, and the application
//! mutates its own model.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use dragdeck_core::geometry::Rect;
use dragdeck_runtime::Subscription;
use tracing::trace;

use crate::error::BuildError;
use crate::position::{ColumnPosition, RowPosition};
use crate::session::{ColumnKey, DragSession, Payload, SessionRef};

/// How a hovered target writes the destination into the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PositionTracking {
    /// Never write. Candidate is the live hit test; for simple drop zones
    /// that don't care where the item came from.
    Off,
    /// Write `to` whenever the drag enters this target. The target entered
    /// last wins.
    #[default]
    Continuous,
    /// Write `to` once, when the drag ends, and only if hovered then.
    OnRelease,
}

/// What a drop target's content function is given.
#[derive(Debug)]
pub struct DropContext<'a, T, K> {
    /// This target would receive the drop.
    pub is_candidate: bool,
    /// The dropped payload; only set on the target that received a
    /// completed drop, for the frame right after it.
    pub payload: Option<&'a T>,
    pub row_position: &'a RowPosition,
    pub column_position: &'a ColumnPosition<K>,
    pub is_dragging: bool,
}

type DropContentFn<T, K, V> = Box<dyn Fn(DropContext<'_, T, K>) -> V>;

/// Builder for [`DropTarget`].
pub struct DropTargetBuilder<T, K, V> {
    session: SessionRef<T, K, V>,
    column: K,
    row: Option<usize>,
    tracking: PositionTracking,
    content: Option<DropContentFn<T, K, V>>,
}

impl<T: Payload, K: ColumnKey, V: 'static> DropTargetBuilder<T, K, V> {
    pub(crate) fn new(session: SessionRef<T, K, V>, column: K) -> Self {
        Self {
            session,
            column,
            row: None,
            tracking: PositionTracking::default(),
            content: None,
        }
    }

    /// Row this target stands for; written to `row_position.to` when the
    /// target records itself as the destination.
    #[must_use]
    pub fn row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }

    #[must_use]
    pub fn tracking(mut self, tracking: PositionTracking) -> Self {
        self.tracking = tracking;
        self
    }

    #[must_use]
    pub fn content(mut self, f: impl Fn(DropContext<'_, T, K>) -> V + 'static) -> Self {
        self.content = Some(Box::new(f));
        self
    }

    /// Finish the target and start observing the session.
    ///
    /// # Errors
    ///
    /// [`BuildError::MissingContent`] if no content function was given.
    pub fn build(self) -> Result<DropTarget<T, K, V>, BuildError> {
        let content = self.content.ok_or(BuildError::MissingContent {
            widget: "DropTarget",
        })?;
        let state = Rc::new(HitState {
            column: self.column,
            row: self.row,
            tracking: self.tracking,
            bounds: Cell::new(None),
            hovered: Cell::new(false),
            was_dragging: Cell::new(self.session.is_dragging()),
        });

        let subscription = self.session.upgrade().map(|observable| {
            let state = Rc::clone(&state);
            let session = self.session.clone();
            observable.subscribe(move |_: &DragSession<T, K, V>| state.sync(&session, false))
        });

        Ok(DropTarget {
            session: self.session,
            state,
            content,
            _subscription: subscription,
        })
    }
}

/// Hit-test state shared between a target and its session subscription.
struct HitState<K> {
    column: K,
    row: Option<usize>,
    tracking: PositionTracking,
    bounds: Cell<Option<Rect>>,
    hovered: Cell<bool>,
    was_dragging: Cell<bool>,
}

impl<K: ColumnKey> HitState<K> {
    /// Re-run the hit test against the latest session.
    ///
    /// Reads the session instead of trusting a notification argument, so a
    /// coalesced or superseded notification can never leave a stale result.
    /// `relaid_out` is set when the bounds just moved.
    ///
    /// Continuous targets write `to` only when the drag enters them (drag
    /// start, hover edge, or bounds moved under the drag point), so
    /// overlapping targets settle on the one entered last.
    fn sync<T: Payload, V: 'static>(&self, session: &SessionRef<T, K, V>, relaid_out: bool) {
        let bounds = self.bounds.get();
        let Some((dragging, hit)) =
            session.read(|s| (s.is_dragging, bounds.is_some_and(|b| s.hit_test(b))))
        else {
            return;
        };
        let was_dragging = self.was_dragging.replace(dragging);

        if dragging {
            let was_hovered = self.hovered.replace(hit);
            if hit != was_hovered {
                trace!(column = ?self.column, row = ?self.row, hovered = hit, "drop target hover changed");
            }
            let entered = hit && (!was_hovered || !was_dragging || relaid_out);
            if entered && self.tracking == PositionTracking::Continuous {
                self.commit(session);
            }
        } else if was_dragging && self.hovered.get() && self.tracking == PositionTracking::OnRelease
        {
            self.commit(session);
        }
    }

    fn commit<T: Payload, V: 'static>(&self, session: &SessionRef<T, K, V>) {
        let column = self.column.clone();
        let row = self.row;
        session.update(move |s| {
            s.column_position.to = Some(column);
            if let Some(row) = row {
                s.row_position.to = Some(row);
            }
        });
    }

    /// Candidate rule for a session snapshot.
    fn is_candidate<T, V>(&self, s: &DragSession<T, K, V>) -> bool {
        if !self.hovered.get() {
            return false;
        }
        // A finished drag stays a candidate only while its payload is
        // still published.
        if !s.is_dragging && s.payload.is_none() {
            return false;
        }
        match self.tracking {
            PositionTracking::Off => true,
            PositionTracking::Continuous | PositionTracking::OnRelease => {
                ColumnPosition::new(s.column_position.from.clone(), Some(self.column.clone()))
                    .can_move()
            }
        }
    }
}

/// A region that can receive a dragged payload.
pub struct DropTarget<T, K, V> {
    session: SessionRef<T, K, V>,
    state: Rc<HitState<K>>,
    content: DropContentFn<T, K, V>,
    _subscription: Option<Subscription>,
}

impl<T: Payload, K: ColumnKey, V: 'static> DropTarget<T, K, V> {
    /// Start building a target for `column`.
    pub fn builder(session: SessionRef<T, K, V>, column: K) -> DropTargetBuilder<T, K, V> {
        DropTargetBuilder::new(session, column)
    }

    /// Report the element's window-absolute bounds after layout.
    pub fn on_layout(&mut self, bounds: Rect) {
        let previous = self.state.bounds.replace(Some(bounds));
        self.state.sync(&self.session, previous != Some(bounds));
    }

    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        self.state.bounds.get()
    }

    #[must_use]
    pub fn column(&self) -> &K {
        &self.state.column
    }

    #[must_use]
    pub fn row(&self) -> Option<usize> {
        self.state.row
    }

    #[must_use]
    pub fn tracking(&self) -> PositionTracking {
        self.state.tracking
    }

    /// Last hit-test result.
    #[must_use]
    pub fn is_hovered(&self) -> bool {
        self.state.hovered.get()
    }

    /// Whether this target would receive (or just received) the drop.
    #[must_use]
    pub fn is_candidate(&self) -> bool {
        self.session
            .read(|s| self.state.is_candidate(s))
            .unwrap_or(false)
    }

    /// The payload of a drop this target just received.
    ///
    /// `None` while dragging, on targets that were not the candidate, and
    /// for drops back into the origin column (unless tracking is off).
    #[must_use]
    pub fn payload(&self) -> Option<T> {
        self.session
            .read(|s| {
                if !s.is_dragging && self.state.is_candidate(s) {
                    s.payload.clone()
                } else {
                    None
                }
            })
            .flatten()
    }

    /// Render with the current [`DropContext`].
    pub fn render(&self) -> V {
        let snapshot = self.session.read(|s| {
            (
                self.state.is_candidate(s),
                s.is_dragging,
                s.payload.clone(),
                s.row_position,
                s.column_position.clone(),
            )
        });
        let (is_candidate, is_dragging, payload, row_position, column_position) =
            snapshot.unwrap_or_default();
        let payload = if is_candidate && !is_dragging {
            payload
        } else {
            None
        };
        (self.content)(DropContext {
            is_candidate,
            payload: payload.as_ref(),
            row_position: &row_position,
            column_position: &column_position,
            is_dragging,
        })
    }
}

impl<T, K: fmt::Debug, V> fmt::Debug for DropTarget<T, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DropTarget")
            .field("column", &self.state.column)
            .field("row", &self.state.row)
            .field("tracking", &self.state.tracking)
            .field("bounds", &self.state.bounds.get())
            .field("hovered", &self.state.hovered.get())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    use dragdeck_core::geometry::Point;

    use crate::scope::DragDropScope;
    use crate::session::{ContentFn, GhostContent};

    type Scope = DragDropScope<u32, char, String>;
    type Target = DropTarget<u32, char, String>;

    fn target(scope: &Scope, column: char, tracking: PositionTracking, bounds: Rect) -> Target {
        let mut target = scope
            .drop_target(column)
            .tracking(tracking)
            .content(|cx| format!("{}:{:?}", cx.is_candidate, cx.payload))
            .build()
            .expect("content given");
        target.on_layout(bounds);
        target
    }

    fn start(scope: &Scope, column: char, at: Point) {
        let ghost: ContentFn<u32, String> = Rc::new(|_, _| String::new());
        scope.session_ref().update(|s| {
            s.is_dragging = true;
            s.payload = Some(1);
            s.drag_anchor = at;
            s.drag_delta = Point::ZERO;
            s.row_position = RowPosition::origin(0);
            s.column_position = ColumnPosition::origin(column);
            s.ghost_content = Some(GhostContent::new(ghost));
        });
    }

    fn move_to(scope: &Scope, at: Point) {
        scope.session_ref().update(|s| s.drag_delta = at - s.drag_anchor);
    }

    fn release(scope: &Scope) {
        scope.session_ref().update(|s| {
            s.drag_delta = Point::ZERO;
            s.is_dragging = false;
        });
    }

    const LEFT: Rect = Rect::new(0.0, 0.0, 100.0, 100.0);
    const RIGHT: Rect = Rect::new(100.0, 0.0, 100.0, 100.0);

    #[test]
    fn build_without_content_fails() {
        let scope = Scope::new();
        assert!(matches!(
            scope.drop_target('a').build(),
            Err(BuildError::MissingContent {
                widget: "DropTarget"
            })
        ));
    }

    #[test]
    fn continuous_tracking_follows_the_drag_point() {
        let scope = Scope::new();
        let left = target(&scope, 'a', PositionTracking::Continuous, LEFT);
        let right = target(&scope, 'b', PositionTracking::Continuous, RIGHT);

        start(&scope, 'a', Point::new(50.0, 50.0));
        assert!(left.is_hovered());
        assert_eq!(scope.snapshot().column_position.to, Some('a'));
        assert!(!left.is_candidate(), "origin column is never a candidate");

        move_to(&scope, Point::new(150.0, 50.0));
        assert!(!left.is_hovered());
        assert!(right.is_hovered());
        assert!(right.is_candidate());
        assert_eq!(scope.snapshot().column_position.to, Some('b'));
        assert_eq!(right.payload(), None, "no payload while dragging");
    }

    #[test]
    fn continuous_candidate_receives_payload_after_release() {
        let scope = Scope::new();
        let left = target(&scope, 'a', PositionTracking::Continuous, LEFT);
        let right = target(&scope, 'b', PositionTracking::Continuous, RIGHT);

        start(&scope, 'a', Point::new(50.0, 50.0));
        move_to(&scope, Point::new(150.0, 50.0));
        release(&scope);

        assert!(right.is_hovered(), "hover retained after release");
        assert_eq!(right.payload(), Some(1));
        assert_eq!(right.render(), "true:Some(1)");
        assert_eq!(left.payload(), None);
        assert_eq!(left.render(), "false:None");
    }

    #[test]
    fn drop_back_into_origin_column_is_not_a_move() {
        let scope = Scope::new();
        let left = target(&scope, 'a', PositionTracking::Continuous, LEFT);

        start(&scope, 'a', Point::new(50.0, 50.0));
        move_to(&scope, Point::new(60.0, 70.0));
        release(&scope);

        assert!(!scope.snapshot().column_position.can_move());
        assert!(!left.is_candidate());
        assert_eq!(left.payload(), None);
    }

    #[test]
    fn overlapping_targets_keep_the_last_entered() {
        let scope = Scope::new();
        let wide = Rect::new(0.0, 0.0, 150.0, 100.0);
        let b = target(&scope, 'b', PositionTracking::Continuous, wide);
        let c = target(&scope, 'c', PositionTracking::Continuous, RIGHT);

        start(&scope, 'a', Point::new(50.0, 50.0));
        assert_eq!(scope.snapshot().column_position.to, Some('b'));

        move_to(&scope, Point::new(120.0, 50.0));
        assert!(b.is_hovered() && c.is_hovered());
        assert_eq!(scope.snapshot().column_position.to, Some('c'));

        move_to(&scope, Point::new(130.0, 60.0));
        assert_eq!(scope.snapshot().column_position.to, Some('c'));

        // Leaving `b` and entering it again hands `to` back.
        move_to(&scope, Point::new(170.0, 50.0));
        assert!(!b.is_hovered());
        move_to(&scope, Point::new(120.0, 50.0));
        assert_eq!(scope.snapshot().column_position.to, Some('b'));
        assert!(scope.is_dragging());
    }

    #[test]
    fn relayout_under_the_drag_point_reclaims_to() {
        let scope = Scope::new();
        let mut b = target(&scope, 'b', PositionTracking::Continuous, LEFT);
        let wide = Rect::new(0.0, 0.0, 200.0, 100.0);
        let _c = target(&scope, 'c', PositionTracking::Continuous, wide);

        start(&scope, 'a', Point::new(50.0, 50.0));
        assert_eq!(scope.snapshot().column_position.to, Some('c'));

        b.on_layout(LEFT);
        assert_eq!(scope.snapshot().column_position.to, Some('c'), "same bounds, no write");
        b.on_layout(Rect::new(0.0, 0.0, 120.0, 100.0));
        assert_eq!(scope.snapshot().column_position.to, Some('b'));
    }

    #[test]
    fn tracking_off_never_writes_and_gates_on_hover_only() {
        let scope = Scope::new();
        let left = target(&scope, 'a', PositionTracking::Off, LEFT);

        start(&scope, 'a', Point::new(50.0, 50.0));
        assert!(left.is_candidate(), "live hit while dragging");
        assert_eq!(left.payload(), None);
        release(&scope);

        assert_eq!(scope.snapshot().column_position.to, None);
        assert_eq!(left.payload(), Some(1));
    }

    #[test]
    fn on_release_commits_once_at_the_end() {
        let scope = Scope::new();
        let _left = target(&scope, 'a', PositionTracking::OnRelease, LEFT);
        let right = target(&scope, 'b', PositionTracking::OnRelease, RIGHT);

        start(&scope, 'a', Point::new(50.0, 50.0));
        move_to(&scope, Point::new(150.0, 50.0));
        assert_eq!(scope.snapshot().column_position.to, None, "nothing written mid-drag");
        assert!(right.is_candidate());

        release(&scope);
        assert_eq!(scope.snapshot().column_position.to, Some('b'));
        assert_eq!(right.payload(), Some(1));
    }

    #[test]
    fn row_key_is_written_with_the_column() {
        let scope = Scope::new();
        let mut slot = scope
            .drop_target('b')
            .row(4)
            .content(|_| String::new())
            .build()
            .expect("content given");
        slot.on_layout(RIGHT);

        start(&scope, 'a', Point::new(150.0, 10.0));
        let s = scope.snapshot();
        assert_eq!(s.row_position, RowPosition::new(Some(0), Some(4)));
        assert_eq!(s.column_position, ColumnPosition::new(Some('a'), Some('b')));
    }

    #[test]
    fn hover_resets_when_the_next_drag_starts() {
        let scope = Scope::new();
        let right = target(&scope, 'b', PositionTracking::Continuous, RIGHT);

        start(&scope, 'a', Point::new(150.0, 50.0));
        release(&scope);
        assert!(right.is_hovered());

        start(&scope, 'a', Point::new(50.0, 50.0));
        assert!(!right.is_hovered());
        assert!(!right.is_candidate());
    }

    #[test]
    fn layout_change_rehits_during_a_drag() {
        let scope = Scope::new();
        let mut right = target(&scope, 'b', PositionTracking::Continuous, RIGHT);
        start(&scope, 'a', Point::new(50.0, 50.0));
        assert!(!right.is_hovered());

        right.on_layout(LEFT);
        assert!(right.is_hovered());
        assert_eq!(scope.snapshot().column_position.to, Some('b'));
    }

    #[test]
    fn unlaid_out_target_is_never_hovered() {
        let scope = Scope::new();
        let target = scope
            .drop_target('a')
            .content(|_| String::new())
            .build()
            .expect("content given");
        start(&scope, 'b', Point::new(0.0, 0.0));
        assert!(!target.is_hovered());
        assert_eq!(target.bounds(), None);
    }

    #[test]
    fn dropping_the_target_unsubscribes() {
        let scope = Scope::new();
        let target = target(&scope, 'a', PositionTracking::Continuous, LEFT);
        drop(target);
        start(&scope, 'a', Point::new(50.0, 50.0));
        assert_eq!(scope.snapshot().column_position.to, None);
    }

    #[test]
    fn context_carries_session_positions() {
        let scope = Scope::new();
        let mut target = scope
            .drop_target('b')
            .content(|cx| {
                format!(
                    "{}:{:?}->{:?}",
                    cx.is_dragging, cx.column_position.from, cx.column_position.to
                )
            })
            .build()
            .expect("content given");
        target.on_layout(RIGHT);
        start(&scope, 'a', Point::new(150.0, 50.0));
        assert_eq!(target.render(), "true:Some('a')->Some('b')");
    }
}

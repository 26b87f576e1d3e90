#![forbid(unsafe_code)]

//! Long-press drag source.
//!
//! A [`DragSource`] wraps one draggable element. The host reports its
//! bounds after layout, forwards pointer events, and polls [`DragSource::tick`]
//! so a stationary long press is noticed without further input.
//!
//! # State Machine
//!
//! ```text
//! Idle ──(long press)──► Dragging ──(move)──► Dragging
//!   ▲                        │
//!   └──(release | cancel)────┘
//! ```
//!
//! Drag start publishes the payload, anchor, origin positions and ghost in
//! one session write, pulses haptics if available, then calls `on_start`.
//! Release and cancel take the same path: the delta is zeroed, the drag is
//! marked finished in one write, then `on_end` runs exactly once.
//!
//! While dragging, move events report [`EventStatus::Consumed`] so the host
//! keeps them away from scrollable ancestors.

use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use dragdeck_core::event::{Event, EventStatus, PointerEventKind};
use dragdeck_core::geometry::{Point, Rect};
use dragdeck_core::gesture::{DragGesture, GestureConfig, LongPressDragRecognizer, RecognizerState};
use dragdeck_core::haptics::{Haptics, pulse};
use tracing::{debug, trace, warn};
use web_time::Instant;

use crate::error::BuildError;
use crate::position::{ColumnPosition, RowPosition};
use crate::session::{ColumnKey, ContentFn, GhostContent, Payload, SessionRef};

/// Callback run at drag start and drag end with the payload and positions.
pub type DragCallback<T, K> = Box<dyn FnMut(&T, &RowPosition, &ColumnPosition<K>)>;

/// Tunables of a drag source.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DragSourceConfig {
    pub gesture: GestureConfig,
    /// Length of the haptic pulse at drag start (default: 200ms).
    pub haptic_pulse: Duration,
}

impl Default for DragSourceConfig {
    fn default() -> Self {
        Self {
            gesture: GestureConfig::default(),
            haptic_pulse: Duration::from_millis(200),
        }
    }
}

/// Builder for [`DragSource`].
pub struct DragSourceBuilder<T, K, V> {
    session: SessionRef<T, K, V>,
    payload: T,
    row: usize,
    column: K,
    config: DragSourceConfig,
    haptics: Option<Rc<dyn Haptics>>,
    on_start: Option<DragCallback<T, K>>,
    on_end: Option<DragCallback<T, K>>,
    content: Option<ContentFn<T, V>>,
}

impl<T: Payload, K: ColumnKey, V: 'static> DragSourceBuilder<T, K, V> {
    pub(crate) fn new(session: SessionRef<T, K, V>, payload: T, row: usize, column: K) -> Self {
        Self {
            session,
            payload,
            row,
            column,
            config: DragSourceConfig::default(),
            haptics: None,
            on_start: None,
            on_end: None,
            content: None,
        }
    }

    /// Replace the default tunables.
    #[must_use]
    pub fn config(mut self, config: DragSourceConfig) -> Self {
        self.config = config;
        self
    }

    /// Pulse this device when a drag starts.
    #[must_use]
    pub fn haptics(mut self, haptics: Rc<dyn Haptics>) -> Self {
        self.haptics = Some(haptics);
        self
    }

    /// Called once per drag, after the session has been published.
    #[must_use]
    pub fn on_start(
        mut self,
        f: impl FnMut(&T, &RowPosition, &ColumnPosition<K>) + 'static,
    ) -> Self {
        self.on_start = Some(Box::new(f));
        self
    }

    /// Called once per drag, after release or cancel, with the final
    /// positions.
    #[must_use]
    pub fn on_end(mut self, f: impl FnMut(&T, &RowPosition, &ColumnPosition<K>) + 'static) -> Self {
        self.on_end = Some(Box::new(f));
        self
    }

    /// Render function: `(is_dragging, payload) -> view`. Also used for the
    /// ghost overlay while this source is being dragged.
    #[must_use]
    pub fn content(mut self, f: impl Fn(bool, Option<&T>) -> V + 'static) -> Self {
        self.content = Some(Rc::new(f));
        self
    }

    /// Finish the source.
    ///
    /// # Errors
    ///
    /// [`BuildError::MissingContent`] if no content function was given.
    pub fn build(self) -> Result<DragSource<T, K, V>, BuildError> {
        let content = self.content.ok_or(BuildError::MissingContent {
            widget: "DragSource",
        })?;
        Ok(DragSource {
            session: self.session,
            payload: self.payload,
            row: self.row,
            column: self.column,
            recognizer: LongPressDragRecognizer::new(self.config.gesture.clone()),
            config: self.config,
            bounds: Rect::default(),
            active: false,
            haptics: self.haptics,
            on_start: self.on_start,
            on_end: self.on_end,
            content,
        })
    }
}

/// An element that can be long-pressed and dragged.
pub struct DragSource<T: Payload, K: ColumnKey, V: 'static> {
    session: SessionRef<T, K, V>,
    payload: T,
    row: usize,
    column: K,
    config: DragSourceConfig,
    recognizer: LongPressDragRecognizer,
    bounds: Rect,
    /// This source owns the current session drag.
    active: bool,
    haptics: Option<Rc<dyn Haptics>>,
    on_start: Option<DragCallback<T, K>>,
    on_end: Option<DragCallback<T, K>>,
    content: ContentFn<T, V>,
}

impl<T: Payload, K: ColumnKey, V: 'static> DragSource<T, K, V> {
    /// Start building a source for `payload` at `row` in `column`.
    pub fn builder(
        session: SessionRef<T, K, V>,
        payload: T,
        row: usize,
        column: K,
    ) -> DragSourceBuilder<T, K, V> {
        DragSourceBuilder::new(session, payload, row, column)
    }

    /// Report the element's window-absolute bounds after layout.
    pub fn on_layout(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    /// Last reported bounds.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    #[must_use]
    pub fn payload(&self) -> &T {
        &self.payload
    }

    #[must_use]
    pub fn row(&self) -> usize {
        self.row
    }

    #[must_use]
    pub fn column(&self) -> &K {
        &self.column
    }

    #[must_use]
    pub fn config(&self) -> &DragSourceConfig {
        &self.config
    }

    /// Whether this source is the one being dragged.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.active
    }

    /// Phase of the underlying long-press recognizer.
    #[must_use]
    pub fn gesture_state(&self) -> RecognizerState {
        self.recognizer.state()
    }

    /// Feed one input event.
    pub fn handle_event(&mut self, event: &Event, now: Instant) -> EventStatus {
        if let Event::Pointer(pointer) = event
            && pointer.kind == PointerEventKind::Down
            && self.recognizer.state() == RecognizerState::Idle
            && !self.accepts_press(pointer.position)
        {
            return EventStatus::Ignored;
        }

        let mut status = EventStatus::Ignored;
        for gesture in self.recognizer.process(event, now) {
            status = status.or(self.apply(gesture));
        }
        status
    }

    /// Poll the long-press timeout. Returns `true` if a drag started.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.recognizer.check_long_press(now) {
            Some(gesture) => self.apply(gesture).is_consumed(),
            None => false,
        }
    }

    /// Render with `(is_dragging, session payload)`.
    pub fn render(&self) -> V {
        let payload = self.session.read(|s| s.payload.clone()).flatten();
        (self.content)(self.active, payload.as_ref())
    }

    /// A press may arm the recognizer only inside our bounds and only while
    /// no other drag owns the session.
    fn accepts_press(&self, position: Point) -> bool {
        if !self.bounds.contains(position) {
            return false;
        }
        if self.session.is_dragging() {
            trace!(row = self.row, "press ignored; another drag is active");
            return false;
        }
        self.session.is_alive()
    }

    fn apply(&mut self, gesture: DragGesture) -> EventStatus {
        match gesture {
            DragGesture::Start { pos } => self.begin(pos),
            DragGesture::Move { delta, .. } => self.drag_by(delta),
            DragGesture::End { .. } | DragGesture::Cancel => self.finish(),
        }
    }

    fn begin(&mut self, pos: Point) -> EventStatus {
        if self.session.is_dragging() || !self.session.is_alive() {
            debug!(row = self.row, "long press not turned into a drag");
            self.recognizer.reset();
            return EventStatus::Ignored;
        }

        let origin = self.bounds.origin();
        let touch_offset = pos - origin;
        let anchor = origin + touch_offset;

        let payload = self.payload.clone();
        let row = self.row;
        let column = self.column.clone();
        let ghost = GhostContent::new(Rc::clone(&self.content));
        self.session.update(move |s| {
            s.payload = Some(payload);
            s.is_dragging = true;
            s.drag_anchor = anchor;
            s.drag_delta = Point::ZERO;
            s.row_position = RowPosition::origin(row);
            s.column_position = ColumnPosition::origin(column);
            s.ghost_content = Some(ghost);
        });
        self.active = true;
        debug!(
            row = self.row,
            column = ?self.column,
            x = anchor.x,
            y = anchor.y,
            "drag started"
        );

        if let Some(haptics) = &self.haptics
            && let Err(err) = pulse(haptics.as_ref(), self.config.haptic_pulse)
        {
            warn!(error = %err, "haptic feedback unavailable; drag continues without it");
        }

        let positions = self
            .session
            .read(|s| (s.row_position, s.column_position.clone()));
        if let (Some(on_start), Some((row, column))) = (self.on_start.as_mut(), positions) {
            on_start(&self.payload, &row, &column);
        }
        EventStatus::Consumed
    }

    fn drag_by(&mut self, delta: Point) -> EventStatus {
        if !self.active {
            return EventStatus::Ignored;
        }
        let row = self.row;
        let column = self.column.clone();
        self.session.update(move |s| {
            s.drag_delta += delta;
            s.row_position.from = Some(row);
            s.column_position.from = Some(column);
        });
        EventStatus::Consumed
    }

    fn finish(&mut self) -> EventStatus {
        if !self.active {
            return EventStatus::Ignored;
        }
        self.active = false;

        let row = self.row;
        let column = self.column.clone();
        self.session.update(move |s| {
            s.drag_delta = Point::ZERO;
            s.row_position.from = Some(row);
            s.column_position.from = Some(column);
            s.is_dragging = false;
        });

        let positions = self
            .session
            .read(|s| (s.row_position, s.column_position.clone()));
        if let Some((row, column)) = &positions {
            debug!(
                from = ?column.from,
                to = ?column.to,
                moved = column.can_move(),
                row_to = ?row.to,
                "drag ended"
            );
        }
        if let (Some(on_end), Some((row, column))) = (self.on_end.as_mut(), positions) {
            on_end(&self.payload, &row, &column);
        }
        EventStatus::Consumed
    }
}

impl<T: Payload, K: ColumnKey, V: 'static> Drop for DragSource<T, K, V> {
    /// A source torn down mid-drag ends the drag as if it were cancelled.
    fn drop(&mut self) {
        if self.active {
            debug!(row = self.row, "drag source dropped mid-drag");
            self.finish();
        }
    }
}

impl<T: Payload + fmt::Debug, K: ColumnKey, V: 'static> fmt::Debug for DragSource<T, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragSource")
            .field("payload", &self.payload)
            .field("row", &self.row)
            .field("column", &self.column)
            .field("bounds", &self.bounds)
            .field("active", &self.active)
            .field("gesture", &self.recognizer.state())
            .finish_non_exhaustive()
    }
}

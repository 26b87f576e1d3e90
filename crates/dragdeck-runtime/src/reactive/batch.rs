#![forbid(unsafe_code)]

//! Batch update coalescing for [`Observable`](super::Observable) notifications.
//!
//! A layout pass may have many drop targets write into the drag session one
//! after another. Without batching, every write notifies every observer and
//! observers render intermediate states. Inside a [`BatchScope`] values are
//! still written immediately, but notifications are deferred until the
//! outermost scope exits, and each unique callback then fires once with the
//! latest value.
//!
//! # Usage
//!
//! ```
//! use dragdeck_runtime::reactive::{BatchScope, Observable};
//!
//! let hovered = Observable::new(0);
//! {
//!     let _batch = BatchScope::new();
//!     hovered.set(1); // notification deferred
//!     hovered.set(2); // coalesced with the first
//! } // subscribers called once, with 2
//! assert_eq!(hovered.get(), 2);
//! ```
//!
//! # Invariants
//!
//! 1. Nested batches are supported: only the outermost scope flushes.
//! 2. Within a batch, `Observable::get()` always returns the latest value.
//! 3. After a batch exits, subscribers see the final state, never an
//!    intermediate one.
//! 4. Flush calls deferred callbacks in the order they were first enqueued.
//!
//! # Failure Modes
//!
//! - **Callback panics during flush**: remaining callbacks are still called.
//!   The first panic is re-raised after all callbacks have been attempted.

use std::cell::RefCell;

use tracing::trace_span;
use web_time::Instant;

type DeferredNotify = Box<dyn FnOnce()>;

/// Deferred callback entry keyed for in-batch coalescing.
struct DeferredEntry {
    key: usize,
    notify: DeferredNotify,
}

/// Thread-local batch context.
struct BatchContext {
    /// Nesting depth. Only flush when this reaches 0.
    depth: u32,
    /// Queued notifications to fire on flush.
    deferred: Vec<DeferredEntry>,
    /// Number of value changes coalesced into this batch.
    changes: u64,
}

thread_local! {
    static BATCH_CTX: RefCell<Option<BatchContext>> = const { RefCell::new(None) };
}

/// Returns true if a batch is currently active on this thread.
pub fn is_batching() -> bool {
    BATCH_CTX.with(|ctx| ctx.borrow().is_some())
}

/// Enqueue a deferred notification keyed by `key`, to fire when the current
/// batch exits. If no batch is active, the notification fires immediately.
/// Returns `true` if the notification was deferred.
///
/// If the key is already queued in the current batch, the queued callback is
/// replaced so the latest wins while keeping the original enqueue position.
pub fn defer_or_run_keyed(key: usize, f: impl FnOnce() + 'static) -> bool {
    BATCH_CTX.with(|ctx| {
        let mut guard = ctx.borrow_mut();
        if let Some(ref mut batch) = *guard {
            if let Some(entry) = batch.deferred.iter_mut().find(|e| e.key == key) {
                entry.notify = Box::new(f);
            } else {
                batch.deferred.push(DeferredEntry {
                    key,
                    notify: Box::new(f),
                });
            }
            true
        } else {
            drop(guard);
            f();
            false
        }
    })
}

/// Record one value change while a batch is active.
pub fn record_change() {
    BATCH_CTX.with(|ctx| {
        if let Some(ref mut batch) = *ctx.borrow_mut() {
            batch.changes = batch.changes.saturating_add(1);
        }
    });
}

/// Fire every notification queued in a finished batch.
///
/// The batch context is already cleared when this runs, so callbacks that
/// write observables notify immediately instead of queueing into a batch
/// nobody will flush.
fn flush(batch: BatchContext) {
    let BatchContext {
        changes, deferred, ..
    } = batch;
    if deferred.is_empty() {
        return;
    }

    let callbacks = deferred.len() as u64;
    let started = Instant::now();
    let _span = trace_span!(
        "dragdeck.batch_flush",
        changes,
        callbacks,
        duration_us = tracing::field::Empty
    )
    .entered();

    let mut first_panic: Option<Box<dyn std::any::Any + Send>> = None;
    for entry in deferred {
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(entry.notify));
        if let Err(payload) = result
            && first_panic.is_none()
        {
            first_panic = Some(payload);
        }
    }

    tracing::Span::current().record("duration_us", started.elapsed().as_micros() as u64);

    if let Some(payload) = first_panic {
        std::panic::resume_unwind(payload);
    }
}

/// RAII guard that begins a batch scope.
///
/// While a `BatchScope` is alive, all observable notifications are deferred.
/// When the outermost `BatchScope` drops, all deferred notifications fire.
pub struct BatchScope {
    /// Whether this scope is the outermost (responsible for flush).
    is_root: bool,
}

impl BatchScope {
    /// Begin a new batch scope, or nest inside the active one.
    #[must_use]
    pub fn new() -> Self {
        let is_root = BATCH_CTX.with(|ctx| {
            let mut guard = ctx.borrow_mut();
            match *guard {
                Some(ref mut batch) => {
                    batch.depth += 1;
                    false
                }
                None => {
                    *guard = Some(BatchContext {
                        depth: 1,
                        deferred: Vec::new(),
                        changes: 0,
                    });
                    true
                }
            }
        });
        Self { is_root }
    }

    /// Number of deferred notifications queued in the current batch.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        BATCH_CTX.with(|ctx| ctx.borrow().as_ref().map_or(0, |b| b.deferred.len()))
    }
}

impl Default for BatchScope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for BatchScope {
    fn drop(&mut self) {
        let finished = BATCH_CTX.with(|ctx| {
            let mut guard = ctx.borrow_mut();
            let batch = guard.as_mut()?;
            batch.depth -= 1;
            if batch.depth == 0 { guard.take() } else { None }
        });

        if let Some(batch) = finished {
            flush(batch);
        }
    }
}

impl std::fmt::Debug for BatchScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchScope")
            .field("is_root", &self.is_root)
            .field("pending", &self.pending_count())
            .finish()
    }
}

#![forbid(unsafe_code)]

//! dragdeck runtime: the reactive store behind the shared drag session.
//!
//! # Key Components
//!
//! - [`Observable`] - shared, version-tracked value with change notification
//! - [`WeakObservable`] - non-owning handle that components hold
//! - [`BatchScope`] - defer and coalesce notifications across many writes
//!
//! # Role in dragdeck
//! Host frameworks re-render when state they read changes. This crate gives
//! that contract an explicit shape: components subscribe to an observable
//! and are notified, in registration order, after every value-changing
//! write. Writes that touch several fields go through a single
//! [`Observable::update`], so no subscriber ever sees a half-written value.
//!
//! Everything is single-threaded (`Rc`/`RefCell`) and meant to live on the
//! UI thread next to the input and layout callbacks that drive it.

pub mod reactive;

pub use reactive::{BatchScope, Observable, Subscription, WeakObservable};

#![forbid(unsafe_code)]

//! Reactive primitives: observable values and batched notification.

pub mod batch;
pub mod observable;

pub use batch::BatchScope;
pub use observable::{Observable, Subscription, WeakObservable};

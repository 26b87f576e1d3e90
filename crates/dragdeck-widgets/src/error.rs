#![forbid(unsafe_code)]

//! Errors reported while assembling drag-and-drop widgets.

use thiserror::Error;

/// A widget builder was finished without everything it needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BuildError {
    /// `.content(..)` was never called.
    #[error("{widget} needs a content function before it can be built")]
    MissingContent { widget: &'static str },
}

#![forbid(unsafe_code)]

//! Optional haptic feedback capability.
//!
//! Drag sources may pulse the device when a drag starts. Haptics are always
//! best-effort: a host without a vibrator simply passes no [`Haptics`]
//! implementation, and a host whose platform lacks the one-shot API reports
//! `supports_one_shot() == false`. Neither case is an error for the drag.

use std::time::Duration;

use thiserror::Error;

/// Errors a haptics backend can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HapticsError {
    /// The platform lacks the API needed for a one-shot pulse.
    #[error("one-shot vibration is not supported on this platform")]
    Unsupported,
    /// The device refused or failed the request.
    #[error("vibration failed: {0}")]
    Device(String),
}

/// Host-provided vibration capability.
pub trait Haptics {
    /// Whether one-shot pulses are available on this platform version.
    fn supports_one_shot(&self) -> bool {
        true
    }

    /// Stop any vibration currently playing.
    fn cancel(&self) {}

    /// Play a single pulse of the given duration.
    fn vibrate(&self, duration: Duration) -> Result<(), HapticsError>;
}

/// Play a one-shot pulse, replacing whatever is currently playing.
///
/// Checks [`Haptics::supports_one_shot`] first so backends on older
/// platforms are never asked to do something they cannot.
pub fn pulse(haptics: &dyn Haptics, duration: Duration) -> Result<(), HapticsError> {
    if !haptics.supports_one_shot() {
        return Err(HapticsError::Unsupported);
    }
    haptics.cancel();
    haptics.vibrate(duration)
}

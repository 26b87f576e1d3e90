#![forbid(unsafe_code)]

//! Floating preview that follows the drag point.
//!
//! The overlay is positioned from the session's drag point and its own
//! measured size. Until the host reports a non-zero size the overlay is
//! fully transparent, so the first frame never flashes at the wrong offset.

use std::cell::Cell;

use dragdeck_core::geometry::{Point, Size};

/// Visual parameters of the ghost overlay.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GhostStyle {
    /// Uniform scale applied to the ghost (default: 1.3).
    pub scale: f32,
    /// Opacity once the ghost has been measured (default: 0.9).
    pub alpha: f32,
    /// The ghost is shifted up-left by `size / anchor_divisor` so the finger
    /// does not cover it (default: 3.0).
    pub anchor_divisor: f32,
}

impl Default for GhostStyle {
    fn default() -> Self {
        Self {
            scale: 1.3,
            alpha: 0.9,
            anchor_divisor: 3.0,
        }
    }
}

/// Paint parameters for one frame of the ghost.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GhostLayer {
    /// Window-absolute top-left of the ghost before scaling.
    pub translation: Point,
    pub scale: f32,
    pub alpha: f32,
    /// Always `false`: the ghost never intercepts pointer input.
    pub hit_testable: bool,
}

/// A rendered ghost: where to paint it and what.
#[derive(Debug, Clone, PartialEq)]
pub struct GhostFrame<V> {
    pub layer: GhostLayer,
    pub view: V,
}

/// Measured state of the overlay between frames.
#[derive(Debug, Default)]
pub(crate) struct GhostOverlay {
    measured: Cell<Size>,
}

impl GhostOverlay {
    pub(crate) fn measure(&self, size: Size) {
        self.measured.set(size);
    }

    pub(crate) fn measured(&self) -> Size {
        self.measured.get()
    }

    /// Forget the measured size so the next drag fades in again.
    pub(crate) fn reset(&self) {
        self.measured.set(Size::ZERO);
    }

    pub(crate) fn layer(&self, drag_point: Point, style: &GhostStyle) -> GhostLayer {
        let size = self.measured.get();
        let divisor = if style.anchor_divisor > 0.0 {
            style.anchor_divisor
        } else {
            1.0
        };
        let offset = Point::new(size.width / divisor, size.height / divisor);
        GhostLayer {
            translation: drag_point - offset,
            scale: style.scale,
            alpha: if size.is_empty() { 0.0 } else { style.alpha },
            hit_testable: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmeasured_ghost_is_transparent() {
        let overlay = GhostOverlay::default();
        let layer = overlay.layer(Point::new(90.0, 60.0), &GhostStyle::default());
        assert_eq!(layer.alpha, 0.0);
        assert_eq!(layer.translation, Point::new(90.0, 60.0));
        assert!(!layer.hit_testable);
    }

    #[test]
    fn measured_ghost_is_offset_by_a_third() {
        let overlay = GhostOverlay::default();
        overlay.measure(Size::new(60.0, 30.0));
        let layer = overlay.layer(Point::new(100.0, 100.0), &GhostStyle::default());
        assert_eq!(layer.translation, Point::new(80.0, 90.0));
        assert_eq!(layer.scale, 1.3);
        assert_eq!(layer.alpha, 0.9);
    }

    #[test]
    fn reset_fades_the_next_drag_in_again() {
        let overlay = GhostOverlay::default();
        overlay.measure(Size::new(60.0, 30.0));
        overlay.reset();
        assert_eq!(overlay.measured(), Size::ZERO);
        let layer = overlay.layer(Point::ZERO, &GhostStyle::default());
        assert_eq!(layer.alpha, 0.0);
    }

    #[test]
    fn non_positive_divisor_falls_back_to_full_size() {
        let overlay = GhostOverlay::default();
        overlay.measure(Size::new(10.0, 10.0));
        let style = GhostStyle {
            anchor_divisor: 0.0,
            ..GhostStyle::default()
        };
        let layer = overlay.layer(Point::new(10.0, 10.0), &style);
        assert_eq!(layer.translation, Point::ZERO);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn style_deserializes_with_defaults() {
        let style: GhostStyle = serde_json::from_str(r#"{"alpha":0.5}"#).expect("valid style");
        assert_eq!(style.alpha, 0.5);
        assert_eq!(style.scale, 1.3);
    }
}

use crate::foundation::core::Viewport;

/// Scroll progress of a sticky scroll container spanning `"start start"` to
/// `"end end"`: 0 when its top meets the viewport top, 1 when its bottom meets the
/// viewport bottom.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollTracker {
    /// Container height in viewport heights.
    pub length_vh: f64,
    /// Document offset of the container top, in logical pixels.
    pub container_top: f64,
}

impl ScrollTracker {
    pub fn new(length_vh: f64) -> Self {
        Self {
            length_vh,
            container_top: 0.0,
        }
    }

    pub fn container_height(&self, viewport: Viewport) -> f64 {
        viewport.height * self.length_vh / 100.0
    }

    /// Distance over which progress goes from 0 to 1.
    pub fn scroll_span(&self, viewport: Viewport) -> f64 {
        self.container_height(viewport) - viewport.height
    }

    pub fn progress(&self, scroll_y: f64, viewport: Viewport) -> f64 {
        let span = self.scroll_span(viewport);
        if !span.is_finite() || span <= 0.0 || !scroll_y.is_finite() {
            return 0.0;
        }
        ((scroll_y - self.container_top) / span).clamp(0.0, 1.0)
    }

    /// Scroll offset that yields `progress`; the inverse of [`ScrollTracker::progress`].
    pub fn scroll_y_for(&self, progress: f64, viewport: Viewport) -> f64 {
        let span = self.scroll_span(viewport).max(0.0);
        let p = if progress.is_finite() {
            progress.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.container_top + p * span
    }
}

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Browser window metrics reported by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Window inner width in CSS px.
    pub width: f32,
    /// Window inner height in CSS px.
    pub height: f32,
    /// Scrollable document height in CSS px (>= height).
    pub doc_height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32, doc_height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
            doc_height: doc_height.max(height),
        }
    }

    /// Largest valid window scroll offset.
    pub fn max_scroll(&self) -> f32 {
        (self.doc_height - self.height).max(0.0)
    }

    /// Scroll offset that centres a point at `fraction` of the document height,
    /// clamped to the scrollable range.
    pub fn scroll_to_fraction(&self, fraction: f32) -> f32 {
        let target = self.doc_height * fraction.clamp(0.0, 1.0) - self.height * 0.5;
        target.clamp(0.0, self.max_scroll())
    }

    /// Convert `vh` units to px.
    pub fn vh(&self, vh: f32) -> f32 {
        self.height * vh / 100.0
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 800.0, 800.0)
    }
}

/// A position expression: `x = vw% + dx px`, `y = vh% + dy px`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewportPos {
    #[serde(default)]
    pub vw: f32,
    #[serde(default)]
    pub dx: f32,
    #[serde(default)]
    pub vh: f32,
    #[serde(default)]
    pub dy: f32,
}

impl ViewportPos {
    /// Relative part only, e.g. `ViewportPos::vw_vh(30.0, 20.0)` for `30vw, 20vh`.
    pub fn vw_vh(vw: f32, vh: f32) -> Self {
        Self { vw, vh, ..Default::default() }
    }

    /// Absolute pixels, independent of window size.
    pub fn px(dx: f32, dy: f32) -> Self {
        Self { dx, dy, ..Default::default() }
    }

    /// Add a pixel offset.
    pub fn offset(mut self, dx: f32, dy: f32) -> Self {
        self.dx += dx;
        self.dy += dy;
        self
    }

    /// Evaluate against a viewport.
    pub fn resolve(&self, viewport: &Viewport) -> Vec2 {
        Vec2::new(
            viewport.width * self.vw / 100.0 + self.dx,
            viewport.height * self.vh / 100.0 + self.dy,
        )
    }
}

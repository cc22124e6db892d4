use super::easing::Easing;

/// An in-flight scroll from one document offset to another. The host applies
/// each offset with `window.scrollTo`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollAnim {
    pub from: f32,
    pub to: f32,
    /// Duration in seconds.
    pub duration: f32,
    pub elapsed: f32,
    pub easing: Easing,
}

impl ScrollAnim {
    pub fn new(from: f32, to: f32, duration: f32) -> Self {
        Self {
            from,
            to,
            duration,
            elapsed: 0.0,
            easing: Easing::QuadInOut,
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Advance the animation. Returns the offset to apply this step.
    pub fn tick(&mut self, dt: f32) -> f32 {
        self.elapsed = (self.elapsed + dt).min(self.duration.max(0.0));
        self.offset()
    }

    /// Current offset.
    pub fn offset(&self) -> f32 {
        if self.duration <= 0.0 {
            return self.to;
        }
        self.easing.interpolate(self.from, self.to, self.elapsed / self.duration)
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Turns variable frame times into whole fixed steps.
///
/// Timers, tweens and the typewriter reveal all advance in these steps, so a
/// slow frame batches callbacks instead of skipping them.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step: f32,
    backlog: f32,
    max_steps: u32,
}

impl FixedTimestep {
    /// Frames longer than this many steps (a tab coming back from the
    /// background) lose the excess.
    pub const DEFAULT_MAX_STEPS: u32 = 10;

    pub fn new(step: f32) -> Self {
        Self {
            step,
            backlog: 0.0,
            max_steps: Self::DEFAULT_MAX_STEPS,
        }
    }

    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps.max(1);
        self
    }

    /// Add one frame's time and return how many steps to run now.
    /// Negative and NaN frame times count as zero.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        if frame_dt > 0.0 {
            self.backlog = (self.backlog + frame_dt).min(self.step * self.max_steps as f32);
        }
        // Tolerance so 60 frames of 1/60 s are 60 steps, not 59.
        let steps = ((self.backlog / self.step) + 1e-4).floor() as u32;
        let steps = steps.min(self.max_steps);
        self.backlog = (self.backlog - steps as f32 * self.step).max(0.0);
        steps
    }

    pub fn step(&self) -> f32 {
        self.step
    }
}

/// One-shot timers counted down by the fixed timestep, standing in for
/// `setTimeout`. Payloads that may go stale carry the state they were
/// scheduled under so the receiver can compare when they fire.
#[derive(Debug, Clone)]
pub struct TimerQueue<T> {
    /// Seconds left per timer, in scheduling order.
    pending: Vec<(f32, T)>,
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self { pending: Vec::new() }
    }

    /// Fire `payload` after `delay` seconds. Negative delays fire on the next tick.
    pub fn schedule(&mut self, delay: f32, payload: T) {
        self.pending.push((delay.max(0.0), payload));
    }

    pub fn schedule_ms(&mut self, delay_ms: u32, payload: T) {
        self.schedule(delay_ms as f32 / 1000.0, payload);
    }

    /// Count every timer down by `dt` and return the ones that ran out,
    /// earliest deadline first. Ties keep scheduling order.
    pub fn tick(&mut self, dt: f32) -> Vec<T> {
        let mut due = Vec::new();
        let mut i = 0;
        while i < self.pending.len() {
            self.pending[i].0 -= dt;
            if self.pending[i].0 <= 0.0 {
                due.push(self.pending.remove(i));
            } else {
                i += 1;
            }
        }
        due.sort_by(|a, b| a.0.total_cmp(&b.0));
        due.into_iter().map(|(_, payload)| payload).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_after_delay() {
        let mut timers = TimerQueue::new();
        timers.schedule(0.5, "hide");
        assert!(timers.tick(0.25).is_empty());
        assert_eq!(timers.tick(0.25), vec!["hide"]);
        assert!(timers.is_empty());
    }

    #[test]
    fn fires_in_deadline_order() {
        let mut timers = TimerQueue::new();
        timers.schedule_ms(3000, 3);
        timers.schedule_ms(2000, 2);
        timers.schedule_ms(2000, 22);
        assert_eq!(timers.tick(5.0), vec![2, 22, 3]);
    }

    #[test]
    fn still_fires_after_a_week_open() {
        let mut timers = TimerQueue::new();
        timers.schedule(1.0, 0);
        timers.tick(600_000.0);

        timers.schedule_ms(5000, 1);
        let mut fired = Vec::new();
        for _ in 0..(6 * 60) {
            fired.extend(timers.tick(1.0 / 60.0));
        }
        assert_eq!(fired, vec![1]);
    }

    #[test]
    fn negative_delay_fires_next_tick() {
        let mut timers = TimerQueue::new();
        timers.schedule(-1.0, 'x');
        assert_eq!(timers.tick(0.0), vec!['x']);
    }

    #[test]
    fn clear_drops_everything() {
        let mut timers = TimerQueue::new();
        timers.schedule(1.0, ());
        timers.clear();
        assert!(timers.tick(2.0).is_empty());
    }
}

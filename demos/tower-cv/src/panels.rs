use keep_engine::SignalQueue;

use crate::content::{SayRequest, TourContent, PANEL_COUNT};
use crate::signals::Signal;

/// Which safes accept clicks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Only the safe matching the tour step.
    Step(u8),
    /// Tour disabled or finished: every safe is free.
    Open,
}

/// Result of a click on a safe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    Opened(u8),
    Closed(u8),
    Ignored,
}

/// The seven safes. Gating is pushed in with `set_step` and `unlock_all`;
/// the set never reads tour state.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelSet {
    open: [bool; PANEL_COUNT],
    gate: Gate,
    /// Safe whose detail view is showing.
    active: Option<u8>,
    /// What the dragon says when each safe closes.
    closing: Vec<SayRequest>,
}

impl PanelSet {
    pub fn from_content(content: &TourContent) -> Self {
        let gate = if content.config.enabled {
            Gate::Step(1)
        } else {
            Gate::Open
        };
        Self {
            open: [false; PANEL_COUNT],
            gate,
            active: None,
            closing: content.panels.iter().map(|p| p.closing.clone()).collect(),
        }
    }

    /// A safe is interactable when it is the active one, or when nothing is
    /// active and the gate lets it through.
    pub fn interactable(&self, panel: u8) -> bool {
        if !(1..=PANEL_COUNT as u8).contains(&panel) {
            return false;
        }
        match (self.active, self.gate) {
            (Some(active), _) => active == panel,
            (None, Gate::Open) => true,
            (None, Gate::Step(step)) => step == panel,
        }
    }

    /// Toggle a safe. Closing the active safe goes through `close_active`.
    pub fn click(&mut self, panel: u8, bus: &mut SignalQueue<Signal>) -> ClickOutcome {
        if !self.interactable(panel) {
            log::debug!("safe {} is inert", panel);
            return ClickOutcome::Ignored;
        }
        if self.active == Some(panel) {
            return match self.close_active(bus) {
                Some(n) => ClickOutcome::Closed(n),
                None => ClickOutcome::Ignored,
            };
        }
        self.open[panel as usize - 1] = true;
        self.active = Some(panel);
        ClickOutcome::Opened(panel)
    }

    /// Close the active detail view. While the tour gates on this safe, the
    /// dragon is asked to speak its closing line.
    pub fn close_active(&mut self, bus: &mut SignalQueue<Signal>) -> Option<u8> {
        let panel = self.active?;
        self.open[panel as usize - 1] = false;
        if self.gate == Gate::Step(panel) {
            if let Some(say) = self.closing.get(panel as usize - 1) {
                bus.publish(Signal::DragonSay(say.clone()));
            }
        }
        self.active = None;
        Some(panel)
    }

    /// Follow the tour step. Steps past the last safe leave every safe inert
    /// until `unlock_all`.
    pub fn set_step(&mut self, step: u8) {
        if let Gate::Step(current) = self.gate {
            if step > current {
                self.gate = Gate::Step(step);
            }
        }
    }

    pub fn unlock_all(&mut self) {
        self.gate = Gate::Open;
    }

    pub fn is_open(&self, panel: u8) -> bool {
        (panel as usize)
            .checked_sub(1)
            .and_then(|i| self.open.get(i))
            .copied()
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::FollowupAction;

    fn gated() -> PanelSet {
        PanelSet::from_content(&TourContent::builtin())
    }

    #[test]
    fn only_current_step_is_interactable() {
        let mut panels = gated();
        for step in 1..=7u8 {
            panels.set_step(step);
            for n in 1..=7u8 {
                assert_eq!(panels.interactable(n), n == step, "step {} panel {}", step, n);
            }
        }
        panels.unlock_all();
        assert!((1..=7).all(|n| panels.interactable(n)));
        assert!(!panels.interactable(0));
        assert!(!panels.interactable(8));
    }

    #[test]
    fn inert_click_changes_nothing() {
        let mut panels = gated();
        let mut bus = SignalQueue::new();
        let before = panels.clone();
        assert_eq!(panels.click(3, &mut bus), ClickOutcome::Ignored);
        assert_eq!(panels, before);
        assert!(bus.is_empty());
    }

    #[test]
    fn closing_current_safe_asks_dragon_to_speak() {
        let mut panels = gated();
        let mut bus = SignalQueue::new();
        assert_eq!(panels.click(1, &mut bus), ClickOutcome::Opened(1));
        assert!(panels.is_open(1));
        assert!(bus.is_empty());

        assert_eq!(panels.click(1, &mut bus), ClickOutcome::Closed(1));
        assert!(!panels.is_open(1));
        assert_eq!(panels.active, None);

        let signals = bus.drain();
        assert_eq!(signals.len(), 1);
        match &signals[0] {
            Signal::DragonSay(say) => {
                assert!(say.text.starts_with("Notice the depth"));
                assert_eq!(say.next_action, Some(FollowupAction::MoveToSafe(2)));
            }
            other => panic!("unexpected {:?}", other),
        }
        // Gate moves only when the tour routes the say back.
        assert!(!panels.interactable(2));
        panels.set_step(2);
        assert!(panels.interactable(2));
    }

    #[test]
    fn active_safe_blocks_the_rest() {
        let mut panels = gated();
        let mut bus = SignalQueue::new();
        panels.unlock_all();
        panels.click(4, &mut bus);
        assert!(panels.interactable(4));
        assert!(!panels.interactable(5));
        assert_eq!(panels.click(5, &mut bus), ClickOutcome::Ignored);
    }

    #[test]
    fn disabled_tour_round_trip_restores_state() {
        let mut content = TourContent::builtin();
        content.config.enabled = false;
        let mut panels = PanelSet::from_content(&content);
        let mut bus = SignalQueue::new();
        let before = panels.clone();

        assert_eq!(panels.click(5, &mut bus), ClickOutcome::Opened(5));
        assert_eq!(panels.close_active(&mut bus), Some(5));
        assert_eq!(panels, before);
        assert!(bus.is_empty());
    }

    #[test]
    fn step_never_regresses() {
        let mut panels = gated();
        panels.set_step(4);
        panels.set_step(2);
        assert_eq!(panels.gate, Gate::Step(4));
    }
}

use std::collections::BTreeMap;

use crate::content::{SayRequest, Tooltip};

/// Every cross-component notification. Producers publish into a
/// `SignalQueue<Signal>`; the game routes them after each update.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    ShowTooltip(Tooltip),
    HideTooltip(Tooltip),
    /// Published exactly once, when the farewell finishes.
    TourCompleted,
    /// A panel closed and the dragon should speak.
    DragonSay(SayRequest),
}

impl Signal {
    /// Event name as the page knows it.
    pub fn name(&self) -> String {
        match self {
            Signal::ShowTooltip(t) => format!("show-{}-tooltip", t.stem()),
            Signal::HideTooltip(t) => format!("hide-{}-tooltip", t.stem()),
            Signal::TourCompleted => "tour-completed".to_string(),
            Signal::DragonSay(_) => "dragon-say".to_string(),
        }
    }
}

/// Visibility of every tooltip.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TooltipBoard {
    visible: BTreeMap<Tooltip, bool>,
}

impl TooltipBoard {
    pub fn new() -> Self {
        Self {
            visible: Tooltip::all().map(|t| (t, false)).collect(),
        }
    }

    /// Apply a tooltip signal. Returns true if visibility changed; showing a
    /// shown tooltip or hiding a hidden one is a no-op.
    pub fn apply(&mut self, signal: &Signal) -> bool {
        let (tooltip, show) = match signal {
            Signal::ShowTooltip(t) => (*t, true),
            Signal::HideTooltip(t) => (*t, false),
            _ => return false,
        };
        let slot = self.visible.entry(tooltip).or_insert(false);
        if *slot == show {
            return false;
        }
        *slot = show;
        true
    }

    #[cfg(test)]
    pub fn is_visible(&self, tooltip: Tooltip) -> bool {
        self.visible.get(&tooltip).copied().unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Tooltip, bool)> + '_ {
        self.visible.iter().map(|(t, v)| (*t, *v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_match_page_events() {
        assert_eq!(Signal::ShowTooltip(Tooltip::Safe(1)).name(), "show-safe-tooltip");
        assert_eq!(Signal::HideTooltip(Tooltip::Safe(3)).name(), "hide-safe-3-tooltip");
        assert_eq!(Signal::ShowTooltip(Tooltip::Cv).name(), "show-cv-tooltip");
        assert_eq!(Signal::TourCompleted.name(), "tour-completed");
    }

    #[test]
    fn hiding_hidden_tooltip_is_noop() {
        let mut board = TooltipBoard::new();
        let before = board.clone();
        assert!(!board.apply(&Signal::HideTooltip(Tooltip::Safe(3))));
        assert_eq!(board, before);
    }

    #[test]
    fn show_then_hide() {
        let mut board = TooltipBoard::new();
        assert!(board.apply(&Signal::ShowTooltip(Tooltip::Contact)));
        assert!(!board.apply(&Signal::ShowTooltip(Tooltip::Contact)));
        assert!(board.is_visible(Tooltip::Contact));
        assert!(board.apply(&Signal::HideTooltip(Tooltip::Contact)));
        assert!(!board.is_visible(Tooltip::Contact));
        assert!(!board.apply(&Signal::TourCompleted));
    }
}

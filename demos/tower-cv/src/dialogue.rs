/// Notifications raised while presenting a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenterEvent {
    TypingStarted,
    TypingComplete,
    /// The line is fully shown; the tour may schedule its advance.
    Complete,
}

#[derive(Debug, Clone)]
pub struct DialoguePresenter {
    text: String,
    total_chars: usize,
    revealed: usize,
    visible: bool,
    typing: bool,
    /// Seconds per revealed character.
    interval: f32,
    elapsed: f32,
    pub scale: f32,
    pending: Vec<PresenterEvent>,
}

impl DialoguePresenter {
    pub fn new(interval_ms: u32) -> Self {
        Self {
            text: String::new(),
            total_chars: 0,
            revealed: 0,
            visible: false,
            typing: false,
            interval: interval_ms as f32 / 1000.0,
            elapsed: 0.0,
            scale: 1.0,
            pending: Vec::new(),
        }
    }

    /// Replace whatever is showing and restart the reveal from zero.
    pub fn show(&mut self, text: &str) {
        self.text = text.to_string();
        self.total_chars = text.chars().count();
        self.revealed = 0;
        self.elapsed = 0.0;
        self.visible = true;
        self.typing = true;
        self.pending.clear();
        self.pending.push(PresenterEvent::TypingStarted);
    }

    /// Hide the bubble immediately. Pending notifications are dropped.
    pub fn hide(&mut self) {
        self.text.clear();
        self.total_chars = 0;
        self.revealed = 0;
        self.elapsed = 0.0;
        self.visible = false;
        self.typing = false;
        self.pending.clear();
    }

    /// Advance the reveal. Completion is reported once per `show`.
    pub fn tick(&mut self, dt: f32) -> Vec<PresenterEvent> {
        if self.typing {
            self.elapsed += dt;
            while self.revealed < self.total_chars && self.elapsed >= self.interval {
                self.elapsed -= self.interval;
                self.revealed += 1;
            }
            if self.revealed >= self.total_chars {
                self.typing = false;
                self.pending.push(PresenterEvent::TypingComplete);
                self.pending.push(PresenterEvent::Complete);
            }
        }
        std::mem::take(&mut self.pending)
    }

    /// The visible prefix of the current line.
    pub fn revealed_text(&self) -> &str {
        match self.text.char_indices().nth(self.revealed) {
            Some((byte, _)) => &self.text[..byte],
            None => &self.text,
        }
    }

    pub fn full_text(&self) -> &str {
        &self.text
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_typing(&self) -> bool {
        self.typing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reveals_one_char_per_interval() {
        let mut p = DialoguePresenter::new(50);
        p.show("Hi!");
        assert_eq!(p.tick(0.0), vec![PresenterEvent::TypingStarted]);
        assert_eq!(p.revealed_text(), "");

        assert!(p.tick(0.06).is_empty());
        assert_eq!(p.revealed_text(), "H");

        let done = p.tick(0.2);
        assert_eq!(done, vec![PresenterEvent::TypingComplete, PresenterEvent::Complete]);
        assert_eq!(p.revealed_text(), "Hi!");
        assert!(!p.is_typing());
        assert!(p.is_visible());

        assert!(p.tick(1.0).is_empty());
    }

    #[test]
    fn multibyte_prefix_is_char_aligned() {
        let mut p = DialoguePresenter::new(10);
        p.show("héllo");
        p.tick(0.025);
        assert_eq!(p.revealed_text(), "hé");
    }

    #[test]
    fn empty_line_completes_on_next_tick() {
        let mut p = DialoguePresenter::new(50);
        p.show("");
        let events = p.tick(0.0);
        assert_eq!(
            events,
            vec![
                PresenterEvent::TypingStarted,
                PresenterEvent::TypingComplete,
                PresenterEvent::Complete
            ]
        );
    }

    #[test]
    fn show_restarts_and_hide_drops_pending() {
        let mut p = DialoguePresenter::new(50);
        p.show("first line");
        p.tick(0.2);
        p.show("second");
        assert_eq!(p.revealed_text(), "");
        assert_eq!(p.full_text(), "second");

        p.hide();
        assert!(!p.is_visible());
        assert!(p.tick(1.0).is_empty());
    }
}

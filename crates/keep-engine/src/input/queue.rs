/// Something the host page forwarded to the game.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Click or tap at viewport coordinates.
    PointerDown { x: f32, y: f32 },
    KeyDown { key_code: u32 },
    /// Page-level event such as a resize, a safe click or a modal close.
    /// `kind` is game-defined.
    Custom { kind: u32, a: f32, b: f32, c: f32 },
}

impl InputEvent {
    /// Raw pointer or keyboard press, as opposed to a page event.
    pub fn is_press(&self) -> bool {
        matches!(self, InputEvent::PointerDown { .. } | InputEvent::KeyDown { .. })
    }
}

/// Events gathered between frames, drained once per frame.
#[derive(Debug, Default)]
pub struct InputQueue(Vec<InputEvent>);

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InputEvent) {
        self.0.push(event);
    }

    /// Take everything queued so far.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.0.iter()
    }

    /// Whether any queued event is a pointer or key press.
    pub fn has_press(&self) -> bool {
        self.0.iter().any(InputEvent::is_press)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl Extend<InputEvent> for InputQueue {
    fn extend<I: IntoIterator<Item = InputEvent>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl FromIterator<InputEvent> for InputQueue {
    fn from_iter<I: IntoIterator<Item = InputEvent>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

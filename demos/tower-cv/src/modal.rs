use crate::content::PanelContent;

/// Full-screen detail view of one safe. Shows whatever it is given.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailModal {
    open: Option<(u8, PanelContent)>,
}

impl DetailModal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, panel: u8, content: PanelContent) {
        self.open = Some((panel, content));
    }

    /// Close and return the panel that was showing.
    pub fn close(&mut self) -> Option<u8> {
        self.open.take().map(|(n, _)| n)
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn panel(&self) -> Option<u8> {
        self.open.as_ref().map(|(n, _)| *n)
    }

    pub fn content(&self) -> Option<&PanelContent> {
        self.open.as_ref().map(|(_, c)| c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_close() {
        let mut modal = DetailModal::new();
        assert_eq!(modal.close(), None);
        modal.open(4, PanelContent { title: "Skills".into(), ..Default::default() });
        assert_eq!(modal.panel(), Some(4));
        assert_eq!(modal.content().map(|c| c.title.as_str()), Some("Skills"));
        assert_eq!(modal.close(), Some(4));
        assert!(!modal.is_open());
    }
}

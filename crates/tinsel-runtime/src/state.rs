//! Scene state machines: the one-way lighting mode and the wish prompt.

/// Whether the scene has been lit yet. Only ever moves Unlit -> Lit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SceneMode {
    #[default]
    Unlit,
    Lit,
}

impl SceneMode {
    /// Switch to Lit. Returns true only on the transition itself.
    pub fn illuminate(&mut self) -> bool {
        match self {
            SceneMode::Unlit => {
                *self = SceneMode::Lit;
                true
            }
            SceneMode::Lit => false,
        }
    }

    pub fn is_lit(&self) -> bool {
        matches!(self, SceneMode::Lit)
    }
}

/// Wish entry modal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WishModal {
    #[default]
    Closed,
    Open,
}

/// Modal state plus the text typed so far
#[derive(Debug, Clone, Default)]
pub struct WishPrompt {
    modal: WishModal,
    draft: String,
}

impl WishPrompt {
    /// Longest draft accepted, in characters
    pub const MAX_LEN: usize = 48;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn modal(&self) -> WishModal {
        self.modal
    }

    pub fn is_open(&self) -> bool {
        self.modal == WishModal::Open
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Star click: open when closed, close when open
    pub fn toggle(&mut self) {
        self.modal = match self.modal {
            WishModal::Closed => WishModal::Open,
            WishModal::Open => WishModal::Closed,
        };
    }

    pub fn close(&mut self) {
        self.modal = WishModal::Closed;
    }

    /// Append a typed character. Ignored while closed, for control characters,
    /// and once the draft is full.
    pub fn push_char(&mut self, c: char) {
        if !self.is_open() || c.is_control() || self.draft.chars().count() >= Self::MAX_LEN {
            return;
        }
        self.draft.push(c);
    }

    pub fn backspace(&mut self) {
        if self.is_open() {
            self.draft.pop();
        }
    }

    /// Close the modal and hand back the draft, leaving it empty
    pub fn submit(&mut self) -> String {
        self.close();
        std::mem::take(&mut self.draft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn illuminate_is_one_way() {
        let mut mode = SceneMode::default();
        assert!(!mode.is_lit());
        assert!(mode.illuminate());
        assert!(mode.is_lit());
        assert!(!mode.illuminate());
        assert_eq!(mode, SceneMode::Lit);
    }

    #[test]
    fn toggle_opens_and_closes() {
        let mut prompt = WishPrompt::new();
        assert_eq!(prompt.modal(), WishModal::Closed);
        prompt.toggle();
        assert!(prompt.is_open());
        prompt.toggle();
        assert!(!prompt.is_open());
    }

    #[test]
    fn typing_requires_open_modal() {
        let mut prompt = WishPrompt::new();
        prompt.push_char('a');
        assert_eq!(prompt.draft(), "");

        prompt.toggle();
        for c in "joy!".chars() {
            prompt.push_char(c);
        }
        prompt.push_char('\u{8}');
        prompt.backspace();
        assert_eq!(prompt.draft(), "joy");
    }

    #[test]
    fn submit_closes_and_clears() {
        let mut prompt = WishPrompt::new();
        prompt.toggle();
        prompt.push_char('x');
        assert_eq!(prompt.submit(), "x");
        assert!(!prompt.is_open());
        assert_eq!(prompt.draft(), "");
    }

    #[test]
    fn draft_is_capped() {
        let mut prompt = WishPrompt::new();
        prompt.toggle();
        for _ in 0..100 {
            prompt.push_char('w');
        }
        assert_eq!(prompt.draft().len(), WishPrompt::MAX_LEN);
    }

    #[test]
    fn close_keeps_draft() {
        let mut prompt = WishPrompt::new();
        prompt.toggle();
        prompt.push_char('h');
        prompt.close();
        prompt.toggle();
        assert_eq!(prompt.draft(), "h");
    }
}

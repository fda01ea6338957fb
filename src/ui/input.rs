//! Single-line input box

/// One line of uncommitted text
///
/// # Examples
///
/// ```
/// use nova_scribe::ui::InputBox;
///
/// let mut input = InputBox::new();
/// input.set_text("  Hello  ");
/// assert_eq!(input.submit().as_deref(), Some("Hello"));
/// assert_eq!(input.text(), "");
///
/// input.set_text("   ");
/// assert_eq!(input.submit(), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InputBox {
    text: String,
    disabled: bool,
}

impl InputBox {
    /// Create an empty, enabled input box
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the uncommitted text
    pub fn set_text(&mut self, text: &str) {
        self.text.clear();
        self.text.push_str(text);
    }

    /// Uncommitted text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Enable or disable submission
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// True while submissions are rejected
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Commit the text
    ///
    /// Returns the trimmed text and clears the box. Returns None, leaving
    /// the box untouched, when the trimmed text is empty or the box is
    /// disabled.
    pub fn submit(&mut self) -> Option<String> {
        if self.disabled {
            return None;
        }

        let trimmed = self.text.trim();
        if trimmed.is_empty() {
            return None;
        }

        let value = trimmed.to_string();
        self.text.clear();
        Some(value)
    }
}

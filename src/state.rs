//! Prompt text and caret.
//!
//! The caret locus counts grapheme clusters, not bytes or chars, so an emoji
//! or a letter with combining marks is stepped over as one unit.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::key::is_ascii_control;
use crate::types::InsertMode;

/// Editable text plus caret, the state every action works on.
///
/// Serializable so a host can persist it between prompt sessions, and
/// cloneable so actions can show a temporary marker and put things back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptState {
    text: String,
    caret_locus: usize,
    #[serde(default)]
    insert_mode: InsertMode,
}

impl PromptState {
    pub fn new() -> Self {
        Self::default()
    }

    /// State holding `text` with the caret at `locus` (clamped).
    pub fn from_parts(text: impl Into<String>, locus: usize) -> Self {
        let mut state = Self {
            text: text.into(),
            ..Self::default()
        };
        state.set_locus(locus);
        state
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text and move the caret to its tail.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.caret_locus = self.tail();
    }

    pub fn insert_mode(&self) -> InsertMode {
        self.insert_mode
    }

    pub fn set_insert_mode(&mut self, mode: InsertMode) {
        self.insert_mode = mode;
    }

    // Caret ----------------------------------------------------------------

    pub fn locus(&self) -> usize {
        self.caret_locus.min(self.tail())
    }

    /// Move the caret, clamping to `[head, tail]`.
    pub fn set_locus(&mut self, locus: usize) {
        self.caret_locus = locus.min(self.tail());
    }

    pub fn head(&self) -> usize {
        0
    }

    /// Index of the first non-whitespace grapheme.
    pub fn lead(&self) -> usize {
        self.text
            .graphemes(true)
            .take_while(|g| g.chars().all(char::is_whitespace))
            .count()
    }

    pub fn tail(&self) -> usize {
        self.text.graphemes(true).count()
    }

    /// Text before the caret.
    pub fn backward_text(&self) -> &str {
        &self.text[..self.offset(self.locus())]
    }

    /// The grapheme under the caret, empty at the tail.
    pub fn selected_text(&self) -> &str {
        let locus = self.locus();
        &self.text[self.offset(locus)..self.offset(locus + 1)]
    }

    /// Text after the grapheme under the caret.
    pub fn forward_text(&self) -> &str {
        &self.text[self.offset(self.locus() + 1)..]
    }

    /// `(backward, selected, forward)`, which is what a redraw paints.
    pub fn segments(&self) -> (&str, &str, &str) {
        (
            self.backward_text(),
            self.selected_text(),
            self.forward_text(),
        )
    }

    // Editing --------------------------------------------------------------

    /// Insert `text` at the caret and move the caret past it.
    pub fn insert_text(&mut self, text: &str) {
        let locus = self.locus();
        let at = self.offset(locus);
        self.text.insert_str(at, text);
        self.set_locus(locus + text.graphemes(true).count());
    }

    /// Overwrite graphemes from the caret on with `text`.
    pub fn replace_text(&mut self, text: &str) {
        let count = text.graphemes(true).count();
        let locus = self.locus();
        let start = self.offset(locus);
        let end = self.offset(locus + count);
        self.text.replace_range(start..end, text);
        self.set_locus(locus + count);
    }

    /// Insert or replace depending on the insert mode.
    pub fn update_text(&mut self, text: &str) {
        match self.insert_mode {
            InsertMode::Insert => self.insert_text(text),
            InsertMode::Replace => self.replace_text(text),
        }
    }

    /// Delete up to `count` graphemes before the caret.
    pub fn delete_before_caret(&mut self, count: usize) {
        let locus = self.locus();
        let from = locus.saturating_sub(count);
        let range = self.offset(from)..self.offset(locus);
        self.text.replace_range(range, "");
        self.set_locus(from);
    }

    /// Delete the grapheme under the caret.
    pub fn delete_under_caret(&mut self) {
        let locus = self.locus();
        let range = self.offset(locus)..self.offset(locus + 1);
        self.text.replace_range(range, "");
        self.set_locus(locus);
    }

    /// Drop everything from the caret on.
    pub fn delete_after_caret(&mut self) {
        let at = self.offset(self.locus());
        self.text.truncate(at);
        self.caret_locus = self.tail();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.caret_locus = 0;
    }

    /// A copy to [`restore`](Self::restore) later.
    pub fn store(&self) -> PromptState {
        self.clone()
    }

    pub fn restore(&mut self, state: PromptState) {
        *self = state;
    }

    // byte offset of grapheme `locus`, or the text length past the tail
    fn offset(&self, locus: usize) -> usize {
        self.text
            .grapheme_indices(true)
            .nth(locus)
            .map_or(self.text.len(), |(i, _)| i)
    }
}

/// Render control characters as `^X` so they can be echoed.
pub fn printable(text: &str) -> Cow<'_, str> {
    if !text.chars().any(is_ascii_control) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '\x7f' => out.push_str("^?"),
            c if is_ascii_control(c) => {
                out.push('^');
                out.push(char::from(c as u8 + 0x40));
            }
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

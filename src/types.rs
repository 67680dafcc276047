use serde::{Deserialize, Serialize};

/// How typed text lands in the prompt.
///
/// Toggled by `<Insert>` through the `prompt:toggle_insert_mode` action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InsertMode {
    /// Text is inserted before the caret, pushing the rest to the right.
    #[default]
    Insert,
    /// Text overwrites the graphemes at and after the caret.
    Replace,
}

impl InsertMode {
    pub fn toggled(self) -> Self {
        match self {
            InsertMode::Insert => InsertMode::Replace,
            InsertMode::Replace => InsertMode::Insert,
        }
    }
}

/// The result of handling one harvested keystroke.
///
/// Actions return one of these, and the prompt loop keeps running for as
/// long as it sees [`Outcome::Continue`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Keep reading keys.
    #[default]
    Continue,
    /// The user accepted the text.
    Accept,
    /// The user cancelled, either through an action or an interrupt.
    Cancel,
    /// Something failed; the error has been reported to the host.
    Error,
}

impl Outcome {
    pub fn is_done(self) -> bool {
        self != Outcome::Continue
    }
}

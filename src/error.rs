//! Error types for the prompt and its keymap engine.

use crate::keystroke::Keystroke;

/// Malformed keystroke or mapping notation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// A flags string contained something other than `noremap`/`nowait`.
    #[error("unknown mapping flag {0:?}, expected \"noremap\" or \"nowait\"")]
    UnknownFlag(String),
    /// The left hand side of a mapping parsed to no keys.
    #[error("mapping has an empty left hand side")]
    EmptyLhs,
    /// The right hand side of a mapping parsed to no keys.
    #[error("mapping has an empty right hand side")]
    EmptyRhs,
    /// A rule was given with the wrong number of elements.
    #[error("a mapping rule takes 2 or 3 elements, got {0}")]
    RuleArity(usize),
}

/// Registry lookups that found nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeymapError {
    #[error("no mapping is registered for {0}")]
    NotFound(Keystroke),
}

/// Failures raised while reading raw keys from the host.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    /// The user hit the interrupt key (or the host signalled a cancel).
    #[error("interrupted")]
    Interrupted,
    /// The host transport failed.
    #[error("host input failed: {0}")]
    HostIo(#[from] std::io::Error),
    /// Too many keys were pushed back without being read again.
    #[error("pushback buffer is full ({capacity} keys)")]
    PushbackFull { capacity: usize },
}

impl InputError {
    pub fn is_interrupted(&self) -> bool {
        matches!(self, InputError::Interrupted)
    }
}

/// Crate level error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Keymap(#[from] KeymapError),
    #[error(transparent)]
    Input(#[from] InputError),
    #[error("no action {0:?} has been registered")]
    UnknownAction(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

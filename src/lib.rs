//! Vim-style key mapping and a single line prompt built on it.

pub mod action;
pub mod config;
pub mod digraph;
pub mod engine;
pub mod error;
pub mod history;
pub mod input;
pub mod key;
pub mod keymap;
pub mod keystroke;
pub mod registers;
pub mod state;
pub mod traits;
pub mod types;

pub use crate::action::{ActionContext, ActionFn, ActionRegistry};
pub use crate::config::PromptConfig;
pub use crate::digraph::Digraphs;
pub use crate::engine::{Prompt, PromptBuilder};
pub use crate::error::{Error, InputError, KeymapError, ParseError, Result};
pub use crate::history::History;
pub use crate::input::{ChannelSource, KeySource, Pushback, RawInput};
pub use crate::key::{Key, KeyCode, KeyEvent, Modifiers, PseudoKey};
pub use crate::keymap::{DEFAULT_KEYMAP_RULES, Definition, Keymap, MapFlags, Rule};
pub use crate::keystroke::Keystroke;
#[cfg(feature = "clipboard")]
pub use crate::registers::SystemRegisters;
pub use crate::registers::MemoryRegisters;
pub use crate::state::PromptState;
pub use crate::traits::{Host, Registers};
pub use crate::types::{InsertMode, Outcome};

use std::collections::HashMap;

use crate::traits::Registers;

/// Registers kept in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryRegisters {
    registers: HashMap<char, String>,
}

impl MemoryRegisters {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Registers for MemoryRegisters {
    fn get(&mut self, name: char) -> Option<String> {
        self.registers.get(&name).cloned()
    }

    fn set(&mut self, name: char, text: String) {
        self.registers.insert(name, text);
    }
}

/// Registers where `+` and `*` go to the system clipboard.
///
/// Falls back to memory for those two when no clipboard is available.
#[cfg(feature = "clipboard")]
pub struct SystemRegisters {
    clipboard: Option<arboard::Clipboard>,
    memory: MemoryRegisters,
}

#[cfg(feature = "clipboard")]
impl SystemRegisters {
    pub fn new() -> Self {
        let clipboard = match arboard::Clipboard::new() {
            Ok(clipboard) => Some(clipboard),
            Err(err) => {
                tracing::warn!(target: "vim_prompt::registers", %err, "system clipboard unavailable");
                None
            }
        };
        Self {
            clipboard,
            memory: MemoryRegisters::new(),
        }
    }
}

#[cfg(feature = "clipboard")]
impl Default for SystemRegisters {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "clipboard")]
impl Registers for SystemRegisters {
    fn get(&mut self, name: char) -> Option<String> {
        if matches!(name, '+' | '*')
            && let Some(clipboard) = self.clipboard.as_mut()
        {
            return clipboard.get_text().ok();
        }
        self.memory.get(name)
    }

    fn set(&mut self, name: char, text: String) {
        if matches!(name, '+' | '*')
            && let Some(clipboard) = self.clipboard.as_mut()
        {
            if let Err(err) = clipboard.set_text(text) {
                tracing::warn!(target: "vim_prompt::registers", %err, "clipboard write failed");
            }
            return;
        }
        self.memory.set(name, text);
    }
}

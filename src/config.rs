use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::keymap::Rule;

/// Prompt settings a host loads from wherever it keeps them.
///
/// Every field has a default, so a partial document deserializes:
///
/// ```
/// use vim_prompt::PromptConfig;
///
/// let config: PromptConfig = serde_json::from_str(r#"{"timeoutlen": 500}"#).unwrap();
/// assert!(config.timeout);
/// assert_eq!(config.timeoutlen, 500);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    /// Text painted in front of the input.
    pub prefix: String,
    /// Whether ambiguous mappings time out at all.
    pub timeout: bool,
    /// How long to wait for the next key of an ambiguous mapping, in ms.
    /// Zero disables the timeout like `timeout: false` does.
    pub timeoutlen: u64,
    /// Extra mappings, applied over the defaults in order.
    pub mappings: Vec<Rule>,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            timeout: true,
            timeoutlen: 1000,
            mappings: Vec::new(),
        }
    }
}

impl PromptConfig {
    /// The harvest timeout, `None` when timing out is disabled or
    /// `timeoutlen` is zero.
    pub fn timeout_duration(&self) -> Option<Duration> {
        (self.timeout && self.timeoutlen > 0).then(|| Duration::from_millis(self.timeoutlen))
    }
}

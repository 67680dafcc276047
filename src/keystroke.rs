use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::key::{Key, PseudoKey};

/// An immutable sequence of keys.
///
/// Keystrokes are what mappings are written in and what the keymap harvests.
/// Two keystrokes are equal iff their keys are equal, and they order
/// lexicographically by the canonical notation of each key.
///
/// ```
/// use vim_prompt::Keystroke;
///
/// let ks = Keystroke::parse("<C-X><C-F>");
/// assert_eq!(ks.len(), 2);
/// assert!(ks.starts_with(&Keystroke::parse("<C-X>")));
/// assert_eq!(ks.to_string(), "<C-X><C-F>");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Keystroke {
    keys: Arc<[Key]>,
}

impl Keystroke {
    /// Parse key notation.
    ///
    /// Parsing is total: `<...>` content that is not a known key name, a
    /// modified key or a pseudo-key is read as the literal characters it is
    /// made of.
    pub fn parse(text: &str) -> Self {
        let mut keys = Vec::new();
        let mut i = 0;
        while let Some(c) = text[i..].chars().next() {
            if c == '<'
                && let Some((key, end)) = Key::parse_bracket_at(text, i)
            {
                keys.push(key);
                i = end;
                continue;
            }
            keys.push(Key::char(c));
            i += c.len_utf8();
        }
        Self { keys: keys.into() }
    }

    pub fn from_keys(keys: impl IntoIterator<Item = Key>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
        }
    }

    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// True iff `prefix` is a (non-strict) prefix of this keystroke.
    pub fn starts_with(&self, prefix: &Keystroke) -> bool {
        self.keys.starts_with(&prefix.keys)
    }

    pub fn concat(&self, other: &Keystroke) -> Keystroke {
        Self::from_keys(self.keys.iter().chain(other.keys.iter()).cloned())
    }

    /// This keystroke with one more key appended.
    pub fn with(&self, key: Key) -> Keystroke {
        Self::from_keys(self.keys.iter().cloned().chain(std::iter::once(key)))
    }

    /// The first `len` keys.
    pub fn prefix(&self, len: usize) -> Keystroke {
        Self::from_keys(self.keys.iter().take(len).cloned())
    }

    /// The pseudo-key, if this keystroke is exactly one.
    pub fn as_pseudo(&self) -> Option<&PseudoKey> {
        match &*self.keys {
            [key] => key.as_pseudo(),
            _ => None,
        }
    }

    /// The text these keys insert into a prompt, see [`Key::insertable`].
    pub fn insertable(&self) -> String {
        self.keys.iter().map(Key::insertable).collect()
    }

    /// Canonical notation; `Keystroke::parse(&ks.to_text()) == ks`.
    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Keystroke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.keys.iter().try_for_each(|key| key.fmt(f))
    }
}

impl FromStr for Keystroke {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<Key> for Keystroke {
    fn from(key: Key) -> Self {
        Self::from_keys([key])
    }
}

impl From<&str> for Keystroke {
    fn from(text: &str) -> Self {
        Self::parse(text)
    }
}

impl FromIterator<Key> for Keystroke {
    fn from_iter<I: IntoIterator<Item = Key>>(iter: I) -> Self {
        Self::from_keys(iter)
    }
}

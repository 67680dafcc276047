//! Key mappings and the harvest algorithm.
//!
//! A [`Keymap`] holds at most one [`Definition`] per left hand side. Raw keys
//! are collected by [`Keymap::harvest`] until exactly one resolved keystroke
//! can be handed to the prompt, waiting up to a timeout when a typed prefix
//! is ambiguous.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::error::{InputError, KeymapError, ParseError};
use crate::input::KeySource;
use crate::keystroke::Keystroke;

bitflags::bitflags! {
    /// Mapping flags, written as `"noremap"`, `"nowait"` or both.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
    pub struct MapFlags: u8 {
        /// The right hand side is not itself subject to mapping.
        const NOREMAP = 0b01;
        /// Resolve as soon as this mapping matches exactly, even when longer
        /// mappings share the prefix.
        const NOWAIT  = 0b10;
    }
}

impl MapFlags {
    /// Parse a whitespace separated subset of `noremap` and `nowait`.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        text.split_whitespace()
            .try_fold(MapFlags::empty(), |flags, word| match word {
                "noremap" => Ok(flags | MapFlags::NOREMAP),
                "nowait" => Ok(flags | MapFlags::NOWAIT),
                other => Err(ParseError::UnknownFlag(other.to_owned())),
            })
    }
}

/// A mapping rule as the host supplies it, before parsing.
///
/// Deserializes from either `{"lhs": .., "rhs": .., "flags": ..}` or the
/// array form `["<C-H>", "<BS>", "noremap"]` with the flags optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub lhs: String,
    pub rhs: String,
    #[serde(default)]
    pub flags: String,
}

impl Rule {
    pub fn new(lhs: impl Into<String>, rhs: impl Into<String>, flags: impl Into<String>) -> Self {
        Self {
            lhs: lhs.into(),
            rhs: rhs.into(),
            flags: flags.into(),
        }
    }
}

impl From<(&str, &str)> for Rule {
    fn from((lhs, rhs): (&str, &str)) -> Self {
        Rule::new(lhs, rhs, "")
    }
}

impl From<(&str, &str, &str)> for Rule {
    fn from((lhs, rhs, flags): (&str, &str, &str)) -> Self {
        Rule::new(lhs, rhs, flags)
    }
}

impl TryFrom<&[&str]> for Rule {
    type Error = ParseError;

    fn try_from(parts: &[&str]) -> Result<Self, Self::Error> {
        match *parts {
            [lhs, rhs] => Ok(Rule::new(lhs, rhs, "")),
            [lhs, rhs, flags] => Ok(Rule::new(lhs, rhs, flags)),
            _ => Err(ParseError::RuleArity(parts.len())),
        }
    }
}

/// An immutable `lhs -> rhs` binding.
///
/// Ordering is by `lhs`, then `rhs`, then flags.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Definition {
    lhs: Keystroke,
    rhs: Keystroke,
    flags: MapFlags,
}

impl Definition {
    pub fn new(lhs: Keystroke, rhs: Keystroke, flags: MapFlags) -> Self {
        Self { lhs, rhs, flags }
    }

    /// Parse a rule. Both sides must contain at least one key.
    pub fn parse(rule: &Rule) -> Result<Self, ParseError> {
        let lhs = Keystroke::parse(&rule.lhs);
        if lhs.is_empty() {
            return Err(ParseError::EmptyLhs);
        }
        let rhs = Keystroke::parse(&rule.rhs);
        if rhs.is_empty() {
            return Err(ParseError::EmptyRhs);
        }
        Ok(Self::new(lhs, rhs, MapFlags::parse(&rule.flags)?))
    }

    pub fn lhs(&self) -> &Keystroke {
        &self.lhs
    }

    pub fn rhs(&self) -> &Keystroke {
        &self.rhs
    }

    pub fn flags(&self) -> MapFlags {
        self.flags
    }

    pub fn noremap(&self) -> bool {
        self.flags.contains(MapFlags::NOREMAP)
    }

    pub fn nowait(&self) -> bool {
        self.flags.contains(MapFlags::NOWAIT)
    }
}

/// The bindings every prompt starts with.
pub const DEFAULT_KEYMAP_RULES: &[(&str, &str, MapFlags)] = &[
    ("<CR>", "<prompt:accept>", MapFlags::NOREMAP),
    ("<ESC>", "<prompt:cancel>", MapFlags::NOREMAP),
    ("<INSERT>", "<prompt:toggle_insert_mode>", MapFlags::NOREMAP),
    ("<BS>", "<prompt:delete_char_before_caret>", MapFlags::NOREMAP),
    ("<C-H>", "<prompt:delete_char_before_caret>", MapFlags::NOREMAP),
    ("<DEL>", "<prompt:delete_char_under_caret>", MapFlags::NOREMAP),
    ("<C-U>", "<prompt:delete_entire_text>", MapFlags::NOREMAP),
    ("<Left>", "<prompt:move_caret_to_left>", MapFlags::NOREMAP),
    ("<Right>", "<prompt:move_caret_to_right>", MapFlags::NOREMAP),
    ("<Home>", "<prompt:move_caret_to_head>", MapFlags::NOREMAP),
    ("<End>", "<prompt:move_caret_to_tail>", MapFlags::NOREMAP),
    ("<C-P>", "<prompt:assign_previous_text>", MapFlags::NOREMAP),
    ("<C-N>", "<prompt:assign_next_text>", MapFlags::NOREMAP),
    ("<Up>", "<prompt:assign_previous_matched_text>", MapFlags::NOREMAP),
    ("<Down>", "<prompt:assign_next_matched_text>", MapFlags::NOREMAP),
    ("<C-R>", "<prompt:paste_from_register>", MapFlags::NOREMAP),
    ("<C-V>", "<prompt:insert_special>", MapFlags::NOREMAP),
    ("<C-K>", "<prompt:insert_digraph>", MapFlags::NOREMAP),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// No mapping can match; hand the keys over literally.
    Passthrough,
    /// A mapping matched exactly and nothing justifies waiting.
    Resolved,
    /// Longer mappings could still match. `exact` records whether the keys
    /// so far already match a mapping on their own.
    Waiting { exact: bool },
}

/// Registry of key mappings.
#[derive(Debug, Clone, Default)]
pub struct Keymap {
    registry: HashMap<Keystroke, Definition>,
}

impl Keymap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a keymap from rules, later rules overwriting earlier ones.
    pub fn from_rules<I, R>(rules: I) -> Result<Self, ParseError>
    where
        I: IntoIterator<Item = R>,
        R: Into<Rule>,
    {
        let mut keymap = Self::new();
        keymap.register_from_rules(rules)?;
        Ok(keymap)
    }

    /// A keymap holding [`DEFAULT_KEYMAP_RULES`].
    pub fn with_defaults() -> Self {
        let mut keymap = Self::new();
        for &(lhs, rhs, flags) in DEFAULT_KEYMAP_RULES {
            keymap.register(Definition::new(
                Keystroke::parse(lhs),
                Keystroke::parse(rhs),
                flags,
            ));
        }
        keymap
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    pub fn get(&self, lhs: &Keystroke) -> Option<&Definition> {
        self.registry.get(lhs)
    }

    /// Insert a definition, replacing any with the same `lhs`.
    pub fn register(&mut self, definition: Definition) -> Option<Definition> {
        tracing::debug!(
            target: "vim_prompt::keymap",
            lhs = %definition.lhs,
            rhs = %definition.rhs,
            flags = ?definition.flags,
            "register mapping"
        );
        self.registry.insert(definition.lhs.clone(), definition)
    }

    /// Register in order, so later definitions win on a shared `lhs`.
    pub fn register_many(&mut self, definitions: impl IntoIterator<Item = Definition>) {
        for definition in definitions {
            self.register(definition);
        }
    }

    pub fn register_from_rule(&mut self, rule: &Rule) -> Result<(), ParseError> {
        self.register(Definition::parse(rule)?);
        Ok(())
    }

    /// Parse and register every rule. Stops at the first malformed rule;
    /// rules before it stay registered.
    pub fn register_from_rules<I, R>(&mut self, rules: I) -> Result<(), ParseError>
    where
        I: IntoIterator<Item = R>,
        R: Into<Rule>,
    {
        rules
            .into_iter()
            .try_for_each(|rule| self.register_from_rule(&rule.into()))
    }

    /// Remove the mapping for `lhs`, failing if there is none.
    pub fn unregister(&mut self, lhs: &Keystroke) -> Result<Definition, KeymapError> {
        self.remove(lhs)
            .ok_or_else(|| KeymapError::NotFound(lhs.clone()))
    }

    /// Remove the mapping for `lhs` if there is one.
    pub fn remove(&mut self, lhs: &Keystroke) -> Option<Definition> {
        let removed = self.registry.remove(lhs);
        if removed.is_some() {
            tracing::debug!(target: "vim_prompt::keymap", %lhs, "unregister mapping");
        }
        removed
    }

    /// Every definition whose `lhs` starts with `prefix`, sorted.
    ///
    /// An empty prefix returns all definitions.
    pub fn filter(&self, prefix: &Keystroke) -> Vec<&Definition> {
        let mut candidates: Vec<&Definition> = self
            .registry
            .values()
            .filter(|d| d.lhs.starts_with(prefix))
            .collect();
        candidates.sort();
        candidates
    }

    /// Exact-match lookup following the remap chain.
    ///
    /// Returns `None` when nothing is mapped to `sequence`. A `noremap`
    /// mapping stops the chain at its `rhs`. A chain that comes back to an
    /// `lhs` it already expanded stops at the last `rhs` it reached.
    pub fn resolve(&self, sequence: &Keystroke) -> Option<Keystroke> {
        let mut definition = self.registry.get(sequence)?;
        let mut visited = HashSet::new();
        visited.insert(&definition.lhs);
        loop {
            if definition.noremap() {
                return Some(definition.rhs.clone());
            }
            match self.registry.get(&definition.rhs) {
                Some(next) if visited.insert(&next.lhs) => definition = next,
                Some(_) => {
                    tracing::trace!(
                        target: "vim_prompt::keymap",
                        lhs = %definition.rhs,
                        "remap cycle, chain stops"
                    );
                    return Some(definition.rhs.clone());
                }
                None => return Some(definition.rhs.clone()),
            }
        }
    }

    /// Read keys from `source` until they resolve to one keystroke.
    ///
    /// With `timeout` set, an ambiguous prefix waits that long after the last
    /// key for the next one; `None` waits forever. Keys are only consumed when
    /// they become part of the result, so anything typed after the decision
    /// stays in `source` for the next call. An interrupt from the source
    /// propagates immediately and the partial input is dropped.
    pub fn harvest<S>(&self, source: &mut S, timeout: Option<Duration>) -> Result<Keystroke, InputError>
    where
        S: KeySource + ?Sized,
    {
        let mut history = Keystroke::default();
        loop {
            let key = source.read_key()?;
            let consumed_at = Instant::now();
            history = history.with(key);

            match self.step(&history) {
                Step::Passthrough => {
                    tracing::trace!(target: "vim_prompt::keymap", %history, "passthrough");
                    return Ok(history);
                }
                Step::Resolved => {
                    tracing::trace!(target: "vim_prompt::keymap", %history, "resolved");
                    return Ok(self.resolve(&history).unwrap_or(history));
                }
                Step::Waiting { exact } => {
                    let Some(timeout) = timeout else {
                        tracing::trace!(target: "vim_prompt::keymap", %history, "waiting");
                        continue;
                    };
                    let remaining = timeout.saturating_sub(consumed_at.elapsed());
                    tracing::trace!(target: "vim_prompt::keymap", %history, ?remaining, "waiting");
                    if source.wait_key(remaining)? {
                        continue;
                    }
                    tracing::trace!(target: "vim_prompt::keymap", %history, exact, "timed out");
                    if exact {
                        return Ok(self.resolve(&history).unwrap_or(history));
                    }
                    return Ok(history);
                }
            }
        }
    }

    fn step(&self, history: &Keystroke) -> Step {
        let candidates = self.filter(history);
        let exact = candidates.iter().find(|d| &d.lhs == history);
        match (candidates.len(), exact) {
            (0, _) => Step::Passthrough,
            (1, Some(_)) => Step::Resolved,
            (_, Some(d)) if d.nowait() => Step::Resolved,
            (_, exact) => Step::Waiting {
                exact: exact.is_some(),
            },
        }
    }
}

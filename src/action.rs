//! Named prompt actions.
//!
//! Keystrokes resolve to pseudo-keys such as `<prompt:accept>`; the prompt
//! looks the pseudo-key name up in an [`ActionRegistry`] and runs the handler
//! against an [`ActionContext`].

use std::collections::HashMap;
use std::fmt;

use unicode_segmentation::UnicodeSegmentation;

use crate::digraph::Digraphs;
use crate::error::{Error, InputError};
use crate::history::History;
use crate::input::KeySource;
use crate::key::{Key, KeyCode};
use crate::state::PromptState;
use crate::traits::Host;
use crate::types::Outcome;

/// Everything an action may touch while it runs.
pub struct ActionContext<'a> {
    pub state: &'a mut PromptState,
    pub history: &'a mut History,
    pub source: &'a mut dyn KeySource,
    pub host: &'a mut dyn Host,
    pub digraphs: &'a Digraphs,
    pub prefix: &'a str,
}

impl ActionContext<'_> {
    pub fn redraw(&mut self) {
        self.host.redraw(self.prefix, self.state);
    }

    /// Show `marker` at the caret, read one key, then put the state back.
    fn read_with_marker(&mut self, marker: &str) -> Result<Key, InputError> {
        let saved = self.state.store();
        self.state.update_text(marker);
        self.redraw();
        let key = self.source.read_key();
        self.state.restore(saved);
        key
    }
}

pub type ActionFn = dyn Fn(&mut ActionContext<'_>, Option<&str>) -> Result<Outcome, InputError> + Send + Sync;

/// Action handlers by `namespace:label` name.
#[derive(Default)]
pub struct ActionRegistry {
    registry: HashMap<String, Box<ActionFn>>,
}

impl fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionRegistry")
            .field("actions", &self.names())
            .finish()
    }
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in `prompt:` action.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("prompt:accept", |_, _| Ok(Outcome::Accept));
        registry.register("prompt:cancel", |_, _| Ok(Outcome::Cancel));
        registry.register("prompt:toggle_insert_mode", toggle_insert_mode);
        registry.register("prompt:delete_char_before_caret", delete_char_before_caret);
        registry.register("prompt:delete_word_before_caret", delete_word_before_caret);
        registry.register("prompt:delete_char_under_caret", |cx, _| {
            cx.state.delete_under_caret();
            Ok(Outcome::Continue)
        });
        registry.register("prompt:delete_text_after_caret", |cx, _| {
            cx.state.delete_after_caret();
            Ok(Outcome::Continue)
        });
        registry.register("prompt:delete_entire_text", |cx, _| {
            cx.state.clear();
            Ok(Outcome::Continue)
        });
        registry.register("prompt:move_caret_to_left", |cx, _| {
            cx.state.set_locus(cx.state.locus().saturating_sub(1));
            Ok(Outcome::Continue)
        });
        registry.register("prompt:move_caret_to_one_word_left", move_caret_to_one_word_left);
        registry.register("prompt:move_caret_to_right", |cx, _| {
            cx.state.set_locus(cx.state.locus() + 1);
            Ok(Outcome::Continue)
        });
        registry.register("prompt:move_caret_to_one_word_right", move_caret_to_one_word_right);
        registry.register("prompt:move_caret_to_head", |cx, _| {
            cx.state.set_locus(cx.state.head());
            Ok(Outcome::Continue)
        });
        registry.register("prompt:move_caret_to_lead", |cx, _| {
            cx.state.set_locus(cx.state.lead());
            Ok(Outcome::Continue)
        });
        registry.register("prompt:move_caret_to_tail", |cx, _| {
            cx.state.set_locus(cx.state.tail());
            Ok(Outcome::Continue)
        });
        registry.register("prompt:assign_previous_text", |cx, _| {
            let text = cx.history.previous(cx.state);
            cx.state.set_text(text);
            Ok(Outcome::Continue)
        });
        registry.register("prompt:assign_next_text", |cx, _| {
            let text = cx.history.next(cx.state);
            cx.state.set_text(text);
            Ok(Outcome::Continue)
        });
        registry.register("prompt:assign_previous_matched_text", |cx, _| {
            let text = cx.history.previous_match(cx.state);
            cx.state.set_text(text);
            Ok(Outcome::Continue)
        });
        registry.register("prompt:assign_next_matched_text", |cx, _| {
            let text = cx.history.next_match(cx.state);
            cx.state.set_text(text);
            Ok(Outcome::Continue)
        });
        registry.register("prompt:paste_from_register", paste_from_register);
        registry.register("prompt:paste_from_default_register", |cx, _| {
            let name = cx.host.default_register();
            if let Some(text) = cx.host.registers().get(name) {
                cx.state.update_text(&text);
            }
            Ok(Outcome::Continue)
        });
        registry.register("prompt:yank_to_register", yank_to_register);
        registry.register("prompt:yank_to_default_register", |cx, _| {
            let name = cx.host.default_register();
            let text = cx.state.text().to_owned();
            cx.host.registers().set(name, text);
            Ok(Outcome::Continue)
        });
        registry.register("prompt:insert_special", insert_special);
        registry.register("prompt:insert_digraph", insert_digraph);
        registry
    }

    /// Register `action` under `name`, replacing any previous handler.
    pub fn register<F>(&mut self, name: impl Into<String>, action: F)
    where
        F: Fn(&mut ActionContext<'_>, Option<&str>) -> Result<Outcome, InputError> + Send + Sync + 'static,
    {
        self.registry.insert(name.into(), Box::new(action));
    }

    pub fn register_many<I>(&mut self, actions: I)
    where
        I: IntoIterator<Item = (String, Box<ActionFn>)>,
    {
        self.registry.extend(actions);
    }

    pub fn unregister(&mut self, name: &str) -> bool {
        self.registry.remove(name).is_some()
    }

    pub fn clear(&mut self) {
        self.registry.clear();
    }

    pub fn contains(&self, name: &str) -> bool {
        self.registry.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.registry.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Run the action registered as `name`.
    ///
    /// When `ns:label` is not registered, `prompt:label` runs instead, so a
    /// host namespace can alias any built-in.
    pub fn dispatch(
        &self,
        name: &str,
        param: Option<&str>,
        cx: &mut ActionContext<'_>,
    ) -> Result<Outcome, Error> {
        let action = self.registry.get(name).or_else(|| {
            let (_, label) = name.split_once(':')?;
            self.registry.get(&format!("prompt:{label}"))
        });
        let Some(action) = action else {
            tracing::warn!(target: "vim_prompt::action", name, "unknown action");
            return Err(Error::UnknownAction(name.to_owned()));
        };
        tracing::trace!(target: "vim_prompt::action", name, ?param, "dispatch");
        Ok(action(cx, param)?)
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn graphemes(text: &str) -> usize {
    text.graphemes(true).count()
}

fn toggle_insert_mode(cx: &mut ActionContext<'_>, _: Option<&str>) -> Result<Outcome, InputError> {
    let mode = cx.state.insert_mode().toggled();
    cx.state.set_insert_mode(mode);
    Ok(Outcome::Continue)
}

fn delete_char_before_caret(cx: &mut ActionContext<'_>, _: Option<&str>) -> Result<Outcome, InputError> {
    if cx.state.locus() > 0 {
        cx.state.delete_before_caret(1);
    }
    Ok(Outcome::Continue)
}

// `\k\+\s*$`: a word run plus any trailing whitespace
fn delete_word_before_caret(cx: &mut ActionContext<'_>, _: Option<&str>) -> Result<Outcome, InputError> {
    let backward = cx.state.backward_text();
    let trimmed = backward.trim_end_matches(char::is_whitespace);
    let word_start = trimmed.trim_end_matches(is_word_char).len();
    if word_start < trimmed.len() {
        let count = graphemes(&backward[word_start..]);
        cx.state.delete_before_caret(count);
    }
    Ok(Outcome::Continue)
}

// `\k\+\s\?$`: a word run plus at most one whitespace; one step when none
fn move_caret_to_one_word_left(cx: &mut ActionContext<'_>, _: Option<&str>) -> Result<Outcome, InputError> {
    let backward = cx.state.backward_text();
    let trimmed = backward.strip_suffix(char::is_whitespace).unwrap_or(backward);
    let word_start = trimmed.trim_end_matches(is_word_char).len();
    let offset = if word_start < trimmed.len() {
        graphemes(&backward[word_start..])
    } else {
        1
    };
    cx.state.set_locus(cx.state.locus().saturating_sub(offset));
    Ok(Outcome::Continue)
}

// step past the selected grapheme, then the word run that follows it
fn move_caret_to_one_word_right(cx: &mut ActionContext<'_>, _: Option<&str>) -> Result<Outcome, InputError> {
    let forward = cx.state.forward_text();
    let rest = forward.trim_start_matches(is_word_char);
    let offset = 1 + graphemes(&forward[..forward.len() - rest.len()]);
    cx.state.set_locus(cx.state.locus() + offset);
    Ok(Outcome::Continue)
}

fn paste_from_register(cx: &mut ActionContext<'_>, _: Option<&str>) -> Result<Outcome, InputError> {
    let key = cx.read_with_marker("\"")?;
    if let Some(name) = key.as_char()
        && let Some(text) = cx.host.registers().get(name)
    {
        cx.state.update_text(&text);
    }
    Ok(Outcome::Continue)
}

fn yank_to_register(cx: &mut ActionContext<'_>, _: Option<&str>) -> Result<Outcome, InputError> {
    let key = cx.read_with_marker("'")?;
    if let Some(name) = key.as_char() {
        let text = cx.state.text().to_owned();
        cx.host.registers().set(name, text);
    }
    Ok(Outcome::Continue)
}

fn insert_special(cx: &mut ActionContext<'_>, _: Option<&str>) -> Result<Outcome, InputError> {
    let key = cx.read_with_marker("^")?;
    let text = match &key {
        Key::Press(ev) if ev.code() == KeyCode::Backspace && ev.mods().is_empty() => "\x08".to_owned(),
        key => match key.as_char() {
            Some(c) => c.to_string(),
            None => key.to_string(),
        },
    };
    cx.state.update_text(&text);
    Ok(Outcome::Continue)
}

fn insert_digraph(cx: &mut ActionContext<'_>, _: Option<&str>) -> Result<Outcome, InputError> {
    let saved = cx.state.store();
    cx.state.update_text("?");
    cx.redraw();
    let host = &mut *cx.host;
    let retrieved = cx.digraphs.retrieve(&mut *cx.source, || host.digraph_listing());
    cx.state.restore(saved);
    cx.state.update_text(&retrieved?);
    Ok(Outcome::Continue)
}

use std::time::Duration;

use crate::action::{ActionContext, ActionFn, ActionRegistry};
use crate::config::PromptConfig;
use crate::digraph::Digraphs;
use crate::error::{Error, InputError, ParseError};
use crate::history::History;
use crate::input::KeySource;
use crate::keymap::{Keymap, Rule};
use crate::keystroke::Keystroke;
use crate::state::PromptState;
use crate::traits::Host;
use crate::types::Outcome;

type CustomAction = (String, Box<ActionFn>);

pub struct PromptBuilder {
    config: PromptConfig,
    history: History,
    actions: Vec<CustomAction>,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self {
            config: PromptConfig::default(),
            history: History::new(),
            actions: Vec::new(),
        }
    }
}

impl PromptBuilder {
    pub fn config(mut self, config: PromptConfig) -> Self {
        self.config = config;
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.prefix = prefix.into();
        self
    }

    /// `None` or a zero duration disables the mapping timeout. Durations
    /// are kept in whole milliseconds, rounded up.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        match timeout {
            Some(timeout) => {
                let millis = timeout.as_nanos().div_ceil(1_000_000);
                self.config.timeout = true;
                self.config.timeoutlen = u64::try_from(millis).unwrap_or(u64::MAX);
            }
            None => self.config.timeout = false,
        }
        self
    }

    pub fn mapping(mut self, rule: impl Into<Rule>) -> Self {
        self.config.mappings.push(rule.into());
        self
    }

    pub fn history(mut self, history: History) -> Self {
        self.history = history;
        self
    }

    pub fn action<F>(mut self, name: impl Into<String>, action: F) -> Self
    where
        F: Fn(&mut ActionContext<'_>, Option<&str>) -> Result<Outcome, InputError> + Send + Sync + 'static,
    {
        self.actions.push((name.into(), Box::new(action)));
        self
    }

    /// Default mappings first, then the configured ones; later rules win.
    pub fn build(self) -> Result<Prompt, ParseError> {
        let mut keymap = Keymap::with_defaults();
        keymap.register_from_rules(self.config.mappings.iter().cloned())?;
        let mut actions = ActionRegistry::with_defaults();
        actions.register_many(self.actions);
        Ok(Prompt {
            timeout: self.config.timeout_duration(),
            prefix: self.config.prefix,
            state: PromptState::new(),
            history: self.history,
            keymap,
            actions,
            digraphs: Digraphs::new(),
        })
    }
}

/// A single line prompt driven by a [`Keymap`].
///
/// Each loop iteration redraws through the [`Host`], harvests one resolved
/// keystroke from the [`KeySource`] and feeds it to [`Prompt::on_keypress`].
#[derive(Debug)]
pub struct Prompt {
    prefix: String,
    timeout: Option<Duration>,
    state: PromptState,
    history: History,
    keymap: Keymap,
    actions: ActionRegistry,
    digraphs: Digraphs,
}

impl Default for Prompt {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            timeout: PromptConfig::default().timeout_duration(),
            state: PromptState::new(),
            history: History::new(),
            keymap: Keymap::with_defaults(),
            actions: ActionRegistry::with_defaults(),
            digraphs: Digraphs::new(),
        }
    }
}

impl Prompt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> PromptBuilder {
        PromptBuilder::default()
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn state(&self) -> &PromptState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut PromptState {
        &mut self.state
    }

    pub fn text(&self) -> &str {
        self.state.text()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.state.set_text(text);
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    pub fn keymap_mut(&mut self) -> &mut Keymap {
        &mut self.keymap
    }

    pub fn actions(&self) -> &ActionRegistry {
        &self.actions
    }

    pub fn actions_mut(&mut self) -> &mut ActionRegistry {
        &mut self.actions
    }

    /// Register host supplied mappings over the current keymap.
    pub fn apply_custom_mappings<I, R>(&mut self, rules: I) -> Result<(), ParseError>
    where
        I: IntoIterator<Item = R>,
        R: Into<Rule>,
    {
        self.keymap.register_from_rules(rules)
    }

    /// Run the prompt until an action accepts, cancels or fails.
    ///
    /// `default` replaces the current text when it is non-empty. An interrupt
    /// from `source` cancels; any other failure goes to
    /// [`Host::report_error`] and ends with [`Outcome::Error`]. The final
    /// text is added to the history whatever the outcome, and
    /// [`Host::on_term`] decides what is returned.
    pub fn start(&mut self, source: &mut dyn KeySource, host: &mut dyn Host, default: Option<&str>) -> Outcome {
        tracing::debug!(target: "vim_prompt::engine", prefix = %self.prefix, "prompt started");
        self.history.reset();
        host.on_init(&mut self.state);
        if let Some(text) = default.filter(|text| !text.is_empty()) {
            self.state.set_text(text);
        }

        let outcome = match self.run(source, host) {
            Ok(outcome) => outcome,
            Err(Error::Input(InputError::Interrupted)) => {
                tracing::debug!(target: "vim_prompt::engine", "interrupted");
                Outcome::Cancel
            }
            Err(err) => {
                tracing::error!(target: "vim_prompt::engine", %err, "prompt failed");
                host.report_error(&err);
                Outcome::Error
            }
        };

        if !self.state.text().is_empty() {
            self.history.push(self.state.text());
        }
        let outcome = host.on_term(&self.state, outcome);
        tracing::debug!(target: "vim_prompt::engine", ?outcome, "prompt finished");
        outcome
    }

    fn run(&mut self, source: &mut dyn KeySource, host: &mut dyn Host) -> Result<Outcome, Error> {
        let mut outcome = host.on_update(&mut self.state, Outcome::Continue);
        while !outcome.is_done() {
            host.redraw(&self.prefix, &self.state);
            let keystroke = self.keymap.harvest(&mut *source, self.timeout)?;
            outcome = self.on_keypress(&keystroke, &mut *source, &mut *host)?;
            outcome = host.on_update(&mut self.state, outcome);
        }
        Ok(outcome)
    }

    /// Apply one harvested keystroke.
    ///
    /// Runs of literal keys are inserted with [`PromptState::update_text`]
    /// and each pseudo-key dispatches its action, in order. Processing stops
    /// at the first action that does not return [`Outcome::Continue`].
    pub fn on_keypress(
        &mut self,
        keystroke: &Keystroke,
        source: &mut dyn KeySource,
        host: &mut dyn Host,
    ) -> Result<Outcome, Error> {
        let mut pending = String::new();
        for key in keystroke.keys() {
            let Some(pseudo) = key.as_pseudo() else {
                pending.push_str(&key.insertable());
                continue;
            };
            if !pending.is_empty() {
                self.state.update_text(&pending);
                pending.clear();
            }
            let mut cx = ActionContext {
                state: &mut self.state,
                history: &mut self.history,
                source: &mut *source,
                host: &mut *host,
                digraphs: &self.digraphs,
                prefix: &self.prefix,
            };
            let outcome = self.actions.dispatch(pseudo.name(), pseudo.param(), &mut cx)?;
            if outcome.is_done() {
                return Ok(outcome);
            }
        }
        if !pending.is_empty() {
            self.state.update_text(&pending);
        }
        Ok(Outcome::Continue)
    }
}

use crate::state::PromptState;

/// Input history with prefix-matched recall.
///
/// Index `0` is the line being edited; index `n` is the n-th most recent
/// entry. The edited text and its backward text are captured whenever
/// navigation leaves index `0`, and the matched variants only stop on
/// entries starting with that captured backward text.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<String>,
    index: usize,
    cached: String,
    threshold: String,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// History seeded with `entries`, oldest first.
    pub fn with_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut history = Self::new();
        for entry in entries {
            history.push(entry);
        }
        history
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries, oldest first.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Append an entry. Empty text and repeats of the newest entry are skipped.
    pub fn push(&mut self, entry: impl Into<String>) {
        let entry = entry.into();
        if entry.is_empty() || self.entries.last() == Some(&entry) {
            return;
        }
        self.entries.push(entry);
        self.reset();
    }

    /// Go back to the edited line.
    pub fn reset(&mut self) {
        self.index = 0;
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Text at the current index.
    pub fn current(&self) -> &str {
        self.entry(self.index)
    }

    pub fn previous(&mut self, state: &PromptState) -> String {
        self.capture(state);
        self.index = (self.index + 1).min(self.entries.len());
        self.current().to_owned()
    }

    pub fn next(&mut self, state: &PromptState) -> String {
        self.capture(state);
        self.index = self.index.saturating_sub(1);
        self.current().to_owned()
    }

    pub fn previous_match(&mut self, state: &PromptState) -> String {
        self.capture(state);
        if let Some(index) =
            (self.index + 1..=self.entries.len()).find(|&i| self.matches(i))
        {
            self.index = index;
        }
        self.current().to_owned()
    }

    pub fn next_match(&mut self, state: &PromptState) -> String {
        self.capture(state);
        if let Some(index) = (0..self.index).rev().find(|&i| self.matches(i)) {
            self.index = index;
        }
        self.current().to_owned()
    }

    fn capture(&mut self, state: &PromptState) {
        if self.index == 0 {
            self.cached = state.text().to_owned();
            self.threshold = state.backward_text().to_owned();
        }
    }

    fn matches(&self, index: usize) -> bool {
        self.entry(index).starts_with(&self.threshold)
    }

    fn entry(&self, index: usize) -> &str {
        match index {
            0 => &self.cached,
            n => &self.entries[self.entries.len() - n],
        }
    }
}

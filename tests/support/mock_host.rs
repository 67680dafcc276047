use vim_prompt::{Error, Host, MemoryRegisters, Outcome, PromptState, Registers};

/// Host that records what the prompt asks of it.
#[derive(Debug, Default)]
pub struct MockHost {
    pub registers: MemoryRegisters,
    /// `prefix|backward[selected]forward` per redraw.
    pub redraws: Vec<String>,
    pub errors: Vec<String>,
    pub listing: String,
    pub listing_fetches: usize,
    pub updates: usize,
    pub init_text: Option<String>,
    pub terminated: Option<Outcome>,
    /// Outcome `on_term` reports instead of the real one.
    pub term_override: Option<Outcome>,
}

impl MockHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_listing(listing: &str) -> Self {
        Self {
            listing: listing.to_owned(),
            ..Self::default()
        }
    }

    pub fn last_redraw(&self) -> Option<&str> {
        self.redraws.last().map(String::as_str)
    }
}

impl Host for MockHost {
    fn redraw(&mut self, prefix: &str, state: &PromptState) {
        let (backward, selected, forward) = state.segments();
        self.redraws
            .push(format!("{prefix}|{backward}[{selected}]{forward}"));
    }

    fn registers(&mut self) -> &mut dyn Registers {
        &mut self.registers
    }

    fn digraph_listing(&mut self) -> String {
        self.listing_fetches += 1;
        self.listing.clone()
    }

    fn on_init(&mut self, state: &mut PromptState) {
        if let Some(text) = &self.init_text {
            state.set_text(text.clone());
        }
    }

    fn on_update(&mut self, _state: &mut PromptState, outcome: Outcome) -> Outcome {
        self.updates += 1;
        outcome
    }

    fn on_term(&mut self, _state: &PromptState, outcome: Outcome) -> Outcome {
        self.terminated = Some(outcome);
        self.term_override.unwrap_or(outcome)
    }

    fn report_error(&mut self, error: &Error) {
        self.errors.push(error.to_string());
    }
}

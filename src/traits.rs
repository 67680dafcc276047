use crate::error::Error;
use crate::state::PromptState;
use crate::types::Outcome;

pub trait Registers {
    // Named register contents; `None` when the register was never set
    fn get(&mut self, name: char) -> Option<String>;
    fn set(&mut self, name: char, text: String);
}

pub trait Host {
    // Paint prefix + text with the caret; called before every harvest
    fn redraw(&mut self, prefix: &str, state: &PromptState);

    fn registers(&mut self) -> &mut dyn Registers;

    // Register used by the *_default_register actions
    fn default_register(&self) -> char {
        '"'
    }

    // Vim `:digraphs` style listing; fetched at most once per prompt
    fn digraph_listing(&mut self) -> String {
        String::new()
    }

    // Lifecycle hooks, in the order the prompt calls them
    fn on_init(&mut self, _state: &mut PromptState) {}

    fn on_update(&mut self, _state: &mut PromptState, outcome: Outcome) -> Outcome {
        outcome
    }

    fn on_term(&mut self, _state: &PromptState, outcome: Outcome) -> Outcome {
        outcome
    }

    // Errors that end the prompt with Outcome::Error
    fn report_error(&mut self, _error: &Error) {}
}

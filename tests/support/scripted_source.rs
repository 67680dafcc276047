use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use vim_prompt::{InputError, Key, KeySource, Keystroke};

/// One scripted input event.
#[derive(Debug, Clone)]
pub enum Step {
    Key(Key),
    /// Virtual time passing before the next step arrives.
    Pause(Duration),
    Interrupt,
    /// A host I/O error, raised by whichever of `read_key` or `wait_key`
    /// meets it first.
    Fail,
}

/// A key source replaying a script on a virtual clock.
///
/// `wait_key` spends pauses against its timeout instead of sleeping, so
/// timeout races are deterministic. A pause at least as long as the time
/// left counts as a timeout and is dropped; the next `read_key` then blocks
/// "until" the following key.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    steps: VecDeque<Step>,
    reads: usize,
    waits: Vec<Duration>,
}

impl ScriptedSource {
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Every key of `notation`, back to back.
    pub fn keys(notation: &str) -> Self {
        Self::new(Keystroke::parse(notation).keys().iter().cloned().map(Step::Key))
    }

    pub fn reads(&self) -> usize {
        self.reads
    }

    /// Timeouts passed to `wait_key`, in call order.
    pub fn waits(&self) -> &[Duration] {
        &self.waits
    }

    /// The keys nobody consumed yet, pauses skipped.
    pub fn residual(&self) -> Keystroke {
        self.steps
            .iter()
            .filter_map(|step| match step {
                Step::Key(key) => Some(key.clone()),
                _ => None,
            })
            .collect()
    }
}

impl KeySource for ScriptedSource {
    fn read_key(&mut self) -> Result<Key, InputError> {
        loop {
            match self.steps.pop_front() {
                Some(Step::Pause(_)) => continue,
                Some(Step::Key(key)) => {
                    self.reads += 1;
                    return Ok(key);
                }
                Some(Step::Interrupt) => return Err(InputError::Interrupted),
                Some(Step::Fail) => {
                    return Err(InputError::HostIo(io::Error::new(
                        io::ErrorKind::Other,
                        "scripted failure",
                    )));
                }
                None => {
                    return Err(InputError::HostIo(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "script exhausted",
                    )));
                }
            }
        }
    }

    fn wait_key(&mut self, timeout: Duration) -> Result<bool, InputError> {
        self.waits.push(timeout);
        let mut remaining = timeout;
        loop {
            match self.steps.front() {
                Some(Step::Pause(pause)) if *pause >= remaining => {
                    self.steps.pop_front();
                    return Ok(false);
                }
                Some(Step::Pause(pause)) => {
                    remaining -= *pause;
                    self.steps.pop_front();
                }
                Some(Step::Fail) => {
                    self.steps.pop_front();
                    return Err(InputError::HostIo(io::Error::new(
                        io::ErrorKind::Other,
                        "scripted wait failure",
                    )));
                }
                Some(_) => return Ok(true),
                None => return Ok(false),
            }
        }
    }

    fn unread(&mut self, key: Key) -> Result<(), InputError> {
        self.steps.push_front(Step::Key(key));
        Ok(())
    }
}

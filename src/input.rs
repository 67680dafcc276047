//! Raw key sources.
//!
//! The keymap never talks to a terminal itself. It pulls keys from a
//! [`KeySource`], which owns whatever residual input the host has already
//! produced but nobody has consumed yet.

use std::collections::VecDeque;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, TryRecvError};

use crate::error::InputError;
use crate::key::Key;

/// What a host input thread delivers: a key, or a cancel signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawInput {
    Key(Key),
    Interrupted,
}

impl From<Key> for RawInput {
    fn from(key: Key) -> Self {
        RawInput::Key(key)
    }
}

/// A blocking "read one key" primitive with a bounded wait.
pub trait KeySource {
    /// Block until a key is available and consume it.
    fn read_key(&mut self) -> Result<Key, InputError>;

    /// Wait up to `timeout` for a key without consuming it.
    ///
    /// Returns `true` as soon as a key (or an interrupt) is available and
    /// `false` once the timeout passes with nothing to read.
    fn wait_key(&mut self, timeout: Duration) -> Result<bool, InputError>;

    /// Non-blocking availability check.
    fn peek_available(&mut self) -> Result<bool, InputError> {
        self.wait_key(Duration::ZERO)
    }

    /// Put a key back so that the next [`read_key`](Self::read_key) returns it.
    fn unread(&mut self, key: Key) -> Result<(), InputError>;
}

impl<S: KeySource + ?Sized> KeySource for &mut S {
    fn read_key(&mut self) -> Result<Key, InputError> {
        (**self).read_key()
    }

    fn wait_key(&mut self, timeout: Duration) -> Result<bool, InputError> {
        (**self).wait_key(timeout)
    }

    fn peek_available(&mut self) -> Result<bool, InputError> {
        (**self).peek_available()
    }

    fn unread(&mut self, key: Key) -> Result<(), InputError> {
        (**self).unread(key)
    }
}

/// Bounded residual-input queue.
///
/// Keys that were read from the host but not consumed wait here. A full
/// buffer refuses further keys instead of dropping any.
#[derive(Debug, Clone)]
pub struct Pushback {
    queue: VecDeque<RawInput>,
    capacity: usize,
}

impl Pushback {
    pub const DEFAULT_CAPACITY: usize = 64;

    pub fn new(capacity: usize) -> Self {
        Self {
            queue: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Queue input that arrived from the host but was not consumed.
    pub fn push_back(&mut self, input: RawInput) -> Result<(), InputError> {
        self.ensure_room()?;
        self.queue.push_back(input);
        Ok(())
    }

    /// Return a consumed key to the front of the queue.
    pub fn unread(&mut self, key: Key) -> Result<(), InputError> {
        self.ensure_room()?;
        self.queue.push_front(RawInput::Key(key));
        Ok(())
    }

    pub fn pop(&mut self) -> Option<RawInput> {
        self.queue.pop_front()
    }

    fn ensure_room(&self) -> Result<(), InputError> {
        if self.queue.len() >= self.capacity {
            return Err(InputError::PushbackFull {
                capacity: self.capacity,
            });
        }
        Ok(())
    }
}

impl Default for Pushback {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

/// A key source fed by a host input thread over a channel.
///
/// The designated interrupt key (`<C-C>` unless changed) is reported as
/// [`InputError::Interrupted`] and never handed out as a key.
#[derive(Debug)]
pub struct ChannelSource {
    rx: Receiver<RawInput>,
    pushback: Pushback,
    interrupt_key: Option<Key>,
}

impl ChannelSource {
    pub fn new(rx: Receiver<RawInput>) -> Self {
        Self {
            rx,
            pushback: Pushback::default(),
            interrupt_key: Some(Key::ctrl('c')),
        }
    }

    /// Change (or with `None`, disable) the key that maps to an interrupt.
    pub fn with_interrupt_key(mut self, key: Option<Key>) -> Self {
        self.interrupt_key = key;
        self
    }

    pub fn with_pushback_capacity(mut self, capacity: usize) -> Self {
        self.pushback = Pushback::new(capacity);
        self
    }

    /// Number of keys read from the channel but not consumed yet.
    pub fn residual_len(&self) -> usize {
        self.pushback.len()
    }

    fn deliver(&self, input: RawInput) -> Result<Key, InputError> {
        match input {
            RawInput::Key(key) if Some(&key) == self.interrupt_key.as_ref() => {
                tracing::debug!(target: "vim_prompt::input", "interrupt key received");
                Err(InputError::Interrupted)
            }
            RawInput::Key(key) => Ok(key),
            RawInput::Interrupted => Err(InputError::Interrupted),
        }
    }
}

fn disconnected() -> InputError {
    InputError::HostIo(std::io::Error::new(
        std::io::ErrorKind::BrokenPipe,
        "input channel disconnected",
    ))
}

impl KeySource for ChannelSource {
    fn read_key(&mut self) -> Result<Key, InputError> {
        let input = match self.pushback.pop() {
            Some(input) => input,
            None => self.rx.recv().map_err(|_| disconnected())?,
        };
        self.deliver(input)
    }

    fn wait_key(&mut self, timeout: Duration) -> Result<bool, InputError> {
        if !self.pushback.is_empty() {
            return Ok(true);
        }
        let received = if timeout.is_zero() {
            match self.rx.try_recv() {
                Ok(input) => Some(input),
                Err(TryRecvError::Empty) => None,
                Err(TryRecvError::Disconnected) => return Err(disconnected()),
            }
        } else {
            match self.rx.recv_timeout(timeout) {
                Ok(input) => Some(input),
                Err(RecvTimeoutError::Timeout) => None,
                Err(RecvTimeoutError::Disconnected) => return Err(disconnected()),
            }
        };
        match received {
            Some(input) => {
                self.pushback.push_back(input)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn unread(&mut self, key: Key) -> Result<(), InputError> {
        self.pushback.unread(key)
    }
}

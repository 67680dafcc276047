//! Terminal prompt using crossterm.
//!
//! Keys are read on a separate thread and sent over a channel, so the
//! keymap can wait for ambiguous mappings with a real timeout.
//! Run with: cargo run --example tui_crossterm

use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use crossterm::{
    cursor::{MoveToColumn, RestorePosition, SavePosition},
    event::{self, Event, KeyCode as CKeyCode, KeyEvent as CKeyEvent, KeyEventKind, KeyModifiers},
    queue,
    style::{Attribute, Print, SetAttribute},
    terminal::{Clear, ClearType, disable_raw_mode, enable_raw_mode},
};
use vim_prompt::{
    ChannelSource, Error, Host, Key, KeyCode, Modifiers, Outcome, Prompt, PromptState, RawInput,
    Registers, state::printable,
};

#[cfg(feature = "clipboard")]
type DemoRegisters = vim_prompt::SystemRegisters;
#[cfg(not(feature = "clipboard"))]
type DemoRegisters = vim_prompt::MemoryRegisters;

struct TerminalHost {
    out: io::Stdout,
    registers: DemoRegisters,
    last_error: Option<String>,
}

impl TerminalHost {
    fn paint(&mut self, prefix: &str, state: &PromptState) -> io::Result<()> {
        let (backward, selected, forward) = state.segments();
        let selected = if selected.is_empty() { " " } else { selected };
        queue!(
            self.out,
            MoveToColumn(0),
            Clear(ClearType::CurrentLine),
            Print(prefix),
            Print(printable(backward)),
            SavePosition,
            SetAttribute(Attribute::Reverse),
            Print(printable(selected)),
            SetAttribute(Attribute::Reset),
            Print(printable(forward)),
            RestorePosition,
        )?;
        self.out.flush()
    }
}

impl Host for TerminalHost {
    fn redraw(&mut self, prefix: &str, state: &PromptState) {
        if let Err(err) = self.paint(prefix, state) {
            tracing::warn!(%err, "redraw failed");
        }
    }

    fn registers(&mut self) -> &mut dyn Registers {
        &mut self.registers
    }

    fn report_error(&mut self, error: &Error) {
        self.last_error = Some(error.to_string());
    }
}

fn convert_crossterm_event(event: CKeyEvent) -> Option<Key> {
    let mut mods = Modifiers::empty();
    if event.modifiers.contains(KeyModifiers::SHIFT) {
        mods |= Modifiers::SHIFT;
    }
    if event.modifiers.contains(KeyModifiers::CONTROL) {
        mods |= Modifiers::CTRL;
    }
    if event.modifiers.contains(KeyModifiers::ALT) {
        mods |= Modifiers::ALT;
    }
    let code = match event.code {
        CKeyCode::Char(c) => KeyCode::Char(c),
        CKeyCode::Enter => KeyCode::Char('\r'),
        CKeyCode::Tab => KeyCode::Char('\t'),
        CKeyCode::BackTab => {
            mods |= Modifiers::SHIFT;
            KeyCode::Char('\t')
        }
        CKeyCode::Esc => KeyCode::Char('\x1b'),
        CKeyCode::Backspace => KeyCode::Backspace,
        CKeyCode::Delete => KeyCode::Delete,
        CKeyCode::Insert => KeyCode::Insert,
        CKeyCode::Up => KeyCode::Up,
        CKeyCode::Down => KeyCode::Down,
        CKeyCode::Left => KeyCode::Left,
        CKeyCode::Right => KeyCode::Right,
        CKeyCode::Home => KeyCode::Home,
        CKeyCode::End => KeyCode::End,
        CKeyCode::PageUp => KeyCode::PageUp,
        CKeyCode::PageDown => KeyCode::PageDown,
        CKeyCode::F(n) if (1..=37).contains(&n) => KeyCode::F(n),
        _ => return None,
    };
    Some(Key::with_mods(code, mods))
}

/// Feeds terminal keys into a channel. A terminal read error ends the thread,
/// so the prompt sees a disconnected source and finishes with an error.
fn spawn_reader() -> ChannelSource {
    let (tx, rx) = crossbeam_channel::unbounded();
    thread::spawn(move || {
        loop {
            let key = match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => key,
                Ok(_) => continue,
                Err(err) => {
                    tracing::error!(%err, "terminal read failed");
                    break;
                }
            };
            let Some(key) = convert_crossterm_event(key) else {
                continue;
            };
            if tx.send(RawInput::Key(key)).is_err() {
                break;
            }
        }
    });
    ChannelSource::new(rx)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut prompt = Prompt::builder()
        .prefix("> ")
        .timeout(Some(Duration::from_millis(500)))
        .mapping(("jk", "<prompt:accept>", "noremap"))
        .mapping(("<C-A>", "<prompt:move_caret_to_head>", "noremap"))
        .mapping(("<C-E>", "<prompt:move_caret_to_tail>", "noremap"))
        .mapping(("<C-W>", "<prompt:delete_word_before_caret>", "noremap"))
        .build()?;
    let mut host = TerminalHost {
        out: io::stdout(),
        registers: DemoRegisters::new(),
        last_error: None,
    };
    let mut source = spawn_reader();

    enable_raw_mode()?;
    let mut results = Vec::new();
    for _ in 0..3 {
        let outcome = prompt.start(&mut source, &mut host, None);
        queue!(host.out, Print("\r\n"))?;
        host.out.flush()?;
        results.push((outcome, prompt.text().to_owned()));
        prompt.set_text("");
        if outcome != Outcome::Accept {
            break;
        }
    }
    disable_raw_mode()?;

    for (outcome, text) in results {
        println!("{outcome:?}: {text:?}");
    }
    if let Some(error) = host.last_error {
        eprintln!("error: {error}");
    }
    Ok(())
}

use std::cmp::Ordering;
use std::fmt;

/// Key codes representing individual keys on the keyboard.
///
/// Keys that produce a character (including `<Tab>`, `<CR>` and `<Esc>`) are
/// carried as [`KeyCode::Char`] so that a raw `^H` from the host and a `<C-H>`
/// written in a mapping are the same key. Only keys without a character
/// equivalent get a named variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyCode {
    /// A character key, including ASCII control characters.
    Char(char),
    /// The Backspace key (`<BS>`), distinct from `^H`.
    Backspace,
    /// The Delete key (`<Del>`).
    Delete,
    /// The Insert key (`<Insert>`).
    Insert,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    /// A function key, `<F1>` through `<F37>`.
    F(u8),
}

bitflags::bitflags! {
    /// Keyboard modifier flags.
    ///
    /// `<M-x>` and `<A-x>` both set [`Modifiers::ALT`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const CTRL  = 0b0010;
        const ALT   = 0b0100;
    }
}

/// A key press with its modifiers, in normalized form.
///
/// Construction always goes through [`KeyEvent::new`], so two events that
/// denote the same key compare equal no matter how they were spelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    code: KeyCode,
    mods: Modifiers,
}

impl KeyEvent {
    /// Build a normalized key event.
    ///
    /// `CTRL` on an ASCII letter or one of `@ [ \ ] ^ _ ?` folds into the
    /// matching control character, and `CTRL` on a character that already is
    /// a control character is dropped. After that, `SHIFT` on a letter folds
    /// into its uppercase form when that form is a single character.
    pub fn new(code: KeyCode, mods: Modifiers) -> Self {
        let KeyCode::Char(mut c) = code else {
            return Self { code, mods };
        };
        let mut mods = mods;
        if mods.contains(Modifiers::CTRL) {
            if is_ascii_control(c) {
                mods.remove(Modifiers::CTRL);
            } else if let Some(ctrl) = control_of(c) {
                c = ctrl;
                mods.remove(Modifiers::CTRL);
            }
        }
        if mods.contains(Modifiers::SHIFT) {
            if c.is_uppercase() {
                mods.remove(Modifiers::SHIFT);
            } else if c.is_lowercase() {
                let mut upper = c.to_uppercase();
                if let (Some(u), None) = (upper.next(), upper.next()) {
                    c = u;
                    mods.remove(Modifiers::SHIFT);
                }
            }
        }
        Self {
            code: KeyCode::Char(c),
            mods,
        }
    }

    pub fn code(&self) -> KeyCode {
        self.code
    }

    pub fn mods(&self) -> Modifiers {
        self.mods
    }

    /// The character this event types, if it is an unmodified character key.
    pub fn as_char(&self) -> Option<char> {
        match self.code {
            KeyCode::Char(c) if self.mods.is_empty() => Some(c),
            _ => None,
        }
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mods.is_empty()
            && let KeyCode::Char(c) = self.code
        {
            return match CharName::of(c) {
                Some(name) => write!(f, "<{name}>"),
                None => write!(f, "{c}"),
            };
        }
        f.write_str("<")?;
        if self.mods.contains(Modifiers::CTRL) {
            f.write_str("C-")?;
        }
        if self.mods.contains(Modifiers::SHIFT) {
            f.write_str("S-")?;
        }
        if self.mods.contains(Modifiers::ALT) {
            f.write_str("M-")?;
        }
        match self.code {
            KeyCode::Char(c) => match CharName::of(c) {
                Some(name) => write!(f, "{name}")?,
                None => write!(f, "{c}")?,
            },
            KeyCode::F(n) => write!(f, "F{n}")?,
            named => f.write_str(code_name(named))?,
        }
        f.write_str(">")
    }
}

/// An application level key naming an action, e.g. `<prompt:accept>`.
///
/// The name is `namespace:label`, both made of word characters. An optional
/// parameter follows after another `:`. Parameters containing `<` or `>`
/// cannot be written in notation and will not survive a text round trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PseudoKey {
    name: String,
    param: Option<String>,
}

impl PseudoKey {
    /// Create a pseudo-key. Returns `None` unless `name` is `namespace:label`.
    pub fn new(name: impl Into<String>, param: Option<String>) -> Option<Self> {
        let name = name.into();
        let (ns, label) = name.split_once(':')?;
        if !is_word(ns) || !is_word(label) {
            return None;
        }
        Some(Self { name, param })
    }

    /// The full `namespace:label` name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> &str {
        self.name.split_once(':').map_or("", |(ns, _)| ns)
    }

    pub fn label(&self) -> &str {
        self.name.split_once(':').map_or("", |(_, label)| label)
    }

    pub fn param(&self) -> Option<&str> {
        self.param.as_deref()
    }

    fn parse(content: &str) -> Option<Self> {
        let (ns, rest) = content.split_once(':')?;
        let (label, param) = match rest.split_once(':') {
            Some((label, param)) => (label, Some(param)),
            None => (rest, None),
        };
        if !is_word(ns) || !is_word(label) {
            return None;
        }
        if param.is_some_and(|p| p.is_empty() || p.contains('>')) {
            return None;
        }
        Some(Self {
            name: format!("{ns}:{label}"),
            param: param.map(str::to_owned),
        })
    }
}

impl fmt::Display for PseudoKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.param {
            Some(param) => write!(f, "<{}:{}>", self.name, param),
            None => write!(f, "<{}>", self.name),
        }
    }
}

/// One token of a [`Keystroke`](crate::Keystroke).
///
/// Keys are ordered by their canonical notation, so sorting is stable across
/// hosts and independent of how the keys were constructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// A physical key press, possibly modified.
    Press(KeyEvent),
    /// A symbolic application key.
    Pseudo(PseudoKey),
}

impl Key {
    /// An unmodified character key.
    pub fn char(c: char) -> Self {
        Key::Press(KeyEvent::new(KeyCode::Char(c), Modifiers::empty()))
    }

    /// A key with modifiers, normalized.
    pub fn with_mods(code: KeyCode, mods: Modifiers) -> Self {
        Key::Press(KeyEvent::new(code, mods))
    }

    /// An unmodified named key.
    pub fn named(code: KeyCode) -> Self {
        Self::with_mods(code, Modifiers::empty())
    }

    /// `Ctrl` plus a character, e.g. `Key::ctrl('h')` is `^H`.
    pub fn ctrl(c: char) -> Self {
        Self::with_mods(KeyCode::Char(c), Modifiers::CTRL)
    }

    /// A pseudo-key; `None` unless `name` is `namespace:label`.
    pub fn pseudo(name: &str, param: Option<&str>) -> Option<Self> {
        PseudoKey::new(name, param.map(str::to_owned)).map(Key::Pseudo)
    }

    pub fn as_char(&self) -> Option<char> {
        match self {
            Key::Press(ev) => ev.as_char(),
            Key::Pseudo(_) => None,
        }
    }

    pub fn as_pseudo(&self) -> Option<&PseudoKey> {
        match self {
            Key::Pseudo(p) => Some(p),
            Key::Press(_) => None,
        }
    }

    /// The text this key inserts into a prompt.
    ///
    /// Character keys insert themselves and pseudo-keys insert their notation.
    /// Modified and named keys insert nothing.
    pub fn insertable(&self) -> String {
        match self {
            Key::Press(ev) => ev.as_char().map(String::from).unwrap_or_default(),
            Key::Pseudo(p) => p.to_string(),
        }
    }

    /// Parse the token starting at byte `start` of `text`, which must be a `<`.
    ///
    /// Returns the key and the byte index just past its closing `>`. Every `>`
    /// up to the next `<` is tried as the closer, so `<M->>` parses as Alt+`>`.
    pub(crate) fn parse_bracket_at(text: &str, start: usize) -> Option<(Key, usize)> {
        let body = &text[start + 1..];
        for (offset, ch) in body.char_indices() {
            match ch {
                '<' => break,
                '>' => {
                    if let Some(key) = parse_bracket(&body[..offset]) {
                        return Some((key, start + 1 + offset + 1));
                    }
                }
                _ => {}
            }
        }
        None
    }

    /// The bytes of this key's notation, rendered into `scratch` when needed.
    fn notation_bytes<'a>(&'a self, scratch: &'a mut Notation) -> impl Iterator<Item = u8> + 'a {
        let parts: [&'a [u8]; 5] = match self {
            Key::Press(ev) => {
                scratch.render(ev);
                let scratch: &'a Notation = scratch;
                [scratch.as_bytes(), b"", b"", b"", b""]
            }
            Key::Pseudo(p) => match p.param.as_deref() {
                Some(param) => [b"<", p.name.as_bytes(), b":", param.as_bytes(), b">"],
                None => [b"<", p.name.as_bytes(), b">", b"", b""],
            },
        };
        parts.into_iter().flatten().copied()
    }

    fn tiebreak(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Key::Press(a), Key::Press(b)) => (a.code, a.mods).cmp(&(b.code, b.mods)),
            (Key::Pseudo(a), Key::Pseudo(b)) => a.cmp(b),
            (Key::Press(_), Key::Pseudo(_)) => Ordering::Less,
            (Key::Pseudo(_), Key::Press(_)) => Ordering::Greater,
        }
    }
}

impl From<char> for Key {
    fn from(c: char) -> Self {
        Key::char(c)
    }
}

impl From<KeyEvent> for Key {
    fn from(ev: KeyEvent) -> Self {
        Key::Press(ev)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Press(ev) => ev.fmt(f),
            Key::Pseudo(p) => p.fmt(f),
        }
    }
}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> Ordering {
        let (mut lhs, mut rhs) = (Notation::new(), Notation::new());
        self.notation_bytes(&mut lhs)
            .cmp(other.notation_bytes(&mut rhs))
            .then_with(|| self.tiebreak(other))
    }
}

fn parse_bracket(content: &str) -> Option<Key> {
    let mut mods = Modifiers::empty();
    let mut rest = content;
    loop {
        let mut chars = rest.chars();
        let (Some(m), Some('-')) = (chars.next(), chars.next()) else {
            break;
        };
        if rest.len() <= 2 {
            break;
        }
        let flag = match m.to_ascii_lowercase() {
            'c' => Modifiers::CTRL,
            's' => Modifiers::SHIFT,
            'm' | 'a' => Modifiers::ALT,
            _ => break,
        };
        mods |= flag;
        rest = &rest[2..];
    }

    if !mods.is_empty() {
        let mut chars = rest.chars();
        let code = match (chars.next(), chars.next()) {
            (Some(c), None) => KeyCode::Char(c),
            _ => named_code(rest)?,
        };
        return Some(Key::with_mods(code, mods));
    }
    if let Some(code) = named_code(rest) {
        return Some(Key::named(code));
    }
    PseudoKey::parse(rest).map(Key::Pseudo)
}

fn named_code(name: &str) -> Option<KeyCode> {
    let lower = name.to_ascii_lowercase();
    let code = match lower.as_str() {
        "nul" => KeyCode::Char('\0'),
        "tab" => KeyCode::Char('\t'),
        "nl" | "newline" | "linefeed" | "lf" => KeyCode::Char('\n'),
        "cr" | "return" | "enter" => KeyCode::Char('\r'),
        "esc" => KeyCode::Char('\x1b'),
        "space" => KeyCode::Char(' '),
        "lt" => KeyCode::Char('<'),
        "bslash" => KeyCode::Char('\\'),
        "bar" => KeyCode::Char('|'),
        "bs" | "backspace" => KeyCode::Backspace,
        "del" | "delete" => KeyCode::Delete,
        "insert" | "ins" => KeyCode::Insert,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        _ => {
            if let Some(number) = lower.strip_prefix("char-") {
                return parse_char_number(number).map(KeyCode::Char);
            }
            let n: u8 = lower.strip_prefix('f')?.parse().ok()?;
            if !(1..=37).contains(&n) {
                return None;
            }
            KeyCode::F(n)
        }
    };
    Some(code)
}

// <Char-123>, <Char-0x7b>, <Char-0173>
fn parse_char_number(number: &str) -> Option<char> {
    let value = if let Some(hex) = number.strip_prefix("0x") {
        u32::from_str_radix(hex, 16).ok()?
    } else if number.len() > 1 && number.starts_with('0') {
        u32::from_str_radix(&number[1..], 8).ok()?
    } else {
        number.parse().ok()?
    };
    char::from_u32(value)
}

fn code_name(code: KeyCode) -> &'static str {
    match code {
        KeyCode::Char(_) | KeyCode::F(_) => "",
        KeyCode::Backspace => "BS",
        KeyCode::Delete => "Del",
        KeyCode::Insert => "Insert",
        KeyCode::Up => "Up",
        KeyCode::Down => "Down",
        KeyCode::Left => "Left",
        KeyCode::Right => "Right",
        KeyCode::Home => "Home",
        KeyCode::End => "End",
        KeyCode::PageUp => "PageUp",
        KeyCode::PageDown => "PageDown",
    }
}

/// The bracket name of a character that cannot be written literally.
#[derive(Clone, Copy)]
enum CharName {
    Fixed(&'static str),
    Ctrl(char),
    Code(u32),
}

impl CharName {
    fn of(c: char) -> Option<Self> {
        let name = match c {
            '\0' => Self::Fixed("Nul"),
            '\t' => Self::Fixed("Tab"),
            '\n' => Self::Fixed("NL"),
            '\r' => Self::Fixed("CR"),
            '\x1b' => Self::Fixed("Esc"),
            ' ' => Self::Fixed("Space"),
            '<' => Self::Fixed("lt"),
            '\x7f' => Self::Fixed("C-?"),
            c if (c as u32) < 0x20 => Self::Ctrl(char::from(c as u8 + 0x40)),
            c if c.is_control() => Self::Code(c as u32),
            _ => return None,
        };
        Some(name)
    }
}

impl fmt::Display for CharName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(name) => f.write_str(name),
            Self::Ctrl(c) => write!(f, "C-{c}"),
            Self::Code(n) => write!(f, "Char-0x{n:x}"),
        }
    }
}

/// Fixed buffer holding the notation of one [`KeyEvent`].
///
/// The longest event notation is `<C-S-M-Char-0x10ffff>`, well within the
/// buffer, so rendering never needs the heap.
struct Notation {
    buf: [u8; 32],
    len: usize,
}

impl Notation {
    fn new() -> Self {
        Self { buf: [0; 32], len: 0 }
    }

    fn render(&mut self, ev: &KeyEvent) {
        use std::fmt::Write as _;
        self.len = 0;
        // always fits, see the buffer note on `Notation`
        let _ = write!(self, "{ev}");
    }

    fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

impl fmt::Write for Notation {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let end = self.len + s.len();
        let dst = self.buf.get_mut(self.len..end).ok_or(fmt::Error)?;
        dst.copy_from_slice(s.as_bytes());
        self.len = end;
        Ok(())
    }
}

pub(crate) fn is_ascii_control(c: char) -> bool {
    (c as u32) < 0x20 || c == '\x7f'
}

fn control_of(c: char) -> Option<char> {
    let code = match c {
        'a'..='z' => c as u8 - 0x60,
        'A'..='Z' => c as u8 - 0x40,
        '@' => 0x00,
        '[' => 0x1b,
        '\\' => 0x1c,
        ']' => 0x1d,
        '^' => 0x1e,
        '_' => 0x1f,
        '?' => 0x7f,
        _ => return None,
    };
    Some(char::from(code))
}

fn is_word(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_alphanumeric() || c == '_')
}

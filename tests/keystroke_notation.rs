use vim_prompt::{Key, KeyCode, KeyEvent, Keystroke, Modifiers};

fn ks(text: &str) -> Keystroke {
    Keystroke::parse(text)
}

#[test]
fn test_literal_characters() {
    let stroke = ks("abc");
    assert_eq!(stroke.len(), 3);
    assert_eq!(stroke.keys()[0], Key::char('a'));
    assert_eq!(stroke.to_text(), "abc");
}

#[test]
fn test_ctrl_folds_into_control_character() {
    assert_eq!(ks("<C-H>"), Keystroke::from(Key::char('\x08')));
    assert_eq!(ks("<C-h>"), ks("<C-H>"));
    assert_eq!(ks("<c-h>"), ks("<C-H>"));
    assert_eq!(Key::ctrl('h'), Key::char('\x08'));
    assert_eq!(ks("\x08").to_text(), "<C-H>");
}

#[test]
fn test_named_control_characters() {
    assert_eq!(ks("<C-I>"), ks("<Tab>"));
    assert_eq!(ks("<C-M>"), ks("<CR>"));
    assert_eq!(ks("<Return>"), ks("<CR>"));
    assert_eq!(ks("<Enter>"), ks("<cr>"));
    assert_eq!(ks("<C-[>"), ks("<Esc>"));
    assert_eq!(ks("<C-@>"), ks("<Nul>"));
    assert_eq!(ks("\t").to_text(), "<Tab>");
    assert_eq!(ks("\r").to_text(), "<CR>");
    assert_eq!(ks("\n").to_text(), "<NL>");
    assert_eq!(ks("\x1b").to_text(), "<Esc>");
    assert_eq!(ks("\x7f").to_text(), "<C-?>");
    assert_eq!(ks("<C-?>"), ks("\x7f"));
}

#[test]
fn test_space_and_less_than() {
    assert_eq!(ks(" ").to_text(), "<Space>");
    assert_eq!(ks("<lt>"), ks("<"));
    assert_eq!(ks("a<b").to_text(), "a<lt>b");
    assert_eq!(ks("<Bslash>"), ks("\\"));
    assert_eq!(ks("<Bar>"), ks("|"));
}

#[test]
fn test_shift_on_letters() {
    assert_eq!(ks("<S-a>"), ks("A"));
    assert_eq!(ks("<S-A>"), ks("A"));
    assert_eq!(ks("<S-Tab>").to_text(), "<S-Tab>");
    assert_ne!(ks("<S-Tab>"), ks("<Tab>"));
}

#[test]
fn test_modifier_aliases_and_order() {
    assert_eq!(ks("<M-x>"), ks("<A-x>"));
    assert_eq!(ks("<M-x>").to_text(), "<M-x>");
    assert_eq!(ks("<S-C-Left>"), ks("<C-S-Left>"));
    assert_eq!(ks("<S-C-Left>").to_text(), "<C-S-Left>");
    assert_eq!(ks("<M->>").to_text(), "<M->>");
    assert_eq!(ks("<M->>").len(), 1);
}

#[test]
fn test_named_keys() {
    assert_eq!(ks("<BS>").to_text(), "<BS>");
    assert_eq!(ks("<Backspace>"), ks("<BS>"));
    assert_ne!(ks("<BS>"), ks("<C-H>"));
    assert_eq!(ks("<Delete>").to_text(), "<Del>");
    assert_eq!(ks("<Ins>").to_text(), "<Insert>");
    assert_eq!(ks("<PageDown>").to_text(), "<PageDown>");
    assert_eq!(ks("<f12>").to_text(), "<F12>");
    assert_eq!(
        ks("<Up>").keys()[0],
        Key::named(KeyCode::Up)
    );
}

#[test]
fn test_char_numbers() {
    assert_eq!(ks("<Char-65>"), ks("A"));
    assert_eq!(ks("<Char-0x41>"), ks("A"));
    assert_eq!(ks("<Char-0101>"), ks("A"));
    assert_eq!(ks("\u{85}").to_text(), "<Char-0x85>");
    assert_eq!(ks("<Char-0x85>"), ks("\u{85}"));
}

#[test]
fn test_unknown_brackets_fall_back_to_literals() {
    let stroke = ks("<Foo>");
    assert_eq!(stroke.len(), 5);
    assert_eq!(stroke.to_text(), "<lt>Foo>");
    assert_eq!(ks("<F38>").len(), 5);
    assert_eq!(ks("<>").len(), 2);
    assert_eq!(ks("<C->").len(), 4);
    assert_eq!(ks("<<CR>").len(), 2);
}

#[test]
fn test_pseudo_keys() {
    let stroke = ks("<prompt:accept>");
    assert_eq!(stroke.len(), 1);
    let pseudo = stroke.as_pseudo().expect("pseudo-key");
    assert_eq!(pseudo.name(), "prompt:accept");
    assert_eq!(pseudo.namespace(), "prompt");
    assert_eq!(pseudo.label(), "accept");
    assert_eq!(pseudo.param(), None);

    let stroke = ks("<my:do:foo bar>");
    let pseudo = stroke.as_pseudo().expect("pseudo-key with param");
    assert_eq!(pseudo.name(), "my:do");
    assert_eq!(pseudo.param(), Some("foo bar"));
    assert_eq!(stroke.to_text(), "<my:do:foo bar>");

    assert!(ks("<prompt:accept>x").as_pseudo().is_none());
    assert!(Key::pseudo("nocolon", None).is_none());
    assert_eq!(
        Key::pseudo("prompt:cancel", None).map(Keystroke::from),
        Some(ks("<prompt:cancel>"))
    );
}

#[test]
fn test_sequence_operations() {
    let stroke = ks("<C-X><C-F>");
    assert_eq!(stroke.len(), 2);
    assert!(stroke.starts_with(&ks("<C-X>")));
    assert!(stroke.starts_with(&stroke));
    assert!(stroke.starts_with(&Keystroke::default()));
    assert!(!ks("<C-X>").starts_with(&stroke));
    assert_eq!(ks("<C-X>").concat(&ks("<C-F>")), stroke);
    assert_eq!(ks("<C-X>").with(Key::ctrl('f')), stroke);
    assert_eq!(stroke.prefix(1), ks("<C-X>"));
    assert_eq!(stroke.prefix(9), stroke);
}

#[test]
fn test_insertable_text() {
    assert_eq!(ks("a<Left><prompt:accept>b").insertable(), "a<prompt:accept>b");
    assert_eq!(ks("<M-x>").insertable(), "");
    assert_eq!(ks("<C-V>").insertable(), "\x16");
}

#[test]
fn test_ordering_follows_notation() {
    let mut strokes = vec![ks("b"), ks("<C-A>"), ks("a"), ks("ab")];
    strokes.sort();
    assert_eq!(strokes, vec![ks("<C-A>"), ks("a"), ks("ab"), ks("b")]);
}

#[test]
fn test_key_order_matches_rendered_text() {
    let keys: Vec<Key> = [
        "a", "A", "<", "<lt>", "<Tab>", "<C-A>", "<C-?>", "<M-a>", "<C-S-Left>", "<F12>", "<F2>",
        "<BS>", "<Char-0x85>", "<M-Char-0x85>", "<prompt:accept>", "<prompt:accept:x>", "<a:b>",
    ]
    .iter()
    .flat_map(|text| ks(text).keys().to_vec())
    .collect();
    for a in &keys {
        for b in &keys {
            assert_eq!(a.cmp(b), a.to_string().cmp(&b.to_string()), "{a} vs {b}");
        }
    }
}

#[test]
fn test_from_str_and_iterators() {
    let parsed: Keystroke = "<C-X>a".parse().unwrap();
    assert_eq!(parsed, ks("<C-X>a"));
    let collected: Keystroke = "ab".chars().map(Key::from).collect();
    assert_eq!(collected, ks("ab"));
    assert_eq!(Keystroke::from("xy"), ks("xy"));
}

#[test]
fn test_key_event_normalization_is_idempotent() {
    let events = [
        KeyEvent::new(KeyCode::Char('a'), Modifiers::CTRL),
        KeyEvent::new(KeyCode::Char('z'), Modifiers::SHIFT | Modifiers::ALT),
        KeyEvent::new(KeyCode::Char('\t'), Modifiers::SHIFT),
        KeyEvent::new(KeyCode::Left, Modifiers::CTRL),
    ];
    for ev in events {
        assert_eq!(KeyEvent::new(ev.code(), ev.mods()), ev);
    }
    let alt_z = KeyEvent::new(KeyCode::Char('z'), Modifiers::SHIFT | Modifiers::ALT);
    assert_eq!(alt_z.code(), KeyCode::Char('Z'));
    assert_eq!(alt_z.mods(), Modifiers::ALT);
    assert_eq!(Key::from(alt_z).to_string(), "<M-Z>");
}

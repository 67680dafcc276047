use proptest::prelude::*;
use vim_prompt::{Definition, Keymap, Keystroke, MapFlags};

// Notation fragments mixing literals, named keys, modifiers and pseudo-keys
fn token_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9 !?.,;:_\\-]",
        Just("<".to_string()),
        Just(">".to_string()),
        Just("<lt>".to_string()),
        Just("<Space>".to_string()),
        Just("<CR>".to_string()),
        Just("<Esc>".to_string()),
        Just("<Tab>".to_string()),
        Just("<BS>".to_string()),
        Just("<Del>".to_string()),
        Just("<Up>".to_string()),
        Just("<F5>".to_string()),
        "<[CSMA]-[a-z]>",
        "<[CS]-[CS]-(Left|Right|Home|End)>",
        "<C-[@\\[\\]^_?]>",
        "<Char-[0-9]{1,3}>",
        "<[a-z]{1,6}:[a-z_]{1,10}>",
        "<[a-z]{1,6}:[a-z_]{1,10}:[a-z0-9 ]{1,8}>",
        "<[A-Za-z]{0,5}>",
        "[\u{00e0}-\u{00ff}\u{4e00}-\u{4e20}]",
    ]
}

fn notation_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(token_strategy(), 0..8).prop_map(|tokens| tokens.concat())
}

fn rules_strategy() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec(
        (
            "[a-c]{1,3}|<C-[a-c]>[a-c]{0,2}",
            "[x-z]{1,2}|<prompt:[a-z]{1,5}>",
        ),
        1..12,
    )
}

fn build(rules: &[(String, String)]) -> Keymap {
    let mut keymap = Keymap::new();
    for (lhs, rhs) in rules {
        keymap.register(Definition::new(
            Keystroke::parse(lhs),
            Keystroke::parse(rhs),
            MapFlags::NOREMAP,
        ));
    }
    keymap
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn prop_notation_round_trips(text in notation_strategy()) {
        let stroke = Keystroke::parse(&text);
        prop_assert_eq!(Keystroke::parse(&stroke.to_text()), stroke.clone());
        prop_assert_eq!(stroke.to_text(), Keystroke::parse(&stroke.to_text()).to_text());
    }

    #[test]
    fn prop_parse_is_total(text in any::<String>()) {
        let stroke = Keystroke::parse(&text);
        prop_assert!(stroke.len() <= text.chars().count());
        prop_assert_eq!(Keystroke::parse(&stroke.to_text()), stroke);
    }

    #[test]
    fn prop_filter_is_sorted(rules in rules_strategy(), prefix in "[a-c]{0,2}") {
        let keymap = build(&rules);
        let filtered = keymap.filter(&Keystroke::parse(&prefix));
        prop_assert!(filtered.windows(2).all(|pair| pair[0] <= pair[1]));

        let mut reversed = rules.clone();
        reversed.reverse();
        let lhs_order: Vec<&Keystroke> = filtered.iter().map(|d| d.lhs()).collect();
        let rebuilt = build(&reversed);
        let rebuilt_order: Vec<&Keystroke> = rebuilt.filter(&Keystroke::parse(&prefix)).iter().map(|d| d.lhs()).collect();
        prop_assert_eq!(lhs_order, rebuilt_order);
    }

    #[test]
    fn prop_every_prefix_finds_its_definition(rules in rules_strategy()) {
        let keymap = build(&rules);
        for definition in keymap.filter(&Keystroke::default()) {
            let lhs = definition.lhs();
            for k in 0..=lhs.len() {
                let found = keymap.filter(&lhs.prefix(k));
                prop_assert!(found.iter().any(|d| d.lhs() == lhs));
                prop_assert!(found.iter().all(|d| d.lhs().starts_with(&lhs.prefix(k))));
            }
        }
    }

    #[test]
    fn prop_last_registration_wins(rules in rules_strategy()) {
        let keymap = build(&rules);
        for (lhs, _) in &rules {
            let lhs = Keystroke::parse(lhs);
            let (_, expected) = rules
                .iter()
                .rev()
                .find(|(l, _)| Keystroke::parse(l) == lhs)
                .unwrap();
            prop_assert_eq!(keymap.resolve(&lhs), Some(Keystroke::parse(expected)));
        }
    }
}

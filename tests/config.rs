use std::time::Duration;

use vim_prompt::{InsertMode, Prompt, PromptConfig, PromptState, Rule};

#[test]
fn test_defaults() {
    let config = PromptConfig::default();
    assert_eq!(config.prefix, "");
    assert!(config.timeout);
    assert_eq!(config.timeout_duration(), Some(Duration::from_millis(1000)));
    assert!(config.mappings.is_empty());
}

#[test]
fn test_empty_document_uses_defaults() {
    let config: PromptConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(config, PromptConfig::default());
}

#[test]
fn test_timeout_disabled() {
    let config: PromptConfig = serde_json::from_str(r#"{"timeout": false, "timeoutlen": 50}"#).unwrap();
    assert_eq!(config.timeout_duration(), None);
}

#[test]
fn test_zero_timeoutlen_disables_timeout() {
    let config: PromptConfig = serde_json::from_str(r#"{"timeoutlen": 0}"#).unwrap();
    assert!(config.timeout);
    assert_eq!(config.timeout_duration(), None);
    let prompt = Prompt::builder().config(config).build().unwrap();
    assert_eq!(prompt.timeout(), None);
}

#[test]
fn test_builder_timeout_rounds_up_to_millis() {
    let prompt = Prompt::builder().timeout(Some(Duration::from_micros(300))).build().unwrap();
    assert_eq!(prompt.timeout(), Some(Duration::from_millis(1)));

    let prompt = Prompt::builder().timeout(Some(Duration::from_micros(1500))).build().unwrap();
    assert_eq!(prompt.timeout(), Some(Duration::from_millis(2)));

    let prompt = Prompt::builder().timeout(Some(Duration::ZERO)).build().unwrap();
    assert_eq!(prompt.timeout(), None);

    let prompt = Prompt::builder().timeout(None).build().unwrap();
    assert_eq!(prompt.timeout(), None);
}

#[test]
fn test_mappings_in_map_and_array_form() {
    let json = r##"{
        "prefix": "# ",
        "mappings": [
            {"lhs": "<C-J>", "rhs": "<prompt:accept>", "flags": "noremap"},
            {"lhs": "<C-K>", "rhs": "<prompt:cancel>"},
            ["<C-L>", "<prompt:delete_entire_text>"],
            ["<C-O>", "<prompt:move_caret_to_head>", "noremap nowait"]
        ]
    }"##;
    let config: PromptConfig = serde_json::from_str(json).unwrap();
    assert_eq!(
        config.mappings,
        vec![
            Rule::new("<C-J>", "<prompt:accept>", "noremap"),
            Rule::new("<C-K>", "<prompt:cancel>", ""),
            Rule::new("<C-L>", "<prompt:delete_entire_text>", ""),
            Rule::new("<C-O>", "<prompt:move_caret_to_head>", "noremap nowait"),
        ]
    );

    let prompt = Prompt::builder().config(config).build().unwrap();
    assert_eq!(prompt.prefix(), "# ");
    let definition = prompt.keymap().get(&"<C-O>".into()).unwrap();
    assert!(definition.noremap() && definition.nowait());
}

#[test]
fn test_bad_flags_fail_at_build() {
    let json = r#"{"mappings": [["a", "b", "sometimes"]]}"#;
    let config: PromptConfig = serde_json::from_str(json).unwrap();
    assert!(Prompt::builder().config(config).build().is_err());
}

#[test]
fn test_state_persists_as_json() {
    let mut state = PromptState::from_parts("query", 2);
    state.set_insert_mode(InsertMode::Replace);
    let json = serde_json::to_string(&state).unwrap();
    assert_eq!(json, r#"{"text":"query","caret_locus":2,"insert_mode":"Replace"}"#);

    let restored: PromptState = serde_json::from_str(r#"{"text":"query","caret_locus":9}"#).unwrap();
    assert_eq!(restored.locus(), 5);
    assert_eq!(restored.insert_mode(), InsertMode::Insert);
}

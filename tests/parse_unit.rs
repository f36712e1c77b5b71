use tosh::{expand_globs, expand_tokens, parse_line, ErrorKind, ExpansionContext};

#[test]
fn tokenizer_black_box() {
    let tokens = parse_line("echo $(echo hi) there").unwrap();
    assert_eq!(tokens, vec!["echo", "$(echo hi)", "there"]);
}

#[test]
fn tokenize_then_expand_builds_the_argument_vector() {
    let tokens = parse_line("echo $(echo hi) there").unwrap();
    let ctx = ExpansionContext {
        lookup_var: Box::new(|_| None),
        command_subst: Box::new(|expr| {
            assert_eq!(expr, "echo hi");
            Ok("hi".to_string())
        }),
    };
    let args = expand_tokens(tokens, &ctx).unwrap();
    let args = expand_globs(args);
    assert_eq!(args, vec!["echo", "hi", "there"]);
}

#[test]
fn tilde_goes_through_the_lookup_capability() {
    let tokens = parse_line("cd ~/src").unwrap();
    let ctx = ExpansionContext {
        lookup_var: Box::new(|name| (name == "HOME").then(|| "/home/u".to_string())),
        command_subst: Box::new(|_| Ok(String::new())),
    };
    let args = expand_tokens(tokens, &ctx).unwrap();
    assert_eq!(args, vec!["cd", "/home/u/src"]);
}

#[test]
fn glob_of_missing_pattern_keeps_the_literal_argument() {
    let dir = tempfile::tempdir().unwrap();
    let pattern = format!("{}/nope*", dir.path().display());
    let args = expand_globs(vec![pattern.clone()]);
    assert_eq!(args, vec![pattern]);
}

#[test]
fn syntax_errors_carry_the_parse_kind() {
    let err = parse_line("echo 'open").unwrap_err();
    assert_eq!(err.kind, ErrorKind::Parse);
    assert_eq!(err.message, "mismatched quotes");

    let err = parse_line("(open").unwrap_err();
    assert_eq!(err.kind, ErrorKind::Parse);
    assert_eq!(err.message, "mismatched brackets");
}

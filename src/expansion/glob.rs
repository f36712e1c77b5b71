use glob::glob;
use log::debug;

/// Pattern expansion. A token containing `*` or `?` is matched against the
/// filesystem; zero matches keeps the literal token (not an error), one or
/// more replace it with one argument per match. Match order is whatever the
/// matcher yields, deliberately not re-sorted.
pub fn expand_globs(tokens: Vec<String>) -> Vec<String> {
    let mut expanded = Vec::with_capacity(tokens.len());
    for token in tokens {
        if !has_glob_chars(&token) {
            expanded.push(token);
            continue;
        }
        let mut matches = Vec::new();
        match glob(&token) {
            Ok(paths) => {
                for entry in paths {
                    match entry {
                        Ok(path) => matches.push(path.display().to_string()),
                        Err(err) => debug!("glob entry skipped: {err}"),
                    }
                }
            }
            Err(err) => debug!("glob pattern rejected: {err}"),
        }
        if matches.is_empty() {
            expanded.push(token);
        } else {
            expanded.extend(matches);
        }
    }
    expanded
}

pub fn has_glob_chars(token: &str) -> bool {
    token.contains(['*', '?'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tempfile::tempdir;

    #[test]
    fn matching_pattern_becomes_one_argument_per_match() {
        let dir = tempdir().unwrap();
        let p1 = dir.path().join("a.rs");
        let p2 = dir.path().join("b.rs");
        let p3 = dir.path().join("c.txt");
        std::fs::write(&p1, "a").unwrap();
        std::fs::write(&p2, "b").unwrap();
        std::fs::write(&p3, "c").unwrap();

        let pattern = format!("{}/*.rs", dir.path().display());
        let expanded = expand_globs(vec![pattern]);
        assert_eq!(expanded.len(), 2);
        assert!(expanded.contains(&p1.display().to_string()));
        assert!(expanded.contains(&p2.display().to_string()));
    }

    #[test]
    fn no_match_keeps_literal_token() {
        let dir = tempdir().unwrap();
        let pattern = format!("{}/nope*", dir.path().display());
        let expanded = expand_globs(vec![pattern.clone()]);
        assert_eq!(expanded, vec![pattern]);
    }

    #[test]
    fn tokens_without_wildcards_are_untouched() {
        let tokens = vec!["echo".to_string(), "no-wildcards".to_string()];
        assert_eq!(expand_globs(tokens.clone()), tokens);
    }

    proptest! {
        #[test]
        fn plain_tokens_have_no_glob_chars(s in "[^*?]{0,32}") {
            prop_assert!(!has_glob_chars(&s));
        }

        #[test]
        fn wildcard_is_detected(
            prefix in "[a-z]{0,16}",
            suffix in "[a-z]{0,16}",
            wildcard in prop_oneof![Just('*'), Just('?')],
        ) {
            let mut input = prefix;
            input.push(wildcard);
            input.push_str(&suffix);
            prop_assert!(has_glob_chars(&input));
        }
    }
}

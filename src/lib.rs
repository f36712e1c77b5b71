//! Tokenizer and expansion helpers for the shell.
//!
//! This crate exposes a minimal API so fuzz targets and integration tests
//! can link the line-interpretation logic without pulling in the
//! interactive stack.

mod error;
mod expansion;
mod parse;

pub use error::{ErrorKind, ShellError, ShellResult};
pub use expansion::{
    expand_globs, expand_tilde, expand_token, expand_tokens, has_glob_chars, ExpansionContext,
};
pub use parse::parse_line;

/// Fuzz helper for tokenizer-only targets.
pub fn fuzz_parse_bytes(data: &[u8]) {
    let input = String::from_utf8_lossy(data);
    let _ = parse::parse_line(&input);
}

/// Fuzz helper for tokenizer+expansion targets.
pub fn fuzz_expand_bytes(data: &[u8]) {
    let input = String::from_utf8_lossy(data);
    let ctx = ExpansionContext {
        lookup_var: Box::new(|_| Some(String::new())),
        command_subst: Box::new(|_| Ok(String::new())),
    };
    if let Ok(tokens) = parse::parse_line(&input) {
        if let Ok(tokens) = expansion::expand_tokens(tokens, &ctx) {
            let _ = expansion::expand_globs(tokens);
        }
    }
}

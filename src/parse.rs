//! Tokenizer for shell input.
//!
//! An explicit four-state machine (Normal/Quoted/Bracketed/BracketedQuoted)
//! splits a raw line into argument tokens. Whitespace separates tokens only
//! at bracket depth zero outside quotes; inside quotes or parens it is
//! copied through. Quotes are stripped from the token text, parens are kept
//! (they are structural for depth tracking only).

use crate::error::{ErrorKind, ShellError, ShellResult};

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum ParseMode {
    Normal,
    Quoted,
    Bracketed,
    BracketedQuoted,
}

pub const COMMENT_CHAR: char = '#';

/// Tokenize one line. `Ok(vec![])` is the empty-command signal, distinct
/// from a syntax error.
pub fn parse_line(input: &str) -> ShellResult<Vec<String>> {
    let mut tokens = Vec::new();
    let mut buf = String::new();
    let mut chars = input.chars().peekable();
    let mut mode = ParseMode::Normal;
    // Signed so a stray ) still shows up as a mismatch at the end.
    let mut depth = 0i32;

    while let Some(ch) = chars.next() {
        // The comment character and a line break end tokenization in every
        // mode; the depth/quote checks below decide whether that is an error.
        if ch == COMMENT_CHAR || ch == '\n' {
            break;
        }
        match mode {
            ParseMode::Normal => match ch {
                ' ' | '\t' => {
                    if !buf.is_empty() {
                        tokens.push(std::mem::take(&mut buf));
                    }
                }
                '\'' => mode = ParseMode::Quoted,
                '(' => {
                    depth += 1;
                    buf.push('(');
                    mode = bracket_mode(depth);
                }
                ')' => {
                    depth -= 1;
                    buf.push(')');
                    mode = bracket_mode(depth);
                }
                '\\' => push_escaped(&mut buf, &mut chars),
                _ => buf.push(ch),
            },
            ParseMode::Quoted => {
                if ch == '\'' {
                    mode = ParseMode::Normal;
                } else {
                    buf.push(ch);
                }
            }
            ParseMode::Bracketed => match ch {
                '\'' => mode = ParseMode::BracketedQuoted,
                '(' => {
                    depth += 1;
                    buf.push('(');
                }
                ')' => {
                    depth -= 1;
                    buf.push(')');
                    mode = bracket_mode(depth);
                }
                '\\' => push_escaped(&mut buf, &mut chars),
                _ => buf.push(ch),
            },
            ParseMode::BracketedQuoted => {
                if ch == '\'' {
                    mode = ParseMode::Bracketed;
                } else {
                    buf.push(ch);
                }
            }
        }
    }

    if depth != 0 {
        return Err(ShellError::new(ErrorKind::Parse, "mismatched brackets")
            .with_context("a ( has no matching ), or the other way around")
            .with_position(input.len().saturating_sub(1)));
    }
    if matches!(mode, ParseMode::Quoted | ParseMode::BracketedQuoted) {
        return Err(ShellError::new(ErrorKind::Parse, "mismatched quotes")
            .with_context("a ' has no closing '")
            .with_position(input.len().saturating_sub(1)));
    }

    if !buf.is_empty() {
        tokens.push(buf);
    }
    Ok(tokens)
}

fn bracket_mode(depth: i32) -> ParseMode {
    if depth == 0 {
        ParseMode::Normal
    } else {
        ParseMode::Bracketed
    }
}

// `\'` and `\\` emit the escaped character; any other escape silently drops
// both the backslash and the character after it. A trailing backslash is
// dropped too. Historical behavior, kept on purpose.
fn push_escaped<I>(buf: &mut String, chars: &mut std::iter::Peekable<I>)
where
    I: Iterator<Item = char>,
{
    match chars.next() {
        Some('\'') => buf.push('\''),
        Some('\\') => buf.push('\\'),
        _ => {}
    }
}

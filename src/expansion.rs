//! Expansion rewrites each token in a fixed order: tilde substitution, then
//! inline command substitution, then globbing. A substitution result may
//! contain wildcards that the glob pass picks up, never the other way
//! around.
//!
//! The expander reaches the outside world only through the capabilities in
//! [`ExpansionContext`], so tests can drive it without touching the
//! environment or the process table.

use crate::error::{ErrorKind, ShellError, ShellResult};

mod glob;

pub use glob::{expand_globs, has_glob_chars};

type LookupVar<'a> = Box<dyn Fn(&str) -> Option<String> + 'a>;
type CommandSubst<'a> = Box<dyn Fn(&str) -> ShellResult<String> + 'a>;

pub struct ExpansionContext<'a> {
    pub lookup_var: LookupVar<'a>,
    /// Evaluates an expression in a subshell and returns its captured
    /// output, trailing newline already stripped.
    pub command_subst: CommandSubst<'a>,
}

/// Tilde and command substitution over a whole token list. Globbing is a
/// separate pass ([`expand_globs`]) because it is the only step that can
/// change the number of arguments.
pub fn expand_tokens(
    tokens: Vec<String>,
    ctx: &ExpansionContext<'_>,
) -> ShellResult<Vec<String>> {
    let mut expanded = Vec::with_capacity(tokens.len());
    for token in tokens {
        expanded.push(expand_token(&token, ctx)?);
    }
    Ok(expanded)
}

pub fn expand_token(token: &str, ctx: &ExpansionContext<'_>) -> ShellResult<String> {
    let home = (ctx.lookup_var)("HOME");
    let token = expand_tilde(token, home.as_deref());
    expand_substitutions(token, ctx)
}

/// Replace each `~` with the value of HOME, rescanning from the start after
/// every replacement. When HOME is unavailable the remaining text is left
/// literal and the session carries on.
pub fn expand_tilde(token: &str, home: Option<&str>) -> String {
    let mut out = token.to_string();
    while let Some(pos) = out.find('~') {
        let Some(home) = home else {
            let err = ShellError::new(ErrorKind::Lookup, "HOME is not set; leaving '~' alone");
            eprintln!("tosh: {err}");
            break;
        };
        out.replace_range(pos..pos + 1, home);
    }
    out
}

// A `$` introduces an inline substitution: `$(expr)` spans to the first `)`
// (no nesting awareness), a bare `$expr` spans to the next whitespace or the
// end of the token. The whole span, `$` and parens included, is replaced by
// the evaluated output, and the token is rescanned until no `$` remains.
fn expand_substitutions(mut token: String, ctx: &ExpansionContext<'_>) -> ShellResult<String> {
    while let Some(start) = token.find('$') {
        let rest = &token[start + 1..];
        let (span_len, expr) = if let Some(inner) = rest.strip_prefix('(') {
            match inner.find(')') {
                Some(close) => (close + 2, inner[..close].to_string()),
                // An unterminated `$(` can only arrive through quoting (the
                // tokenizer balances bare parens); take the rest of the
                // token as the expression.
                None => (rest.len(), inner.to_string()),
            }
        } else {
            let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
            (end, rest[..end].to_string())
        };
        let output = (ctx.command_subst)(&expr)?;
        token.replace_range(start..start + 1 + span_len, &output);
    }
    Ok(token)
}

//! Recursive evaluation of inline substitution expressions.
//!
//! An expression is executed by a fresh, non-interactive instance of this
//! same shell: spawn our own executable with piped stdin/stdout, feed it the
//! expression as a single line, close the pipe so the child sees
//! end-of-input after one pass, then drain whatever it printed. Nested
//! substitutions recurse as real processes, bounded only by what the OS
//! will allow.

use std::env;
use std::io::{self, Write};
use std::path::Path;
use std::process::{Command, Stdio};

use log::debug;

/// Evaluate `expr` in a subshell and return its captured standard output
/// with exactly one trailing newline stripped. Empty output is an empty
/// string, not an error.
pub fn evaluate(expr: &str) -> io::Result<String> {
    let exe = env::current_exe()?;
    evaluate_with(&exe, expr)
}

/// The interpreter is a parameter so tests can stand in something that is
/// not this binary.
pub fn evaluate_with(interpreter: &Path, expr: &str) -> io::Result<String> {
    debug!("subshell spawn interpreter={} expr={expr:?}", interpreter.display());
    let mut child = Command::new(interpreter)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(expr.as_bytes())?;
        stdin.write_all(b"\n")?;
        // Dropping the handle closes the write end, so the child sees EOF
        // after its single line.
    }

    let output = child.wait_with_output()?;
    debug!(
        "subshell exit status={} captured={} bytes",
        output.status,
        output.stdout.len()
    );
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    // These drive `cat` as a stand-in interpreter: it echoes the expression
    // line back, which is exactly the shape of a captured subshell result.

    fn run_cat(expr: &str) -> io::Result<String> {
        evaluate_with(Path::new("cat"), expr)
    }

    #[test]
    fn captures_output_and_strips_one_newline() {
        match run_cat("hello") {
            Ok(text) => assert_eq!(text, "hello"),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                eprintln!("cat not found; skipping test");
            }
            Err(err) => panic!("unexpected error: {err}"),
        }
    }

    #[test]
    fn strips_exactly_one_trailing_newline() {
        match run_cat("a\nb") {
            Ok(text) => assert_eq!(text, "a\nb"),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                eprintln!("cat not found; skipping test");
            }
            Err(err) => panic!("unexpected error: {err}"),
        }
    }

    #[test]
    fn empty_expression_yields_empty_string() {
        match run_cat("") {
            Ok(text) => assert_eq!(text, ""),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                eprintln!("cat not found; skipping test");
            }
            Err(err) => panic!("unexpected error: {err}"),
        }
    }

    #[test]
    fn missing_interpreter_is_an_error() {
        let err = evaluate_with(Path::new("/no/such/interpreter"), "x").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}

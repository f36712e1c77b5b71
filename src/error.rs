//! Error types and reporting for the shell.
//!
//! Functions return `ShellError` instead of bare strings so callers can tell
//! a syntax error from a failed lookup or a failed launch. Every kind except
//! an allocation failure (which aborts the process outright) is handled at
//! the loop iteration that produced it; nothing here unwinds the session.

use std::fmt;

/// Categorized error types for better diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Syntax error during tokenization
    Parse,
    /// Error during tilde/substitution/glob expansion
    Expansion,
    /// A required environment value (HOME, USER, hostname) was unavailable
    Lookup,
    /// Error launching or waiting on a command
    Execution,
    /// Error loading configuration
    Config,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ErrorKind::Parse => write!(f, "parse error"),
            ErrorKind::Expansion => write!(f, "expansion error"),
            ErrorKind::Lookup => write!(f, "lookup error"),
            ErrorKind::Execution => write!(f, "execution error"),
            ErrorKind::Config => write!(f, "config error"),
        }
    }
}

/// Rich error type with context information
#[derive(Debug, Clone)]
pub struct ShellError {
    pub kind: ErrorKind,
    pub message: String,
    /// Additional context explaining what was being processed
    pub context: Option<String>,
    /// Character position in input where the error occurred
    pub position: Option<usize>,
}

impl ShellError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        ShellError {
            kind,
            message: message.into(),
            context: None,
            position: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_position(mut self, pos: usize) -> Self {
        self.position = Some(pos);
        self
    }

    /// Format the error with a snippet of the input showing where the
    /// problem is.
    pub fn display_with_input(&self, input: &str) -> String {
        let mut msg = format!("{}: {}", self.kind, self.message);

        if let Some(pos) = self.position {
            if pos < input.len() {
                let start = pos.saturating_sub(15);
                let end = (pos + 15).min(input.len());
                let snippet = &input[start..end];

                msg.push_str(&format!("\n  near: '{}'", snippet));
                msg.push('\n');

                let offset = pos - start;
                msg.push_str(&format!("  {}{}", " ".repeat(offset + 9), "^"));
            } else {
                msg.push_str(&format!("\n  at position {} (end of input)", pos));
            }
        } else if let Some(context) = &self.context {
            msg.push_str(&format!("\n  hint: {}", context));
        }

        msg
    }

    pub fn display_simple(&self) -> String {
        let mut msg = format!("{}: {}", self.kind, self.message);
        if let Some(context) = &self.context {
            msg.push_str(&format!("\n  hint: {}", context));
        }
        msg
    }
}

impl fmt::Display for ShellError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.display_simple())
    }
}

impl std::error::Error for ShellError {}

/// Convenience type alias for Results with ShellError
pub type ShellResult<T> = Result<T, ShellError>;

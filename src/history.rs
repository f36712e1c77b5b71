use std::env;
use std::fs::{File, OpenOptions};
use std::io::Write;

use log::debug;

use crate::expansion::expand_tilde;

/// Append-only recorder for accepted input lines. A recorder that failed to
/// open stays quiet for the rest of the session instead of failing reads.
pub struct HistoryRecorder {
    file: Option<File>,
}

impl HistoryRecorder {
    pub fn open(path_option: &str) -> Self {
        let path = expand_tilde(path_option, env::var("HOME").ok().as_deref());
        match OpenOptions::new().create(true).append(true).open(&path) {
            Ok(file) => {
                debug!("recording history to {path}");
                Self { file: Some(file) }
            }
            Err(err) => {
                eprintln!("tosh: could not open history file {path}: {err}");
                Self { file: None }
            }
        }
    }

    /// A recorder that drops everything, for non-interactive passes.
    pub fn disabled() -> Self {
        Self { file: None }
    }

    /// Record one raw line. Empty lines are accepted and ignored.
    pub fn record(&mut self, line: &str) {
        let Some(file) = self.file.as_mut() else {
            return;
        };
        if line.is_empty() {
            return;
        }
        if let Err(err) = writeln!(file, "{line}") {
            eprintln!("tosh: could not write to the history file: {err}");
        }
    }
}

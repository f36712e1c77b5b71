use std::env;
use std::fs;
use std::io;

use log::debug;

use crate::error::{ErrorKind, ShellError, ShellResult};
use crate::expansion::expand_tilde;

pub const VERBOSE_VAR: &str = "TOSH_VERBOSE";
pub const DEBUG_VAR: &str = "TOSH_DEBUG";
pub const INTERACTIVE_VAR: &str = "TOSH_INTERACTIVE";
pub const PROMPT_VAR: &str = "TOSH_PROMPT";
pub const HIST_PATH_VAR: &str = "TOSH_HIST_PATH";
pub const CONFIG_PATH_VAR: &str = "TOSH_CONFIG_PATH";

/// Session options, refreshed from the environment once per loop iteration
/// and treated as immutable for the rest of that iteration.
#[derive(Clone, Debug)]
pub struct Options {
    pub verbose: bool,
    pub debug: bool,
    pub force_interactive: bool,
    pub prompt: String,
    pub history_path: String,
    pub config_path: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            verbose: false,
            debug: false,
            force_interactive: false,
            prompt: "%n@%h %p2r ⟡ ".to_string(),
            history_path: "~/.tosh_history".to_string(),
            config_path: "~/.toshrc".to_string(),
        }
    }
}

impl Options {
    /// Align with the TOSH_* environment variables: a variable that exists
    /// wins over the internal value, one that does not is seeded from it.
    pub fn sync_env(&mut self) {
        self.verbose = sync_flag(VERBOSE_VAR, self.verbose);
        self.debug = sync_flag(DEBUG_VAR, self.debug);
        self.force_interactive = sync_flag(INTERACTIVE_VAR, self.force_interactive);
        self.prompt = sync_value(PROMPT_VAR, &self.prompt);
        self.history_path = sync_value(HIST_PATH_VAR, &self.history_path);
        self.config_path = sync_value(CONFIG_PATH_VAR, &self.config_path);
    }
}

fn sync_value(key: &str, current: &str) -> String {
    match env::var(key) {
        Ok(value) => value,
        Err(_) => {
            env::set_var(key, current);
            current.to_string()
        }
    }
}

fn sync_flag(key: &str, current: bool) -> bool {
    match env::var(key) {
        Ok(value) => value == "ON",
        Err(_) => {
            env::set_var(key, if current { "ON" } else { "OFF" });
            current
        }
    }
}

/// Load the rc file named by the config-path option, if there is one. Each
/// directive is `KEY=VALUE` (value optionally quoted) and lands in the
/// environment, where the next sync picks it up. A missing file is not an
/// error; malformed lines are reported with their line number and skipped.
pub fn load_config_file(options: &Options) -> ShellResult<()> {
    let path = expand_tilde(&options.config_path, env::var("HOME").ok().as_deref());
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(err) => {
            return Err(ShellError::new(
                ErrorKind::Config,
                format!("could not read {path}: {err}"),
            ));
        }
    };
    debug!("loading config from {path}");

    for (idx, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            eprintln!("config:{}: unrecognized directive", idx + 1);
            continue;
        };
        let key = key.trim();
        if !is_valid_var_name(key) {
            eprintln!("config:{}: invalid variable name '{key}'", idx + 1);
            continue;
        }
        env::set_var(key, strip_quotes(value.trim()));
    }

    Ok(())
}

fn is_valid_var_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(ch) if ch == '_' || ch.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|ch| ch == '_' || ch.is_ascii_alphanumeric())
}

fn strip_quotes(input: &str) -> &str {
    let bytes = input.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        let last = bytes[bytes.len() - 1];
        if (first == b'"' && last == b'"') || (first == b'\'' && last == b'\'') {
            return &input[1..bytes.len() - 1];
        }
    }
    input
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn sync_seeds_missing_env_vars_from_defaults() {
        env::remove_var(PROMPT_VAR);
        env::remove_var(VERBOSE_VAR);
        let mut options = Options::default();
        options.sync_env();
        assert_eq!(env::var(PROMPT_VAR).unwrap(), options.prompt);
        assert_eq!(env::var(VERBOSE_VAR).unwrap(), "OFF");
        assert!(!options.verbose);
    }

    #[test]
    #[serial]
    fn sync_adopts_existing_env_values() {
        env::set_var(VERBOSE_VAR, "ON");
        env::set_var(PROMPT_VAR, "> ");
        let mut options = Options::default();
        options.sync_env();
        assert!(options.verbose);
        assert_eq!(options.prompt, "> ");
        env::remove_var(VERBOSE_VAR);
        env::remove_var(PROMPT_VAR);
    }

    #[test]
    #[serial]
    fn flag_values_other_than_on_read_as_off() {
        env::set_var(DEBUG_VAR, "yes please");
        let mut options = Options::default();
        options.sync_env();
        assert!(!options.debug);
        env::remove_var(DEBUG_VAR);
    }

    #[test]
    #[serial]
    fn config_file_assignments_land_in_environment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("toshrc");
        std::fs::write(
            &path,
            "# a comment\n\nTOSH_TEST_CFG=hello\nBAD LINE\nTOSH_TEST_QUOTED='a b'\n",
        )
        .unwrap();

        let options = Options {
            config_path: path.display().to_string(),
            ..Options::default()
        };
        load_config_file(&options).unwrap();
        assert_eq!(env::var("TOSH_TEST_CFG").unwrap(), "hello");
        assert_eq!(env::var("TOSH_TEST_QUOTED").unwrap(), "a b");
        env::remove_var("TOSH_TEST_CFG");
        env::remove_var("TOSH_TEST_QUOTED");
    }

    #[test]
    fn missing_config_file_is_fine() {
        let options = Options {
            config_path: "/no/such/dir/toshrc".to_string(),
            ..Options::default()
        };
        assert!(load_config_file(&options).is_ok());
    }

    #[test]
    fn variable_name_validation() {
        assert!(is_valid_var_name("TOSH_PROMPT"));
        assert!(is_valid_var_name("_x1"));
        assert!(!is_valid_var_name("1x"));
        assert!(!is_valid_var_name("a-b"));
        assert!(!is_valid_var_name(""));
    }
}

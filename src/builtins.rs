use std::env;
use std::ffi::CString;
use std::path::PathBuf;

use log::debug;

use crate::colors::{BOLD, RESET};
use crate::ShellState;

/// Builtin names, in the order `help` lists them.
pub const BUILTINS: [&str; 4] = ["cd", "exec", "help", "quit"];

pub fn is_builtin(cmd: Option<&str>) -> bool {
    matches!(cmd, Some("cd" | "exec" | "help" | "quit"))
}

/// Run a builtin. The return value is the continue signal: only `quit`
/// stops the session.
pub fn execute_builtin(state: &mut ShellState, args: &[String]) -> bool {
    match args.first().map(String::as_str) {
        Some("cd") => cd(&mut state.prev_dir, args),
        Some("exec") => exec_replace(args),
        Some("help") => help(),
        Some("quit") => quit(state.options.verbose),
        _ => true,
    }
}

/// `cd` with no argument goes home, `cd -` toggles to the previously
/// recorded directory. More than one argument is a user error, not a fatal
/// one.
fn cd(prev_dir: &mut Option<PathBuf>, args: &[String]) -> bool {
    if args.len() > 2 {
        eprintln!("cd: too many arguments");
        return true;
    }
    let target = match args.get(1).map(String::as_str) {
        None => match env::var("HOME") {
            Ok(home) => PathBuf::from(home),
            Err(_) => {
                eprintln!("cd: HOME is not set");
                return true;
            }
        },
        Some("-") => match prev_dir.clone() {
            Some(prev) => prev,
            None => {
                eprintln!("cd: no previous directory");
                return true;
            }
        },
        Some(path) => PathBuf::from(path),
    };

    let old = env::current_dir().ok();
    if let Err(err) = env::set_current_dir(&target) {
        eprintln!("cd: {}: {err}", target.display());
    } else {
        debug!("cd to {}", target.display());
        *prev_dir = old;
    }
    true
}

/// Replace the shell's own process image. On success this never returns to
/// the session loop.
fn exec_replace(args: &[String]) -> bool {
    if args.len() < 2 {
        eprintln!("exec: expected a program to run");
        return true;
    }
    match build_argv(&args[1..]) {
        Ok(argv) => {
            debug!("exec replacing image with {}", args[1]);
            if let Err(err) = nix::unistd::execvp(&argv[0], &argv) {
                eprintln!("exec: {}: {err}", args[1]);
            }
        }
        Err(err) => eprintln!("exec: {err}"),
    }
    true
}

fn build_argv(args: &[String]) -> Result<Vec<CString>, String> {
    args.iter()
        .map(|arg| {
            CString::new(arg.as_bytes())
                .map_err(|_| format!("argument contains a null byte: {arg:?}"))
        })
        .collect()
}

fn help() -> bool {
    println!("{BOLD}tosh — a very simple shell{RESET}");
    println!("Type a program name and its arguments, then press enter.");
    println!("The following commands are built in:");
    for name in BUILTINS {
        println!("  {name}");
    }
    true
}

fn quit(verbose: bool) -> bool {
    if verbose {
        println!("bye");
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn builtin_lookup_is_exact_and_case_sensitive() {
        assert!(is_builtin(Some("cd")));
        assert!(is_builtin(Some("quit")));
        assert!(!is_builtin(Some("CD")));
        assert!(!is_builtin(Some("cdd")));
        assert!(!is_builtin(None));
    }

    #[test]
    fn quit_is_the_only_stop_signal() {
        assert!(!quit(false));
        assert!(help());
    }

    #[test]
    fn cd_with_too_many_arguments_is_reported_not_fatal() {
        let mut prev = None;
        let args: Vec<String> = ["cd", "a", "b"].iter().map(|s| s.to_string()).collect();
        assert!(cd(&mut prev, &args));
        assert!(prev.is_none());
    }

    #[test]
    #[serial]
    fn cd_dash_toggles_between_directories() {
        let saved = env::current_dir().unwrap();
        let dir_a = tempfile::tempdir().unwrap();
        let dir_b = tempfile::tempdir().unwrap();

        let mut prev = None;
        let to = |p: &std::path::Path| vec!["cd".to_string(), p.display().to_string()];
        assert!(cd(&mut prev, &to(dir_a.path())));
        assert!(cd(&mut prev, &to(dir_b.path())));

        let dash: Vec<String> = vec!["cd".to_string(), "-".to_string()];
        assert!(cd(&mut prev, &dash));
        assert_eq!(
            env::current_dir().unwrap().canonicalize().unwrap(),
            dir_a.path().canonicalize().unwrap()
        );
        // Toggling again returns to where we came from.
        assert!(cd(&mut prev, &dash));
        assert_eq!(
            env::current_dir().unwrap().canonicalize().unwrap(),
            dir_b.path().canonicalize().unwrap()
        );

        env::set_current_dir(saved).unwrap();
    }

    #[test]
    #[serial]
    fn cd_failure_keeps_previous_directory_record() {
        let saved = env::current_dir().unwrap();
        let mut prev = Some(saved.clone());
        let args: Vec<String> = vec!["cd".to_string(), "/no/such/dir".to_string()];
        assert!(cd(&mut prev, &args));
        assert_eq!(prev, Some(saved.clone()));
        assert_eq!(env::current_dir().unwrap(), saved);
    }
}

use std::io;
use std::os::unix::process::ExitStatusExt;
use std::process::{Command, ExitStatus};

use log::debug;

use crate::builtins::{execute_builtin, is_builtin};
use crate::error::{ErrorKind, ShellError};
use crate::ShellState;

/// Decide builtin versus external for one argument vector and run it. The
/// return value is the continue signal for the session loop.
pub fn dispatch(state: &mut ShellState, args: &[String]) -> bool {
    let Some(name) = args.first().map(String::as_str) else {
        // Nothing typed in.
        if state.options.verbose && state.tty {
            println!("...what do you want to do?");
        }
        return true;
    };

    if is_builtin(Some(name)) {
        if state.options.verbose {
            println!("[running builtin {name}]");
        }
        return execute_builtin(state, args);
    }

    launch(state, args)
}

/// Launch an external program, inheriting our stdio, and wait for it. A
/// failing child never stops the session.
fn launch(state: &ShellState, args: &[String]) -> bool {
    let mut command = Command::new(&args[0]);
    command.args(&args[1..]);

    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(err) => {
            let err = ShellError::new(ErrorKind::Execution, spawn_error_message(&args[0], &err));
            eprintln!("tosh: {err}");
            return true;
        }
    };
    if state.options.verbose {
        println!("[launching {} with pid {}]", args[0], child.id());
    }
    debug!("launch program={} pid={}", args[0], child.id());

    match child.wait() {
        Ok(status) => {
            debug!(
                "launch done program={} code={}",
                args[0],
                exit_status_code(status)
            );
            if state.options.verbose {
                println!("[{} terminated: {}]", args[0], describe_status(status));
            }
        }
        Err(err) => eprintln!("tosh: wait failed: {err}"),
    }
    true
}

/// Human-readable termination status: exit code, or the signal that killed
/// the child.
pub fn describe_status(status: ExitStatus) -> String {
    if let Some(code) = status.code() {
        format!("exit code {code}")
    } else if let Some(sig) = status.signal() {
        format!("signal {sig}")
    } else {
        "unknown status".to_string()
    }
}

/// Numeric form: the exit code, or 128 plus the terminating signal.
pub fn exit_status_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        code
    } else if let Some(sig) = status.signal() {
        128 + sig
    } else {
        1
    }
}

fn spawn_error_message(cmd: &str, err: &io::Error) -> String {
    match err.kind() {
        io::ErrorKind::NotFound => format!("{cmd}: command not found"),
        io::ErrorKind::PermissionDenied => format!("{cmd}: permission denied"),
        _ => format!("{cmd}: {err}"),
    }
}

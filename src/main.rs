use std::env;
use std::fs::File;
use std::io::{self, Write};
use std::os::fd::IntoRawFd;
use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use log::debug;
use rustyline::history::DefaultHistory;
use rustyline::{Config, Editor};

mod builtins;
mod colors;
mod config;
mod error;
mod execution;
mod expansion;
mod history;
mod io_helpers;
mod parse;
mod prompt;
mod signals;
mod subshell;

use config::Options;
use error::{ErrorKind, ShellError};
use expansion::{expand_globs, expand_tokens, ExpansionContext};
use history::HistoryRecorder;
use io_helpers::read_input_line;
use parse::parse_line;
use prompt::render_prompt;

fn main() {
    let mut options = Options::default();
    parse_args(&mut options);
    init_logging(&options);

    // Seed the environment from defaults and flags, give the rc file a
    // chance to override, then adopt the result.
    options.sync_env();
    if let Err(err) = config::load_config_file(&options) {
        eprintln!("tosh: {err}");
    }
    options.sync_env();

    let sigint = match signals::install_sigint_flag() {
        Ok(flag) => flag,
        Err(err) => {
            eprintln!("tosh: {err}");
            return;
        }
    };

    let tty = unsafe { libc::isatty(libc::STDIN_FILENO) == 1 };

    let editor_config = Config::builder().auto_add_history(true).build();
    let editor = match Editor::<(), DefaultHistory>::with_config(editor_config) {
        Ok(editor) => editor,
        Err(err) => {
            eprintln!("tosh: {err}");
            return;
        }
    };

    // Only interactive sessions record; a subshell pass must not.
    let history = if tty {
        HistoryRecorder::open(&options.history_path)
    } else {
        HistoryRecorder::disabled()
    };

    let mut state = ShellState {
        editor,
        options,
        history,
        prev_dir: None,
        tty,
        sigint,
    };

    debug!("session loop starting interactive={}", state.tty);
    while run_once(&mut state) {}
    debug!("session loop finished");
}

fn init_logging(options: &Options) {
    let default = if options.debug || env::var(config::DEBUG_VAR).as_deref() == Ok("ON") {
        "debug"
    } else {
        "info"
    };
    let env = env_logger::Env::default().filter_or("TOSH_LOG", default);
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .try_init();
}

/// `-v` verbose, `-d` debug, `-i` force the prompt on. A non-flag argument
/// names a file whose contents replace standard input; anything after it is
/// ignored.
fn parse_args(options: &mut Options) {
    for arg in env::args().skip(1) {
        match arg.strip_prefix('-') {
            Some(flags) => {
                for ch in flags.chars() {
                    match ch {
                        'v' => options.verbose = true,
                        'd' => options.debug = true,
                        'i' => options.force_interactive = true,
                        other => eprintln!("tosh: unknown option '{other}'"),
                    }
                }
            }
            None => {
                redirect_stdin(&arg);
                return;
            }
        }
    }
}

// The equivalent of freopen(path, "r", stdin): every later read, tty check
// included, sees the file.
fn redirect_stdin(path: &str) {
    match File::open(path) {
        Ok(file) => {
            let fd = file.into_raw_fd();
            let rc = unsafe { libc::dup2(fd, libc::STDIN_FILENO) };
            if rc < 0 {
                eprintln!(
                    "tosh: could not redirect input from {path}: {}",
                    io::Error::last_os_error()
                );
            }
            unsafe { libc::close(fd) };
        }
        Err(err) => eprintln!("tosh: could not open {path}: {err}"),
    }
}

/// One pass of the session loop: refresh options, read, record, tokenize,
/// expand, dispatch. Returns the continue signal; everything that can go
/// wrong inside a pass is reported here and never escapes it.
fn run_once(state: &mut ShellState) -> bool {
    if state.sigint.swap(false, Ordering::SeqCst) {
        if state.options.verbose {
            println!("\nreceived an interrupt");
        }
        debug!("terminating on SIGINT");
        return false;
    }

    // Refresh once per iteration; fixed for the rest of it.
    state.options.sync_env();

    let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
    let show_prompt = state.tty || state.options.force_interactive;
    let prompt = if show_prompt {
        render_prompt(&state.options, &cwd)
    } else {
        String::new()
    };
    if show_prompt && !state.tty {
        print!("{prompt}");
        let _ = io::stdout().flush();
    }

    let line = match read_input_line(&mut state.editor, state.tty, &prompt) {
        Ok(Some(line)) => line,
        Ok(None) => {
            if state.tty {
                println!();
            }
            debug!("end of input");
            return false;
        }
        Err(err) => {
            eprintln!("tosh: read error: {err}");
            return false;
        }
    };

    let line = line.trim_end_matches(['\n', '\r']);
    if state.tty {
        state.history.record(line);
    }

    let tokens = match parse_line(line) {
        Ok(tokens) => tokens,
        Err(err) => {
            eprintln!("tosh: {}", err.display_with_input(line));
            return true;
        }
    };
    debug!("tokens: {tokens:?}");

    let ctx = build_expansion_context();
    let args = match expand_tokens(tokens, &ctx) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("tosh: {err}");
            return true;
        }
    };
    let args = expand_globs(args);
    debug!("argv: {args:?}");

    execution::dispatch(state, &args)
}

fn build_expansion_context() -> ExpansionContext<'static> {
    ExpansionContext {
        lookup_var: Box::new(|name| env::var(name).ok()),
        command_subst: Box::new(|expr| {
            subshell::evaluate(expr).map_err(|err| {
                ShellError::new(
                    ErrorKind::Expansion,
                    format!("command substitution failed: {err}"),
                )
            })
        }),
    }
}

struct ShellState {
    editor: Editor<(), DefaultHistory>,
    options: Options,
    history: HistoryRecorder,
    prev_dir: Option<PathBuf>,
    tty: bool,
    sigint: Arc<AtomicBool>,
}

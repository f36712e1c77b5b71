use std::env;
use std::path::Path;

use crate::colors::{GREEN, RAINBOW, RED, RESET};
use crate::config::Options;

/// Render the prompt from the template in the options. Specifiers: `%n`
/// username, `%h` hostname, `%p` working directory (`%pN` shows only the
/// last N components, a trailing `r` colours them from the rainbow palette).
/// A failed lookup reports and skips that specifier; everything else is
/// copied through.
pub fn render_prompt(options: &Options, cwd: &Path) -> String {
    let mut out = String::new();
    let mut chars = options.prompt.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '%' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => match env::var("USER") {
                Ok(user) => {
                    out.push_str(RED);
                    out.push_str(&user);
                    out.push_str(RESET);
                }
                Err(_) => eprintln!("tosh: could not look up your username"),
            },
            Some('h') => match nix::unistd::gethostname() {
                Ok(name) => {
                    out.push_str(GREEN);
                    out.push_str(&name.to_string_lossy());
                    out.push_str(RESET);
                }
                Err(err) => eprintln!("tosh: could not look up the hostname: {err}"),
            },
            Some('p') => {
                let mut levels = 0usize;
                while let Some(digit) = chars.peek().and_then(|c| c.to_digit(10)) {
                    levels = levels * 10 + digit as usize;
                    chars.next();
                }
                let rainbow = chars.peek() == Some(&'r');
                if rainbow {
                    chars.next();
                }
                out.push_str(&render_path(cwd, levels, rainbow));
            }
            // Unknown specifiers are dropped, specifier character included.
            Some(_) => {}
            None => {}
        }
    }
    out
}

// The historical rendering: each shown component is followed by a slash,
// with a leading slash only when the whole absolute path is shown.
fn render_path(path: &Path, levels: usize, rainbow: bool) -> String {
    let display = path.display().to_string();
    let components: Vec<&str> = display.split('/').filter(|c| !c.is_empty()).collect();
    let shown = if levels == 0 || levels > components.len() {
        components.len()
    } else {
        levels
    };

    let mut out = String::new();
    if display.starts_with('/') && shown == components.len() {
        out.push('/');
    }
    for (i, comp) in components[components.len() - shown..].iter().enumerate() {
        if rainbow {
            out.push_str(RAINBOW[i % RAINBOW.len()]);
        }
        out.push_str(comp);
        if rainbow {
            out.push_str(RESET);
        }
        out.push('/');
    }
    out
}

use std::io;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use log::debug;
use signal_hook::consts::signal::SIGINT;
use signal_hook::flag;

/// Register a flag raised on SIGINT. The session loop checks it at the
/// iteration boundary and shuts the shell down; there is no job-control
/// model to forward the interrupt through, and a foreground child shares
/// the terminal's process group so it receives the signal on its own.
pub fn install_sigint_flag() -> io::Result<Arc<AtomicBool>> {
    let interrupted = Arc::new(AtomicBool::new(false));
    flag::register(SIGINT, Arc::clone(&interrupted))?;
    debug!("signal event=install signal=SIGINT");
    Ok(interrupted)
}

//! Termination signals
//!
//! SIGINT and SIGTERM are blocked in every thread and picked up
//! synchronously by one watcher thread, which raises the stop flag. No code
//! runs in signal-handler context.

use std::io;
use std::mem::MaybeUninit;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use log::{error, info};

use pulsematrix_core::sync::StopFlag;

fn termination_set() -> libc::sigset_t {
    let mut set = MaybeUninit::<libc::sigset_t>::uninit();
    // SAFETY: sigemptyset initializes the set before sigaddset touches it;
    // both only fail on an invalid signal number.
    unsafe {
        libc::sigemptyset(set.as_mut_ptr());
        libc::sigaddset(set.as_mut_ptr(), libc::SIGINT);
        libc::sigaddset(set.as_mut_ptr(), libc::SIGTERM);
        set.assume_init()
    }
}

fn signal_name(signal: libc::c_int) -> &'static str {
    match signal {
        libc::SIGINT => "SIGINT",
        libc::SIGTERM => "SIGTERM",
        _ => "signal",
    }
}

/// Block SIGINT and SIGTERM in the calling thread
///
/// Call before spawning any thread so the mask is inherited everywhere.
pub fn block_termination() -> io::Result<()> {
    let set = termination_set();
    // SAFETY: `set` is initialized and the old mask is not requested.
    let ret = unsafe { libc::pthread_sigmask(libc::SIG_BLOCK, &set, std::ptr::null_mut()) };
    if ret != 0 {
        return Err(io::Error::from_raw_os_error(ret));
    }
    Ok(())
}

/// Start the thread that turns the first termination signal into a stop
/// request
pub fn spawn_watcher(stop: Arc<StopFlag>) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("signals".into())
        .spawn(move || {
            let set = termination_set();
            let mut signal: libc::c_int = 0;
            // SAFETY: both pointers reference live locals.
            let ret = unsafe { libc::sigwait(&set, &mut signal) };
            if ret != 0 {
                error!("sigwait failed: {}", io::Error::from_raw_os_error(ret));
                return;
            }
            info!("Received {}, shutting down", signal_name(signal));
            stop.request();
        })
}

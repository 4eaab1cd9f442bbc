//! Thread scheduling

use std::io;

/// Move the calling thread to `SCHED_FIFO` at `priority`
///
/// Needs `CAP_SYS_NICE` (or root); callers usually log the error and carry
/// on at normal priority.
pub fn set_realtime_priority(priority: i32) -> io::Result<()> {
    // SAFETY: sched_param is plain data; zeroed is a valid value on every
    // libc flavour, including the ones with extra reserved fields.
    let mut param: libc::sched_param = unsafe { std::mem::zeroed() };
    param.sched_priority = priority;

    // SAFETY: `pthread_self` is always valid for the calling thread and
    // `param` outlives the call.
    let ret = unsafe { libc::pthread_setschedparam(libc::pthread_self(), libc::SCHED_FIFO, &param) };
    if ret != 0 {
        return Err(io::Error::from_raw_os_error(ret));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_priority_rejected() {
        // SCHED_FIFO priorities stop at 99 on Linux
        let err = set_realtime_priority(1_000).unwrap_err();
        assert_eq!(err.raw_os_error(), Some(libc::EINVAL));
    }
}

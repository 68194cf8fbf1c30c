//! File descriptor limit management
//!
//! A connection-multiplexing tunnel holds roughly one descriptor per open
//! connection side, so the OS default ceiling is frequently insufficient.
//! These are thin wrappers over the rlimit syscalls: no retries, and a
//! failure is surfaced as-is for the caller to judge.

use thiserror::Error;

/// File descriptor limit error
#[derive(Error, Debug)]
pub enum LimitError {
    /// The OS rejected the requested ceiling
    #[error("failed to raise file descriptor limit to {0}: {1}")]
    Raise(u64, #[source] std::io::Error),

    /// The active limits could not be read
    #[error("failed to query file descriptor limit: {0}")]
    Query(#[source] std::io::Error),

    /// File descriptor limits do not exist on this platform
    #[error("file descriptor limits are not supported on this platform")]
    Unsupported,
}

/// Raise both the soft and hard open-file ceiling to `target`.
#[cfg(unix)]
pub fn raise(target: u64) -> Result<(), LimitError> {
    let limit = libc::rlimit {
        rlim_cur: target as libc::rlim_t,
        rlim_max: target as libc::rlim_t,
    };
    let rc = unsafe { libc::setrlimit(libc::RLIMIT_NOFILE, &limit) };
    if rc == 0 {
        Ok(())
    } else {
        Err(LimitError::Raise(target, std::io::Error::last_os_error()))
    }
}

#[cfg(unix)]
fn nofile() -> Result<libc::rlimit, LimitError> {
    let mut limit = libc::rlimit {
        rlim_cur: 0,
        rlim_max: 0,
    };
    let rc = unsafe { libc::getrlimit(libc::RLIMIT_NOFILE, &mut limit) };
    if rc == 0 {
        Ok(limit)
    } else {
        Err(LimitError::Query(std::io::Error::last_os_error()))
    }
}

/// The active soft open-file ceiling.
#[cfg(unix)]
pub fn current() -> Result<u64, LimitError> {
    Ok(nofile()?.rlim_cur as u64)
}

/// The active hard open-file ceiling.
#[cfg(unix)]
pub fn maximum() -> Result<u64, LimitError> {
    Ok(nofile()?.rlim_max as u64)
}

#[cfg(not(unix))]
pub fn raise(_target: u64) -> Result<(), LimitError> {
    Err(LimitError::Unsupported)
}

#[cfg(not(unix))]
pub fn current() -> Result<u64, LimitError> {
    Err(LimitError::Unsupported)
}

#[cfg(not(unix))]
pub fn maximum() -> Result<u64, LimitError> {
    Err(LimitError::Unsupported)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use serial_test::serial;

    fn privileged() -> bool {
        unsafe { libc::geteuid() == 0 }
    }

    #[test]
    #[serial]
    fn test_query_limits() {
        let soft = current().expect("should read soft limit");
        let hard = maximum().expect("should read hard limit");
        assert!(soft > 0, "soft limit should be positive");
        assert!(hard >= soft, "hard limit should be at least the soft limit");
    }

    #[test]
    #[serial]
    fn test_raise_to_hard_ceiling() {
        let hard = maximum().expect("should read hard limit");
        raise(hard).expect("raising to the hard ceiling should succeed");
        assert_eq!(current().unwrap(), hard);
        assert_eq!(maximum().unwrap(), hard);
    }

    #[test]
    #[serial]
    fn test_raise_beyond_hard_ceiling_fails() {
        let hard = maximum().expect("should read hard limit");
        if privileged() || hard == u64::MAX {
            // A privileged process may raise the hard ceiling at will, and
            // an unlimited ceiling leaves nothing to exceed.
            return;
        }

        let before = current().unwrap();
        let err = raise(hard + 1).expect_err("exceeding the hard ceiling should fail");
        match err {
            LimitError::Raise(target, _) => assert_eq!(target, hard + 1),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(current().unwrap(), before, "failed raise should leave the limit unchanged");
    }
}

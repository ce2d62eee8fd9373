//! Internal utilities.

use std::path::PathBuf;

/// Returns `true` if the process runs with an effective UID of 0.
#[cfg(unix)]
#[must_use]
pub fn is_elevated() -> bool {
    // SAFETY: `geteuid` has no preconditions and cannot fail.
    unsafe { libc::geteuid() == 0 }
}

/// Privilege is checked by the OS on write; assume not elevated.
#[cfg(not(unix))]
#[must_use]
pub const fn is_elevated() -> bool {
    false
}

/// Location of the system hosts file on this platform.
#[must_use]
pub fn default_hosts_path() -> PathBuf {
    if cfg!(windows) {
        PathBuf::from(r"C:\Windows\System32\drivers\etc\hosts")
    } else {
        PathBuf::from("/etc/hosts")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn elevation_matches_euid() {
        // SAFETY: see `is_elevated`.
        let euid = unsafe { libc::geteuid() };
        assert_eq!(is_elevated(), euid == 0);
    }

    #[test]
    fn default_path_names_hosts() {
        assert!(default_hosts_path().ends_with("hosts"));
    }
}

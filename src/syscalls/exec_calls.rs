//! Executable lookup and launch.
//!
//! POSIX keeps "no such program" and "found it but you may not run it"
//! apart, and a PATH-style search commits to the first name match instead
//! of hunting for a runnable alternative further down the list. Both rules
//! are load-bearing: callers diagnose a failed launch by exactly this
//! distinction.

use crate::constants::err_const::{get_errno, handle_errno, syscall_error, Errno};
use crate::interface::types::LaunchFailure;

use libc::c_char;
use std::ffi::CString;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

/// Ordered candidate directories for `launch_searched`. Always passed in
/// explicitly; the launcher never reads the process environment, so tests
/// and callers stay free of hidden cross-coupling through PATH.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPath {
    dirs: Vec<PathBuf>,
}

impl SearchPath {
    pub fn new(dirs: Vec<PathBuf>) -> SearchPath {
        SearchPath { dirs }
    }

    /// Build from a PATH-style colon-joined string.
    pub fn from_joined(joined: &str) -> SearchPath {
        SearchPath {
            dirs: std::env::split_paths(joined).collect(),
        }
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }
}

/// A probed candidate: where it is, and whether it is present but stripped
/// of execute permission. Lets a harness predict the launch failure kind
/// before attempting the launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutableCandidate {
    pub path: PathBuf,
    pub exec_denied: bool,
}

impl ExecutableCandidate {
    /// Probe `path` with access(2). None when nothing is there at all.
    pub fn probe(path: &Path) -> Option<ExecutableCandidate> {
        let c_path = CString::new(path.as_os_str().as_bytes()).unwrap();
        if unsafe { libc::access(c_path.as_ptr(), libc::F_OK) } != 0 {
            return None;
        }
        let exec_denied = unsafe { libc::access(c_path.as_ptr(), libc::X_OK) } != 0
            && unsafe { libc::access(c_path.as_ptr(), libc::R_OK) } == 0;
        Some(ExecutableCandidate {
            path: path.to_path_buf(),
            exec_denied,
        })
    }

    /// The failure a launch of this candidate must produce, or None when
    /// the candidate looks runnable.
    pub fn expected_failure(&self) -> Option<LaunchFailure> {
        if self.exec_denied {
            Some(LaunchFailure::PermissionDenied)
        } else {
            None
        }
    }
}

/// Reference to Linux: https://man7.org/linux/man-pages/man3/exec.3.html
///
/// Replace the current process image with the program at the literal
/// `path`, argv holding just the program path itself. Returns only when the
/// exec failed; an existing, readable file without the execute bit for the
/// caller is PermissionDenied, never NotFound.
pub fn launch_direct(path: &Path) -> LaunchFailure {
    let c_path = CString::new(path.as_os_str().as_bytes()).unwrap();
    let argv: [*const c_char; 2] = [c_path.as_ptr(), std::ptr::null()];
    unsafe { libc::execv(c_path.as_ptr(), argv.as_ptr()) };
    // only reached when execv failed
    let errno = get_errno();
    handle_errno(errno, "execv");
    LaunchFailure::from_errno(errno)
}

/// Scan `search` in order, joining each directory with `name`. The first
/// entry where the joined path exists terminates the scan; the outcome is
/// whatever launching that match produces, and a non-executable match is
/// never skipped in favor of a runnable one later in the list. No existing
/// candidate anywhere is NotFound.
pub fn launch_searched(name: &str, search: &SearchPath) -> LaunchFailure {
    for dir in search.dirs() {
        let candidate = dir.join(name);
        let c_path = CString::new(candidate.as_os_str().as_bytes()).unwrap();
        if unsafe { libc::access(c_path.as_ptr(), libc::F_OK) } == 0 {
            return launch_direct(&candidate);
        }
    }
    syscall_error(Errno::ENOENT, "execvp", "no searched entry matched");
    LaunchFailure::NotFound
}

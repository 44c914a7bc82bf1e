//! Typed results for the public surface.
//!
//! The low-level wrappers speak the negative-errno convention; these enums
//! are what callers actually match on. Each kernel failure maps to exactly
//! one variant, and the mapping is the contract, not an artifact of any
//! one kernel's internal check order.

use crate::constants::err_const::Errno;

use thiserror::Error;

/// (device, inode, size) of a filesystem object. Two lookups that agree on
/// all three fields are addressing the same underlying object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileIdentity {
    pub dev: u64,
    pub ino: u64,
    pub size: i64,
}

impl FileIdentity {
    pub(crate) fn from_stat(st: &libc::stat) -> FileIdentity {
        FileIdentity {
            dev: st.st_dev,
            ino: st.st_ino,
            size: st.st_size,
        }
    }
}

/// Outcome classification for directory-relative operations.
///
/// Precedence when several conditions hold at once: `BadDescriptor` beats
/// `NotADirectory` beats `NotFound`. A dead handle fails as dead no matter
/// what path it was asked about, and a live handle to a regular file fails
/// as "not a directory" even for names that do not exist under it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RelError {
    #[error("bad descriptor")]
    BadDescriptor,
    #[error("not a directory")]
    NotADirectory,
    #[error("no such file or directory")]
    NotFound,
    #[error("permission denied")]
    PermissionDenied,
    #[error("operation family not supported on this platform")]
    Unsupported,
    #[error("unexpected errno {0}")]
    Unexpected(i32),
}

pub type RelResult<T> = Result<T, RelError>;

impl RelError {
    /// Classify a raw (positive) errno value.
    pub fn from_errno(errno: i32) -> RelError {
        match Errno::from_discriminant(errno) {
            Ok(Errno::EBADF) => RelError::BadDescriptor,
            Ok(Errno::ENOTDIR) => RelError::NotADirectory,
            Ok(Errno::ENOENT) => RelError::NotFound,
            Ok(Errno::EACCES) | Ok(Errno::EPERM) => RelError::PermissionDenied,
            Ok(Errno::ENOSYS) => RelError::Unsupported,
            _ => RelError::Unexpected(errno),
        }
    }

    /// Classify a negative-errno return from the low-level wrappers.
    pub fn from_ret(ret: i32) -> RelError {
        RelError::from_errno(-ret)
    }
}

/// Why an exec did not happen. There is no success variant: a successful
/// launch replaces the process image and these functions never return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LaunchFailure {
    #[error("execute permission denied")]
    PermissionDenied,
    #[error("no such program")]
    NotFound,
    #[error("not an executable format")]
    NotExecutableFormat,
    #[error("unexpected errno {0}")]
    Unexpected(i32),
}

impl LaunchFailure {
    /// Classify the errno left behind by a failed execv.
    pub fn from_errno(errno: i32) -> LaunchFailure {
        match Errno::from_discriminant(errno) {
            Ok(Errno::EACCES) | Ok(Errno::EPERM) => LaunchFailure::PermissionDenied,
            Ok(Errno::ENOENT) | Ok(Errno::ENOTDIR) | Ok(Errno::ENAMETOOLONG) | Ok(Errno::ELOOP) => {
                LaunchFailure::NotFound
            }
            Ok(Errno::ENOEXEC) => LaunchFailure::NotExecutableFormat,
            _ => LaunchFailure::Unexpected(errno),
        }
    }
}

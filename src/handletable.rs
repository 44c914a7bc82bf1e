//! Process-wide virtual handle table.
//!
//! Descriptors handed to callers are virtual: plain integers naming an entry
//! in this table, which maps them to the kernel fd actually held open. That
//! indirection is what makes the error precedence a contract instead of a
//! kernel accident: validity is checked here, before any path reaches the
//! kernel, so a dead handle is EBADF no matter what it is asked to do.
//!
//! Lifetimes are independent: `dup_virtual_handle` dups the kernel fd, so
//! closing either the duplicate or the original affects only its own entry.
//! `takeover_virtual_handle` is the one move operation; it removes the
//! entry and surrenders the kernel fd to the caller (the fdopendir case),
//! leaving the old handle permanently dead.

use crate::constants::err_const::{get_errno, handle_errno, syscall_error, Errno, RetVal};
use crate::interface::misc::{RustAtomicOrdering, RustAtomicU64, RustHashMap};

use lazy_static::lazy_static;
use std::ffi::CString;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::io::RawFd;
use std::path::Path;

pub type VirtHandle = u64;

/// Never allocated by the table; models a descriptor that was never valid,
/// the way -1 does for kernel fds.
pub const INVALID_HANDLE: VirtHandle = u64::MAX;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HandleEntry {
    pub underfd: RawFd,
}

lazy_static! {
    static ref HANDLE_TABLE: RustHashMap<VirtHandle, HandleEntry> = RustHashMap::new();
}

static NEXT_HANDLE: RustAtomicU64 = RustAtomicU64::new(1);

fn register_underfd(underfd: RawFd) -> VirtHandle {
    let handle = NEXT_HANDLE.fetch_add(1, RustAtomicOrdering::SeqCst);
    HANDLE_TABLE.insert(handle, HandleEntry { underfd });
    handle
}

/// Open `path` with the given flags and register the kernel fd. The caller
/// chooses whether to pass O_DIRECTORY; a handle over a regular file is a
/// legal (if doomed) base for relative operations, and exercising that is
/// the point.
pub fn open_path(path: &Path, oflag: i32) -> Result<VirtHandle, RetVal> {
    let c_path = CString::new(path.as_os_str().as_bytes()).unwrap();
    let kernel_fd = unsafe { libc::open(c_path.as_ptr(), oflag) };
    if kernel_fd < 0 {
        let errno = get_errno();
        return Err(handle_errno(errno, "open"));
    }
    Ok(register_underfd(kernel_fd))
}

/// Map a virtual handle to its kernel fd. EBADF when the entry is gone,
/// which covers closed, taken-over, and never-valid handles alike.
pub fn translate_virtual_handle(handle: VirtHandle) -> Result<RawFd, RetVal> {
    match HANDLE_TABLE.get(&handle) {
        Some(entry) => Ok(entry.underfd),
        None => Err(syscall_error(Errno::EBADF, "translate", "Bad Handle")),
    }
}

/// Duplicate a handle. The new handle owns its own kernel fd over the same
/// open directory, so the two lifetimes are independent.
pub fn dup_virtual_handle(handle: VirtHandle) -> Result<VirtHandle, RetVal> {
    let underfd = translate_virtual_handle(handle)?;
    let dupfd = unsafe { libc::dup(underfd) };
    if dupfd < 0 {
        let errno = get_errno();
        return Err(handle_errno(errno, "dup"));
    }
    Ok(register_underfd(dupfd))
}

/// Close a handle: remove the entry and close the kernel fd underneath it.
/// A second close of the same handle is EBADF, same as the double-close it
/// models.
pub fn close_virtual_handle(handle: VirtHandle) -> Result<(), RetVal> {
    match HANDLE_TABLE.remove(&handle) {
        Some((_, entry)) => {
            let ret = unsafe { libc::close(entry.underfd) };
            if ret < 0 {
                let errno = get_errno();
                return Err(handle_errno(errno, "close"));
            }
            Ok(())
        }
        None => Err(syscall_error(Errno::EBADF, "close", "Bad Handle")),
    }
}

/// Remove the entry and hand the kernel fd to the caller without closing
/// it. Ownership moves; the old handle is dead from here on.
pub fn takeover_virtual_handle(handle: VirtHandle) -> Result<RawFd, RetVal> {
    match HANDLE_TABLE.remove(&handle) {
        Some((_, entry)) => Ok(entry.underfd),
        None => Err(syscall_error(Errno::EBADF, "takeover", "Bad Handle")),
    }
}

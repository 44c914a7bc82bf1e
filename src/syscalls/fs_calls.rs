//! Directory-relative filesystem operations.
//!
//! Every operation translates its virtual handle before anything else, so
//! the precedence BadDescriptor > NotADirectory > NotFound holds by
//! construction: a dead handle never reaches the kernel, and a live handle
//! to a non-directory gets ENOTDIR from the kernel before path existence
//! matters.

use crate::constants::err_const::{get_errno, handle_errno, Errno};
use crate::constants::fs_const::{DEFAULT_CREATE_MODE, O_CREAT, O_EXCL, O_RDWR};
use crate::handletable;
use crate::handletable::VirtHandle;
use crate::interface::types::{FileIdentity, RelError, RelResult};

use libc::c_void;
use std::ffi::{CStr, CString};

/// Reference to Linux: https://man7.org/linux/man-pages/man2/openat.2.html
///
/// Atomically create a new file named `name` under the directory addressed
/// by `handle`, write `data` into it, and report its identity. Exclusivity
/// is mandatory: an existing name fails and the file is untouched. The
/// creating fd is closed before returning; callers wanting a handle on the
/// new file open it separately.
pub fn create_exclusive(handle: VirtHandle, name: &str, data: &[u8]) -> RelResult<FileIdentity> {
    let dirfd = match handletable::translate_virtual_handle(handle) {
        Ok(fd) => fd,
        Err(ret) => return Err(RelError::from_ret(ret)),
    };
    let c_name = CString::new(name).unwrap();
    let fd = unsafe {
        libc::openat(
            dirfd,
            c_name.as_ptr(),
            O_CREAT | O_RDWR | O_EXCL,
            DEFAULT_CREATE_MODE as libc::c_uint,
        )
    };
    if fd < 0 {
        let errno = get_errno();
        return Err(RelError::from_ret(handle_errno(errno, "openat")));
    }

    let mut written = 0;
    while written < data.len() {
        let ret = unsafe {
            libc::write(
                fd,
                data[written..].as_ptr() as *const c_void,
                data.len() - written,
            )
        };
        if ret < 0 {
            let errno = get_errno();
            if errno == Errno::EINTR as i32 {
                continue;
            }
            unsafe { libc::close(fd) };
            return Err(RelError::from_ret(handle_errno(errno, "write")));
        }
        written += ret as usize;
    }

    let mut st: libc::stat = unsafe { std::mem::zeroed() };
    let libcret = unsafe { libc::fstat(fd, &mut st) };
    if libcret < 0 {
        let errno = get_errno();
        unsafe { libc::close(fd) };
        return Err(RelError::from_ret(handle_errno(errno, "fstat")));
    }
    unsafe { libc::close(fd) };
    Ok(FileIdentity::from_stat(&st))
}

/// Reference to Linux: https://man7.org/linux/man-pages/man2/fstatat.2.html
///
/// Resolve `name` under the directory addressed by `handle` and report its
/// identity. Through a handle addressing a regular file this is
/// NotADirectory even when `name` does not exist anywhere: the descriptor
/// type check dominates path resolution.
pub fn stat_relative(handle: VirtHandle, name: &str) -> RelResult<FileIdentity> {
    let dirfd = match handletable::translate_virtual_handle(handle) {
        Ok(fd) => fd,
        Err(ret) => return Err(RelError::from_ret(ret)),
    };
    let c_name = CString::new(name).unwrap();
    let mut st: libc::stat = unsafe { std::mem::zeroed() };
    let libcret = unsafe { libc::fstatat(dirfd, c_name.as_ptr(), &mut st, 0) };
    if libcret < 0 {
        let errno = get_errno();
        return Err(RelError::from_ret(handle_errno(errno, "fstatat")));
    }
    Ok(FileIdentity::from_stat(&st))
}

/// Reference to Linux: https://man7.org/linux/man-pages/man2/fstat.2.html
///
/// Identity of the object the handle itself addresses. Used to cross-check
/// that a relative lookup and a direct handle agree on the same file.
pub fn stat_handle(handle: VirtHandle) -> RelResult<FileIdentity> {
    let fd = match handletable::translate_virtual_handle(handle) {
        Ok(fd) => fd,
        Err(ret) => return Err(RelError::from_ret(ret)),
    };
    let mut st: libc::stat = unsafe { std::mem::zeroed() };
    let libcret = unsafe { libc::fstat(fd, &mut st) };
    if libcret < 0 {
        let errno = get_errno();
        return Err(RelError::from_ret(handle_errno(errno, "fstat")));
    }
    Ok(FileIdentity::from_stat(&st))
}

/// Reference to Linux: https://man7.org/linux/man-pages/man2/unlinkat.2.html
///
/// Remove `name` from the directory addressed by `handle`. Absence is
/// stable: once removal has succeeded, both stat and a second removal of
/// the same name report NotFound.
pub fn remove_relative(handle: VirtHandle, name: &str) -> RelResult<()> {
    let dirfd = match handletable::translate_virtual_handle(handle) {
        Ok(fd) => fd,
        Err(ret) => return Err(RelError::from_ret(ret)),
    };
    let c_name = CString::new(name).unwrap();
    let libcret = unsafe { libc::unlinkat(dirfd, c_name.as_ptr(), 0) };
    if libcret < 0 {
        let errno = get_errno();
        return Err(RelError::from_ret(handle_errno(errno, "unlinkat")));
    }
    Ok(())
}

/// Lazy stream of directory entry names, excluding `.` and `..`. Finite and
/// non-restartable; dropping it runs closedir on the fd it took over.
pub struct DirStream {
    dirp: *mut libc::DIR,
}

/// Reference to Linux: https://man7.org/linux/man-pages/man3/fdopendir.3.html
///
/// Convert a directory handle into a `DirStream`. fdopendir takes over the
/// descriptor, so the handle's table entry is removed here and the handle
/// is dead afterwards; callers wanting to keep a handle on the directory
/// dup it first.
pub fn list_entries(handle: VirtHandle) -> RelResult<DirStream> {
    let dirfd = match handletable::takeover_virtual_handle(handle) {
        Ok(fd) => fd,
        Err(ret) => return Err(RelError::from_ret(ret)),
    };
    let dirp = unsafe { libc::fdopendir(dirfd) };
    if dirp.is_null() {
        let errno = get_errno();
        unsafe { libc::close(dirfd) };
        return Err(RelError::from_ret(handle_errno(errno, "fdopendir")));
    }
    Ok(DirStream { dirp })
}

impl Iterator for DirStream {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            let entry = unsafe { libc::readdir(self.dirp) };
            if entry.is_null() {
                return None;
            }
            let name = unsafe { CStr::from_ptr((*entry).d_name.as_ptr()) }
                .to_string_lossy()
                .into_owned();
            if name != "." && name != ".." {
                return Some(name);
            }
        }
    }
}

impl Drop for DirStream {
    fn drop(&mut self) {
        unsafe { libc::closedir(self.dirp) };
    }
}

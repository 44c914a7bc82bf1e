//! Errno constants and classification helpers.
//!
//! Kernel calls report failure through the thread-local errno; everything in
//! this crate funnels that value through `handle_errno` so unrecognized
//! values are logged once at the point of failure and the caller gets the
//! usual negative-errno return.

/// Emits an enum with a way to get back from the discriminant to the
/// variant, since errno values arrive from the kernel as plain integers.
macro_rules! reversible_enum {
    ($(#[$settings: meta])* $visibility: vis enum $enumname: ident {
        $($valuename: ident = $value: literal,)*
    }) => {
        $(#[$settings])*
        $visibility enum $enumname {
            $($valuename = $value,)*
        }

        impl $enumname {
            $visibility fn from_discriminant(v: i32) -> Result<Self, ()> {
                match v {
                    $($value => Ok($enumname::$valuename),)*
                    _ => Err(()),
                }
            }
        }
    }
}

reversible_enum! {
    #[derive(Debug, PartialEq, Eq, Clone, Copy)]
    #[repr(i32)]
    #[non_exhaustive]
    pub enum Errno {
        EPERM = 1,      // Operation not permitted
        ENOENT = 2,     // No such file or directory
        ESRCH = 3,      // No such process
        EINTR = 4,      // Interrupted system call
        EIO = 5,        // I/O error
        ENXIO = 6,      // No such device or address
        E2BIG = 7,      // Argument list too long
        ENOEXEC = 8,    // Exec format error
        EBADF = 9,      // Bad file number
        ECHILD = 10,    // No child processes
        EAGAIN = 11,    // Try again
        ENOMEM = 12,    // Out of memory
        EACCES = 13,    // Permission denied
        EFAULT = 14,    // Bad address
        ENOTBLK = 15,   // Block device required
        EBUSY = 16,     // Device or resource busy
        EEXIST = 17,    // File exists
        EXDEV = 18,     // Cross-device link
        ENODEV = 19,    // No such device
        ENOTDIR = 20,   // Not a directory
        EISDIR = 21,    // Is a directory
        EINVAL = 22,    // Invalid argument
        ENFILE = 23,    // File table overflow
        EMFILE = 24,    // Too many open files
        ENOTTY = 25,    // Not a typewriter
        ETXTBSY = 26,   // Text file busy
        EFBIG = 27,     // File too large
        ENOSPC = 28,    // No space left on device
        ESPIPE = 29,    // Illegal seek
        EROFS = 30,     // Read-only file system
        EMLINK = 31,    // Too many links
        EPIPE = 32,     // Broken pipe
        EDOM = 33,      // Math argument out of domain of func
        ERANGE = 34,    // Math result not representable
        EDEADLK = 35,   // Resource deadlock would occur
        ENAMETOOLONG = 36, // File name too long
        ENOLCK = 37,    // No record locks available
        ENOSYS = 38,    // Function not implemented
        ENOTEMPTY = 39, // Directory not empty
        ELOOP = 40,     // Too many symbolic links encountered
    }
}

/// Return value convention for the low-level wrappers: negative errno on
/// failure, like the raw syscalls themselves.
pub type RetVal = i32;

/// Read the calling thread's errno.
pub fn get_errno() -> i32 {
    (unsafe { *libc::__errno_location() }) as i32
}

/// Record a failure we classified ourselves (no kernel call involved) and
/// produce the negative-errno return for it.
pub fn syscall_error(e: Errno, call: &str, message: &str) -> RetVal {
    log::debug!("{} failed: {:?} ({})", call, e, message);
    -(e as i32)
}

/// Classify an errno reported by the kernel. Values outside the table are
/// passed through unchanged so no failure is ever silently rewritten.
pub fn handle_errno(errno: i32, call: &str) -> RetVal {
    match Errno::from_discriminant(errno) {
        Ok(e) => syscall_error(e, call, "kernel call failed"),
        Err(()) => {
            log::warn!("{} failed with unrecognized errno {}", call, errno);
            -errno
        }
    }
}

#[cfg(test)]
mod errno_tests {
    use super::*;

    #[test]
    fn discriminant_round_trip() {
        assert_eq!(Errno::from_discriminant(9), Ok(Errno::EBADF));
        assert_eq!(Errno::from_discriminant(20), Ok(Errno::ENOTDIR));
        assert_eq!(Errno::from_discriminant(0), Err(()));
        assert_eq!(Errno::from_discriminant(9999), Err(()));
    }

    #[test]
    fn negative_return_convention() {
        assert_eq!(syscall_error(Errno::EBADF, "test", "bad handle"), -9);
        assert_eq!(handle_errno(2, "test"), -2);
        // unrecognized errno keeps its value
        assert_eq!(handle_errno(4242, "test"), -4242);
    }
}

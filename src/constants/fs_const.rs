//! Filesystem flag and mode constants.

pub use libc::{F_OK, O_CREAT, O_DIRECTORY, O_EXCL, O_RDONLY, O_RDWR, R_OK, W_OK, X_OK};

/// Mode for files made by `create_exclusive`, same as the 0666 the original
/// openat callers pass before umask.
pub const DEFAULT_CREATE_MODE: libc::mode_t = 0o666;

/// All three execute permission bits.
pub const EXEC_BITS: u32 = 0o111;

/// Mode for the deliberately non-executable binary copy fixtures.
pub const NONEXEC_COPY_MODE: u32 = 0o666;

// relposix - directory-relative POSIX operations and executable launch
// classification
//
// This library wraps the openat-family kernel calls (openat, fstatat,
// unlinkat, fdopendir) behind a virtual handle table and classifies every
// failure into a small typed taxonomy, with a fixed precedence contract:
// a dead descriptor beats a wrong descriptor type, which beats a missing
// path. It also locates and launches executables, distinguishing "found
// but not runnable" from "nothing there".

pub mod constants;
pub mod handletable;
pub mod interface;
pub mod syscalls;

// Re-export the public surface for the harness and integration tests
pub use interface::types::{FileIdentity, LaunchFailure, RelError, RelResult};
pub use syscalls::exec_calls::{launch_direct, launch_searched, ExecutableCandidate, SearchPath};
pub use syscalls::fs_calls::{
    create_exclusive, list_entries, remove_relative, stat_handle, stat_relative, DirStream,
};

#[cfg(test)]
mod tests;

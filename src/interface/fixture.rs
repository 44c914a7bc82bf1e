//! Fixture setup for the decision-table harness.
//!
//! Everything made here is registered in a process-wide list and removed by
//! `cleanup_temp_files` no matter how the run ends. Fixture failures are not
//! semantics under test; callers should treat them as fatal.

use crate::constants::err_const::{get_errno, Errno};
use crate::constants::fs_const::NONEXEC_COPY_MODE;
use crate::interface::misc::Mutex;

use lazy_static::lazy_static;
use std::ffi::{CString, OsStr};
use std::fs;
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use thiserror::Error;

lazy_static! {
    static ref TEMP_FILES: Mutex<Vec<PathBuf>> = Mutex::new(Vec::new());
}

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("cannot create scratch directory: {0}")]
    ScratchDir(#[source] io::Error),
    #[error("cannot copy the running binary: {0}")]
    CopyBinary(#[source] io::Error),
    #[error("fixture resources exhausted during {0}")]
    ResourceExhausted(&'static str),
}

/// Register a path for removal at cleanup time.
pub fn add_temp_file(path: &Path) {
    TEMP_FILES.lock().push(path.to_path_buf());
}

/// Remove everything registered so far, newest first so files inside a
/// scratch directory go before the directory itself. Individual removal
/// failures are ignored; cleanup must not mask the run's own verdict.
pub fn cleanup_temp_files() {
    let mut files = TEMP_FILES.lock();
    while let Some(path) = files.pop() {
        if path.is_dir() {
            let _ = fs::remove_dir_all(&path);
        } else {
            let _ = fs::remove_file(&path);
        }
    }
}

/// Create a fresh scratch directory under the system temp dir with mkdtemp
/// and register it for cleanup.
pub fn make_scratch_dir() -> Result<PathBuf, FixtureError> {
    let template = std::env::temp_dir().join("tst-relposix.XXXXXX");
    let c_template = CString::new(template.as_os_str().as_bytes()).unwrap();
    let raw = c_template.into_raw();
    let ret = unsafe { libc::mkdtemp(raw) };
    let filled = unsafe { CString::from_raw(raw) };
    if ret.is_null() {
        let errno = get_errno();
        return Err(match Errno::from_discriminant(errno) {
            Ok(Errno::ENOSPC) | Ok(Errno::EMFILE) | Ok(Errno::ENFILE) | Ok(Errno::ENOMEM) => {
                FixtureError::ResourceExhausted("mkdtemp")
            }
            _ => FixtureError::ScratchDir(io::Error::from_raw_os_error(errno)),
        });
    }
    let dir = PathBuf::from(OsStr::from_bytes(filled.as_bytes()));
    add_temp_file(&dir);
    Ok(dir)
}

/// Copy the running binary into `dir` and strip all execute bits, producing
/// a file that exists and is readable but must fail to launch with a
/// permission error. The copy is registered for cleanup.
pub fn make_nonexec_copy(dir: &Path) -> Result<PathBuf, FixtureError> {
    let exe = std::env::current_exe().map_err(FixtureError::CopyBinary)?;
    let name = exe
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| String::from("relposix-bin"));
    let copy = dir.join(format!("{}-copy", name));
    fs::copy(&exe, &copy).map_err(FixtureError::CopyBinary)?;
    fs::set_permissions(&copy, fs::Permissions::from_mode(NONEXEC_COPY_MODE))
        .map_err(FixtureError::CopyBinary)?;
    add_temp_file(&copy);
    Ok(copy)
}

// relposix_check - run the full decision table against the live kernel.
//
// Builds throwaway fixtures (a scratch directory, a non-executable copy of
// this binary), then walks every row of the classification table: handle
// validity, handle type, path existence, executable eligibility. One line
// names the first mismatch; exit status is 0 for a clean table, 1 for a
// mismatch or unusable environment, 77 when the platform has no *at family
// at all.

use relposix::constants::fs_const::{O_DIRECTORY, O_RDONLY};
use relposix::handletable;
use relposix::handletable::INVALID_HANDLE;
use relposix::interface::fixture;
use relposix::interface::misc::init_logging;
use relposix::{
    create_exclusive, launch_direct, launch_searched, list_entries, remove_relative, stat_handle,
    stat_relative, ExecutableCandidate, LaunchFailure, RelError, SearchPath,
};

use std::path::Path;
use std::process;

const EXIT_PASS: i32 = 0;
const EXIT_FAIL: i32 = 1;
const EXIT_UNSUPPORTED: i32 = 77;

const TEST_NAME: &str = "some-file";
const TEST_DATA: &[u8] = b"hello";

fn main() {
    init_logging();
    let code = run_checks();
    fixture::cleanup_temp_files();
    process::exit(code);
}

fn run_checks() -> i32 {
    let scratch = match fixture::make_scratch_dir() {
        Ok(dir) => dir,
        Err(e) => {
            println!("{}", e);
            return EXIT_FAIL;
        }
    };

    let dir_handle = match handletable::open_path(&scratch, O_RDONLY | O_DIRECTORY) {
        Ok(h) => h,
        Err(_) => {
            println!("cannot open scratch directory");
            return EXIT_FAIL;
        }
    };

    // The stream takes over its handle, so enumerate through a duplicate.
    let dup_handle = match handletable::dup_virtual_handle(dir_handle) {
        Ok(h) => h,
        Err(_) => {
            println!("dup failed");
            return EXIT_FAIL;
        }
    };
    match list_entries(dup_handle) {
        Ok(stream) => {
            for name in stream {
                println!("scratch directory contains file \"{}\"", name);
                return EXIT_FAIL;
            }
        }
        Err(_) => {
            println!("list_entries on fresh scratch directory failed");
            return EXIT_FAIL;
        }
    }

    let created = match create_exclusive(dir_handle, TEST_NAME, TEST_DATA) {
        Ok(identity) => identity,
        Err(RelError::Unsupported) => {
            println!("*at functions not supported");
            return EXIT_UNSUPPORTED;
        }
        Err(e) => {
            println!("file creation failed: {}", e);
            return EXIT_FAIL;
        }
    };
    println!("file created");

    // A handle over the regular file itself. Resolving any name through it
    // must classify as NotADirectory, even a name that exists nowhere.
    let file_handle = match handletable::open_path(&scratch.join(TEST_NAME), O_RDONLY) {
        Ok(h) => h,
        Err(_) => {
            println!("cannot open created file");
            return EXIT_FAIL;
        }
    };
    match stat_relative(file_handle, TEST_NAME) {
        Err(RelError::NotADirectory) => {}
        other => {
            println!(
                "stat through a regular-file handle not NotADirectory: {:?}",
                other
            );
            return EXIT_FAIL;
        }
    }

    let direct = match stat_handle(file_handle) {
        Ok(identity) => identity,
        Err(e) => {
            println!("stat_handle on file handle failed: {}", e);
            return EXIT_FAIL;
        }
    };
    if handletable::close_virtual_handle(file_handle).is_err() {
        println!("close of file handle failed");
        return EXIT_FAIL;
    }

    let relative = match stat_relative(dir_handle, TEST_NAME) {
        Ok(identity) => identity,
        Err(e) => {
            println!("stat_relative through directory handle failed: {}", e);
            return EXIT_FAIL;
        }
    };
    if created != direct || direct != relative {
        println!("stat results do not match");
        return EXIT_FAIL;
    }

    if let Err(e) = remove_relative(dir_handle, TEST_NAME) {
        println!("remove_relative failed: {}", e);
        return EXIT_FAIL;
    }
    match stat_relative(dir_handle, TEST_NAME) {
        Err(RelError::NotFound) => {}
        other => {
            println!("stat after removal not NotFound: {:?}", other);
            return EXIT_FAIL;
        }
    }
    match remove_relative(dir_handle, TEST_NAME) {
        Err(RelError::NotFound) => {}
        other => {
            println!("second removal not NotFound: {:?}", other);
            return EXIT_FAIL;
        }
    }

    // A duplicate closed right away: operations through it are BadDescriptor
    // no matter the path, and the original stays fully usable.
    let doomed = match handletable::dup_virtual_handle(dir_handle) {
        Ok(h) => h,
        Err(_) => {
            println!("dup failed");
            return EXIT_FAIL;
        }
    };
    if handletable::close_virtual_handle(doomed).is_err() {
        println!("close of duplicate failed");
        return EXIT_FAIL;
    }
    match stat_relative(doomed, TEST_NAME) {
        Err(RelError::BadDescriptor) => {}
        other => {
            println!("stat through closed duplicate not BadDescriptor: {:?}", other);
            return EXIT_FAIL;
        }
    }
    match stat_relative(dir_handle, ".") {
        Ok(_) => {}
        other => {
            println!("original handle unusable after duplicate closed: {:?}", other);
            return EXIT_FAIL;
        }
    }

    match stat_relative(INVALID_HANDLE, TEST_NAME) {
        Err(RelError::BadDescriptor) => {}
        other => {
            println!("stat through never-valid handle not BadDescriptor: {:?}", other);
            return EXIT_FAIL;
        }
    }

    if handletable::close_virtual_handle(dir_handle).is_err() {
        println!("close of directory handle failed");
        return EXIT_FAIL;
    }
    match stat_relative(dir_handle, TEST_NAME) {
        Err(RelError::BadDescriptor) => {}
        other => {
            println!("stat through closed handle not BadDescriptor: {:?}", other);
            return EXIT_FAIL;
        }
    }

    exec_checks(&scratch)
}

// Launch checks run last: a launch that unexpectedly succeeded would have
// replaced this process, and none of the diagnostics below would print.
fn exec_checks(scratch: &Path) -> i32 {
    let copy = match fixture::make_nonexec_copy(scratch) {
        Ok(path) => path,
        Err(e) => {
            println!("{}", e);
            return EXIT_FAIL;
        }
    };

    match ExecutableCandidate::probe(&copy) {
        Some(candidate) => {
            if candidate.expected_failure() != Some(LaunchFailure::PermissionDenied) {
                println!("non-executable copy not predicted PermissionDenied");
                return EXIT_FAIL;
            }
        }
        None => {
            println!("non-executable copy not found by probe");
            return EXIT_FAIL;
        }
    }

    match launch_direct(&copy) {
        LaunchFailure::PermissionDenied => {}
        other => {
            println!("direct launch of non-executable copy: {:?}, expected PermissionDenied", other);
            return EXIT_FAIL;
        }
    }

    // The copy's directory first, then fixed relative siblings that do not
    // hold the name. The scan must stop at the first existing match.
    let search = SearchPath::new(vec![
        scratch.to_path_buf(),
        scratch.join("../lib"),
        scratch.join("../elf"),
    ]);
    let name = copy
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match launch_searched(&name, &search) {
        LaunchFailure::PermissionDenied => {}
        other => {
            println!("searched launch of non-executable copy: {:?}, expected PermissionDenied", other);
            return EXIT_FAIL;
        }
    }

    println!("all classifications matched");
    EXIT_PASS
}

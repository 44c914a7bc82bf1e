use crate::constants::fs_const::{O_DIRECTORY, O_RDONLY};
use crate::handletable;
use crate::handletable::INVALID_HANDLE;
use crate::interface::types::RelError;
use crate::syscalls::fs_calls::*;
use crate::tests::test_setup;

use std::fs;

#[test]
fn ut_rel_fs_list_entries_empty_dir() {
    let _thelock = test_setup();

    let dir = tempfile::tempdir().unwrap();
    let handle = handletable::open_path(dir.path(), O_RDONLY | O_DIRECTORY).unwrap();

    let entries: Vec<String> = list_entries(handle).unwrap().collect();
    assert!(entries.is_empty(), "fresh dir contains {:?}", entries);
}

#[test]
fn ut_rel_fs_list_entries_sees_created_file_and_consumes_handle() {
    let _thelock = test_setup();

    let dir = tempfile::tempdir().unwrap();
    let handle = handletable::open_path(dir.path(), O_RDONLY | O_DIRECTORY).unwrap();
    create_exclusive(handle, "listed", b"x").unwrap();

    let dup = handletable::dup_virtual_handle(handle).unwrap();
    let entries: Vec<String> = list_entries(dup).unwrap().collect();
    assert_eq!(entries, vec!["listed".to_string()]);

    // the stream took the duplicate over; the duplicate is dead, the
    // original is not
    assert_eq!(stat_relative(dup, "listed"), Err(RelError::BadDescriptor));
    assert!(stat_relative(handle, "listed").is_ok());

    handletable::close_virtual_handle(handle).unwrap();
}

#[test]
fn ut_rel_fs_create_then_stat_identity_agrees() {
    let _thelock = test_setup();

    let dir = tempfile::tempdir().unwrap();
    let handle = handletable::open_path(dir.path(), O_RDONLY | O_DIRECTORY).unwrap();

    let created = create_exclusive(handle, "some-file", b"hello").unwrap();
    assert_eq!(created.size, 5);

    // identity via a separately opened handle on the file itself
    let file_handle = handletable::open_path(&dir.path().join("some-file"), O_RDONLY).unwrap();
    let direct = stat_handle(file_handle).unwrap();
    handletable::close_virtual_handle(file_handle).unwrap();

    // identity via the directory handle
    let relative = stat_relative(handle, "some-file").unwrap();

    assert_eq!(created, direct);
    assert_eq!(direct, relative);

    handletable::close_virtual_handle(handle).unwrap();
}

#[test]
fn ut_rel_fs_create_exclusive_refuses_existing_name() {
    let _thelock = test_setup();

    let dir = tempfile::tempdir().unwrap();
    let handle = handletable::open_path(dir.path(), O_RDONLY | O_DIRECTORY).unwrap();

    create_exclusive(handle, "once", b"first").unwrap();
    let second = create_exclusive(handle, "once", b"second");
    assert!(second.is_err(), "exclusive create succeeded twice");

    // the original contents survived the refused create
    assert_eq!(fs::read(dir.path().join("once")).unwrap(), b"first");

    handletable::close_virtual_handle(handle).unwrap();
}

#[test]
fn ut_rel_fs_regular_file_handle_is_notadirectory() {
    let _thelock = test_setup();

    let dir = tempfile::tempdir().unwrap();
    let dir_handle = handletable::open_path(dir.path(), O_RDONLY | O_DIRECTORY).unwrap();
    create_exclusive(dir_handle, "plain", b"hello").unwrap();

    let file_handle = handletable::open_path(&dir.path().join("plain"), O_RDONLY).unwrap();

    // the type check dominates: even a name that exists nowhere classifies
    // as NotADirectory, never NotFound
    assert_eq!(
        stat_relative(file_handle, "plain"),
        Err(RelError::NotADirectory)
    );
    assert_eq!(
        stat_relative(file_handle, "no-such-name"),
        Err(RelError::NotADirectory)
    );
    assert_eq!(
        remove_relative(file_handle, "no-such-name"),
        Err(RelError::NotADirectory)
    );

    handletable::close_virtual_handle(file_handle).unwrap();
    handletable::close_virtual_handle(dir_handle).unwrap();
}

#[test]
fn ut_rel_fs_removal_makes_absence_stable() {
    let _thelock = test_setup();

    let dir = tempfile::tempdir().unwrap();
    let handle = handletable::open_path(dir.path(), O_RDONLY | O_DIRECTORY).unwrap();

    create_exclusive(handle, "gone-soon", b"x").unwrap();
    assert_eq!(remove_relative(handle, "gone-soon"), Ok(()));
    assert_eq!(
        stat_relative(handle, "gone-soon"),
        Err(RelError::NotFound)
    );
    assert_eq!(
        remove_relative(handle, "gone-soon"),
        Err(RelError::NotFound)
    );

    handletable::close_virtual_handle(handle).unwrap();
}

#[test]
fn ut_rel_fs_closed_handle_is_baddescriptor() {
    let _thelock = test_setup();

    let dir = tempfile::tempdir().unwrap();
    let handle = handletable::open_path(dir.path(), O_RDONLY | O_DIRECTORY).unwrap();
    create_exclusive(handle, "still-here", b"x").unwrap();

    // closing a duplicate leaves the original fully usable
    let dup = handletable::dup_virtual_handle(handle).unwrap();
    handletable::close_virtual_handle(dup).unwrap();
    assert_eq!(stat_relative(dup, "still-here"), Err(RelError::BadDescriptor));
    assert!(stat_relative(handle, "still-here").is_ok());

    // closing the original kills every operation through it, for existing
    // and non-existing names alike
    handletable::close_virtual_handle(handle).unwrap();
    assert_eq!(
        stat_relative(handle, "still-here"),
        Err(RelError::BadDescriptor)
    );
    assert_eq!(
        stat_relative(handle, "never-existed"),
        Err(RelError::BadDescriptor)
    );
    assert_eq!(
        remove_relative(handle, "still-here"),
        Err(RelError::BadDescriptor)
    );
    assert_eq!(
        create_exclusive(handle, "new-name", b"x"),
        Err(RelError::BadDescriptor)
    );
    assert!(matches!(
        list_entries(handle),
        Err(RelError::BadDescriptor)
    ));

    // double close reports the same classification
    assert!(handletable::close_virtual_handle(handle).is_err());
}

#[test]
fn ut_rel_fs_never_valid_handle_is_baddescriptor() {
    let _thelock = test_setup();

    assert_eq!(
        stat_relative(INVALID_HANDLE, "anything"),
        Err(RelError::BadDescriptor)
    );
    assert_eq!(stat_handle(INVALID_HANDLE), Err(RelError::BadDescriptor));
    assert_eq!(
        remove_relative(INVALID_HANDLE, "anything"),
        Err(RelError::BadDescriptor)
    );
}

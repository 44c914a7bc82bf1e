// relposix test suite
//
// The handle table is process-global, so tests run serialized behind a
// single mutex; the guard also installs logging on first use.

mod fs_tests;

use once_cell::sync::Lazy;
use parking_lot::Mutex;

static TEST_MUTEX: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

/// Acquire the suite lock; holding the guard keeps tests from interleaving
/// on the shared handle table.
pub fn test_setup() -> parking_lot::MutexGuard<'static, ()> {
    let guard = TEST_MUTEX.lock();
    crate::interface::misc::init_logging();
    guard
}

use criterion::{criterion_group, criterion_main, Criterion};

use relposix::constants::fs_const::{O_DIRECTORY, O_RDONLY};
use relposix::handletable;
use relposix::{create_exclusive, stat_relative};

/// Relative stat through an already-open directory handle, the hot path of
/// the resolver.
fn benchmark_stat_relative(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let handle = handletable::open_path(dir.path(), O_RDONLY | O_DIRECTORY).unwrap();
    create_exclusive(handle, "bench-file", b"hello").unwrap();

    c.bench_function("stat_relative", |b| {
        b.iter(|| stat_relative(handle, "bench-file").unwrap())
    });

    handletable::close_virtual_handle(handle).unwrap();
}

criterion_group!(benches, benchmark_stat_relative);
criterion_main!(benches);

//! Concurrent first-time callers must all observe the same cached version.

mod common;

use common::{library, write, SHA};
use std::sync::{Arc, Barrier};
use std::thread;
use verstamp::VersionResolver;

#[test]
fn test_concurrent_first_calls_agree() {
    let root = library("2.1.0", "Silky Siena");
    write(root.path(), ".git/HEAD", &format!("{}\n", SHA));

    let resolver = Arc::new(VersionResolver::from_root(root.path()));
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let resolver = Arc::clone(&resolver);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let version = resolver.get_version().unwrap();
                (version as *const _ as usize, version.display().to_string())
            })
        })
        .collect();

    let results: Vec<(usize, String)> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let (first_addr, first_display) = &results[0];
    assert_eq!(first_display, "2.1.0.9616393 (Silky Siena)");
    for (addr, display) in &results {
        assert_eq!(addr, first_addr, "All callers should see the same cached instance");
        assert_eq!(display, first_display);
    }
}

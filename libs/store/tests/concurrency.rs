//! Concurrency tests for the identifier store.
//!
//! These run many writers and readers against the same directory and check
//! that exactly one identifier ever becomes visible.

use std::collections::HashSet;
use std::fs;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use uniqueid_store::{IdStore, RandomIdGenerator, SeedOutcome, UniqueId};
use uniqueid_testing::{SequenceGenerator, TempLocation};

const WRITERS: usize = 16;

#[test]
fn test_concurrent_ensure_has_single_winner() {
    // Repeat to give the scheduler a chance to interleave differently.
    for _ in 0..20 {
        let loc = Arc::new(TempLocation::new());
        let gen = Arc::new(SequenceGenerator::counting());
        let store = Arc::new(IdStore::new(gen.clone()));
        let barrier = Arc::new(Barrier::new(WRITERS));

        let handles: Vec<_> = (0..WRITERS)
            .map(|_| {
                let loc = Arc::clone(&loc);
                let store = Arc::clone(&store);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    store.ensure_id(loc.path());
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(loc.entries().unwrap(), vec!["unique-id.txt"]);

        let stored = store.get_id(loc.path()).unwrap();
        assert!(gen.issued().contains(&stored));
        assert!(gen.calls() >= 1 && gen.calls() <= WRITERS);
    }
}

#[test]
fn test_example_two_racers() {
    let loc = Arc::new(TempLocation::new());
    let store = Arc::new(IdStore::new(SequenceGenerator::new(["abc", "xyz"])));
    let barrier = Arc::new(Barrier::new(2));

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let loc = Arc::clone(&loc);
            let store = Arc::clone(&store);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                store.ensure_id(loc.path());
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let content = fs::read_to_string(loc.join("unique-id.txt")).unwrap();
    assert!(content == "abc" || content == "xyz", "unexpected content {content:?}");
    for _ in 0..10 {
        assert_eq!(store.get_id(loc.path()).unwrap().as_str(), content);
    }
}

#[test]
fn test_concurrent_seed_and_ensure() {
    for _ in 0..20 {
        let loc = Arc::new(TempLocation::new());
        let gen = Arc::new(SequenceGenerator::counting());
        let store = Arc::new(IdStore::new(gen.clone()));
        let barrier = Arc::new(Barrier::new(WRITERS));

        let handles: Vec<_> = (0..WRITERS)
            .map(|i| {
                let loc = Arc::clone(&loc);
                let store = Arc::clone(&store);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    if i % 2 == 0 {
                        let id = UniqueId::parse(&format!("seed-{i}")).unwrap();
                        Some(store.seed_id(loc.path(), &id).unwrap())
                    } else {
                        store.ensure_id(loc.path());
                        None
                    }
                })
            })
            .collect();
        let seeded = handles
            .into_iter()
            .filter_map(|h| h.join().unwrap())
            .filter(|outcome| *outcome == SeedOutcome::Seeded)
            .count();

        assert_eq!(loc.entries().unwrap(), vec!["unique-id.txt"]);
        let stored = store.get_id(loc.path()).unwrap();
        if stored.as_str().starts_with("seed-") {
            assert_eq!(seeded, 1);
        } else {
            assert_eq!(seeded, 0);
            assert!(gen.issued().contains(&stored));
        }
    }
}

#[test]
fn test_readers_never_see_partial_ids() {
    const READERS: usize = 4;
    // Long enough that a torn write would be visible as a prefix.
    let candidates: Vec<String> = ["a", "b", "c", "d"]
        .iter()
        .map(|c| c.repeat(1000))
        .collect();

    for _ in 0..10 {
        let loc = Arc::new(TempLocation::new());
        let store = Arc::new(IdStore::new(SequenceGenerator::new(&candidates)));
        let barrier = Arc::new(Barrier::new(candidates.len() + READERS));
        let writers_done = Arc::new(AtomicBool::new(false));

        let readers: Vec<_> = (0..READERS)
            .map(|_| {
                let loc = Arc::clone(&loc);
                let store = Arc::clone(&store);
                let barrier = Arc::clone(&barrier);
                let writers_done = Arc::clone(&writers_done);
                thread::spawn(move || {
                    barrier.wait();
                    let mut seen = Vec::new();
                    while seen.len() < 50 {
                        match store.get_id(loc.path()) {
                            Some(id) => seen.push(id),
                            // Nothing was ever written; let the main thread fail.
                            None if writers_done.load(Ordering::Acquire) => break,
                            None => {}
                        }
                    }
                    seen
                })
            })
            .collect();
        let writers: Vec<_> = (0..candidates.len())
            .map(|_| {
                let loc = Arc::clone(&loc);
                let store = Arc::clone(&store);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    store.ensure_id(loc.path());
                })
            })
            .collect();

        for writer in writers {
            writer.join().unwrap();
        }
        writers_done.store(true, Ordering::Release);
        let stored = store.get_id(loc.path()).unwrap();
        assert!(candidates.contains(&stored.as_str().to_string()));

        for reader in readers {
            for id in reader.join().unwrap() {
                assert_eq!(id, stored);
            }
        }
    }
}

#[test]
fn test_many_locations_in_parallel() {
    const THREADS: usize = 8;
    const PER_THREAD: usize = 25;

    let root = TempLocation::new();
    let store = Arc::new(IdStore::new(RandomIdGenerator::new()));
    let dirs: Vec<_> = (0..THREADS * PER_THREAD)
        .map(|i| {
            let dir = root.join(&format!("obj-{i}"));
            fs::create_dir(&dir).unwrap();
            dir
        })
        .collect();
    let dirs = Arc::new(dirs);

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let store = Arc::clone(&store);
            let dirs = Arc::clone(&dirs);
            thread::spawn(move || {
                for dir in &dirs[t * PER_THREAD..(t + 1) * PER_THREAD] {
                    store.ensure_id(dir);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let ids: HashSet<_> = dirs
        .iter()
        .map(|dir| store.get_id(dir).expect("every object has an id"))
        .collect();
    assert_eq!(ids.len(), THREADS * PER_THREAD);
}

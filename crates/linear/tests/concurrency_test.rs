//! Concurrent access tests
//!
//! Each test hammers a shared container from several threads and then checks
//! the invariants that must hold once every operation has completed.

mod common;

use common::{init_tracing, live_cost};
use linear::Linear;
use std::collections::HashSet;
use std::sync::{Arc, Barrier};
use std::thread;

const THREADS: usize = 8;

#[test]
fn test_concurrent_pushes_without_eviction() {
    init_tracing();
    let linear = Arc::new(Linear::new(1_000_000, false).unwrap());
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let linear = Arc::clone(&linear);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for i in 0..100 {
                    linear.push(format!("{t}-{i}"), format!("value{i}")).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(linear.key_count(), THREADS * 100);
    assert_eq!(linear.current_size(), live_cost(&linear));

    let unique: HashSet<_> = linear.keys().into_iter().collect();
    assert_eq!(unique.len(), THREADS * 100);
}

#[test]
fn test_concurrent_pushes_with_eviction_respect_budget() {
    let capacity = 500;
    let linear = Arc::new(Linear::new(capacity, true).unwrap());
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let linear = Arc::clone(&linear);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for i in 0..200 {
                    linear
                        .push(format!("{t}:{i:03}"), "x".repeat(15))
                        .expect("entry below capacity must be admitted");
                    assert!(linear.current_size() <= capacity);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    // every entry costs 5 + 15 = 20 bytes
    assert_eq!(linear.key_count(), 25);
    assert_eq!(linear.current_size(), 500);
    assert_eq!(linear.current_size(), live_cost(&linear));
}

#[test]
fn test_mixed_producers_and_consumers() {
    init_tracing();
    let linear = Arc::new(Linear::new(10_000, true).unwrap());
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let linear = Arc::clone(&linear);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for i in 0..300 {
                    let key = format!("{t}-{i}");
                    match (t + i) % 6 {
                        0 => {
                            let _ = linear.pop();
                        }
                        1 => {
                            let _ = linear.take();
                        }
                        2 => {
                            let _ = linear.read(&key);
                        }
                        3 => {
                            let previous = format!("{t}-{}", i.saturating_sub(1));
                            let _ = linear.update(&previous, "updated".to_string());
                        }
                        _ => {
                            linear.push(key, format!("value-{i}")).unwrap();
                        }
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let keys = linear.keys();
    let unique: HashSet<_> = keys.iter().collect();
    assert_eq!(unique.len(), keys.len(), "order must not hold duplicates");
    assert_eq!(linear.key_count(), keys.len());
    assert_eq!(linear.current_size(), live_cost(&linear));

    for key in &keys {
        assert!(linear.exists(key).is_some(), "key {key} has no value");
    }
}

#[test]
fn test_concurrent_duplicate_pushes() {
    let linear = Arc::new(Linear::new(10_000, false).unwrap());
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let linear = Arc::clone(&linear);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for i in 0..50 {
                    linear
                        .push(format!("shared-{}", i % 10), "v".repeat(t + 1))
                        .unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(linear.key_count(), 10);
    assert_eq!(linear.current_size(), live_cost(&linear));
}

#[test]
fn test_capacity_changes_during_writes() {
    let linear = Arc::new(Linear::new(1_000, true).unwrap());

    let writer = {
        let linear = Arc::clone(&linear);
        thread::spawn(move || {
            for i in 0..1_000 {
                linear.push(format!("k{i}"), "x".repeat(5)).unwrap();
            }
        })
    };

    let resizer = {
        let linear = Arc::clone(&linear);
        thread::spawn(move || {
            for i in 0..100 {
                let capacity = if i % 2 == 0 { 200 } else { 1_000 };
                linear.set_capacity(capacity).unwrap();
            }
        })
    };

    writer.join().unwrap();
    resizer.join().unwrap();

    assert_eq!(linear.current_size(), live_cost(&linear));
    assert_eq!(linear.capacity(), 1_000);
}

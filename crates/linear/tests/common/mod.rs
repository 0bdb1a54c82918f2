//! Shared helpers for integration tests

#![allow(dead_code)]

use linear::{estimate, Linear};
use std::ops::ControlFlow;
use std::sync::Once;

static TRACING: Once = Once::new();

/// Install a test-writer subscriber once per test binary, honouring RUST_LOG
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Sum of estimated costs over every live entry
pub fn live_cost(linear: &Linear<String>) -> u64 {
    let mut total = 0;
    linear.range(|key, value| {
        total += estimate(key, value);
        ControlFlow::Continue(())
    });
    total
}

/// Drain the container oldest-first, returning the values
pub fn drain_values(linear: &Linear<String>) -> Vec<String> {
    let mut values = Vec::new();
    while let Ok(entry) = linear.take() {
        values.push(entry.value);
    }
    values
}

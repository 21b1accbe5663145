#![allow(dead_code)]
//! Shared helpers for the integration tests.

use handoff::output::{RecordingOutput, SharedOutput};
use std::sync::Arc;
use tokio::runtime::{Builder, Runtime};

/// A recording output together with a shared handle to pass into the library.
pub fn recording_output() -> (RecordingOutput, SharedOutput) {
    let output = RecordingOutput::new();
    let shared: SharedOutput = Arc::new(output.clone());
    (output, shared)
}

/// A single-threaded runtime with a paused clock.
///
/// Spawned tasks only run while the `block_on` future is suspended, which makes
/// abandonment deterministic.
pub fn paused_runtime() -> Runtime {
    Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .expect("failed to build paused runtime")
}

/// A multi-threaded runtime with a real clock, as the binaries use.
pub fn threaded_runtime() -> Runtime {
    Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .expect("failed to build threaded runtime")
}

//! Detached tasks are abandoned when their runtime goes away.
//!
//! Dropping the runtime stands in for the process exiting: every task still
//! pending is cancelled at its next suspension point, with no cleanup hook.

use handoff::config::PaymentConfig;
use handoff::payment;
use handoff::task::spawn_detached;
use std::time::Duration;

#[path = "../helpers/mod.rs"]
mod helpers;
use helpers::{paused_runtime, recording_output, threaded_runtime};

const LOGGER_STEP: &str = "Logging transaction... [step";
const LOGGER_DONE: &str = "[done] Logging transaction";

#[test]
fn test_slow_logger_is_cut_off_when_payment_flow_finishes_first() {
    let (output, shared) = recording_output();
    let config = PaymentConfig {
        status_steps: 2,
        log_steps: 5,
        step_delay_ms: 100,
        skip_status_update: false,
    };

    let runtime = paused_runtime();
    runtime.block_on(payment::process_payment(&config, shared));
    drop(runtime);

    assert_eq!(output.count_containing("[done] Updating payment status"), 1);
    let completed = output.count_containing(LOGGER_STEP);
    assert!(completed < 5, "logger completed {} of 5 steps", completed);
    assert_eq!(output.count_containing(LOGGER_DONE), 0);
}

#[test]
fn test_logger_is_cut_off_on_a_threaded_runtime() {
    let (output, shared) = recording_output();
    let config = PaymentConfig {
        status_steps: 1,
        log_steps: 20,
        step_delay_ms: 20,
        skip_status_update: false,
    };

    let runtime = threaded_runtime();
    runtime.block_on(payment::process_payment(&config, shared));
    drop(runtime);

    let completed_at_exit = output.count_containing(LOGGER_STEP);
    assert!(completed_at_exit < 20, "logger completed {} of 20 steps", completed_at_exit);

    // Nothing is left to make progress once the runtime is gone.
    std::thread::sleep(Duration::from_millis(100));
    assert_eq!(output.count_containing(LOGGER_STEP), completed_at_exit);
    assert_eq!(output.count_containing(LOGGER_DONE), 0);
}

#[test]
fn test_spawn_then_exit_may_produce_no_output() {
    let (output, shared) = recording_output();

    let runtime = paused_runtime();
    runtime.block_on(async {
        spawn_detached(payment::log_transaction(shared, 3, Duration::from_millis(10)));
    });
    drop(runtime);

    assert!(output.lines().is_empty(), "got {:?}", output.lines());
}

#[test]
fn test_skipping_status_update_leaves_logger_unjoined() {
    let (output, shared) = recording_output();
    let config = PaymentConfig {
        skip_status_update: true,
        ..PaymentConfig::default()
    };

    let runtime = paused_runtime();
    runtime.block_on(payment::run(&config, shared));
    drop(runtime);

    assert_eq!(output.count_containing("Updating payment status"), 0);
    assert_eq!(output.count_containing(LOGGER_STEP), 0);
}

#[test]
fn test_logger_finishes_when_the_flow_outlives_it() {
    let (output, shared) = recording_output();
    let config = PaymentConfig {
        status_steps: 5,
        log_steps: 3,
        step_delay_ms: 100,
        skip_status_update: false,
    };

    let runtime = paused_runtime();
    runtime.block_on(payment::process_payment(&config, shared));
    drop(runtime);

    assert_eq!(output.count_containing(LOGGER_STEP), 3);
    assert_eq!(output.count_containing(LOGGER_DONE), 1);
}

//! End-to-end tests of the order pipeline: producer, rendezvous channel,
//! dispatcher and notification fan-out.

use handoff::channel::rendezvous;
use handoff::config::OrdersConfig;
use handoff::dispatcher::Dispatcher;
use handoff::notification::ConsoleNotifier;
use handoff::orders;
use handoff::producer::{BatchPolicy, Producer, ProducerReport};
use handoff::task::{Launcher, TaskManager};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

#[path = "../helpers/mod.rs"]
mod helpers;
use helpers::recording_output;

fn short_config(users: &[&str]) -> OrdersConfig {
    OrdersConfig {
        users: users.iter().map(|u| u.to_string()).collect(),
        batch_size: 2,
        batch_delay_ms: 1000,
        grace_period_ms: 1000,
    }
}

#[tokio::test(start_paused = true)]
async fn test_order_demo_notifies_every_user() {
    let (output, shared) = recording_output();
    let config = short_config(&["adi", "budi", "caca", "dedi"]);

    let report = orders::run(&config, shared).await.unwrap();
    assert_eq!(report, ProducerReport { sent: 4, pauses: 2 });
    assert_eq!(output.count_containing("Sleeping between batches"), 2);

    // Presence only: the three notifications of one order, and those of
    // different orders, may appear in any order.
    for user in &config.users {
        for needle in [
            format!("Sending email to {}", user),
            format!("Sending push notification to {}", user),
            format!("Sending SMS to {}", user),
        ] {
            output.wait_for(&needle, 1, Duration::from_secs(5)).await;
            assert_eq!(output.count_containing(&needle), 1, "{}", needle);
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_dispatch_order_follows_send_order() {
    let (output, shared) = recording_output();
    let config = short_config(&["adi", "budi", "caca", "dedi", "eka"]);

    orders::run(&config, shared).await.unwrap();

    let dispatched: Vec<String> = output
        .lines_containing("Dispatching notifications for")
        .into_iter()
        .map(|line| {
            line.trim_start_matches("[📬] Dispatching notifications for ")
                .split(' ')
                .next()
                .unwrap_or_default()
                .to_string()
        })
        .collect();
    assert_eq!(dispatched, config.users);
}

#[tokio::test(start_paused = true)]
async fn test_validation_happens_before_dispatch() {
    let (output, shared) = recording_output();
    let config = short_config(&["adi"]);

    orders::run(&config, shared).await.unwrap();

    let lines = output.lines();
    let position = |needle: &str| {
        lines
            .iter()
            .position(|line| line.contains(needle))
            .unwrap_or_else(|| panic!("missing line {:?} in {:?}", needle, lines))
    };
    assert!(position("Finished validating order for adi") < position("Dispatching notifications for adi"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_fan_out_under_parallel_scheduling() {
    let (output, shared) = recording_output();
    let users: Vec<String> = (0..25).map(|i| format!("user{}", i)).collect();

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let manager = TaskManager::new(shutdown_rx);
    let dispatcher = Dispatcher::new(Arc::new(ConsoleNotifier::new(shared.clone())), shared.clone())
        .with_launcher(Launcher::Tracked(manager.clone()));

    let (tx, rx) = rendezvous();
    let dispatcher_handle = tokio::spawn(dispatcher.run(rx, manager.get_shutdown_rx()));

    let producer = Producer::new(shared, BatchPolicy::new(0, Duration::ZERO));
    let report = producer.run(users.clone(), &tx).await.unwrap();
    assert_eq!(report.sent, users.len());

    shutdown_tx.send(true).unwrap();
    assert_eq!(dispatcher_handle.await.unwrap().dispatched, users.len());

    let summary = manager.shutdown().await;
    assert_eq!(summary.completed, users.len() * 3);

    for user in &users {
        // "user1" is a prefix of "user10"; match the trailing ellipsis too.
        assert_eq!(output.count_containing(&format!("email to {}...", user)), 1);
        assert_eq!(output.count_containing(&format!("push notification to {}...", user)), 1);
        assert_eq!(output.count_containing(&format!("SMS to {}...", user)), 1);
    }
}

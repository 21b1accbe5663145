//! Launching concurrent tasks.
//!
//! The default is [`spawn_detached`]: the task is handed to the runtime and
//! forgotten. Nothing waits for it, and if the runtime goes away first the task
//! is abandoned at its next suspension point.
//!
//! [`TaskManager`] is the opt-in alternative for callers that do want to await
//! completion. It is never used implicitly.
use futures::future::join_all;
use std::future::Future;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// Spawns `future` on the current tokio runtime and discards its handle.
///
/// Returns immediately. A panic inside the task ends that task only.
///
/// # Panics
/// Panics if called outside of a tokio runtime.
pub fn spawn_detached<F>(future: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    drop(tokio::spawn(future));
}

/// Outcome of [`TaskManager::shutdown`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JoinSummary {
    pub completed: usize,
    pub panicked: usize,
}

/// A registry of spawned tasks that can be awaited together.
///
/// This struct is responsible for:
/// - Spawning tasks and keeping track of their `JoinHandle`s.
/// - Handing out the shutdown signal to loops that honour it.
/// - Awaiting every tracked task on [`TaskManager::shutdown`].
#[derive(Clone, Debug)]
pub struct TaskManager {
    handles: Arc<Mutex<Vec<(&'static str, JoinHandle<()>)>>>,
    shutdown_rx: watch::Receiver<bool>,
}

impl TaskManager {
    /// Creates a new `TaskManager` observing `shutdown_rx`.
    pub fn new(shutdown_rx: watch::Receiver<bool>) -> Self {
        Self {
            handles: Arc::new(Mutex::new(Vec::new())),
            shutdown_rx,
        }
    }

    /// Spawns a new task and keeps its handle.
    pub fn spawn<F>(&self, name: &'static str, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        debug!(task_name = name, "Spawning tracked task");
        let handle = tokio::spawn(future);
        self.lock_handles().push((name, handle));
    }

    /// Returns a clone of the shutdown receiver.
    pub fn get_shutdown_rx(&self) -> watch::Receiver<bool> {
        self.shutdown_rx.clone()
    }

    /// Number of tasks spawned and not yet awaited.
    pub fn pending(&self) -> usize {
        self.lock_handles().len()
    }

    /// Waits for every tracked task to finish.
    ///
    /// Tasks spawned while this runs are picked up as well.
    pub async fn shutdown(&self) -> JoinSummary {
        let mut summary = JoinSummary::default();

        loop {
            let handles = self.lock_handles().drain(..).collect::<Vec<_>>();
            if handles.is_empty() {
                break;
            }
            debug!(count = handles.len(), "Awaiting tracked tasks");

            let (names, handles): (Vec<_>, Vec<_>) = handles.into_iter().unzip();
            let results = join_all(handles).await;

            for (task_name, result) in names.into_iter().zip(results) {
                match result {
                    Ok(()) => summary.completed += 1,
                    Err(e) => {
                        error!(task_name, error = %e, "Tracked task panicked.");
                        summary.panicked += 1;
                    }
                }
            }
        }

        info!(
            completed = summary.completed,
            panicked = summary.panicked,
            "All tracked tasks finished."
        );
        summary
    }

    fn lock_handles(&self) -> std::sync::MutexGuard<'_, Vec<(&'static str, JoinHandle<()>)>> {
        // A poisoned lock only means a panic happened while pushing a handle;
        // the vector itself is still usable.
        self.handles
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// How a component launches the tasks it fans out.
#[derive(Clone, Debug, Default)]
pub enum Launcher {
    /// Fire and forget through [`spawn_detached`].
    #[default]
    Detached,
    /// Track every task in a [`TaskManager`] so the caller can await them.
    Tracked(TaskManager),
}

impl Launcher {
    pub fn launch<F>(&self, name: &'static str, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        match self {
            Launcher::Detached => spawn_detached(future),
            Launcher::Tracked(manager) => manager.spawn(name, future),
        }
    }
}

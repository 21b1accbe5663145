//! Handoff - two small concurrency demonstrations on tokio.
//!
//! - [`task::spawn_detached`] launches fire-and-forget tasks, shown by the
//!   payment simulation in [`payment`].
//! - [`channel::rendezvous`] is a zero-capacity synchronous channel. The order
//!   simulation in [`orders`] feeds it from a [`producer::Producer`] into a
//!   [`dispatcher::Dispatcher`] that fans each order out to notification tasks.

pub mod channel;
pub mod cli;
pub mod config;
pub mod dispatcher;
pub mod logging;
pub mod notification;
pub mod orders;
pub mod output;
pub mod payment;
pub mod producer;
pub mod task;

pub use channel::{rendezvous, RecvError, SendError};
pub use task::{spawn_detached, Launcher, TaskManager};

//! A zero-capacity, synchronous channel.
//!
//! Every `send` pairs with exactly one `recv`. The sender does not return until
//! a receiver has accepted its value, and a receiver does not return until a
//! sender has offered one. There is no queue: at most one offered value sits in
//! the handoff slot, and its sender stays blocked until the value is
//! acknowledged.
//!
//! The channel has no explicit close operation. It closes when every handle on
//! one side has been dropped.

use std::fmt;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use thiserror::Error;
use tokio::sync::oneshot;
use tracing::trace;

/// Returned by [`Sender::send`] when no receiver is left. Carries the value back.
#[derive(Error, PartialEq, Eq, Clone, Copy)]
#[error("sending on a closed rendezvous channel")]
pub struct SendError<T>(pub T);

impl<T> SendError<T> {
    /// Recovers the value that could not be handed off.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Debug for SendError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SendError").finish_non_exhaustive()
    }
}

/// Returned by [`Receiver::recv`] once every sender is gone.
#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
#[error("receiving on a closed rendezvous channel")]
pub struct RecvError;

/// An offered value together with the acknowledgement its sender is waiting on.
///
/// The acknowledgement hands the value back if the channel closes before any
/// receiver accepts it.
struct Offer<T> {
    value: T,
    ack: oneshot::Sender<Result<(), T>>,
}

struct Shared {
    receivers: AtomicUsize,
}

/// Creates a rendezvous channel.
pub fn rendezvous<T>() -> (Sender<T>, Receiver<T>) {
    let (slot_tx, slot_rx) = async_channel::bounded(1);
    let shared = Arc::new(Shared {
        receivers: AtomicUsize::new(1),
    });

    (
        Sender { slot: slot_tx },
        Receiver {
            slot: slot_rx,
            shared,
        },
    )
}

/// The sending half of a rendezvous channel.
pub struct Sender<T> {
    slot: async_channel::Sender<Offer<T>>,
}

impl<T> Clone for Sender<T> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
        }
    }
}

impl<T> fmt::Debug for Sender<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sender")
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl<T> Sender<T> {
    /// Hands `value` to a receiver, waiting until one accepts it.
    ///
    /// Waits indefinitely while the channel is open and nobody receives.
    pub async fn send(&self, value: T) -> Result<(), SendError<T>> {
        let (ack_tx, ack_rx) = oneshot::channel();
        let offer = Offer { value, ack: ack_tx };

        if let Err(err) = self.slot.send(offer).await {
            return Err(SendError(err.into_inner().value));
        }
        trace!("value offered, waiting for a receiver");

        match ack_rx.await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(value)) => Err(SendError(value)),
            // The offer is only ever dropped without an answer after the
            // receiving side has closed.
            Err(_) => unreachable!("rendezvous offer dropped without acknowledgement"),
        }
    }

    /// Returns `true` once every receiver has been dropped.
    pub fn is_closed(&self) -> bool {
        self.slot.is_closed()
    }

    /// Number of live sender handles.
    pub fn sender_count(&self) -> usize {
        self.slot.sender_count()
    }

    /// Number of live receiver handles.
    pub fn receiver_count(&self) -> usize {
        self.slot.receiver_count()
    }
}

/// The receiving half of a rendezvous channel.
pub struct Receiver<T> {
    slot: async_channel::Receiver<Offer<T>>,
    shared: Arc<Shared>,
}

impl<T> Clone for Receiver<T> {
    fn clone(&self) -> Self {
        self.shared.receivers.fetch_add(1, Ordering::SeqCst);
        Self {
            slot: self.slot.clone(),
            shared: self.shared.clone(),
        }
    }
}

impl<T> fmt::Debug for Receiver<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Receiver")
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl<T> Receiver<T> {
    /// Waits for a sender and takes its value.
    ///
    /// An offer whose sender stopped waiting is skipped: the value was never
    /// handed off, so it is not delivered.
    pub async fn recv(&self) -> Result<T, RecvError> {
        loop {
            let Offer { value, ack } = self.slot.recv().await.map_err(|_| RecvError)?;
            match ack.send(Ok(())) {
                Ok(()) => return Ok(value),
                Err(_) => trace!("sender abandoned its offer, skipping"),
            }
        }
    }

    /// Returns `true` once every sender has been dropped.
    pub fn is_closed(&self) -> bool {
        self.slot.is_closed()
    }

    /// Number of live sender handles.
    pub fn sender_count(&self) -> usize {
        self.slot.sender_count()
    }

    /// Number of live receiver handles.
    pub fn receiver_count(&self) -> usize {
        self.shared.receivers.load(Ordering::SeqCst)
    }
}

impl<T> Drop for Receiver<T> {
    fn drop(&mut self) {
        if self.shared.receivers.fetch_sub(1, Ordering::SeqCst) != 1 {
            return;
        }

        // Last receiver: close first so no new offer can land, then return any
        // pending offer to its sender.
        self.slot.close();
        while let Ok(Offer { value, ack }) = self.slot.try_recv() {
            let _ = ack.send(Err(value));
        }
    }
}

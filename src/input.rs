// Copyright (c) 2025 - Cowboy AI, Inc.
//! Input events and the push-based source that emits them
//!
//! The [`InputSource`] stands in for the clickable surface. Every call to
//! [`InputSource::emit`] stamps the click with an arrival sequence number and
//! pushes it to all live [`InputSubscription`]s. Subscriptions are unbounded
//! and unregister themselves when dropped, so the number of live listeners
//! is always observable through [`InputSource::subscriber_count`].

use futures::Stream;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::debug;

/// A coordinate on the drawing surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A single click on the surface
///
/// `seq` is assigned by the source in arrival order and is unique per source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputEvent {
    pub seq: u64,
    pub at: Point,
}

#[derive(Debug, Default)]
struct Registry {
    next_seq: u64,
    next_id: u64,
    subscribers: Vec<(u64, mpsc::UnboundedSender<InputEvent>)>,
}

fn lock(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Push-based, never-failing source of click events
#[derive(Debug, Clone, Default)]
pub struct InputSource {
    registry: Arc<Mutex<Registry>>,
}

impl InputSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a click at `(x, y)` to every live subscription
    pub fn emit(&self, x: i32, y: i32) -> InputEvent {
        let mut registry = lock(&self.registry);
        let event = InputEvent {
            seq: registry.next_seq,
            at: Point::new(x, y),
        };
        registry.next_seq += 1;
        registry
            .subscribers
            .retain(|(_, tx)| tx.send(event).is_ok());

        debug!(seq = event.seq, x, y, listeners = registry.subscribers.len(), "Input event emitted");
        event
    }

    /// Open a new subscription that receives every event emitted from now on
    pub fn subscribe(&self) -> InputSubscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut registry = lock(&self.registry);
        let id = registry.next_id;
        registry.next_id += 1;
        registry.subscribers.push((id, tx));

        debug!(subscription = id, "Input subscription opened");
        InputSubscription {
            id,
            events: UnboundedReceiverStream::new(rx),
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Stop delivering events to the subscription with `id`
    ///
    /// Takes effect immediately, even while the subscription itself is still
    /// owned by a task that has not been dropped yet. Returns whether a
    /// subscription was removed.
    pub fn unsubscribe(&self, id: u64) -> bool {
        let mut registry = lock(&self.registry);
        let before = registry.subscribers.len();
        registry.subscribers.retain(|(sub, _)| *sub != id);
        let removed = registry.subscribers.len() != before;
        if removed {
            debug!(subscription = id, "Input subscription removed by owner");
        }
        removed
    }

    /// Number of subscriptions currently registered
    pub fn subscriber_count(&self) -> usize {
        lock(&self.registry)
            .subscribers
            .iter()
            .filter(|(_, tx)| !tx.is_closed())
            .count()
    }
}

/// Live subscription to an [`InputSource`]
///
/// Dropping the subscription unregisters it from the source immediately.
#[derive(Debug)]
pub struct InputSubscription {
    id: u64,
    events: UnboundedReceiverStream<InputEvent>,
    registry: Weak<Mutex<Registry>>,
}

impl InputSubscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Unregister from the source, discarding any undelivered events
    pub fn cancel(self) {}
}

impl Stream for InputSubscription {
    type Item = InputEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.events).poll_next(cx)
    }
}

impl Drop for InputSubscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            lock(&registry).subscribers.retain(|(id, _)| *id != self.id);
            debug!(subscription = self.id, "Input subscription closed");
        }
    }
}

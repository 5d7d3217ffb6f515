// Copyright (c) 2025 - Cowboy AI, Inc.
//! Clear timers
//!
//! Every drawn marker gets its own clear callback, scheduled independently
//! of the draw that produced it. The timers live in one task owned by the
//! scheduler, so they outlive a strategy switch and die with `stop`.

use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::debug;

use crate::input::Point;
use crate::render::RenderTarget;

/// Cheap handle used to schedule clears
#[derive(Debug, Clone)]
pub(crate) struct ClearHandle {
    tx: mpsc::UnboundedSender<(Point, Instant)>,
}

impl ClearHandle {
    /// Clear the marker at `at` once `deadline` is reached
    pub(crate) fn schedule(&self, at: Point, deadline: Instant) {
        if self.tx.send((at, deadline)).is_err() {
            debug!(%at, "Clear timers already stopped, clear not scheduled");
        }
    }
}

/// Task running all outstanding clear callbacks
#[derive(Debug)]
pub(crate) struct ClearTimers {
    handle: ClearHandle,
    task: JoinHandle<()>,
}

impl ClearTimers {
    pub(crate) fn spawn(surface: Arc<dyn RenderTarget>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run_clears(rx, surface));
        Self {
            handle: ClearHandle { tx },
            task,
        }
    }

    pub(crate) fn handle(&self) -> ClearHandle {
        self.handle.clone()
    }

    /// Cancel every clear that has not fired yet
    pub(crate) fn abort(self) {
        self.task.abort();
    }
}

async fn run_clears(
    mut rx: mpsc::UnboundedReceiver<(Point, Instant)>,
    surface: Arc<dyn RenderTarget>,
) {
    let mut timers = FuturesUnordered::new();

    loop {
        tokio::select! {
            Some((at, deadline)) = rx.recv() => {
                timers.push(async move {
                    sleep_until(deadline).await;
                    at
                });
            }
            Some(at) = timers.next(), if !timers.is_empty() => {
                surface.clear_marker(at);
            }
            else => break,
        }
    }

    debug!("Clear timers drained");
}

// Copyright (c) 2025 - Cowboy AI, Inc.
//! Per-subscription pipeline
//!
//! ```text
//! InputSubscription ──inspect(on_input_event)──> flat_map_with(strategy, admit)
//!                          │                               │
//!                   feedback marker               PendingAction::resolve
//!                   + clear timer                 (sleep, draw, clear timer)
//! ```
//!
//! A pipeline is built for exactly one strategy and lives inside one task.
//! Retiring or aborting that task drops the flattening stream and with it
//! every pending draw, whatever the strategy. A retired pipeline still gives
//! click feedback for events that reached it but were never read.

use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::{sleep, Instant};
use tracing::{debug, info};

use super::clear::ClearHandle;
use crate::frp::flat_map_with;
use crate::input::{InputEvent, InputSubscription};
use crate::render::{MarkerColor, RenderTarget};
use crate::strategy::Strategy;

/// Delayed draw for one admitted click
///
/// The color is taken from the strategy in force when the click was
/// admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingAction {
    pub event: InputEvent,
    pub color: MarkerColor,
    pub delay: Duration,
}

impl PendingAction {
    pub fn new(event: InputEvent, strategy: Strategy, delay: Duration) -> Self {
        Self {
            event,
            color: strategy.color(),
            delay,
        }
    }

    /// Wait out the delay, draw the marker and schedule its clear
    pub(crate) async fn resolve(self, surface: Arc<dyn RenderTarget>, clears: ClearHandle) -> InputEvent {
        sleep(self.delay).await;

        surface.draw_marker(self.event.at, self.color);
        clears.schedule(self.event.at, Instant::now() + self.delay);
        self.event
    }
}

#[derive(Clone)]
pub(crate) struct Pipeline {
    pub(crate) strategy: Strategy,
    pub(crate) delay: Duration,
    pub(crate) click_feedback: bool,
    pub(crate) surface: Arc<dyn RenderTarget>,
    pub(crate) clears: ClearHandle,
}

impl Pipeline {
    /// Called for every event delivered to the live subscription, before
    /// the strategy decides whether to admit it
    pub(crate) fn on_input_event(&self, event: &InputEvent) {
        debug!(seq = event.seq, at = %event.at, strategy = %self.strategy, "Input event received");

        if self.click_feedback {
            self.surface.draw_marker(event.at, MarkerColor::Yellow);
            self.clears.schedule(event.at, Instant::now() + self.delay);
        }
    }

    fn admit(&self, event: InputEvent) -> impl std::future::Future<Output = InputEvent> + Send + 'static {
        debug!(seq = event.seq, strategy = %self.strategy, "Pending action admitted");
        PendingAction::new(event, self.strategy, self.delay)
            .resolve(self.surface.clone(), self.clears.clone())
    }

    pub(crate) async fn run(self, events: InputSubscription, mut retire: oneshot::Receiver<()>) {
        let subscription = events.id();
        let hooks = self.clone();
        let actions = self.clone();

        let mut resolved = flat_map_with(
            self.strategy,
            events.inspect(move |event| hooks.on_input_event(event)),
            move |event| actions.admit(event),
        );

        loop {
            tokio::select! {
                biased;
                _ = &mut retire => break,
                next = resolved.next() => match next {
                    Some(event) => {
                        debug!(seq = event.seq, strategy = %self.strategy, "Pending action resolved");
                    }
                    None => {
                        info!(subscription, strategy = %self.strategy, "Input source closed, pipeline finished");
                        return;
                    }
                },
            }
        }

        let cancelled = resolved.pending() + resolved.queued();
        let mut unread = resolved.into_inner().into_inner();
        let mut drained = 0usize;
        while let Some(event) = unread.next().await {
            self.on_input_event(&event);
            drained += 1;
        }

        debug!(subscription, strategy = %self.strategy, cancelled, drained, "Pipeline retired");
    }
}

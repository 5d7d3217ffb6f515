// Copyright (c) 2025 - Cowboy AI, Inc.
//! Stream Scheduler
//!
//! Binds strategy selection × input events to delayed draw actions.
//!
//! # Lifecycle
//!
//! ```text
//!            start                    set_strategy(s)
//!   Idle ───────────> Subscribed(a) ─────────────────> Subscribed(s)
//!    ^                      │
//!    └──────── stop ────────┘
//! ```
//!
//! The scheduler owns exactly one subscription to the [`InputSource`] while
//! subscribed. Switching strategy removes the old subscription from the
//! source and opens the new one before returning, so every event emitted
//! after `set_strategy` reaches the new pipeline and no event reaches both.
//!
//! Pending draws of the old pipeline are cancelled on a switch for every
//! strategy. Events that reached the old pipeline but were not read yet
//! still get their click feedback. Clears of markers already drawn keep
//! running until `stop`.
//!
//! # Example
//!
//! ```rust,ignore
//! let source = InputSource::new();
//! let surface = Arc::new(RecordingSurface::new());
//! let mut scheduler = StreamScheduler::spawn(SchedulerConfig::default(), source.clone(), surface)?;
//!
//! source.emit(120, 40);
//! scheduler.set_strategy(Strategy::Concat);
//! ```

mod clear;
mod pipeline;

pub use pipeline::PendingAction;

use std::sync::Arc;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::SchedulerConfig;
use crate::errors::SchedulerResult;
use crate::frp::Behavior;
use crate::input::InputSource;
use crate::render::RenderTarget;
use crate::state_machine::{
    LifecycleEffect, LifecycleInput, SchedulerState, StateMachineWithHistory, Transition,
};
use crate::strategy::Strategy;

use clear::ClearTimers;
use pipeline::Pipeline;

#[derive(Debug)]
struct LiveSubscription {
    id: u64,
    retire: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

/// Owner of the live, re-bindable click pipeline
pub struct StreamScheduler {
    config: SchedulerConfig,
    source: InputSource,
    surface: Arc<dyn RenderTarget>,
    lifecycle: StateMachineWithHistory<SchedulerState>,
    selection: watch::Sender<Strategy>,
    subscription: Option<LiveSubscription>,
    /// Pipelines replaced by a switch that may still be giving feedback
    retired: Vec<JoinHandle<()>>,
    clears: Option<ClearTimers>,
}

impl std::fmt::Debug for StreamScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamScheduler")
            .field("config", &self.config)
            .field("state", self.lifecycle.current_state())
            .field("subscription", &self.subscription.as_ref().map(|s| s.id))
            .finish()
    }
}

impl StreamScheduler {
    /// Create an idle scheduler
    ///
    /// Fails only if the configuration is invalid.
    pub fn new(
        config: SchedulerConfig,
        source: InputSource,
        surface: Arc<dyn RenderTarget>,
    ) -> SchedulerResult<Self> {
        config.validate()?;
        let (selection, _) = watch::channel(config.initial_strategy);

        Ok(Self {
            config,
            source,
            surface,
            lifecycle: StateMachineWithHistory::new(SchedulerState::Idle),
            selection,
            subscription: None,
            retired: Vec::new(),
            clears: None,
        })
    }

    /// Create a scheduler and subscribe it with the configured strategy
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(
        config: SchedulerConfig,
        source: InputSource,
        surface: Arc<dyn RenderTarget>,
    ) -> SchedulerResult<Self> {
        let mut scheduler = Self::new(config, source, surface)?;
        scheduler.start();
        Ok(scheduler)
    }

    /// Subscribe to the input source with the selected strategy
    ///
    /// Does nothing if already subscribed.
    pub fn start(&mut self) {
        let strategy = *self.selection.borrow();
        let effect = self.lifecycle.apply(LifecycleInput::Start(strategy));
        self.perform(effect);
    }

    /// Select a new strategy, rebinding the live subscription
    ///
    /// Selecting the active strategy is a no-op. While idle the selection is
    /// remembered for the next `start`.
    pub fn set_strategy(&mut self, strategy: Strategy) {
        self.selection.send_replace(strategy);
        let effect = self.lifecycle.apply(LifecycleInput::Select(strategy));
        self.perform(effect);
    }

    /// Cancel the live subscription, every pending draw and every pending clear
    pub fn stop(&mut self) {
        let effect = self.lifecycle.apply(LifecycleInput::Stop);
        self.perform(effect);
    }

    /// Strategy currently selected
    pub fn strategy(&self) -> Strategy {
        *self.selection.borrow()
    }

    /// The strategy selection as a continuously sampled signal
    pub fn selection(&self) -> Behavior<Strategy> {
        Behavior::from_watch(self.selection.subscribe())
    }

    pub fn state(&self) -> SchedulerState {
        *self.lifecycle.current_state()
    }

    pub fn is_running(&self) -> bool {
        self.state().is_subscribed()
    }

    /// Id of the live input subscription, if any
    pub fn subscription_id(&self) -> Option<u64> {
        self.subscription.as_ref().map(|s| s.id)
    }

    /// Every lifecycle transition that changed the state
    pub fn transitions(&self) -> &[Transition<SchedulerState, LifecycleInput>] {
        self.lifecycle.history()
    }

    fn perform(&mut self, effect: LifecycleEffect) {
        match effect {
            LifecycleEffect::None => {
                debug!(state = ?self.state(), "Lifecycle input had no effect");
            }
            LifecycleEffect::Subscribe(strategy) => {
                self.clears = Some(ClearTimers::spawn(self.surface.clone()));
                self.subscribe(strategy);
                info!(%strategy, delay_ms = self.config.delay_ms, "Scheduler started");
            }
            LifecycleEffect::Resubscribe { from, to } => {
                self.retire();
                self.subscribe(to);
                info!(%from, %to, "Strategy switched");
            }
            LifecycleEffect::Unsubscribe => {
                self.abort();
                if let Some(clears) = self.clears.take() {
                    clears.abort();
                }
                info!("Scheduler stopped");
            }
        }
    }

    fn subscribe(&mut self, strategy: Strategy) {
        let Some(clears) = self.clears.as_ref() else {
            return;
        };

        let events = self.source.subscribe();
        let id = events.id();
        let (retire, retired) = oneshot::channel();
        let pipeline = Pipeline {
            strategy,
            delay: self.config.delay(),
            click_feedback: self.config.click_feedback,
            surface: self.surface.clone(),
            clears: clears.handle(),
        };

        let task = tokio::spawn(pipeline.run(events, retired));
        self.subscription = Some(LiveSubscription { id, retire, task });
        debug!(subscription = id, %strategy, "Pipeline subscribed");
    }

    /// Detach the live pipeline from the source and let it wind down
    ///
    /// Pending draws are dropped before the pipeline is polled again;
    /// unread events only get their feedback.
    fn retire(&mut self) {
        if let Some(live) = self.subscription.take() {
            self.source.unsubscribe(live.id);
            if live.retire.send(()).is_err() {
                debug!(subscription = live.id, "Pipeline already finished");
            }
            self.retired.retain(|task| !task.is_finished());
            self.retired.push(live.task);
            debug!(subscription = live.id, "Pipeline retired");
        }
    }

    fn abort(&mut self) {
        if let Some(live) = self.subscription.take() {
            self.source.unsubscribe(live.id);
            live.task.abort();
            debug!(subscription = live.id, "Pipeline aborted");
        }
        for task in self.retired.drain(..) {
            task.abort();
        }
    }
}

impl Drop for StreamScheduler {
    fn drop(&mut self) {
        if self.is_running() {
            self.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frp::Samplable;
    use crate::render::RecordingSurface;

    fn scheduler(source: &InputSource) -> StreamScheduler {
        StreamScheduler::new(
            SchedulerConfig::default(),
            source.clone(),
            Arc::new(RecordingSurface::new()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_new_is_idle() {
        let source = InputSource::new();
        let scheduler = scheduler(&source);

        assert_eq!(scheduler.state(), SchedulerState::Idle);
        assert_eq!(scheduler.strategy(), Strategy::Switch);
        assert_eq!(source.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_start_subscribes_once() {
        let source = InputSource::new();
        let mut scheduler = scheduler(&source);

        scheduler.start();
        scheduler.start();

        assert_eq!(scheduler.state(), SchedulerState::Subscribed(Strategy::Switch));
        assert_eq!(source.subscriber_count(), 1);
    }

    #[tokio::test]
    async fn test_switch_replaces_subscription_synchronously() {
        let source = InputSource::new();
        let mut scheduler = scheduler(&source);
        scheduler.start();
        let first = scheduler.subscription_id().unwrap();

        scheduler.set_strategy(Strategy::Merge);

        assert_ne!(scheduler.subscription_id().unwrap(), first);
        assert_eq!(source.subscriber_count(), 1);
        assert_eq!(scheduler.state(), SchedulerState::Subscribed(Strategy::Merge));
    }

    #[tokio::test]
    async fn test_same_strategy_keeps_subscription() {
        let source = InputSource::new();
        let mut scheduler = scheduler(&source);
        scheduler.start();
        let first = scheduler.subscription_id();

        scheduler.set_strategy(Strategy::Switch);

        assert_eq!(scheduler.subscription_id(), first);
        assert_eq!(source.subscriber_count(), 1);
    }

    #[tokio::test]
    async fn test_select_while_idle_applies_on_start() {
        let source = InputSource::new();
        let mut scheduler = scheduler(&source);

        scheduler.set_strategy(Strategy::Exhaust);
        assert_eq!(source.subscriber_count(), 0);

        scheduler.start();
        assert_eq!(scheduler.state(), SchedulerState::Subscribed(Strategy::Exhaust));
    }

    #[tokio::test]
    async fn test_stop_and_drop_release_subscription() {
        let source = InputSource::new();
        let mut scheduler = scheduler(&source);
        scheduler.start();

        scheduler.stop();
        assert!(!scheduler.is_running());
        assert_eq!(source.subscriber_count(), 0);

        scheduler.start();
        assert_eq!(source.subscriber_count(), 1);
        drop(scheduler);
        assert_eq!(source.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_selection_behavior_tracks_switches() {
        let source = InputSource::new();
        let mut scheduler = scheduler(&source);
        scheduler.start();
        let selection = scheduler.selection();

        scheduler.set_strategy(Strategy::Concat);
        assert_eq!(selection.sample(), Strategy::Concat);
    }

    #[tokio::test]
    async fn test_transitions_are_recorded() {
        let source = InputSource::new();
        let mut scheduler = scheduler(&source);
        scheduler.start();
        scheduler.set_strategy(Strategy::Merge);
        scheduler.stop();

        let history = scheduler.transitions();
        assert_eq!(history.len(), 3);
        assert_eq!(history[1].input, LifecycleInput::Select(Strategy::Merge));
        assert_eq!(history[2].to, SchedulerState::Idle);
    }

    #[tokio::test]
    async fn test_repeated_inputs_do_not_grow_history() {
        let source = InputSource::new();
        let mut scheduler = scheduler(&source);
        scheduler.start();

        for _ in 0..10 {
            scheduler.start();
            scheduler.set_strategy(Strategy::Switch);
        }

        assert_eq!(scheduler.transitions().len(), 1);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = SchedulerConfig {
            delay_ms: 0,
            ..SchedulerConfig::default()
        };
        let result = StreamScheduler::new(config, InputSource::new(), Arc::new(RecordingSurface::new()));
        assert!(result.is_err());
    }
}

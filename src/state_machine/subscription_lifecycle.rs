// Copyright (c) 2025 - Cowboy AI, Inc.
//! Subscription Lifecycle State Machine
//!
//! # States
//!
//! - Idle: no subscription to the input source
//! - Subscribed(strategy): exactly one live subscription flattened with
//!   `strategy`
//!
//! # Inputs
//!
//! - Start(strategy): Idle → Subscribed(strategy)
//! - Select(strategy): Subscribed(old) → Subscribed(strategy)
//! - Stop: Subscribed → Idle
//!
//! Every other combination leaves the state unchanged and produces
//! [`LifecycleEffect::None`], which is what makes repeated `start` calls and
//! re-selecting the active strategy harmless.

use serde::{Deserialize, Serialize};

use super::StateMachine;
use crate::strategy::Strategy;

/// Scheduler subscription state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchedulerState {
    Idle,
    Subscribed(Strategy),
}

impl SchedulerState {
    pub fn is_subscribed(&self) -> bool {
        matches!(self, SchedulerState::Subscribed(_))
    }

    pub fn strategy(&self) -> Option<Strategy> {
        match self {
            SchedulerState::Idle => None,
            SchedulerState::Subscribed(strategy) => Some(*strategy),
        }
    }
}

/// Lifecycle command (FSM input)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleInput {
    Start(Strategy),
    Select(Strategy),
    Stop,
}

/// What the scheduler must do to its subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEffect {
    /// Nothing changes
    None,
    /// Open a subscription flattened with the strategy
    Subscribe(Strategy),
    /// Tear down the live subscription, then open one with `to`
    Resubscribe { from: Strategy, to: Strategy },
    /// Tear down the live subscription and all pending work
    Unsubscribe,
}

impl StateMachine for SchedulerState {
    type Input = LifecycleInput;
    type Output = LifecycleEffect;

    fn transition(&self, input: &Self::Input) -> (Self, Self::Output) {
        use LifecycleInput::*;
        use SchedulerState::*;

        match (*self, *input) {
            (Idle, Start(strategy)) => (Subscribed(strategy), LifecycleEffect::Subscribe(strategy)),
            (Idle, Select(_)) | (Idle, Stop) => (Idle, LifecycleEffect::None),
            (Subscribed(_), Start(_)) => (*self, LifecycleEffect::None),
            (Subscribed(from), Select(to)) if from == to => (*self, LifecycleEffect::None),
            (Subscribed(from), Select(to)) => {
                (Subscribed(to), LifecycleEffect::Resubscribe { from, to })
            }
            (Subscribed(_), Stop) => (Idle, LifecycleEffect::Unsubscribe),
        }
    }
}

// Copyright (c) 2025 - Cowboy AI, Inc.
//! Finite State Machine Abstractions
//!
//! Lifecycles are modeled as pure Mealy machines: a transition maps the
//! current state and an input to the next state and an output describing
//! the side effect the caller has to perform.
//!
//! ```text
//! (State, Input) → (State, Output)
//! ```
//!
//! Keeping the transition pure lets the scheduler decide *what* to do to
//! its subscription from a table that can be tested without a runtime.

pub mod subscription_lifecycle;

pub use subscription_lifecycle::{LifecycleEffect, LifecycleInput, SchedulerState};

use tokio::time::Instant;

/// Trait for finite state machines with total transition functions
pub trait StateMachine: Sized + Clone {
    /// Input type that triggers transitions
    type Input;

    /// Output type produced by transitions (use () if none)
    type Output;

    /// Compute the next state and output for an input
    fn transition(&self, input: &Self::Input) -> (Self, Self::Output);
}

/// Record of one state transition
#[derive(Debug, Clone)]
pub struct Transition<S, I> {
    pub from: S,
    pub to: S,
    pub input: I,
    pub at: Instant,
}

/// State machine that remembers the transitions that changed its state
///
/// Inputs that leave the state as it was are not recorded, so repeated
/// no-op inputs do not grow the history.
#[derive(Debug, Clone)]
pub struct StateMachineWithHistory<FSM: StateMachine> {
    current: FSM,
    history: Vec<Transition<FSM, FSM::Input>>,
}

impl<FSM: StateMachine + PartialEq> StateMachineWithHistory<FSM> {
    pub fn new(initial: FSM) -> Self {
        Self {
            current: initial,
            history: Vec::new(),
        }
    }

    /// Apply an input and return its output, recording it if the state changed
    pub fn apply(&mut self, input: FSM::Input) -> FSM::Output {
        let (to, output) = self.current.transition(&input);
        if to == self.current {
            return output;
        }
        let from = std::mem::replace(&mut self.current, to.clone());

        self.history.push(Transition {
            from,
            to,
            input,
            at: Instant::now(),
        });
        output
    }

    pub fn history(&self) -> &[Transition<FSM, FSM::Input>] {
        &self.history
    }

    pub fn current_state(&self) -> &FSM {
        &self.current
    }
}

// Copyright (c) 2025 - Cowboy AI, Inc.
//! DiscreteEvent - Discrete-Time Signals
//!
//! A `DiscreteEvent<T>` is a finite list of occurrences:
//!
//! ```text
//! DiscreteEvent<T> ≅ [(Time, T)]
//! ```
//!
//! The recording surface hands out its history of draws and clears as a
//! `DiscreteEvent<SurfaceOp>`, so questions like "how many draws happened
//! and how far apart were they" become plain filters:
//!
//! ```rust,ignore
//! let draws = surface.timeline().filter(SurfaceOp::is_draw);
//! let gaps = draws.intervals();
//! ```

use super::signal::{Discrete, Signal};
use super::{Occurrence, Time};
use std::fmt::Debug;

/// Discrete-time signal with values at specific moments
#[derive(Clone, Debug)]
pub struct DiscreteEvent<T> {
    /// Occurrences sorted by time
    occurrences: Vec<Occurrence<T>>,
}

impl<T: Clone + Debug + Send + Sync + 'static> DiscreteEvent<T> {
    /// Create an event stream from a vector of occurrences
    ///
    /// Occurrences are sorted by time; occurrences sharing a time keep their
    /// original order.
    pub fn from_vec(mut occurrences: Vec<Occurrence<T>>) -> Self {
        occurrences.sort_by_key(|(time, _)| *time);
        Self { occurrences }
    }

    pub fn len(&self) -> usize {
        self.occurrences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occurrences.is_empty()
    }

    /// Keep only occurrences whose value matches the predicate
    pub fn filter<F>(self, predicate: F) -> Self
    where
        F: Fn(&T) -> bool,
    {
        let filtered = self
            .occurrences
            .into_iter()
            .filter(|(_, value)| predicate(value))
            .collect();

        Self {
            occurrences: filtered,
        }
    }

    /// Times of all occurrences
    pub fn times(&self) -> Vec<Time> {
        self.occurrences.iter().map(|(time, _)| *time).collect()
    }

    /// Values of all occurrences, in time order
    pub fn values(&self) -> Vec<T> {
        self.occurrences
            .iter()
            .map(|(_, value)| value.clone())
            .collect()
    }

    /// Gaps between consecutive occurrences
    pub fn intervals(&self) -> Vec<Time> {
        self.occurrences
            .windows(2)
            .map(|pair| pair[1].0 - pair[0].0)
            .collect()
    }
}

impl<T: Clone + Debug + Send + Sync + 'static> Signal<T> for DiscreteEvent<T> {
    type Mapped<U: Clone + Debug + Send + Sync + 'static> = DiscreteEvent<U>;

    fn map<U, F>(self, f: F) -> Self::Mapped<U>
    where
        F: Fn(T) -> U + Clone + Send + Sync + 'static,
        U: Clone + Debug + Send + Sync + 'static,
    {
        let mapped = self
            .occurrences
            .into_iter()
            .map(|(time, value)| (time, f(value)))
            .collect();

        DiscreteEvent {
            occurrences: mapped,
        }
    }
}

impl<T: Clone + Debug + Send + Sync + 'static> Discrete<T> for DiscreteEvent<T> {
    fn occurrences(&self) -> Vec<Occurrence<T>> {
        self.occurrences.clone()
    }
}

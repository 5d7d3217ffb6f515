// Copyright (c) 2025 - Cowboy AI, Inc.
//! Signal Trait - Base abstraction for time-varying values
//!
//! ```text
//! Signal<T>
//!   ├── Behavior<T>       (always has a value: the selected strategy)
//!   └── DiscreteEvent<T>  (values at instants: what happened on the surface)
//! ```
//!
//! All implementations must satisfy the Functor laws:
//!
//! 1. **Identity**: `signal.map(|x| x) == signal`
//! 2. **Composition**: `signal.map(f).map(g) == signal.map(|x| g(f(x)))`

use std::fmt::Debug;

/// Base trait for time-varying values
///
/// A `Signal<T>` carries values of type `T` over time and supports `map`.
pub trait Signal<T: Send + Sync>: Clone + Debug + Send + Sync {
    /// The type of signal produced by map
    type Mapped<U: Clone + Debug + Send + Sync + 'static>: Signal<U>;

    /// Apply a function to the signal's values
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let selection: Behavior<Strategy> = scheduler.selection();
    /// let color: Behavior<MarkerColor> = selection.map(|s| s.color());
    /// ```
    fn map<U, F>(self, f: F) -> Self::Mapped<U>
    where
        F: Fn(T) -> U + Clone + Send + Sync + 'static,
        U: Clone + Debug + Send + Sync + 'static;
}

/// Signals that can be sampled at any time
pub trait Samplable<T: Send + Sync>: Signal<T> {
    /// Current value of the signal
    fn sample(&self) -> T;
}

/// Signals with discrete occurrences
pub trait Discrete<T: Send + Sync>: Signal<T> {
    /// All (time, value) occurrences, sorted by time
    fn occurrences(&self) -> Vec<crate::frp::Occurrence<T>>;
}

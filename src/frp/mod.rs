// Copyright (c) 2025 - Cowboy AI, Inc.
//! Functional Reactive Programming (FRP) Abstractions
//!
//! The click scheduler is described with two kinds of signals and one family
//! of higher-order combinators.
//!
//! ## Behavior<T> (Continuous-Time)
//!
//! A value that exists at all points in time, such as the strategy the
//! user has selected.
//!
//! ```text
//! Time: ────────────────────────────→
//! Value:  ≈≈≈≈≈≈≈≈≈≈≈≈≈≈≈≈≈≈≈≈≈≈≈≈≈
//! ```
//!
//! ## DiscreteEvent<T> (Discrete-Time)
//!
//! Values at specific moments, such as the draws and clears applied to a
//! surface.
//!
//! ```text
//! Time: ────────────────────────────→
//! Value:      ●       ●   ●       ●
//! ```
//!
//! ## Flattening combinators
//!
//! `switch_map`, `merge_map`, `concat_map` and `exhaust_map` turn a live
//! `Stream` of outer items into a stream of inner future results. See
//! [`combinators`].

pub mod signal;
pub mod behavior;
pub mod event;
pub mod combinators;

pub use signal::{Discrete, Samplable, Signal};
pub use behavior::Behavior;
pub use event::DiscreteEvent;
pub use combinators::*;

/// Time representation (milliseconds since a surface-defined origin)
pub type Time = i64;

/// A single (time, value) occurrence
pub type Occurrence<T> = (Time, T);

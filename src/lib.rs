// Copyright (c) 2025 - Cowboy AI, Inc.
//! Higher-order click scheduling
//!
//! Clicks on a surface are turned into colored markers that appear after a
//! fixed delay. Which markers appear, and when, is decided by one of four
//! flattening strategies: switch, merge, concat or exhaust.
//!
//! - [`frp`] provides the signal vocabulary and the flattening combinators
//! - [`StreamScheduler`] owns the live subscription and re-binds it when the
//!   strategy changes
//! - [`InputSource`] and [`RenderTarget`] are the two boundaries

pub mod config;
pub mod errors;
pub mod frp;
pub mod input;
pub mod render;
pub mod scheduler;
pub mod state_machine;
pub mod strategy;

// Re-export commonly used types
pub use config::SchedulerConfig;
pub use errors::{SchedulerError, SchedulerResult};
pub use input::{InputEvent, InputSource, InputSubscription, Point};
pub use render::{Marker, MarkerColor, RecordingSurface, RenderTarget, SurfaceOp};
pub use scheduler::{PendingAction, StreamScheduler};
pub use state_machine::SchedulerState;
pub use strategy::Strategy;

// Copyright (c) 2025 - Cowboy AI, Inc.
//! Render target abstraction and an in-memory recording surface
//!
//! The scheduler only ever talks to a [`RenderTarget`]: it draws a colored
//! square when a pending action resolves and clears it one delay later.
//! [`RecordingSurface`] keeps the markers currently visible and a timeline
//! of every operation, which is what the demo binary prints and what the
//! tests assert against.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::time::Instant;
use tracing::debug;

use crate::frp::{DiscreteEvent, Occurrence, Time};
use crate::input::Point;

/// Edge length of a marker, in surface units
pub const MARKER_SIZE: u32 = 15;

/// Marker colors: one per strategy plus the click feedback color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerColor {
    Red,
    Green,
    Black,
    Purple,
    /// Immediate feedback drawn on every click
    Yellow,
}

impl fmt::Display for MarkerColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MarkerColor::Red => "red",
            MarkerColor::Green => "green",
            MarkerColor::Black => "black",
            MarkerColor::Purple => "purple",
            MarkerColor::Yellow => "yellow",
        };
        f.write_str(name)
    }
}

/// A square currently painted on the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {
    pub at: Point,
    pub color: MarkerColor,
    pub size: u32,
}

/// Something the scheduler can paint markers on
///
/// Both operations are synchronous and cannot fail.
pub trait RenderTarget: Send + Sync {
    /// Paint a [`MARKER_SIZE`] square at `at`
    fn draw_marker(&self, at: Point, color: MarkerColor);

    /// Remove the square previously painted at `at`
    fn clear_marker(&self, at: Point);
}

/// One operation applied to a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum SurfaceOp {
    Draw { at: Point, color: MarkerColor },
    Clear { at: Point },
}

impl SurfaceOp {
    pub fn at(&self) -> Point {
        match self {
            SurfaceOp::Draw { at, .. } | SurfaceOp::Clear { at } => *at,
        }
    }

    pub fn is_draw(&self) -> bool {
        matches!(self, SurfaceOp::Draw { .. })
    }

    pub fn is_clear(&self) -> bool {
        matches!(self, SurfaceOp::Clear { .. })
    }

    /// Color of a draw operation, `None` for clears
    pub fn color(&self) -> Option<MarkerColor> {
        match self {
            SurfaceOp::Draw { color, .. } => Some(*color),
            SurfaceOp::Clear { .. } => None,
        }
    }
}

#[derive(Debug, Default)]
struct SurfaceState {
    live: Vec<Marker>,
    log: Vec<Occurrence<SurfaceOp>>,
}

/// In-memory surface that records every draw and clear
///
/// Times are milliseconds since the surface was created, measured on the
/// tokio clock so paused-time tests see exact values.
#[derive(Debug)]
pub struct RecordingSurface {
    origin: Instant,
    state: Mutex<SurfaceState>,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            state: Mutex::new(SurfaceState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, SurfaceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn now(&self) -> Time {
        let elapsed = Instant::now().saturating_duration_since(self.origin);
        Time::try_from(elapsed.as_millis()).unwrap_or(Time::MAX)
    }

    /// Markers currently visible, oldest first
    pub fn live_markers(&self) -> Vec<Marker> {
        self.state().live.clone()
    }

    /// Every operation applied so far, in the order it happened
    pub fn timeline(&self) -> DiscreteEvent<SurfaceOp> {
        DiscreteEvent::from_vec(self.state().log.clone())
    }

    /// Draw operations only
    pub fn draws(&self) -> DiscreteEvent<SurfaceOp> {
        self.timeline().filter(SurfaceOp::is_draw)
    }

    /// Clear operations only
    pub fn clears(&self) -> DiscreteEvent<SurfaceOp> {
        self.timeline().filter(SurfaceOp::is_clear)
    }
}

impl RenderTarget for RecordingSurface {
    fn draw_marker(&self, at: Point, color: MarkerColor) {
        let time = self.now();
        let marker = Marker {
            at,
            color,
            size: MARKER_SIZE,
        };
        let mut state = self.state();
        state.live.push(marker);
        state.log.push((time, SurfaceOp::Draw { at, color }));
        debug!(time, %at, %color, "Marker drawn");
    }

    fn clear_marker(&self, at: Point) {
        let time = self.now();
        let mut state = self.state();
        if let Some(index) = state.live.iter().position(|marker| marker.at == at) {
            state.live.remove(index);
        }
        state.log.push((time, SurfaceOp::Clear { at }));
        debug!(time, %at, "Marker cleared");
    }
}

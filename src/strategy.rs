// Copyright (c) 2025 - Cowboy AI, Inc.
//! Higher-order mapping strategies
//!
//! A [`Strategy`] decides how the inner task spawned by each click is
//! combined with the tasks of earlier clicks:
//!
//! ```text
//! clicks:   ●──●─────●
//! switch:   ───────────■        (last click wins)
//! merge:    ──────■──■─────■    (all run concurrently)
//! concat:   ──────■──────■────■ (queued, one after another)
//! exhaust:  ──────■─────────■   (busy clicks are dropped)
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::SchedulerError;
use crate::render::MarkerColor;

/// Flattening rule applied to the stream of delayed draw tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Cancel the pending task whenever a new event arrives
    #[default]
    Switch,
    /// Run every task concurrently
    Merge,
    /// Queue tasks and run them strictly one after another
    Concat,
    /// Ignore events while a task is pending
    Exhaust,
}

impl Strategy {
    /// All strategies, in selector order
    pub const ALL: [Strategy; 4] = [
        Strategy::Switch,
        Strategy::Exhaust,
        Strategy::Concat,
        Strategy::Merge,
    ];

    /// Lowercase name used in configuration and on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Switch => "switch",
            Strategy::Merge => "merge",
            Strategy::Concat => "concat",
            Strategy::Exhaust => "exhaust",
        }
    }

    /// Color of the markers drawn under this strategy
    pub fn color(&self) -> MarkerColor {
        match self {
            Strategy::Switch => MarkerColor::Red,
            Strategy::Merge => MarkerColor::Green,
            Strategy::Concat => MarkerColor::Black,
            Strategy::Exhaust => MarkerColor::Purple,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        let name = normalized
            .strip_suffix("map")
            .map(|n| n.trim_end_matches(['_', '-']))
            .unwrap_or(normalized.as_str());

        match name {
            "switch" => Ok(Strategy::Switch),
            "merge" => Ok(Strategy::Merge),
            "concat" => Ok(Strategy::Concat),
            "exhaust" => Ok(Strategy::Exhaust),
            _ => Err(SchedulerError::UnknownStrategy(s.to_string())),
        }
    }
}

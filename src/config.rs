// Copyright (c) 2025 - Cowboy AI, Inc.
//! Scheduler configuration
//!
//! Defaults reproduce the canvas demo: 1500 ms delay, `switch` selected,
//! yellow click feedback enabled. Values can be overridden from the
//! environment or loaded from JSON.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::{SchedulerError, SchedulerResult};
use crate::strategy::Strategy;

/// Default delay before a pending draw fires, and before its clear
pub const DEFAULT_DELAY_MS: u64 = 1500;

/// Configuration for a [`StreamScheduler`](crate::StreamScheduler)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Delay between admission and draw, and between draw and clear
    pub delay_ms: u64,
    /// Strategy selected when the scheduler starts
    pub initial_strategy: Strategy,
    /// Draw an immediate yellow marker for every click
    pub click_feedback: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_DELAY_MS,
            initial_strategy: Strategy::default(),
            click_feedback: true,
        }
    }
}

impl SchedulerConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.initial_strategy = strategy;
        self
    }

    pub fn with_click_feedback(mut self, enabled: bool) -> Self {
        self.click_feedback = enabled;
        self
    }

    /// Check that the configuration describes a usable scheduler
    pub fn validate(&self) -> SchedulerResult<()> {
        if self.delay_ms == 0 {
            return Err(SchedulerError::Configuration(
                "delay_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Load configuration from environment variables
    ///
    /// Reads `SCHEDULER_DELAY_MS`, `SCHEDULER_STRATEGY` and
    /// `SCHEDULER_CLICK_FEEDBACK`; unset variables keep their defaults.
    pub fn from_env() -> SchedulerResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Parse configuration from a JSON document; missing fields use defaults
    pub fn from_json(json: &str) -> SchedulerResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    fn from_lookup<L>(lookup: L) -> SchedulerResult<Self>
    where
        L: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup("SCHEDULER_DELAY_MS") {
            config.delay_ms = parse_number(&value, "SCHEDULER_DELAY_MS")?;
        }
        if let Some(value) = lookup("SCHEDULER_STRATEGY") {
            config.initial_strategy = value.parse()?;
        }
        if let Some(value) = lookup("SCHEDULER_CLICK_FEEDBACK") {
            config.click_feedback = parse_flag(&value)?;
        }

        config.validate()?;
        Ok(config)
    }
}

fn parse_number<N: std::str::FromStr>(value: &str, key: &str) -> SchedulerResult<N> {
    value
        .trim()
        .parse()
        .map_err(|_| SchedulerError::Configuration(format!("{key} is not a valid number: {value}")))
}

fn parse_flag(value: &str) -> SchedulerResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(SchedulerError::Configuration(format!(
            "SCHEDULER_CLICK_FEEDBACK is not a boolean: {other}"
        ))),
    }
}

// Copyright (c) 2025 - Cowboy AI, Inc.
//! Error types for scheduler configuration
//!
//! Scheduling itself never fails: dropped and cancelled clicks are normal
//! outcomes of a strategy. Only loading a configuration or parsing a
//! strategy name can go wrong.

use thiserror::Error;

/// Errors that can occur while configuring a scheduler
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Strategy name did not match any known strategy
    #[error("Unknown strategy: {0}")]
    UnknownStrategy(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for scheduler configuration
pub type SchedulerResult<T> = Result<T, SchedulerError>;

impl From<serde_json::Error> for SchedulerError {
    fn from(err: serde_json::Error) -> Self {
        SchedulerError::Serialization(err.to_string())
    }
}

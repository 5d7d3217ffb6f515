// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests
//!
//! Properties that must hold for every click schedule, whatever the
//! spacing between clicks.

mod flattening;

// Copyright (c) 2025 - Cowboy AI, Inc.
//! Flattening properties of the scheduler
//!
//! Click schedules are generated as gaps between consecutive clicks; each
//! case runs on its own paused current-thread runtime so timing is exact.

use click_scheduler::frp::{Discrete, Signal};
use click_scheduler::{InputSource, RecordingSurface, SchedulerConfig, Strategy, StreamScheduler};
use proptest::prelude::{prop, prop_assert, prop_assert_eq, proptest, ProptestConfig};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, sleep_until, Instant};

const DELAY_MS: u64 = 1500;

/// Run a click schedule and return the recorded surface
fn simulate(strategy: Strategy, gaps: &[u64]) -> Arc<RecordingSurface> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .start_paused(true)
        .build()
        .expect("runtime");

    runtime.block_on(async {
        let source = InputSource::new();
        let surface = Arc::new(RecordingSurface::new());
        let config = SchedulerConfig::default()
            .with_strategy(strategy)
            .with_click_feedback(false);
        let _scheduler = StreamScheduler::spawn(config, source.clone(), surface.clone())
            .expect("valid config");

        for (index, gap) in gaps.iter().enumerate() {
            sleep(Duration::from_millis(*gap)).await;
            source.emit(index as i32, 0);
        }

        let horizon = DELAY_MS * 2 * (gaps.len() as u64 + 1);
        sleep_until(Instant::now() + Duration::from_millis(horizon)).await;
        surface
    })
}

fn drawn_indices(surface: &RecordingSurface) -> Vec<i32> {
    surface
        .draws()
        .map(|op| op.at().x)
        .values()
}

/// Gaps strictly shorter than the delay, so every click overlaps the previous one
fn fast_gaps() -> impl proptest::strategy::Strategy<Value = Vec<u64>> {
    prop::collection::vec(1u64..DELAY_MS, 1..8)
}

/// Bursts short enough to fit entirely inside one delay
fn burst_gaps() -> impl proptest::strategy::Strategy<Value = Vec<u64>> {
    prop::collection::vec(1u64..200, 1..8)
}

fn any_gaps() -> impl proptest::strategy::Strategy<Value = Vec<u64>> {
    prop::collection::vec(1u64..4000, 1..8)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Merge: N clicks always produce N draws and N clears
    #[test]
    fn prop_merge_draws_every_click(gaps in any_gaps()) {
        let surface = simulate(Strategy::Merge, &gaps);

        let mut drawn = drawn_indices(&surface);
        drawn.sort_unstable();
        let expected: Vec<i32> = (0..gaps.len() as i32).collect();
        prop_assert_eq!(drawn, expected);
        prop_assert_eq!(surface.clears().len(), gaps.len());
    }

    /// Concat: N fast clicks produce N draws in order, at least one delay apart
    #[test]
    fn prop_concat_preserves_order_and_spacing(gaps in fast_gaps()) {
        let surface = simulate(Strategy::Concat, &gaps);

        let expected: Vec<i32> = (0..gaps.len() as i32).collect();
        prop_assert_eq!(drawn_indices(&surface), expected);
        for gap in surface.draws().intervals() {
            prop_assert!(gap >= DELAY_MS as i64);
        }
    }

    /// Switch: overlapping clicks produce exactly one draw, for the last click
    #[test]
    fn prop_switch_only_last_click_draws(gaps in fast_gaps()) {
        let surface = simulate(Strategy::Switch, &gaps);

        prop_assert_eq!(drawn_indices(&surface), vec![gaps.len() as i32 - 1]);
    }

    /// Exhaust: overlapping clicks produce exactly one draw, for the first click
    #[test]
    fn prop_exhaust_only_first_click_draws(gaps in burst_gaps()) {
        let surface = simulate(Strategy::Exhaust, &gaps);

        prop_assert_eq!(drawn_indices(&surface), vec![0]);
    }

    /// Every draw is followed by exactly one clear at the same point, one delay later
    #[test]
    fn prop_every_draw_is_cleared_after_delay(gaps in any_gaps(), pick in 0usize..4) {
        let strategy = [Strategy::Switch, Strategy::Merge, Strategy::Concat, Strategy::Exhaust][pick];
        let surface = simulate(strategy, &gaps);

        let draws = surface.draws().occurrences();
        let mut clears = surface.clears().occurrences();
        prop_assert_eq!(draws.len(), clears.len());

        for (time, op) in draws {
            let position = clears
                .iter()
                .position(|(t, c)| *t == time + DELAY_MS as i64 && c.at() == op.at());
            prop_assert!(position.is_some(), "no clear for draw at {} {:?}", time, op);
            if let Some(index) = position {
                clears.remove(index);
            }
        }
        prop_assert!(surface.live_markers().is_empty());
    }
}

// Copyright (c) 2025 - Cowboy AI, Inc.
//! Higher-Order Flattening Combinators
//!
//! Each outer item is projected into an inner future; the [`Strategy`]
//! decides how the inner futures are combined into a single output stream.
//!
//! | Strategy  | New item while inner work is pending          |
//! |-----------|-----------------------------------------------|
//! | `Switch`  | pending inner future is dropped, new one runs |
//! | `Merge`   | new inner future runs alongside the others    |
//! | `Concat`  | item is queued until the pending one finishes |
//! | `Exhaust` | item is discarded                             |
//!
//! The strategy is fixed when the stream is built. Dropping the stream
//! drops every pending inner future, which is how cancellation propagates
//! from an outer unsubscribe to the inner timers.
//!
//! # Example
//!
//! ```rust,ignore
//! use click_scheduler::frp::combinators::*;
//!
//! let draws = concat_map(clicks, |click| async move {
//!     tokio::time::sleep(Duration::from_millis(1500)).await;
//!     click
//! });
//! ```

use futures::stream::{Fuse, FusedStream, FuturesUnordered, Stream, StreamExt};
use std::collections::VecDeque;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tracing::debug;

use crate::strategy::Strategy;

/// Stream returned by [`flat_map_with`] and friends
#[must_use = "streams do nothing unless polled"]
pub struct Flatten<S, F, Fut>
where
    S: Stream,
{
    strategy: Strategy,
    outer: Fuse<S>,
    project: F,
    active: FuturesUnordered<Fut>,
    queued: VecDeque<S::Item>,
}

// Inner futures are pinned by `FuturesUnordered`; nothing else is pinned.
impl<S, F, Fut> Unpin for Flatten<S, F, Fut> where S: Stream + Unpin {}

impl<S, F, Fut> fmt::Debug for Flatten<S, F, Fut>
where
    S: Stream,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Flatten")
            .field("strategy", &self.strategy)
            .field("active", &self.active.len())
            .field("queued", &self.queued.len())
            .field("outer_done", &self.outer.is_done())
            .finish()
    }
}

impl<S, F, Fut> Flatten<S, F, Fut>
where
    S: Stream + Unpin,
    F: FnMut(S::Item) -> Fut,
    Fut: Future,
{
    fn new(strategy: Strategy, outer: S, project: F) -> Self {
        Self {
            strategy,
            outer: outer.fuse(),
            project,
            active: FuturesUnordered::new(),
            queued: VecDeque::new(),
        }
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Inner futures currently running
    pub fn pending(&self) -> usize {
        self.active.len()
    }

    /// Items waiting for their turn (only ever non-zero under `Concat`)
    pub fn queued(&self) -> usize {
        self.queued.len()
    }

    fn start(&mut self, item: S::Item) {
        self.active.push((self.project)(item));
    }

    fn admit(&mut self, item: S::Item) {
        match self.strategy {
            Strategy::Switch => {
                if !self.active.is_empty() {
                    debug!(cancelled = self.active.len(), "switch: pending inner work cancelled");
                    self.active.clear();
                }
                self.start(item);
            }
            Strategy::Merge => self.start(item),
            Strategy::Concat => {
                if self.active.is_empty() && self.queued.is_empty() {
                    self.start(item);
                } else {
                    self.queued.push_back(item);
                    debug!(queued = self.queued.len(), "concat: item queued");
                }
            }
            Strategy::Exhaust => {
                if self.active.is_empty() {
                    self.start(item);
                } else {
                    debug!("exhaust: item dropped while inner work is pending");
                }
            }
        }
    }

    fn start_next_queued(&mut self) -> bool {
        match self.queued.pop_front() {
            Some(item) => {
                self.start(item);
                true
            }
            None => false,
        }
    }

    /// Poll running inner work, promoting the next queued item when it drains
    fn poll_active(&mut self, cx: &mut Context<'_>) -> Option<Fut::Output> {
        if self.active.is_empty() && !self.start_next_queued() {
            return None;
        }

        match self.active.poll_next_unpin(cx) {
            Poll::Ready(Some(output)) => {
                if self.active.is_empty() {
                    self.start_next_queued();
                }
                Some(output)
            }
            Poll::Ready(None) | Poll::Pending => None,
        }
    }

    /// Drop all inner work and hand back the outer stream
    ///
    /// Items the outer stream has buffered but not yet yielded stay in it.
    pub fn into_inner(self) -> S {
        self.outer.into_inner()
    }
}

impl<S, F, Fut> Stream for Flatten<S, F, Fut>
where
    S: Stream + Unpin,
    F: FnMut(S::Item) -> Fut,
    Fut: Future,
{
    type Item = Fut::Output;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        loop {
            // Inner work that finished at the same instant as a new outer
            // item was admitted first, so it is yielded first.
            if let Some(output) = this.poll_active(cx) {
                return Poll::Ready(Some(output));
            }

            let mut admitted = false;
            while let Poll::Ready(Some(item)) = this.outer.poll_next_unpin(cx) {
                this.admit(item);
                admitted = true;
            }
            if admitted {
                continue;
            }

            return if this.outer.is_done() && this.active.is_empty() && this.queued.is_empty() {
                Poll::Ready(None)
            } else {
                Poll::Pending
            };
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (_, upper) = self.outer.size_hint();
        let in_flight = self.active.len() + self.queued.len();
        let upper = match self.strategy {
            Strategy::Merge | Strategy::Concat => upper.map(|n| n + in_flight),
            Strategy::Switch | Strategy::Exhaust => None,
        };
        (0, upper)
    }
}

impl<S, F, Fut> FusedStream for Flatten<S, F, Fut>
where
    S: Stream + Unpin,
    F: FnMut(S::Item) -> Fut,
    Fut: Future,
{
    fn is_terminated(&self) -> bool {
        self.outer.is_done() && self.active.is_empty() && self.queued.is_empty()
    }
}

/// Flatten `outer` with the given strategy
pub fn flat_map_with<S, F, Fut>(strategy: Strategy, outer: S, project: F) -> Flatten<S, F, Fut>
where
    S: Stream + Unpin,
    F: FnMut(S::Item) -> Fut,
    Fut: Future,
{
    Flatten::new(strategy, outer, project)
}

/// Only the inner future of the latest item survives
pub fn switch_map<S, F, Fut>(outer: S, project: F) -> Flatten<S, F, Fut>
where
    S: Stream + Unpin,
    F: FnMut(S::Item) -> Fut,
    Fut: Future,
{
    Flatten::new(Strategy::Switch, outer, project)
}

/// Every inner future runs to completion, concurrently
pub fn merge_map<S, F, Fut>(outer: S, project: F) -> Flatten<S, F, Fut>
where
    S: Stream + Unpin,
    F: FnMut(S::Item) -> Fut,
    Fut: Future,
{
    Flatten::new(Strategy::Merge, outer, project)
}

/// Inner futures run one at a time in arrival order
pub fn concat_map<S, F, Fut>(outer: S, project: F) -> Flatten<S, F, Fut>
where
    S: Stream + Unpin,
    F: FnMut(S::Item) -> Fut,
    Fut: Future,
{
    Flatten::new(Strategy::Concat, outer, project)
}

/// Items arriving while an inner future runs are ignored
pub fn exhaust_map<S, F, Fut>(outer: S, project: F) -> Flatten<S, F, Fut>
where
    S: Stream + Unpin,
    F: FnMut(S::Item) -> Fut,
    Fut: Future,
{
    Flatten::new(Strategy::Exhaust, outer, project)
}

/// Method-call form of [`flat_map_with`]
pub trait FlattenExt: Stream + Sized {
    fn flatten_with<F, Fut>(self, strategy: Strategy, project: F) -> Flatten<Self, F, Fut>
    where
        Self: Unpin,
        F: FnMut(Self::Item) -> Fut,
        Fut: Future,
    {
        flat_map_with(strategy, self, project)
    }
}

impl<S: Stream> FlattenExt for S {}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::{sleep, sleep_until, Instant};
    use tokio_test::{assert_pending, assert_ready_eq, task};

    const DELAY: Duration = Duration::from_millis(1500);

    /// Items emitted at fixed millisecond offsets from `origin`
    fn timed(
        origin: Instant,
        schedule: Vec<(u64, char)>,
    ) -> Pin<Box<dyn Stream<Item = char> + Send>> {
        Box::pin(stream::iter(schedule).then(move |(at, item)| async move {
            sleep_until(origin + Duration::from_millis(at)).await;
            item
        }))
    }

    async fn run(strategy: Strategy, schedule: Vec<(u64, char)>) -> Vec<(char, u128)> {
        let origin = Instant::now();
        flat_map_with(strategy, timed(origin, schedule), move |item| async move {
            sleep(DELAY).await;
            (item, origin.elapsed().as_millis())
        })
        .collect()
        .await
    }

    #[tokio::test(start_paused = true)]
    async fn test_switch_keeps_only_latest() {
        let out = run(Strategy::Switch, vec![(0, 'a'), (100, 'b'), (200, 'c')]).await;
        assert_eq!(out, vec![('c', 1700)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_merge_runs_all_concurrently() {
        let out = run(Strategy::Merge, vec![(0, 'a'), (100, 'b'), (200, 'c')]).await;
        assert_eq!(out, vec![('a', 1500), ('b', 1600), ('c', 1700)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concat_runs_back_to_back() {
        let out = run(Strategy::Concat, vec![(0, 'a'), (100, 'b'), (200, 'c')]).await;
        assert_eq!(out, vec![('a', 1500), ('b', 3000), ('c', 4500)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concat_idle_gap_restarts_immediately() {
        let out = run(Strategy::Concat, vec![(0, 'a'), (2000, 'b')]).await;
        assert_eq!(out, vec![('a', 1500), ('b', 3500)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaust_drops_while_busy() {
        let out = run(Strategy::Exhaust, vec![(0, 'a'), (100, 'b'), (1600, 'c')]).await;
        assert_eq!(out, vec![('a', 1500), ('c', 3100)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaust_accepts_item_arriving_as_inner_completes() {
        let out = run(Strategy::Exhaust, vec![(0, 'a'), (1500, 'b')]).await;
        assert_eq!(out, vec![('a', 1500), ('b', 3000)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_switch_yields_inner_completing_with_next_item() {
        let out = run(Strategy::Switch, vec![(0, 'a'), (1500, 'b')]).await;
        assert_eq!(out, vec![('a', 1500), ('b', 3000)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concat_item_arriving_as_inner_completes_starts_at_once() {
        let out = run(Strategy::Concat, vec![(0, 'a'), (1500, 'b')]).await;
        assert_eq!(out, vec![('a', 1500), ('b', 3000)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_into_inner_returns_unread_outer_items() {
        let (tx, rx) = futures::channel::mpsc::unbounded();
        let mut flat = task::spawn(merge_map(rx, |x: u8| async move {
            sleep(DELAY).await;
            x
        }));

        tx.unbounded_send(1).unwrap();
        assert_pending!(flat.poll_next());
        assert_eq!(flat.pending(), 1);

        tx.unbounded_send(2).unwrap();
        tx.unbounded_send(3).unwrap();
        drop(tx);

        let rest: Vec<u8> = flat.into_inner().into_inner().collect().await;
        assert_eq!(rest, vec![2, 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_switch_with_spaced_items_emits_all() {
        let out = run(Strategy::Switch, vec![(0, 'a'), (1600, 'b')]).await;
        assert_eq!(out, vec![('a', 1500), ('b', 3100)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_free_functions_match_strategy() {
        let origin = Instant::now();
        let project = |item: char| async move {
            sleep(DELAY).await;
            item
        };

        let switched: Vec<char> = switch_map(timed(origin, vec![(0, 'a'), (10, 'b')]), project)
            .collect()
            .await;
        assert_eq!(switched, vec!['b']);

        let origin = Instant::now();
        let exhausted: Vec<char> = exhaust_map(timed(origin, vec![(0, 'a'), (10, 'b')]), project)
            .collect()
            .await;
        assert_eq!(exhausted, vec!['a']);

        let origin = Instant::now();
        let merged: Vec<char> = merge_map(timed(origin, vec![(0, 'a'), (10, 'b')]), project)
            .collect()
            .await;
        assert_eq!(merged, vec!['a', 'b']);

        let origin = Instant::now();
        let concatenated: Vec<char> = timed(origin, vec![(0, 'a'), (10, 'b')])
            .flatten_with(Strategy::Concat, project)
            .collect()
            .await;
        assert_eq!(concatenated, vec!['a', 'b']);
    }

    #[test]
    fn test_empty_outer_terminates() {
        let mut flat = task::spawn(merge_map(stream::empty::<u8>(), |x| async move { x }));
        assert_ready_eq!(flat.poll_next(), None);
    }

    #[test]
    fn test_pending_outer_stays_pending() {
        let mut flat = task::spawn(concat_map(stream::pending::<u8>(), |x| async move { x }));
        assert_pending!(flat.poll_next());
    }

    #[test]
    fn test_ready_inner_is_yielded_before_outer_ends() {
        let mut flat = task::spawn(concat_map(stream::iter(vec![1, 2, 3]), |x| async move { x * 10 }));
        assert_ready_eq!(flat.poll_next(), Some(10));
        assert_ready_eq!(flat.poll_next(), Some(20));
        assert_ready_eq!(flat.poll_next(), Some(30));
        assert_ready_eq!(flat.poll_next(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_inner_work() {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();
        let mut flat = merge_map(stream::iter(vec![1, 2]).chain(stream::pending()), move |_| {
            let counter = counter.clone();
            async move {
                sleep(DELAY).await;
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        let waited = tokio::time::timeout(Duration::from_millis(100), flat.next()).await;
        assert!(waited.is_err());
        assert_eq!(flat.pending(), 2);

        drop(flat);
        sleep(DELAY * 2).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concat_reports_queue() {
        let mut flat = concat_map(stream::iter(vec![1, 2, 3]).chain(stream::pending()), |x| async move {
            sleep(DELAY).await;
            x
        });

        assert_eq!(flat.next().await, Some(1));
        assert_eq!(flat.pending(), 1);
        assert_eq!(flat.queued(), 1);
        assert_eq!(flat.strategy(), Strategy::Concat);
        assert!(!flat.is_terminated());
    }
}

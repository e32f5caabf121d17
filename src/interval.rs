//! Interval iteration over a graph's key space
//!
//! Temporal analyses slice a graph into many sub-networks: fixed-width
//! bins, sliding windows around midpoints, and bins whose width doubles
//! at each resolution. This module produces those interval sequences and
//! turns them into sub-networks, sequentially or in parallel.

use crate::graph::{EventKey, KeyRange, NavigableGraph};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Half-open key interval `[start, stop)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval<K> {
    pub start: K,
    pub stop: K,
}

impl<K: Ord> Interval<K> {
    pub fn new(start: K, stop: K) -> Self {
        Self { start, stop }
    }

    pub fn contains(&self, key: &K) -> bool {
        *key >= self.start && *key < self.stop
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.stop
    }
}

impl<K: Clone> Interval<K> {
    pub fn to_range(&self) -> KeyRange<K> {
        KeyRange::between(self.start.clone(), self.stop.clone())
    }
}

impl<K: fmt::Display> fmt::Display for Interval<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.stop)
    }
}

/// Keys that can be stepped through arithmetically
pub trait TimeStep: EventKey + Copy {
    /// Smallest positive step
    fn unit() -> Self;

    fn advance(self, step: Self) -> Self;

    fn retreat(self, step: Self) -> Self;

    fn half(self) -> Self;

    fn double(self) -> Self;
}

macro_rules! impl_time_step {
    ($($t:ty),*) => {
        $(
            impl TimeStep for $t {
                fn unit() -> Self {
                    1
                }

                fn advance(self, step: Self) -> Self {
                    self.saturating_add(step)
                }

                fn retreat(self, step: Self) -> Self {
                    self.saturating_sub(step)
                }

                fn half(self) -> Self {
                    self / 2
                }

                fn double(self) -> Self {
                    self.saturating_mul(2)
                }
            }
        )*
    };
}

impl_time_step!(i32, i64, u32, u64, usize);

/// `start, start + step, ...`, ending exactly at `finish`
///
/// The last step is clipped to `finish`; a non-advancing step jumps
/// straight to it. When `start >= finish` only `start` is produced.
#[derive(Debug, Clone)]
pub struct Increments<K> {
    next: Option<K>,
    finish: K,
    step: K,
}

impl<K: TimeStep> Increments<K> {
    pub fn new(start: K, finish: K, step: K) -> Self {
        Self {
            next: Some(start),
            finish,
            step,
        }
    }
}

impl<K: TimeStep> Iterator for Increments<K> {
    type Item = K;

    fn next(&mut self) -> Option<K> {
        let current = self.next.take()?;
        if current < self.finish {
            let stepped = current.advance(self.step);
            self.next = Some(if stepped <= current || stepped > self.finish {
                self.finish
            } else {
                stepped
            });
        }
        Some(current)
    }
}

/// Consecutive keys paired into intervals `[k0, k1), [k1, k2), ...`
#[derive(Debug, Clone)]
pub struct ConsecutiveIntervals<I: Iterator> {
    keys: I,
    previous: Option<I::Item>,
}

impl<I> ConsecutiveIntervals<I>
where
    I: Iterator,
    I::Item: Ord + Clone,
{
    pub fn new(keys: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            keys: keys.into_iter(),
            previous: None,
        }
    }
}

impl<I> Iterator for ConsecutiveIntervals<I>
where
    I: Iterator,
    I::Item: Ord + Clone,
{
    type Item = Interval<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        let start = match self.previous.take() {
            Some(key) => key,
            None => self.keys.next()?,
        };
        let stop = self.keys.next()?;
        self.previous = Some(stop.clone());
        Some(Interval::new(start, stop))
    }
}

/// Windows of fixed width centered on each midpoint
///
/// Every window spans exactly `width`. For odd widths the extra unit
/// falls before the midpoint: width 5 around 10 is `[7, 12)`.
#[derive(Debug, Clone)]
pub struct MidpointWindows<I: Iterator> {
    midpoints: I,
    /// Distance from window start to midpoint
    before: I::Item,
    /// Distance from midpoint to window stop
    after: I::Item,
}

impl<I> MidpointWindows<I>
where
    I: Iterator,
    I::Item: TimeStep,
{
    pub fn new(midpoints: impl IntoIterator<IntoIter = I>, width: I::Item) -> Self {
        let after = width.half();
        Self {
            midpoints: midpoints.into_iter(),
            before: width.retreat(after),
            after,
        }
    }
}

impl<I> Iterator for MidpointWindows<I>
where
    I: Iterator,
    I::Item: TimeStep,
{
    type Item = Interval<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        let mid = self.midpoints.next()?;
        Some(Interval::new(mid.retreat(self.before), mid.advance(self.after)))
    }
}

/// Widths `w, 2w, 4w, ...` strictly below `limit`
#[derive(Debug, Clone)]
pub struct ExponentialScales<K> {
    current: Option<K>,
    limit: K,
}

impl<K: TimeStep> ExponentialScales<K> {
    pub fn new(smallest: K, limit: K) -> Self {
        Self {
            current: Some(smallest),
            limit,
        }
    }
}

impl<K: TimeStep> Iterator for ExponentialScales<K> {
    type Item = K;

    fn next(&mut self) -> Option<K> {
        let width = self.current.take()?;
        if width >= self.limit {
            return None;
        }
        let doubled = width.double();
        if doubled > width {
            self.current = Some(doubled);
        }
        Some(width)
    }
}

/// Fit intervals inside `bounds`
///
/// Intervals ending at or before the lower bound are skipped, the rest
/// are clipped to the bounds, and iteration stops at the first interval
/// starting at or after the upper bound.
pub fn clip_to_bounds<K, I>(intervals: I, bounds: &KeyRange<K>) -> Vec<Interval<K>>
where
    K: Ord + Clone,
    I: IntoIterator<Item = Interval<K>>,
{
    let mut clipped = Vec::new();
    for mut interval in intervals {
        if let Some(lower) = &bounds.lower {
            if interval.stop <= *lower {
                continue;
            }
            if interval.start < *lower {
                interval.start = lower.clone();
            }
        }
        if let Some(upper) = &bounds.upper {
            if interval.start >= *upper {
                break;
            }
            if interval.stop > *upper {
                interval.stop = upper.clone();
            }
        }
        if !interval.is_empty() {
            clipped.push(interval);
        }
    }
    clipped
}

/// Sub-network of `graph` for each interval, clipped to the graph's bounds
pub fn sub_networks<G, I>(graph: &G, intervals: I) -> Vec<(Interval<G::Key>, G)>
where
    G: NavigableGraph,
    I: IntoIterator<Item = Interval<G::Key>>,
{
    clip_to_bounds(intervals, graph.bounds())
        .into_iter()
        .map(|interval| {
            let view = graph.bounded(interval.to_range());
            (interval, view)
        })
        .collect()
}

/// [`sub_networks`] built on the rayon thread pool, in input order
pub fn par_sub_networks<G, I>(graph: &G, intervals: I) -> Vec<(Interval<G::Key>, G)>
where
    G: NavigableGraph + Send + Sync,
    I: IntoIterator<Item = Interval<G::Key>>,
{
    let clipped = clip_to_bounds(intervals, graph.bounds());
    debug!("Extracting {} sub-networks in parallel", clipped.len());
    clipped
        .into_par_iter()
        .map(|interval| {
            let view = graph.bounded(interval.to_range());
            (interval, view)
        })
        .collect()
}

/// Fixed-width bins covering the graph's key span
///
/// Bins start at the graph's first key. They end at its upper bound, or
/// just past the latest key when the graph is unbounded above. An edge at
/// the key type's maximum lies past the last half-open bin; use
/// [`bin_networks`] to cover it.
pub fn bins<G>(graph: &G, width: G::Key) -> Vec<Interval<G::Key>>
where
    G: NavigableGraph,
    G::Key: TimeStep,
{
    let (Some(first), Some(finish)) = (graph.first_key(), covering_end(graph)) else {
        return Vec::new();
    };
    ConsecutiveIntervals::new(Increments::new(first, finish, width)).collect()
}

/// Sub-network for each of [`bins`], built in parallel
///
/// When the graph is unbounded above, the last bin's view is left open
/// above as well, so every edge lands in exactly one bin even when the
/// latest key is the key type's maximum.
pub fn bin_networks<G>(graph: &G, width: G::Key) -> Vec<(Interval<G::Key>, G)>
where
    G: NavigableGraph + Send + Sync,
    G::Key: TimeStep,
{
    let mut binned = par_sub_networks(graph, bins(graph, width));
    if graph.upper_bound().is_none() {
        if let Some((interval, view)) = binned.last_mut() {
            *view = graph.bounded(KeyRange::at_least(interval.start));
        }
    }
    binned
}

/// One resolution level of [`exponential_bins`]
#[derive(Debug, Clone)]
pub struct Resolution<G: NavigableGraph> {
    /// Bin width at this level
    pub width: G::Key,

    /// Each bin with its sub-network
    pub bins: Vec<(Interval<G::Key>, G)>,
}

/// Bin the graph at widths `smallest, 2 * smallest, ...` below its span
pub fn exponential_bins<G>(graph: &G, smallest: G::Key) -> Vec<Resolution<G>>
where
    G: NavigableGraph + Send + Sync,
    G::Key: TimeStep,
{
    let (Some(first), Some(finish)) = (graph.first_key(), covering_end(graph)) else {
        return Vec::new();
    };
    let span = finish.retreat(first);
    ExponentialScales::new(smallest, span)
        .map(|width| {
            let bins = bin_networks(graph, width);
            debug!("Resolution {:?}: {} bins", width, bins.len());
            Resolution { width, bins }
        })
        .collect()
}

fn covering_end<G>(graph: &G) -> Option<G::Key>
where
    G: NavigableGraph,
    G::Key: TimeStep,
{
    match graph.upper_bound() {
        Some(upper) => Some(*upper),
        None => graph.latest_key().map(|k| k.advance(G::Key::unit())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::FlatGraph;

    #[test]
    fn test_increments_clip_to_finish() {
        let keys: Vec<i32> = Increments::new(0, 10, 3).collect();
        assert_eq!(keys, vec![0, 3, 6, 9, 10]);

        let exact: Vec<i32> = Increments::new(0, 4, 2).collect();
        assert_eq!(exact, vec![0, 2, 4]);

        let single: Vec<i32> = Increments::new(5, 5, 1).collect();
        assert_eq!(single, vec![5]);

        let stalled: Vec<i32> = Increments::new(0, 4, 0).collect();
        assert_eq!(stalled, vec![0, 4]);
    }

    #[test]
    fn test_consecutive_intervals() {
        let intervals: Vec<_> = ConsecutiveIntervals::new(Increments::new(0u64, 10, 4)).collect();
        assert_eq!(
            intervals,
            vec![Interval::new(0, 4), Interval::new(4, 8), Interval::new(8, 10)]
        );
        assert_eq!(ConsecutiveIntervals::new(vec![1]).count(), 0);
    }

    #[test]
    fn test_midpoint_windows() {
        let windows: Vec<_> = MidpointWindows::new(vec![5i64, 10], 4).collect();
        assert_eq!(windows, vec![Interval::new(3, 7), Interval::new(8, 12)]);

        let odd: Vec<_> = MidpointWindows::new(vec![10i64, 0], 5).collect();
        assert_eq!(odd, vec![Interval::new(7, 12), Interval::new(-3, 2)]);
        assert!(odd.iter().all(|w| w.stop - w.start == 5));

        let unit: Vec<_> = MidpointWindows::new(vec![4u32], 1).collect();
        assert_eq!(unit, vec![Interval::new(3, 4)]);
    }

    #[test]
    fn test_exponential_scales() {
        let widths: Vec<u32> = ExponentialScales::new(1, 20).collect();
        assert_eq!(widths, vec![1, 2, 4, 8, 16]);
        assert_eq!(ExponentialScales::new(0u32, 5).collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn test_clip_to_bounds() {
        let intervals = vec![
            Interval::new(0, 2),
            Interval::new(2, 4),
            Interval::new(4, 6),
            Interval::new(6, 8),
        ];
        let clipped = clip_to_bounds(intervals, &KeyRange::between(3, 7));
        assert_eq!(
            clipped,
            vec![Interval::new(3, 4), Interval::new(4, 6), Interval::new(6, 7)]
        );
    }

    #[test]
    fn test_sequential_and_parallel_agree() {
        let mut g: FlatGraph<i64, u32, ()> = FlatGraph::default();
        for k in 0..40 {
            g.add_edge(k, (k % 7) as u32, (k % 5) as u32).unwrap();
        }
        let intervals: Vec<_> = ConsecutiveIntervals::new(Increments::new(0, 40, 6)).collect();
        let seq = sub_networks(&g, intervals.clone());
        let par = par_sub_networks(&g, intervals);

        assert_eq!(seq.len(), par.len());
        for ((a, ga), (b, gb)) in seq.iter().zip(par.iter()) {
            assert_eq!(a, b);
            assert_eq!(ga.edge_count(), gb.edge_count());
        }
        let total: usize = seq.iter().map(|(_, view)| view.edge_count()).sum();
        assert_eq!(total, 40);
    }

    #[test]
    fn test_bins_reach_the_largest_key() {
        let mut g: FlatGraph<u32, u32, ()> = FlatGraph::default();
        g.add_edge(u32::MAX - 3, 0, 1).unwrap();
        g.add_edge(u32::MAX, 1, 2).unwrap();

        let intervals = bins(&g, 2);
        assert_eq!(
            intervals,
            vec![
                Interval::new(u32::MAX - 3, u32::MAX - 1),
                Interval::new(u32::MAX - 1, u32::MAX)
            ]
        );

        let binned = bin_networks(&g, 2);
        let total: usize = binned.iter().map(|(_, view)| view.edge_count()).sum();
        assert_eq!(total, 2);
        assert_eq!(binned[1].1.latest_key(), Some(u32::MAX));

        for level in exponential_bins(&g, 1) {
            let total: usize = level.bins.iter().map(|(_, view)| view.edge_count()).sum();
            assert_eq!(total, 2, "width {}", level.width);
        }
    }

    #[test]
    fn test_bounded_graph_bins_stay_inside_bounds() {
        let mut g: FlatGraph<u32, u32, ()> = FlatGraph::default();
        for k in 0..20 {
            g.add_edge(k, k % 4, 4).unwrap();
        }
        let view = g.sub_network(5, 12);
        let binned = bin_networks(&view, 4);
        assert_eq!(binned.last().map(|(_, v)| v.upper_bound().copied()), Some(Some(12)));
        let total: usize = binned.iter().map(|(_, v)| v.edge_count()).sum();
        assert_eq!(total, 7);
    }

    #[test]
    fn test_exponential_bins_cover_every_edge() {
        let mut g: FlatGraph<u64, u32, ()> = FlatGraph::default();
        for k in 10..30 {
            g.add_edge(k, 0, 1 + (k % 3) as u32).unwrap();
        }
        let levels = exponential_bins(&g, 2);
        let widths: Vec<u64> = levels.iter().map(|level| level.width).collect();
        assert_eq!(widths, vec![2, 4, 8, 16]);
        for level in &levels {
            let total: usize = level.bins.iter().map(|(_, view)| view.edge_count()).sum();
            assert_eq!(total, 20);
        }
    }
}

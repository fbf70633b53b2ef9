// File: crates/datechart-core/src/bucket.rs
// Summary: Greedy similarity bucketing of (x, y) samples with a hard bucket ceiling.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;
use tracing::{trace, warn};

use crate::types::Sample;

/// A run of consecutive samples collapsed into one bar.
/// `x` is the first merged sample's timestamp, `y` the mean of merged values.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bucket {
    pub x: f64,
    pub y: f64,
    pub count: usize,
}

impl Bucket {
    fn open(s: Sample) -> Self {
        Self { x: s.x, y: s.y, count: 1 }
    }

    fn absorb(&mut self, y: f64) {
        self.count += 1;
        let mean = self.y + (y - self.y) / self.count as f64;
        self.y = mean.clamp(self.y.min(y), self.y.max(y));
    }

    fn merged(&self, right: &Bucket) -> Bucket {
        let count = self.count + right.count;
        let mean = (self.y * self.count as f64 + right.y * right.count as f64) / count as f64;
        Bucket {
            x: self.x,
            y: mean.clamp(self.y.min(right.y), self.y.max(right.y)),
            count,
        }
    }
}

/// Output of [`bucket`]. `min`/`max` are taken over the input samples,
/// not the aggregated buckets.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Bucketed {
    pub buckets: Vec<Bucket>,
    pub min: f64,
    pub max: f64,
}

impl Bucketed {
    pub fn range(&self) -> f64 { self.max - self.min }
    pub fn is_empty(&self) -> bool { self.buckets.is_empty() }
}

/// Collapse ordered samples into at most `max_buckets` buckets.
///
/// A sample joins the open bucket while `|y - bucket.y| / (max - min)` stays
/// below `threshold`. If that pass still yields too many buckets, the adjacent
/// pair with the smallest value difference is merged until the ceiling holds.
///
/// Non-finite samples are dropped. `max_buckets == 0` behaves like 1 and the
/// threshold is clamped to `[0, 1]` (NaN counts as 0).
pub fn bucket(samples: &[Sample], threshold: f64, max_buckets: usize) -> Bucketed {
    let finite: Vec<Sample> = samples.iter().copied().filter(Sample::is_finite).collect();
    if finite.len() < samples.len() {
        warn!(dropped = samples.len() - finite.len(), "dropping non-finite samples");
    }
    let Some(&first) = finite.first() else {
        return Bucketed::default();
    };

    let (min, max) = finite
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| (lo.min(s.y), hi.max(s.y)));
    let range = max - min;
    let threshold = if threshold.is_nan() { 0.0 } else { threshold.clamp(0.0, 1.0) };
    let max_buckets = max_buckets.max(1);

    let mut buckets = Vec::new();
    let mut open = Bucket::open(first);
    for s in &finite[1..] {
        // A flat series (range 0) has no dissimilar neighbours.
        let diff = if range > 0.0 { (s.y - open.y).abs() / range } else { 0.0 };
        if diff < threshold {
            open.absorb(s.y);
        } else {
            buckets.push(open);
            open = Bucket::open(*s);
        }
    }
    buckets.push(open);

    if buckets.len() > max_buckets {
        trace!(from = buckets.len(), to = max_buckets, "reducing bucket count");
        buckets = merge_closest(buckets, max_buckets);
    }

    Bucketed { buckets, min, max }
}

/// Adjacent pair candidate in the reduction heap. Field order is the sort
/// order: value difference first, then position so ties merge the leftmost
/// pair first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Candidate {
    diff: OrderedFloat<f64>,
    left: usize,
    right: usize,
    left_stamp: u32,
    right_stamp: u32,
}

/// Repeatedly merge the closest adjacent pair until `target` buckets remain.
fn merge_closest(mut nodes: Vec<Bucket>, target: usize) -> Vec<Bucket> {
    let n = nodes.len();
    let mut next: Vec<Option<usize>> = (0..n).map(|i| (i + 1 < n).then_some(i + 1)).collect();
    let mut prev: Vec<Option<usize>> = (0..n).map(|i| i.checked_sub(1)).collect();
    let mut alive = vec![true; n];
    // Bumped whenever a node's value changes, invalidating queued pairs.
    let mut stamp = vec![0u32; n];

    let candidate = |nodes: &[Bucket], stamp: &[u32], l: usize, r: usize| Candidate {
        diff: OrderedFloat((nodes[r].y - nodes[l].y).abs()),
        left: l,
        right: r,
        left_stamp: stamp[l],
        right_stamp: stamp[r],
    };

    let mut heap = BinaryHeap::with_capacity(n);
    for i in 1..n {
        heap.push(Reverse(candidate(&nodes, &stamp, i - 1, i)));
    }

    let mut remaining = n;
    while remaining > target {
        let Some(Reverse(c)) = heap.pop() else { break };
        let current = alive[c.left]
            && alive[c.right]
            && next[c.left] == Some(c.right)
            && stamp[c.left] == c.left_stamp
            && stamp[c.right] == c.right_stamp;
        if !current {
            continue;
        }

        let (l, r) = (c.left, c.right);
        nodes[l] = nodes[l].merged(&nodes[r]);
        alive[r] = false;
        stamp[l] += 1;
        next[l] = next[r];
        if let Some(after) = next[r] {
            prev[after] = Some(l);
        }
        remaining -= 1;

        if let Some(p) = prev[l] {
            heap.push(Reverse(candidate(&nodes, &stamp, p, l)));
        }
        if let Some(after) = next[l] {
            heap.push(Reverse(candidate(&nodes, &stamp, l, after)));
        }
    }

    nodes
        .into_iter()
        .zip(alive)
        .filter_map(|(b, keep)| keep.then_some(b))
        .collect()
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The per-frame iteration-count histogram.
//!
//! During the evaluation pass every worker thread records the escape
//! count of every pixel it computes, so the histogram is the one piece
//! of state the threads genuinely share.  Each bin is an atomic
//! counter bumped with a relaxed `fetch_add` — the counts commute, no
//! thread ever reads them mid-pass, and a lock here would serialize
//! the whole pass.  Once the pass has joined, [`Histogram::freeze`]
//! consumes the atomics into an immutable [`Snapshot`] that the
//! coloring pass reads; the type system makes it impossible to keep
//! recording after that point.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Shared escape-count tallies for one frame.  There are `limit + 1`
/// bins: `0..limit` for pixels that escaped at exactly that count, and
/// bin `limit` for pixels that never escaped, so every computed pixel
/// lands in exactly one bin.
pub struct Histogram {
    bins: Vec<AtomicUsize>,
}

/// A frozen histogram: plain counts, inclusive running totals, and the
/// grand total, ready for the coloring pass.
pub struct Snapshot {
    bins: Vec<usize>,
    cumulative: Vec<usize>,
    total: usize,
}

impl Histogram {
    /// An empty histogram for an iteration cap of `limit`.
    pub fn new(limit: usize) -> Histogram {
        Histogram {
            bins: (0..=limit).map(|_| AtomicUsize::new(0)).collect(),
        }
    }

    /// Tally one pixel that survived exactly `count` iterations.
    /// Callable from any number of threads at once without losing
    /// updates.
    pub fn record(&self, count: u32) {
        self.bins[count as usize].fetch_add(1, Ordering::Relaxed);
    }

    /// Consume the histogram into its read-only form, computing the
    /// running totals once.  Call this only after every recording
    /// thread has been joined.
    pub fn freeze(self) -> Snapshot {
        let bins: Vec<usize> = self.bins.into_iter().map(|bin| bin.into_inner()).collect();
        let mut cumulative = Vec::with_capacity(bins.len());
        let mut total = 0;
        for &count in &bins {
            total += count;
            cumulative.push(total);
        }
        Snapshot {
            bins,
            cumulative,
            total,
        }
    }
}

impl Snapshot {
    /// The number of pixels recorded in bin `count`.
    pub fn count(&self, count: usize) -> usize {
        self.bins[count]
    }

    /// The number of bins, i.e. the iteration cap plus one.
    pub fn bins(&self) -> usize {
        self.bins.len()
    }

    /// Total pixels recorded across all bins.
    pub fn total(&self) -> usize {
        self.total
    }

    /// The fraction of all recorded pixels whose count is `<= count`.
    /// Monotonically non-decreasing in `count`, which is what makes
    /// the derived gradient smooth rather than banded.
    pub fn fraction(&self, count: usize) -> f32 {
        self.cumulative[count] as f32 / self.total as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_recorded_pixel_is_counted_once() {
        let histogram = Histogram::new(4);
        for count in &[0, 1, 1, 2, 4, 4, 4] {
            histogram.record(*count);
        }
        let snapshot = histogram.freeze();
        assert_eq!(snapshot.total(), 7);
        assert_eq!(snapshot.count(0), 1);
        assert_eq!(snapshot.count(1), 2);
        assert_eq!(snapshot.count(3), 0);
        assert_eq!(snapshot.count(4), 3);
    }

    #[test]
    fn fractions_are_inclusive_and_monotonic() {
        let histogram = Histogram::new(3);
        for count in &[0, 1, 1, 2] {
            histogram.record(*count);
        }
        let snapshot = histogram.freeze();
        assert_eq!(snapshot.fraction(0), 0.25);
        assert_eq!(snapshot.fraction(1), 0.75);
        assert_eq!(snapshot.fraction(2), 1.0);
        let mut last = 0.0;
        for count in 0..snapshot.bins() {
            let fraction = snapshot.fraction(count);
            assert!(fraction >= last);
            last = fraction;
        }
    }

    #[test]
    fn concurrent_increments_lose_nothing() {
        use std::sync::Arc;
        use std::thread;

        let histogram = Arc::new(Histogram::new(1));
        let workers: Vec<_> = (0..4)
            .map(|_| {
                let histogram = histogram.clone();
                thread::spawn(move || {
                    for _ in 0..1000 {
                        histogram.record(1);
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }
        let histogram = Arc::try_unwrap(histogram).ok().unwrap();
        assert_eq!(histogram.freeze().total(), 4000);
    }
}

use num_traits::{PrimInt, Unsigned};

use crate::traits::Overlapper;
use ampcov_core::models::Interval;

/// A linear-scan overlap structure that keeps intervals in insertion order.
///
/// Target window sets are small (tens to low thousands of amplicons), so a
/// full scan per query is fine and keeps the input-order guarantee of
/// [`Overlapper`] trivially true. For much larger window sets a sorted or
/// augmented structure can replace this behind the same trait.
///
/// # Examples
///
/// ```
/// use ampcov_overlaprs::{LinearScan, Overlapper};
/// use ampcov_core::models::Interval;
///
/// let windows = vec![
///     Interval { start: 100u32, end: 200, val: "amp1" },
///     Interval { start: 150, end: 300, val: "amp2" },
///     Interval { start: 400, end: 500, val: "amp3" },
/// ];
///
/// let scan = LinearScan::build(windows);
/// let overlaps = scan.find(180, 250);
/// assert_eq!(overlaps.len(), 2); // amp1 and amp2
/// ```
#[derive(Debug, Clone)]
pub struct LinearScan<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    /// Intervals in the order they were built, never re-sorted.
    pub intervals: Vec<Interval<I, T>>,
}

impl<I, T> Overlapper<I, T> for LinearScan<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    fn build(intervals: Vec<Interval<I, T>>) -> Self
    where
        Self: Sized,
    {
        LinearScan { intervals }
    }

    #[inline]
    fn find(&self, start: I, end: I) -> Vec<Interval<I, T>> {
        self.find_iter(start, end).cloned().collect()
    }

    #[inline]
    fn find_iter<'a>(
        &'a self,
        start: I,
        end: I,
    ) -> Box<dyn Iterator<Item = &'a Interval<I, T>> + 'a> {
        Box::new(
            self.intervals
                .iter()
                .filter(move |iv| iv.overlap(start, end)),
        )
    }
}

impl<I, T> LinearScan<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    #[inline]
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn intervals() -> Vec<Interval<u32, &'static str>> {
        vec![
            Interval {
                start: 8,
                end: 12,
                val: "d",
            },
            Interval {
                start: 1,
                end: 5,
                val: "a",
            },
            Interval {
                start: 3,
                end: 7,
                val: "b",
            },
            Interval {
                start: 6,
                end: 10,
                val: "c",
            },
        ]
    }

    #[rstest]
    fn test_build_and_len(intervals: Vec<Interval<u32, &'static str>>) {
        let scan = LinearScan::build(intervals.clone());
        assert_eq!(scan.len(), intervals.len());
        assert!(!scan.is_empty());
    }

    #[rstest]
    fn test_find_preserves_insertion_order(intervals: Vec<Interval<u32, &'static str>>) {
        let scan = LinearScan::build(intervals);

        // all four overlap [4, 9); "d" was inserted first
        let vals: Vec<&str> = scan.find_iter(4, 9).map(|i| i.val).collect();
        assert_eq!(vals, vec!["d", "a", "b", "c"]);
    }

    #[rstest]
    fn test_find_no_overlap(intervals: Vec<Interval<u32, &'static str>>) {
        let scan = LinearScan::build(intervals);
        assert!(scan.find(13, 15).is_empty());
        // half-open: touching at an endpoint is not overlap
        assert!(scan.find(12, 14).is_empty());
    }

    #[rstest]
    fn test_empty_scan() {
        let scan: LinearScan<u32, &str> = LinearScan::build(vec![]);
        assert!(scan.is_empty());
        assert!(scan.find(1, 2).is_empty());
    }
}

use num_traits::{PrimInt, Unsigned};
use std::cmp::Ordering;

/// A range over `[start, end)`: inclusive of start, exclusive of end.
///
/// The payload `T` carries whatever the interval annotates, e.g. an
/// amplicon id for target windows or a read depth for depth runs.
#[derive(Eq, Debug, Clone)]
pub struct Interval<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    pub start: I,
    pub end: I,
    pub val: T,
}

impl<I, T> Interval<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    /// Check whether this interval overlaps `[start, end)` by at least one
    /// position. Zero-length touches do not count as overlap.
    #[inline]
    pub fn overlap(&self, start: I, end: I) -> bool {
        self.start < end && self.end > start
    }

    /// Clip this interval against `[start, end)` and return the overlapping
    /// sub-range, or `None` when the overlap is empty.
    #[inline]
    pub fn intersection(&self, start: I, end: I) -> Option<(I, I)> {
        let lo = self.start.max(start);
        let hi = self.end.min(end);
        if lo < hi { Some((lo, hi)) } else { None }
    }
}

impl<I, T> Ord for Interval<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    #[inline]
    fn cmp(&self, other: &Interval<I, T>) -> Ordering {
        match self.start.cmp(&other.start) {
            Ordering::Equal => self.end.cmp(&other.end),
            other_ordering => other_ordering,
        }
    }
}

impl<I, T> PartialOrd for Interval<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<I, T> PartialEq for Interval<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    #[inline]
    fn eq(&self, other: &Interval<I, T>) -> bool {
        self.start == other.start && self.end == other.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn intersection_clips_both_sides() {
        let iv = Interval {
            start: 10u32,
            end: 20,
            val: (),
        };
        assert_eq!(iv.intersection(5, 15), Some((10, 15)));
        assert_eq!(iv.intersection(15, 30), Some((15, 20)));
        assert_eq!(iv.intersection(12, 18), Some((12, 18)));
    }

    #[test]
    fn zero_length_touch_is_not_an_overlap() {
        let iv = Interval {
            start: 10u32,
            end: 20,
            val: (),
        };
        assert!(!iv.overlap(20, 30));
        assert!(!iv.overlap(0, 10));
        assert_eq!(iv.intersection(20, 30), None);
    }
}

use num_traits::{PrimInt, Unsigned};

pub use ampcov_core::models::Interval;

/// A single-chromosome overlap structure.
///
/// Implementations must return qualifying intervals in the order they were
/// passed to `build` — callers rely on that as a stable, deterministic
/// tie-break when several windows overlap the same query. A sorted or
/// tree-based implementation may be substituted as long as it preserves
/// that contract.
pub trait Overlapper<I, T>: Send + Sync
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    fn build(intervals: Vec<Interval<I, T>>) -> Self
    where
        Self: Sized;

    fn find(&self, start: I, end: I) -> Vec<Interval<I, T>>;

    fn find_iter<'a>(
        &'a self,
        start: I,
        end: I,
    ) -> Box<dyn Iterator<Item = &'a Interval<I, T>> + 'a>;
}

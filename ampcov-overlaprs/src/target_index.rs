//! Genome-wide indexing of amplicon target windows.
//!
//! [`TargetIndex`] keeps one [`LinearScan`] per chromosome and answers
//! intersection queries for an arbitrary interval: every target window with
//! strictly positive overlap is returned together with the clipped
//! sub-range, in target-file order.

use std::collections::HashMap;

use ampcov_core::models::{Interval, TargetSet};

use crate::linear::LinearScan;
use crate::traits::Overlapper;

/// One qualifying target window for a query, with the intersection
/// `[start, end)` already clipped to the window.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowHit<'a> {
    pub window: &'a Interval<u32, String>,
    pub start: u32,
    pub end: u32,
}

impl WindowHit<'_> {
    #[inline]
    pub fn amplicon_id(&self) -> &str {
        &self.window.val
    }
}

/// A read-only, genome-wide index of target windows grouped by chromosome.
///
/// Built once from a [`TargetSet`] and shared (it is `Send + Sync`) across
/// per-sample workers without synchronization.
pub struct TargetIndex {
    index_maps: HashMap<String, LinearScan<u32, String>>,
    window_count: usize,
}

impl From<&TargetSet> for TargetIndex {
    fn from(targets: &TargetSet) -> Self {
        let mut intervals: HashMap<String, Vec<Interval<u32, String>>> = HashMap::new();

        // group windows per chromosome, preserving file order within each
        for window in targets.windows.iter() {
            intervals
                .entry(window.chr.clone())
                .or_default()
                .push(Interval {
                    start: window.start,
                    end: window.end,
                    val: window.amplicon_id.clone(),
                });
        }

        let window_count = targets.len();
        let index_maps = intervals
            .into_iter()
            .map(|(chr, chr_intervals)| (chr, LinearScan::build(chr_intervals)))
            .collect();

        TargetIndex {
            index_maps,
            window_count,
        }
    }
}

impl TargetIndex {
    /// Find every target window with strictly positive overlap against
    /// `chr:[start, end)`, together with the intersection range. Hits come
    /// back in target-file order; an unknown chromosome yields no hits.
    pub fn query<'a>(&'a self, chr: &str, start: u32, end: u32) -> Vec<WindowHit<'a>> {
        self.query_iter(chr, start, end).collect()
    }

    /// Iterator form of [`query`](Self::query).
    pub fn query_iter<'a>(
        &'a self,
        chr: &str,
        start: u32,
        end: u32,
    ) -> Box<dyn Iterator<Item = WindowHit<'a>> + 'a> {
        match self.index_maps.get(chr) {
            Some(scan) => Box::new(scan.find_iter(start, end).map(move |window| {
                // find_iter only yields strictly positive overlaps, so the
                // intersection is always non-empty here
                let (lo, hi) = window
                    .intersection(start, end)
                    .unwrap_or((window.start, window.start));
                WindowHit {
                    window,
                    start: lo,
                    end: hi,
                }
            })),
            None => Box::new(std::iter::empty()),
        }
    }

    /// Total number of indexed target windows across all chromosomes.
    pub fn len(&self) -> usize {
        self.window_count
    }

    pub fn is_empty(&self) -> bool {
        self.window_count == 0
    }
}

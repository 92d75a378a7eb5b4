//! Interval overlap queries against named amplicon target windows.
//!
//! This crate holds the overlap side of ampcov: a per-chromosome
//! [`Overlapper`] implementation and the genome-wide [`TargetIndex`] that
//! answers "which target windows does this depth run touch, and over which
//! sub-range" queries. All overlap computation lives here; the coverage
//! crate consumes it but does not reimplement it.
//!
//! ## Quick Start
//!
//! ```rust
//! use ampcov_core::models::{TargetSet, TargetWindow};
//! use ampcov_overlaprs::TargetIndex;
//!
//! let targets = TargetSet::from(vec![TargetWindow {
//!     chr: "chrA".to_string(),
//!     start: 10,
//!     end: 20,
//!     amplicon_id: "amp1".to_string(),
//! }]);
//!
//! let index = TargetIndex::from(&targets);
//! let hits = index.query("chrA", 5, 15);
//! assert_eq!(hits.len(), 1);
//! assert_eq!((hits[0].start, hits[0].end), (10, 15));
//! ```

/// Linear-scan overlapper preserving insertion order.
pub mod linear;

/// Genome-wide target window indexing.
pub mod target_index;

/// Core traits for overlap operations.
pub mod traits;

// re-exports
pub use self::linear::LinearScan;
pub use self::target_index::{TargetIndex, WindowHit};
pub use self::traits::Overlapper;

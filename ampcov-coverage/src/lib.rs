//! Depth aggregation and coverage reporting for amplicon sequencing panels.
//!
//! Per sample: decode the per-base depth stream, intersect it against the
//! target windows, and keep a sparse position -> depth map. Across samples:
//! pivot precomputed per-amplicon mean depths into an amplicon x sample
//! matrix, threshold it, and report per-amplicon and per-sample success
//! rates.

pub mod consts;
pub mod depth;
pub mod files;
pub mod matrix;
pub mod report;

// re-exports
pub use consts::*;
pub use depth::*;
pub use files::*;
pub use matrix::*;
pub use report::*;

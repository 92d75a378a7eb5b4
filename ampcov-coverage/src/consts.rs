/// Minimum mean depth for a cell to count as covered (strictly greater
/// than, by default).
pub const DEFAULT_THRESHOLD: f64 = 10.0;

/// Suffix of per-sample mean-depth summary files; the sample id is the
/// filename with this suffix removed.
pub const SUMMARY_SUFFIX: &str = "_coverage_mean.txt";

/// Suffix of per-sample per-base depth files (mosdepth output).
pub const PER_BASE_SUFFIX: &str = ".per-base.bed.gz";

/// Suffix of per-sample target depth maps written by the depth command.
pub const TARGET_DEPTH_SUFFIX: &str = ".target-depth.tsv";

/// The command name for per-sample depth aggregation.
pub const DEPTH_CMD: &str = "depth";

/// The command name for matrix construction and reporting.
pub const MATRIX_CMD: &str = "matrix";

///
/// One summarized (amplicon, sample) mean-depth measurement, sourced from a
/// per-sample `*_coverage_mean.txt` file produced by `bedtools coverage -mean`.
///
#[derive(PartialEq, Debug, Clone)]
pub struct MeanDepthRow {
    pub amplicon_id: String,
    pub sample_id: String,
    pub mean_depth: f64,
}

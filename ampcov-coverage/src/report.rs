//! Thresholding and success-rate reporting over a [`CoverageMatrix`].
//!
//! Rates are computed over the full amplicon x sample universe, not just
//! populated cells: a missing cell counts as a failure, it is not dropped
//! from the denominator. That choice materially changes the reported
//! rates, so it is deliberate and covered by tests.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::matrix::CoverageMatrix;

/// How a cell value is compared against the threshold.
///
/// The observed pipeline behavior is strictly-greater-than, so that is the
/// default; `GreaterOrEqual` is available for callers that want coverage
/// exactly at the threshold to count as success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThresholdMode {
    #[default]
    Greater,
    GreaterOrEqual,
}

impl ThresholdMode {
    #[inline]
    pub fn passes(&self, value: f64, threshold: f64) -> bool {
        match self {
            ThresholdMode::Greater => value > threshold,
            ThresholdMode::GreaterOrEqual => value >= threshold,
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            ThresholdMode::Greater => ">",
            ThresholdMode::GreaterOrEqual => ">=",
        }
    }
}

/// Per-amplicon and per-sample success percentages for one matrix.
#[derive(Debug, Clone)]
pub struct SuccessReport {
    pub threshold: f64,
    pub mode: ThresholdMode,
    /// `(amplicon_id, % of samples passing)`, sorted by amplicon id.
    pub amplicon_rates: Vec<(String, f64)>,
    /// `(sample_id, % of amplicons passing)`, sorted by sample id.
    pub sample_rates: Vec<(String, f64)>,
}

impl SuccessReport {
    pub fn from_matrix(matrix: &CoverageMatrix, threshold: f64, mode: ThresholdMode) -> Self {
        let success = |amplicon: &str, sample: &str| -> bool {
            matrix
                .get(amplicon, sample)
                .map(|value| mode.passes(value, threshold))
                // missing coverage fails the threshold under any comparator
                .unwrap_or(false)
        };

        let n_samples = matrix.n_samples();
        let amplicon_rates = matrix
            .amplicons()
            .map(|amplicon| {
                let passing = matrix.samples().filter(|&s| success(amplicon, s)).count();
                (amplicon.to_string(), percent(passing, n_samples))
            })
            .collect();

        let n_amplicons = matrix.n_amplicons();
        let sample_rates = matrix
            .samples()
            .map(|sample| {
                let passing = matrix.amplicons().filter(|&a| success(a, sample)).count();
                (sample.to_string(), percent(passing, n_amplicons))
            })
            .collect();

        SuccessReport {
            threshold,
            mode,
            amplicon_rates,
            sample_rates,
        }
    }
}

fn percent(passing: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * passing as f64 / total as f64
    }
}

/// Write the matrix as a TSV: rows = amplicons (sorted), columns = samples
/// (sorted), empty cell for a missing pair.
pub fn write_matrix_tsv(matrix: &CoverageMatrix, path: &Path) -> std::io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    write!(writer, "AMPLICON")?;
    for sample in matrix.samples() {
        write!(writer, "\t{}", sample)?;
    }
    writeln!(writer)?;

    for amplicon in matrix.amplicons() {
        write!(writer, "{}", amplicon)?;
        for sample in matrix.samples() {
            match matrix.get(amplicon, sample) {
                Some(depth) => write!(writer, "\t{}", depth)?,
                None => write!(writer, "\t")?,
            }
        }
        writeln!(writer)?;
    }
    writer.flush()?;

    Ok(())
}

/// Write the two-section summary report, both sections sorted by key.
pub fn write_summary(report: &SuccessReport, path: &Path) -> std::io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    writeln!(
        writer,
        "Amplicon success (% of samples with coverage {} {}x for each amplicon):",
        report.mode.symbol(),
        report.threshold
    )?;
    for (amplicon, rate) in &report.amplicon_rates {
        writeln!(writer, "{}: {:.2}%", amplicon, rate)?;
    }

    writeln!(writer)?;
    writeln!(
        writer,
        "Sample success (% of amplicons within each sample which have coverage {} {}x):",
        report.mode.symbol(),
        report.threshold
    )?;
    for (sample, rate) in &report.sample_rates {
        writeln!(writer, "{}: {:.2}%", sample, rate)?;
    }
    writer.flush()?;

    Ok(())
}

//! Amplicon x sample coverage matrix assembly.
//!
//! Rows come from per-sample `*_coverage_mean.txt` summary files; the pivot
//! keeps at most one value per (amplicon, sample) key and treats a second
//! arrival as corrupt input rather than silently picking a value.

use std::collections::{BTreeSet, HashMap};
use std::io::BufRead;
use std::path::Path;

use anyhow::{Context, Result};
use thiserror::Error;

use ampcov_core::models::MeanDepthRow;
use ampcov_core::utils::get_dynamic_reader;

use crate::files::{find_summary_files, sample_id_from_summary, summary_pattern};

#[derive(Error, Debug)]
pub enum MatrixError {
    #[error("duplicate matrix cell: amplicon {amplicon_id}, sample {sample_id}")]
    DuplicateKey {
        amplicon_id: String,
        sample_id: String,
    },

    #[error("no mean-depth summary files found matching: {0}")]
    EmptyInputSet(String),

    #[error("{path}:{line_number}: malformed mean-depth row: {line}")]
    MalformedRecord {
        path: String,
        line_number: usize,
        line: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// The amplicon x sample mean-depth matrix.
///
/// A cell absent for a given key is "missing" (e.g. an amplicon never
/// reported for that sample), which is distinct from a measured mean depth
/// of zero. The amplicon and sample universes are kept sorted.
#[derive(Debug, Default, Clone)]
pub struct CoverageMatrix {
    cells: HashMap<(String, String), f64>,
    amplicons: BTreeSet<String>,
    samples: BTreeSet<String>,
}

impl CoverageMatrix {
    /// Insert one row. A second row for an already-populated
    /// (amplicon, sample) key is rejected even when the values agree —
    /// duplication itself means the inputs are not what we think they are.
    pub fn insert(&mut self, row: MeanDepthRow) -> Result<(), MatrixError> {
        let key = (row.amplicon_id.clone(), row.sample_id.clone());
        if self.cells.contains_key(&key) {
            return Err(MatrixError::DuplicateKey {
                amplicon_id: row.amplicon_id,
                sample_id: row.sample_id,
            });
        }

        self.amplicons.insert(row.amplicon_id);
        self.samples.insert(row.sample_id);
        self.cells.insert(key, row.mean_depth);

        Ok(())
    }

    pub fn from_rows<I>(rows: I) -> Result<Self, MatrixError>
    where
        I: IntoIterator<Item = MeanDepthRow>,
    {
        let mut matrix = CoverageMatrix::default();
        for row in rows {
            matrix.insert(row)?;
        }
        Ok(matrix)
    }

    /// Build the matrix from every `*_coverage_mean.txt` file in `dir`.
    /// Finding no summary files at all is fatal.
    pub fn from_summary_dir(dir: &Path) -> Result<Self> {
        let files = find_summary_files(dir)?;
        if files.is_empty() {
            return Err(MatrixError::EmptyInputSet(summary_pattern(dir)).into());
        }

        let mut matrix = CoverageMatrix::default();
        for path in files {
            let Some(sample_id) = sample_id_from_summary(&path) else {
                continue;
            };
            for row in read_summary_file(&path, &sample_id)? {
                matrix
                    .insert(row)
                    .with_context(|| format!("While loading: {}", path.display()))?;
            }
        }

        Ok(matrix)
    }

    pub fn get(&self, amplicon_id: &str, sample_id: &str) -> Option<f64> {
        self.cells
            .get(&(amplicon_id.to_string(), sample_id.to_string()))
            .copied()
    }

    /// Amplicon ids, ascending.
    pub fn amplicons(&self) -> impl Iterator<Item = &str> {
        self.amplicons.iter().map(|s| s.as_str())
    }

    /// Sample ids, ascending.
    pub fn samples(&self) -> impl Iterator<Item = &str> {
        self.samples.iter().map(|s| s.as_str())
    }

    pub fn n_amplicons(&self) -> usize {
        self.amplicons.len()
    }

    pub fn n_samples(&self) -> usize {
        self.samples.len()
    }

    /// Number of populated cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Parse one sample's summary file: tab-separated rows
/// `chrom start end amplicon_id depth`.
pub fn read_summary_file(path: &Path, sample_id: &str) -> Result<Vec<MeanDepthRow>, MatrixError> {
    let reader = get_dynamic_reader(path)?;
    let path_display = path.display().to_string();

    let mut rows = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = idx + 1;
        if line.is_empty() {
            continue;
        }

        let malformed = || MatrixError::MalformedRecord {
            path: path_display.clone(),
            line_number,
            line: line.clone(),
        };

        let parts: Vec<&str> = line.split('\t').collect();
        if parts.len() < 5 {
            return Err(malformed());
        }
        // coordinates are unused downstream but still validated so corrupt
        // files fail here instead of during rate arithmetic
        let _: u32 = parts[1].parse().map_err(|_| malformed())?;
        let _: u32 = parts[2].parse().map_err(|_| malformed())?;
        let mean_depth: f64 = parts[4].parse().map_err(|_| malformed())?;

        rows.push(MeanDepthRow {
            amplicon_id: parts[3].to_string(),
            sample_id: sample_id.to_string(),
            mean_depth,
        });
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::io::Write;

    fn row(amplicon: &str, sample: &str, depth: f64) -> MeanDepthRow {
        MeanDepthRow {
            amplicon_id: amplicon.to_string(),
            sample_id: sample.to_string(),
            mean_depth: depth,
        }
    }

    #[rstest]
    fn populated_and_missing_cells_are_distinct() {
        let matrix = CoverageMatrix::from_rows(vec![
            row("amp1", "s1", 5.0),
            row("amp1", "s2", 0.0),
            row("amp2", "s2", 20.0),
        ])
        .unwrap();

        assert_eq!(matrix.get("amp1", "s1"), Some(5.0));
        assert_eq!(matrix.get("amp1", "s2"), Some(0.0));
        // amp2 never reported for s1: missing, not zero
        assert_eq!(matrix.get("amp2", "s1"), None);
        assert_eq!(matrix.len(), 3);
        assert_eq!(matrix.n_amplicons(), 2);
        assert_eq!(matrix.n_samples(), 2);
    }

    #[rstest]
    fn universes_are_sorted() {
        let matrix = CoverageMatrix::from_rows(vec![
            row("amp2", "s9", 1.0),
            row("amp1", "s1", 1.0),
        ])
        .unwrap();

        assert_eq!(matrix.amplicons().collect::<Vec<_>>(), vec!["amp1", "amp2"]);
        assert_eq!(matrix.samples().collect::<Vec<_>>(), vec!["s1", "s9"]);
    }

    #[rstest]
    #[case(7.0)]
    #[case(5.0)] // equal value is still a duplicate
    fn duplicate_key_is_rejected(#[case] second_depth: f64) {
        let mut matrix = CoverageMatrix::default();
        matrix.insert(row("amp1", "s1", 5.0)).unwrap();

        let err = matrix.insert(row("amp1", "s1", second_depth)).unwrap_err();
        assert!(matches!(
            err,
            MatrixError::DuplicateKey { amplicon_id, sample_id }
                if amplicon_id == "amp1" && sample_id == "s1"
        ));
    }

    #[rstest]
    fn builds_from_summary_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("s1_coverage_mean.txt"),
            "chrA\t10\t20\tamp1\t5\nchrA\t30\t40\tamp2\t12.5\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("s2_coverage_mean.txt"),
            "chrA\t10\t20\tamp1\t15\n",
        )
        .unwrap();

        let matrix = CoverageMatrix::from_summary_dir(dir.path()).unwrap();
        assert_eq!(matrix.get("amp1", "s1"), Some(5.0));
        assert_eq!(matrix.get("amp2", "s1"), Some(12.5));
        assert_eq!(matrix.get("amp1", "s2"), Some(15.0));
        assert_eq!(matrix.get("amp2", "s2"), None);
    }

    #[rstest]
    fn empty_directory_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = CoverageMatrix::from_summary_dir(dir.path()).unwrap_err();
        let matrix_err = err.downcast_ref::<MatrixError>().unwrap();
        assert!(matches!(matrix_err, MatrixError::EmptyInputSet(_)));
    }

    #[rstest]
    #[case("chrA\t10\t20\tamp1\n")]
    #[case("chrA\tx\t20\tamp1\t5\n")]
    #[case("chrA\t10\t20\tamp1\tdeep\n")]
    fn malformed_summary_row_is_fatal(#[case] contents: &str) {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();

        let err = read_summary_file(file.path(), "s1").unwrap_err();
        assert!(matches!(err, MatrixError::MalformedRecord { line_number: 1, .. }));
    }
}

//! Per-sample depth aggregation over amplicon target windows.
//!
//! [`DepthReader`] lazily decodes one sample's per-base depth stream into
//! [`DepthRecord`]s; [`aggregate_sample_depth`] intersects each run against
//! the shared [`TargetIndex`] and fills a sparse position -> depth map.
//! Samples are independent, so [`run_depth_aggregation`] fans them out over
//! a rayon pool with the index shared read-only.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Lines, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fxhash::FxHashMap;
use indicatif::ProgressBar;
use rayon::prelude::*;
use thiserror::Error;

use ampcov_core::models::DepthRecord;
use ampcov_core::utils::get_dynamic_reader;
use ampcov_overlaprs::TargetIndex;

use crate::consts::TARGET_DEPTH_SUFFIX;
use crate::files::per_base_path;

/// Sparse per-sample map from (chromosome, position) to depth. An absent
/// key means "outside every target window", never "zero depth".
pub type SampleDepthMap = FxHashMap<(String, u32), u32>;

#[derive(Error, Debug)]
pub enum DepthError {
    #[error("{path}:{line_number}: malformed depth record: {line}")]
    MalformedRecord {
        path: String,
        line_number: usize,
        line: String,
    },

    #[error(
        "{path}:{line_number}: depth records out of order on {chr}: start {start} after {prev_start}"
    )]
    UnsortedInput {
        path: String,
        line_number: usize,
        chr: String,
        start: u32,
        prev_start: u32,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A lazy, single-pass reader of constant-depth runs
/// (`chrom start end depth`, tab-separated, optionally gzipped).
///
/// Input must be sorted ascending by start within each chromosome; a
/// record whose start precedes its predecessor's on the same chromosome
/// fails fast with [`DepthError::UnsortedInput`]. Re-reading requires
/// re-opening the source.
pub struct DepthReader<B: BufRead> {
    lines: Lines<B>,
    path: String,
    line_number: usize,
    prev: Option<(String, u32)>,
}

impl DepthReader<BufReader<Box<dyn Read>>> {
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let reader = get_dynamic_reader(path)?;
        Ok(Self::from_reader(reader, &path.display().to_string()))
    }
}

impl<B: BufRead> DepthReader<B> {
    /// Wrap an already-open reader; `label` names the source in errors.
    pub fn from_reader(reader: B, label: &str) -> Self {
        DepthReader {
            lines: reader.lines(),
            path: label.to_string(),
            line_number: 0,
            prev: None,
        }
    }

    fn parse_line(&mut self, line: &str) -> Result<DepthRecord, DepthError> {
        let malformed = || DepthError::MalformedRecord {
            path: self.path.clone(),
            line_number: self.line_number,
            line: line.to_string(),
        };

        let parts: Vec<&str> = line.split('\t').collect();
        if parts.len() < 4 {
            return Err(malformed());
        }

        let start: u32 = parts[1].parse().map_err(|_| malformed())?;
        let end: u32 = parts[2].parse().map_err(|_| malformed())?;
        let depth: u32 = parts[3].parse().map_err(|_| malformed())?;
        if start >= end {
            return Err(malformed());
        }

        let chr = parts[0].to_string();
        if let Some((prev_chr, prev_start)) = &self.prev {
            if *prev_chr == chr && start < *prev_start {
                return Err(DepthError::UnsortedInput {
                    path: self.path.clone(),
                    line_number: self.line_number,
                    chr,
                    start,
                    prev_start: *prev_start,
                });
            }
        }
        self.prev = Some((chr.clone(), start));

        Ok(DepthRecord {
            chr,
            start,
            end,
            depth,
        })
    }
}

impl<B: BufRead> Iterator for DepthReader<B> {
    type Item = Result<DepthRecord, DepthError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            self.line_number += 1;
            if line.is_empty() {
                continue;
            }
            return Some(self.parse_line(&line));
        }
    }
}

/// Build one sample's sparse depth map: for every depth run, write the
/// run's depth at each position of its intersection with every overlapping
/// target window.
///
/// A position covered by two overlapping windows is written twice from the
/// same record, which always agrees. Disagreement at a position can only
/// come from runs that overlap each other, which sorted mosdepth output
/// does not produce; if it happens anyway, the last record wins.
pub fn aggregate_sample_depth<I>(
    index: &TargetIndex,
    records: I,
) -> Result<SampleDepthMap, DepthError>
where
    I: IntoIterator<Item = Result<DepthRecord, DepthError>>,
{
    let mut depth_map = SampleDepthMap::default();

    for record in records {
        let record = record?;
        for hit in index.query_iter(&record.chr, record.start, record.end) {
            for pos in hit.start..hit.end {
                depth_map.insert((record.chr.clone(), pos), record.depth);
            }
        }
    }

    Ok(depth_map)
}

/// Write a sample's depth map as a sorted `chrom pos depth` TSV.
pub fn write_sample_depth(depth_map: &SampleDepthMap, path: &Path) -> std::io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    let mut positions: Vec<(&(String, u32), &u32)> = depth_map.iter().collect();
    positions.sort_by(|a, b| a.0.cmp(b.0));

    for ((chr, pos), depth) in positions {
        writeln!(writer, "{}\t{}\t{}", chr, pos, depth)?;
    }
    writer.flush()?;

    Ok(())
}

/// Configuration for a multi-sample depth aggregation pass.
pub struct DepthAggregationConfig {
    /// Directory holding `<sample>.per-base.bed.gz` files.
    pub input_dir: PathBuf,
    /// Directory for `<sample>.target-depth.tsv` outputs.
    pub output_dir: PathBuf,
    /// Samples to process.
    pub samples: Vec<String>,
    /// Rayon pool size; 0 lets rayon pick.
    pub threads: usize,
}

/// Aggregate every configured sample's depth over the target windows and
/// write one `<sample>.target-depth.tsv` each.
///
/// Samples run in parallel and are isolated from each other: a sample with
/// no per-base file is skipped with a warning, and a sample with corrupt
/// or unsorted input is aborted without halting the rest. Any aborted
/// sample still fails the pass as a whole once every other sample has
/// finished.
pub fn run_depth_aggregation(index: &TargetIndex, config: &DepthAggregationConfig) -> Result<()> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()
        .with_context(|| "Failed to build thread pool")?;

    let bar = ProgressBar::new(config.samples.len() as u64);

    let results: Vec<(String, Result<(), DepthError>)> = pool.install(|| {
        config
            .samples
            .par_iter()
            .map(|sample| {
                let outcome = aggregate_one_sample(index, config, sample);
                bar.inc(1);
                (sample.clone(), outcome)
            })
            .collect()
    });
    bar.finish_and_clear();

    let mut failed = 0;
    for (sample, outcome) in results {
        if let Err(e) = outcome {
            eprintln!("Sample {} failed: {}", sample, e);
            failed += 1;
        }
    }
    if failed > 0 {
        anyhow::bail!("depth aggregation failed for {} sample(s)", failed);
    }

    Ok(())
}

fn aggregate_one_sample(
    index: &TargetIndex,
    config: &DepthAggregationConfig,
    sample: &str,
) -> Result<(), DepthError> {
    let per_base = per_base_path(&config.input_dir, sample);
    if !per_base.is_file() {
        eprintln!(
            "Warning: no per-base depth file for sample {}, skipping: {}",
            sample,
            per_base.display()
        );
        return Ok(());
    }

    let reader = DepthReader::from_path(&per_base)?;
    let depth_map = aggregate_sample_depth(index, reader)?;

    let out_path = config
        .output_dir
        .join(format!("{}{}", sample, TARGET_DEPTH_SUFFIX));
    write_sample_depth(&depth_map, &out_path)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ampcov_core::models::{TargetSet, TargetWindow};
    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::io::Cursor;

    fn window(chr: &str, start: u32, end: u32, id: &str) -> TargetWindow {
        TargetWindow {
            chr: chr.to_string(),
            start,
            end,
            amplicon_id: id.to_string(),
        }
    }

    fn reader(contents: &str) -> DepthReader<Cursor<Vec<u8>>> {
        DepthReader::from_reader(Cursor::new(contents.as_bytes().to_vec()), "test")
    }

    #[fixture]
    fn index() -> TargetIndex {
        TargetIndex::from(&TargetSet::from(vec![window("chrA", 10, 20, "amp1")]))
    }

    #[rstest]
    fn run_clipped_to_window(index: TargetIndex) {
        // window chrA:[10,20), run chrA:[5,15)@50 -> exactly positions 10..=14
        let depth_map = aggregate_sample_depth(&index, reader("chrA\t5\t15\t50\n")).unwrap();

        assert_eq!(depth_map.len(), 5);
        for pos in 10..15 {
            assert_eq!(depth_map.get(&("chrA".to_string(), pos)), Some(&50));
        }
        assert!(!depth_map.contains_key(&("chrA".to_string(), 9)));
        assert!(!depth_map.contains_key(&("chrA".to_string(), 15)));
    }

    #[rstest]
    fn no_positions_outside_target_windows(index: TargetIndex) {
        let input = "chrA\t0\t8\t3\nchrA\t8\t30\t9\nchrB\t0\t100\t99\n";
        let depth_map = aggregate_sample_depth(&index, reader(input)).unwrap();

        assert!(
            depth_map
                .keys()
                .all(|(chr, pos)| chr == "chrA" && (10..20).contains(pos))
        );
        assert_eq!(depth_map.len(), 10);
    }

    #[rstest]
    fn runs_outside_all_windows_are_skipped(index: TargetIndex) {
        let depth_map = aggregate_sample_depth(&index, reader("chrA\t30\t40\t7\n")).unwrap();
        assert!(depth_map.is_empty());
    }

    #[rstest]
    fn aggregation_is_idempotent(index: TargetIndex) {
        let input = "chrA\t5\t15\t50\nchrA\t15\t25\t8\n";
        let first = aggregate_sample_depth(&index, reader(input)).unwrap();
        let second = aggregate_sample_depth(&index, reader(input)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn overlapping_windows_agree_from_one_record() {
        let targets = TargetSet::from(vec![
            window("chrA", 10, 20, "amp1"),
            window("chrA", 15, 25, "amp2"),
        ]);
        let index = TargetIndex::from(&targets);

        let depth_map = aggregate_sample_depth(&index, reader("chrA\t12\t22\t7\n")).unwrap();

        // union of [12,20) and [15,22), every position at the record's depth
        assert_eq!(depth_map.len(), 10);
        for pos in 12..22 {
            assert_eq!(depth_map.get(&("chrA".to_string(), pos)), Some(&7));
        }
    }

    #[rstest]
    #[case("chrA\t5\tfifteen\t50\n")]
    #[case("chrA\t5\t15\n")]
    #[case("chrA\t15\t5\t50\n")]
    fn malformed_record_aborts(#[case] input: &str, index: TargetIndex) {
        let err = aggregate_sample_depth(&index, reader(input)).unwrap_err();
        assert!(matches!(err, DepthError::MalformedRecord { .. }));
    }

    #[rstest]
    fn unsorted_input_fails_fast(index: TargetIndex) {
        let input = "chrA\t10\t12\t5\nchrA\t5\t8\t5\n";
        let err = aggregate_sample_depth(&index, reader(input)).unwrap_err();
        assert!(matches!(
            err,
            DepthError::UnsortedInput {
                line_number: 2,
                start: 5,
                prev_start: 10,
                ..
            }
        ));
    }

    #[rstest]
    fn chromosome_change_resets_sort_check(index: TargetIndex) {
        let input = "chrA\t100\t110\t5\nchrB\t0\t10\t5\n";
        assert!(aggregate_sample_depth(&index, reader(input)).is_ok());
    }

    #[rstest]
    fn driver_skips_missing_samples_and_writes_present_ones(index: TargetIndex) {
        let dir = tempfile::tempdir().unwrap();

        let per_base = per_base_path(dir.path(), "s1");
        let mut encoder = flate2::write::GzEncoder::new(
            File::create(&per_base).unwrap(),
            flate2::Compression::default(),
        );
        encoder.write_all(b"chrA\t5\t15\t50\n").unwrap();
        encoder.finish().unwrap();

        let config = DepthAggregationConfig {
            input_dir: dir.path().to_path_buf(),
            output_dir: dir.path().to_path_buf(),
            samples: vec!["s1".to_string(), "missing".to_string()],
            threads: 1,
        };
        run_depth_aggregation(&index, &config).unwrap();

        let out = std::fs::read_to_string(dir.path().join("s1.target-depth.tsv")).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "chrA\t10\t50");
        assert_eq!(lines[4], "chrA\t14\t50");

        assert!(!dir.path().join("missing.target-depth.tsv").exists());
    }

    #[rstest]
    fn corrupt_sample_fails_the_pass_without_halting_others(index: TargetIndex) {
        let dir = tempfile::tempdir().unwrap();

        let write_per_base = |sample: &str, contents: &[u8]| {
            let mut encoder = flate2::write::GzEncoder::new(
                File::create(per_base_path(dir.path(), sample)).unwrap(),
                flate2::Compression::default(),
            );
            encoder.write_all(contents).unwrap();
            encoder.finish().unwrap();
        };
        write_per_base("good", b"chrA\t5\t15\t50\n");
        write_per_base("corrupt", b"chrA\tfive\t15\t50\n");

        let config = DepthAggregationConfig {
            input_dir: dir.path().to_path_buf(),
            output_dir: dir.path().to_path_buf(),
            samples: vec!["corrupt".to_string(), "good".to_string()],
            threads: 1,
        };
        let err = run_depth_aggregation(&index, &config).unwrap_err();
        assert!(err.to_string().contains("1 sample(s)"));

        // the good sample still ran to completion
        let out = std::fs::read_to_string(dir.path().join("good.target-depth.tsv")).unwrap();
        assert_eq!(out.lines().count(), 5);

        assert!(!dir.path().join("corrupt.target-depth.tsv").exists());
    }
}

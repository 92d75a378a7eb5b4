use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::consts::{PER_BASE_SUFFIX, SUMMARY_SUFFIX};

/// Glob pattern matching per-sample mean-depth summary files in `dir`.
pub fn summary_pattern(dir: &Path) -> String {
    format!("{}/*{}", dir.display(), SUMMARY_SUFFIX)
}

/// Find all `*_coverage_mean.txt` files in `dir`, sorted for deterministic
/// processing order. May legitimately be empty; callers decide whether
/// that is fatal.
pub fn find_summary_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let pattern = summary_pattern(dir);
    let mut files: Vec<PathBuf> = glob::glob(&pattern)
        .with_context(|| format!("Invalid glob pattern: {}", pattern))?
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("Failed reading summary files matching: {}", pattern))?;
    files.sort();
    Ok(files)
}

/// Extract the sample id from a summary file path, i.e. the filename with
/// the `_coverage_mean.txt` suffix removed.
pub fn sample_id_from_summary(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.strip_suffix(SUMMARY_SUFFIX))
        .map(|stem| stem.to_string())
}

/// The expected per-base depth file for a sample: `<dir>/<sample>.per-base.bed.gz`.
pub fn per_base_path(dir: &Path, sample: &str) -> PathBuf {
    dir.join(format!("{}{}", sample, PER_BASE_SUFFIX))
}

/// Discover sample ids from `*.per-base.bed.gz` files in `dir`, sorted.
pub fn discover_samples(dir: &Path) -> Result<Vec<String>> {
    let pattern = format!("{}/*{}", dir.display(), PER_BASE_SUFFIX);
    let mut samples: Vec<String> = glob::glob(&pattern)
        .with_context(|| format!("Invalid glob pattern: {}", pattern))?
        .filter_map(|entry| entry.ok())
        .filter_map(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .and_then(|name| name.strip_suffix(PER_BASE_SUFFIX))
                .map(|stem| stem.to_string())
        })
        .collect();
    samples.sort();
    Ok(samples)
}

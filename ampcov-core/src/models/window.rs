use std::collections::HashSet;
use std::fmt::{self, Display};
use std::path::{Path, PathBuf};

use crate::errors::TargetSetError;
use crate::utils::get_dynamic_reader;
use std::io::BufRead;

///
/// One named amplicon target window. Coordinates are half-open
/// `[start, end)`, matching BED conventions.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone)]
pub struct TargetWindow {
    pub chr: String,
    pub start: u32,
    pub end: u32,
    pub amplicon_id: String,
}

impl Display for TargetWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}",
            self.chr, self.start, self.end, self.amplicon_id
        )
    }
}

///
/// The full set of amplicon target windows for a run, in file order.
/// Built once from a BED-like file and immutable afterwards.
///
#[derive(Clone, Debug)]
pub struct TargetSet {
    pub windows: Vec<TargetWindow>,
    pub path: Option<PathBuf>,
}

impl TryFrom<&Path> for TargetSet {
    type Error = TargetSetError;

    ///
    /// Load a [TargetSet] from a BED-like file with rows
    /// `chrom start end amplicon_id ...`; trailing columns are ignored.
    /// The file may be gzipped.
    ///
    /// Amplicon ids must be unique across the whole file. Windows may
    /// still overlap each other spatially.
    ///
    fn try_from(value: &Path) -> Result<Self, TargetSetError> {
        let reader = get_dynamic_reader(value)?;
        let path_display = value.display().to_string();

        let mut windows: Vec<TargetWindow> = Vec::new();
        let mut seen_ids: HashSet<String> = HashSet::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line_number = idx + 1;

            if line.is_empty()
                || line.starts_with("browser")
                || line.starts_with("track")
                || line.starts_with('#')
            {
                continue;
            }

            let malformed = || TargetSetError::MalformedRecord {
                path: path_display.clone(),
                line_number,
                line: line.clone(),
            };

            let parts: Vec<&str> = line.split('\t').collect();
            if parts.len() < 4 {
                return Err(malformed());
            }

            let start: u32 = parts[1].parse().map_err(|_| malformed())?;
            let end: u32 = parts[2].parse().map_err(|_| malformed())?;
            if start >= end {
                return Err(malformed());
            }

            let amplicon_id = parts[3].to_string();
            if !seen_ids.insert(amplicon_id.clone()) {
                return Err(TargetSetError::DuplicateAmpliconId(amplicon_id));
            }

            windows.push(TargetWindow {
                chr: parts[0].to_string(),
                start,
                end,
                amplicon_id,
            });
        }

        if windows.is_empty() {
            return Err(TargetSetError::EmptyTargetSet(path_display));
        }

        Ok(TargetSet {
            windows,
            path: Some(value.to_owned()),
        })
    }
}

impl TryFrom<&str> for TargetSet {
    type Error = TargetSetError;

    fn try_from(value: &str) -> Result<Self, TargetSetError> {
        TargetSet::try_from(Path::new(value))
    }
}

impl TryFrom<PathBuf> for TargetSet {
    type Error = TargetSetError;

    fn try_from(value: PathBuf) -> Result<Self, TargetSetError> {
        TargetSet::try_from(value.as_path())
    }
}

impl From<Vec<TargetWindow>> for TargetSet {
    fn from(windows: Vec<TargetWindow>) -> Self {
        TargetSet {
            windows,
            path: None,
        }
    }
}

impl TargetSet {
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Amplicon ids in file order.
    pub fn amplicon_ids(&self) -> Vec<&str> {
        self.windows.iter().map(|w| w.amplicon_id.as_str()).collect()
    }
}

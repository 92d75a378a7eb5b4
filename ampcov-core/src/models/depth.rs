use std::fmt::{self, Display};

///
/// One constant-depth run from a per-sample per-base depth file, e.g. a
/// row of a mosdepth `per-base.bed.gz`. Half-open `[start, end)`.
///
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct DepthRecord {
    pub chr: String,
    pub start: u32,
    pub end: u32,
    pub depth: u32,
}

impl Display for DepthRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}",
            self.chr, self.start, self.end, self.depth
        )
    }
}

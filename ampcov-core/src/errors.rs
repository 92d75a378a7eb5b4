use thiserror::Error;

#[derive(Error, Debug)]
pub enum TargetSetError {
    #[error("{path}:{line_number}: malformed target window: {line}")]
    MalformedRecord {
        path: String,
        line_number: usize,
        line: String,
    },

    #[error("no target windows found in the file: {0}")]
    EmptyTargetSet(String),

    #[error("duplicate amplicon id in target file: {0}")]
    DuplicateAmpliconId(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum BwmNgError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV Error: {0}")]
    Csv(#[from] csv::Error),
    #[error("line {line}: expected at least {expected} fields, found {found}")]
    TooFewFields {
        line: u64,
        expected: usize,
        found: usize,
    },
    #[error("line {line}, column {column}: cannot parse {value:?} as a number")]
    InvalidNumber {
        line: u64,
        column: usize,
        value: String,
    },
    #[error("the log contains no samples")]
    Empty,
    #[error("the log only contains the last (incomplete) second")]
    NoCompleteSample,
    #[error("{path:?}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: Box<BwmNgError>,
    },
}

impl BwmNgError {
    /// Attach the path of the file that was being read.
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        match self {
            // never wrap twice
            e @ Self::File { .. } => e,
            e => Self::File {
                path: path.into(),
                source: Box::new(e),
            },
        }
    }
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClassifyError {
    #[error("number of classes should be 2, found {found}")]
    InvalidClassCount { found: usize },

    #[error("classes must be the same in test and training data (train: {train:?}, test: {test:?})")]
    ClassSetMismatch { train: Vec<String>, test: Vec<String> },

    #[error("class {class:?} has no training documents")]
    DegenerateClass { class: String },

    #[error("malformed record on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("invalid dataset: {0}")]
    InvalidDataset(String),

    #[error("sigma must lie strictly between 0 and 1, got {0}")]
    InvalidSigma(f64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = ClassifyError> = std::result::Result<T, E>;

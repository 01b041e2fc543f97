use std::result;

use thiserror::Error;

pub type Result<T> = result::Result<T, SeedGenError>;

#[derive(Error, Debug)]
pub enum SeedGenError {
    #[error("Internal: {0:?}")]
    Internal(String),
    #[error("General {0:?}")]
    General(String),
    #[error("FileNotFound: {0:?}")]
    FileNotFound(String),
    #[error("CSVError: {0:?}")]
    CSVError(#[from] csv::Error),
    #[error("JSONError: {0:?}")]
    JSONError(#[from] serde_json::Error),
    #[error("IOError: {0:?}")]
    IOError(#[from] std::io::Error),
    #[error("unique {kind} pool exhausted after {attempts} draws ({have} of {want} distinct)")]
    UniquePoolExhausted {
        kind: &'static str,
        attempts: usize,
        have: usize,
        want: usize,
    },
}

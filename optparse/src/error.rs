use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unknown option '{0}'")]
    UnknownOption(String),

    #[error("Option '{0}' requires an argument")]
    MissingValue(String),

    #[error("Option '{0}' requires a non-empty argument")]
    EmptyValue(String),

    #[error("Option '{0}' requires a numeric argument")]
    NotNumeric(String),

    #[error("Option '{0}' is mandatory and was not given")]
    MissingMandatory(String),

    #[error("mandatory options were missing: {}", .0.join(", "))]
    Mandatory(Vec<String>),

    #[error("parse failed: {0} argument(s) rejected")]
    Rejected(usize),

    /// The matching pass ran out of pre-sized storage. This is never a user
    /// error: the sizes handed in did not come from the same input.
    #[error("{what} storage exhausted: needed {needed}, sized for {capacity}")]
    BufferSize {
        what: &'static str,
        needed: usize,
        capacity: usize,
    },

    #[error("option index {index} out of range ({slots} slots)")]
    IndexOutOfRange { index: usize, slots: usize },

    #[error("option {0} was not given")]
    Absent(usize),

    #[error("Option '{0}' was given without a value")]
    NoValue(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Fatal user-facing error: print and leave with status 1.
pub fn fatal(msg: &str) -> ! {
    eprintln!("{}", msg);
    std::process::exit(1);
}

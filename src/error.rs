//! Errors surfaced at the boundaries of the legend engine.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LegendError {
    /// Export sizes must be finite pixel values greater than one.
    #[error("Height and width should be pixel values. (got {0})")]
    InvalidSize(f64),

    #[error("Image format is not jpeg, png or svg: {0:?}")]
    UnsupportedFormat(String),

    #[error("invalid legend option `{field}`: {reason}")]
    InvalidOption { field: &'static str, reason: String },

    /// A newer pass was started before this one completed.
    #[error("layout pass {pass} was superseded by pass {current}")]
    StalePass { pass: u64, current: u64 },

    #[error("could not measure label {label:?}: {reason}")]
    Measurement { label: String, reason: String },

    #[error("entry index {0} is out of range")]
    NoSuchEntry(usize),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

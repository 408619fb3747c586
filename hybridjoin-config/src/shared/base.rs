use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A numeric setting that sizes a structure or a batch was zero.
    #[error("`{field}` must be greater than 0")]
    ZeroValue { field: &'static str },
    /// The date dimension range is inverted.
    #[error("Invalid date range: `start` ({start}) is after `end` ({end})")]
    InvertedDateRange { start: String, end: String },
}

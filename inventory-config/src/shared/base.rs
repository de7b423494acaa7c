use thiserror::Error;

/// Errors raised when a configuration value fails validation.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("invalid value for `{field}`: {constraint}")]
    InvalidFieldValue { field: String, constraint: String },
}

use thiserror::Error;

/// Why a number-specification or boolean string failed to parse.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidSpecification {
    #[error("number specification cannot be empty")]
    Empty,
    #[error("not a valid boolean value: '{0}'")]
    NotBoolean(String),
    #[error("invalid number format: '{0}', must be a positive integer")]
    NotAPositiveInteger(String),
    #[error("invalid range format: '{0}', expected 'start-end' with both positive")]
    MalformedRange(String),
    #[error("range start must be <= end: '{0}'")]
    RangeStartAfterEnd(String),
}

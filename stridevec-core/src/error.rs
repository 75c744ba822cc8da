use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StrideError {
    #[error("Allocation of {count} elements of {elem_size} bytes failed")]
    AllocationFailure { count: usize, elem_size: usize },

    #[error("Operand sizes do not match: {lhs} != {rhs}")]
    SizeMismatch { lhs: usize, rhs: usize },

    #[error("Integer division by zero")]
    DivisionByZero,

    #[error("Integer division overflows the element type")]
    DivisionOverflow,

    #[error("Index {index} out of range for length {len}")]
    OutOfRange { index: usize, len: usize },

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Invalid matrix dimensions: {0}")]
    InvalidDimensions(String),
}

pub type Result<T> = std::result::Result<T, StrideError>;

/// Unwraps the result of a fallible operation behind a `std::ops` operator,
/// which has no way to hand the error back.
#[track_caller]
pub(crate) fn or_panic<T>(result: Result<T>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("{}", err),
    }
}

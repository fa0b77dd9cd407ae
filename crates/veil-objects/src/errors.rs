use thiserror::Error;

use crate::{MAX_NOTE_FIELDS, abi::AbiType};

// NOTE ERROR
// ================================================================================================

#[derive(Debug, Error)]
pub enum NoteError {
    #[error("note carries {actual} fields which exceeds the maximum of {MAX_NOTE_FIELDS}")]
    TooManyFields { actual: usize },
    #[error("note must carry at least one field")]
    EmptyFields,
}

// ABI ERROR
// ================================================================================================

#[derive(Debug, Error)]
pub enum AbiError {
    #[error("function expects {expected} arguments but {actual} were provided")]
    ArgumentCountMismatch { expected: usize, actual: usize },
    #[error("argument {index} does not match the declared parameter type {expected:?}")]
    ArgumentTypeMismatch { index: usize, expected: AbiType },
    #[error("argument data is {actual} field elements wide but the ABI declares {expected}")]
    ArgumentWidthMismatch { expected: usize, actual: usize },
    #[error("return data is {actual} field elements wide but the ABI declares {expected}")]
    ReturnWidthMismatch { expected: usize, actual: usize },
}

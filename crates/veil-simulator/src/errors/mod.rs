use alloc::{boxed::Box, string::String};
use core::{
    error::Error,
    fmt::{Display, Formatter},
};

use thiserror::Error;
use veil_objects::{
    AbiError, Address, MAX_CALL_DEPTH, NoteError, StorageSlot,
    abi::FunctionSelector,
    note::{NoteCommitment, Nullifier},
};

use crate::{executor::FunctionKind, frame::CallPath};

// SIMULATION ERROR
// ================================================================================================

/// The error kinds a transaction simulation can terminate with.
///
/// All of these abort the enclosing simulation; none are retried internally. Frame-scoped
/// variants carry the [CallPath] of the failing frame so the caller can diagnose which call and
/// which note caused the failure.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("state oracle unavailable")]
    OracleUnavailable(#[source] StateOracleError),
    #[error("failed to resolve the function to execute (frame {path})")]
    FunctionResolutionFailed {
        path: CallPath,
        #[source]
        source: ContractStoreError,
    },
    #[error(
        "function {selector} of contract {contract} is {actual} but was invoked as {expected}"
    )]
    FunctionKindMismatch {
        contract: Address,
        selector: FunctionSelector,
        expected: FunctionKind,
        actual: FunctionKind,
    },
    #[error("no note matching the read was found for contract {contract} slot {slot} (frame {path})")]
    NoteNotFound {
        contract: Address,
        slot: StorageSlot,
        path: CallPath,
    },
    #[error(
        "read matched {matches} notes for contract {contract} slot {slot} where exactly one was expected (frame {path})"
    )]
    AmbiguousRead {
        contract: Address,
        slot: StorageSlot,
        matches: usize,
        path: CallPath,
    },
    #[error("note {commitment} was already nullified within this transaction (frame {path})")]
    AlreadyNullified {
        commitment: NoteCommitment,
        path: CallPath,
    },
    #[error("{kind} attempted during unconstrained execution (frame {path})")]
    InvalidSideEffectInUnconstrainedMode { kind: SideEffectKind, path: CallPath },
    #[error("{kind} attempted during a static call (frame {path})")]
    InvalidSideEffectInStaticCall { kind: SideEffectKind, path: CallPath },
    #[error("call depth {depth} exceeds the maximum of {MAX_CALL_DEPTH} (frame {path})")]
    CallDepthExceeded { depth: usize, path: CallPath },
    #[error("failed to build a note (frame {path})")]
    NoteConstructionFailed {
        path: CallPath,
        #[source]
        source: NoteError,
    },
    #[error("failed to encode or decode function values")]
    Abi(#[source] AbiError),
}

// SIDE EFFECT KIND
// ================================================================================================

/// The kind of state-mutating operation rejected in a read-only context.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SideEffectKind {
    NoteInsertion,
    Nullification,
    NestedCall,
}

impl Display for SideEffectKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NoteInsertion => f.write_str("note insertion"),
            Self::Nullification => f.write_str("nullification"),
            Self::NestedCall => f.write_str("nested call"),
        }
    }
}

// STATE ORACLE ERROR
// ================================================================================================

#[derive(Debug, Error)]
pub enum StateOracleError {
    #[error("no committed note with commitment {0} is known to the oracle")]
    WitnessNotFound(NoteCommitment),
    /// Custom error variant for implementors of the [`StateOracle`](crate::oracle::StateOracle)
    /// trait.
    #[error("{error_msg}")]
    Other {
        error_msg: Box<str>,
        // thiserror will return this when calling Error::source on StateOracleError.
        source: Option<Box<dyn Error + Send + Sync + 'static>>,
    },
}

impl StateOracleError {
    /// Creates a custom error using the [`StateOracleError::Other`] variant from an error message.
    pub fn other(message: impl Into<String>) -> Self {
        let message: String = message.into();
        Self::Other { error_msg: message.into(), source: None }
    }

    /// Creates a custom error using the [`StateOracleError::Other`] variant from an error message
    /// and a source error.
    pub fn other_with_source(
        message: impl Into<String>,
        source: impl Error + Send + Sync + 'static,
    ) -> Self {
        let message: String = message.into();
        Self::Other {
            error_msg: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

// CONTRACT STORE ERROR
// ================================================================================================

#[derive(Debug, Error)]
pub enum ContractStoreError {
    #[error("no function with selector {selector} is registered for contract {contract}")]
    FunctionNotFound {
        contract: Address,
        selector: FunctionSelector,
    },
    /// Custom error variant for implementors of the
    /// [`ContractStore`](crate::executor::ContractStore) trait.
    #[error("{error_msg}")]
    Other {
        error_msg: Box<str>,
        source: Option<Box<dyn Error + Send + Sync + 'static>>,
    },
}

impl ContractStoreError {
    /// Creates a custom error using the [`ContractStoreError::Other`] variant from an error
    /// message.
    pub fn other(message: impl Into<String>) -> Self {
        let message: String = message.into();
        Self::Other { error_msg: message.into(), source: None }
    }
}

// KERNEL ERROR
// ================================================================================================

/// Errors raised when the kernel-side reconciliation cannot match the assembled side-effect set
/// against pending and committed state.
///
/// These are distinct from [SimulationError::NoteNotFound]: a kernel mismatch can occur even when
/// the simulator itself saw a match, if ordering or visibility was computed incorrectly. That
/// class of divergence is precisely what this core exists to prevent.
#[derive(Debug, Error)]
pub enum KernelError {
    #[error("kernel could not match read request at sequence {sequence} for commitment {commitment}")]
    ReadRequestMismatch {
        sequence: u32,
        commitment: NoteCommitment,
    },
    #[error(
        "membership witness for commitment {commitment} at tree index {tree_index} does not recompute the note tree root"
    )]
    MembershipCheckFailed {
        commitment: NoteCommitment,
        tree_index: u64,
    },
    #[error("nullifier {0} was emitted more than once within the transaction")]
    DuplicateNullifier(Nullifier),
    #[error("failed to fetch a membership witness from the state oracle")]
    WitnessUnavailable(#[source] StateOracleError),
}


#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use core::error::Error;

    use super::{ContractStoreError, StateOracleError};

    #[test]
    fn other_oracle_errors_carry_message_and_source() {
        let err = StateOracleError::other("query failed");
        assert_eq!(err.to_string(), "query failed");
        assert!(err.source().is_none());

        let err = StateOracleError::other_with_source(
            "query failed",
            StateOracleError::other("backend offline"),
        );
        assert_eq!(err.to_string(), "query failed");
        let source = err.source().unwrap();
        assert_eq!(source.to_string(), "backend offline");
    }

    #[test]
    fn other_store_errors_carry_message() {
        let err = ContractStoreError::other("registry corrupt");
        assert_eq!(err.to_string(), "registry corrupt");
        assert!(err.source().is_none());
    }
}

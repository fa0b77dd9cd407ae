use alloc::vec::Vec;

use super::ReadRequest;
use crate::{
    Address, Felt,
    abi::FunctionSelector,
    note::{NoteCommitment, Nullifier, PendingNote},
};

// EXECUTION RESULT
// ================================================================================================

/// The outcome of executing one frame, including the outcomes of all of its nested calls.
///
/// Side effects are listed in the order the frame emitted them; nested executions appear in call
/// order (depth-first). Every side effect carries its transaction-wide sequence, so the flat,
/// transaction-ordered view can be reassembled from the tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecutionResult {
    contract: Address,
    selector: FunctionSelector,
    frame: u32,
    return_values: Vec<Felt>,
    read_requests: Vec<ReadRequest>,
    new_notes: Vec<PendingNote>,
    nullifiers: Vec<NullifierEntry>,
    nested_executions: Vec<ExecutionResult>,
}

impl ExecutionResult {
    /// Returns a new [ExecutionResult] with the specified parameters.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        contract: Address,
        selector: FunctionSelector,
        frame: u32,
        return_values: Vec<Felt>,
        read_requests: Vec<ReadRequest>,
        new_notes: Vec<PendingNote>,
        nullifiers: Vec<NullifierEntry>,
        nested_executions: Vec<ExecutionResult>,
    ) -> Self {
        Self {
            contract,
            selector,
            frame,
            return_values,
            read_requests,
            new_notes,
            nullifiers,
            nested_executions,
        }
    }

    /// Returns the address of the contract this frame executed against.
    pub fn contract(&self) -> Address {
        self.contract
    }

    /// Returns the selector of the executed function.
    pub fn selector(&self) -> FunctionSelector {
        self.selector
    }

    /// Returns the index of the frame which produced this result.
    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// Returns the raw return values of the executed function.
    pub fn return_values(&self) -> &[Felt] {
        &self.return_values
    }

    /// Returns the read requests emitted by this frame, in emission order.
    pub fn read_requests(&self) -> &[ReadRequest] {
        &self.read_requests
    }

    /// Returns the notes inserted by this frame, in emission order.
    pub fn new_notes(&self) -> &[PendingNote] {
        &self.new_notes
    }

    /// Returns the nullifiers emitted by this frame, in emission order.
    pub fn nullifiers(&self) -> &[NullifierEntry] {
        &self.nullifiers
    }

    /// Returns the results of this frame's nested calls, in call order.
    pub fn nested_executions(&self) -> &[ExecutionResult] {
        &self.nested_executions
    }
}

// NULLIFIER ENTRY
// ================================================================================================

/// A nullifier emitted during execution, together with the commitment of the consumed note and
/// the transaction-wide sequence at which it was emitted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NullifierEntry {
    nullifier: Nullifier,
    note_commitment: NoteCommitment,
    sequence: u32,
}

impl NullifierEntry {
    /// Returns a new [NullifierEntry] with the specified parameters.
    pub fn new(nullifier: Nullifier, note_commitment: NoteCommitment, sequence: u32) -> Self {
        Self { nullifier, note_commitment, sequence }
    }

    /// Returns the emitted nullifier.
    pub fn nullifier(&self) -> Nullifier {
        self.nullifier
    }

    /// Returns the commitment of the consumed note.
    pub fn note_commitment(&self) -> NoteCommitment {
        self.note_commitment
    }

    /// Returns the transaction-wide side-effect sequence at which the nullifier was emitted.
    pub fn sequence(&self) -> u32 {
        self.sequence
    }
}

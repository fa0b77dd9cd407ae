use alloc::vec::Vec;

use veil_objects::{
    note::PendingNote,
    transaction::{ExecutionResult, NullifierEntry, ReadRequest},
};

// TRANSACTION EFFECTS
// ================================================================================================

/// The flat, transaction-ordered side-effect set of a simulated transaction: the artifact handed
/// to the kernel circuit for verification.
///
/// Assembled from an [ExecutionResult] tree by collecting every frame's effects and ordering
/// them by their transaction-wide sequence, so the kernel observes reads, insertions, and
/// nullifications in exactly the order execution emitted them, regardless of call nesting.
#[derive(Clone, Debug, Default)]
pub struct TransactionEffects {
    read_requests: Vec<ReadRequest>,
    new_notes: Vec<PendingNote>,
    nullifiers: Vec<NullifierEntry>,
}

impl TransactionEffects {
    // CONSTRUCTORS
    // --------------------------------------------------------------------------------------------

    /// Returns a new [TransactionEffects] built from pre-collected parts; the parts are sorted
    /// by sequence.
    pub fn new(
        mut read_requests: Vec<ReadRequest>,
        mut new_notes: Vec<PendingNote>,
        mut nullifiers: Vec<NullifierEntry>,
    ) -> Self {
        read_requests.sort_by_key(ReadRequest::sequence);
        new_notes.sort_by_key(PendingNote::sequence);
        nullifiers.sort_by_key(NullifierEntry::sequence);
        Self { read_requests, new_notes, nullifiers }
    }

    /// Collects the side effects of every frame in the provided result tree into one
    /// transaction-ordered set.
    pub fn assemble(result: &ExecutionResult) -> Self {
        let mut read_requests = Vec::new();
        let mut new_notes = Vec::new();
        let mut nullifiers = Vec::new();

        collect(result, &mut read_requests, &mut new_notes, &mut nullifiers);

        Self::new(read_requests, new_notes, nullifiers)
    }

    // PUBLIC ACCESSORS
    // --------------------------------------------------------------------------------------------

    /// Returns all read requests of the transaction, in sequence order.
    pub fn read_requests(&self) -> &[ReadRequest] {
        &self.read_requests
    }

    /// Returns all notes inserted by the transaction, in sequence order.
    pub fn new_notes(&self) -> &[PendingNote] {
        &self.new_notes
    }

    /// Returns all nullifiers emitted by the transaction, in sequence order.
    pub fn nullifiers(&self) -> &[NullifierEntry] {
        &self.nullifiers
    }
}

fn collect(
    result: &ExecutionResult,
    read_requests: &mut Vec<ReadRequest>,
    new_notes: &mut Vec<PendingNote>,
    nullifiers: &mut Vec<NullifierEntry>,
) {
    read_requests.extend_from_slice(result.read_requests());
    new_notes.extend_from_slice(result.new_notes());
    nullifiers.extend_from_slice(result.nullifiers());

    for nested in result.nested_executions() {
        collect(nested, read_requests, new_notes, nullifiers);
    }
}

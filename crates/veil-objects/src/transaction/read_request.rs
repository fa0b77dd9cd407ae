use crate::{Address, StorageSlot, note::NoteCommitment};

// READ REQUEST
// ================================================================================================

/// A claim, made during execution, that a specific note exists and was resolved by a read.
///
/// A read request carries enough information for the kernel circuit to independently re-verify
/// the claim: the commitment of the resolved note, the `(contract, slot)` pair under which it
/// was looked up, the transaction-wide sequence at which the read occurred, and the origin of
/// the note (pending with its insertion sequence, or committed with its note-tree index).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReadRequest {
    commitment: NoteCommitment,
    contract: Address,
    slot: StorageSlot,
    sequence: u32,
    origin: ReadOrigin,
}

impl ReadRequest {
    /// Returns a new [ReadRequest] with the specified parameters.
    pub fn new(
        commitment: NoteCommitment,
        contract: Address,
        slot: StorageSlot,
        sequence: u32,
        origin: ReadOrigin,
    ) -> Self {
        Self { commitment, contract, slot, sequence, origin }
    }

    /// Returns the commitment of the note this read resolved.
    pub fn commitment(&self) -> NoteCommitment {
        self.commitment
    }

    /// Returns the contract under which the note was looked up.
    pub fn contract(&self) -> Address {
        self.contract
    }

    /// Returns the storage slot under which the note was looked up.
    pub fn slot(&self) -> StorageSlot {
        self.slot
    }

    /// Returns the transaction-wide side-effect sequence at which the read occurred.
    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    /// Returns the origin of the resolved note.
    pub fn origin(&self) -> ReadOrigin {
        self.origin
    }
}

// READ ORIGIN
// ================================================================================================

/// Identifies where the note resolved by a read request came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadOrigin {
    /// The note is pending within the same transaction; `insert_sequence` is the transaction-wide
    /// sequence at which it was inserted. The kernel matches such transient reads against the
    /// transaction's own insertions.
    Pending { insert_sequence: u32 },
    /// The note is part of the committed note tree at `tree_index`. The kernel matches such reads
    /// against the historic note-tree root through a membership witness.
    Committed { tree_index: u64 },
}

impl ReadOrigin {
    /// Returns true if the resolved note was pending at read time.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }
}

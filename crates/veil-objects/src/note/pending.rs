use super::{Note, NoteCommitment};

// PENDING NOTE
// ================================================================================================

/// A note which has been created during a transaction simulation but not yet included in the
/// committed note tree.
///
/// Pending notes exist only within the lifetime of one transaction's simulation. Each pending
/// note is tagged with the transaction-wide side-effect sequence at which it was inserted and
/// with the index of the frame that created it; the sequence is the basis for the pending-note
/// visibility rule: a read resolves a pending note iff the read occurs at a later sequence
/// within the same transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingNote {
    note: Note,
    sequence: u32,
    frame: u32,
}

impl PendingNote {
    /// Returns a new [PendingNote] instantiated from the provided note and position.
    pub fn new(note: Note, sequence: u32, frame: u32) -> Self {
        Self { note, sequence, frame }
    }

    /// Returns the underlying note.
    pub fn note(&self) -> &Note {
        &self.note
    }

    /// Returns the commitment of the underlying note.
    pub fn commitment(&self) -> NoteCommitment {
        self.note.commitment()
    }

    /// Returns the transaction-wide side-effect sequence at which this note was inserted.
    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    /// Returns the index of the frame which created this note.
    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// Consumes this pending note and returns the underlying note.
    pub fn into_note(self) -> Note {
        self.note
    }
}

impl From<PendingNote> for Note {
    fn from(pending: PendingNote) -> Self {
        pending.note
    }
}

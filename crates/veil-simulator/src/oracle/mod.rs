use alloc::vec::Vec;

use miden_crypto::merkle::MerklePath;
use veil_objects::{
    Address, Digest, StorageSlot,
    note::{Note, NoteCommitment},
    transaction::HistoricTreeRoots,
};

use crate::StateOracleError;

// CONSTANTS
// ================================================================================================

/// Number of committed notes the execution engine requests from the oracle per page.
pub const ORACLE_PAGE_SIZE: usize = 10;

// STATE ORACLE TRAIT
// ================================================================================================

/// Read-only interface to externally-owned historic state: committed notes, tree roots, and
/// membership witnesses.
///
/// Implementations are purely queries with no side effects. A failure of the underlying state
/// source surfaces as a [StateOracleError] and aborts the enclosing simulation; the engine never
/// retries internally (retry policy, if any, belongs to the caller).
pub trait StateOracle {
    /// Returns one page of committed notes stored under the specified contract and slot.
    ///
    /// `sort_by` optionally names the index of the note field to sort by before paginating.
    /// Out-of-range offsets yield an empty page, never an error; `count` always reports the total
    /// number of committed notes under the slot.
    fn get_notes(
        &self,
        contract: Address,
        slot: StorageSlot,
        sort_by: Option<usize>,
        sort_order: SortOrder,
        limit: usize,
        offset: usize,
    ) -> Result<NotePage, StateOracleError>;

    /// Returns the committed-state tree roots as of the start of the transaction.
    ///
    /// The engine fetches this snapshot once per transaction simulation; all other queries are
    /// implicitly relative to it.
    fn get_tree_roots(&self) -> Result<HistoricTreeRoots, StateOracleError>;

    /// Returns the merkle membership witness of a committed note, used when a read must be
    /// proven against the note tree.
    fn get_membership_witness(
        &self,
        commitment: NoteCommitment,
    ) -> Result<MembershipWitness, StateOracleError>;
}

// SORT ORDER
// ================================================================================================

/// The direction in which the oracle sorts notes before paginating.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

// NOTE PAGE
// ================================================================================================

/// One page of committed notes returned by [StateOracle::get_notes].
#[derive(Clone, Debug)]
pub struct NotePage {
    count: usize,
    notes: Vec<CommittedNote>,
}

impl NotePage {
    /// Returns a new [NotePage] reporting `count` total notes and carrying the given page.
    pub fn new(count: usize, notes: Vec<CommittedNote>) -> Self {
        Self { count, notes }
    }

    /// Returns the total number of committed notes under the queried slot, independent of
    /// pagination.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Returns the notes on this page.
    pub fn notes(&self) -> &[CommittedNote] {
        &self.notes
    }

    /// Consumes the page and returns the notes on it.
    pub fn into_notes(self) -> Vec<CommittedNote> {
        self.notes
    }
}

// COMMITTED NOTE
// ================================================================================================

/// A note included in the committed note tree, together with its leaf index.
#[derive(Clone, Debug)]
pub struct CommittedNote {
    note: Note,
    tree_index: u64,
}

impl CommittedNote {
    /// Returns a new [CommittedNote] with the specified note and tree index.
    pub fn new(note: Note, tree_index: u64) -> Self {
        Self { note, tree_index }
    }

    /// Returns the underlying note.
    pub fn note(&self) -> &Note {
        &self.note
    }

    /// Returns the index of the note's leaf in the committed note tree.
    pub fn tree_index(&self) -> u64 {
        self.tree_index
    }

    /// Consumes this committed note and returns the underlying note.
    pub fn into_note(self) -> Note {
        self.note
    }
}

// MEMBERSHIP WITNESS
// ================================================================================================

/// A merkle path proving that a commitment is a leaf of the committed note tree.
#[derive(Clone, Debug)]
pub struct MembershipWitness {
    tree_index: u64,
    path: MerklePath,
}

impl MembershipWitness {
    /// Returns a new [MembershipWitness] for the leaf at the specified index.
    pub fn new(tree_index: u64, path: MerklePath) -> Self {
        Self { tree_index, path }
    }

    /// Returns the index of the witnessed leaf.
    pub fn tree_index(&self) -> u64 {
        self.tree_index
    }

    /// Returns the merkle path of the witnessed leaf.
    pub fn path(&self) -> &MerklePath {
        &self.path
    }

    /// Returns true if this witness proves the provided commitment under the provided root.
    pub fn verify(&self, commitment: NoteCommitment, root: Digest) -> bool {
        self.path
            .compute_root(self.tree_index, commitment.inner())
            .map(|computed| computed == root)
            .unwrap_or(false)
    }
}

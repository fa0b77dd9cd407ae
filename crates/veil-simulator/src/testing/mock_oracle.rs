use alloc::vec::Vec;

use miden_crypto::merkle::{MerkleTree, NodeIndex};
use veil_objects::{
    Address, Digest, EMPTY_WORD, StorageSlot, Word,
    note::{Note, NoteCommitment},
    transaction::HistoricTreeRoots,
};

use crate::{
    StateOracleError,
    oracle::{CommittedNote, MembershipWitness, NotePage, SortOrder, StateOracle},
};

// MOCK STATE ORACLE
// ================================================================================================

/// An in-memory [StateOracle] backed by a fixed set of committed notes.
///
/// The note tree is a real merkle tree over the note commitments (padded to a power of two), so
/// membership witnesses returned by this oracle verify against the reported historic roots. The
/// oracle can also be put into an unavailable state to exercise oracle-failure paths.
pub struct MockStateOracle {
    notes: Vec<Note>,
    tree: MerkleTree,
    roots: HistoricTreeRoots,
    unavailable: bool,
}

impl MockStateOracle {
    /// Returns a new [MockStateOracle] whose committed note tree contains the provided notes,
    /// with tree indices assigned in order.
    pub fn new(notes: Vec<Note>) -> Self {
        let mut leaves: Vec<Word> =
            notes.iter().map(|note| note.commitment().into()).collect();
        let width = leaves.len().max(2).next_power_of_two();
        leaves.resize(width, EMPTY_WORD);

        let tree = MerkleTree::new(leaves).expect("failed to build the mock note tree");
        let roots = HistoricTreeRoots::new(tree.root(), Digest::default(), Digest::default());

        Self { notes, tree, roots, unavailable: false }
    }

    /// Returns a new [MockStateOracle] with no committed notes.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Returns a new [MockStateOracle] whose every query fails, emulating an unreachable state
    /// source.
    pub fn offline() -> Self {
        let mut oracle = Self::empty();
        oracle.unavailable = true;
        oracle
    }

    /// Returns the historic roots this oracle reports.
    pub fn roots(&self) -> HistoricTreeRoots {
        self.roots
    }

    fn check_available(&self) -> Result<(), StateOracleError> {
        if self.unavailable {
            return Err(StateOracleError::other("mock state oracle is offline"));
        }
        Ok(())
    }

    fn position_of(&self, commitment: NoteCommitment) -> Option<u64> {
        self.notes
            .iter()
            .position(|note| note.commitment() == commitment)
            .map(|position| position as u64)
    }
}

impl StateOracle for MockStateOracle {
    fn get_notes(
        &self,
        contract: Address,
        slot: StorageSlot,
        sort_by: Option<usize>,
        sort_order: SortOrder,
        limit: usize,
        offset: usize,
    ) -> Result<NotePage, StateOracleError> {
        self.check_available()?;

        let mut matching: Vec<CommittedNote> = self
            .notes
            .iter()
            .enumerate()
            .filter(|(_, note)| note.contract() == contract && note.slot() == slot)
            .map(|(index, note)| CommittedNote::new(note.clone(), index as u64))
            .collect();

        if let Some(field) = sort_by {
            matching.sort_by_key(|committed| {
                committed.note().fields().get(field).map(|felt| felt.as_int()).unwrap_or(0)
            });
        }
        if sort_order == SortOrder::Descending {
            matching.reverse();
        }

        let count = matching.len();
        let start = offset.min(count);
        let end = offset.saturating_add(limit).min(count);

        Ok(NotePage::new(count, matching[start..end].to_vec()))
    }

    fn get_tree_roots(&self) -> Result<HistoricTreeRoots, StateOracleError> {
        self.check_available()?;
        Ok(self.roots)
    }

    fn get_membership_witness(
        &self,
        commitment: NoteCommitment,
    ) -> Result<MembershipWitness, StateOracleError> {
        self.check_available()?;

        let position = self
            .position_of(commitment)
            .ok_or(StateOracleError::WitnessNotFound(commitment))?;
        let index = NodeIndex::new(self.tree.depth(), position)
            .expect("leaf position is within the mock note tree");
        let path = self
            .tree
            .get_path(index)
            .expect("leaf position is within the mock note tree");

        Ok(MembershipWitness::new(position, path))
    }
}

// TESTS
// ================================================================================================

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use veil_objects::{Address, Felt, StorageSlot, ZERO};

    use super::MockStateOracle;
    use crate::oracle::{SortOrder, StateOracle};

    const CONTRACT: Address = Address::new(Felt::new(3));
    const SLOT: StorageSlot = StorageSlot::new(Felt::new(1));

    fn oracle_with_notes(count: u64) -> MockStateOracle {
        let notes = (0..count)
            .map(|value| {
                veil_objects::note::Note::new(
                    CONTRACT,
                    SLOT,
                    vec![Felt::new(value)],
                    Felt::new(value + 1000),
                    ZERO,
                )
                .unwrap()
            })
            .collect();
        MockStateOracle::new(notes)
    }

    #[test]
    fn pagination_reports_full_count_and_clamps_pages() {
        let oracle = oracle_with_notes(7);

        for (offset, expected) in [(0, 3), (3, 3), (6, 1), (9, 0)] {
            let page = oracle
                .get_notes(CONTRACT, SLOT, None, SortOrder::Ascending, 3, offset)
                .unwrap();
            assert_eq!(page.count(), 7, "count must be total, not page size");
            assert_eq!(page.notes().len(), expected, "offset {offset}");
        }
    }

    #[test]
    fn membership_witnesses_verify_against_reported_roots() {
        let oracle = oracle_with_notes(5);
        let page = oracle
            .get_notes(CONTRACT, SLOT, None, SortOrder::Ascending, 5, 0)
            .unwrap();

        for committed in page.notes() {
            let commitment = committed.note().commitment();
            let witness = oracle.get_membership_witness(commitment).unwrap();
            assert_eq!(witness.tree_index(), committed.tree_index());
            assert!(witness.verify(commitment, oracle.roots().note_tree()));
        }
    }

    #[test]
    fn sorting_applies_before_pagination() {
        let oracle = oracle_with_notes(4);

        let page = oracle
            .get_notes(CONTRACT, SLOT, Some(0), SortOrder::Descending, 2, 0)
            .unwrap();
        let amounts: Vec<u64> = page
            .notes()
            .iter()
            .map(|committed| committed.note().fields()[0].as_int())
            .collect();

        assert_eq!(amounts, vec![3, 2]);
    }
}

use alloc::{collections::BTreeMap, vec::Vec};

use veil_objects::{
    Address, Felt, NoteError, StorageSlot, Word,
    note::{Note, NoteCommitment, PendingNote},
    transaction::{NullifierEntry, ReadRequest},
};

// SIDE EFFECT
// ================================================================================================

/// One entry of the transaction's append-only side-effect log.
#[derive(Clone, Debug)]
pub enum SideEffect {
    NoteInserted(PendingNote),
    NoteRead(ReadRequest),
    NullifierEmitted(NullifierEntry),
}

impl SideEffect {
    /// Returns the transaction-wide sequence at which this effect was emitted.
    pub fn sequence(&self) -> u32 {
        match self {
            Self::NoteInserted(note) => note.sequence(),
            Self::NoteRead(request) => request.sequence(),
            Self::NullifierEmitted(entry) => entry.sequence(),
        }
    }
}

// PENDING COMMITMENT STORE
// ================================================================================================

/// Transaction-scoped store of notes inserted, read, and nullified during a simulation but not
/// yet committed on-chain.
///
/// The store is an append-only log of [SideEffect] entries plus derived indices by
/// `(contract, slot)` and by commitment. Each appended entry is stamped with the next
/// transaction-wide sequence number (its log position). Entries are never deleted during a
/// simulation; a nullified note stays in the log under a marker so that later reads can detect
/// double-spend attempts.
///
/// Because frame execution is synchronous and depth-first, every entry already in the log was
/// emitted at an earlier sequence than any read being resolved now. The pending-note visibility
/// rule (a note inserted at sequence `i` is resolvable by reads at sequence `j >= i` within the
/// same transaction, and by nothing else) therefore reduces to: reads see exactly the
/// non-nullified notes currently in the log.
///
/// The store is created at transaction-simulation start and discarded at simulation end; durable
/// commitment happens only after the kernel circuit accepts the transaction, outside this core.
pub struct PendingCommitmentStore {
    log: Vec<SideEffect>,
    by_slot: BTreeMap<(Address, StorageSlot), Vec<usize>>,
    by_commitment: BTreeMap<NoteCommitment, usize>,
    nullified: BTreeMap<NoteCommitment, u32>,
    next_nonce: u64,
}

impl PendingCommitmentStore {
    // CONSTRUCTOR
    // --------------------------------------------------------------------------------------------

    /// Returns a new, empty [PendingCommitmentStore].
    pub fn new() -> Self {
        Self {
            log: Vec::new(),
            by_slot: BTreeMap::new(),
            by_commitment: BTreeMap::new(),
            nullified: BTreeMap::new(),
            next_nonce: 0,
        }
    }

    // STATE ACCESSORS
    // --------------------------------------------------------------------------------------------

    /// Returns the sequence the next appended side effect will receive.
    pub fn next_sequence(&self) -> u32 {
        self.log.len() as u32
    }

    /// Returns the full side-effect log in emission order.
    pub fn log(&self) -> &[SideEffect] {
        &self.log
    }

    /// Returns the log entry at the specified position.
    pub fn entry(&self, index: usize) -> Option<&SideEffect> {
        self.log.get(index)
    }

    /// Returns the pending, non-nullified notes stored under the specified contract and slot, in
    /// insertion order.
    pub fn visible_notes(&self, contract: Address, slot: StorageSlot) -> Vec<&PendingNote> {
        let Some(indices) = self.by_slot.get(&(contract, slot)) else {
            return Vec::new();
        };

        indices
            .iter()
            .filter_map(|&index| match &self.log[index] {
                SideEffect::NoteInserted(note) if !self.is_nullified(note.commitment()) => {
                    Some(note)
                },
                _ => None,
            })
            .collect()
    }

    /// Returns the pending note with the specified commitment, if any.
    pub fn get_by_commitment(&self, commitment: NoteCommitment) -> Option<&PendingNote> {
        let index = *self.by_commitment.get(&commitment)?;
        match &self.log[index] {
            SideEffect::NoteInserted(note) => Some(note),
            _ => None,
        }
    }

    /// Returns true if a nullifier for the specified commitment was emitted within this
    /// transaction.
    pub fn is_nullified(&self, commitment: NoteCommitment) -> bool {
        self.nullified.contains_key(&commitment)
    }

    // STATE MUTATORS
    // --------------------------------------------------------------------------------------------

    /// Builds a note from the provided parts, assigns it a fresh nonce and the next sequence,
    /// and appends it to the log.
    ///
    /// # Errors
    /// Returns an error if the note fields are malformed; insertion itself always succeeds.
    pub fn insert(
        &mut self,
        frame: u32,
        contract: Address,
        slot: StorageSlot,
        fields: Vec<Felt>,
        randomizer: Felt,
    ) -> Result<PendingNote, NoteError> {
        let nonce = Felt::new(self.next_nonce);
        let note = Note::new(contract, slot, fields, randomizer, nonce)?;
        self.next_nonce += 1;

        let index = self.log.len();
        let pending = PendingNote::new(note, index as u32, frame);

        self.by_slot.entry((contract, slot)).or_default().push(index);
        self.by_commitment.insert(pending.commitment(), index);
        self.log.push(SideEffect::NoteInserted(pending.clone()));

        Ok(pending)
    }

    /// Appends a read of the specified note to the log and returns the recorded request.
    pub fn record_read(&mut self, request: ReadRequest) -> ReadRequest {
        debug_assert_eq!(request.sequence(), self.next_sequence());
        self.log.push(SideEffect::NoteRead(request.clone()));
        request
    }

    /// Computes the nullifier of the provided note from the provided secret and appends it to
    /// the log.
    ///
    /// Returns `None` if a nullifier for the note's commitment was already emitted within this
    /// transaction; the note stays in the log either way.
    pub fn nullify(&mut self, note: &Note, secret: Word) -> Option<NullifierEntry> {
        let commitment = note.commitment();
        if self.is_nullified(commitment) {
            return None;
        }

        let sequence = self.next_sequence();
        let entry = NullifierEntry::new(note.nullifier(secret), commitment, sequence);

        self.nullified.insert(commitment, sequence);
        self.log.push(SideEffect::NullifierEmitted(entry.clone()));

        Some(entry)
    }
}

impl Default for PendingCommitmentStore {
    fn default() -> Self {
        Self::new()
    }
}

// TESTS
// ================================================================================================

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use veil_objects::{Address, Felt, StorageSlot, ZERO};

    use super::PendingCommitmentStore;

    const CONTRACT: Address = Address::new(Felt::new(7));
    const SLOT: StorageSlot = StorageSlot::new(Felt::new(1));

    fn insert_note(store: &mut PendingCommitmentStore, amount: u64) -> super::PendingNote {
        store
            .insert(0, CONTRACT, SLOT, vec![Felt::new(amount)], Felt::new(amount + 100))
            .unwrap()
    }

    #[test]
    fn nonces_and_sequences_are_monotonic() {
        let mut store = PendingCommitmentStore::new();

        let first = insert_note(&mut store, 1);
        let second = insert_note(&mut store, 2);

        assert_eq!(first.note().nonce(), ZERO);
        assert_eq!(second.note().nonce(), Felt::new(1));
        assert_eq!(first.sequence(), 0);
        assert_eq!(second.sequence(), 1);
    }

    #[test]
    fn visible_notes_exclude_nullified_but_keep_the_log_entry() {
        let mut store = PendingCommitmentStore::new();

        let first = insert_note(&mut store, 1);
        let second = insert_note(&mut store, 2);

        store.nullify(first.note(), [ZERO; 4]).unwrap();

        let visible: Vec<_> = store.visible_notes(CONTRACT, SLOT);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].commitment(), second.commitment());

        // nullification is a marker, not a removal
        assert_eq!(store.log().len(), 3);
        assert!(store.is_nullified(first.commitment()));
    }

    #[test]
    fn double_nullification_is_rejected() {
        let mut store = PendingCommitmentStore::new();
        let note = insert_note(&mut store, 1);

        assert!(store.nullify(note.note(), [ZERO; 4]).is_some());
        assert!(store.nullify(note.note(), [ZERO; 4]).is_none());
    }

    #[test]
    fn visibility_is_scoped_to_contract_and_slot() {
        let mut store = PendingCommitmentStore::new();
        insert_note(&mut store, 1);

        assert!(store.visible_notes(Address::new(Felt::new(8)), SLOT).is_empty());
        assert!(store.visible_notes(CONTRACT, StorageSlot::new(Felt::new(2))).is_empty());
    }
}

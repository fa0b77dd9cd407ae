use alloc::vec::Vec;

use crate::{
    Address, Felt, MAX_NOTE_FIELDS, NoteError, StorageSlot, Word,
    utils::serde::{ByteReader, ByteWriter, Deserializable, DeserializationError, Serializable},
};

mod commitment;
pub use commitment::NoteCommitment;

mod nullifier;
pub use nullifier::Nullifier;

mod pending;
pub use pending::PendingNote;

// NOTE
// ================================================================================================

/// A private state record owned by an address.
///
/// A note consists of an application-defined tuple of field elements plus protocol-assigned
/// fields: the owning contract address, the storage slot under which the note is indexed, a
/// uniquely-generated randomizer, and a monotonically increasing nonce.
///
/// The identity of a note is its siloed commitment, a hash binding the note contents to the
/// contract and slot that created it. The commitment is computed once at construction and is
/// immutable thereafter; see [NoteCommitment] for the exact derivation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Note {
    contract: Address,
    slot: StorageSlot,
    fields: Vec<Felt>,
    randomizer: Felt,
    nonce: Felt,

    commitment: NoteCommitment,
}

impl Note {
    // CONSTRUCTOR
    // --------------------------------------------------------------------------------------------

    /// Returns a new [Note] created with the specified parameters.
    ///
    /// # Errors
    /// Returns an error if the application-defined field tuple is empty or exceeds
    /// [MAX_NOTE_FIELDS] elements.
    pub fn new(
        contract: Address,
        slot: StorageSlot,
        fields: Vec<Felt>,
        randomizer: Felt,
        nonce: Felt,
    ) -> Result<Self, NoteError> {
        if fields.is_empty() {
            return Err(NoteError::EmptyFields);
        }
        if fields.len() > MAX_NOTE_FIELDS {
            return Err(NoteError::TooManyFields { actual: fields.len() });
        }

        let commitment = NoteCommitment::compute(contract, slot, &fields, randomizer, nonce);

        Ok(Self { contract, slot, fields, randomizer, nonce, commitment })
    }

    // PUBLIC ACCESSORS
    // --------------------------------------------------------------------------------------------

    /// Returns the address of the contract which owns this note.
    pub fn contract(&self) -> Address {
        self.contract
    }

    /// Returns the storage slot under which this note is indexed.
    pub fn slot(&self) -> StorageSlot {
        self.slot
    }

    /// Returns the application-defined fields of this note.
    pub fn fields(&self) -> &[Felt] {
        &self.fields
    }

    /// Returns the randomizer assigned to this note at creation.
    pub fn randomizer(&self) -> Felt {
        self.randomizer
    }

    /// Returns the nonce assigned to this note at creation.
    pub fn nonce(&self) -> Felt {
        self.nonce
    }

    /// Returns the siloed commitment which identifies this note.
    pub fn commitment(&self) -> NoteCommitment {
        self.commitment
    }

    /// Returns the nullifier which marks this note as consumed.
    ///
    /// The nullifier is derived from the note's commitment and the provided secret; see
    /// [Nullifier] for details.
    pub fn nullifier(&self, secret: Word) -> Nullifier {
        Nullifier::new(self.commitment, secret)
    }
}

// SERIALIZATION
// ================================================================================================

impl Serializable for Note {
    fn write_into<W: ByteWriter>(&self, target: &mut W) {
        let Self {
            contract,
            slot,
            fields,
            randomizer,
            nonce,

            // the commitment is not serialized as it can be recomputed from the rest of the data
            commitment: _,
        } = self;

        contract.write_into(target);
        slot.write_into(target);
        fields.write_into(target);
        randomizer.write_into(target);
        nonce.write_into(target);
    }
}

impl Deserializable for Note {
    fn read_from<R: ByteReader>(source: &mut R) -> Result<Self, DeserializationError> {
        let contract = Address::read_from(source)?;
        let slot = StorageSlot::read_from(source)?;
        let fields = Vec::<Felt>::read_from(source)?;
        let randomizer = Felt::read_from(source)?;
        let nonce = Felt::read_from(source)?;

        Note::new(contract, slot, fields, randomizer, nonce)
            .map_err(|err| DeserializationError::InvalidValue(format!("{err}")))
    }
}

// TESTS
// ================================================================================================

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use assert_matches::assert_matches;

    use super::{Note, NoteError};
    use crate::{Address, Felt, MAX_NOTE_FIELDS, ONE, StorageSlot, ZERO, utils::serde::{Deserializable, Serializable}};

    fn sample_note() -> Note {
        Note::new(
            Address::from(7u64),
            StorageSlot::from(1u64),
            vec![Felt::new(65), Felt::new(11), Felt::new(12), ONE],
            Felt::new(42),
            ZERO,
        )
        .unwrap()
    }

    #[test]
    fn commitment_is_deterministic() {
        assert_eq!(sample_note().commitment(), sample_note().commitment());
    }

    #[test]
    fn commitment_silos_contract_and_slot() {
        let note = sample_note();
        let other_contract = Note::new(
            Address::from(8u64),
            note.slot(),
            note.fields().to_vec(),
            note.randomizer(),
            note.nonce(),
        )
        .unwrap();
        let other_slot = Note::new(
            note.contract(),
            StorageSlot::from(2u64),
            note.fields().to_vec(),
            note.randomizer(),
            note.nonce(),
        )
        .unwrap();

        assert_ne!(note.commitment(), other_contract.commitment());
        assert_ne!(note.commitment(), other_slot.commitment());
    }

    #[test]
    fn field_bounds_are_enforced() {
        let err = Note::new(
            Address::from(1u64),
            StorageSlot::from(1u64),
            Vec::new(),
            ZERO,
            ZERO,
        )
        .unwrap_err();
        assert_matches!(err, NoteError::EmptyFields);

        let err = Note::new(
            Address::from(1u64),
            StorageSlot::from(1u64),
            vec![ZERO; MAX_NOTE_FIELDS + 1],
            ZERO,
            ZERO,
        )
        .unwrap_err();
        assert_matches!(err, NoteError::TooManyFields { actual } if actual == MAX_NOTE_FIELDS + 1);
    }

    #[test]
    fn serialization_round_trip() {
        let note = sample_note();
        let bytes = note.to_bytes();
        let restored = Note::read_from_bytes(&bytes).unwrap();

        assert_eq!(note, restored);
        assert_eq!(note.commitment(), restored.commitment());
    }
}

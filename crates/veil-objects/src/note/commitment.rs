use alloc::{string::String, vec::Vec};
use core::fmt::{Debug, Display, Formatter};

use crate::{
    Address, Digest, Felt, Hasher, StorageSlot, Word,
    utils::{
        HexParseError, hex_to_bytes,
        serde::{ByteReader, ByteWriter, Deserializable, DeserializationError, Serializable},
    },
};

// NOTE COMMITMENT
// ================================================================================================

/// The siloed commitment which uniquely identifies a note.
///
/// The commitment is computed as:
///
/// > hash(hash(contract, slot), hash(fields, randomizer, nonce))
///
/// This achieves the following properties:
/// - Every note reduces to a single unique identity.
/// - Identical note contents created by different contracts (or under different slots) yield
///   distinct commitments, so one contract cannot forge a claim about another contract's state.
/// - The randomizer makes commitments of notes with identical application fields unlinkable.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct NoteCommitment(Digest);

impl NoteCommitment {
    /// Returns a new [NoteCommitment] instantiated from the provided silo and contents digests.
    pub fn new(silo: Digest, contents: Digest) -> Self {
        Self(Hasher::merge(&[silo, contents]))
    }

    /// Computes the siloed commitment of a note from its constituent parts.
    pub fn compute(
        contract: Address,
        slot: StorageSlot,
        fields: &[Felt],
        randomizer: Felt,
        nonce: Felt,
    ) -> Self {
        let mut elements = Vec::with_capacity(fields.len() + 2);
        elements.extend_from_slice(fields);
        elements.push(randomizer);
        elements.push(nonce);

        let contents = Hasher::hash_elements(&elements);
        let silo = Hasher::hash_elements(&[contract.as_felt(), slot.as_felt()]);

        Self::new(silo, contents)
    }

    /// Returns the elements representation of this commitment.
    pub fn as_elements(&self) -> &[Felt] {
        self.0.as_elements()
    }

    /// Returns the byte representation of this commitment.
    pub fn as_bytes(&self) -> [u8; 32] {
        self.0.as_bytes()
    }

    /// Returns the digest defining this commitment.
    pub fn inner(&self) -> Digest {
        self.0
    }

    /// Returns a big-endian, hex-encoded string.
    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }

    /// Attempts to convert from a hexadecimal string to a [NoteCommitment].
    pub fn try_from_hex(hex_value: &str) -> Result<Self, HexParseError> {
        hex_to_bytes(hex_value).and_then(|bytes: [u8; 32]| {
            let digest = Digest::try_from(bytes)?;
            Ok(Self(digest))
        })
    }
}

impl Display for NoteCommitment {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Debug for NoteCommitment {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        Display::fmt(self, f)
    }
}

// CONVERSIONS
// ================================================================================================

impl From<Word> for NoteCommitment {
    fn from(value: Word) -> Self {
        Self(value.into())
    }
}

impl From<Digest> for NoteCommitment {
    fn from(value: Digest) -> Self {
        Self(value)
    }
}

impl From<NoteCommitment> for Digest {
    fn from(commitment: NoteCommitment) -> Self {
        commitment.0
    }
}

impl From<NoteCommitment> for Word {
    fn from(commitment: NoteCommitment) -> Self {
        commitment.0.into()
    }
}

impl From<NoteCommitment> for [u8; 32] {
    fn from(commitment: NoteCommitment) -> Self {
        commitment.0.into()
    }
}

// SERIALIZATION
// ================================================================================================

impl Serializable for NoteCommitment {
    fn write_into<W: ByteWriter>(&self, target: &mut W) {
        target.write_bytes(&self.0.to_bytes());
    }
}

impl Deserializable for NoteCommitment {
    fn read_from<R: ByteReader>(source: &mut R) -> Result<Self, DeserializationError> {
        let commitment = Digest::read_from(source)?;
        Ok(Self(commitment))
    }
}

// TESTS
// ================================================================================================

#[cfg(test)]
mod tests {
    use super::NoteCommitment;
    use crate::{Address, Felt, StorageSlot, ZERO};

    #[test]
    fn hex_round_trip() {
        let commitment = NoteCommitment::compute(
            Address::from(3u64),
            StorageSlot::from(1u64),
            &[Felt::new(65)],
            Felt::new(7),
            ZERO,
        );

        let restored = NoteCommitment::try_from_hex(&commitment.to_hex()).unwrap();
        assert_eq!(commitment, restored);
    }

    #[test]
    fn randomizer_makes_commitments_unlinkable() {
        let a = NoteCommitment::compute(
            Address::from(3u64),
            StorageSlot::from(1u64),
            &[Felt::new(65)],
            Felt::new(7),
            ZERO,
        );
        let b = NoteCommitment::compute(
            Address::from(3u64),
            StorageSlot::from(1u64),
            &[Felt::new(65)],
            Felt::new(8),
            ZERO,
        );

        assert_ne!(a, b);
    }
}

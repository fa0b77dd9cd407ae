use crate::{
    Digest,
    utils::serde::{ByteReader, ByteWriter, Deserializable, DeserializationError, Serializable},
};

// HISTORIC TREE ROOTS
// ================================================================================================

/// An immutable snapshot of the committed-state tree roots as of the start of a transaction.
///
/// All oracle reads during a transaction's simulation are implicitly relative to this snapshot,
/// guaranteeing the transaction never observes state that changed after it began. The snapshot
/// is fetched once per simulation and never mutates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HistoricTreeRoots {
    note_tree: Digest,
    nullifier_tree: Digest,
    contract_tree: Digest,
}

impl HistoricTreeRoots {
    /// Returns a new [HistoricTreeRoots] with the specified roots.
    pub fn new(note_tree: Digest, nullifier_tree: Digest, contract_tree: Digest) -> Self {
        Self { note_tree, nullifier_tree, contract_tree }
    }

    /// Returns a snapshot in which all roots are the empty digest.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the root of the committed note tree.
    pub fn note_tree(&self) -> Digest {
        self.note_tree
    }

    /// Returns the root of the committed nullifier tree.
    pub fn nullifier_tree(&self) -> Digest {
        self.nullifier_tree
    }

    /// Returns the root of the committed contract tree.
    pub fn contract_tree(&self) -> Digest {
        self.contract_tree
    }
}

// SERIALIZATION
// ================================================================================================

impl Serializable for HistoricTreeRoots {
    fn write_into<W: ByteWriter>(&self, target: &mut W) {
        self.note_tree.write_into(target);
        self.nullifier_tree.write_into(target);
        self.contract_tree.write_into(target);
    }
}

impl Deserializable for HistoricTreeRoots {
    fn read_from<R: ByteReader>(source: &mut R) -> Result<Self, DeserializationError> {
        let note_tree = Digest::read_from(source)?;
        let nullifier_tree = Digest::read_from(source)?;
        let contract_tree = Digest::read_from(source)?;
        Ok(Self { note_tree, nullifier_tree, contract_tree })
    }
}

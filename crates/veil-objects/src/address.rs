use core::{
    cmp::Ordering,
    fmt::{Debug, Display, Formatter},
};

use crate::{
    Felt,
    utils::serde::{ByteReader, ByteWriter, Deserializable, DeserializationError, Serializable},
};

// ADDRESS
// ================================================================================================

/// The address of a contract or a user within the protocol.
///
/// Addresses are single field elements. They identify the owner of a note as well as the target
/// of an execution request, and they participate in note commitment siloing so that two contracts
/// cannot produce colliding commitments for identical note contents.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Address(Felt);

impl Address {
    /// Address consisting of the zero element; used as a synthetic "from" address when an
    /// unauthenticated context is required.
    pub const ZERO: Self = Self(Felt::new(0));

    /// Returns a new [Address] instantiated from the provided field element.
    pub const fn new(value: Felt) -> Self {
        Self(value)
    }

    /// Returns the field element underlying this address.
    pub const fn as_felt(&self) -> Felt {
        self.0
    }

    /// Returns a pseudo-random address drawn from the provided random coin.
    #[cfg(any(feature = "testing", test))]
    pub fn random<R: miden_crypto::rand::FeltRng>(rng: &mut R) -> Self {
        Self(rng.draw_element())
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "0x{:016x}", self.0.as_int())
    }
}

impl Debug for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        Display::fmt(self, f)
    }
}

impl Ord for Address {
    // Felt itself is unordered; addresses order by their canonical integer value
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.as_int().cmp(&other.0.as_int())
    }
}

impl PartialOrd for Address {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<Felt> for Address {
    fn from(value: Felt) -> Self {
        Self(value)
    }
}

impl From<u64> for Address {
    fn from(value: u64) -> Self {
        Self(Felt::new(value))
    }
}

impl From<Address> for Felt {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl Serializable for Address {
    fn write_into<W: ByteWriter>(&self, target: &mut W) {
        self.0.write_into(target);
    }
}

impl Deserializable for Address {
    fn read_from<R: ByteReader>(source: &mut R) -> Result<Self, DeserializationError> {
        Ok(Self(Felt::read_from(source)?))
    }
}

// STORAGE SLOT
// ================================================================================================

/// Identifies one logical storage slot of a contract.
///
/// Notes are indexed by `(contract, slot)` pairs; a slot typically corresponds to one private
/// state variable of the contract (e.g. a balance set).
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct StorageSlot(Felt);

impl StorageSlot {
    /// Returns a new [StorageSlot] instantiated from the provided field element.
    pub const fn new(value: Felt) -> Self {
        Self(value)
    }

    /// Returns the field element underlying this storage slot.
    pub const fn as_felt(&self) -> Felt {
        self.0
    }
}

impl Display for StorageSlot {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0.as_int())
    }
}

impl Debug for StorageSlot {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        Display::fmt(self, f)
    }
}

impl Ord for StorageSlot {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.as_int().cmp(&other.0.as_int())
    }
}

impl PartialOrd for StorageSlot {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<u64> for StorageSlot {
    fn from(value: u64) -> Self {
        Self(Felt::new(value))
    }
}

impl Serializable for StorageSlot {
    fn write_into<W: ByteWriter>(&self, target: &mut W) {
        self.0.write_into(target);
    }
}

impl Deserializable for StorageSlot {
    fn read_from<R: ByteReader>(source: &mut R) -> Result<Self, DeserializationError> {
        Ok(Self(Felt::read_from(source)?))
    }
}

// TESTS
// ================================================================================================

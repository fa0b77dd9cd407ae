#![no_std]

#[macro_use]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod abi;
pub mod note;
pub mod transaction;

mod address;
pub use address::{Address, StorageSlot};

mod constants;
pub use constants::*;

mod errors;
pub use errors::{AbiError, NoteError};

// RE-EXPORTS
// ================================================================================================

pub use miden_crypto::{
    EMPTY_WORD, Felt, FieldElement, ONE, StarkField, WORD_SIZE, Word, ZERO,
    hash::rpo::{Rpo256 as Hasher, RpoDigest as Digest},
};

pub mod crypto {
    pub use miden_crypto::{merkle, rand};
}

pub mod utils {
    pub use miden_crypto::utils::{HexParseError, bytes_to_hex_string, hex_to_bytes};

    pub mod serde {
        pub use miden_crypto::utils::{
            ByteReader, ByteWriter, Deserializable, DeserializationError, Serializable,
        };
    }
}

//! A private token contract fixture built on value notes.
//!
//! Each note stores `[amount, owner_x, owner_y, kind]` under [BALANCE_SLOT]; an owner's balance
//! is the sum of the amounts of their notes. The fixture registers one function per behavior the
//! engine needs to be exercised against: happy-path mint/read/spend flows as well as bodies that
//! deliberately trip the engine's mode, static-call, and depth checks.

use alloc::vec::Vec;

use veil_objects::{
    Address, Felt, ONE, StorageSlot, Word,
    abi::{AbiParameter, AbiType, FunctionAbi, FunctionSelector},
    note::Note,
};

use super::TestContractStore;
use crate::executor::{ContractFunction, FunctionKind};

// CONSTANTS
// ================================================================================================

/// The slot under which the fixture keeps its value notes.
pub const BALANCE_SLOT: StorageSlot = StorageSlot::new(Felt::new(1));

/// The note-kind discriminator stored in the last field of every value note.
pub const NOTE_KIND: Felt = ONE;

/// The nullifier secret all fixture spends use.
pub const NULLIFIER_SECRET: Word = [Felt::new(5), Felt::new(6), Felt::new(7), Felt::new(8)];

// NOTE HELPERS
// ================================================================================================

/// Returns the field tuple of a value note: `[amount, owner_x, owner_y, kind]`.
pub fn note_fields(amount: u64, owner: (Felt, Felt)) -> Vec<Felt> {
    vec![Felt::new(amount), owner.0, owner.1, NOTE_KIND]
}

/// Returns a committed value note, for seeding a mock oracle.
pub fn committed_note(
    contract: Address,
    amount: u64,
    owner: (Felt, Felt),
    randomizer: u64,
    nonce: u64,
) -> Note {
    Note::new(
        contract,
        BALANCE_SLOT,
        note_fields(amount, owner),
        Felt::new(randomizer),
        Felt::new(nonce),
    )
    .expect("value note layout is within bounds")
}

fn amount_of(note: &Note) -> u64 {
    note.fields()[0].as_int()
}

fn owned_by(note: &Note, owner: (Felt, Felt)) -> bool {
    note.fields()[1] == owner.0 && note.fields()[2] == owner.1
}

// CONTRACT REGISTRATION
// ================================================================================================

/// Registers every fixture function under the specified contract address.
pub fn register(store: &mut TestContractStore, contract: Address) {
    store.register(contract, get_balance());
    store.register(contract, create_note());
    store.register(contract, get_and_check_note());
    store.register(contract, create_then_read());
    store.register(contract, create_then_read_nested());
    store.register(contract, spend());
    store.register(contract, double_spend());
    store.register(contract, spend_then_read());
    store.register(contract, balance_via_call());
    store.register(contract, mint_in_view());
    store.register(contract, mint_via_static_call());
    store.register(contract, recurse_forever());
}

/// Returns a [TestContractStore] with the fixture deployed at the specified address.
pub fn deploy(contract: Address) -> TestContractStore {
    let mut store = TestContractStore::new();
    register(&mut store, contract);
    store
}

// FIXTURE FUNCTIONS
// ================================================================================================

/// `getBalance(owner: Point) -> Field`, unconstrained: sums the amounts of the owner's visible
/// value notes.
pub fn get_balance() -> ContractFunction {
    let abi = FunctionAbi::new(
        "getBalance",
        vec![AbiParameter::new("owner", AbiType::Point)],
        vec![AbiType::Field],
    );
    ContractFunction::new(abi, FunctionKind::Unconstrained, |cx| {
        let owner = (cx.args()[0], cx.args()[1]);
        let notes = cx.get_notes(BALANCE_SLOT)?;
        let balance: u64 =
            notes.iter().filter(|note| owned_by(note, owner)).map(amount_of).sum();
        Ok(vec![Felt::new(balance)])
    })
}

/// `createNote(amount: Field, owner: Point)`, private: mints one value note.
pub fn create_note() -> ContractFunction {
    let abi = FunctionAbi::new(
        "createNote",
        vec![
            AbiParameter::new("amount", AbiType::Field),
            AbiParameter::new("owner", AbiType::Point),
        ],
        vec![],
    );
    ContractFunction::new(abi, FunctionKind::Private, |cx| {
        let fields = vec![cx.args()[0], cx.args()[1], cx.args()[2], NOTE_KIND];
        cx.insert_note(BALANCE_SLOT, fields)?;
        Ok(Vec::new())
    })
}

/// `getAndCheckNote(amount: Field) -> Field`, private: reads the one value note with the
/// specified amount and returns its amount.
pub fn get_and_check_note() -> ContractFunction {
    let abi = FunctionAbi::new(
        "getAndCheckNote",
        vec![AbiParameter::new("amount", AbiType::Field)],
        vec![AbiType::Field],
    );
    ContractFunction::new(abi, FunctionKind::Private, |cx| {
        let amount = cx.args()[0];
        let note = cx.read_note(BALANCE_SLOT, |note| note.fields()[0] == amount)?;
        Ok(vec![note.fields()[0]])
    })
}

/// `createThenRead(amount: Field, owner: Point) -> Field`, private: mints a value note and reads
/// it back within the same frame.
pub fn create_then_read() -> ContractFunction {
    let abi = FunctionAbi::new(
        "createThenRead",
        vec![
            AbiParameter::new("amount", AbiType::Field),
            AbiParameter::new("owner", AbiType::Point),
        ],
        vec![AbiType::Field],
    );
    ContractFunction::new(abi, FunctionKind::Private, |cx| {
        let amount = cx.args()[0];
        let fields = vec![amount, cx.args()[1], cx.args()[2], NOTE_KIND];
        cx.insert_note(BALANCE_SLOT, fields)?;
        let note = cx.read_note(BALANCE_SLOT, |note| note.fields()[0] == amount)?;
        Ok(vec![note.fields()[0]])
    })
}

/// `createThenReadNested(amount: Field, owner: Point) -> Field`, private: mints via a nested call
/// to `createNote` and reads back via a nested call to `getAndCheckNote`, so the insertion and
/// the read live in sibling frames.
pub fn create_then_read_nested() -> ContractFunction {
    let abi = FunctionAbi::new(
        "createThenReadNested",
        vec![
            AbiParameter::new("amount", AbiType::Field),
            AbiParameter::new("owner", AbiType::Point),
        ],
        vec![AbiType::Field],
    );
    ContractFunction::new(abi, FunctionKind::Private, |cx| {
        let this = cx.contract_address();
        let amount = cx.args()[0];
        let args = cx.args().to_vec();

        cx.call(this, FunctionSelector::from_name("createNote"), args)?;
        cx.call(this, FunctionSelector::from_name("getAndCheckNote"), vec![amount])
    })
}

/// `spend(amount: Field)`, private: reads the one value note with the specified amount and
/// nullifies it.
pub fn spend() -> ContractFunction {
    let abi = FunctionAbi::new(
        "spend",
        vec![AbiParameter::new("amount", AbiType::Field)],
        vec![],
    );
    ContractFunction::new(abi, FunctionKind::Private, |cx| {
        let amount = cx.args()[0];
        let note = cx.read_note(BALANCE_SLOT, |note| note.fields()[0] == amount)?;
        cx.nullify_note(&note, NULLIFIER_SECRET)?;
        Ok(Vec::new())
    })
}

/// `doubleSpend(amount: Field)`, private: nullifies the same note twice; the second
/// nullification must fail.
pub fn double_spend() -> ContractFunction {
    let abi = FunctionAbi::new(
        "doubleSpend",
        vec![AbiParameter::new("amount", AbiType::Field)],
        vec![],
    );
    ContractFunction::new(abi, FunctionKind::Private, |cx| {
        let amount = cx.args()[0];
        let note = cx.read_note(BALANCE_SLOT, |note| note.fields()[0] == amount)?;
        cx.nullify_note(&note, NULLIFIER_SECRET)?;
        cx.nullify_note(&note, NULLIFIER_SECRET)?;
        Ok(Vec::new())
    })
}

/// `spendThenRead(amount: Field)`, private: nullifies the one value note with the specified
/// amount, then attempts to read it again; the second read must not see the consumed note.
pub fn spend_then_read() -> ContractFunction {
    let abi = FunctionAbi::new(
        "spendThenRead",
        vec![AbiParameter::new("amount", AbiType::Field)],
        vec![],
    );
    ContractFunction::new(abi, FunctionKind::Private, |cx| {
        let amount = cx.args()[0];
        let note = cx.read_note(BALANCE_SLOT, |note| note.fields()[0] == amount)?;
        cx.nullify_note(&note, NULLIFIER_SECRET)?;
        cx.read_note(BALANCE_SLOT, |note| note.fields()[0] == amount)?;
        Ok(Vec::new())
    })
}

/// `balanceViaCall(owner: Point) -> Field`, unconstrained: attempts to resolve the balance
/// through a nested call; the engine must reject the call.
pub fn balance_via_call() -> ContractFunction {
    let abi = FunctionAbi::new(
        "balanceViaCall",
        vec![AbiParameter::new("owner", AbiType::Point)],
        vec![AbiType::Field],
    );
    ContractFunction::new(abi, FunctionKind::Unconstrained, |cx| {
        let this = cx.contract_address();
        let args = cx.args().to_vec();
        cx.call(this, FunctionSelector::from_name("getBalance"), args)
    })
}

/// `mintInView(amount: Field, owner: Point)`, unconstrained: attempts to mint from a view
/// function; the engine must reject the insertion.
pub fn mint_in_view() -> ContractFunction {
    let abi = FunctionAbi::new(
        "mintInView",
        vec![
            AbiParameter::new("amount", AbiType::Field),
            AbiParameter::new("owner", AbiType::Point),
        ],
        vec![],
    );
    ContractFunction::new(abi, FunctionKind::Unconstrained, |cx| {
        let fields = vec![cx.args()[0], cx.args()[1], cx.args()[2], NOTE_KIND];
        cx.insert_note(BALANCE_SLOT, fields)?;
        Ok(Vec::new())
    })
}

/// `mintViaStaticCall(amount: Field, owner: Point)`, private: invokes `createNote` through a
/// static call; the callee's insertion must be rejected.
pub fn mint_via_static_call() -> ContractFunction {
    let abi = FunctionAbi::new(
        "mintViaStaticCall",
        vec![
            AbiParameter::new("amount", AbiType::Field),
            AbiParameter::new("owner", AbiType::Point),
        ],
        vec![],
    );
    ContractFunction::new(abi, FunctionKind::Private, |cx| {
        let this = cx.contract_address();
        let args = cx.args().to_vec();
        cx.static_call(this, FunctionSelector::from_name("createNote"), args)?;
        Ok(Vec::new())
    })
}

/// `recurseForever()`, private: calls itself unconditionally, so execution must be stopped by
/// the call-depth limit.
pub fn recurse_forever() -> ContractFunction {
    let abi = FunctionAbi::new("recurseForever", vec![], vec![]);
    ContractFunction::new(abi, FunctionKind::Private, |cx| {
        let this = cx.contract_address();
        cx.call(this, FunctionSelector::from_name("recurseForever"), Vec::new())?;
        Ok(Vec::new())
    })
}

use anyhow::Result;
use assert_matches::assert_matches;
use veil_objects::{
    Felt,
    transaction::{NullifierEntry, ReadOrigin, ReadRequest},
};
use veil_simulator::{KernelError, TransactionEffects, kernel, testing::token};

use crate::{OWNER, TOKEN, mint_args, private_request, setup};

#[test]
fn matcher_accepts_transient_reads_across_frames() -> Result<()> {
    let (oracle, mut simulator) = setup(Vec::new());

    // the insertion and the read happen in sibling frames; the flat effect set must still match
    let request = private_request("createThenReadNested", mint_args(65, OWNER));
    let result = simulator.execute_transaction(&request)?;
    let effects = TransactionEffects::assemble(&result);

    kernel::match_side_effects(&effects, &oracle.roots(), oracle.as_ref())?;
    Ok(())
}

#[test]
fn matcher_accepts_witnessed_reads_and_spends() -> Result<()> {
    let note = token::committed_note(TOKEN, 65, OWNER, 7, 0);
    let (oracle, mut simulator) = setup(vec![note]);

    let request = private_request("spend", vec![Felt::new(65)]);
    let result = simulator.execute_transaction(&request)?;
    let effects = TransactionEffects::assemble(&result);

    kernel::match_side_effects(&effects, &oracle.roots(), oracle.as_ref())?;
    Ok(())
}

#[test]
fn tampered_insert_sequence_is_rejected() -> Result<()> {
    let (oracle, mut simulator) = setup(Vec::new());

    let request = private_request("createThenRead", mint_args(65, OWNER));
    let result = simulator.execute_transaction(&request)?;
    let effects = TransactionEffects::assemble(&result);

    let tampered: Vec<ReadRequest> = effects
        .read_requests()
        .iter()
        .map(|read| {
            ReadRequest::new(
                read.commitment(),
                read.contract(),
                read.slot(),
                read.sequence(),
                ReadOrigin::Pending { insert_sequence: 9 },
            )
        })
        .collect();
    let effects = TransactionEffects::new(
        tampered,
        effects.new_notes().to_vec(),
        effects.nullifiers().to_vec(),
    );

    let err = kernel::match_side_effects(&effects, &oracle.roots(), oracle.as_ref()).unwrap_err();
    assert_matches!(err, KernelError::ReadRequestMismatch { .. });
    Ok(())
}

#[test]
fn reads_preceding_their_insertion_are_rejected() -> Result<()> {
    let (oracle, mut simulator) = setup(Vec::new());

    let request = private_request("createThenRead", mint_args(65, OWNER));
    let result = simulator.execute_transaction(&request)?;
    let effects = TransactionEffects::assemble(&result);

    // claim the read happened at the insertion's own sequence
    let tampered: Vec<ReadRequest> = effects
        .read_requests()
        .iter()
        .map(|read| {
            let insert_sequence = match read.origin() {
                ReadOrigin::Pending { insert_sequence } => insert_sequence,
                origin => panic!("expected a transient read, got {origin:?}"),
            };
            ReadRequest::new(
                read.commitment(),
                read.contract(),
                read.slot(),
                insert_sequence,
                read.origin(),
            )
        })
        .collect();
    let effects = TransactionEffects::new(
        tampered,
        effects.new_notes().to_vec(),
        effects.nullifiers().to_vec(),
    );

    let err = kernel::match_side_effects(&effects, &oracle.roots(), oracle.as_ref()).unwrap_err();
    assert_matches!(err, KernelError::ReadRequestMismatch { .. });
    Ok(())
}

#[test]
fn wrong_tree_index_fails_the_membership_check() -> Result<()> {
    let notes = vec![
        token::committed_note(TOKEN, 65, OWNER, 7, 0),
        token::committed_note(TOKEN, 66, OWNER, 8, 1),
    ];
    let (oracle, mut simulator) = setup(notes);

    let request = private_request("getAndCheckNote", vec![Felt::new(65)]);
    let result = simulator.execute_transaction(&request)?;
    let effects = TransactionEffects::assemble(&result);

    let tampered: Vec<ReadRequest> = effects
        .read_requests()
        .iter()
        .map(|read| {
            ReadRequest::new(
                read.commitment(),
                read.contract(),
                read.slot(),
                read.sequence(),
                ReadOrigin::Committed { tree_index: 1 },
            )
        })
        .collect();
    let effects = TransactionEffects::new(
        tampered,
        effects.new_notes().to_vec(),
        effects.nullifiers().to_vec(),
    );

    let err = kernel::match_side_effects(&effects, &oracle.roots(), oracle.as_ref()).unwrap_err();
    assert_matches!(err, KernelError::MembershipCheckFailed { tree_index: 1, .. });
    Ok(())
}

#[test]
fn duplicate_nullifiers_are_rejected() {
    let (oracle, _) = setup(Vec::new());

    let note = token::committed_note(TOKEN, 65, OWNER, 7, 0);
    let entry = |sequence| {
        NullifierEntry::new(
            note.nullifier(token::NULLIFIER_SECRET),
            note.commitment(),
            sequence,
        )
    };
    let effects = TransactionEffects::new(Vec::new(), Vec::new(), vec![entry(1), entry(2)]);

    let err = kernel::match_side_effects(&effects, &oracle.roots(), oracle.as_ref()).unwrap_err();
    assert_matches!(err, KernelError::DuplicateNullifier(_));
}

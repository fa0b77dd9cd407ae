use std::sync::Arc;

use anyhow::Result;
use assert_matches::assert_matches;
use veil_objects::{AbiError, Felt, MAX_CALL_DEPTH, ZERO, transaction::ReadOrigin};
use veil_simulator::{
    ContractStoreError, SideEffectKind, SimulationError,
    testing::{MockStateOracle, token},
};

use crate::{OWNER, TOKEN, mint_args, private_request, setup, simulator_for};

#[test]
fn minted_note_is_readable_within_the_same_frame() -> Result<()> {
    let (_, mut simulator) = setup(Vec::new());

    let request = private_request("createThenRead", mint_args(65, OWNER));
    let result = simulator.execute_transaction(&request)?;

    assert_eq!(result.return_values(), &[Felt::new(65)]);

    assert_eq!(result.new_notes().len(), 1);
    let minted = &result.new_notes()[0];
    assert_eq!(minted.note().fields(), token::note_fields(65, OWNER).as_slice());
    assert_eq!(minted.note().nonce(), ZERO, "first note of the transaction gets nonce 0");
    assert_eq!(minted.sequence(), 0);

    assert_eq!(result.read_requests().len(), 1);
    let read = &result.read_requests()[0];
    assert_eq!(read.commitment(), minted.commitment());
    assert_eq!(read.origin(), ReadOrigin::Pending { insert_sequence: minted.sequence() });
    assert!(read.sequence() > minted.sequence(), "the read must follow the insertion");
    Ok(())
}

#[test]
fn minted_note_is_readable_from_a_sibling_frame() -> Result<()> {
    let (_, mut simulator) = setup(Vec::new());

    let request = private_request("createThenReadNested", mint_args(65, OWNER));
    let result = simulator.execute_transaction(&request)?;

    assert_eq!(result.return_values(), &[Felt::new(65)]);
    assert_eq!(result.nested_executions().len(), 2);

    let mint = &result.nested_executions()[0];
    let read = &result.nested_executions()[1];
    assert_eq!(mint.new_notes().len(), 1);
    let inserted = &mint.new_notes()[0];

    assert_eq!(read.read_requests().len(), 1);
    let request = &read.read_requests()[0];
    assert_eq!(request.commitment(), inserted.commitment());
    assert_eq!(request.origin(), ReadOrigin::Pending { insert_sequence: inserted.sequence() });
    Ok(())
}

#[test]
fn committed_note_read_records_a_witnessed_origin() -> Result<()> {
    let note = token::committed_note(TOKEN, 65, OWNER, 7, 0);
    let (_, mut simulator) = setup(vec![note.clone()]);

    let request = private_request("getAndCheckNote", vec![Felt::new(65)]);
    let result = simulator.execute_transaction(&request)?;

    assert_eq!(result.return_values(), &[Felt::new(65)]);
    assert_eq!(result.read_requests().len(), 1);
    let read = &result.read_requests()[0];
    assert_eq!(read.commitment(), note.commitment());
    assert_eq!(read.origin(), ReadOrigin::Committed { tree_index: 0 });
    Ok(())
}

#[test]
fn pending_note_wins_over_a_committed_match() -> Result<()> {
    // a committed note with the same amount exists, but the read must resolve the note minted
    // within the transaction
    let committed = token::committed_note(TOKEN, 65, OWNER, 7, 0);
    let (_, mut simulator) = setup(vec![committed]);

    let request = private_request("createThenRead", mint_args(65, OWNER));
    let result = simulator.execute_transaction(&request)?;

    assert_eq!(result.read_requests().len(), 1);
    let read = &result.read_requests()[0];
    assert!(read.origin().is_pending());
    assert_eq!(read.commitment(), result.new_notes()[0].commitment());
    Ok(())
}

#[test]
fn spending_a_note_emits_its_nullifier() -> Result<()> {
    let note = token::committed_note(TOKEN, 65, OWNER, 7, 0);
    let (_, mut simulator) = setup(vec![note.clone()]);

    let request = private_request("spend", vec![Felt::new(65)]);
    let result = simulator.execute_transaction(&request)?;

    assert_eq!(result.nullifiers().len(), 1);
    let entry = &result.nullifiers()[0];
    assert_eq!(entry.note_commitment(), note.commitment());
    assert_eq!(entry.nullifier(), note.nullifier(token::NULLIFIER_SECRET));
    Ok(())
}

#[test]
fn double_nullification_is_rejected() {
    let note = token::committed_note(TOKEN, 65, OWNER, 7, 0);
    let (_, mut simulator) = setup(vec![note.clone()]);

    let request = private_request("doubleSpend", vec![Felt::new(65)]);
    let err = simulator.execute_transaction(&request).unwrap_err();

    assert_matches!(
        err,
        SimulationError::AlreadyNullified { commitment, .. } if commitment == note.commitment()
    );
}

#[test]
fn spent_note_is_invisible_to_later_reads() {
    let note = token::committed_note(TOKEN, 65, OWNER, 7, 0);
    let (_, mut simulator) = setup(vec![note]);

    let request = private_request("spendThenRead", vec![Felt::new(65)]);
    let err = simulator.execute_transaction(&request).unwrap_err();

    assert_matches!(err, SimulationError::NoteNotFound { contract, .. } if contract == TOKEN);
}

#[test]
fn ambiguous_reads_are_rejected() {
    let notes = vec![
        token::committed_note(TOKEN, 65, OWNER, 7, 0),
        token::committed_note(TOKEN, 65, OWNER, 8, 1),
    ];
    let (_, mut simulator) = setup(notes);

    let request = private_request("getAndCheckNote", vec![Felt::new(65)]);
    let err = simulator.execute_transaction(&request).unwrap_err();

    assert_matches!(err, SimulationError::AmbiguousRead { matches: 2, .. });
}

#[test]
fn static_calls_reject_insertions_in_the_callee() {
    let (_, mut simulator) = setup(Vec::new());

    let request = private_request("mintViaStaticCall", mint_args(65, OWNER));
    let err = simulator.execute_transaction(&request).unwrap_err();

    assert_matches!(
        err,
        SimulationError::InvalidSideEffectInStaticCall {
            kind: SideEffectKind::NoteInsertion,
            ..
        }
    );
}

#[test]
fn runaway_recursion_hits_the_depth_limit() {
    let (_, mut simulator) = setup(Vec::new());

    let request = private_request("recurseForever", Vec::new());
    let err = simulator.execute_transaction(&request).unwrap_err();

    assert_matches!(
        err,
        SimulationError::CallDepthExceeded { depth, .. } if depth == MAX_CALL_DEPTH
    );
}

#[test]
fn oracle_failure_aborts_the_transaction() {
    let mut simulator = simulator_for(Arc::new(MockStateOracle::offline()));

    let request = private_request("getAndCheckNote", vec![Felt::new(65)]);
    let err = simulator.execute_transaction(&request).unwrap_err();

    assert_matches!(err, SimulationError::OracleUnavailable(_));
}

#[test]
fn malformed_argument_widths_are_rejected() {
    let (_, mut simulator) = setup(Vec::new());

    // createThenRead declares a Field plus a Point, three elements in total
    let request = private_request("createThenRead", vec![Felt::new(65)]);
    let err = simulator.execute_transaction(&request).unwrap_err();

    assert_matches!(
        err,
        SimulationError::Abi(AbiError::ArgumentWidthMismatch { expected: 3, actual: 1 })
    );
}

#[test]
fn unknown_functions_fail_resolution() {
    let (_, mut simulator) = setup(Vec::new());

    let request = private_request("nonexistent", Vec::new());
    let err = simulator.execute_transaction(&request).unwrap_err();

    assert_matches!(
        err,
        SimulationError::FunctionResolutionFailed {
            source: ContractStoreError::FunctionNotFound { .. },
            ..
        }
    );
}

#[test]
fn unconstrained_functions_cannot_run_privately() {
    let (_, mut simulator) = setup(Vec::new());

    let request = private_request("getBalance", vec![OWNER.0, OWNER.1]);
    let err = simulator.execute_transaction(&request).unwrap_err();

    assert_matches!(err, SimulationError::FunctionKindMismatch { .. });
}

use anyhow::Result;
use assert_matches::assert_matches;
use veil_objects::{Address, Felt, abi::AbiValue, note::Note};
use veil_simulator::{SideEffectKind, SimulationError, testing::token};

use crate::{OTHER_OWNER, OWNER, TOKEN, owner_args, setup, view_request};

/// Five notes of 1 and two notes of 2 for [OWNER], plus one unrelated note which must not be
/// counted.
fn committed_balances() -> Vec<Note> {
    let mut notes: Vec<Note> =
        (0..5).map(|i| token::committed_note(TOKEN, 1, OWNER, 100 + i, i)).collect();
    notes.push(token::committed_note(TOKEN, 2, OWNER, 200, 5));
    notes.push(token::committed_note(TOKEN, 2, OWNER, 201, 6));
    notes.push(token::committed_note(TOKEN, 50, OTHER_OWNER, 300, 7));
    notes
}

#[test]
fn get_balance_aggregates_owned_notes() -> Result<()> {
    let (oracle, simulator) = setup(committed_balances());

    let request = view_request("getBalance", owner_args(OWNER));
    let values = simulator.run_unconstrained(&request, Address::ZERO, oracle.roots())?;

    assert_eq!(values, vec![AbiValue::Field(Felt::new(9))]);
    Ok(())
}

#[test]
fn get_balance_pages_through_all_committed_notes() -> Result<()> {
    // more notes than one oracle page, so aggregation must traverse every page
    let notes = (0..25).map(|i| token::committed_note(TOKEN, 1, OWNER, 1000 + i, i)).collect();
    let (oracle, simulator) = setup(notes);

    let request = view_request("getBalance", owner_args(OWNER));
    let values = simulator.run_unconstrained(&request, Address::ZERO, oracle.roots())?;

    assert_eq!(values, vec![AbiValue::Field(Felt::new(25))]);
    Ok(())
}

#[test]
fn unconstrained_execution_is_deterministic() -> Result<()> {
    let (oracle, simulator) = setup(committed_balances());
    let request = view_request("getBalance", owner_args(OWNER));

    let first = simulator.run_unconstrained(&request, Address::ZERO, oracle.roots())?;
    let second = simulator.run_unconstrained(&request, Address::ZERO, oracle.roots())?;

    assert_eq!(first, second);
    Ok(())
}

#[test]
fn note_insertion_is_rejected_in_unconstrained_mode() {
    let (oracle, simulator) = setup(Vec::new());

    let mut args = owner_args(OWNER);
    args.insert(0, Felt::new(65));
    let request = view_request("mintInView", args);
    let err = simulator.run_unconstrained(&request, Address::ZERO, oracle.roots()).unwrap_err();

    assert_matches!(
        err,
        SimulationError::InvalidSideEffectInUnconstrainedMode {
            kind: SideEffectKind::NoteInsertion,
            ..
        }
    );
}

#[test]
fn nested_calls_are_rejected_in_unconstrained_mode() {
    let (oracle, simulator) = setup(committed_balances());

    let request = view_request("balanceViaCall", owner_args(OWNER));
    let err = simulator.run_unconstrained(&request, Address::ZERO, oracle.roots()).unwrap_err();

    assert_matches!(
        err,
        SimulationError::InvalidSideEffectInUnconstrainedMode {
            kind: SideEffectKind::NestedCall,
            ..
        }
    );
}

#[test]
fn private_functions_cannot_run_unconstrained() {
    let (oracle, simulator) = setup(Vec::new());

    let request = view_request("createNote", vec![Felt::new(65), OWNER.0, OWNER.1]);
    let err = simulator.run_unconstrained(&request, Address::ZERO, oracle.roots()).unwrap_err();

    assert_matches!(err, SimulationError::FunctionKindMismatch { .. });
}

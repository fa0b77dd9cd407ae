//! Kernel-side reconciliation of assembled side effects.
//!
//! The verifying circuit re-derives the transaction's side-effect set from its own constrained
//! state walk and checks it against the simulator's output. This module performs the same
//! reconciliation natively so the test harness can detect ordering and visibility bugs in the
//! simulator before they become hard verification failures: a read request the kernel cannot
//! match is a semantic mismatch between simulator and circuit, not a user error.

use alloc::collections::{BTreeMap, BTreeSet};

use veil_objects::{note::NoteCommitment, transaction::{HistoricTreeRoots, ReadOrigin}};

use crate::{KernelError, TransactionEffects, oracle::StateOracle};

/// Matches every read request in the assembled side-effect set against the transaction's own
/// insertions (transient reads) or the committed note tree (witnessed reads), and checks
/// nullifier uniqueness.
///
/// A transient read matches iff a note with the claimed commitment was inserted at exactly the
/// claimed sequence, and that sequence precedes the read. Transient reads match across arbitrary
/// call-nesting depth: the assembled set is flat and transaction-ordered, so a note inserted by
/// one call is matchable by a read from any later call of the same transaction.
///
/// # Errors
/// Returns an error if:
/// - A transient read cannot be matched against the transaction's insertions.
/// - A witnessed read's membership proof does not recompute the historic note-tree root.
/// - Any nullifier occurs more than once in the set.
pub fn match_side_effects<O>(
    effects: &TransactionEffects,
    roots: &HistoricTreeRoots,
    oracle: &O,
) -> Result<(), KernelError>
where
    O: StateOracle + ?Sized,
{
    let inserted_at: BTreeMap<NoteCommitment, u32> = effects
        .new_notes()
        .iter()
        .map(|note| (note.commitment(), note.sequence()))
        .collect();

    for request in effects.read_requests() {
        match request.origin() {
            ReadOrigin::Pending { insert_sequence } => {
                let matched = inserted_at
                    .get(&request.commitment())
                    .is_some_and(|&at| at == insert_sequence && at < request.sequence());
                if !matched {
                    return Err(KernelError::ReadRequestMismatch {
                        sequence: request.sequence(),
                        commitment: request.commitment(),
                    });
                }
            },
            ReadOrigin::Committed { tree_index } => {
                let witness = oracle
                    .get_membership_witness(request.commitment())
                    .map_err(KernelError::WitnessUnavailable)?;
                if witness.tree_index() != tree_index
                    || !witness.verify(request.commitment(), roots.note_tree())
                {
                    return Err(KernelError::MembershipCheckFailed {
                        commitment: request.commitment(),
                        tree_index,
                    });
                }
            },
        }
    }

    let mut seen = BTreeSet::new();
    for entry in effects.nullifiers() {
        if !seen.insert(entry.nullifier()) {
            return Err(KernelError::DuplicateNullifier(entry.nullifier()));
        }
    }

    Ok(())
}

use alloc::vec::Vec;

use veil_objects::{
    Address, Felt, StorageSlot,
    abi::FunctionSelector,
    note::{Note, Nullifier, PendingNote},
    transaction::{HistoricTreeRoots, ReadOrigin, ReadRequest},
    Word,
};

use super::{ExecutionMode, Simulator, TransactionState};
use crate::{
    SideEffectKind, SimulationError,
    frame::{CallPath, ExecutionFrame},
    oracle::{CommittedNote, ORACLE_PAGE_SIZE, SortOrder},
};

// EXECUTION CONTEXT
// ================================================================================================

/// The interface a contract function's logic uses to interact with the simulation.
///
/// All state access flows through this context: reads resolve against the transaction's pending
/// commitment store first and the state oracle second (pending wins when both match), insertions
/// and nullifications append to the shared side-effect log, and nested calls recurse into the
/// engine synchronously so that a callee completes fully before the caller resumes.
pub struct ExecutionContext<'a> {
    pub(super) simulator: &'a Simulator,
    pub(super) state: &'a mut TransactionState,
    pub(super) frame: &'a mut ExecutionFrame,
    pub(super) path: &'a CallPath,
    pub(super) mode: ExecutionMode,
    pub(super) depth: usize,
}

impl ExecutionContext<'_> {
    // ENVIRONMENT ACCESSORS
    // --------------------------------------------------------------------------------------------

    /// Returns the address of the contract this frame executes against.
    pub fn contract_address(&self) -> Address {
        self.frame.contract()
    }

    /// Returns the address which invoked this frame: the caller contract for nested frames, or
    /// the transaction origin for the root frame.
    pub fn msg_sender(&self) -> Address {
        self.frame.caller()
    }

    /// Returns the arguments the function was invoked with.
    pub fn args(&self) -> &[Felt] {
        self.frame.args()
    }

    /// Returns the identifier of the reference chain.
    pub fn chain_id(&self) -> Felt {
        self.simulator.chain_id()
    }

    /// Returns the committed-state roots snapshot this transaction executes against.
    pub fn historic_roots(&self) -> &HistoricTreeRoots {
        &self.state.roots
    }

    // STATE ACCESS
    // --------------------------------------------------------------------------------------------

    /// Returns all notes currently visible under the specified slot of this contract: pending
    /// notes inserted earlier in this transaction first, then committed notes, excluding any
    /// note nullified within this transaction. One read request is recorded per returned note.
    pub fn get_notes(&mut self, slot: StorageSlot) -> Result<Vec<Note>, SimulationError> {
        let contract = self.frame.contract();
        let mut notes = Vec::new();

        let pending: Vec<PendingNote> =
            self.state.store.visible_notes(contract, slot).into_iter().cloned().collect();
        for note in pending {
            self.record_pending_read(&note);
            notes.push(note.into_note());
        }

        for committed in self.fetch_committed_notes(contract, slot)? {
            if self.state.store.is_nullified(committed.note().commitment()) {
                continue;
            }
            self.record_committed_read(&committed);
            notes.push(committed.into_note());
        }

        Ok(notes)
    }

    /// Resolves exactly one note under the specified slot matching the provided predicate.
    ///
    /// Pending notes are searched first; if a pending note matches, it wins over any committed
    /// candidate (most-recent-state semantics, so a function can read a note it just inserted in
    /// the same transaction). A read request for the resolved note is recorded.
    ///
    /// # Errors
    /// Returns an error if:
    /// - No pending or committed note matches the predicate.
    /// - More than one candidate matches within the searched origin.
    pub fn read_note<P>(&mut self, slot: StorageSlot, predicate: P) -> Result<Note, SimulationError>
    where
        P: Fn(&Note) -> bool,
    {
        let contract = self.frame.contract();

        let mut pending: Vec<PendingNote> = self
            .state
            .store
            .visible_notes(contract, slot)
            .into_iter()
            .filter(|pending| predicate(pending.note()))
            .cloned()
            .collect();
        match pending.len() {
            0 => (),
            1 => {
                let note = pending.remove(0);
                self.record_pending_read(&note);
                return Ok(note.into_note());
            },
            matches => {
                return Err(SimulationError::AmbiguousRead {
                    contract,
                    slot,
                    matches,
                    path: self.path.clone(),
                });
            },
        }

        let mut committed: Vec<CommittedNote> = self
            .fetch_committed_notes(contract, slot)?
            .into_iter()
            .filter(|committed| {
                predicate(committed.note())
                    && !self.state.store.is_nullified(committed.note().commitment())
            })
            .collect();
        match committed.len() {
            0 => Err(SimulationError::NoteNotFound { contract, slot, path: self.path.clone() }),
            1 => {
                let note = committed.remove(0);
                self.record_committed_read(&note);
                Ok(note.into_note())
            },
            matches => Err(SimulationError::AmbiguousRead {
                contract,
                slot,
                matches,
                path: self.path.clone(),
            }),
        }
    }

    // SIDE EFFECTS
    // --------------------------------------------------------------------------------------------

    /// Creates a note under the specified slot of this contract and appends it to the pending
    /// commitment store. The randomizer is drawn from the transaction's crypto context; the
    /// nonce is assigned by the store.
    pub fn insert_note(
        &mut self,
        slot: StorageSlot,
        fields: Vec<Felt>,
    ) -> Result<PendingNote, SimulationError> {
        self.ensure_side_effects_allowed(SideEffectKind::NoteInsertion)?;

        let randomizer = self.state.crypto.draw_randomizer();
        let pending = self
            .state
            .store
            .insert(self.frame.index(), self.frame.contract(), slot, fields, randomizer)
            .map_err(|source| SimulationError::NoteConstructionFailed {
                path: self.path.clone(),
                source,
            })?;

        self.frame.record_effect(pending.sequence() as usize);
        Ok(pending)
    }

    /// Emits the nullifier of the provided note, marking it consumed for the remainder of the
    /// transaction.
    ///
    /// # Errors
    /// Returns an error if a nullifier for the note was already emitted within this transaction.
    pub fn nullify_note(
        &mut self,
        note: &Note,
        secret: Word,
    ) -> Result<Nullifier, SimulationError> {
        self.ensure_side_effects_allowed(SideEffectKind::Nullification)?;

        match self.state.store.nullify(note, secret) {
            Some(entry) => {
                self.frame.record_effect(entry.sequence() as usize);
                Ok(entry.nullifier())
            },
            None => Err(SimulationError::AlreadyNullified {
                commitment: note.commitment(),
                path: self.path.clone(),
            }),
        }
    }

    // NESTED CALLS
    // --------------------------------------------------------------------------------------------

    /// Synchronously executes the specified function as a nested call and returns its raw return
    /// values. The callee runs against the same pending commitment store, so its effects are
    /// visible to every later read in this transaction; its failure propagates as failure of
    /// this frame.
    pub fn call(
        &mut self,
        to: Address,
        selector: FunctionSelector,
        args: Vec<Felt>,
    ) -> Result<Vec<Felt>, SimulationError> {
        self.execute_nested(to, selector, args, self.frame.is_static())
    }

    /// Synchronously executes the specified function as a static (view-only) nested call: the
    /// callee and everything below it may read state but not produce side effects.
    pub fn static_call(
        &mut self,
        to: Address,
        selector: FunctionSelector,
        args: Vec<Felt>,
    ) -> Result<Vec<Felt>, SimulationError> {
        self.execute_nested(to, selector, args, true)
    }

    // HELPERS
    // --------------------------------------------------------------------------------------------

    fn execute_nested(
        &mut self,
        to: Address,
        selector: FunctionSelector,
        args: Vec<Felt>,
        is_static: bool,
    ) -> Result<Vec<Felt>, SimulationError> {
        if self.mode == ExecutionMode::Unconstrained {
            return Err(SimulationError::InvalidSideEffectInUnconstrainedMode {
                kind: SideEffectKind::NestedCall,
                path: self.path.clone(),
            });
        }

        let caller = self.frame.contract();
        let result = self.simulator.execute_call(
            self.state,
            self.path,
            caller,
            to,
            selector,
            args,
            self.mode,
            is_static,
            self.depth + 1,
        )?;

        let return_values = result.return_values().to_vec();
        self.frame.push_nested(result);
        Ok(return_values)
    }

    fn record_pending_read(&mut self, note: &PendingNote) {
        let sequence = self.state.store.next_sequence();
        let request = ReadRequest::new(
            note.commitment(),
            note.note().contract(),
            note.note().slot(),
            sequence,
            ReadOrigin::Pending { insert_sequence: note.sequence() },
        );
        self.state.store.record_read(request);
        self.frame.record_effect(sequence as usize);
    }

    fn record_committed_read(&mut self, note: &CommittedNote) {
        let sequence = self.state.store.next_sequence();
        let request = ReadRequest::new(
            note.note().commitment(),
            note.note().contract(),
            note.note().slot(),
            sequence,
            ReadOrigin::Committed { tree_index: note.tree_index() },
        );
        self.state.store.record_read(request);
        self.frame.record_effect(sequence as usize);
    }

    /// Fetches all committed notes under the slot, paging through the oracle until the reported
    /// count is exhausted.
    fn fetch_committed_notes(
        &self,
        contract: Address,
        slot: StorageSlot,
    ) -> Result<Vec<CommittedNote>, SimulationError> {
        let mut all = Vec::new();
        let mut offset = 0;

        loop {
            let page = self
                .simulator
                .oracle()
                .get_notes(contract, slot, None, SortOrder::Ascending, ORACLE_PAGE_SIZE, offset)
                .map_err(SimulationError::OracleUnavailable)?;

            let total = page.count();
            let fetched = page.notes().len();
            all.extend(page.into_notes());
            offset += fetched;

            if fetched == 0 || offset >= total {
                break;
            }
        }

        Ok(all)
    }

    fn ensure_side_effects_allowed(&self, kind: SideEffectKind) -> Result<(), SimulationError> {
        if self.mode == ExecutionMode::Unconstrained {
            return Err(SimulationError::InvalidSideEffectInUnconstrainedMode {
                kind,
                path: self.path.clone(),
            });
        }
        if self.frame.is_static() {
            return Err(SimulationError::InvalidSideEffectInStaticCall {
                kind,
                path: self.path.clone(),
            });
        }
        Ok(())
    }
}

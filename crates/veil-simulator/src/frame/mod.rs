use alloc::vec::Vec;
use core::fmt::{Debug, Display, Formatter};

use veil_objects::{
    Address, Felt,
    abi::FunctionSelector,
    transaction::ExecutionResult,
};

use crate::pending::{PendingCommitmentStore, SideEffect};

// CALL PATH
// ================================================================================================

/// The chain of `contract::selector` segments leading to a frame, from the root call down.
///
/// Attached to frame-scoped errors so a terminal failure identifies which call produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallPath(Vec<(Address, FunctionSelector)>);

impl CallPath {
    /// Returns the empty path of the transaction entry point.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Returns a new path extending this one with the provided segment.
    pub fn push(&self, contract: Address, selector: FunctionSelector) -> Self {
        let mut segments = self.0.clone();
        segments.push((contract, selector));
        Self(segments)
    }

    /// Returns the number of segments on this path.
    pub fn depth(&self) -> usize {
        self.0.len()
    }
}

impl Display for CallPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<root>");
        }
        for (position, (contract, selector)) in self.0.iter().enumerate() {
            if position > 0 {
                f.write_str(" > ")?;
            }
            write!(f, "{contract}::{selector}")?;
        }
        Ok(())
    }
}

// EXECUTION FRAME
// ================================================================================================

/// One call's execution context within a transaction simulation.
///
/// A frame records the invocation inputs, the indices of its side effects in the shared
/// [PendingCommitmentStore] log (effects are attributed to the frame but physically stored in
/// the shared log so siblings and children see prior effects immediately), and the results of
/// its nested calls. A frame completes when its function returns or fails; there are no
/// partial-success semantics across a call boundary.
pub struct ExecutionFrame {
    index: u32,
    contract: Address,
    selector: FunctionSelector,
    args: Vec<Felt>,
    caller: Address,
    is_static: bool,
    effects: Vec<usize>,
    nested: Vec<ExecutionResult>,
}

impl ExecutionFrame {
    // CONSTRUCTOR
    // --------------------------------------------------------------------------------------------

    /// Returns a new [ExecutionFrame] with the specified invocation inputs.
    pub fn new(
        index: u32,
        contract: Address,
        selector: FunctionSelector,
        args: Vec<Felt>,
        caller: Address,
        is_static: bool,
    ) -> Self {
        Self {
            index,
            contract,
            selector,
            args,
            caller,
            is_static,
            effects: Vec::new(),
            nested: Vec::new(),
        }
    }

    // PUBLIC ACCESSORS
    // --------------------------------------------------------------------------------------------

    /// Returns the transaction-wide index assigned to this frame at creation.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Returns the address of the contract this frame executes against.
    pub fn contract(&self) -> Address {
        self.contract
    }

    /// Returns the selector of the function this frame executes.
    pub fn selector(&self) -> FunctionSelector {
        self.selector
    }

    /// Returns the arguments the function was invoked with.
    pub fn args(&self) -> &[Felt] {
        &self.args
    }

    /// Returns the address which invoked this frame (the caller contract, or the transaction
    /// origin for the root frame).
    pub fn caller(&self) -> Address {
        self.caller
    }

    /// Returns true if this frame runs under static (view-only) calling convention.
    pub fn is_static(&self) -> bool {
        self.is_static
    }

    // STATE MUTATORS
    // --------------------------------------------------------------------------------------------

    /// Attributes the side effect at the specified log position to this frame.
    pub fn record_effect(&mut self, log_index: usize) {
        self.effects.push(log_index);
    }

    /// Appends the result of a completed nested call.
    pub fn push_nested(&mut self, result: ExecutionResult) {
        self.nested.push(result);
    }

    // RESULT CONSTRUCTION
    // --------------------------------------------------------------------------------------------

    /// Consumes this frame and builds its [ExecutionResult], partitioning the frame's log
    /// entries by side-effect kind in emission order.
    pub fn into_result(
        self,
        store: &PendingCommitmentStore,
        return_values: Vec<Felt>,
    ) -> ExecutionResult {
        let mut read_requests = Vec::new();
        let mut new_notes = Vec::new();
        let mut nullifiers = Vec::new();

        for index in self.effects {
            match store.entry(index) {
                Some(SideEffect::NoteInserted(note)) => new_notes.push(note.clone()),
                Some(SideEffect::NoteRead(request)) => read_requests.push(request.clone()),
                Some(SideEffect::NullifierEmitted(entry)) => nullifiers.push(entry.clone()),
                None => (),
            }
        }

        ExecutionResult::new(
            self.contract,
            self.selector,
            self.index,
            return_values,
            read_requests,
            new_notes,
            nullifiers,
            self.nested,
        )
    }
}

impl Debug for ExecutionFrame {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ExecutionFrame")
            .field("index", &self.index)
            .field("contract", &self.contract)
            .field("selector", &self.selector)
            .field("is_static", &self.is_static)
            .field("effects", &self.effects.len())
            .field("nested", &self.nested.len())
            .finish()
    }
}

use alloc::sync::Arc;
use core::fmt::{Debug, Display, Formatter};

use veil_objects::{
    Address, Felt,
    abi::{FunctionAbi, FunctionSelector},
};

use super::ExecutionContext;
use crate::{ContractStoreError, SimulationError};

// CONTRACT STORE TRAIT
// ================================================================================================

/// The [ContractStore] trait defines the interface through which the execution engine resolves
/// the ABI and logic of a contract function from its address and selector.
///
/// The engine uses dynamic dispatch with trait objects for the store, allowing it to be used
/// with different backend implementations (an in-memory registry in tests, a bytecode-backed
/// resolver in production).
pub trait ContractStore {
    /// Returns the function registered under the specified contract address and selector.
    ///
    /// # Errors
    /// Returns an error if:
    /// - No function with the specified selector is registered for the contract.
    /// - The store encountered some internal error.
    fn get_function(
        &self,
        contract: Address,
        selector: FunctionSelector,
    ) -> Result<ContractFunction, ContractStoreError>;
}

// FUNCTION KIND
// ================================================================================================

/// The execution mode a contract function is declared for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FunctionKind {
    /// Side-effect-producing, nested-call-capable execution verified by the kernel circuit.
    Private,
    /// Read-only execution used for client-side views; never produces on-chain side effects.
    Unconstrained,
}

impl Display for FunctionKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Private => f.write_str("private"),
            Self::Unconstrained => f.write_str("unconstrained"),
        }
    }
}

// CONTRACT FUNCTION
// ================================================================================================

/// The logic of one contract function: a native closure which interacts with the simulation
/// exclusively through the [ExecutionContext] it receives.
pub type ContractLogic =
    dyn Fn(&mut ExecutionContext<'_>) -> Result<alloc::vec::Vec<Felt>, SimulationError>
        + Send
        + Sync;

/// A resolvable contract function: its ABI, its declared kind, and its logic.
#[derive(Clone)]
pub struct ContractFunction {
    abi: FunctionAbi,
    kind: FunctionKind,
    body: Arc<ContractLogic>,
}

impl ContractFunction {
    /// Returns a new [ContractFunction] with the specified ABI, kind, and logic.
    pub fn new<F>(abi: FunctionAbi, kind: FunctionKind, body: F) -> Self
    where
        F: Fn(&mut ExecutionContext<'_>) -> Result<alloc::vec::Vec<Felt>, SimulationError>
            + Send
            + Sync
            + 'static,
    {
        Self { abi, kind, body: Arc::new(body) }
    }

    /// Returns the ABI of this function.
    pub fn abi(&self) -> &FunctionAbi {
        &self.abi
    }

    /// Returns the declared kind of this function.
    pub fn kind(&self) -> FunctionKind {
        self.kind
    }

    /// Runs the function's logic against the provided execution context.
    pub(crate) fn invoke(
        &self,
        context: &mut ExecutionContext<'_>,
    ) -> Result<alloc::vec::Vec<Felt>, SimulationError> {
        (self.body)(context)
    }
}

impl Debug for ContractFunction {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ContractFunction")
            .field("name", &self.abi.name())
            .field("selector", &self.abi.selector())
            .field("kind", &self.kind)
            .finish()
    }
}

#![no_std]

#[macro_use]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub use veil_objects::transaction::{ExecutionRequest, ExecutionResult};

mod executor;
pub use executor::{
    ContractFunction, ContractLogic, ContractStore, CryptoContext, ExecutionContext, FunctionKind,
    Simulator,
};

mod oracle;
pub use oracle::{CommittedNote, MembershipWitness, NotePage, ORACLE_PAGE_SIZE, SortOrder, StateOracle};

mod pending;
pub use pending::{PendingCommitmentStore, SideEffect};

mod frame;
pub use frame::{CallPath, ExecutionFrame};

mod effects;
pub use effects::TransactionEffects;

pub mod kernel;

mod errors;
pub use errors::{
    ContractStoreError, KernelError, SideEffectKind, SimulationError, StateOracleError,
};

#[cfg(any(feature = "testing", test))]
pub mod testing;

// RE-EXPORTS
// ================================================================================================

pub use veil_objects as objects;

use alloc::{sync::Arc, vec::Vec};

use miden_crypto::rand::{FeltRng, RpoRandomCoin};
use veil_objects::{
    AbiError, Address, EMPTY_WORD, Felt, MAX_CALL_DEPTH, Word,
    abi::{AbiValue, FunctionSelector},
    transaction::{ExecutionRequest, ExecutionResult, HistoricTreeRoots},
};

use crate::{
    SimulationError,
    frame::{CallPath, ExecutionFrame},
    oracle::StateOracle,
    pending::PendingCommitmentStore,
};

mod contract_store;
pub use contract_store::{ContractFunction, ContractLogic, ContractStore, FunctionKind};

mod context;
pub use context::ExecutionContext;

// EXECUTION MODE
// ================================================================================================

/// The mode a frame tree executes under.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ExecutionMode {
    Private,
    Unconstrained,
}

impl ExecutionMode {
    fn expected_kind(&self) -> FunctionKind {
        match self {
            Self::Private => FunctionKind::Private,
            Self::Unconstrained => FunctionKind::Unconstrained,
        }
    }
}

// CRYPTO CONTEXT
// ================================================================================================

/// The explicitly-owned cryptographic-primitives context of a [Simulator].
///
/// Owns the random coin from which note randomizers are drawn. Constructed by the caller from a
/// seed and moved into the engine, so the randomness source has a single, explicit owner for its
/// whole lifetime.
pub struct CryptoContext {
    coin: RpoRandomCoin,
}

impl CryptoContext {
    /// Returns a new [CryptoContext] seeded with the provided word.
    pub fn new(seed: Word) -> Self {
        Self { coin: RpoRandomCoin::new(seed) }
    }

    /// Draws a fresh note randomizer.
    pub(crate) fn draw_randomizer(&mut self) -> Felt {
        self.coin.draw_element()
    }

    /// Splits off a transaction-scoped context, advancing this one so distinct transactions draw
    /// distinct randomizers.
    pub(crate) fn fork(&mut self) -> Self {
        let seed = self.coin.draw_word();
        Self::new(seed)
    }
}

// TRANSACTION STATE
// ================================================================================================

/// The mutable state of one transaction's simulation: the shared pending commitment store, the
/// immutable roots snapshot, the transaction-scoped crypto context, and the frame counter.
///
/// One [TransactionState] exists per simulated transaction; distinct transactions never share
/// one.
pub(crate) struct TransactionState {
    pub(crate) store: PendingCommitmentStore,
    pub(crate) roots: HistoricTreeRoots,
    pub(crate) crypto: CryptoContext,
    next_frame: u32,
}

impl TransactionState {
    fn new(roots: HistoricTreeRoots, crypto: CryptoContext) -> Self {
        Self { store: PendingCommitmentStore::new(), roots, crypto, next_frame: 0 }
    }

    fn next_frame_index(&mut self) -> u32 {
        let index = self.next_frame;
        self.next_frame += 1;
        index
    }
}

// SIMULATOR
// ================================================================================================

/// The execution engine: interprets contract functions against a frame tree, issuing
/// oracle and pending-store queries and producing the side-effect artifact the kernel circuit
/// verifies.
///
/// Transaction execution consists of the following steps:
/// - Fetch the historic tree roots snapshot from the [StateOracle] (once per transaction).
/// - Resolve the target function through the [ContractStore] and build the root
///   [ExecutionFrame].
/// - Execute the function body; nested calls create child frames synchronously and depth-first
///   against the same [PendingCommitmentStore], so effects of one call are visible to every
///   later call of the same transaction.
/// - Collect per-frame side effects into an [ExecutionResult] tree.
///
/// The engine uses dynamic dispatch with trait objects for the [StateOracle] and
/// [ContractStore], allowing it to be used with different backend implementations.
pub struct Simulator {
    oracle: Arc<dyn StateOracle>,
    contracts: Arc<dyn ContractStore>,
    crypto: CryptoContext,
    chain_id: Felt,
}

impl Simulator {
    // CONSTRUCTOR
    // --------------------------------------------------------------------------------------------

    /// Returns a new [Simulator] instance with the specified [StateOracle], [ContractStore],
    /// crypto context, and reference chain identifier.
    pub fn new(
        oracle: Arc<dyn StateOracle>,
        contracts: Arc<dyn ContractStore>,
        crypto: CryptoContext,
        chain_id: Felt,
    ) -> Self {
        Self { oracle, contracts, crypto, chain_id }
    }

    // PUBLIC ACCESSORS
    // --------------------------------------------------------------------------------------------

    /// Returns the state oracle this engine reads committed state through.
    pub fn oracle(&self) -> &dyn StateOracle {
        self.oracle.as_ref()
    }

    /// Returns the identifier of the reference chain.
    pub fn chain_id(&self) -> Felt {
        self.chain_id
    }

    // TRANSACTION EXECUTION
    // --------------------------------------------------------------------------------------------

    /// Simulates the private execution of a transaction specified by the provided request and
    /// returns the [ExecutionResult] tree whose side effects the kernel circuit will verify.
    ///
    /// The historic tree roots snapshot is fetched once at the start; every read of committed
    /// state during the transaction is relative to it. The transaction's pending state is
    /// created here and discarded when this method returns, whether it succeeds or fails.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The state oracle is unavailable.
    /// - The target function cannot be resolved or is not a private function.
    /// - The provided arguments do not match the function's declared parameter width.
    /// - The function body fails (note not found, double nullification, invalid side effect in
    ///   a static subtree, call depth exceeded).
    pub fn execute_transaction(
        &mut self,
        request: &ExecutionRequest,
    ) -> Result<ExecutionResult, SimulationError> {
        let roots =
            self.oracle.get_tree_roots().map_err(SimulationError::OracleUnavailable)?;
        let mut state = TransactionState::new(roots, self.crypto.fork());

        self.execute_call(
            &mut state,
            &CallPath::root(),
            request.from(),
            request.to(),
            request.selector(),
            request.args().to_vec(),
            ExecutionMode::Private,
            false,
            0,
        )
    }

    /// Runs an unconstrained (read-only) function and returns its decoded return values.
    ///
    /// `from` is the synthetic sender supplied when an unauthenticated context is required;
    /// `roots` is the committed-state snapshot the view executes against. Unconstrained
    /// execution resolves reads through the same path as private execution but rejects
    /// insertions, nullifications, and nested calls, so running the same request twice against
    /// the same oracle snapshot yields identical results.
    pub fn run_unconstrained(
        &self,
        request: &ExecutionRequest,
        from: Address,
        roots: HistoricTreeRoots,
    ) -> Result<Vec<AbiValue>, SimulationError> {
        // unconstrained execution never draws randomizers, so the coin seed is irrelevant
        let mut state = TransactionState::new(roots, CryptoContext::new(EMPTY_WORD));

        let result = self.execute_call(
            &mut state,
            &CallPath::root(),
            from,
            request.to(),
            request.selector(),
            request.args().to_vec(),
            ExecutionMode::Unconstrained,
            false,
            0,
        )?;

        let function = self
            .contracts
            .get_function(request.to(), request.selector())
            .map_err(|source| SimulationError::FunctionResolutionFailed {
                path: CallPath::root().push(request.to(), request.selector()),
                source,
            })?;
        function.abi().decode_return_values(result.return_values()).map_err(SimulationError::Abi)
    }

    // HELPERS
    // --------------------------------------------------------------------------------------------

    /// Executes one frame to completion and returns its result; invoked recursively for nested
    /// calls.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn execute_call(
        &self,
        state: &mut TransactionState,
        parent_path: &CallPath,
        caller: Address,
        contract: Address,
        selector: FunctionSelector,
        args: Vec<Felt>,
        mode: ExecutionMode,
        is_static: bool,
        depth: usize,
    ) -> Result<ExecutionResult, SimulationError> {
        let path = parent_path.push(contract, selector);

        if depth >= MAX_CALL_DEPTH {
            return Err(SimulationError::CallDepthExceeded { depth, path });
        }

        let function = self
            .contracts
            .get_function(contract, selector)
            .map_err(|source| SimulationError::FunctionResolutionFailed {
                path: path.clone(),
                source,
            })?;

        let expected = mode.expected_kind();
        if function.kind() != expected {
            return Err(SimulationError::FunctionKindMismatch {
                contract,
                selector,
                expected,
                actual: function.kind(),
            });
        }

        // function bodies index into their arguments per the declared ABI, so a malformed width
        // must be rejected before the body runs
        let expected_width = function.abi().parameter_width();
        if args.len() != expected_width {
            return Err(SimulationError::Abi(AbiError::ArgumentWidthMismatch {
                expected: expected_width,
                actual: args.len(),
            }));
        }

        let frame_index = state.next_frame_index();
        let mut frame =
            ExecutionFrame::new(frame_index, contract, selector, args, caller, is_static);

        #[cfg(feature = "log")]
        log::debug!("executing frame {frame_index} at {path} (depth {depth})");

        let return_values = {
            let mut context = ExecutionContext {
                simulator: self,
                state: &mut *state,
                frame: &mut frame,
                path: &path,
                mode,
                depth,
            };
            function.invoke(&mut context)?
        };

        let result = frame.into_result(&state.store, return_values);

        #[cfg(feature = "log")]
        log::debug!(
            "frame {frame_index} completed: {} reads, {} new notes, {} nullifiers",
            result.read_requests().len(),
            result.new_notes().len(),
            result.nullifiers().len(),
        );

        Ok(result)
    }
}

mod kernel_matching;
mod private_execution;
mod unconstrained_execution;

use std::sync::Arc;

use veil_objects::{Address, Felt, Word, abi::FunctionSelector, note::Note};
use veil_simulator::{
    CryptoContext, ExecutionRequest, Simulator,
    testing::{MockStateOracle, token},
};

// TEST ENVIRONMENT
// ================================================================================================

const TOKEN: Address = Address::new(Felt::new(0xf00d));
const OWNER: (Felt, Felt) = (Felt::new(11), Felt::new(12));
const OTHER_OWNER: (Felt, Felt) = (Felt::new(21), Felt::new(22));
const SEED: Word = [Felt::new(1), Felt::new(2), Felt::new(3), Felt::new(4)];
const CHAIN_ID: Felt = Felt::new(1);

/// Builds a simulator over the provided oracle, with the token fixture deployed at [TOKEN].
fn simulator_for(oracle: Arc<MockStateOracle>) -> Simulator {
    Simulator::new(
        oracle,
        Arc::new(token::deploy(TOKEN)),
        CryptoContext::new(SEED),
        CHAIN_ID,
    )
}

/// Builds a simulator whose oracle holds the provided committed notes; the oracle is returned
/// alongside so tests can query roots and witnesses directly.
fn setup(committed: Vec<Note>) -> (Arc<MockStateOracle>, Simulator) {
    let oracle = Arc::new(MockStateOracle::new(committed));
    let simulator = simulator_for(oracle.clone());
    (oracle, simulator)
}

/// Builds a private-mode execution request against the token fixture.
fn private_request(function: &str, args: Vec<Felt>) -> ExecutionRequest {
    ExecutionRequest::new(
        Address::ZERO,
        TOKEN,
        FunctionSelector::from_name(function),
        true,
        false,
        args,
    )
}

/// Builds a view-mode execution request against the token fixture.
fn view_request(function: &str, args: Vec<Felt>) -> ExecutionRequest {
    ExecutionRequest::new(
        Address::ZERO,
        TOKEN,
        FunctionSelector::from_name(function),
        false,
        false,
        args,
    )
}

/// Returns the ABI-encoded arguments of a mint: `[amount, owner_x, owner_y]`.
fn mint_args(amount: u64, owner: (Felt, Felt)) -> Vec<Felt> {
    vec![Felt::new(amount), owner.0, owner.1]
}

/// Returns the ABI-encoded arguments of an owner point: `[owner_x, owner_y]`.
fn owner_args(owner: (Felt, Felt)) -> Vec<Felt> {
    vec![owner.0, owner.1]
}

use alloc::collections::BTreeMap;

use veil_objects::{Address, abi::FunctionSelector};

use crate::{
    ContractStoreError,
    executor::{ContractFunction, ContractStore},
};

// TEST CONTRACT STORE
// ================================================================================================

/// An in-memory [ContractStore] keyed by `(contract, selector)`.
#[derive(Clone, Default)]
pub struct TestContractStore {
    functions: BTreeMap<(Address, FunctionSelector), ContractFunction>,
}

impl TestContractStore {
    /// Returns a new empty [TestContractStore].
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a function under the specified contract address; the selector is taken from the
    /// function's ABI. A previously registered function with the same selector is replaced.
    pub fn register(&mut self, contract: Address, function: ContractFunction) {
        self.functions.insert((contract, function.abi().selector()), function);
    }

    /// Consuming variant of [Self::register] for builder-style setup.
    pub fn with_function(mut self, contract: Address, function: ContractFunction) -> Self {
        self.register(contract, function);
        self
    }
}

impl ContractStore for TestContractStore {
    fn get_function(
        &self,
        contract: Address,
        selector: FunctionSelector,
    ) -> Result<ContractFunction, ContractStoreError> {
        self.functions
            .get(&(contract, selector))
            .cloned()
            .ok_or(ContractStoreError::FunctionNotFound { contract, selector })
    }
}

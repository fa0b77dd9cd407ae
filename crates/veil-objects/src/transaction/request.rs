use alloc::vec::Vec;

use crate::{Address, Felt, abi::FunctionSelector};

// EXECUTION REQUEST
// ================================================================================================

/// A request to execute one contract function on behalf of a client.
///
/// The request identifies the target contract and function, carries the ABI-encoded arguments,
/// and declares whether the function is expected to run in private (side-effect-producing) mode
/// and whether it is a constructor invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecutionRequest {
    from: Address,
    to: Address,
    selector: FunctionSelector,
    is_private: bool,
    is_constructor: bool,
    args: Vec<Felt>,
}

impl ExecutionRequest {
    /// Returns a new [ExecutionRequest] with the specified parameters.
    pub fn new(
        from: Address,
        to: Address,
        selector: FunctionSelector,
        is_private: bool,
        is_constructor: bool,
        args: Vec<Felt>,
    ) -> Self {
        Self { from, to, selector, is_private, is_constructor, args }
    }

    /// Returns the address on whose behalf the function is executed.
    pub fn from(&self) -> Address {
        self.from
    }

    /// Returns the address of the target contract.
    pub fn to(&self) -> Address {
        self.to
    }

    /// Returns the selector of the target function.
    pub fn selector(&self) -> FunctionSelector {
        self.selector
    }

    /// Returns true if the target function is expected to run in private mode.
    pub fn is_private(&self) -> bool {
        self.is_private
    }

    /// Returns true if this request invokes a contract constructor.
    pub fn is_constructor(&self) -> bool {
        self.is_constructor
    }

    /// Returns the ABI-encoded arguments of the request.
    pub fn args(&self) -> &[Felt] {
        &self.args
    }
}

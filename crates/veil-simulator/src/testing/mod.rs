//! Test doubles and fixture contracts for exercising the execution engine.

mod mock_oracle;
pub use mock_oracle::MockStateOracle;

mod contract_store;
pub use contract_store::TestContractStore;

pub mod token;

//! Objects exchanged between the execution engine, its callers, and the kernel circuit.

mod request;
pub use request::ExecutionRequest;

mod read_request;
pub use read_request::{ReadOrigin, ReadRequest};

mod result;
pub use result::{ExecutionResult, NullifierEntry};

mod tree_roots;
pub use tree_roots::HistoricTreeRoots;

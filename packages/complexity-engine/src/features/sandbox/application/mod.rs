//! Sandbox application layer

pub mod execution_sandbox;

pub use execution_sandbox::ExecutionSandbox;

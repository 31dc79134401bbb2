//! Execution Sandbox
//!
//! Runs one submission at one input size, isolated and time-bounded.
//!
//! ## Architecture
//! - **Domain**: PreparedRun (scratch directory guard + launch command)
//! - **Ports**: LanguageRuntime trait (prepare / execute / cleanup)
//! - **Infrastructure**: harness builders, process runner, Python and C++ runtimes
//! - **Application**: ExecutionSandbox (runtime selection per language)
//!
//! ## Isolation
//! - Cleared environment (PATH and TMPDIR only)
//! - Working directory = the run's scratch directory
//! - stdin closed, stdout/stderr captured with a size cap
//! - Python started with `-I`
//! - bubblewrap by default: read-only host, writable scratch directory only,
//!   no network; an operator wrapper replaces it when configured
//! - Each child leads a process group that is killed on timeout, on return
//!   and when the future is dropped

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use application::ExecutionSandbox;
pub use domain::PreparedRun;
pub use infrastructure::{Confiner, CppRuntime, ProcessOutput, ProcessRunner, PythonRuntime};
pub use ports::LanguageRuntime;

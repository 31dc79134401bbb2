//! Domain models shared across features
//!
//! Pure data with no external dependencies beyond serde.

pub mod complexity;
pub mod measurement;
pub mod submission;

pub use complexity::ComplexityClass;
pub use measurement::Measurement;
pub use submission::{Language, Submission};

//! Verdict reconciliation
//!
//! Merges the empirical fit and the static signal into one verdict. Either
//! side can override the other only when it is strong and the other is not.
//! Two moderately confident signals that disagree give `Inconclusive`.

pub mod domain;
pub mod infrastructure;

pub use domain::{Verdict, VerdictBasis};
pub use infrastructure::VerdictReconciler;

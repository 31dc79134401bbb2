//! Infrastructure layer for reconciliation

pub mod reconciler;

pub use reconciler::VerdictReconciler;

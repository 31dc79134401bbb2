//! Sandbox ports

pub mod language_runtime;

pub use language_runtime::LanguageRuntime;

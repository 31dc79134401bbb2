//! Infrastructure layer for static cost analysis

pub mod analyzer;
pub mod complexity_calculator;
pub mod functions;
pub mod loop_bounds;
pub mod loop_nesting;
pub mod patterns;
pub mod source_scanner;
pub mod syntax;

pub use analyzer::StaticAnalyzer;
pub use complexity_calculator::ComplexityCalculator;

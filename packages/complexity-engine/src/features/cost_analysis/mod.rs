//! Static Cost Analysis
//!
//! Estimates a submission's complexity from its text alone by:
//! - Checking that it parses
//! - Spotting sort/search library calls
//! - Classifying self-recursion (exponential, divide-and-conquer, plain)
//! - Inferring loop bounds and nesting depth
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │ Domain Layer                            │
//! │  - StaticSignal (detected, confidence)  │
//! │  - LoopSite / FunctionSite              │
//! │  - confidence constants                 │
//! └─────────────────────────────────────────┘
//!                   ▲
//!                   │
//! ┌─────────────────────────────────────────┐
//! │ Infrastructure Layer                    │
//! │  - StaticAnalyzer (main analyzer)       │
//! │  - ComplexityCalculator (loop nesting)  │
//! │  - source_scanner / syntax / patterns   │
//! └─────────────────────────────────────────┘
//! ```
//!
//! Nesting is counted per line (indentation for Python, braces for C++). This
//! is an approximation of block structure; calls into other functions are not
//! followed.
//!
//! # Example
//!
//! ```rust,ignore
//! use complexity_engine::features::cost_analysis::StaticAnalyzer;
//! use complexity_engine::Language;
//!
//! let analyzer = StaticAnalyzer::new();
//! let signal = analyzer.analyze("i = 1\nwhile i <= n:\n    i *= 2\n", Language::Python)?;
//!
//! println!("Complexity: {}", signal.detected.as_str());
//! println!("Confidence: {}", signal.confidence);
//! ```

pub mod domain;
pub mod infrastructure;

pub use domain::{confidence, FunctionSite, LoopForm, LoopKind, LoopSite, StaticSignal};

pub use infrastructure::{ComplexityCalculator, StaticAnalyzer};

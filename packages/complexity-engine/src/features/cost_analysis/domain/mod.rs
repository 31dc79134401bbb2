//! Domain models for static cost analysis
//!
//! Pure data, no pattern matching here.

use serde::{Deserialize, Serialize};

use crate::shared::models::ComplexityClass;

/// Static estimate of a submission's complexity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticSignal {
    /// Canonical class or `Inconclusive`
    pub detected: ComplexityClass,
    /// 0-100
    pub confidence: u8,
    /// Reasons, in the order the analyzer found them
    pub explanation: Vec<String>,
}

impl StaticSignal {
    pub fn new(detected: ComplexityClass, confidence: u8, explanation: Vec<String>) -> Self {
        Self {
            detected,
            confidence: confidence.min(100),
            explanation,
        }
    }

    pub fn inconclusive(reason: impl Into<String>) -> Self {
        Self::new(
            ComplexityClass::Inconclusive,
            confidence::INCONCLUSIVE,
            vec![reason.into()],
        )
    }

    pub fn is_conclusive(&self) -> bool {
        self.detected.is_conclusive()
    }
}

/// Rule confidences
pub mod confidence {
    pub const LIBRARY_CALL: u8 = 90;
    pub const EXPONENTIAL_RECURSION: u8 = 85;
    pub const DIVIDE_AND_CONQUER_LINEAR_PASS: u8 = 85;
    pub const DIVIDE_AND_CONQUER: u8 = 80;
    /// Lowest of the detected outcomes
    pub const GENERIC_RECURSION: u8 = 55;
    pub const LOG_LOOP: u8 = 85;
    pub const LOG_LOOP_IN_LINEAR: u8 = 80;
    pub const CUBIC_NESTING: u8 = 80;
    pub const QUADRATIC_NESTING: u8 = 85;
    pub const SINGLE_LOOP: u8 = 80;
    pub const CONSTANT: u8 = 90;
    pub const INCONCLUSIVE: u8 = 30;
    /// Subtracted when some loops have no recognisable bound
    pub const UNBOUNDED_PENALTY: u8 = 15;
}

/// How a loop's trip count grows with its bound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoopKind {
    /// Additive step or iteration over a collection
    Linear,
    /// Guard variable halved or doubled each iteration
    Logarithmic,
    /// No recognisable bound (`while True`, untouched guard)
    Unbounded,
}

impl LoopKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Logarithmic => "logarithmic",
            Self::Unbounded => "unbounded",
        }
    }
}

/// Syntactic form of a loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopForm {
    For,
    While,
    DoWhile,
    Comprehension,
}

impl LoopForm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::For => "for-loop",
            Self::While => "while-loop",
            Self::DoWhile => "do-while loop",
            Self::Comprehension => "comprehension",
        }
    }
}

/// One loop found in the source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoopSite {
    /// 1-based source line
    pub line: usize,
    pub form: LoopForm,
    pub kind: LoopKind,
    /// Kinds of the enclosing loops, outermost first, ending with this loop's kind
    pub chain: Vec<LoopKind>,
}

impl LoopSite {
    /// Nesting depth (1 = top-level loop)
    pub fn depth(&self) -> usize {
        self.chain.len()
    }

    pub fn count(&self, kind: LoopKind) -> usize {
        self.chain.iter().filter(|k| **k == kind).count()
    }
}

/// A function definition and how it recurses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionSite {
    pub name: String,
    /// 1-based line of the definition
    pub line: usize,
    /// Calls to itself inside its own body
    pub self_calls: usize,
    /// Divides by two or shifts right by one somewhere in the body
    pub halves_input: bool,
    /// Contains a loop, a slice or a merge step
    pub linear_pass: bool,
}

impl FunctionSite {
    pub fn is_recursive(&self) -> bool {
        self.self_calls > 0
    }
}

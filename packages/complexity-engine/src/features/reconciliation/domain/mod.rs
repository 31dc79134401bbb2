//! Verdict domain model

use serde::{Deserialize, Serialize};

use crate::features::cost_analysis::StaticSignal;
use crate::features::model_fitting::FitResult;
use crate::shared::models::ComplexityClass;

/// Which rule decided the verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictBasis {
    /// Both sides name the same model
    Agreement,
    /// Measured fit overrides or is the fallback
    Empirical,
    /// Static signal overrides a weak fit
    Static,
    /// Two confident signals disagree
    Disagreement,
}

impl VerdictBasis {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Agreement => "agreement",
            Self::Empirical => "empirical",
            Self::Static => "static",
            Self::Disagreement => "disagreement",
        }
    }
}

/// Final answer for one submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    /// Canonical class or `Inconclusive`
    pub complexity: ComplexityClass,
    /// 0-100
    pub confidence: u8,
    /// User-facing justification, never empty
    pub reason: String,
    pub agreement: bool,
    pub basis: VerdictBasis,
    pub empirical: FitResult,
    #[serde(rename = "static")]
    pub static_signal: StaticSignal,
}

impl Verdict {
    pub fn is_conclusive(&self) -> bool {
        self.complexity.is_conclusive()
    }
}

//! Model fitting domain: the canonical basis and fit results

use serde::{Deserialize, Serialize};

use crate::shared::models::ComplexityClass;

/// Canonical growth function
#[derive(Debug, Clone, Copy)]
pub struct ComplexityModel {
    pub class: ComplexityClass,
    /// `f(n, exponential_cap)`
    evaluate: fn(f64, f64) -> f64,
}

impl ComplexityModel {
    /// Theoretical value at `n`
    pub fn value(&self, n: f64, exponential_cap: f64) -> f64 {
        (self.evaluate)(n, exponential_cap)
    }
}

fn constant(_n: f64, _cap: f64) -> f64 {
    1.0
}

fn logarithmic(n: f64, _cap: f64) -> f64 {
    n.log2()
}

fn linear(n: f64, _cap: f64) -> f64 {
    n
}

fn linearithmic(n: f64, _cap: f64) -> f64 {
    n * n.log2()
}

fn quadratic(n: f64, _cap: f64) -> f64 {
    n * n
}

fn cubic(n: f64, _cap: f64) -> f64 {
    n * n * n
}

fn exponential(n: f64, cap: f64) -> f64 {
    2f64.powf(n.min(cap))
}

/// Fixed basis in canonical evaluation order (ties go to the earlier entry)
pub static MODEL_BASIS: [ComplexityModel; 7] = [
    ComplexityModel {
        class: ComplexityClass::Constant,
        evaluate: constant,
    },
    ComplexityModel {
        class: ComplexityClass::Logarithmic,
        evaluate: logarithmic,
    },
    ComplexityModel {
        class: ComplexityClass::Linear,
        evaluate: linear,
    },
    ComplexityModel {
        class: ComplexityClass::Linearithmic,
        evaluate: linearithmic,
    },
    ComplexityModel {
        class: ComplexityClass::Quadratic,
        evaluate: quadratic,
    },
    ComplexityModel {
        class: ComplexityClass::Cubic,
        evaluate: cubic,
    },
    ComplexityModel {
        class: ComplexityClass::Exponential,
        evaluate: exponential,
    },
];

/// Score of one evaluated model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelScore {
    pub model: ComplexityClass,
    pub scale_factor: f64,
    pub normalized_error: f64,
}

/// Best fit plus the ranking of every evaluated model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    pub model: ComplexityClass,
    pub scale_factor: f64,
    /// RSS / TSS clamped to [0, 1]
    pub normalized_error: f64,
    /// round(100 * (1 - normalized_error))
    pub confidence: u8,
    /// Evaluated models, best first
    pub ranking: Vec<ModelScore>,
    /// Measurements the fit used
    pub samples: usize,
}

impl FitResult {
    /// Low-confidence default used when there is too little data to fit
    pub fn fallback(model: ComplexityClass, samples: usize) -> Self {
        Self {
            model,
            scale_factor: 0.0,
            normalized_error: 1.0,
            confidence: 0,
            ranking: Vec::new(),
            samples,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.ranking.is_empty()
    }
}

/// Confidence from a normalized error
pub fn confidence_from_error(normalized_error: f64) -> u8 {
    (100.0 * (1.0 - normalized_error)).round().clamp(0.0, 100.0) as u8
}

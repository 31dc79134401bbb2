//! Verdict Reconciler
//!
//! Decision table, first match wins:
//!
//! | condition                               | verdict      | confidence              |
//! |-----------------------------------------|--------------|-------------------------|
//! | same model                              | that model   | w·emp + (1-w)·static    |
//! | emp ≥ strong, static < strong           | empirical    | emp                     |
//! | static ≥ strong, emp < strong           | static       | static                  |
//! | both ≥ moderate                         | Inconclusive | mean                    |
//! | otherwise                               | empirical    | emp                     |

use crate::config::ReconcileConfig;
use crate::features::cost_analysis::StaticSignal;
use crate::features::model_fitting::FitResult;
use crate::features::reconciliation::domain::{Verdict, VerdictBasis};
use crate::shared::models::ComplexityClass;

#[derive(Debug, Clone)]
pub struct VerdictReconciler {
    empirical_weight: f64,
    strong_threshold: u8,
    moderate_threshold: u8,
}

impl VerdictReconciler {
    pub fn new(config: &ReconcileConfig) -> Self {
        Self {
            empirical_weight: config.empirical_weight,
            strong_threshold: config.strong_threshold,
            moderate_threshold: config.moderate_threshold,
        }
    }

    pub fn reconcile(&self, fit: &FitResult, signal: &StaticSignal) -> Verdict {
        let emp = fit.confidence;
        let stat = signal.confidence;

        let (complexity, confidence, basis, reason) = if fit.model == signal.detected {
            let weighted = self.empirical_weight * f64::from(emp)
                + (1.0 - self.empirical_weight) * f64::from(stat);
            (
                fit.model,
                round_confidence(weighted),
                VerdictBasis::Agreement,
                format!(
                    "Measurements and source structure agree on {} (empirical {}%, static {}%)",
                    fit.model, emp, stat
                ),
            )
        } else if emp >= self.strong_threshold && stat < self.strong_threshold {
            (
                fit.model,
                emp,
                VerdictBasis::Empirical,
                format!(
                    "Measured growth fits {} with {}% confidence; the static estimate ({} at {}%) is weaker",
                    fit.model, emp, signal.detected, stat
                ),
            )
        } else if stat >= self.strong_threshold && emp < self.strong_threshold {
            (
                signal.detected,
                stat,
                VerdictBasis::Static,
                format!(
                    "Source structure indicates {} ({}%): {}; measurements fit {} with only {}%",
                    signal.detected,
                    stat,
                    first_reason(signal),
                    fit.model,
                    emp
                ),
            )
        } else if emp >= self.moderate_threshold && stat >= self.moderate_threshold {
            (
                ComplexityClass::Inconclusive,
                round_confidence((f64::from(emp) + f64::from(stat)) / 2.0),
                VerdictBasis::Disagreement,
                format!(
                    "Measurements suggest {} ({}%) but source structure suggests {} ({}%)",
                    fit.model, emp, signal.detected, stat
                ),
            )
        } else if fit.is_fallback() {
            (
                fit.model,
                emp,
                VerdictBasis::Empirical,
                format!(
                    "Too few measurements to fit a model; defaulting to {} (static estimate {} at {}%)",
                    fit.model, signal.detected, stat
                ),
            )
        } else {
            (
                fit.model,
                emp,
                VerdictBasis::Empirical,
                format!(
                    "Neither signal is strong; reporting the measured fit {} ({}%) over the static estimate {} ({}%)",
                    fit.model, emp, signal.detected, stat
                ),
            )
        };

        tracing::debug!(
            "Reconciled: {} @ {} via {} (empirical {} {}%, static {} {}%)",
            complexity,
            confidence,
            basis.as_str(),
            fit.model,
            emp,
            signal.detected,
            stat
        );

        Verdict {
            complexity,
            confidence,
            reason,
            agreement: basis == VerdictBasis::Agreement,
            basis,
            empirical: fit.clone(),
            static_signal: signal.clone(),
        }
    }
}

impl Default for VerdictReconciler {
    fn default() -> Self {
        Self::new(&ReconcileConfig::default())
    }
}

fn round_confidence(value: f64) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}

fn first_reason(signal: &StaticSignal) -> &str {
    signal
        .explanation
        .first()
        .map_or("no structural detail", String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fit(model: ComplexityClass, confidence: u8) -> FitResult {
        FitResult {
            model,
            scale_factor: 1.0,
            normalized_error: 1.0 - f64::from(confidence) / 100.0,
            confidence,
            ranking: vec![crate::features::model_fitting::ModelScore {
                model,
                scale_factor: 1.0,
                normalized_error: 1.0 - f64::from(confidence) / 100.0,
            }],
            samples: 25,
        }
    }

    fn signal(detected: ComplexityClass, confidence: u8) -> StaticSignal {
        StaticSignal::new(detected, confidence, vec!["Single loop level".to_string()])
    }

    #[test]
    fn test_agreement_is_weighted() {
        let verdict = VerdictReconciler::default().reconcile(
            &fit(ComplexityClass::Linear, 90),
            &signal(ComplexityClass::Linear, 70),
        );
        assert_eq!(verdict.complexity, ComplexityClass::Linear);
        assert_eq!(verdict.confidence, 82);
        assert!(verdict.agreement);
        assert_eq!(verdict.basis, VerdictBasis::Agreement);
    }

    #[test]
    fn test_strong_empirical_overrides() {
        let verdict = VerdictReconciler::default().reconcile(
            &fit(ComplexityClass::Quadratic, 92),
            &signal(ComplexityClass::Linear, 50),
        );
        assert_eq!(verdict.complexity, ComplexityClass::Quadratic);
        assert_eq!(verdict.confidence, 92);
        assert!(!verdict.agreement);
        assert_eq!(verdict.basis, VerdictBasis::Empirical);
    }

    #[test]
    fn test_strong_static_overrides() {
        let verdict = VerdictReconciler::default().reconcile(
            &fit(ComplexityClass::Linear, 40),
            &signal(ComplexityClass::Quadratic, 85),
        );
        assert_eq!(verdict.complexity, ComplexityClass::Quadratic);
        assert_eq!(verdict.confidence, 85);
        assert_eq!(verdict.basis, VerdictBasis::Static);
        assert!(verdict.reason.contains("Single loop level"));
    }

    #[test]
    fn test_moderate_disagreement_is_inconclusive() {
        let verdict = VerdictReconciler::default().reconcile(
            &fit(ComplexityClass::Linear, 65),
            &signal(ComplexityClass::Quadratic, 65),
        );
        assert_eq!(verdict.complexity, ComplexityClass::Inconclusive);
        assert_eq!(verdict.confidence, 65);
        assert_eq!(verdict.basis, VerdictBasis::Disagreement);
    }

    #[test]
    fn test_both_strong_disagreeing_is_inconclusive() {
        let verdict = VerdictReconciler::default().reconcile(
            &fit(ComplexityClass::Linear, 90),
            &signal(ComplexityClass::Quadratic, 86),
        );
        assert_eq!(verdict.complexity, ComplexityClass::Inconclusive);
        assert_eq!(verdict.confidence, 88);
    }

    #[test]
    fn test_weak_signals_fall_back_to_empirical() {
        let verdict = VerdictReconciler::default().reconcile(
            &fit(ComplexityClass::Cubic, 40),
            &signal(ComplexityClass::Inconclusive, 30),
        );
        assert_eq!(verdict.complexity, ComplexityClass::Cubic);
        assert_eq!(verdict.confidence, 40);
    }

    #[test]
    fn test_fallback_fit_reason() {
        let verdict = VerdictReconciler::default().reconcile(
            &FitResult::fallback(ComplexityClass::Linear, 1),
            &signal(ComplexityClass::Quadratic, 55),
        );
        assert_eq!(verdict.complexity, ComplexityClass::Linear);
        assert_eq!(verdict.confidence, 0);
        assert!(verdict.reason.starts_with("Too few measurements"));
    }

    #[test]
    fn test_every_reason_non_empty() {
        let reconciler = VerdictReconciler::default();
        for emp in [0u8, 30, 60, 85, 100] {
            for stat in [0u8, 30, 60, 85, 100] {
                for same in [true, false] {
                    let detected = if same {
                        ComplexityClass::Linear
                    } else {
                        ComplexityClass::Cubic
                    };
                    let verdict = reconciler
                        .reconcile(&fit(ComplexityClass::Linear, emp), &signal(detected, stat));
                    assert!(!verdict.reason.is_empty());
                    assert!(verdict.confidence <= 100);
                }
            }
        }
    }

    #[test]
    fn test_serializes_static_field() {
        let verdict = VerdictReconciler::default().reconcile(
            &fit(ComplexityClass::Linear, 90),
            &signal(ComplexityClass::Linear, 70),
        );
        let json = serde_json::to_value(&verdict).unwrap();
        assert_eq!(json["static"]["confidence"], 70);
        assert_eq!(json["basis"], "agreement");
    }
}

//! Scaled least-squares fitter
//!
//! For each model `f` of the basis: `s = Σ(f·t) / Σf²`,
//! `error = RSS / TSS` clamped to [0, 1]. A flat series (TSS = 0) scores 0
//! when the model reproduces it exactly and 1 otherwise.
//!
//! Sums below `ZERO_EPSILON · Σt²` count as zero so a constant series is not
//! judged on floating-point residue.

use crate::config::FittingConfig;
use crate::errors::{AnalysisError, Result};
use crate::features::model_fitting::domain::{
    confidence_from_error, ComplexityModel, FitResult, ModelScore, MODEL_BASIS,
};
use crate::shared::models::Measurement;

const ZERO_EPSILON: f64 = 1e-12;

#[derive(Debug, Clone)]
pub struct ModelFitter {
    min_measurements: usize,
    exponential_cap: f64,
}

impl ModelFitter {
    pub fn new(config: &FittingConfig) -> Self {
        Self {
            min_measurements: config.min_measurements,
            exponential_cap: config.exponential_cap,
        }
    }

    pub fn min_measurements(&self) -> usize {
        self.min_measurements
    }

    /// Fit `measurements` against every model of the basis
    ///
    /// Fails with `InsufficientData` below the configured minimum.
    pub fn fit(&self, measurements: &[Measurement]) -> Result<FitResult> {
        if measurements.len() < self.min_measurements {
            return Err(AnalysisError::InsufficientData {
                got: measurements.len(),
                required: self.min_measurements,
            });
        }

        let times: Vec<f64> = measurements.iter().map(|m| m.time_ms).collect();
        let mean = times.iter().sum::<f64>() / times.len() as f64;
        let energy: f64 = times.iter().map(|t| t * t).sum();
        let tiny = ZERO_EPSILON * energy;
        let tss: f64 = times.iter().map(|t| (t - mean).powi(2)).sum();

        let mut ranking: Vec<ModelScore> = MODEL_BASIS
            .iter()
            .filter_map(|model| self.score(model, measurements, &times, tss, tiny))
            .collect();

        // Stable: equal errors keep canonical order
        ranking.sort_by(|a, b| a.normalized_error.total_cmp(&b.normalized_error));

        let best = ranking.first().cloned().ok_or(AnalysisError::InsufficientData {
            got: measurements.len(),
            required: self.min_measurements,
        })?;

        tracing::debug!(
            "Best fit {} (s={:.6e}, error={:.4}) over {} models",
            best.model,
            best.scale_factor,
            best.normalized_error,
            ranking.len()
        );

        Ok(FitResult {
            model: best.model,
            scale_factor: best.scale_factor,
            normalized_error: best.normalized_error,
            confidence: confidence_from_error(best.normalized_error),
            ranking,
            samples: measurements.len(),
        })
    }

    /// Score one model; `None` when any theoretical value is zero or non-finite
    fn score(
        &self,
        model: &ComplexityModel,
        measurements: &[Measurement],
        times: &[f64],
        tss: f64,
        tiny: f64,
    ) -> Option<ModelScore> {
        let values: Vec<f64> = measurements
            .iter()
            .map(|m| model.value(m.n as f64, self.exponential_cap))
            .collect();

        if values.iter().any(|v| !v.is_finite() || *v == 0.0) {
            tracing::trace!("Skipping {}: degenerate values", model.class);
            return None;
        }

        let sum_ft: f64 = values.iter().zip(times).map(|(f, t)| f * t).sum();
        let sum_ff: f64 = values.iter().map(|f| f * f).sum();
        if !sum_ff.is_finite() || sum_ff == 0.0 {
            return None;
        }
        let scale_factor = sum_ft / sum_ff;

        let rss: f64 = values
            .iter()
            .zip(times)
            .map(|(f, t)| (t - scale_factor * f).powi(2))
            .sum();

        let normalized_error = if tss <= tiny {
            if rss <= tiny {
                0.0
            } else {
                1.0
            }
        } else {
            (rss / tss).clamp(0.0, 1.0)
        };

        Some(ModelScore {
            model: model.class,
            scale_factor,
            normalized_error,
        })
    }
}

impl Default for ModelFitter {
    fn default() -> Self {
        Self::new(&FittingConfig::default())
    }
}

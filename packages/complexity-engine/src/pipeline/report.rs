//! Analysis report
//!
//! ```text
//! AnalysisReport
//! ├── session_id, generated_at, language
//! ├── verdict
//! │   ├── complexity, confidence, reason, agreement
//! │   ├── empirical: FitResult
//! │   └── static: StaticSignal
//! ├── samples: Vec<Measurement>
//! ├── notices: Vec<String>
//! └── stage_timings_ms: {stage → ms}
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::features::reconciliation::Verdict;
use crate::shared::models::{Language, Measurement};

/// Result of one analysis request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub session_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub language: Language,
    pub verdict: Verdict,
    /// Measured (n, mean time) pairs in increasing n
    pub samples: Vec<Measurement>,
    /// Clamps, timeouts and fallbacks, in the order they happened
    pub notices: Vec<String>,
    pub stage_timings_ms: BTreeMap<String, u64>,
}

impl AnalysisReport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Short human-readable summary
    pub fn summary(&self) -> String {
        let mut out = format!(
            "Complexity: {} ({}% confidence)\nReason: {}\n",
            self.verdict.complexity, self.verdict.confidence, self.verdict.reason
        );
        out.push_str(&format!(
            "Empirical: {} ({}%, {} samples)\n",
            self.verdict.empirical.model,
            self.verdict.empirical.confidence,
            self.samples.len()
        ));
        out.push_str(&format!(
            "Static: {} ({}%)\n",
            self.verdict.static_signal.detected, self.verdict.static_signal.confidence
        ));
        for line in &self.verdict.static_signal.explanation {
            out.push_str(&format!("  - {}\n", line));
        }
        for notice in &self.notices {
            out.push_str(&format!("Notice: {}\n", notice));
        }
        out
    }
}

//! Analysis request and its validation

use serde::{Deserialize, Serialize};

use crate::config::SamplingConfig;
use crate::errors::{AnalysisError, Result};
use crate::shared::models::{Language, Submission};

/// Request as received from a caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub source_code: String,
    /// "python" or "cpp"
    pub language: String,
    pub max_input_size: u64,
    pub sample_count: usize,
}

impl AnalysisRequest {
    pub fn new(
        source_code: impl Into<String>,
        language: impl Into<String>,
        max_input_size: u64,
        sample_count: usize,
    ) -> Self {
        Self {
            source_code: source_code.into(),
            language: language.into(),
            max_input_size,
            sample_count,
        }
    }

    /// Validate and clamp against the sampling limits
    ///
    /// Zero sizes are rejected. Out-of-range values are adjusted and each
    /// adjustment is reported as a notice.
    pub fn normalize(&self, sampling: &SamplingConfig) -> Result<NormalizedRequest> {
        if self.max_input_size == 0 {
            return Err(AnalysisError::invalid_request(
                "max_input_size must be positive",
            ));
        }
        if self.sample_count == 0 {
            return Err(AnalysisError::invalid_request("sample_count must be positive"));
        }
        let language = Language::from_str(&self.language)?;

        let mut notices = Vec::new();

        let mut max_input_size = self.max_input_size;
        if max_input_size > sampling.max_input_cap {
            notices.push(format!(
                "max_input_size {} clamped to the hard cap {}",
                max_input_size, sampling.max_input_cap
            ));
            max_input_size = sampling.max_input_cap;
        }

        let mut sample_count = self.sample_count;
        if sample_count < sampling.sample_count_floor {
            notices.push(format!(
                "sample_count {} raised to the floor {}",
                sample_count, sampling.sample_count_floor
            ));
            sample_count = sampling.sample_count_floor;
        } else if sample_count > sampling.sample_count_cap {
            notices.push(format!(
                "sample_count {} lowered to the cap {}",
                sample_count, sampling.sample_count_cap
            ));
            sample_count = sampling.sample_count_cap;
        }

        Ok(NormalizedRequest {
            submission: Submission::new(self.source_code.clone(), language),
            max_input_size,
            sample_count,
            notices,
        })
    }
}

/// Request after validation and clamping
#[derive(Debug, Clone)]
pub struct NormalizedRequest {
    pub submission: Submission,
    pub max_input_size: u64,
    pub sample_count: usize,
    /// Adjustments made to the caller's values
    pub notices: Vec<String>,
}

use serde::{Deserialize, Serialize};

use crate::errors::AnalysisError;

/// Submission language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    Cpp,
}

impl Language {
    /// Parse language from string
    ///
    /// Accepts the common aliases ("py", "c++").
    pub fn from_str(s: &str) -> Result<Self, AnalysisError> {
        match s.trim().to_lowercase().as_str() {
            "python" | "py" | "python3" => Ok(Self::Python),
            "cpp" | "c++" | "cxx" => Ok(Self::Cpp),
            _ => Err(AnalysisError::UnsupportedLanguage(s.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::Cpp => "cpp",
        }
    }

    /// Does execution need a compile step?
    pub fn is_compiled(&self) -> bool {
        matches!(self, Self::Cpp)
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User program under analysis (immutable for one analysis)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    source_code: String,
    language: Language,
}

impl Submission {
    pub fn new(source_code: impl Into<String>, language: Language) -> Self {
        Self {
            source_code: source_code.into(),
            language,
        }
    }

    pub fn source_code(&self) -> &str {
        &self.source_code
    }

    pub fn language(&self) -> Language {
        self.language
    }
}

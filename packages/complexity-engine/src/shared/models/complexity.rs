use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Big-O complexity classes
///
/// Ordered by computational cost (ascending). `Inconclusive` sorts last and is
/// never produced by the model basis, only by the static analyzer and the
/// reconciler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComplexityClass {
    /// O(1) - Constant time
    Constant,
    /// O(log n) - Logarithmic time
    Logarithmic,
    /// O(n) - Linear time
    Linear,
    /// O(n log n) - Linearithmic time
    Linearithmic,
    /// O(n²) - Quadratic time
    Quadratic,
    /// O(n³) - Cubic time
    Cubic,
    /// O(2^n) - Exponential time
    Exponential,
    /// No conclusive answer
    Inconclusive,
}

impl ComplexityClass {
    /// Canonical classes, in evaluation order
    pub const CANONICAL: [ComplexityClass; 7] = [
        Self::Constant,
        Self::Logarithmic,
        Self::Linear,
        Self::Linearithmic,
        Self::Quadratic,
        Self::Cubic,
        Self::Exponential,
    ];

    /// Get string representation (e.g., "O(n)")
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Constant => "O(1)",
            Self::Logarithmic => "O(log n)",
            Self::Linear => "O(n)",
            Self::Linearithmic => "O(n log n)",
            Self::Quadratic => "O(n^2)",
            Self::Cubic => "O(n^3)",
            Self::Exponential => "O(2^n)",
            Self::Inconclusive => "Inconclusive",
        }
    }

    /// Lowercase name (config files, CLI)
    pub fn name(&self) -> &'static str {
        match self {
            Self::Constant => "constant",
            Self::Logarithmic => "logarithmic",
            Self::Linear => "linear",
            Self::Linearithmic => "linearithmic",
            Self::Quadratic => "quadratic",
            Self::Cubic => "cubic",
            Self::Exponential => "exponential",
            Self::Inconclusive => "inconclusive",
        }
    }

    /// Parse from a lowercase name or Big-O label
    pub fn from_str(s: &str) -> Result<Self, String> {
        let normalized = s.trim().to_lowercase().replace('²', "^2").replace('³', "^3");
        match normalized.as_str() {
            "constant" | "o(1)" => Ok(Self::Constant),
            "logarithmic" | "o(log n)" => Ok(Self::Logarithmic),
            "linear" | "o(n)" => Ok(Self::Linear),
            "linearithmic" | "o(n log n)" => Ok(Self::Linearithmic),
            "quadratic" | "o(n^2)" => Ok(Self::Quadratic),
            "cubic" | "o(n^3)" => Ok(Self::Cubic),
            "exponential" | "o(2^n)" => Ok(Self::Exponential),
            "inconclusive" => Ok(Self::Inconclusive),
            _ => Err(format!("Unknown complexity class '{}'", s)),
        }
    }

    pub fn is_conclusive(&self) -> bool {
        *self != Self::Inconclusive
    }

    /// Get ordering index for comparison
    fn order_index(&self) -> u8 {
        match self {
            Self::Constant => 0,
            Self::Logarithmic => 1,
            Self::Linear => 2,
            Self::Linearithmic => 3,
            Self::Quadratic => 4,
            Self::Cubic => 5,
            Self::Exponential => 6,
            Self::Inconclusive => 7,
        }
    }
}

impl PartialOrd for ComplexityClass {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ComplexityClass {
    fn cmp(&self, other: &Self) -> Ordering {
        self.order_index().cmp(&other.order_index())
    }
}

impl std::fmt::Display for ComplexityClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complexity_ordering() {
        assert!(ComplexityClass::Constant < ComplexityClass::Linear);
        assert!(ComplexityClass::Linear < ComplexityClass::Quadratic);
        assert!(ComplexityClass::Quadratic < ComplexityClass::Exponential);
        assert!(ComplexityClass::Exponential < ComplexityClass::Inconclusive);
    }

    #[test]
    fn test_parse_names_and_labels() {
        assert_eq!(ComplexityClass::from_str("linear").unwrap(), ComplexityClass::Linear);
        assert_eq!(ComplexityClass::from_str("O(n log n)").unwrap(), ComplexityClass::Linearithmic);
        assert_eq!(ComplexityClass::from_str("O(n²)").unwrap(), ComplexityClass::Quadratic);
        assert_eq!(ComplexityClass::from_str("O(n^3)").unwrap(), ComplexityClass::Cubic);
        assert!(ComplexityClass::from_str("O(n!)").is_err());
    }

    #[test]
    fn test_canonical_excludes_inconclusive() {
        assert_eq!(ComplexityClass::CANONICAL.len(), 7);
        assert!(ComplexityClass::CANONICAL.iter().all(|c| c.is_conclusive()));
        assert!(ComplexityClass::CANONICAL.windows(2).all(|w| w[0] < w[1]));
    }
}

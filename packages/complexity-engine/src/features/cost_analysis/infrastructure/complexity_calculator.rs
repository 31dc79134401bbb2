//! Complexity Calculator
//!
//! Cost composition over loop sites: nested loops multiply, sequential loops
//! take the max. Each site's class comes from the kinds on its nesting chain.

use crate::features::cost_analysis::domain::{confidence, LoopKind, LoopSite, StaticSignal};
use crate::shared::models::ComplexityClass;

/// Calculate overall complexity from loop sites
///
/// Examples:
/// ```text
/// for i in range(n):            → O(n)
///     j = 1
///     while j < n: j *= 2       → O(n log n)
///
/// for i in range(n):
///     for j in range(n):        → O(n²)
/// ```
#[derive(Debug, Default)]
pub struct ComplexityCalculator;

impl ComplexityCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Class contributed by one loop site, `None` when its chain has no bounded loop
    pub fn site_class(&self, site: &LoopSite) -> Option<ComplexityClass> {
        let linear = site.count(LoopKind::Linear);
        let log = site.count(LoopKind::Logarithmic);

        match (linear, log) {
            (0, 0) => None,
            (0, _) => Some(ComplexityClass::Logarithmic),
            (1, l) if l > 0 => Some(ComplexityClass::Linearithmic),
            (1, _) => Some(ComplexityClass::Linear),
            (2, _) => Some(ComplexityClass::Quadratic),
            _ => Some(ComplexityClass::Cubic),
        }
    }

    /// Calculate the loop-derived signal
    ///
    /// Returns `None` when there are no loops at all.
    pub fn calculate(&self, loops: &[LoopSite]) -> Option<StaticSignal> {
        if loops.is_empty() {
            return None;
        }

        let mut dominant: Option<(&LoopSite, ComplexityClass)> = None;
        for site in loops {
            if let Some(class) = self.site_class(site) {
                if dominant.map_or(true, |(_, best)| class > best) {
                    dominant = Some((site, class));
                }
            }
        }

        let unbounded: Vec<&LoopSite> = loops
            .iter()
            .filter(|s| s.kind == LoopKind::Unbounded)
            .collect();

        let Some((site, class)) = dominant else {
            let lines: Vec<String> = unbounded.iter().map(|s| s.line.to_string()).collect();
            return Some(StaticSignal::new(
                ComplexityClass::Inconclusive,
                confidence::INCONCLUSIVE,
                vec![
                    "Loops found but none has a recognisable bound".to_string(),
                    format!("Unbounded loops on line(s) {}", lines.join(", ")),
                ],
            ));
        };

        let (base, reason) = match class {
            ComplexityClass::Logarithmic => (
                confidence::LOG_LOOP,
                format!(
                    "{} on line {} halves or doubles its guard variable",
                    site.form.as_str(),
                    site.line
                ),
            ),
            ComplexityClass::Linearithmic => (
                confidence::LOG_LOOP_IN_LINEAR,
                format!(
                    "{} on line {} halves or doubles its guard variable inside a linear loop",
                    site.form.as_str(),
                    site.line
                ),
            ),
            ComplexityClass::Cubic => (
                confidence::CUBIC_NESTING,
                format!("Deepest loop nesting is {} (line {})", site.depth(), site.line),
            ),
            ComplexityClass::Quadratic => (
                confidence::QUADRATIC_NESTING,
                format!("Deepest loop nesting is {} (line {})", site.depth(), site.line),
            ),
            _ => (
                confidence::SINGLE_LOOP,
                format!("Single loop level ({} on line {})", site.form.as_str(), site.line),
            ),
        };

        let mut explanation = vec![reason];
        let mut score = base;
        if !unbounded.is_empty() {
            score = score.saturating_sub(confidence::UNBOUNDED_PENALTY);
            explanation.push(format!(
                "{} loop(s) without a recognisable bound; confidence reduced",
                unbounded.len()
            ));
        }

        tracing::debug!(
            "Calculated loop complexity: {} (line={}, depth={}, unbounded={})",
            class.as_str(),
            site.line,
            site.depth(),
            unbounded.len()
        );

        Some(StaticSignal::new(class, score, explanation))
    }
}

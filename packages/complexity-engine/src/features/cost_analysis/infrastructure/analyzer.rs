//! Static Analyzer
//!
//! Main entry point for static cost analysis.
//!
//! Algorithm:
//! 1. Syntax sanity check (fails the request on error)
//! 2. Mask comments and literals
//! 3. Library sort/search calls
//! 4. Recursion: exponential, divide-and-conquer, plain
//! 5. Loop nesting via `ComplexityCalculator`
//! 6. Nothing found → constant
//!
//! Rules are tried in that order and the first match wins.

use crate::errors::Result;
use crate::features::cost_analysis::domain::{confidence, FunctionSite, StaticSignal};
use crate::features::cost_analysis::infrastructure::complexity_calculator::ComplexityCalculator;
use crate::features::cost_analysis::infrastructure::functions::extract_functions;
use crate::features::cost_analysis::infrastructure::loop_nesting::find_loops;
use crate::features::cost_analysis::infrastructure::patterns::library_call;
use crate::features::cost_analysis::infrastructure::source_scanner::scan;
use crate::features::cost_analysis::infrastructure::syntax::{check_cpp, check_python};
use crate::shared::models::{ComplexityClass, Language};

/// Static Analyzer
///
/// Responsibilities:
/// - Reject source that does not parse
/// - Match library, recursion and loop signatures
///
/// NOT Responsible For:
/// - Running the code (ExecutionSandbox)
/// - Merging with measurements (VerdictReconciler)
#[derive(Debug, Default)]
pub struct StaticAnalyzer {
    complexity_calc: ComplexityCalculator,
}

impl StaticAnalyzer {
    pub fn new() -> Self {
        Self {
            complexity_calc: ComplexityCalculator::new(),
        }
    }

    /// Analyze with a language name (`"python"`, `"cpp"`)
    pub fn analyze_named(&self, source_code: &str, language: &str) -> Result<StaticSignal> {
        let language = Language::from_str(language)?;
        self.analyze(source_code, language)
    }

    /// Analyze a submission's source
    ///
    /// Returns `AnalysisError::Syntax` when the source fails the syntax check.
    pub fn analyze(&self, source_code: &str, language: Language) -> Result<StaticSignal> {
        let scanned = scan(source_code, language);
        match language {
            Language::Python => check_python(source_code)?,
            Language::Cpp => check_cpp(&scanned)?,
        }
        let code = scanned.code.as_str();

        if let Some(m) = library_call(language).find(code) {
            let call = m.as_str().trim_end_matches('(').trim_end();
            let signal = StaticSignal::new(
                ComplexityClass::Linearithmic,
                confidence::LIBRARY_CALL,
                vec![format!(
                    "Library call `{}` on line {} sorts or searches the input",
                    call,
                    line_of(code, m.start())
                )],
            );
            return Ok(self.finish(language, signal));
        }

        let functions = extract_functions(code, language);
        if let Some(signal) = recursion_signal(&functions) {
            return Ok(self.finish(language, signal));
        }

        let loops = find_loops(code, language);
        let signal = self.complexity_calc.calculate(&loops).unwrap_or_else(|| {
            StaticSignal::new(
                ComplexityClass::Constant,
                confidence::CONSTANT,
                vec!["No loops or recursion found".to_string()],
            )
        });
        Ok(self.finish(language, signal))
    }

    fn finish(&self, language: Language, signal: StaticSignal) -> StaticSignal {
        tracing::debug!(
            "Static analysis ({}): {} @ {} ({})",
            language,
            signal.detected.as_str(),
            signal.confidence,
            signal.explanation.join("; ")
        );
        signal
    }
}

/// Recursion rules, in priority order
fn recursion_signal(functions: &[FunctionSite]) -> Option<StaticSignal> {
    if let Some(f) = functions
        .iter()
        .find(|f| f.self_calls >= 2 && !f.halves_input)
    {
        return Some(StaticSignal::new(
            ComplexityClass::Exponential,
            confidence::EXPONENTIAL_RECURSION,
            vec![format!(
                "`{}` (line {}) calls itself {} times without halving its input",
                f.name, f.line, f.self_calls
            )],
        ));
    }

    if let Some(f) = functions
        .iter()
        .find(|f| f.is_recursive() && f.halves_input)
    {
        let signal = if f.linear_pass {
            StaticSignal::new(
                ComplexityClass::Linearithmic,
                confidence::DIVIDE_AND_CONQUER_LINEAR_PASS,
                vec![format!(
                    "`{}` (line {}) halves its input and does a linear pass per level",
                    f.name, f.line
                )],
            )
        } else {
            StaticSignal::new(
                ComplexityClass::Logarithmic,
                confidence::DIVIDE_AND_CONQUER,
                vec![format!(
                    "`{}` (line {}) halves its input on each call",
                    f.name, f.line
                )],
            )
        };
        return Some(signal);
    }

    functions.iter().find(|f| f.self_calls == 1).map(|f| {
        StaticSignal::new(
            ComplexityClass::Linear,
            confidence::GENERIC_RECURSION,
            vec![format!(
                "`{}` (line {}) calls itself once per level",
                f.name, f.line
            )],
        )
    })
}

fn line_of(code: &str, byte_pos: usize) -> usize {
    code[..byte_pos].matches('\n').count() + 1
}

//! Timing harness builders
//!
//! A harness binds `n`, embeds the submission verbatim, times the submission
//! plus its entry point (when defined) and prints the elapsed milliseconds as
//! the last line of stdout.

use regex::Regex;

use crate::features::cost_analysis::infrastructure::functions::matching;
use crate::features::cost_analysis::infrastructure::patterns::{CPP_FUNCTION_DEF, CPP_NON_FUNCTIONS};
use crate::features::cost_analysis::infrastructure::source_scanner::scan;
use crate::shared::models::Language;

/// Python harness
///
/// The user code runs at module level between the two timer reads, so both
/// script-style snippets and `solve(n)` definitions are timed.
pub fn python_harness(source_code: &str, n: u64, entry_point: &str) -> String {
    let (future_imports, body) = split_future_imports(source_code);
    format!(
        r#"{future_imports}import time as _ce_time
n = {n}
_ce_start = _ce_time.perf_counter()
{body}
if callable(globals().get("{entry_point}")):
    {entry_point}({n})
_ce_elapsed_ms = (_ce_time.perf_counter() - _ce_start) * 1000.0
print()
print("%.6f" % _ce_elapsed_ms)
"#
    )
}

/// `from __future__` imports must stay first in a Python module
fn split_future_imports(source_code: &str) -> (String, String) {
    let mut hoisted = String::new();
    let mut body = String::new();
    for line in source_code.lines() {
        if line.starts_with("from __future__ import") {
            hoisted.push_str(line);
            hoisted.push('\n');
        } else {
            body.push_str(line);
            body.push('\n');
        }
    }
    (hoisted, body)
}

/// How the C++ submission is placed in the harness
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CppLayout {
    /// Submission defines the entry point; code at file scope, `entry(n)` timed
    EntryPoint,
    /// Submission defines `int main()`; it is renamed and called
    OwnMain,
    /// Plain statements; placed inside `main` between the timer reads, with
    /// top-level function definitions moved to file scope
    Statements,
}

const USER_MAIN: &str = "complexity_user_main";

/// Decide where the submission goes
pub fn cpp_layout(source_code: &str, entry_point: &str) -> CppLayout {
    if defines_function(source_code, entry_point) {
        CppLayout::EntryPoint
    } else if defines_function(source_code, "main") {
        CppLayout::OwnMain
    } else {
        CppLayout::Statements
    }
}

/// Does the source contain a definition `name(...) {`?
fn defines_function(source_code: &str, name: &str) -> bool {
    let pattern = format!(r"\b{}\s*\([^;{{}}]*\)\s*(?:const\s*)?\{{", regex::escape(name));
    Regex::new(&pattern)
        .map(|re| re.is_match(source_code))
        .unwrap_or(false)
}

/// C++ harness
pub fn cpp_harness(source_code: &str, n: u64, entry_point: &str) -> String {
    const PRELUDE: &str = "#include <bits/stdc++.h>\nusing namespace std;\n";
    const REPORT: &str = r#"    auto _ce_stop = std::chrono::steady_clock::now();
    double _ce_elapsed_ms = std::chrono::duration<double, std::milli>(_ce_stop - _ce_start).count();
    std::cout << '\n' << std::fixed << std::setprecision(6) << _ce_elapsed_ms << std::endl;
    return 0;
}
"#;

    match cpp_layout(source_code, entry_point) {
        CppLayout::EntryPoint => format!(
            "{PRELUDE}static long long n = {n};\n{source_code}\n\
             int main() {{\n    auto _ce_start = std::chrono::steady_clock::now();\n    \
             (void){entry_point}(n);\n{REPORT}"
        ),
        CppLayout::OwnMain => {
            let renamed = Regex::new(r"\bmain\s*\(")
                .map(|re| re.replace(source_code, format!("{USER_MAIN}(")).into_owned())
                .unwrap_or_else(|_| source_code.to_string());
            format!(
                "{PRELUDE}static long long n = {n};\n{renamed}\n\
                 int main() {{\n    auto _ce_start = std::chrono::steady_clock::now();\n    \
                 (void){USER_MAIN}();\n{REPORT}"
            )
        }
        CppLayout::Statements => {
            let (directives, rest) = split_directives(source_code);
            let (definitions, body) = hoist_definitions(&rest);
            format!(
                "{PRELUDE}{directives}static long long n = {n};\n{definitions}\
                 int main() {{\n    auto _ce_start = std::chrono::steady_clock::now();\n    \
                 {{\n{body}\n    }}\n{REPORT}"
            )
        }
    }
}

/// Preprocessor lines and `using namespace` cannot live inside `main`
fn split_directives(source_code: &str) -> (String, String) {
    let mut directives = String::new();
    let mut body = String::new();
    for line in source_code.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with('#') || trimmed.starts_with("using namespace") {
            directives.push_str(trimmed);
            directives.push('\n');
        } else {
            body.push_str(line);
            body.push('\n');
        }
    }
    (directives, body)
}

/// Move function definitions at brace depth 0 out of a statements body
///
/// Returns `(definitions, remaining statements)`. Boundaries are found on the
/// masked copy so braces inside literals and comments do not count.
fn hoist_definitions(body: &str) -> (String, String) {
    let masked = scan(body, Language::Cpp).code;
    let to_body = offset_map(&masked, body);

    let mut spans: Vec<(usize, usize)> = Vec::new();
    for caps in CPP_FUNCTION_DEF.captures_iter(&masked) {
        let (Some(head), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if CPP_NON_FUNCTIONS.contains(&name.as_str())
            || spans.iter().any(|&(_, end)| head.start() < end)
            || brace_depth(&masked[..head.start()]) != 0
        {
            continue;
        }
        let open = head.end() - 1;
        let Some(close) = matching(&masked, open, '{', '}') else {
            continue;
        };
        // The return type and any `template<...>` precede the name
        let start = masked[..head.start()]
            .rfind(|c| matches!(c, ';' | '}' | '{'))
            .map_or(0, |i| i + 1);
        spans.push((start, close + 1));
    }

    if spans.is_empty() {
        return (String::new(), body.to_string());
    }

    let mut definitions = String::new();
    let mut remaining = String::new();
    let mut cursor = 0;
    for (start, end) in spans {
        let (start, end) = (to_body(start), to_body(end));
        remaining.push_str(&body[cursor..start]);
        definitions.push_str(body[start..end].trim());
        definitions.push('\n');
        cursor = end;
    }
    remaining.push_str(&body[cursor..]);
    (definitions, remaining)
}

fn brace_depth(code: &str) -> i64 {
    code.chars().fold(0, |depth, c| match c {
        '{' => depth + 1,
        '}' => depth - 1,
        _ => depth,
    })
}

/// Map byte offsets in `masked` to byte offsets in `original`
///
/// Masking replaces one char with one char, so char positions line up even
/// when multi-byte chars inside literals were blanked.
fn offset_map<'a>(masked: &'a str, original: &'a str) -> impl Fn(usize) -> usize + 'a {
    let original_offsets: Vec<usize> = original
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(original.len()))
        .collect();
    move |byte| {
        let chars = masked[..byte].chars().count();
        original_offsets
            .get(chars)
            .copied()
            .unwrap_or(original.len())
    }
}

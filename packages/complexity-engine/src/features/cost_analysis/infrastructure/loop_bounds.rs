//! Loop bound inference
//!
//! Classifies a loop by how its guard variables change in the body:
//! - multiplied/divided/shifted, or reassigned next to a halving expression
//!   (binary search) → logarithmic
//! - incremented/decremented, or a guarded collection drained → linear
//! - nothing recognisable → unbounded

use regex::Regex;

use super::patterns::{guard_variables, HALVING};
use crate::features::cost_analysis::domain::LoopKind;

fn var_pattern(template: &str, var: &str) -> Option<Regex> {
    Regex::new(&template.replace("VAR", &regex::escape(var))).ok()
}

fn any_var_matches(templates: &[&str], vars: &[String], text: &str) -> bool {
    vars.iter().any(|var| {
        templates
            .iter()
            .filter_map(|t| var_pattern(t, var))
            .any(|re| re.is_match(text))
    })
}

const MULTIPLICATIVE: &[&str] = &[
    r"\bVAR\s*(?:\*|//|/|<<|>>)=",
    r"\bVAR\s*=\s*[^=][^;\n]*?\bVAR\s*(?:\*|//|/|<<|>>)",
    r"\bVAR\s*=\s*\d+\s*\*\s*VAR\b",
];

const ADDITIVE: &[&str] = &[
    r"\bVAR\s*(?:\+|-)=",
    r"\bVAR\s*(?:\+\+|--)",
    r"(?:\+\+|--)\s*VAR\b",
    r"\bVAR\s*=\s*[^=][^;\n]*?\bVAR\s*[+-]",
    r"\bVAR\s*=\s*[^=][^;\n]*?[+-]\s*VAR\b",
    r"\bVAR\s*=\s*VAR\s*(?:->|\.)\s*\w+",
];

const DRAINS: &[&str] = &[
    r"\bVAR\s*\.\s*(?:pop|popleft|pop_back|pop_front|erase|remove|clear)\s*\(",
    r"\bdel\s+VAR\s*\[",
];

const ASSIGNS: &[&str] = &[r"\bVAR\s*=[^=]"];

/// Multiplicative update of any guard variable
pub fn is_multiplicative(text: &str, vars: &[String]) -> bool {
    any_var_matches(MULTIPLICATIVE, vars, text)
}

/// `while`-style loop: guard expression plus body text
pub fn classify_conditional(guard: &str, body: &str) -> LoopKind {
    let vars = guard_variables(guard);
    if vars.is_empty() {
        return LoopKind::Unbounded;
    }
    if is_multiplicative(body, &vars)
        || (HALVING.is_match(body) && any_var_matches(ASSIGNS, &vars, body))
    {
        return LoopKind::Logarithmic;
    }
    if any_var_matches(ADDITIVE, &vars, body) || any_var_matches(DRAINS, &vars, body) {
        return LoopKind::Linear;
    }
    LoopKind::Unbounded
}

/// C++ `for (...)` header plus body text
pub fn classify_cpp_for(header: &str, body: &str) -> LoopKind {
    let parts = split_top_level(header, ';');
    if parts.len() != 3 {
        // range-based for
        return if header.contains(':') {
            LoopKind::Linear
        } else {
            LoopKind::Unbounded
        };
    }

    let (init, cond, update) = (parts[0], parts[1].trim(), parts[2].trim());
    if cond.is_empty() {
        return LoopKind::Unbounded;
    }

    let mut vars = guard_variables(cond);
    for v in guard_variables(init) {
        if !vars.contains(&v) {
            vars.push(v);
        }
    }
    if is_multiplicative(update, &vars) {
        return LoopKind::Logarithmic;
    }
    if !update.is_empty() {
        return LoopKind::Linear;
    }
    classify_conditional(cond, body)
}

fn split_top_level(text: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            c if c == sep && depth == 0 => {
                parts.push(&text[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

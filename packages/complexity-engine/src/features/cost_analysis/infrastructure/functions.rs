//! Function extraction and recursion facts
//!
//! Python bodies end at the first non-blank line indented no deeper than the
//! `def`; C++ bodies run from the opening brace to its match.

use super::patterns::{
    call_of, CPP_FUNCTION_DEF, CPP_NON_FUNCTIONS, HALVING, LOOP_KEYWORD, MERGE_OR_COPY,
    PY_FUNCTION_DEF, PY_SLICE,
};
use crate::features::cost_analysis::domain::FunctionSite;
use crate::shared::models::Language;

pub fn extract_functions(code: &str, language: Language) -> Vec<FunctionSite> {
    let bodies = match language {
        Language::Python => python_bodies(code),
        Language::Cpp => cpp_bodies(code),
    };

    bodies
        .into_iter()
        .map(|(name, line, body)| describe(name, line, body, language))
        .collect()
}

fn describe(name: String, line: usize, body: &str, language: Language) -> FunctionSite {
    let self_calls = call_of(&name).map_or(0, |re| re.find_iter(body).count());
    let linear_pass = LOOP_KEYWORD.is_match(body)
        || MERGE_OR_COPY.is_match(body)
        || (language == Language::Python && PY_SLICE.is_match(body));

    FunctionSite {
        name,
        line,
        self_calls,
        halves_input: HALVING.is_match(body),
        linear_pass,
    }
}

fn line_of(code: &str, byte_pos: usize) -> usize {
    code[..byte_pos].matches('\n').count() + 1
}

fn python_bodies(code: &str) -> Vec<(String, usize, &str)> {
    let mut found = Vec::new();

    for caps in PY_FUNCTION_DEF.captures_iter(code) {
        let (Some(whole), Some(indent), Some(name)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            continue;
        };
        let def_indent = indent_width(indent.as_str());

        // Header ends at the ':' after the closing paren of the parameter list
        let params_open = whole.end() - 1;
        let Some(params_close) = matching(code, params_open, '(', ')') else {
            continue;
        };
        let body_start = code[params_close..]
            .find(':')
            .map_or(params_close, |i| params_close + i + 1);

        let mut body_end = code.len();
        let mut offset = code[body_start..]
            .find('\n')
            .map_or(code.len(), |i| body_start + i + 1);
        while offset < code.len() {
            let line_end = code[offset..]
                .find('\n')
                .map_or(code.len(), |i| offset + i + 1);
            let text = &code[offset..line_end];
            if !text.trim().is_empty() && indent_width(text) <= def_indent {
                body_end = offset;
                break;
            }
            offset = line_end;
        }

        found.push((
            name.as_str().to_string(),
            line_of(code, whole.start()),
            &code[body_start..body_end],
        ));
    }
    found
}

fn cpp_bodies(code: &str) -> Vec<(String, usize, &str)> {
    let mut found = Vec::new();

    for caps in CPP_FUNCTION_DEF.captures_iter(code) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if CPP_NON_FUNCTIONS.contains(&name.as_str()) {
            continue;
        }
        let open = whole.end() - 1;
        let Some(close) = matching(code, open, '{', '}') else {
            continue;
        };
        found.push((
            name.as_str().to_string(),
            line_of(code, whole.start()),
            &code[open + 1..close],
        ));
    }
    found
}

/// Leading whitespace width (tab = 4)
pub fn indent_width(line: &str) -> usize {
    line.chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .map(|c| if c == '\t' { 4 } else { 1 })
        .sum()
}

/// Byte index of the delimiter closing the one at `open`
pub fn matching(code: &str, open: usize, opener: char, closer: char) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in code[open..].char_indices() {
        if c == opener {
            depth += 1;
        } else if c == closer {
            depth = depth.checked_sub(1)?;
            if depth == 0 {
                return Some(open + i);
            }
        }
    }
    None
}

//! Syntax sanity check
//!
//! Python is parsed with tree-sitter-python; any ERROR or MISSING node fails.
//! C++ gets a structural check on the masked source: terminated literals and
//! comments, balanced `()[]{}`, and at least one `;` or `}`.

use tree_sitter::{Node, Parser};

use super::source_scanner::ScannedSource;
use crate::errors::{AnalysisError, Result};

pub fn check_python(source_code: &str) -> Result<()> {
    if source_code.trim().is_empty() {
        return Err(AnalysisError::syntax("empty source"));
    }

    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::language())
        .map_err(|e| AnalysisError::syntax(format!("Failed to set language: {}", e)))?;
    let tree = parser
        .parse(source_code, None)
        .ok_or_else(|| AnalysisError::syntax("parser produced no tree"))?;

    let root = tree.root_node();
    if !root.has_error() {
        return Ok(());
    }

    let message = match first_error(root) {
        Some(node) if node.is_missing() => format!(
            "missing '{}' on line {}",
            node.kind(),
            node.start_position().row + 1
        ),
        Some(node) => format!("invalid syntax on line {}", node.start_position().row + 1),
        None => "invalid syntax".to_string(),
    };
    Err(AnalysisError::syntax(message))
}

/// Leftmost ERROR or MISSING node
fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    (0..node.child_count())
        .filter_map(|i| node.child(i))
        .find_map(first_error)
}

pub fn check_cpp(scanned: &ScannedSource) -> Result<()> {
    if scanned.code.trim().is_empty() {
        return Err(AnalysisError::syntax("empty source"));
    }
    if let Some(problem) = &scanned.lexical_error {
        return Err(AnalysisError::syntax(problem.clone()));
    }

    let mut open: Vec<(char, usize)> = Vec::new();
    let mut line = 1;
    for c in scanned.code.chars() {
        match c {
            '\n' => line += 1,
            '(' | '[' | '{' => open.push((c, line)),
            ')' | ']' | '}' => {
                let expected = match c {
                    ')' => '(',
                    ']' => '[',
                    _ => '{',
                };
                match open.pop() {
                    Some((opener, _)) if opener == expected => {}
                    Some((opener, opened_on)) => {
                        return Err(AnalysisError::syntax(format!(
                            "'{}' on line {} does not close '{}' from line {}",
                            c, line, opener, opened_on
                        )))
                    }
                    None => {
                        return Err(AnalysisError::syntax(format!(
                            "unexpected '{}' on line {}",
                            c, line
                        )))
                    }
                }
            }
            _ => {}
        }
    }

    if let Some((opener, opened_on)) = open.pop() {
        return Err(AnalysisError::syntax(format!(
            "'{}' opened on line {} is never closed",
            opener, opened_on
        )));
    }

    if !scanned.code.contains(';') && !scanned.code.contains('}') {
        return Err(AnalysisError::syntax("no statement terminator found"));
    }
    Ok(())
}

//! Line-based loop nesting
//!
//! Python: an indentation stack of open loop blocks. Lines inside open
//! brackets continue the previous logical line and never open or close blocks.
//! Every `for` clause of a comprehension adds one nested linear loop.
//!
//! C++: a brace-frame stack. A loop whose body is not a block stays open
//! until the next `;` at its own depth, or until a block closes back to it.
//! The `while (...)` tail of a `do { } while (...)` is consumed with the loop.
//!
//! Both are approximations of block structure; no call graph is followed.

use super::functions::{indent_width, matching};
use super::loop_bounds::{classify_conditional, classify_cpp_for};
use super::patterns::{PY_FOR_CLAUSE, PY_LOOP_HEAD};
use crate::features::cost_analysis::domain::{LoopForm, LoopKind, LoopSite};
use crate::shared::models::Language;

pub fn find_loops(code: &str, language: Language) -> Vec<LoopSite> {
    match language {
        Language::Python => python_loops(code),
        Language::Cpp => cpp_loops(code),
    }
}

// ============================================================================
// Python
// ============================================================================

fn python_loops(code: &str) -> Vec<LoopSite> {
    let lines: Vec<&str> = code.lines().collect();
    let mut sites = Vec::new();
    let mut open: Vec<(usize, LoopKind)> = Vec::new();
    let mut bracket_depth: i32 = 0;

    for (idx, line) in lines.iter().enumerate() {
        let trimmed = line.trim();
        let continuation = bracket_depth > 0;
        bracket_depth += bracket_delta(line);
        if trimmed.is_empty() {
            continue;
        }

        if !continuation {
            let indent = indent_width(line);
            while open.last().map_or(false, |(i, _)| *i >= indent) {
                open.pop();
            }
        }

        let base: Vec<LoopKind> = open.iter().map(|(_, k)| *k).collect();
        let head = if continuation {
            None
        } else {
            PY_LOOP_HEAD
                .captures(trimmed)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str())
        };

        let mut comprehension_fors = PY_FOR_CLAUSE.find_iter(trimmed).count();
        if head == Some("for") {
            comprehension_fors = comprehension_fors.saturating_sub(1);
        }
        let mut chain = base.clone();
        for _ in 0..comprehension_fors {
            chain.push(LoopKind::Linear);
            sites.push(LoopSite {
                line: idx + 1,
                form: LoopForm::Comprehension,
                kind: LoopKind::Linear,
                chain: chain.clone(),
            });
        }

        if let Some(keyword) = head {
            let (form, kind) = if keyword == "for" {
                (LoopForm::For, LoopKind::Linear)
            } else {
                let guard = while_guard(trimmed);
                let body = python_block(&lines, idx);
                (LoopForm::While, classify_conditional(guard, &body))
            };
            let mut chain = base;
            chain.push(kind);
            sites.push(LoopSite {
                line: idx + 1,
                form,
                kind,
                chain,
            });
            open.push((indent_width(line), kind));
        }
    }
    sites
}

fn bracket_delta(line: &str) -> i32 {
    line.chars().fold(0, |acc, c| match c {
        '(' | '[' | '{' => acc + 1,
        ')' | ']' | '}' => acc - 1,
        _ => acc,
    })
}

/// `while <guard>:` → guard
fn while_guard(head: &str) -> &str {
    let rest = head.trim_start_matches("while").trim_start();
    match header_colon(rest) {
        Some(end) => &rest[..end],
        None => rest,
    }
}

/// First `:` outside brackets that is not part of `:=`
fn header_colon(text: &str) -> Option<usize> {
    let mut depth = 0i32;
    let bytes = text.as_bytes();
    for (i, c) in text.char_indices() {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            ':' if depth == 0 && bytes.get(i + 1) != Some(&b'=') => return Some(i),
            _ => {}
        }
    }
    None
}

/// Lines indented deeper than line `idx`, plus any inline body after its colon
fn python_block(lines: &[&str], idx: usize) -> String {
    let head_indent = indent_width(lines[idx]);
    let mut body = String::new();
    if let Some(colon) = header_colon(lines[idx]) {
        body.push_str(&lines[idx][colon + 1..]);
        body.push('\n');
    }
    for line in &lines[idx + 1..] {
        if line.trim().is_empty() {
            continue;
        }
        if indent_width(line) <= head_indent {
            break;
        }
        body.push_str(line);
        body.push('\n');
    }
    body
}

// ============================================================================
// C++
// ============================================================================

struct Frame {
    loop_kind: Option<LoopKind>,
    /// Closing this frame must consume a `while (...);` tail
    do_tail: bool,
}

struct CppScanner<'a> {
    code: &'a str,
    line_starts: Vec<usize>,
    frames: Vec<Frame>,
    /// Braceless loops: (frame depth at the header, kind)
    pending: Vec<(usize, LoopKind)>,
    sites: Vec<LoopSite>,
}

impl<'a> CppScanner<'a> {
    fn new(code: &'a str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(code.match_indices('\n').map(|(i, _)| i + 1));
        Self {
            code,
            line_starts,
            frames: Vec::new(),
            pending: Vec::new(),
            sites: Vec::new(),
        }
    }

    fn line_of(&self, pos: usize) -> usize {
        self.line_starts.partition_point(|start| *start <= pos)
    }

    /// Loop kinds enclosing the current position, outermost first
    fn chain(&self) -> Vec<LoopKind> {
        let mut chain = Vec::new();
        for depth in 0..=self.frames.len() {
            if depth > 0 {
                if let Some(kind) = self.frames[depth - 1].loop_kind {
                    chain.push(kind);
                }
            }
            chain.extend(
                self.pending
                    .iter()
                    .filter(|(d, _)| *d == depth)
                    .map(|(_, k)| *k),
            );
        }
        chain
    }

    fn skip_ws(&self, mut pos: usize) -> usize {
        while let Some(c) = self.code[pos..].chars().next() {
            if !c.is_whitespace() {
                break;
            }
            pos += c.len_utf8();
        }
        pos
    }

    fn char_at(&self, pos: usize) -> Option<char> {
        self.code[pos..].chars().next()
    }

    fn record(&mut self, pos: usize, form: LoopForm, kind: LoopKind) {
        let mut chain = self.chain();
        chain.push(kind);
        self.sites.push(LoopSite {
            line: self.line_of(pos),
            form,
            kind,
            chain,
        });
    }

    /// Statement ended at the current depth: braceless loops there are done
    fn end_statement(&mut self) {
        let depth = self.frames.len();
        self.pending.retain(|(d, _)| *d != depth);
    }

    /// Body text after a loop head ending at `after_head`
    fn body_after(&self, after_head: usize) -> &'a str {
        let start = self.skip_ws(after_head);
        match self.char_at(start) {
            Some('{') => matching(self.code, start, '{', '}')
                .map_or(&self.code[start..], |end| &self.code[start + 1..end]),
            _ => {
                let end = self.code[start..]
                    .find(';')
                    .map_or(self.code.len(), |i| start + i + 1);
                &self.code[start..end]
            }
        }
    }

    /// Open the loop body that starts after `after_head`; returns the resume position
    fn open_body(&mut self, after_head: usize, kind: LoopKind) -> usize {
        let start = self.skip_ws(after_head);
        match self.char_at(start) {
            Some('{') => {
                self.frames.push(Frame {
                    loop_kind: Some(kind),
                    do_tail: false,
                });
                start + 1
            }
            Some(';') => start + 1,
            _ => {
                self.pending.push((self.frames.len(), kind));
                start
            }
        }
    }

    /// `while (...) ;` following a do-block
    fn skip_do_tail(&self, pos: usize) -> usize {
        let mut pos = self.skip_ws(pos);
        if self.code[pos..].starts_with("while") {
            pos = self.skip_ws(pos + "while".len());
            if self.char_at(pos) == Some('(') {
                if let Some(close) = matching(self.code, pos, '(', ')') {
                    pos = self.skip_ws(close + 1);
                    if self.char_at(pos) == Some(';') {
                        pos += 1;
                    }
                }
            }
        }
        pos
    }

    fn scan(mut self) -> Vec<LoopSite> {
        let mut pos = 0;
        while pos < self.code.len() {
            let Some(c) = self.char_at(pos) else { break };

            if c.is_alphabetic() || c == '_' {
                let word_end = self.code[pos..]
                    .find(|ch: char| !(ch.is_alphanumeric() || ch == '_'))
                    .map_or(self.code.len(), |i| pos + i);
                let word = &self.code[pos..word_end];
                pos = match word {
                    "for" | "while" => self.loop_head(pos, word_end, word == "for"),
                    "do" => self.do_head(pos, word_end),
                    _ => word_end,
                };
                continue;
            }

            match c {
                '{' => self.frames.push(Frame {
                    loop_kind: None,
                    do_tail: false,
                }),
                '}' => {
                    let frame = self.frames.pop();
                    if frame.map_or(false, |f| f.do_tail) {
                        pos = self.skip_do_tail(pos + 1);
                        self.end_statement();
                        continue;
                    }
                    self.end_statement();
                }
                ';' => self.end_statement(),
                _ => {}
            }
            pos += c.len_utf8();
        }
        self.sites
    }

    fn loop_head(&mut self, start: usize, word_end: usize, is_for: bool) -> usize {
        let open = self.skip_ws(word_end);
        if self.char_at(open) != Some('(') {
            return word_end;
        }
        let Some(close) = matching(self.code, open, '(', ')') else {
            return word_end;
        };
        let header = &self.code[open + 1..close];
        let body = self.body_after(close + 1);

        let (form, kind) = if is_for {
            (LoopForm::For, classify_cpp_for(header, body))
        } else {
            (LoopForm::While, classify_conditional(header, body))
        };
        self.record(start, form, kind);
        self.open_body(close + 1, kind)
    }

    fn do_head(&mut self, start: usize, word_end: usize) -> usize {
        let open = self.skip_ws(word_end);
        if self.char_at(open) != Some('{') {
            return word_end;
        }
        let Some(close) = matching(self.code, open, '{', '}') else {
            return word_end;
        };
        let body = &self.code[open + 1..close];

        let tail = self.skip_ws(close + 1);
        let guard = if self.code[tail..].starts_with("while") {
            let paren = self.skip_ws(tail + "while".len());
            matching(self.code, paren, '(', ')')
                .filter(|_| self.char_at(paren) == Some('('))
                .map_or("", |end| &self.code[paren + 1..end])
        } else {
            ""
        };

        let kind = classify_conditional(guard, body);
        self.record(start, LoopForm::DoWhile, kind);
        self.frames.push(Frame {
            loop_kind: Some(kind),
            do_tail: true,
        });
        open + 1
    }
}

fn cpp_loops(code: &str) -> Vec<LoopSite> {
    CppScanner::new(code).scan()
}

//! Comment and literal masking
//!
//! Pattern matching runs on a masked copy of the source: comments and the
//! contents of string/char literals become spaces, quotes and newlines are
//! kept. Line numbers therefore match the original text, and a `sorted(`
//! inside a string or a `for` inside a comment is never seen.

use crate::shared::models::Language;

/// Masked source plus the first lexical problem found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedSource {
    pub code: String,
    /// e.g. "unterminated string literal on line 3"
    pub lexical_error: Option<String>,
}

pub fn scan(source_code: &str, language: Language) -> ScannedSource {
    match language {
        Language::Python => scan_python(source_code),
        Language::Cpp => scan_cpp(source_code),
    }
}

struct Masker {
    chars: Vec<char>,
    out: String,
    pos: usize,
    line: usize,
    error: Option<String>,
}

impl Masker {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            out: String::with_capacity(source.len()),
            pos: 0,
            line: 1,
            error: None,
        }
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn starts_with(&self, pattern: &str) -> bool {
        pattern
            .chars()
            .enumerate()
            .all(|(i, c)| self.peek(i) == Some(c))
    }

    /// Copy the current char verbatim
    fn keep(&mut self) {
        if let Some(c) = self.peek(0) {
            if c == '\n' {
                self.line += 1;
            }
            self.out.push(c);
            self.pos += 1;
        }
    }

    /// Replace the current char with a space (newlines survive)
    fn blank(&mut self) {
        if let Some(c) = self.peek(0) {
            if c == '\n' {
                self.line += 1;
                self.out.push('\n');
            } else {
                self.out.push(' ');
            }
            self.pos += 1;
        }
    }

    fn fail(&mut self, what: &str, line: usize) {
        if self.error.is_none() {
            self.error = Some(format!("unterminated {} starting on line {}", what, line));
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn finish(self) -> ScannedSource {
        ScannedSource {
            code: self.out,
            lexical_error: self.error,
        }
    }

    /// Blank up to (not including) the next newline
    fn blank_line_rest(&mut self) {
        while let Some(c) = self.peek(0) {
            if c == '\n' {
                break;
            }
            self.blank();
        }
    }

    /// Single-line quoted literal; the opening quote is at `pos`
    fn quoted(&mut self, quote: char, what: &str) {
        let start_line = self.line;
        self.keep();
        loop {
            match self.peek(0) {
                None | Some('\n') => {
                    self.fail(what, start_line);
                    return;
                }
                Some('\\') => {
                    self.blank();
                    if self.peek(0) != Some('\n') {
                        self.blank();
                    }
                }
                Some(c) if c == quote => {
                    self.keep();
                    return;
                }
                Some(_) => self.blank(),
            }
        }
    }
}

fn scan_python(source: &str) -> ScannedSource {
    let mut m = Masker::new(source);
    while !m.at_end() {
        match m.peek(0) {
            Some('#') => m.blank_line_rest(),
            Some(q @ ('"' | '\'')) => {
                let triple: String = [q, q, q].iter().collect();
                if m.starts_with(&triple) {
                    let start_line = m.line;
                    for _ in 0..3 {
                        m.keep();
                    }
                    loop {
                        if m.at_end() {
                            m.fail("triple-quoted string", start_line);
                            break;
                        }
                        if m.starts_with(&triple) {
                            for _ in 0..3 {
                                m.keep();
                            }
                            break;
                        }
                        if m.peek(0) == Some('\\') {
                            m.blank();
                        }
                        m.blank();
                    }
                } else {
                    m.quoted(q, "string literal");
                }
            }
            Some(_) => m.keep(),
            None => break,
        }
    }
    m.finish()
}

fn scan_cpp(source: &str) -> ScannedSource {
    let mut m = Masker::new(source);
    while !m.at_end() {
        if m.starts_with("//") {
            m.blank_line_rest();
        } else if m.starts_with("/*") {
            let start_line = m.line;
            m.blank();
            m.blank();
            loop {
                if m.at_end() {
                    m.fail("block comment", start_line);
                    break;
                }
                if m.starts_with("*/") {
                    m.blank();
                    m.blank();
                    break;
                }
                m.blank();
            }
        } else if m.starts_with("R\"") && !prev_is_ident(&m) {
            raw_string(&mut m);
        } else {
            match m.peek(0) {
                Some('"') => m.quoted('"', "string literal"),
                // 1'000'000 digit separators
                Some('\'') if m.pos > 0 && m.chars[m.pos - 1].is_ascii_digit() => m.keep(),
                Some('\'') => m.quoted('\'', "character literal"),
                Some(_) => m.keep(),
                None => break,
            }
        }
    }
    m.finish()
}

fn prev_is_ident(m: &Masker) -> bool {
    m.pos > 0 && {
        let c = m.chars[m.pos - 1];
        c.is_alphanumeric() || c == '_'
    }
}

/// `R"delim( ... )delim"`
fn raw_string(m: &mut Masker) {
    let start_line = m.line;
    m.keep();
    m.keep();
    let mut delim = String::new();
    while let Some(c) = m.peek(0) {
        if c == '(' || c == '\n' || delim.len() > 16 {
            break;
        }
        delim.push(c);
        m.keep();
    }
    if m.peek(0) != Some('(') {
        m.fail("raw string literal", start_line);
        return;
    }
    m.keep();
    let close = format!("){}\"", delim);
    loop {
        if m.at_end() {
            m.fail("raw string literal", start_line);
            return;
        }
        if m.starts_with(&close) {
            for _ in 0..close.chars().count() {
                m.keep();
            }
            return;
        }
        m.blank();
    }
}

//! Compiled pattern tables
//!
//! All patterns run on masked source (see `source_scanner`).

use once_cell::sync::Lazy;
use regex::Regex;

use crate::shared::models::Language;

fn compile(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(re) => re,
        Err(e) => panic!("invalid built-in pattern {:?}: {}", pattern, e),
    }
}

/// Python sort/search library calls
pub static PY_LIBRARY_CALL: Lazy<Regex> = Lazy::new(|| {
    compile(r"\bsorted\s*\(|\.sort\s*\(|\bbisect(?:_left|_right)?\s*\(|\bbisect\.\w+\s*\(|\binsort(?:_left|_right)?\s*\(")
});

/// C++ sort/search library calls
pub static CPP_LIBRARY_CALL: Lazy<Regex> = Lazy::new(|| {
    compile(r"\b(?:std::)?(?:sort|stable_sort|partial_sort|lower_bound|upper_bound|binary_search|equal_range)\s*\(|\b(?:qsort|bsearch)\s*\(")
});

/// Division by two or right shift by one (`n // 2`, `n /= 2`, `n >> 1`)
pub static HALVING: Lazy<Regex> = Lazy::new(|| compile(r"(?://|/)=?\s*2\b|>>=?\s*1\b"));

/// Python function definition; group 1 = indentation, group 2 = name
pub static PY_FUNCTION_DEF: Lazy<Regex> =
    Lazy::new(|| compile(r"(?m)^([ \t]*)(?:async[ \t]+)?def[ \t]+([A-Za-z_]\w*)[ \t]*\("));

/// C++ function definition head up to the opening brace; group 1 = name
pub static CPP_FUNCTION_DEF: Lazy<Regex> = Lazy::new(|| {
    compile(r"\b([A-Za-z_]\w*)\s*\((?:[^;{}()]|\([^()]*\))*\)\s*(?:const\s*)?(?:noexcept\s*)?(?:->\s*[\w:<>,\s\*&]+?\s*)?\{")
});

/// Loop statements or comprehensions
pub static LOOP_KEYWORD: Lazy<Regex> = Lazy::new(|| compile(r"\b(?:for|while)\b"));

/// Python loop statement at the start of a stripped line; group 1 = keyword
pub static PY_LOOP_HEAD: Lazy<Regex> = Lazy::new(|| compile(r"^(?:async\s+)?(for|while)\b"));

/// Any `for` clause (statement or comprehension)
pub static PY_FOR_CLAUSE: Lazy<Regex> = Lazy::new(|| compile(r"\bfor\b"));

/// Merge step or explicit copy of a sub-range
pub static MERGE_OR_COPY: Lazy<Regex> =
    Lazy::new(|| compile(r"\b\w*merge\w*\s*\(|\b(?:std::)?copy\s*\(|\.begin\(\)\s*\+"));

/// Python slice `a[lo:hi]`
pub static PY_SLICE: Lazy<Regex> = Lazy::new(|| compile(r"\[[^\[\]\n]*:[^\[\]\n]*\]"));

/// Identifier, with the char that follows it
pub static IDENTIFIER: Lazy<Regex> = Lazy::new(|| compile(r"\b[A-Za-z_]\w*\b"));

/// Words that introduce a parenthesised head but are not functions
pub const CPP_NON_FUNCTIONS: &[&str] = &[
    "if", "for", "while", "switch", "catch", "return", "sizeof", "do", "else", "decltype",
    "alignof", "static_assert",
];

/// Identifiers that never act as a loop's bound variable
const GUARD_STOPWORDS: &[&str] = &[
    // Python
    "True", "False", "None", "and", "or", "not", "in", "is",
    // C++
    "true", "false", "nullptr", "NULL", "int", "long", "auto", "unsigned", "size_t", "const",
];

pub fn library_call(language: Language) -> &'static Regex {
    match language {
        Language::Python => &PY_LIBRARY_CALL,
        Language::Cpp => &CPP_LIBRARY_CALL,
    }
}

/// Variables a loop guard depends on (calls and keywords excluded)
pub fn guard_variables(guard: &str) -> Vec<String> {
    let mut vars: Vec<String> = Vec::new();
    for m in IDENTIFIER.find_iter(guard) {
        let word = m.as_str();
        let is_call = guard[m.end()..].trim_start().starts_with('(');
        let is_number_suffix = guard[..m.start()]
            .chars()
            .last()
            .map_or(false, |c| c.is_ascii_digit());
        if is_call || is_number_suffix || GUARD_STOPWORDS.contains(&word) {
            continue;
        }
        if !vars.iter().any(|v| v == word) {
            vars.push(word.to_string());
        }
    }
    vars
}

/// Regex for `name(` as a call
pub fn call_of(name: &str) -> Option<Regex> {
    Regex::new(&format!(r"\b{}\s*\(", regex::escape(name))).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_calls() {
        assert!(PY_LIBRARY_CALL.is_match("arr = sorted(arr)"));
        assert!(PY_LIBRARY_CALL.is_match("arr.sort(key=len)"));
        assert!(PY_LIBRARY_CALL.is_match("i = bisect.bisect_left(a, x)"));
        assert!(!PY_LIBRARY_CALL.is_match("sorted_items = []"));

        assert!(CPP_LIBRARY_CALL.is_match("std::sort(v.begin(), v.end());"));
        assert!(CPP_LIBRARY_CALL.is_match("sort(a, a + n);"));
        assert!(CPP_LIBRARY_CALL.is_match("auto it = lower_bound(v.begin(), v.end(), x);"));
        assert!(!CPP_LIBRARY_CALL.is_match("int sorted = 0;"));
    }

    #[test]
    fn test_halving() {
        for src in ["n // 2", "n/2", "n //= 2", "mid = (lo + hi) >> 1", "x >>= 1"] {
            assert!(HALVING.is_match(src), "{}", src);
        }
        for src in ["n - 2", "n / 20", "x >> 2", "n * 2"] {
            assert!(!HALVING.is_match(src), "{}", src);
        }
    }

    #[test]
    fn test_function_defs() {
        let caps = PY_FUNCTION_DEF.captures("class A:\n    def go(self, n):\n").unwrap();
        assert_eq!(&caps[1], "    ");
        assert_eq!(&caps[2], "go");

        let caps = CPP_FUNCTION_DEF
            .captures("long long fib(int n) const {")
            .unwrap();
        assert_eq!(&caps[1], "fib");
        let caps = CPP_FUNCTION_DEF
            .captures("void sortv(vector<int>& v, int (*cmp)(int, int)) {")
            .unwrap();
        assert_eq!(&caps[1], "sortv");
        assert!(CPP_FUNCTION_DEF.captures("int x = f(3);").is_none());
    }

    #[test]
    fn test_guard_variables() {
        assert_eq!(guard_variables("i <= n"), vec!["i", "n"]);
        assert_eq!(guard_variables("lo <= hi and not done"), vec!["lo", "hi", "done"]);
        assert_eq!(guard_variables("len(stack) > 0"), vec!["stack"]);
        assert_eq!(guard_variables("!q.empty()"), vec!["q"]);
        assert!(guard_variables("True").is_empty());
        assert!(guard_variables("1").is_empty());
        assert_eq!(guard_variables("x < 10u"), vec!["x"]);
    }

    #[test]
    fn test_call_of() {
        let re = call_of("fib").unwrap();
        assert_eq!(re.find_iter("fib(n - 1) + fib (n - 2) + fibo(n)").count(), 2);
    }
}

//! Integration tests for the static analyzer
//!
//! Quiz-style snippets with a known answer, in both languages.

use complexity_engine::{ComplexityClass, Language, StaticAnalyzer};
use pretty_assertions::assert_eq;

fn detect(code: &str, language: Language) -> ComplexityClass {
    StaticAnalyzer::new()
        .analyze(code, language)
        .unwrap_or_else(|e| panic!("{}\n---\n{}", e, code))
        .detected
}

fn check_all(cases: &[(&str, Language)], expected: ComplexityClass) {
    for (code, language) in cases {
        assert_eq!(detect(code, *language), expected, "\n{}", code);
    }
}

// =============================================================================
// O(1)
// =============================================================================

#[test]
fn test_constant_snippets() {
    check_all(
        &[
            ("def get_first(arr):\n    return arr[0]", Language::Python),
            ("def swap(a, b):\n    temp = a\n    a = b\n    b = temp\n    return a, b", Language::Python),
            ("def check_even(n):\n    return n % 2 == 0", Language::Python),
            ("x = dict[key]", Language::Python),
            ("unordered_map<int, int> um;\num[key] = value;", Language::Cpp),
        ],
        ComplexityClass::Constant,
    );
}

// =============================================================================
// O(log n)
// =============================================================================

#[test]
fn test_logarithmic_snippets() {
    check_all(
        &[
            ("def binary_search(arr, target):\n    left, right = 0, len(arr)-1\n    while left <= right:\n        mid = (left + right) // 2\n        if arr[mid] == target:\n            return mid\n        elif arr[mid] < target:\n            left = mid + 1\n        else:\n            right = mid - 1\n    return -1", Language::Python),
            ("def count_bits(n):\n    count = 0\n    while n > 0:\n        n //= 2\n        count += 1\n    return count", Language::Python),
            ("def power_of_two(n):\n    count = 0\n    i = 1\n    while i <= n:\n        i *= 2\n        count += 1\n    return count", Language::Python),
            ("for(int i = 1; i <= n; i *= 2) {\n    cout << i << endl;\n}", Language::Cpp),
            ("while(n > 1) {\n    n /= 2;\n}", Language::Cpp),
        ],
        ComplexityClass::Logarithmic,
    );
}

// =============================================================================
// O(n)
// =============================================================================

#[test]
fn test_linear_snippets() {
    check_all(
        &[
            ("def sum_array(arr):\n    total = 0\n    for num in arr:\n        total += num\n    return total", Language::Python),
            ("def find_max(arr):\n    max_val = arr[0]\n    for i in range(1, len(arr)):\n        if arr[i] > max_val:\n            max_val = arr[i]\n    return max_val", Language::Python),
            ("def count_vowels(s):\n    count = 0\n    for char in s:\n        if char in 'aeiou':\n            count += 1\n    return count", Language::Python),
            ("arr.append(x)\nfor item in arr:\n    process(item)", Language::Python),
            ("vector<int> v;\nfor(int i = 0; i < n; i++) {\n    v.push_back(i);\n}", Language::Cpp),
            ("int sum = 0;\nfor(int i = 0; i < n; i++) {\n    sum += arr[i];\n}", Language::Cpp),
        ],
        ComplexityClass::Linear,
    );
}

// =============================================================================
// O(n log n)
// =============================================================================

#[test]
fn test_linearithmic_snippets() {
    check_all(
        &[
            ("def merge_sort(arr):\n    if len(arr) <= 1:\n        return arr\n    mid = len(arr) // 2\n    left = merge_sort(arr[:mid])\n    right = merge_sort(arr[mid:])\n    return merge(left, right)", Language::Python),
            ("def quick_sort(arr):\n    if len(arr) <= 1:\n        return arr\n    pivot = arr[len(arr)//2]\n    left = [x for x in arr if x < pivot]\n    middle = [x for x in arr if x == pivot]\n    right = [x for x in arr if x > pivot]\n    return quick_sort(left) + middle + quick_sort(right)", Language::Python),
            ("arr.sort()", Language::Python),
            ("sorted_arr = sorted(arr)", Language::Python),
            ("std::sort(v.begin(), v.end());", Language::Cpp),
            ("for (int i = 0; i < n; i++) {\n    for (int j = 1; j < n; j <<= 1) {\n        s += j;\n    }\n}", Language::Cpp),
        ],
        ComplexityClass::Linearithmic,
    );
}

// =============================================================================
// O(n^2), O(n^3)
// =============================================================================

#[test]
fn test_quadratic_snippets() {
    check_all(
        &[
            ("def bubble_sort(arr):\n    n = len(arr)\n    for i in range(n):\n        for j in range(n-1):\n            if arr[j] > arr[j+1]:\n                arr[j], arr[j+1] = arr[j+1], arr[j]", Language::Python),
            ("def selection_sort(arr):\n    for i in range(len(arr)):\n        min_idx = i\n        for j in range(i+1, len(arr)):\n            if arr[j] < arr[min_idx]:\n                min_idx = j\n        arr[i], arr[min_idx] = arr[min_idx], arr[i]", Language::Python),
            ("def has_duplicate(arr):\n    for i in range(len(arr)):\n        for j in range(i+1, len(arr)):\n            if arr[i] == arr[j]:\n                return True\n    return False", Language::Python),
            ("for(int i = 0; i < n; i++) {\n    for(int j = 0; j < n; j++) {\n        matrix[i][j] = i + j;\n    }\n}", Language::Cpp),
            ("for(int i = 0; i < n; i++) {\n    for(int j = i; j < n; j++) {\n        sum += arr[i] + arr[j];\n    }\n}", Language::Cpp),
        ],
        ComplexityClass::Quadratic,
    );
}

#[test]
fn test_cubic_snippets() {
    check_all(
        &[
            ("for i in range(n):\n    for j in range(n):\n        for k in range(n):\n            print(i, j, k)", Language::Python),
            ("def matrix_multiply(A, B):\n    n = len(A)\n    C = [[0]*n for _ in range(n)]\n    for i in range(n):\n        for j in range(n):\n            for k in range(n):\n                C[i][j] += A[i][k] * B[k][j]\n    return C", Language::Python),
            ("for (int i = 0; i < n; i++)\n    for (int j = 0; j < n; j++)\n        for (int k = 0; k < n; k++)\n            c[i][j] += a[i][k] * b[k][j];", Language::Cpp),
        ],
        ComplexityClass::Cubic,
    );
}

// =============================================================================
// O(2^n)
// =============================================================================

#[test]
fn test_exponential_snippets() {
    check_all(
        &[
            ("def fibonacci(n):\n    if n <= 1:\n        return n\n    return fibonacci(n-1) + fibonacci(n-2)", Language::Python),
            ("int fib(int n) {\n    if (n < 2) return n;\n    return fib(n - 1) + fib(n - 2);\n}", Language::Cpp),
        ],
        ComplexityClass::Exponential,
    );
}

// =============================================================================
// Edge cases
// =============================================================================

#[test]
fn test_single_call_recursion_defaults_to_linear() {
    let signal = StaticAnalyzer::new()
        .analyze(
            "def solve_n_queens(n, row=0):\n    if row == n:\n        return 1\n    count = 0\n    for col in range(n):\n        if is_safe(row, col):\n            count += solve_n_queens(n, row+1)\n    return count",
            Language::Python,
        )
        .unwrap();
    assert_eq!(signal.detected, ComplexityClass::Linear);
    assert_eq!(signal.confidence, 55);
}

#[test]
fn test_keywords_in_comments_and_strings() {
    let code = "# for i in range(n):\n#     for j in range(n):\nlabel = \"for x in y: while True\"\nprint(label)\n";
    assert_eq!(detect(code, Language::Python), ComplexityClass::Constant);

    let code = "// for (;;) {}\n/* while (1) */\nconst char* s = \"for(;;)\";\nint x = 1;";
    assert_eq!(detect(code, Language::Cpp), ComplexityClass::Constant);
}

#[test]
fn test_explanations_are_never_empty() {
    let analyzer = StaticAnalyzer::new();
    for (code, language) in [
        ("x = 1", Language::Python),
        ("while True:\n    pass\n", Language::Python),
        ("int a = 0;", Language::Cpp),
        ("for (;;) { break; }", Language::Cpp),
    ] {
        let signal = analyzer.analyze(code, language).unwrap();
        assert!(!signal.explanation.is_empty(), "{}", code);
        assert!(signal.confidence <= 100);
    }
}

#[test]
fn test_syntax_errors_are_reported() {
    let analyzer = StaticAnalyzer::new();
    for (code, language) in [
        ("", Language::Python),
        ("def f(:\n    pass\n", Language::Python),
        ("for (int i = 0; i < n; i++) {", Language::Cpp),
        ("int x = 1", Language::Cpp),
    ] {
        let err = analyzer.analyze(code, language).unwrap_err();
        assert_eq!(err.kind().as_str(), "syntax_error", "{:?}", code);
    }
}

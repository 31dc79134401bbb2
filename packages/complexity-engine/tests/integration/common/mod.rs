//! Shared helpers for integration tests

#![allow(dead_code)]

use std::path::Path;
use std::process::{Command, Stdio};

/// True when `tool --version` runs successfully
pub fn has_tool(tool: &str) -> bool {
    Command::new(tool)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Log and report a missing tool so the caller can return early
pub fn skip_without(tool: &str) -> bool {
    if has_tool(tool) {
        return false;
    }
    eprintln!("skipping: {} not found", tool);
    true
}

/// Number of entries left in a scratch root
pub fn entries(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
}

pub const PY_QUADRATIC: &str = "def solve(n):\n    total = 0\n    for i in range(n):\n        for j in range(n):\n            total += i * j\n    return total\n";

pub const PY_LINEAR: &str = "def solve(n):\n    return sum(range(n))\n";

/// Quiz snippets: `std` names used unqualified
pub const CPP_PUSH_BACK: &str = "vector<int> v;\nfor(int i = 0; i < n; i++) {\n    v.push_back(i);\n}";

pub const CPP_DOUBLING_COUT: &str = "for(int i = 1; i <= n; i *= 2) {\n    cout << i << endl;\n}";

/// Statements plus a helper function that is neither `solve` nor `main`
pub const CPP_HELPER: &str = "long long f(long long k) {\n    long long s = 0;\n    for (long long i = 0; i < k; i++) s += i;\n    return s;\n}\nlong long total = f(n);\ncout << total << endl;\n";

/// True when the process is running (zombies count as gone)
#[cfg(target_os = "linux")]
pub fn running(pid: &str) -> bool {
    std::fs::read_to_string(format!("/proc/{}/stat", pid))
        .map(|stat| {
            stat.rsplit(')')
                .next()
                .map_or(false, |rest| !rest.trim_start().starts_with('Z'))
        })
        .unwrap_or(false)
}

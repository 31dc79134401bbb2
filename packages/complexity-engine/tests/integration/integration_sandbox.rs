//! Integration tests for the execution sandbox
//!
//! Real interpreters and compilers; each test skips itself when the tool is
//! missing. Every test checks that the scratch root is empty afterwards.

mod common;

use std::time::Duration;

use complexity_engine::config::{Confinement, SandboxConfig};
use complexity_engine::features::sandbox::{CppRuntime, ExecutionSandbox, LanguageRuntime, PythonRuntime};
use complexity_engine::{ErrorKind, Language};
use tempfile::TempDir;

fn sandbox_config(root: &TempDir) -> SandboxConfig {
    SandboxConfig::default().scratch_dir(root.path())
}

#[tokio::test]
async fn test_python_run_reports_time_and_cleans_up() {
    if common::skip_without("python3") {
        return;
    }
    let root = TempDir::new().unwrap();
    let runtime = PythonRuntime::new(&sandbox_config(&root));

    let run = runtime.prepare(common::PY_LINEAR, 1000).await.unwrap();
    assert_eq!(common::entries(root.path()), 1);

    let ms = runtime.execute(&run, Duration::from_secs(10)).await.unwrap();
    assert!(ms >= 0.0);

    runtime.cleanup(run).unwrap();
    assert_eq!(common::entries(root.path()), 0);
}

#[tokio::test]
async fn test_python_timeout_kills_and_cleans_up() {
    if common::skip_without("python3") {
        return;
    }
    let root = TempDir::new().unwrap();
    let runtime = PythonRuntime::new(&sandbox_config(&root));

    let run = runtime
        .prepare("import time\ntime.sleep(30)\n", 10)
        .await
        .unwrap();
    let started = std::time::Instant::now();
    let err = runtime
        .execute(&run, Duration::from_millis(300))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ExecutionTimeout);
    assert!(started.elapsed() < Duration::from_secs(10));

    runtime.cleanup(run).unwrap();
    assert_eq!(common::entries(root.path()), 0);
}

#[tokio::test]
async fn test_python_runtime_error_carries_stderr() {
    if common::skip_without("python3") {
        return;
    }
    let root = TempDir::new().unwrap();
    let sandbox = ExecutionSandbox::new(&sandbox_config(&root));

    let err = sandbox
        .run_once("raise ValueError('boom')\n", Language::Python, 10)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ExecutionFailed);
    assert!(err.to_string().contains("boom"));
    assert_eq!(common::entries(root.path()), 0);
}

#[tokio::test]
async fn test_python_environment_is_cleared() {
    if common::skip_without("python3") {
        return;
    }
    std::env::set_var("COMPLEXITY_TEST_SECRET", "leaked");
    let root = TempDir::new().unwrap();
    let sandbox = ExecutionSandbox::new(&sandbox_config(&root));

    let code = "import os\nif os.environ.get('COMPLEXITY_TEST_SECRET'):\n    raise SystemExit(3)\n";
    let ms = sandbox.run_once(code, Language::Python, 10).await.unwrap();
    assert!(ms >= 0.0);
}

#[tokio::test]
async fn test_cpp_run_and_cleanup() {
    if common::skip_without("g++") {
        return;
    }
    let root = TempDir::new().unwrap();
    let runtime = CppRuntime::new(&sandbox_config(&root));

    let code = "long long solve(long long n) {\n  long long s = 0;\n  for (long long i = 0; i < n; i++) s += i;\n  return s;\n}\n";
    let run = runtime.prepare(code, 1000).await.unwrap();
    let ms = runtime.execute(&run, Duration::from_secs(10)).await.unwrap();
    assert!(ms >= 0.0);

    runtime.cleanup(run).unwrap();
    assert_eq!(common::entries(root.path()), 0);
}

#[tokio::test]
async fn test_cpp_compile_error_cleans_up() {
    if common::skip_without("g++") {
        return;
    }
    let root = TempDir::new().unwrap();
    let runtime = CppRuntime::new(&sandbox_config(&root));

    let err = runtime
        .prepare("int broken( { return undeclared_name; }", 10)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CompileError);
    assert!(!err.to_string().is_empty());
    assert_eq!(common::entries(root.path()), 0);
}

#[tokio::test]
async fn test_cpp_quiz_snippets_run() {
    if common::skip_without("g++") {
        return;
    }
    let root = TempDir::new().unwrap();
    let sandbox = ExecutionSandbox::new(&sandbox_config(&root));

    for code in [common::CPP_PUSH_BACK, common::CPP_DOUBLING_COUT, common::CPP_HELPER] {
        let ms = sandbox.run_once(code, Language::Cpp, 500).await.unwrap();
        assert!(ms >= 0.0, "no timing for {:?}", code);
    }
    assert_eq!(common::entries(root.path()), 0);
}

#[tokio::test]
async fn test_default_config_blocks_writes_outside_scratch() {
    if common::skip_without("python3") {
        return;
    }
    let root = TempDir::new().unwrap();
    let sandbox = ExecutionSandbox::new(&sandbox_config(&root));
    if !sandbox.is_confined() {
        eprintln!("skipping: bubblewrap is not usable on this host");
        return;
    }

    let outside = TempDir::new().unwrap();
    let marker = outside.path().join("escaped");
    let code = format!("open('{}', 'w').write('x')\n", marker.display());
    let err = sandbox.run_once(&code, Language::Python, 10).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ExecutionFailed);
    assert!(!marker.exists());

    // the scratch directory itself stays writable
    let ms = sandbox
        .run_once("open('inside.txt', 'w').write('x')\n", Language::Python, 10)
        .await
        .unwrap();
    assert!(ms >= 0.0);
    assert_eq!(common::entries(root.path()), 0);
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn test_python_child_processes_killed_on_timeout() {
    if common::skip_without("python3") {
        return;
    }
    // unconfined, so the child's pid is visible from the host
    let root = TempDir::new().unwrap();
    let runtime = PythonRuntime::new(&sandbox_config(&root).confinement(Confinement::Off));

    let code = "import subprocess, time\nchild = subprocess.Popen(['sleep', '987'])\nopen('child.pid', 'w').write(str(child.pid))\ntime.sleep(30)\n";
    let run = runtime.prepare(code, 10).await.unwrap();
    let err = runtime
        .execute(&run, Duration::from_millis(800))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ExecutionTimeout);

    let pid = std::fs::read_to_string(run.scratch_path().join("child.pid")).unwrap();
    let mut gone = false;
    for _ in 0..40 {
        if !common::running(pid.trim()) {
            gone = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert!(gone, "sleep {} outlived the timed out run", pid.trim());

    runtime.cleanup(run).unwrap();
    assert_eq!(common::entries(root.path()), 0);
}

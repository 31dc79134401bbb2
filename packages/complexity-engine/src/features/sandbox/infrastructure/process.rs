//! Child process runner
//!
//! Spawns one process with a cleared environment, a fixed working directory
//! and closed stdin, captures both output streams up to a byte cap, and kills
//! the child when the timeout elapses.
//!
//! On unix the child leads its own process group. Whatever is left in that
//! group when `run` returns, or when its future is dropped, is killed, so a
//! submission cannot leave background processes behind.

use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

use super::confinement::Confiner;
use crate::errors::{AnalysisError, Result};

const FALLBACK_PATH: &str = "/usr/local/bin:/usr/bin:/bin";

/// Captured result of a finished process
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub wall_time: Duration,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Exit description for diagnostics
    pub fn status_line(&self) -> String {
        match self.exit_code {
            Some(code) => format!("exit code {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

/// Launches confined child processes
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    confiner: Confiner,
    max_output_bytes: usize,
    path: String,
}

impl ProcessRunner {
    pub fn new(confiner: Confiner, max_output_bytes: usize) -> Self {
        let path = std::env::var("PATH").unwrap_or_else(|_| FALLBACK_PATH.to_string());
        Self {
            confiner,
            max_output_bytes,
            path,
        }
    }

    pub fn confiner(&self) -> &Confiner {
        &self.confiner
    }

    /// Run `program args...` in `cwd`, under the confiner when `confine` is set
    ///
    /// Returns `ExecutionTimeout` if the child is still running at `limit`;
    /// the child's process group is killed and the child reaped before
    /// returning.
    pub async fn run(
        &self,
        program: &Path,
        args: &[String],
        cwd: &Path,
        limit: Duration,
        confine: bool,
    ) -> Result<ProcessOutput> {
        let mut cmd = if confine {
            self.confiner.command(program, cwd)
        } else {
            Command::new(program)
        };

        cmd.args(args)
            .current_dir(cwd)
            .env_clear()
            .env("PATH", &self.path)
            .env("TMPDIR", cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        #[cfg(unix)]
        cmd.process_group(0);

        debug!("Spawning {} in {}", program.display(), cwd.display());
        let started = Instant::now();
        let mut child = cmd.spawn().map_err(|e| {
            AnalysisError::execution_failed(format!(
                "failed to launch '{}': {}",
                program.display(),
                e
            ))
        })?;
        let group = GroupReaper::new(child.id());

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let cap = self.max_output_bytes;

        let waited = {
            let collect = async {
                tokio::join!(
                    child.wait(),
                    read_tail(stdout, cap),
                    read_tail(stderr, cap)
                )
            };
            timeout(limit, collect).await
        };

        match waited {
            Ok((status, stdout, stderr)) => {
                let status = status?;
                Ok(ProcessOutput {
                    exit_code: status.code(),
                    stdout: String::from_utf8_lossy(&stdout?).into_owned(),
                    stderr: String::from_utf8_lossy(&stderr?).into_owned(),
                    wall_time: started.elapsed(),
                })
            }
            Err(_) => {
                group.kill();
                if let Err(e) = child.kill().await {
                    warn!("Failed to kill timed out process: {}", e);
                }
                Err(AnalysisError::ExecutionTimeout {
                    timeout_ms: limit.as_millis() as u64,
                })
            }
        }
    }
}

/// Kills the child's whole process group when dropped
struct GroupReaper {
    #[cfg_attr(not(unix), allow(dead_code))]
    pgid: Option<i32>,
}

impl GroupReaper {
    fn new(child_pid: Option<u32>) -> Self {
        Self {
            pgid: child_pid.and_then(|pid| i32::try_from(pid).ok()),
        }
    }

    fn kill(&self) {
        #[cfg(unix)]
        {
            if let Some(pgid) = self.pgid {
                // SAFETY: killpg takes plain integers; ESRCH for an empty group is ignored
                unsafe {
                    libc::killpg(pgid, libc::SIGKILL);
                }
            }
        }
    }
}

impl Drop for GroupReaper {
    fn drop(&mut self) {
        self.kill();
    }
}

/// Read a stream to the end, keeping only its last `cap` bytes
async fn read_tail<R>(reader: Option<R>, cap: usize) -> std::io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let Some(mut reader) = reader else {
        return Ok(Vec::new());
    };

    let mut kept = Vec::new();
    let mut chunk = [0u8; 8192];
    loop {
        let read = reader.read(&mut chunk).await?;
        if read == 0 {
            break;
        }
        kept.extend_from_slice(&chunk[..read]);
        if kept.len() > cap {
            let excess = kept.len() - cap;
            kept.drain(..excess);
        }
    }
    Ok(kept)
}

/// Parse the elapsed milliseconds printed on the last non-empty stdout line
pub fn parse_elapsed_ms(stdout: &str) -> Option<f64> {
    stdout
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .and_then(|line| line.parse::<f64>().ok())
        .filter(|ms| ms.is_finite() && *ms >= 0.0)
}

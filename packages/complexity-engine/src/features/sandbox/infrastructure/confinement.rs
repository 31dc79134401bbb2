//! Execution confinement
//!
//! Resolves `sandbox.confinement` into the launcher used for every
//! execution. Under bubblewrap the host filesystem is mounted read-only, the
//! run's scratch directory is the only writable bind, and the child gets
//! fresh network and PID namespaces that die with the launcher.

use std::path::Path;
use std::process::Stdio;

use once_cell::sync::Lazy;
use tokio::process::Command;

use crate::config::{Confinement, SandboxConfig};

const BWRAP: &str = "bwrap";

/// bubblewrap is installed and allowed to create namespaces here
static BWRAP_USABLE: Lazy<bool> = Lazy::new(|| {
    let usable = std::process::Command::new(BWRAP)
        .args(bwrap_args(None))
        .arg("true")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false);
    tracing::debug!("bubblewrap usable: {}", usable);
    usable
});

/// Launcher for confined executions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confiner {
    Bubblewrap,
    /// Operator-supplied command prefix
    Wrapper(Vec<String>),
    Unconfined,
}

impl Confiner {
    pub fn resolve(config: &SandboxConfig) -> Self {
        match config.confinement {
            Confinement::Off => Self::Unconfined,
            Confinement::Bubblewrap => Self::Bubblewrap,
            Confinement::Auto if !config.wrapper.is_empty() => Self::Wrapper(config.wrapper.clone()),
            Confinement::Auto if *BWRAP_USABLE => Self::Bubblewrap,
            Confinement::Auto => Self::Unconfined,
        }
    }

    pub fn is_confined(&self) -> bool {
        !matches!(self, Self::Unconfined)
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Bubblewrap => "bubblewrap".to_string(),
            Self::Wrapper(prefix) => format!("wrapper `{}`", prefix.join(" ")),
            Self::Unconfined => "unconfined".to_string(),
        }
    }

    /// Command launching `program`, writable access limited to `scratch`
    pub fn command(&self, program: &Path, scratch: &Path) -> Command {
        match self {
            Self::Bubblewrap => {
                let mut cmd = Command::new(BWRAP);
                cmd.args(bwrap_args(Some(scratch))).arg(program);
                cmd
            }
            Self::Wrapper(prefix) => match prefix.split_first() {
                Some((head, rest)) => {
                    let mut cmd = Command::new(head);
                    cmd.args(rest).arg(program);
                    cmd
                }
                None => Command::new(program),
            },
            Self::Unconfined => Command::new(program),
        }
    }
}

/// bubblewrap flags up to and including the `--` separator
fn bwrap_args(scratch: Option<&Path>) -> Vec<String> {
    let mut args: Vec<String> = [
        "--ro-bind", "/", "/",
        "--dev", "/dev",
        "--proc", "/proc",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    if let Some(scratch) = scratch {
        let scratch = scratch.to_string_lossy().into_owned();
        args.extend(["--bind".to_string(), scratch.clone(), scratch.clone(), "--chdir".to_string(), scratch]);
    }

    args.extend(
        [
            "--unshare-net",
            "--unshare-pid",
            "--die-with-parent",
            "--new-session",
            "--",
        ]
        .iter()
        .map(|s| s.to_string()),
    );
    args
}

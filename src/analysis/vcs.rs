//! Version-control status of a project directory.
//!
//! Informational only; nothing is ever gated on it.

use std::{
    fmt,
    io::Read,
    path::Path,
    process::{Command, Stdio},
    thread,
    time::{Duration, Instant},
};

use tracing::{debug, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(20);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VcsStatus {
    Clean,
    Modified,
    /// Not under version control.
    Untracked,
    Error(String),
    Unknown,
}

impl VcsStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VcsStatus::Clean => "clean",
            VcsStatus::Modified => "modified",
            VcsStatus::Untracked => "untracked",
            VcsStatus::Error(_) => "error",
            VcsStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for VcsStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut out = String::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_string(&mut out);
        }
        out
    })
}

/// Run `git status --porcelain` in `project_dir`, giving up after `timeout`.
pub fn vcs_status(project_dir: &Path, timeout: Duration) -> VcsStatus {
    if !project_dir.is_dir() {
        return VcsStatus::Unknown;
    }
    if !project_dir.join(".git").exists() {
        return VcsStatus::Untracked;
    }

    let mut child = match Command::new("git")
        .args(["status", "--porcelain"])
        .current_dir(project_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
    {
        Ok(child) => child,
        Err(e) => return VcsStatus::Error(format!("failed to run git: {}", e)),
    };
    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    let deadline = Instant::now() + timeout;
    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                let out = stdout.join().unwrap_or_default();
                if !status.success() {
                    let err = stderr.join().unwrap_or_default();
                    warn!("git status failed in {}: {}", project_dir.display(), err.trim());
                    return VcsStatus::Error(err.trim().to_string());
                }
                debug!("git status in {}: {} lines", project_dir.display(), out.lines().count());
                return if out.trim().is_empty() {
                    VcsStatus::Clean
                } else {
                    VcsStatus::Modified
                };
            }
            Ok(None) if Instant::now() >= deadline => {
                let _ = child.kill();
                let _ = child.wait();
                warn!("git status timed out in {}", project_dir.display());
                return VcsStatus::Error(format!(
                    "git status timed out after {}s",
                    timeout.as_secs()
                ));
            }
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(e) => return VcsStatus::Error(e.to_string()),
        }
    }
}

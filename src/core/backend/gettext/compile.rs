//! Runs the external catalog compiler (`msgfmt`).

use std::{path::Path, process::Command};

use tracing::{debug, info};

/// Compile `po` into `mo` with `compiler -o <mo> <po>`.
///
/// Returns a human readable reason on failure; never panics on a missing tool.
pub fn compile_catalog(compiler: &str, po: &Path, mo: &Path) -> Result<(), String> {
    debug!("Running {} -o {} {}", compiler, mo.display(), po.display());
    let output = Command::new(compiler)
        .arg("-o")
        .arg(mo)
        .arg(po)
        .output()
        .map_err(|e| format!("failed to run {}: {}", compiler, e))?;

    if output.status.success() {
        info!("Compiled {}", mo.display());
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let detail = stderr.trim();
    Err(match output.status.code() {
        Some(code) if detail.is_empty() => format!("{} exited with {}", compiler, code),
        Some(code) => format!("{} exited with {}: {}", compiler, code, detail),
        None => format!("{} was terminated by a signal", compiler),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_compiler_is_reported() {
        let dir = tempdir().unwrap();
        let err = compile_catalog(
            "lexis-no-such-compiler",
            &dir.path().join("de.po"),
            &dir.path().join("de.mo"),
        )
        .unwrap_err();
        assert!(err.starts_with("failed to run lexis-no-such-compiler"));
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_compiler_exit_code() {
        let dir = tempdir().unwrap();
        let err = compile_catalog(
            "false",
            &dir.path().join("de.po"),
            &dir.path().join("de.mo"),
        )
        .unwrap_err();
        assert_eq!(err, "false exited with 1");
    }
}

//! JVM process plumbing for the external compilers.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use anyhow::{Context, Result, bail};
use tokio::process::Command;
use tracing::debug;

/// Locate the JVM: an explicit configured path wins, otherwise `java` is
/// looked up on PATH.
pub fn locate_java(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(path) => {
            if !path.exists() {
                bail!("configured java binary {} does not exist", path.display());
            }
            Ok(path.to_path_buf())
        }
        None => which::which("java").context("java not found on PATH; set compilers.java"),
    }
}

/// One `java -jar` invocation, built up by the drivers and executed here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JarInvocation {
    pub jar: PathBuf,
    pub args: Vec<String>,
}

impl JarInvocation {
    pub fn new(jar: impl Into<PathBuf>) -> Self {
        Self {
            jar: jar.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// The argv this invocation will run with, `java` included.
    pub fn command_line(&self, java: &Path) -> Vec<String> {
        let mut argv = vec![
            java.to_string_lossy().into_owned(),
            "-jar".into(),
            self.jar.to_string_lossy().into_owned(),
        ];
        argv.extend(self.args.iter().cloned());
        argv
    }
}

/// Captured output of a finished compiler process.
#[derive(Debug)]
pub struct CompilerOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Run a jar to completion, capturing output.
///
/// A non-zero exit becomes an error carrying the tail of the compiler's
/// stderr, which is where all three jars put their diagnostics.
pub async fn run_jar(java: &Path, invocation: &JarInvocation) -> Result<CompilerOutput> {
    debug!(argv = ?invocation.command_line(java), "running compiler jar");

    let output = Command::new(java)
        .arg("-jar")
        .arg(&invocation.jar)
        .args(&invocation.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output()
        .await
        .with_context(|| format!("failed to spawn java -jar {}", invocation.jar.display()))?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if !output.status.success() {
        bail!(
            "{} exited with {}:\n{}",
            invocation.jar.display(),
            output.status,
            stderr_tail(&stderr, 30)
        );
    }

    Ok(CompilerOutput { stdout, stderr })
}

/// The last `lines` lines of a compiler's stderr.
fn stderr_tail(stderr: &str, lines: usize) -> String {
    let all: Vec<&str> = stderr.lines().collect();
    let start = all.len().saturating_sub(lines);
    all[start..].join("\n")
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
